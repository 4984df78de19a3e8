use std::io;

use stdioframe_frame::{FrameConfig, FrameReader, FrameWriter};

use crate::cmd::EchoArgs;
use crate::exit::{frame_error, CliResult, SUCCESS};

/// Serve exactly one exchange on stdin/stdout, answering with the request frame.
pub fn run(args: EchoArgs) -> CliResult<i32> {
    let config = FrameConfig {
        max_payload_size: args.max_payload,
    };

    let mut reader = FrameReader::with_config(io::stdin().lock(), config.clone());
    let frame = reader
        .read_frame()
        .map_err(|err| frame_error("reading request failed", err))?;

    tracing::info!(size = frame.payload.len(), "echoing frame");

    let mut writer = FrameWriter::with_config(io::stdout().lock(), config);
    writer
        .write_frame(&frame)
        .map_err(|err| frame_error("writing response failed", err))?;

    Ok(SUCCESS)
}
