use std::io::Read;

use stdioframe_frame::decode_frame;

use crate::cmd::DecodeArgs;
use crate::exit::{frame_error, io_error, CliResult, SUCCESS};
use crate::output::{print_decoded, OutputFormat};

/// Decode the frame at the start of stdin. Bytes after it are reported, not rejected.
pub fn run(_args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let mut input = Vec::new();
    std::io::stdin()
        .lock()
        .read_to_end(&mut input)
        .map_err(|err| io_error("reading stdin failed", err))?;

    let frame = decode_frame(&input).map_err(|err| frame_error("decoding failed", err))?;
    let trailing_bytes = input.len() - frame.wire_size();
    let message = frame
        .into_message()
        .map_err(|err| frame_error("decoding failed", err))?;

    print_decoded(&message, trailing_bytes, format);
    Ok(SUCCESS)
}
