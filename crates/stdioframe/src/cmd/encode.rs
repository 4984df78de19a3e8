use stdioframe_frame::encode;

use crate::cmd::EncodeArgs;
use crate::exit::{frame_error, CliResult, SUCCESS};
use crate::output::print_raw;

pub fn run(args: EncodeArgs) -> CliResult<i32> {
    let wire = encode(&args.message).map_err(|err| frame_error("encoding failed", err))?;
    print_raw(&wire);
    Ok(SUCCESS)
}
