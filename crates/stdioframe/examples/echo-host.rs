//! Minimal collaborator. Reads one framed message from stdin and answers
//! with one framed reply on stdout.
//!
//! Build it, then exchange a message with it:
//!   cargo build --example echo-host
//!   cargo run --example invoke-once -- target/debug/examples/echo-host "hello"

use std::io;

use stdioframe::frame::{FrameReader, FrameWriter};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut reader = FrameReader::new(io::stdin().lock());
    let request = reader.read_message()?;
    eprintln!("Received {} bytes", request.len());

    let mut writer = FrameWriter::new(io::stdout().lock());
    writer.send_message(&format!("echo: {request}"))?;
    Ok(())
}
