use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

use stdioframe_frame::DEFAULT_MAX_PAYLOAD;
use stdioframe_invoke::StderrMode;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod decode;
pub mod echo;
pub mod encode;
pub mod invoke;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Send one message to a collaborator executable and print its reply.
    Invoke(InvokeArgs),
    /// Act as a collaborator: read one frame from stdin and write it back.
    Echo(EchoArgs),
    /// Write the framed form of a message to stdout.
    Encode(EncodeArgs),
    /// Read one frame from stdin and print its message.
    Decode(DecodeArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Invoke(args) => invoke::run(args, format),
        Command::Echo(args) => echo::run(args),
        Command::Encode(args) => encode::run(args),
        Command::Decode(args) => decode::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct InvokeArgs {
    /// Message to send.
    pub message: String,
    /// Collaborator executable.
    #[arg(long, value_name = "PATH", env = "STDIOFRAME_EXE")]
    pub exe: PathBuf,
    /// Argument passed to the collaborator (repeatable).
    #[arg(long = "arg", value_name = "ARG", allow_hyphen_values = true)]
    pub args: Vec<String>,
    /// Kill the collaborator if the exchange takes longer (e.g. 5s, 500ms, 2m).
    #[arg(long, env = "STDIOFRAME_TIMEOUT")]
    pub timeout: Option<String>,
    /// Working directory for the collaborator.
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,
    /// What to do with the collaborator's stderr.
    #[arg(long, value_name = "MODE", default_value = "capture")]
    pub stderr: StderrArg,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum StderrArg {
    Capture,
    Inherit,
    Null,
}

impl From<StderrArg> for StderrMode {
    fn from(arg: StderrArg) -> Self {
        match arg {
            StderrArg::Capture => StderrMode::Capture,
            StderrArg::Inherit => StderrMode::Inherit,
            StderrArg::Null => StderrMode::Null,
        }
    }
}

#[derive(Args, Debug)]
pub struct EchoArgs {
    /// Reject request frames declaring more payload bytes than this.
    #[arg(long, value_name = "BYTES", default_value_t = DEFAULT_MAX_PAYLOAD)]
    pub max_payload: usize,
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Message to frame.
    pub message: String,
}

#[derive(Args, Debug, Default)]
pub struct DecodeArgs {}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
