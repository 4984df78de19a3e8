use std::fmt;
use std::io;

use stdioframe_frame::FrameError;
use stdioframe_invoke::InvokeError;

// Shell-style exit codes; 126/127 follow the usual "cannot execute" and
// "command not found" convention.
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;
pub const SPAWN_FAILED: i32 = 126;
pub const NOT_FOUND: i32 = 127;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        io::ErrorKind::BrokenPipe => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn frame_error(context: &str, err: FrameError) -> CliError {
    match err {
        FrameError::Io(source) => io_error(context, source),
        FrameError::ConnectionClosed => CliError::new(FAILURE, format!("{context}: {err}")),
        other => CliError::new(DATA_INVALID, format!("{context}: {other}")),
    }
}

pub fn invoke_error(err: InvokeError) -> CliError {
    let stage = err.stage();
    let code = match &err {
        InvokeError::CollaboratorNotFound { .. } => NOT_FOUND,
        InvokeError::Spawn { .. } => SPAWN_FAILED,
        InvokeError::Encoding(_) | InvokeError::ResponseFraming(_) => DATA_INVALID,
        InvokeError::CollaboratorExecution { .. } => FAILURE,
        InvokeError::Timeout { .. } => TIMEOUT,
        InvokeError::Io { .. } => INTERNAL,
    };
    CliError::new(code, format!("{err} [stage: {stage}]"))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::time::Duration;

    use stdioframe_invoke::Stage;

    use super::*;

    #[test]
    fn invoke_errors_map_to_distinct_codes() {
        let not_found = invoke_error(InvokeError::CollaboratorNotFound {
            path: PathBuf::from("/nope"),
            reason: "missing".into(),
        });
        assert_eq!(not_found.code, NOT_FOUND);
        assert!(not_found.message.contains("stage: not-started"));

        let timeout = invoke_error(InvokeError::Timeout {
            after: Duration::from_secs(1),
            stage: Stage::AwaitingExit,
        });
        assert_eq!(timeout.code, TIMEOUT);
        assert!(timeout.message.contains("stage: awaiting-exit"));

        let framing = invoke_error(InvokeError::ResponseFraming(
            FrameError::TruncatedHeader { available: 1 },
        ));
        assert_eq!(framing.code, DATA_INVALID);
        assert!(framing.message.starts_with("response decoding failed"));
    }

    #[test]
    fn frame_io_errors_use_io_mapping() {
        let err = frame_error(
            "read failed",
            FrameError::Io(io::Error::from(io::ErrorKind::PermissionDenied)),
        );
        assert_eq!(err.code, PERMISSION_DENIED);
    }
}
