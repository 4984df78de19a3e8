use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;

use stdioframe_frame::FrameError;

use crate::driver::Stage;

/// Errors that end an invocation. None of them are retried.
#[derive(Debug, thiserror::Error)]
pub enum InvokeError {
    /// The executable path does not name an existing, executable file.
    #[error("collaborator not found at {}: {reason}", path.display())]
    CollaboratorNotFound { path: PathBuf, reason: String },

    /// The request message could not be framed.
    #[error("encoding failed: {0}")]
    Encoding(#[source] FrameError),

    /// The operating system refused to start the collaborator.
    #[error("spawning {} failed: {source}", path.display())]
    Spawn {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A pipe to or from the collaborator failed.
    #[error("I/O error after stage {stage}: {source}")]
    Io {
        stage: Stage,
        source: std::io::Error,
    },

    /// The collaborator exited unsuccessfully.
    #[error("execution failed: collaborator exited with {status}{}", stderr_suffix(stderr))]
    CollaboratorExecution { status: ExitStatus, stderr: String },

    /// The collaborator's stdout did not hold a valid response frame.
    #[error("response decoding failed: {0}")]
    ResponseFraming(#[source] FrameError),

    /// The collaborator did not finish in time and was killed.
    #[error("execution timed out after {after:?} (stage {stage})")]
    Timeout { after: Duration, stage: Stage },
}

impl InvokeError {
    /// The last stage the invocation reached before failing.
    pub fn stage(&self) -> Stage {
        match self {
            Self::CollaboratorNotFound { .. } | Self::Encoding(_) | Self::Spawn { .. } => {
                Stage::NotStarted
            }
            Self::Io { stage, .. } | Self::Timeout { stage, .. } => *stage,
            Self::CollaboratorExecution { .. } | Self::ResponseFraming(_) => Stage::Exited,
        }
    }

    /// The underlying codec error, if the failure came from framing.
    pub fn frame_error(&self) -> Option<&FrameError> {
        match self {
            Self::Encoding(err) | Self::ResponseFraming(err) => Some(err),
            _ => None,
        }
    }
}

fn stderr_suffix(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!(" (stderr: {stderr})")
    }
}

pub type Result<T> = std::result::Result<T, InvokeError>;
