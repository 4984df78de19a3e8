use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

/// What to do with the collaborator's stderr.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StderrMode {
    /// Capture it; it is attached to execution errors and to [`crate::Exchange`].
    #[default]
    Capture,
    /// Let it go to this process's stderr.
    Inherit,
    /// Discard it.
    Null,
}

impl StderrMode {
    pub(crate) fn stdio(self) -> Stdio {
        match self {
            StderrMode::Capture => Stdio::piped(),
            StderrMode::Inherit => Stdio::inherit(),
            StderrMode::Null => Stdio::null(),
        }
    }
}

/// Configuration for an [`crate::Invoker`].
#[derive(Debug, Clone, Default)]
pub struct InvokeConfig {
    /// Upper bound for writing the request and waiting for exit.
    /// `None` blocks until the collaborator exits, however long that takes.
    pub timeout: Option<Duration>,
    /// Extra arguments passed to the collaborator.
    pub args: Vec<OsString>,
    /// Working directory for the collaborator. Default: inherited.
    pub current_dir: Option<PathBuf>,
    /// Handling of the collaborator's stderr. Default: captured.
    pub stderr: StderrMode,
}
