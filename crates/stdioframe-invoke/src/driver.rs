use std::fmt;
use std::io::{self, ErrorKind, Read, Write};
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use bytes::Bytes;
use stdioframe_frame::{decode_frame, encode};

use crate::config::{InvokeConfig, StderrMode};
use crate::error::{InvokeError, Result};
use crate::resolve::resolve_executable;

const EXIT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Progress of a single invocation.
///
/// `NotStarted → Spawned → InputWritten → AwaitingExit → Exited → Decoded`.
/// A failure at any point ends the invocation with an [`InvokeError`] whose
/// [`InvokeError::stage`] is the last stage reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    NotStarted,
    Spawned,
    InputWritten,
    AwaitingExit,
    Exited,
    Decoded,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::NotStarted => "not-started",
            Stage::Spawned => "spawned",
            Stage::InputWritten => "input-written",
            Stage::AwaitingExit => "awaiting-exit",
            Stage::Exited => "exited",
            Stage::Decoded => "decoded",
        };
        f.write_str(name)
    }
}

/// Everything observed during a successful invocation.
#[derive(Debug, Clone)]
pub struct Exchange {
    /// Resolved path of the collaborator.
    pub executable: PathBuf,
    /// The request frame as written to stdin.
    pub request: Bytes,
    /// Everything the collaborator wrote to stdout.
    pub response: Bytes,
    /// The decoded response message.
    pub message: String,
    /// Bytes on stdout after the response frame (ignored by decoding).
    pub trailing_bytes: usize,
    /// Captured stderr, empty unless [`StderrMode::Capture`] is used.
    pub stderr: String,
    /// Wall-clock time from spawn to decoded response.
    pub elapsed: Duration,
}

/// Runs one-shot exchanges against collaborator executables.
#[derive(Debug, Clone, Default)]
pub struct Invoker {
    config: InvokeConfig,
}

/// Invoke `executable` with `message` using the default configuration.
pub fn invoke(executable: impl AsRef<Path>, message: &str) -> Result<String> {
    Invoker::default().invoke(executable, message)
}

impl Invoker {
    /// Create an invoker with explicit configuration.
    pub fn new(config: InvokeConfig) -> Self {
        Self { config }
    }

    /// Current configuration.
    pub fn config(&self) -> &InvokeConfig {
        &self.config
    }

    /// Send `message` to `executable` and return the decoded response.
    pub fn invoke(&self, executable: impl AsRef<Path>, message: &str) -> Result<String> {
        self.exchange(executable, message).map(|exchange| exchange.message)
    }

    /// Like [`Invoker::invoke`], returning the raw frames and diagnostics too.
    pub fn exchange(&self, executable: impl AsRef<Path>, message: &str) -> Result<Exchange> {
        let executable = resolve_executable(executable.as_ref())?;
        let request = encode(message).map_err(InvokeError::Encoding)?;

        let span = tracing::debug_span!("invoke", collaborator = %executable.display());
        let _guard = span.enter();

        let started = Instant::now();
        let deadline = Deadline::after(self.config.timeout);

        let mut command = Command::new(&executable);
        command
            .args(&self.config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(self.config.stderr.stdio());
        if let Some(dir) = &self.config.current_dir {
            command.current_dir(dir);
        }

        let child = command.spawn().map_err(|source| InvokeError::Spawn {
            path: executable.clone(),
            source,
        })?;
        let mut child = ChildGuard::new(child);
        enter(Stage::Spawned);

        let stdin = child.stdin.take().ok_or_else(|| missing_pipe("stdin"))?;
        let stdout = child.stdout.take().ok_or_else(|| missing_pipe("stdout"))?;
        let stderr = match self.config.stderr {
            StderrMode::Capture => Some(child.stderr.take().ok_or_else(|| missing_pipe("stderr"))?),
            StderrMode::Inherit | StderrMode::Null => None,
        };

        // Drain the output pipes before writing so a collaborator that answers
        // early can never block on a full pipe.
        let stdout_rx = spawn_worker("stdioframe-stdout", move || read_all(stdout))
            .map_err(|source| io_error(Stage::Spawned, source))?;
        let stderr_rx = stderr
            .map(|pipe| spawn_worker("stdioframe-stderr", move || read_all(pipe)))
            .transpose()
            .map_err(|source| io_error(Stage::Spawned, source))?;

        let payload = request.clone();
        let stdin_rx = spawn_worker("stdioframe-stdin", move || write_request(stdin, &payload))
            .map_err(|source| io_error(Stage::Spawned, source))?;

        match deadline.wait(&stdin_rx) {
            None => return Err(deadline.expired(Stage::Spawned)),
            Some(Ok(())) => {}
            Some(Err(err)) if err.kind() == ErrorKind::BrokenPipe => {
                tracing::warn!("collaborator closed stdin before reading the whole request");
            }
            Some(Err(source)) => return Err(io_error(Stage::Spawned, source)),
        }
        enter(Stage::InputWritten);
        tracing::debug!(size = request.len(), "request frame written");

        enter(Stage::AwaitingExit);
        let status = child
            .wait_until(&deadline)
            .map_err(|source| io_error(Stage::AwaitingExit, source))?
            .ok_or_else(|| deadline.expired(Stage::AwaitingExit))?;
        enter(Stage::Exited);

        let response = match deadline.wait(&stdout_rx) {
            None => return Err(deadline.expired(Stage::Exited)),
            Some(result) => result.map_err(|source| io_error(Stage::Exited, source))?,
        };
        let stderr = match &stderr_rx {
            None => String::new(),
            Some(rx) => match deadline.wait(rx) {
                None => return Err(deadline.expired(Stage::Exited)),
                Some(result) => {
                    let raw = result.map_err(|source| io_error(Stage::Exited, source))?;
                    String::from_utf8_lossy(&raw).trim_end().to_owned()
                }
            },
        };
        tracing::debug!(%status, size = response.len(), "collaborator exited");

        if !status.success() {
            return Err(InvokeError::CollaboratorExecution { status, stderr });
        }

        let frame = decode_frame(&response).map_err(InvokeError::ResponseFraming)?;
        let trailing_bytes = response.len() - frame.wire_size();
        if trailing_bytes > 0 {
            tracing::warn!(trailing_bytes, "ignoring bytes after the response frame");
        }
        let message = frame.into_message().map_err(InvokeError::ResponseFraming)?;
        enter(Stage::Decoded);

        Ok(Exchange {
            executable,
            request,
            response: Bytes::from(response),
            message,
            trailing_bytes,
            stderr,
            elapsed: started.elapsed(),
        })
    }
}

fn enter(stage: Stage) {
    tracing::debug!(%stage, "invocation stage");
}

fn io_error(stage: Stage, source: io::Error) -> InvokeError {
    InvokeError::Io { stage, source }
}

fn missing_pipe(name: &str) -> InvokeError {
    io_error(
        Stage::Spawned,
        io::Error::other(format!("collaborator {name} was not captured")),
    )
}

/// Write the whole request, then drop the pipe so the collaborator sees EOF.
fn write_request(mut stdin: impl Write, request: &[u8]) -> io::Result<()> {
    stdin.write_all(request)?;
    stdin.flush()
}

fn read_all(mut pipe: impl Read) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    pipe.read_to_end(&mut buf)?;
    Ok(buf)
}

/// Run `work` on a named thread and hand back a channel for its result.
fn spawn_worker<T, F>(name: &str, work: F) -> io::Result<Receiver<io::Result<T>>>
where
    T: Send + 'static,
    F: FnOnce() -> io::Result<T> + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::Builder::new().name(name.to_string()).spawn(move || {
        let _ = tx.send(work());
    })?;
    Ok(rx)
}

/// Optional point in time after which the invocation gives up.
#[derive(Debug, Clone, Copy)]
struct Deadline {
    timeout: Option<Duration>,
    at: Option<Instant>,
}

impl Deadline {
    /// A timeout too large to represent as an `Instant` means no deadline.
    fn after(timeout: Option<Duration>) -> Self {
        Self {
            timeout,
            at: timeout.and_then(|t| Instant::now().checked_add(t)),
        }
    }

    /// Time left, or `None` when there is no deadline.
    fn remaining(&self) -> Option<Duration> {
        self.at
            .map(|at| at.saturating_duration_since(Instant::now()))
    }

    /// Wait for a worker result. `None` means the deadline passed first.
    fn wait<T>(&self, rx: &Receiver<io::Result<T>>) -> Option<io::Result<T>> {
        let received = match self.remaining() {
            None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
            Some(remaining) => rx.recv_timeout(remaining),
        };
        match received {
            Ok(result) => Some(result),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => {
                Some(Err(io::Error::other("pipe worker exited without a result")))
            }
        }
    }

    fn expired(&self, stage: Stage) -> InvokeError {
        let after = self.timeout.unwrap_or_default();
        tracing::warn!(?after, %stage, "collaborator timed out, killing it");
        InvokeError::Timeout { after, stage }
    }
}

/// Owns the child process; kills and reaps it unless it was already waited for.
struct ChildGuard {
    child: Child,
    reaped: bool,
}

impl ChildGuard {
    fn new(child: Child) -> Self {
        Self {
            child,
            reaped: false,
        }
    }

    /// Wait for exit. `Ok(None)` means the deadline passed first.
    fn wait_until(&mut self, deadline: &Deadline) -> io::Result<Option<ExitStatus>> {
        if deadline.remaining().is_none() {
            let status = self.child.wait()?;
            self.reaped = true;
            return Ok(Some(status));
        }

        loop {
            if let Some(status) = self.child.try_wait()? {
                self.reaped = true;
                return Ok(Some(status));
            }
            match deadline.remaining() {
                Some(remaining) if !remaining.is_zero() => {
                    thread::sleep(remaining.min(EXIT_POLL_INTERVAL));
                }
                _ => return Ok(None),
            }
        }
    }
}

impl Deref for ChildGuard {
    type Target = Child;

    fn deref(&self) -> &Child {
        &self.child
    }
}

impl DerefMut for ChildGuard {
    fn deref_mut(&mut self) -> &mut Child {
        &mut self.child
    }
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        if self.reaped {
            return;
        }
        if let Err(err) = self.child.kill() {
            tracing::debug!(error = %err, "kill failed (collaborator already gone?)");
        }
        let _ = self.child.wait();
    }
}
