//! One-shot framed request/response exchange with a child process.
//!
//! An invocation spawns the collaborator executable, writes exactly one
//! request frame to its stdin, closes stdin, waits for the process to exit
//! while capturing stdout, and decodes exactly one response frame from the
//! captured bytes. There is no session: every call owns a fresh process.
//!
//! ```no_run
//! use std::time::Duration;
//! use stdioframe_invoke::{InvokeConfig, Invoker};
//!
//! let invoker = Invoker::new(InvokeConfig {
//!     timeout: Some(Duration::from_secs(5)),
//!     ..InvokeConfig::default()
//! });
//! let reply = invoker.invoke("./target/release/host", r#"{"account":"github"}"#)?;
//! println!("{reply}");
//! # Ok::<(), stdioframe_invoke::InvokeError>(())
//! ```

pub mod config;
pub mod driver;
pub mod error;
pub mod resolve;

pub use config::{InvokeConfig, StderrMode};
pub use driver::{invoke, Exchange, Invoker, Stage};
pub use error::{InvokeError, Result};
pub use resolve::resolve_executable;
