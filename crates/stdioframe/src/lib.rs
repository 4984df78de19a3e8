//! Length-prefixed stdin/stdout message exchange with a child process.
//!
//! stdioframe sends one UTF-8 message to a separately built executable as a
//! length-prefixed frame on its stdin and decodes the single framed reply the
//! executable writes to stdout before exiting.
//!
//! # Crate Structure
//!
//! - [`frame`]: wire format, 4-byte little-endian length + UTF-8 payload
//! - [`invoke`]: one-shot exchange with a child process (behind `invoke` feature)

/// Re-export frame types.
pub mod frame {
    pub use stdioframe_frame::*;
}

/// Re-export invocation types (requires `invoke` feature).
#[cfg(feature = "invoke")]
pub mod invoke {
    pub use stdioframe_invoke::*;
}
