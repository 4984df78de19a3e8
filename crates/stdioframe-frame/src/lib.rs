//! Length-prefixed UTF-8 message framing for stdin/stdout exchanges.
//!
//! Every message is framed with:
//! - A 4-byte little-endian unsigned payload length
//! - Exactly that many bytes of UTF-8 payload
//!
//! There is no magic, terminator, checksum, or version marker. The length
//! field is always little-endian regardless of the host, so frames are
//! portable between machines.
//!
//! [`codec`] is pure and works on byte slices. [`FrameReader`] and
//! [`FrameWriter`] wrap blocking `Read`/`Write` streams for the collaborator
//! side of an exchange (one frame in on stdin, one frame out on stdout).

pub mod codec;
pub mod error;
pub mod reader;
pub mod writer;

pub use codec::{
    decode, decode_frame, encode, encode_frame, Frame, FrameConfig, DEFAULT_MAX_PAYLOAD,
    HEADER_SIZE, MAX_PAYLOAD_LEN,
};
pub use error::{FrameError, Result};
pub use reader::FrameReader;
pub use writer::FrameWriter;
