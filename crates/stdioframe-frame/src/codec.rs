use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{FrameError, Result};

/// Frame header: little-endian payload length (4) = 4 bytes.
pub const HEADER_SIZE: usize = 4;

/// Largest payload the length field can describe.
pub const MAX_PAYLOAD_LEN: usize = u32::MAX as usize;

/// Default maximum payload accepted by stream readers: 16 MiB.
pub const DEFAULT_MAX_PAYLOAD: usize = 16 * 1024 * 1024;

/// A decoded frame. The payload has not been checked for UTF-8 yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// The message payload.
    pub payload: Bytes,
}

impl Frame {
    /// Create a new frame.
    pub fn new(payload: impl Into<Bytes>) -> Self {
        Self {
            payload: payload.into(),
        }
    }

    /// Create a frame carrying a text message.
    pub fn from_message(message: &str) -> Self {
        Self::new(Bytes::copy_from_slice(message.as_bytes()))
    }

    /// The total wire size of this frame (header + payload).
    pub fn wire_size(&self) -> usize {
        HEADER_SIZE + self.payload.len()
    }

    /// Borrow the payload as text.
    pub fn text(&self) -> Result<&str> {
        Ok(std::str::from_utf8(&self.payload)?)
    }

    /// Consume the frame and return the payload as owned text.
    pub fn into_message(self) -> Result<String> {
        self.text().map(str::to_owned)
    }
}

/// Convert a payload length into the value carried in the header.
fn length_prefix(len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| FrameError::Encoding { size: len })
}

/// Encode a payload into the wire format, appending to `dst`.
///
/// Wire format:
/// ```text
/// ┌──────────────┬──────────────────┐
/// │ Length       │ Payload          │
/// │ (4B LE, u32) │ (Length bytes)   │
/// └──────────────┴──────────────────┘
/// ```
pub fn encode_frame(payload: &[u8], dst: &mut BytesMut) -> Result<()> {
    let len = length_prefix(payload.len())?;
    dst.reserve(HEADER_SIZE + payload.len());
    dst.put_u32_le(len);
    dst.put_slice(payload);
    Ok(())
}

/// Encode a text message into a complete frame.
///
/// `encode("")` yields exactly four zero bytes.
pub fn encode(message: &str) -> Result<Bytes> {
    let mut buf = BytesMut::new();
    encode_frame(message.as_bytes(), &mut buf)?;
    Ok(buf.freeze())
}

/// Decode the frame at the start of `src`.
///
/// Bytes after the frame are left alone; `src.len() - frame.wire_size()`
/// tells the caller how many were ignored.
pub fn decode_frame(src: &[u8]) -> Result<Frame> {
    let Some((header, rest)) = src.split_first_chunk::<HEADER_SIZE>() else {
        return Err(FrameError::TruncatedHeader {
            available: src.len(),
        });
    };

    let declared = u32::from_le_bytes(*header) as usize;
    if rest.len() < declared {
        return Err(FrameError::TruncatedPayload {
            declared,
            available: rest.len(),
        });
    }

    Ok(Frame::new(Bytes::copy_from_slice(&rest[..declared])))
}

/// Decode the frame at the start of `src` into text.
pub fn decode(src: &[u8]) -> Result<String> {
    decode_frame(src)?.into_message()
}

/// Configuration for stream readers and writers.
#[derive(Debug, Clone)]
pub struct FrameConfig {
    /// Maximum payload size in bytes. Default: 16 MiB.
    pub max_payload_size: usize,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_payload_size: DEFAULT_MAX_PAYLOAD,
        }
    }
}
