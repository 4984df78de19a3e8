/// Errors that can occur during frame encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The message does not fit in the 4-byte length field.
    #[error("message too large to frame ({size} bytes, max {})", u32::MAX)]
    Encoding { size: usize },

    /// Fewer than 4 bytes were available for the length header.
    #[error("truncated frame header ({available} of 4 bytes)")]
    TruncatedHeader { available: usize },

    /// The header declared more payload bytes than were available.
    #[error("truncated frame payload ({available} of {declared} bytes)")]
    TruncatedPayload { declared: usize, available: usize },

    /// The payload is not valid UTF-8.
    #[error("frame payload is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    /// The declared payload exceeds the configured maximum size.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream stopped accepting bytes before the frame was written.
    #[error("connection closed (incomplete frame)")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, FrameError>;
