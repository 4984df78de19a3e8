use std::io::{self, ErrorKind, Write};

use bytes::BytesMut;

use crate::codec::{encode_frame, Frame, FrameConfig, HEADER_SIZE};
use crate::error::{FrameError, Result};

/// Answers with complete frames on any `Write` stream.
///
/// Each frame goes out as one contiguous write of header and payload,
/// followed by a flush, so a reader blocked on the other end of a pipe
/// sees the whole reply at once.
pub struct FrameWriter<T> {
    inner: T,
    config: FrameConfig,
}

impl<T: Write> FrameWriter<T> {
    /// Create a new frame writer with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new frame writer with explicit configuration.
    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self { inner, config }
    }

    /// Write a complete frame (blocking).
    pub fn write_frame(&mut self, frame: &Frame) -> Result<()> {
        self.send(frame.payload.as_ref())
    }

    /// Frame and send a text message.
    pub fn send_message(&mut self, message: &str) -> Result<()> {
        self.send(message.as_bytes())
    }

    /// Encode and send a raw payload, then flush.
    ///
    /// A stream that stops accepting bytes mid-frame yields `ConnectionClosed`.
    pub fn send(&mut self, payload: &[u8]) -> Result<()> {
        let max = self.config.max_payload_size;
        if payload.len() > max {
            return Err(FrameError::PayloadTooLarge {
                size: payload.len(),
                max,
            });
        }

        let mut wire = BytesMut::with_capacity(HEADER_SIZE + payload.len());
        encode_frame(payload, &mut wire)?;
        self.inner.write_all(&wire).map_err(stream_error)?;
        self.inner.flush().map_err(stream_error)?;

        tracing::trace!(size = payload.len(), "wrote frame");
        Ok(())
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

fn stream_error(err: io::Error) -> FrameError {
    match err.kind() {
        ErrorKind::WriteZero => FrameError::ConnectionClosed,
        _ => FrameError::Io(err),
    }
}
