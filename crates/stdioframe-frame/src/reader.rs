use std::io::{ErrorKind, Read};

use bytes::BytesMut;

use crate::codec::{Frame, FrameConfig, HEADER_SIZE};
use crate::error::{FrameError, Result};

/// Reads complete frames from any `Read` stream.
///
/// Reads exactly one header and one payload per call and never consumes
/// bytes past the end of the frame. Handles partial reads internally.
pub struct FrameReader<T> {
    inner: T,
    config: FrameConfig,
}

impl<T: Read> FrameReader<T> {
    /// Create a new frame reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new frame reader with explicit configuration.
    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self { inner, config }
    }

    /// Read the next complete frame (blocking).
    ///
    /// EOF inside the header yields `TruncatedHeader`, EOF inside the payload
    /// yields `TruncatedPayload`.
    pub fn read_frame(&mut self) -> Result<Frame> {
        let mut header = [0u8; HEADER_SIZE];
        let filled = self.fill(&mut header)?;
        if filled < HEADER_SIZE {
            return Err(FrameError::TruncatedHeader { available: filled });
        }

        let declared = u32::from_le_bytes(header) as usize;
        if declared > self.config.max_payload_size {
            return Err(FrameError::PayloadTooLarge {
                size: declared,
                max: self.config.max_payload_size,
            });
        }

        let mut payload = BytesMut::zeroed(declared);
        let filled = self.fill(&mut payload)?;
        if filled < declared {
            return Err(FrameError::TruncatedPayload {
                declared,
                available: filled,
            });
        }

        tracing::trace!(size = declared, "read frame");
        Ok(Frame::new(payload.freeze()))
    }

    /// Read the next frame and return its payload as text.
    pub fn read_message(&mut self) -> Result<String> {
        self.read_frame()?.into_message()
    }

    /// Fill `buf` until it is full or the stream reports EOF.
    fn fill(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut filled = 0usize;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
        Ok(filled)
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}
