use bytes::{Buf, Bytes, BytesMut};
use std::io;
use thiserror::Error as ThisError;
use tokio_util::codec::{Decoder, Encoder};
use tracing::debug;

use crate::frame::Frame;

pub const DEFAULT_MAX_LINE_LENGTH: usize = 64 * 1024;

/// Splits the incoming byte stream into `\n` terminated request lines and writes reply frames
/// back out. Lines are handed over as raw bytes; the command parser decides whether they are
/// valid text.
pub struct LineCodec {
    max_line_length: usize,
    // Bytes before this offset are known not to contain a newline.
    next_index: usize,
}

impl LineCodec {
    pub fn new(max_line_length: usize) -> LineCodec {
        LineCodec {
            max_line_length,
            next_index: 0,
        }
    }
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LINE_LENGTH)
    }
}

#[derive(Debug, ThisError)]
pub enum LineCodecError {
    #[error("line exceeds the maximum length of {0} bytes")]
    LineTooLong(usize),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Decoder for LineCodec {
    type Item = Bytes;
    type Error = LineCodecError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let newline = src[self.next_index..]
            .iter()
            .position(|b| *b == b'\n')
            .map(|offset| self.next_index + offset);

        let Some(position) = newline else {
            if src.len() > self.max_line_length {
                return Err(LineCodecError::LineTooLong(self.max_line_length));
            }
            self.next_index = src.len();
            return Ok(None); // Not enough data to read an entire line.
        };

        self.next_index = 0;

        if position > self.max_line_length {
            return Err(LineCodecError::LineTooLong(self.max_line_length));
        }

        let line = src.split_to(position).freeze();
        // Drop the newline itself.
        src.advance(1);

        Ok(Some(line))
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(line) = self.decode(src)? {
            return Ok(Some(line));
        }

        // A line that was never terminated is not a request.
        if !src.is_empty() {
            debug!("Discarding {} bytes of unterminated input", src.len());
            src.clear();
            self.next_index = 0;
        }

        Ok(None)
    }
}

impl Encoder<Frame> for LineCodec {
    type Error = LineCodecError;

    fn encode(&mut self, frame: Frame, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.extend_from_slice(&frame.serialize());
        Ok(())
    }
}
