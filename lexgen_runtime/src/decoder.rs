//! Variable-width stream decoder with one-character lookahead.
//!
//! Bytes are interpreted as UTF-8: the lead byte's high-bit pattern selects
//! zero to three continuation bytes, each contributing six bits. A lead
//! byte matching none of the recognized patterns, a bad continuation byte,
//! or a sequence truncated by end of input is a fatal decode error. The
//! decoder holds at most one buffered character; that buffer is also the
//! pushback mechanism the scanner uses after a token-terminating lookup.

use crate::error::DecodeError;
use lexgen_ir::{Codepoint, Position, END_OF_STREAM};
use std::io::Read;

/// Decodes a byte stream into code points, tracking line and column.
///
/// Line and column are 1-based and updated only when a character is
/// consumed: a newline resets the column to 1 and increments the line,
/// any other character increments the column. [`Utf8Decoder::position`]
/// therefore reports the position of the next character to be consumed.
pub struct Utf8Decoder<R: Read> {
    reader: R,
    lookahead: Option<Codepoint>,
    at_end: bool,
    position: Position,
}

impl<R: Read> Utf8Decoder<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            lookahead: None,
            at_end: false,
            position: Position::start(),
        }
    }

    /// Position of the next character to be consumed.
    pub fn position(&self) -> Position {
        self.position
    }

    pub fn line(&self) -> u32 {
        self.position.line
    }

    pub fn column(&self) -> u32 {
        self.position.column
    }

    /// Return the next character without consuming it. Idempotent across
    /// repeated calls.
    pub fn peek(&mut self) -> Result<Codepoint, DecodeError> {
        if let Some(c) = self.lookahead {
            return Ok(c);
        }
        let c = self.decode_next()?;
        self.lookahead = Some(c);
        Ok(c)
    }

    /// Consume and return the next character, updating line and column.
    /// Once the underlying stream is exhausted this keeps returning the
    /// end-of-stream sentinel without touching the counters.
    pub fn advance(&mut self) -> Result<Codepoint, DecodeError> {
        let c = match self.lookahead.take() {
            Some(c) => c,
            None => self.decode_next()?,
        };
        if c != END_OF_STREAM {
            self.position.advance(c == '\n' as Codepoint);
        }
        Ok(c)
    }

    fn decode_next(&mut self) -> Result<Codepoint, DecodeError> {
        if self.at_end {
            return Ok(END_OF_STREAM);
        }
        let b0 = match self.read_byte()? {
            Some(b) => b,
            None => {
                self.at_end = true;
                return Ok(END_OF_STREAM);
            }
        };

        if b0 < 0b1000_0000 {
            return Ok(Codepoint::from(b0));
        }

        let (extra, low_bits) = if b0 & 0b1110_0000 == 0b1100_0000 {
            (1, b0 & 0b0001_1111)
        } else if b0 & 0b1111_0000 == 0b1110_0000 {
            (2, b0 & 0b0000_1111)
        } else if b0 & 0b1111_1000 == 0b1111_0000 {
            (3, b0 & 0b0000_0111)
        } else {
            return Err(DecodeError::InvalidLeadByte {
                byte: b0,
                line: self.position.line,
                column: self.position.column,
            });
        };

        let mut value = Codepoint::from(low_bits);
        for _ in 0..extra {
            let b = self.read_byte()?.ok_or(DecodeError::TruncatedSequence {
                line: self.position.line,
                column: self.position.column,
            })?;
            if b & 0b1100_0000 != 0b1000_0000 {
                return Err(DecodeError::InvalidContinuation {
                    byte: b,
                    line: self.position.line,
                    column: self.position.column,
                });
            }
            value = (value << 6) | Codepoint::from(b & 0b0011_1111);
        }
        Ok(value)
    }

    fn read_byte(&mut self) -> Result<Option<u8>, DecodeError> {
        let mut buf = [0u8; 1];
        loop {
            match self.reader.read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => {
                    self.position.offset += 1;
                    return Ok(Some(buf[0]));
                }
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    return Err(DecodeError::Io {
                        line: self.position.line,
                        column: self.position.column,
                        source: e,
                    })
                }
            }
        }
    }
}
