//! Forward-only cursor over a byte source.

use crate::error::{Result, SpeError};

/// A read position over borrowed bytes that only moves forward.
///
/// Decode steps take the cursor by `&mut`, so two decodes can never
/// interleave reads against the same position.
#[derive(Debug)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// A cursor starting at an absolute offset. Offsets past the end are
    /// clamped; the first read then reports the truncation.
    pub fn at(data: &'a [u8], offset: usize) -> Self {
        Self {
            data,
            pos: offset.min(data.len()),
        }
    }

    /// Absolute offset of the next byte to be read.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Takes exactly `n` bytes or fails without moving.
    pub fn take(&mut self, n: usize, field: &str) -> Result<&'a [u8]> {
        if self.remaining() < n {
            return Err(SpeError::TruncatedData {
                offset: self.pos,
                field: field.to_string(),
                expected: n,
                available: self.remaining(),
            });
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }
}
