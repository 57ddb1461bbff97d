//! Streaming reads over a cord.

use crate::Cord;
use std::io::{self, Read};

/// A forward-only reader over a cord's bytes.
///
/// Reading never fails; the `io::Result` is the [`Read`] contract, and
/// errors from downstream readers layered on top pass through untouched.
pub struct CordReader<'a> {
    cord: &'a Cord,
    offset: usize,
}

impl<'a> CordReader<'a> {
    pub(crate) fn new(cord: &'a Cord) -> Self {
        Self { cord, offset: 0 }
    }

    /// Bytes consumed so far.
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl Read for CordReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut filled = 0;
        while filled < buf.len() && self.offset < self.cord.len() {
            let Ok((chunk, local)) = self.cord.index(self.offset) else {
                break;
            };
            let bytes = &chunk.as_bytes()[local..];
            let take = bytes.len().min(buf.len() - filled);
            buf[filled..filled + take].copy_from_slice(&bytes[..take]);
            filled += take;
            self.offset += take;
        }
        Ok(filled)
    }
}
