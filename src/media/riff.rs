//! RIFF container reading for AVI regions.
//!
//! RIFF frames a file as `"RIFF" <u32 size> <form type>` followed by chunks
//! of `<fourcc> <u32 len> <data>`, each padded to an even boundary. The
//! declared size covers the form type and every chunk, so the container's
//! on-disk footprint is `size + 8`.

use crate::cursor::ByteCursor;
use crate::error::{ResceneError, Result};

pub const RIFF_MAGIC: &[u8; 4] = b"RIFF";

#[derive(Debug)]
pub struct RiffReader<'a> {
    form_type: [u8; 4],
    payload: &'a [u8],
    total_size: usize,
}

impl<'a> RiffReader<'a> {
    /// Parse the container header. A declared size running past the input is
    /// a hard error.
    pub fn new(input: &'a [u8]) -> Result<Self> {
        let mut cur = ByteCursor::new(input);
        let magic = cur.read_bytes(4)?;
        if magic != RIFF_MAGIC {
            return Err(ResceneError::BadBlock);
        }
        let riff_size = cur.read_u32()? as usize;
        let total_size = riff_size + 8;
        if riff_size < 4 || total_size > input.len() {
            return Err(ResceneError::Underrun {
                needed: total_size,
                have: input.len(),
            });
        }
        let mut form_type = [0u8; 4];
        form_type.copy_from_slice(cur.read_bytes(4)?);
        let payload = &input[12..total_size];
        Ok(RiffReader {
            form_type,
            payload,
            total_size,
        })
    }

    pub fn form_type(&self) -> [u8; 4] {
        self.form_type
    }

    /// On-disk footprint of the whole container.
    pub fn total_size(&self) -> usize {
        self.total_size
    }

    /// Iterate the top-level chunks.
    pub fn chunks(&self) -> RiffChunks<'a> {
        RiffChunks {
            data: self.payload,
            pos: 0,
        }
    }
}

pub struct RiffChunks<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Iterator for RiffChunks<'a> {
    type Item = Result<([u8; 4], &'a [u8])>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.data.len() {
            return None;
        }
        let rest = &self.data[self.pos..];
        let mut cur = ByteCursor::new(rest);
        let header = match cur.read_bytes(8) {
            Ok(h) => h,
            Err(e) => return Some(Err(e)),
        };
        let mut id = [0u8; 4];
        id.copy_from_slice(&header[..4]);
        let len = u32::from_le_bytes([header[4], header[5], header[6], header[7]]) as usize;
        let data = match cur.read_bytes(len) {
            Ok(d) => d,
            Err(e) => return Some(Err(e)),
        };
        // Chunks are word-aligned; a pad byte follows an odd length.
        self.pos += 8 + len + (len & 1);
        Some(Ok((id, data)))
    }
}
