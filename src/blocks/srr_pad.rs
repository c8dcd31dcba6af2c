//! SRR rar-padding block (0x6C) — opaque pad bytes accounted against the
//! current RAR volume's reconstructed size.

use super::header::{RarHeader, HAS_DATA};
use super::check_magic;
use crate::cursor::ByteCursor;
use crate::error::{ResceneError, Result};

pub const MAGIC: u16 = 0x6C6C;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SrrPadBlock {
    pub header: RarHeader,
    pub pad_size: u32,
}

impl SrrPadBlock {
    pub fn parse(header: RarHeader, block: &[u8]) -> Result<Self> {
        check_magic(&header, MAGIC)?;
        if !header.has(HAS_DATA) {
            return Err(ResceneError::BadBlock);
        }
        let mut cur = ByteCursor::new(block);
        cur.read_bytes(RarHeader::SIZE)?;
        let pad_size = cur.read_u32()?;
        // The pad bytes themselves carry no information, but a declared size
        // running past the input is still a hard error.
        cur.read_bytes(pad_size as usize)?;
        Ok(SrrPadBlock { header, pad_size })
    }

    pub fn footprint(&self) -> usize {
        self.header.size as usize + self.pad_size as usize
    }
}
