//! SRR volume head (0x69) — the first block of every SRR file.

use super::header::{RarHeader, SRR_APP_NAME};
use super::check_magic;
use crate::cursor::ByteCursor;
use crate::error::Result;

pub const MAGIC: u16 = 0x6969;

/// Carries the name of the application that created the SRR file, gated by
/// the [`SRR_APP_NAME`] flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SrrVolHeadBlock {
    pub header: RarHeader,
    pub app_name: String,
}

impl SrrVolHeadBlock {
    pub fn parse(header: RarHeader, block: &[u8]) -> Result<Self> {
        check_magic(&header, MAGIC)?;
        let mut app_name = String::new();
        if header.has(SRR_APP_NAME) {
            let mut cur = ByteCursor::new(block);
            cur.read_bytes(RarHeader::SIZE)?;
            let name_len = cur.read_u16()? as usize;
            app_name = String::from_utf8_lossy(cur.read_bytes(name_len)?).into_owned();
        }
        Ok(SrrVolHeadBlock { header, app_name })
    }

    /// Cursor advance for this block.
    pub fn footprint(&self) -> usize {
        self.header.size as usize
    }
}
