//! SRR rar sub-block head (0x71) — announces the next reconstructed RAR
//! volume by file name.

use super::header::RarHeader;
use super::check_magic;
use crate::cursor::ByteCursor;
use crate::error::Result;

pub const MAGIC: u16 = 0x7171;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SrrSubBlock {
    pub header: RarHeader,
    pub file_name: String,
}

impl SrrSubBlock {
    pub fn parse(header: RarHeader, block: &[u8]) -> Result<Self> {
        check_magic(&header, MAGIC)?;
        let mut cur = ByteCursor::new(block);
        cur.read_bytes(RarHeader::SIZE)?;
        let name_size = cur.read_u16()? as usize;
        let file_name = String::from_utf8_lossy(cur.read_bytes(name_size)?).into_owned();
        Ok(SrrSubBlock { header, file_name })
    }

    pub fn footprint(&self) -> usize {
        self.header.size as usize
    }
}
