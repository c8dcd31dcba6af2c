//! Old-style protect head (0x78) — recovery-record metadata. The sector
//! data itself is stripped from the SRR container.

use super::header::{RarHeader, HAS_DATA};
use crate::cursor::ByteCursor;
use crate::error::{ResceneError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectBlock {
    pub header: RarHeader,
    pub packed_size: u32,
    pub version: u8,
    pub rec_sector_count: u16,
    pub data_sector_count: u32,
}

impl ProtectBlock {
    pub fn parse(header: RarHeader, block: &[u8]) -> Result<Self> {
        if !header.has(HAS_DATA) {
            return Err(ResceneError::BadBlock);
        }
        let mut cur = ByteCursor::new(block);
        cur.read_bytes(RarHeader::SIZE)?;
        let packed_size = cur.read_u32()?;
        let version = cur.read_u8()?;
        let rec_sector_count = cur.read_u16()?;
        let data_sector_count = cur.read_u32()?;
        Ok(ProtectBlock {
            header,
            packed_size,
            version,
            rec_sector_count,
            data_sector_count,
        })
    }

    /// Bytes this block stands for in the reconstructed RAR volume.
    pub fn accounted_size(&self) -> u64 {
        u64::from(self.header.size) + u64::from(self.packed_size)
    }
}
