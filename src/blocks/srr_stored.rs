//! SRR stored file (0x6A) — an accessory file (SFV, NFO, proof) embedded
//! verbatim in the SRR container.

use super::header::{RarHeader, HAS_DATA};
use super::check_magic;
use crate::cursor::ByteCursor;
use crate::error::{ResceneError, Result};
use crate::srr::StoredFile;

pub const MAGIC: u16 = 0x6A6A;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SrrStoredFileBlock {
    pub header: RarHeader,
    pub data_size: u32,
    pub name_size: u16,
    pub file_name: String,
    pub file_data: Vec<u8>,
}

impl SrrStoredFileBlock {
    pub fn parse(header: RarHeader, block: &[u8]) -> Result<Self> {
        check_magic(&header, MAGIC)?;
        if !header.has(HAS_DATA) {
            return Err(ResceneError::BadBlock);
        }
        let mut cur = ByteCursor::new(block);
        cur.read_bytes(RarHeader::SIZE)?;
        let data_size = cur.read_u32()?;
        let name_size = cur.read_u16()?;
        let file_name = String::from_utf8_lossy(cur.read_bytes(name_size as usize)?).into_owned();
        let file_data = cur.read_bytes(data_size as usize)?.to_vec();
        Ok(SrrStoredFileBlock {
            header,
            data_size,
            name_size,
            file_name,
            file_data,
        })
    }

    /// Header plus the inline file contents.
    pub fn footprint(&self) -> usize {
        self.header.size as usize + self.data_size as usize
    }

    /// The embedded file as an output record. A nameless entry is a no-data
    /// error; zero-length contents are legal.
    pub fn stored_file(&self) -> Result<StoredFile> {
        if self.name_size == 0 {
            return Err(ResceneError::NoData);
        }
        Ok(StoredFile {
            path: self.file_name.clone(),
            data: self.file_data.clone(),
        })
    }
}
