//! OSO/ISDb hash block (0x6B) — a 64-bit OpenSubtitles video hash stored
//! alongside the release.

use super::header::RarHeader;
use super::check_magic;
use crate::cursor::ByteCursor;
use crate::error::{ResceneError, Result};
use crate::srr::OsoHash;

pub const MAGIC: u16 = 0x6B6B;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OsoHashBlock {
    pub header: RarHeader,
    pub file_size: u64,
    pub oso_hash: u64,
    pub name_size: u16,
    pub file_name: String,
}

impl OsoHashBlock {
    pub fn parse(header: RarHeader, block: &[u8]) -> Result<Self> {
        check_magic(&header, MAGIC)?;
        let mut cur = ByteCursor::new(block);
        cur.read_bytes(RarHeader::SIZE)?;
        let file_size = cur.read_u64()?;
        let oso_hash = cur.read_u64()?;
        let name_size = cur.read_u16()?;
        let file_name = String::from_utf8_lossy(cur.read_bytes(name_size as usize)?).into_owned();
        Ok(OsoHashBlock {
            header,
            file_size,
            oso_hash,
            name_size,
            file_name,
        })
    }

    /// The name is part of the declared header size; there is no payload.
    pub fn footprint(&self) -> usize {
        self.header.size as usize
    }

    /// All three fields are mandatory; any zero value is a no-data error.
    pub fn oso_hash(&self) -> Result<OsoHash> {
        if self.file_size == 0 || self.oso_hash == 0 || self.name_size == 0 {
            return Err(ResceneError::NoData);
        }
        Ok(OsoHash {
            path: self.file_name.clone(),
            size: self.file_size,
            hash: self.oso_hash,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(file_size: u64, hash: u64, name: &[u8]) -> Vec<u8> {
        let size = (RarHeader::SIZE + 8 + 8 + 2 + name.len()) as u16;
        let mut b = Vec::new();
        b.extend_from_slice(&MAGIC.to_le_bytes());
        b.push(0x6B);
        b.extend_from_slice(&0u16.to_le_bytes());
        b.extend_from_slice(&size.to_le_bytes());
        b.extend_from_slice(&file_size.to_le_bytes());
        b.extend_from_slice(&hash.to_le_bytes());
        b.extend_from_slice(&(name.len() as u16).to_le_bytes());
        b.extend_from_slice(name);
        b
    }

    #[test]
    fn extracts_hash_record() {
        let data = block(734_003_200, 0x8E24_5D94_6842_1F23, b"sample.mkv");
        let header = RarHeader::parse(&data).unwrap();
        let parsed = OsoHashBlock::parse(header, &data).unwrap();
        let hash = parsed.oso_hash().unwrap();
        assert_eq!(hash.path, "sample.mkv");
        assert_eq!(hash.size, 734_003_200);
        assert_eq!(hash.hash, 0x8E24_5D94_6842_1F23);
        assert_eq!(parsed.footprint(), data.len());
    }

    #[test]
    fn any_zero_field_is_a_no_data_error() {
        for data in [
            block(0, 1, b"x"),
            block(1, 0, b"x"),
            block(1, 1, b""),
        ] {
            let header = RarHeader::parse(&data).unwrap();
            let parsed = OsoHashBlock::parse(header, &data).unwrap();
            assert_eq!(parsed.oso_hash(), Err(ResceneError::NoData));
        }
    }
}
