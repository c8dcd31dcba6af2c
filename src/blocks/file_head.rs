//! RAR file head (0x74) — the packed-file record of a RAR volume.
//!
//! The SRR container keeps these headers but strips the packed payload that
//! would follow them in a real RAR volume, so the walker advances by the
//! header size only while the size accounting covers header plus payload.

use super::header::{RarHeader, LHD_LARGE, LHD_SALT, LHD_UNICODE};
use crate::cursor::ByteCursor;
use crate::domain::Crc32Value;
use crate::error::Result;

/// RAR method byte for uncompressed storage.
pub const METHOD_STORE: u8 = 0x30;

/// High 32 bits of the pack/unpack sizes, present only with [`LHD_LARGE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LargeSizes {
    pub pack: u32,
    pub unpack: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHeadBlock {
    pub header: RarHeader,
    pub low_pack_size: u32,
    pub low_unpack_size: u32,
    pub host_os: u8,
    pub file_crc: u32,
    pub file_time: u32,
    pub unpack_version: u8,
    pub method: u8,
    pub name_size: u16,
    pub file_attr: u32,
    pub large: Option<LargeSizes>,
    pub file_name_raw: Vec<u8>,
    pub salt: Option<u64>,
}

impl FileHeadBlock {
    pub fn parse(header: RarHeader, block: &[u8]) -> Result<Self> {
        let mut cur = ByteCursor::new(block);
        cur.read_bytes(RarHeader::SIZE)?;
        let low_pack_size = cur.read_u32()?;
        let low_unpack_size = cur.read_u32()?;
        let host_os = cur.read_u8()?;
        let file_crc = cur.read_u32()?;
        let file_time = cur.read_u32()?;
        let unpack_version = cur.read_u8()?;
        let method = cur.read_u8()?;
        let name_size = cur.read_u16()?;
        let file_attr = cur.read_u32()?;
        let large = if header.has(LHD_LARGE) {
            Some(LargeSizes {
                pack: cur.read_u32()?,
                unpack: cur.read_u32()?,
            })
        } else {
            None
        };
        let file_name_raw = cur.read_bytes(name_size as usize)?.to_vec();
        let salt = if header.has(LHD_SALT) {
            Some(cur.read_u64()?)
        } else {
            None
        };
        Ok(FileHeadBlock {
            header,
            low_pack_size,
            low_unpack_size,
            host_os,
            file_crc,
            file_time,
            unpack_version,
            method,
            name_size,
            file_attr,
            large,
            file_name_raw,
            salt,
        })
    }

    /// Effective pack size: the high word contributes only when present.
    pub fn pack_size(&self) -> u64 {
        match self.large {
            Some(l) => (u64::from(l.pack) << 32) | u64::from(self.low_pack_size),
            None => u64::from(self.low_pack_size),
        }
    }

    pub fn unpack_size(&self) -> u64 {
        match self.large {
            Some(l) => (u64::from(l.unpack) << 32) | u64::from(self.low_unpack_size),
            None => u64::from(self.low_unpack_size),
        }
    }

    /// Effective file name. A unicode name is stored as two NUL-separated
    /// encodings; only the first segment is used.
    pub fn file_name(&self) -> String {
        if self.name_size == 0 {
            return String::new();
        }
        let raw = if self.header.has(LHD_UNICODE) {
            self.file_name_raw
                .split(|&b| b == 0)
                .next()
                .unwrap_or(&self.file_name_raw)
        } else {
            &self.file_name_raw[..]
        };
        String::from_utf8_lossy(raw).into_owned()
    }

    /// The stored CRC-32, or zero for a nameless record.
    pub fn crc(&self) -> Crc32Value {
        if self.name_size > 0 {
            Crc32Value::new(self.file_crc)
        } else {
            Crc32Value::new(0)
        }
    }

    pub fn is_compressed(&self) -> bool {
        self.method != METHOD_STORE
    }

    /// Bytes this block stands for in the reconstructed RAR volume: the
    /// header plus the stripped payload.
    pub fn accounted_size(&self) -> u64 {
        u64::from(self.header.size) + self.pack_size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::header::LHD_SPLIT_AFTER;

    pub(crate) fn build(
        name: &[u8],
        pack: u32,
        unpack: u32,
        method: u8,
        crc: u32,
        flags: u16,
        large: Option<(u32, u32)>,
    ) -> Vec<u8> {
        let mut size = RarHeader::SIZE + 25 + name.len();
        if large.is_some() {
            size += 8;
        }
        let mut b = Vec::new();
        b.extend_from_slice(&0u16.to_le_bytes());
        b.push(0x74);
        b.extend_from_slice(&flags.to_le_bytes());
        b.extend_from_slice(&(size as u16).to_le_bytes());
        b.extend_from_slice(&pack.to_le_bytes());
        b.extend_from_slice(&unpack.to_le_bytes());
        b.push(0x02); // host OS
        b.extend_from_slice(&crc.to_le_bytes());
        b.extend_from_slice(&0u32.to_le_bytes()); // file time
        b.push(20); // unpack version
        b.push(method);
        b.extend_from_slice(&(name.len() as u16).to_le_bytes());
        b.extend_from_slice(&0u32.to_le_bytes()); // attributes
        if let Some((hp, hu)) = large {
            b.extend_from_slice(&hp.to_le_bytes());
            b.extend_from_slice(&hu.to_le_bytes());
        }
        b.extend_from_slice(name);
        b
    }

    #[test]
    fn parses_fixed_fields() {
        let data = build(b"movie.mkv", 1000, 2000, 0x33, 0xCAFEBABE, LHD_SPLIT_AFTER, None);
        let header = RarHeader::parse(&data).unwrap();
        let parsed = FileHeadBlock::parse(header, &data).unwrap();
        assert_eq!(parsed.file_name(), "movie.mkv");
        assert_eq!(parsed.pack_size(), 1000);
        assert_eq!(parsed.unpack_size(), 2000);
        assert_eq!(parsed.crc(), 0xCAFEBABE_u32);
        assert!(parsed.is_compressed());
        assert_eq!(parsed.accounted_size(), header.size as u64 + 1000);
    }

    #[test]
    fn large_flag_extends_sizes() {
        let data = build(b"big.bin", 1, 2, METHOD_STORE, 0, LHD_LARGE, Some((3, 4)));
        let header = RarHeader::parse(&data).unwrap();
        let parsed = FileHeadBlock::parse(header, &data).unwrap();
        assert_eq!(parsed.pack_size(), (3u64 << 32) | 1);
        assert_eq!(parsed.unpack_size(), (4u64 << 32) | 2);
    }

    #[test]
    fn large_flag_with_zero_high_word_matches_plain_sizes() {
        let with = build(b"a", 77, 88, METHOD_STORE, 0, LHD_LARGE, Some((0, 0)));
        let without = build(b"a", 77, 88, METHOD_STORE, 0, 0, None);
        let hw = RarHeader::parse(&with).unwrap();
        let hn = RarHeader::parse(&without).unwrap();
        let pw = FileHeadBlock::parse(hw, &with).unwrap();
        let pn = FileHeadBlock::parse(hn, &without).unwrap();
        assert_eq!(pw.pack_size(), pn.pack_size());
        assert_eq!(pw.unpack_size(), pn.unpack_size());
    }

    #[test]
    fn unicode_name_keeps_first_segment() {
        let data = build(b"name.avi\0n\0a\0m\0e", 0, 0, METHOD_STORE, 0, LHD_UNICODE, None);
        let header = RarHeader::parse(&data).unwrap();
        let parsed = FileHeadBlock::parse(header, &data).unwrap();
        assert_eq!(parsed.file_name(), "name.avi");
    }

    #[test]
    fn salt_is_read_after_the_name() {
        let mut data = build(b"s.bin", 0, 0, METHOD_STORE, 0, LHD_SALT, None);
        // Rewrite the declared size to cover the salt, then append it.
        let size = u16::from_le_bytes([data[5], data[6]]) + 8;
        data[5..7].copy_from_slice(&size.to_le_bytes());
        data.extend_from_slice(&0x1122334455667788u64.to_le_bytes());
        let header = RarHeader::parse(&data).unwrap();
        let parsed = FileHeadBlock::parse(header, &data).unwrap();
        assert_eq!(parsed.salt, Some(0x1122334455667788));
    }

    #[test]
    fn nameless_record_has_zero_crc() {
        let data = build(b"", 0, 0, METHOD_STORE, 0xDEADBEEF, 0, None);
        let header = RarHeader::parse(&data).unwrap();
        let parsed = FileHeadBlock::parse(header, &data).unwrap();
        assert_eq!(parsed.file_name(), "");
        assert_eq!(parsed.crc(), 0u32);
    }
}
