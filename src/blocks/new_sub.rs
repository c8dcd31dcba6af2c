//! RAR new-sub head (0x7A) — an embedded auxiliary stream such as the
//! recovery record ("RR"), comment ("CMT") or authenticity ("AV") data.
//!
//! The wire layout matches the file head, but the two are distinct blocks:
//! a new-sub name is never unicode-split, and an "RR" stream has its payload
//! stripped from the SRR container while every other new-sub keeps it.

use super::header::{RarHeader, LHD_LARGE, LHD_SALT};
use crate::cursor::ByteCursor;
use crate::error::Result;

use super::file_head::LargeSizes;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubBlock {
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

impl NewSubBlock {
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
        Ok(NewSubBlock {
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

    pub fn file_name(&self) -> String {
        if self.name_size == 0 {
            return String::new();
        }
        String::from_utf8_lossy(&self.file_name_raw).into_owned()
    }

    pub fn pack_size(&self) -> u64 {
        match self.large {
            Some(l) => (u64::from(l.pack) << 32) | u64::from(self.low_pack_size),
            None => u64::from(self.low_pack_size),
        }
    }

    /// Bytes this block stands for in the reconstructed RAR volume.
    pub fn accounted_size(&self) -> u64 {
        u64::from(self.header.size) + self.pack_size()
    }
}
