//! Byte-level builders for SRR test inputs.

#![allow(dead_code)]

use rescene::blocks::header::{HAS_DATA, SRR_APP_NAME};

pub fn raw_header(crc: u16, block_type: u8, flags: u16, size: u16) -> Vec<u8> {
    let mut b = Vec::new();
    b.extend_from_slice(&crc.to_le_bytes());
    b.push(block_type);
    b.extend_from_slice(&flags.to_le_bytes());
    b.extend_from_slice(&size.to_le_bytes());
    b
}

pub fn srr_vol_head(app_name: &str) -> Vec<u8> {
    let size = (7 + 2 + app_name.len()) as u16;
    let mut b = raw_header(0x6969, 0x69, SRR_APP_NAME, size);
    b.extend_from_slice(&(app_name.len() as u16).to_le_bytes());
    b.extend_from_slice(app_name.as_bytes());
    b
}

pub fn stored_file(path: &str, data: &[u8]) -> Vec<u8> {
    let size = (7 + 4 + 2 + path.len()) as u16;
    let mut b = raw_header(0x6A6A, 0x6A, HAS_DATA, size);
    b.extend_from_slice(&(data.len() as u32).to_le_bytes());
    b.extend_from_slice(&(path.len() as u16).to_le_bytes());
    b.extend_from_slice(path.as_bytes());
    b.extend_from_slice(data);
    b
}

pub fn oso_hash(path: &str, file_size: u64, hash: u64) -> Vec<u8> {
    let size = (7 + 8 + 8 + 2 + path.len()) as u16;
    let mut b = raw_header(0x6B6B, 0x6B, 0, size);
    b.extend_from_slice(&file_size.to_le_bytes());
    b.extend_from_slice(&hash.to_le_bytes());
    b.extend_from_slice(&(path.len() as u16).to_le_bytes());
    b.extend_from_slice(path.as_bytes());
    b
}

pub fn pad_block(pad: &[u8]) -> Vec<u8> {
    let mut b = raw_header(0x6C6C, 0x6C, HAS_DATA, 7 + 4);
    b.extend_from_slice(&(pad.len() as u32).to_le_bytes());
    b.extend_from_slice(pad);
    b
}

pub fn rar_sub_block(name: &str) -> Vec<u8> {
    let size = (7 + 2 + name.len()) as u16;
    let mut b = raw_header(0x7171, 0x71, 0, size);
    b.extend_from_slice(&(name.len() as u16).to_le_bytes());
    b.extend_from_slice(name.as_bytes());
    b
}

/// The literal RAR marker bytes: "Rar!\x1a\x07\x00".
pub fn mark_head() -> Vec<u8> {
    vec![0x52, 0x61, 0x72, 0x21, 0x1A, 0x07, 0x00]
}

pub const MAIN_HEAD_SIZE: u16 = 13;

pub fn main_head(flags: u16) -> Vec<u8> {
    let mut b = raw_header(0, 0x73, flags, MAIN_HEAD_SIZE);
    b.extend_from_slice(&[0u8; 6]);
    b
}

pub fn end_arc() -> Vec<u8> {
    raw_header(0, 0x7B, 0, 7)
}

/// A RAR file head. The packed payload never follows it in an SRR stream.
pub struct FileHeadSpec<'a> {
    pub name: &'a str,
    pub pack: u32,
    pub unpack: u32,
    pub method: u8,
    pub crc: u32,
    pub flags: u16,
    pub large: Option<(u32, u32)>,
}

impl Default for FileHeadSpec<'_> {
    fn default() -> Self {
        FileHeadSpec {
            name: "file.bin",
            pack: 0,
            unpack: 0,
            method: 0x30,
            crc: 0,
            flags: 0,
            large: None,
        }
    }
}

impl FileHeadSpec<'_> {
    pub fn build(&self) -> Vec<u8> {
        let mut size = 7 + 25 + self.name.len();
        if self.large.is_some() {
            size += 8;
        }
        let mut b = raw_header(0, 0x74, self.flags, size as u16);
        b.extend_from_slice(&self.pack.to_le_bytes());
        b.extend_from_slice(&self.unpack.to_le_bytes());
        b.push(0x02);
        b.extend_from_slice(&self.crc.to_le_bytes());
        b.extend_from_slice(&0u32.to_le_bytes());
        b.push(20);
        b.push(self.method);
        b.extend_from_slice(&(self.name.len() as u16).to_le_bytes());
        b.extend_from_slice(&0u32.to_le_bytes());
        if let Some((high_pack, high_unpack)) = self.large {
            b.extend_from_slice(&high_pack.to_le_bytes());
            b.extend_from_slice(&high_unpack.to_le_bytes());
        }
        b.extend_from_slice(self.name.as_bytes());
        b
    }

    pub fn header_size(&self) -> u64 {
        let mut size = 7 + 25 + self.name.len();
        if self.large.is_some() {
            size += 8;
        }
        size as u64
    }
}

/// A new-sub head followed by `payload` bytes of its stream.
pub fn new_sub_head(name: &str, pack: u32, payload: &[u8]) -> Vec<u8> {
    let size = (7 + 25 + name.len()) as u16;
    let mut b = raw_header(0, 0x7A, 0, size);
    b.extend_from_slice(&pack.to_le_bytes());
    b.extend_from_slice(&pack.to_le_bytes());
    b.push(0x02);
    b.extend_from_slice(&0u32.to_le_bytes());
    b.extend_from_slice(&0u32.to_le_bytes());
    b.push(29);
    b.push(0x30);
    b.extend_from_slice(&(name.len() as u16).to_le_bytes());
    b.extend_from_slice(&0u32.to_le_bytes());
    b.extend_from_slice(name.as_bytes());
    b.extend_from_slice(payload);
    b
}

pub fn concat(parts: &[Vec<u8>]) -> Vec<u8> {
    parts.iter().flatten().copied().collect()
}
