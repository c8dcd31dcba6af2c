//! The 7-byte common header shared by every SRR/RAR block.

use crate::cursor::ByteCursor;
use crate::domain::HeaderFlags;
use crate::error::Result;

// Main-head flags.
pub const MHD_VOLUME: u16 = 0x0001;
pub const MHD_COMMENT: u16 = 0x0002;
pub const MHD_LOCK: u16 = 0x0004;
pub const MHD_SOLID: u16 = 0x0008;
pub const MHD_NEWNUMBERING: u16 = 0x0010;
pub const MHD_AV: u16 = 0x0020;
pub const MHD_PROTECT: u16 = 0x0040;
pub const MHD_PASSWORD: u16 = 0x0080;
pub const MHD_FIRSTVOLUME: u16 = 0x0100;
pub const MHD_ENCRYPTVER: u16 = 0x0200;

// File-head and new-sub-head flags.
pub const LHD_SPLIT_BEFORE: u16 = 0x0001;
pub const LHD_SPLIT_AFTER: u16 = 0x0002;
pub const LHD_PASSWORD: u16 = 0x0004;
pub const LHD_COMMENT: u16 = 0x0008;
pub const LHD_SOLID: u16 = 0x0010;
pub const LHD_LARGE: u16 = 0x0100;
pub const LHD_UNICODE: u16 = 0x0200;
pub const LHD_SALT: u16 = 0x0400;
pub const LHD_VERSION: u16 = 0x0800;
pub const LHD_EXTTIME: u16 = 0x1000;
pub const LHD_EXTFLAGS: u16 = 0x2000;

/// Gates post-header opaque payload (stored-file, pad, protect blocks).
pub const HAS_DATA: u16 = 0x8000;

/// Gates the app-name tail of an SRR volume head.
pub const SRR_APP_NAME: u16 = 0x0001;

/// The four common fields every block starts with, plus the raw type byte.
///
/// For the custom SRR block types the `crc` field holds a type-repetition
/// magic instead of a checksum; the variant decoders validate it. `size` is
/// the raw 16-bit block size from the wire and does not include any
/// variable-length trailing data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RarHeader {
    pub crc: u16,
    pub block_type: u8,
    pub flags: HeaderFlags,
    pub size: u16,
}

impl RarHeader {
    /// On-disk length of the common header.
    pub const SIZE: usize = 7;

    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut cur = ByteCursor::new(data);
        let crc = cur.read_u16()?;
        let block_type = cur.read_u8()?;
        let flags = HeaderFlags::new(cur.read_u16()?);
        let size = cur.read_u16()?;
        Ok(RarHeader {
            crc,
            block_type,
            flags,
            size,
        })
    }

    pub fn has(&self, flag: u16) -> bool {
        self.flags.has(flag)
    }
}
