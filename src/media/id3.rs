//! Audio tag containers: ID3v1, ID3v2 and Lyrics3 v2.00.

use log::trace;

use crate::cursor::ByteCursor;
use crate::error::{ResceneError, Result};

/// ID3v2 header length (and footprint overhead on top of the tag size).
pub const ID3V2_HEADER_LEN: usize = 10;

/// ID3v1 tags are a fixed 128-byte trailer block.
pub const ID3V1_LEN: usize = 128;

/// An ID3v2 tag header. Only the header is decoded; the frame data is
/// skipped by the declared size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Id3v2Tag {
    pub version: (u8, u8),
    pub flags: u8,
    tag_size: u32,
}

impl Id3v2Tag {
    pub fn parse(input: &[u8]) -> Result<Self> {
        let mut cur = ByteCursor::new(input);
        if cur.read_bytes(3)? != b"ID3" {
            return Err(ResceneError::BadBlock);
        }
        let version = (cur.read_u8()?, cur.read_u8()?);
        let flags = cur.read_u8()?;
        let size_bytes = cur.read_bytes(4)?;
        if size_bytes.iter().any(|&b| b & 0x80 != 0) {
            // Syncsafe bytes keep the high bit clear.
            return Err(ResceneError::BadBlock);
        }
        let tag_size = size_bytes
            .iter()
            .fold(0u32, |acc, &b| (acc << 7) | u32::from(b));
        Ok(Id3v2Tag {
            version,
            flags,
            tag_size,
        })
    }

    /// The tag size declared in the header, excluding the header itself.
    pub fn size(&self) -> usize {
        self.tag_size as usize
    }

    /// On-disk footprint of the tag block.
    pub fn total_size(&self) -> usize {
        self.size() + ID3V2_HEADER_LEN
    }
}

/// A decoded ID3v1 trailer tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Id3v1Tag {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub year: String,
    pub comment: String,
    pub genre: u8,
}

impl Id3v1Tag {
    pub fn parse(input: &[u8]) -> Result<Self> {
        let mut cur = ByteCursor::new(input);
        if cur.read_bytes(3)? != b"TAG" {
            return Err(ResceneError::BadBlock);
        }
        let title = text_field(cur.read_bytes(30)?);
        let artist = text_field(cur.read_bytes(30)?);
        let album = text_field(cur.read_bytes(30)?);
        let year = text_field(cur.read_bytes(4)?);
        let comment = text_field(cur.read_bytes(30)?);
        let genre = cur.read_u8()?;
        Ok(Id3v1Tag {
            title,
            artist,
            album,
            year,
            comment,
            genre,
        })
    }

    pub fn size(&self) -> usize {
        ID3V1_LEN
    }
}

fn text_field(raw: &[u8]) -> String {
    let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
    String::from_utf8_lossy(&raw[..end]).trim_end().to_string()
}

/// One `{3-byte id, 5-digit length}` field of a Lyrics3 v2.00 tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lyrics3Field {
    pub id: [u8; 3],
    pub data: Vec<u8>,
}

/// A Lyrics3 v2.00 tag: `LYRICSBEGIN`, a run of sized fields, and a trailer
/// of six size digits plus `LYRICS200`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lyrics3Tag {
    pub fields: Vec<Lyrics3Field>,
    size: usize,
}

const LYRICS_BEGIN: &[u8] = b"LYRICSBEGIN";
const LYRICS_END: &[u8] = b"LYRICS200";

impl Lyrics3Tag {
    pub fn parse(input: &[u8]) -> Result<Self> {
        if !input.starts_with(LYRICS_BEGIN) {
            return Err(ResceneError::BadBlock);
        }
        let mut fields = Vec::new();
        let mut offset = LYRICS_BEGIN.len();
        loop {
            if input.len() - offset < 15 {
                return Err(ResceneError::Underrun {
                    needed: 15,
                    have: input.len() - offset,
                });
            }
            if &input[offset + 6..offset + 15] == LYRICS_END {
                // Six size digits precede the trailer signature.
                let size = offset + 15;
                return Ok(Lyrics3Tag { fields, size });
            }
            let mut cur = ByteCursor::new(&input[offset..]);
            let mut id = [0u8; 3];
            id.copy_from_slice(cur.read_bytes(3)?);
            let len_digits = cur.read_bytes(5)?;
            if !len_digits.iter().all(u8::is_ascii_digit) {
                return Err(ResceneError::BadBlock);
            }
            let len: usize = len_digits
                .iter()
                .fold(0, |acc, &d| acc * 10 + usize::from(d - b'0'));
            let data = cur.read_bytes(len)?.to_vec();
            trace!(
                "lyrics3 field {}: {} bytes",
                String::from_utf8_lossy(&id),
                len
            );
            fields.push(Lyrics3Field { id, data });
            offset += 8 + len;
        }
    }

    /// On-disk footprint including the trailer.
    pub fn size(&self) -> usize {
        self.size
    }
}
