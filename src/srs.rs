//! The SRS stream walker.
//!
//! An SRS file interleaves an original media stream (MKV, AVI, MP3) with
//! `SRS*` marker blocks and audio tag containers. The walker sniffs the
//! block type at each offset, asks the matching decoder for the block's
//! on-disk size, and advances until the input is exhausted or an
//! unrecognized region is reached.

use log::{debug, trace};

use crate::cursor::ByteCursor;
use crate::error::{ResceneError, Result};
use crate::media::ebml::{self, ElementInfo, MkvHandler};
use crate::media::id3::{Id3v1Tag, Id3v2Tag, Lyrics3Tag};
use crate::media::riff::RiffReader;
use crate::sniff::{FileKind, FileTypeRegistry};

/// An SRS marker block: a 4-byte tag and the block length, which covers the
/// 8-byte header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SrsMarker {
    pub tag: [u8; 4],
    pub length: u32,
}

impl SrsMarker {
    pub fn parse(input: &[u8]) -> Result<Self> {
        let mut cur = ByteCursor::new(input);
        let mut tag = [0u8; 4];
        tag.copy_from_slice(cur.read_bytes(4)?);
        let length = cur.read_u32()?;
        Ok(SrsMarker { tag, length })
    }
}

/// A recognized Matroska region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MkvRegion {
    pub size: usize,
}

/// A recognized RIFF/AVI region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AviRegion {
    pub form_type: [u8; 4],
    pub size: usize,
}

/// One decoded block of an SRS stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SrsBlock {
    Id3v1(Id3v1Tag),
    Id3v2(Id3v2Tag),
    Lyrics3(Lyrics3Tag),
    Marker(SrsMarker),
    Mkv(MkvRegion),
    Avi(AviRegion),
}

impl SrsBlock {
    /// On-disk size of the block.
    pub fn size(&self) -> usize {
        match self {
            SrsBlock::Id3v1(tag) => tag.size(),
            SrsBlock::Id3v2(tag) => tag.total_size(),
            SrsBlock::Lyrics3(tag) => tag.size(),
            SrsBlock::Marker(marker) => marker.length as usize,
            SrsBlock::Mkv(region) => region.size,
            SrsBlock::Avi(region) => region.size,
        }
    }
}

/// The block sequence produced by one SRS parse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SrsFile {
    pub blocks: Vec<SrsBlock>,
}

/// Records the end of the top-level Matroska master elements, which is the
/// on-disk size of the region.
#[derive(Default)]
struct RegionEndHandler {
    end: usize,
}

impl MkvHandler for RegionEndHandler {
    fn on_master(&mut self, id: u32, info: ElementInfo) -> bool {
        if info.level == 0 {
            self.end = info.offset + info.size;
        }
        trace!("mkv master {:#x} ends at {:#x}", id, info.offset + info.size);
        true
    }
}

fn build_registry() -> FileTypeRegistry {
    let mut registry = FileTypeRegistry::new();
    registry.add_matcher(FileKind::Srs, |b| {
        b.len() > 4 && b.starts_with(b"SRS") && matches!(b[3], b'F' | b'T' | b'P')
    });
    registry.add_matcher(FileKind::Id3v1, |b| b.len() >= 128 && b.starts_with(b"TAG"));
    registry.add_matcher(FileKind::Lyrics3, |b| {
        b.len() >= 11 && b.starts_with(b"LYRICSBEGIN")
    });
    registry
}

impl SrsFile {
    /// Parse an SRS byte slice into its block sequence.
    ///
    /// A FLAC region or an unknown region ends the walk successfully; a
    /// recognized block that fails to decode is a hard error.
    pub fn parse(input: &[u8]) -> Result<SrsFile> {
        let registry = build_registry();
        let mut blocks = Vec::new();
        let mut offset = 0usize;

        while offset < input.len() {
            let rest = &input[offset..];
            let kind = registry.sniff(rest);
            debug!("offset {:#07x}: {:?}", offset, kind);

            let block = match kind {
                FileKind::Mp3 => SrsBlock::Id3v2(Id3v2Tag::parse(rest)?),
                FileKind::Id3v1 => SrsBlock::Id3v1(Id3v1Tag::parse(rest)?),
                FileKind::Srs => {
                    let marker = SrsMarker::parse(rest)?;
                    debug!(
                        "marker {} : len {}",
                        String::from_utf8_lossy(&marker.tag),
                        marker.length
                    );
                    SrsBlock::Marker(marker)
                }
                FileKind::Lyrics3 => SrsBlock::Lyrics3(Lyrics3Tag::parse(rest)?),
                FileKind::Matroska => {
                    let mut handler = RegionEndHandler::default();
                    ebml::parse(rest, &mut handler)?;
                    SrsBlock::Mkv(MkvRegion { size: handler.end })
                }
                FileKind::Avi => {
                    let reader = RiffReader::new(rest)?;
                    debug!("RIFF({})", String::from_utf8_lossy(&reader.form_type()));
                    for chunk in reader.chunks() {
                        let (id, data) = chunk?;
                        trace!("riff chunk {}: {} bytes", String::from_utf8_lossy(&id), data.len());
                    }
                    SrsBlock::Avi(AviRegion {
                        form_type: reader.form_type(),
                        size: reader.total_size(),
                    })
                }
                FileKind::Flac | FileKind::Unknown => break,
            };

            let advance = block.size();
            if advance == 0 {
                // A zero-length block would stall the walk forever.
                return Err(ResceneError::BadFile);
            }
            blocks.push(block);
            offset = offset
                .checked_add(advance)
                .ok_or(ResceneError::BadFile)?;
        }
        Ok(SrsFile { blocks })
    }
}
