//! The SRR stream walker.
//!
//! An SRR file is a single forward run of RAR-framed blocks. The walker
//! decodes each block, maintains the reconstruction state for the RAR volume
//! and packed file currently being rebuilt, and emits the top-level record
//! set. After the walk, the SFV correlator back-fills RAR volume CRCs from
//! any stored `.sfv` manifests.

use log::trace;

use crate::blocks::{
    self, FileHeadBlock, NewSubBlock, OsoHashBlock, ProtectBlock, RarHeader, SrrPadBlock,
    SrrStoredFileBlock, SrrSubBlock, SrrVolHeadBlock,
};
use crate::blocks::header::{MHD_FIRSTVOLUME, MHD_NEWNUMBERING, LHD_SPLIT_BEFORE};
use crate::domain::Crc32Value;
use crate::error::{ResceneError, Result};
use crate::sfv;

/// An accessory file embedded verbatim in the SRR container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredFile {
    pub path: String,
    pub data: Vec<u8>,
}

/// An OpenSubtitles/ISDb hash record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OsoHash {
    pub path: String,
    pub size: u64,
    pub hash: u64,
}

/// One RAR volume of the release, reconstructed from the SRR framing.
///
/// `size` is the byte count of the rebuilt volume: every RAR-framing block
/// contributes its header, and file-head/new-sub/protect/pad blocks also
/// contribute the payload the SRR container stripped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RarFile {
    pub path: String,
    pub size: u64,
    pub crc: Crc32Value,
    pub is_first: bool,
    pub is_new_fmt: bool,
}

/// A file packed inside the RAR set, merged across split volumes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackedFile {
    pub path: String,
    pub size: u64,
    pub crc: Crc32Value,
}

/// The record set produced by one SRR parse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SrrFile {
    pub application_name: String,
    pub stored_files: Vec<StoredFile>,
    pub oso_hashes: Vec<OsoHash>,
    pub rar_files: Vec<RarFile>,
    pub rar_compressed: bool,
    pub packed_files: Vec<PackedFile>,
    pub sfv_comments: Vec<String>,
}

impl SrrFile {
    /// Parse an SRR byte slice into its record set.
    ///
    /// The input is read exactly once; the returned records own every
    /// allocation they reference. An unknown block tag ends the walk cleanly,
    /// every other irregularity is a hard error.
    pub fn parse(input: &[u8]) -> Result<SrrFile> {
        let mut walker = SrrWalker::new(input);
        walker.walk()?;
        let mut out = walker.out;
        sfv::correlate(&mut out)?;
        out.rar_files.sort_by(|a, b| {
            let la = a.path.to_lowercase();
            let lb = b.path.to_lowercase();
            la.cmp(&lb).then_with(|| a.path.cmp(&b.path))
        });
        Ok(out)
    }
}

struct SrrWalker<'a> {
    input: &'a [u8],
    offset: usize,
    prev_type: u8,
    out: SrrFile,
    /// Index of the open RAR volume record in `out.rar_files`.
    cur_rar: Option<usize>,
    /// Accounting target before the first sub-block head; discarded.
    orphan_rar: RarFile,
    cur_packed: PackedFile,
    /// Index of the open packed-file record in `out.packed_files`, if it
    /// survived deduplication.
    cur_packed_idx: Option<usize>,
}

impl<'a> SrrWalker<'a> {
    fn new(input: &'a [u8]) -> Self {
        SrrWalker {
            input,
            offset: 0,
            prev_type: 0,
            out: SrrFile::default(),
            cur_rar: None,
            orphan_rar: RarFile::default(),
            cur_packed: PackedFile::default(),
            cur_packed_idx: None,
        }
    }

    fn current_rar_mut(&mut self) -> &mut RarFile {
        match self.cur_rar {
            Some(i) => &mut self.out.rar_files[i],
            None => &mut self.orphan_rar,
        }
    }

    fn walk(&mut self) -> Result<()> {
        while self.offset < self.input.len() {
            let rest = &self.input[self.offset..];
            if rest.len() < RarHeader::SIZE {
                return Err(ResceneError::BadFile);
            }
            let header = RarHeader::parse(rest)?;
            trace!(
                "block {:#04x} at {:#x}: flags {:#06x} size {}",
                header.block_type,
                self.offset,
                header.flags.raw(),
                header.size
            );

            let mut next_prev = header.block_type;
            let advance: u64 = match header.block_type {
                blocks::SRR_VOL_HEAD => {
                    let block = SrrVolHeadBlock::parse(header, rest)?;
                    self.out.application_name = block.app_name;
                    u64::from(header.size)
                }
                blocks::SRR_STORED_FILE_HEAD => {
                    let block = SrrStoredFileBlock::parse(header, rest)?;
                    self.out.stored_files.push(block.stored_file()?);
                    block.footprint() as u64
                }
                blocks::OSO_HASH_HEAD => {
                    let block = OsoHashBlock::parse(header, rest)?;
                    self.out.oso_hashes.push(block.oso_hash()?);
                    block.footprint() as u64
                }
                blocks::SRR_RAR_PAD_HEAD => {
                    let block = SrrPadBlock::parse(header, rest)?;
                    self.current_rar_mut().size += u64::from(block.pad_size);
                    // The pad does not become the previous header: a mark is
                    // judged against the block before it.
                    next_prev = self.prev_type;
                    block.footprint() as u64
                }
                blocks::SRR_RAR_SUB_BLOCK_HEAD => {
                    let block = SrrSubBlock::parse(header, rest)?;
                    self.out.rar_files.push(RarFile {
                        path: block.file_name,
                        ..RarFile::default()
                    });
                    self.cur_rar = Some(self.out.rar_files.len() - 1);
                    u64::from(header.size)
                }
                blocks::MARK_HEAD => {
                    if self.prev_type != blocks::SRR_RAR_SUB_BLOCK_HEAD {
                        return Err(ResceneError::BadFile);
                    }
                    self.current_rar_mut().size += u64::from(header.size);
                    u64::from(header.size)
                }
                blocks::MAIN_HEAD => {
                    let rar = self.current_rar_mut();
                    rar.is_first = header.has(MHD_FIRSTVOLUME);
                    rar.is_new_fmt = header.has(MHD_NEWNUMBERING);
                    rar.size += u64::from(header.size);
                    u64::from(header.size)
                }
                blocks::FILE_HEAD => {
                    let block = FileHeadBlock::parse(header, rest)?;
                    self.apply_file_head(&block)?;
                    if block.is_compressed() {
                        self.out.rar_compressed = true;
                    }
                    self.current_rar_mut().size += block.accounted_size();
                    // Payload is stripped from the container.
                    u64::from(header.size)
                }
                blocks::PROTECT_HEAD => {
                    let block = ProtectBlock::parse(header, rest)?;
                    self.current_rar_mut().size += block.accounted_size();
                    // Sector data is stripped from the container.
                    u64::from(header.size)
                }
                blocks::NEW_SUB_HEAD => {
                    let block = NewSubBlock::parse(header, rest)?;
                    self.current_rar_mut().size += block.accounted_size();
                    if block.file_name() == "RR" {
                        // Recovery-record payload is stripped.
                        u64::from(header.size)
                    } else {
                        u64::from(header.size) + block.pack_size()
                    }
                }
                blocks::COMM_HEAD
                | blocks::AV_HEAD
                | blocks::SUB_HEAD
                | blocks::SIGN_HEAD
                | blocks::END_ARC_HEAD
                | blocks::EMPTY_HEAD => {
                    self.current_rar_mut().size += u64::from(header.size);
                    u64::from(header.size)
                }
                _ => return Ok(()),
            };

            if advance == 0 {
                // A zeroed size field would stall the walk forever.
                return Err(ResceneError::BadFile);
            }
            self.offset = self
                .offset
                .checked_add(advance as usize)
                .ok_or(ResceneError::BadFile)?;
            self.prev_type = next_prev;
        }
        Ok(())
    }

    /// Fold a file head into the packed-file reconstruction state.
    ///
    /// A head without `LHD_SPLIT_BEFORE` opens a fresh record, as does a
    /// named head arriving while the open record is nameless. The record in
    /// the output list is kept in sync across split continuations; a record
    /// suppressed as a duplicate accumulates invisibly, matching the shared
    /// mutation the format's reference readers rely on.
    fn apply_file_head(&mut self, block: &FileHeadBlock) -> Result<()> {
        let name = block.file_name();
        let starts_fresh = !block.header.has(LHD_SPLIT_BEFORE)
            || (self.cur_packed.path.is_empty() && !name.is_empty());
        if starts_fresh {
            self.cur_packed = PackedFile {
                path: name.clone(),
                size: 0,
                crc: block.crc(),
            };
            self.cur_packed_idx = None;
        }

        if self.cur_packed.path.is_empty() {
            self.cur_packed.path = name.clone();
        }
        if self.cur_packed.path != name {
            return Err(ResceneError::BadData);
        }
        self.cur_packed.crc = block.crc();
        if block.method == blocks::METHOD_STORE {
            // Stored data: each split carries a piece of the file.
            self.cur_packed.size += block.pack_size();
        } else {
            self.cur_packed.size = block.unpack_size();
        }

        match self.cur_packed_idx {
            Some(i) => self.out.packed_files[i] = self.cur_packed.clone(),
            None => {
                let duplicate = self
                    .out
                    .packed_files
                    .iter()
                    .any(|p| p.path == self.cur_packed.path && p.crc == self.cur_packed.crc);
                if !duplicate {
                    self.out.packed_files.push(self.cur_packed.clone());
                    self.cur_packed_idx = Some(self.out.packed_files.len() - 1);
                }
            }
        }
        Ok(())
    }
}

/// Map a RAR volume file name to its lowercased release root.
///
/// Recognized volume name shapes, tried in order: `.rNN`/`.sNN`/`.tNN`/
/// `.uNN`, a plain `.NNN` numeric suffix, `.partN.rar`, a `NN.rar`/`NNN.rar`
/// ending, and finally a bare `.rar`.
pub fn rar_root_name(path: &str) -> Option<String> {
    let b = path.as_bytes();
    let n = b.len();

    // name.r00 / name.s01 / name.t02 / name.u99
    if n >= 4 {
        let t = &b[n - 4..];
        if t[0] == b'.'
            && matches!(t[1], b'r' | b's' | b't' | b'u')
            && t[2].is_ascii_digit()
            && t[3].is_ascii_digit()
        {
            return Some(path[..n - 4].to_lowercase());
        }
    }
    // name.000
    if n >= 4 {
        let t = &b[n - 4..];
        if t[0] == b'.' && t[1..].iter().all(u8::is_ascii_digit) {
            return Some(path[..n - 4].to_lowercase());
        }
    }
    // name.partNN.rar
    if let Some(stem) = path.strip_suffix(".rar") {
        let sb = stem.as_bytes();
        let mut d = sb.len();
        while d > 0 && sb[d - 1].is_ascii_digit() {
            d -= 1;
        }
        if d < sb.len() {
            if let Some(base) = stem[..d].strip_suffix(".part") {
                return Some(base.to_lowercase());
            }
        }
    }
    // name99.rar / name999.rar (any separator byte before the digits)
    if n >= 6 && &b[n - 3..] == b"rar" {
        if b[n - 6].is_ascii_digit() && b[n - 5].is_ascii_digit() {
            return Some(path[..n - 6].to_lowercase());
        }
        if n >= 7 && b[n - 7].is_ascii_digit() && b[n - 6].is_ascii_digit() && b[n - 5].is_ascii_digit()
        {
            return Some(path[..n - 7].to_lowercase());
        }
    }
    // name.rar
    if let Some(base) = path.strip_suffix(".rar") {
        return Some(base.to_lowercase());
    }
    None
}
