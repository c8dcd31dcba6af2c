//! Readers for the rescene preservation formats.
//!
//! - **SRR** ("stored release reconstruction"): an index of one or more RAR
//!   volumes plus embedded accessory files (SFV, NFO, proofs), framed with
//!   the RAR 4.x block layout and a handful of custom block types.
//! - **SRS** ("sample reconstruction"): a media sample container that
//!   interleaves the original stream (MKV, AVI, MP3) with marker blocks and
//!   audio tags (ID3v1, ID3v2, Lyrics3 v2.00).
//!
//! Both parsers run a single forward pass over an in-memory byte slice and
//! return owned record sets. The caller picks the entry point by file
//! extension; the parsers do not sniff between the two formats.
//!
//! ```no_run
//! use rescene::SrrFile;
//!
//! let bytes = std::fs::read("release.srr")?;
//! let srr = SrrFile::parse(&bytes)?;
//! for rar in &srr.rar_files {
//!     println!("{} {} {}", rar.path, rar.size, rar.crc);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod args;
pub mod blocks;
pub mod cursor;
pub mod domain;
pub mod error;
pub mod media;
mod sfv;
pub mod sniff;
pub mod srr;
pub mod srs;

pub use args::parse_args;
pub use domain::{Crc32Value, HeaderFlags};
pub use error::{ResceneError, Result};
pub use srr::{rar_root_name, OsoHash, PackedFile, RarFile, SrrFile, StoredFile};
pub use srs::{AviRegion, MkvRegion, SrsBlock, SrsFile, SrsMarker};
