//! Error types for SRR/SRS parsing.

use thiserror::Error;

/// Errors surfaced by the SRR and SRS parsers.
///
/// Every variant is fatal to the current parse; there is no partial-result
/// mode. Unknown block tags at the top level are not errors — both walkers
/// stop cleanly when they no longer recognize the input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResceneError {
    /// A custom SRR block's CRC field did not match its type-repetition magic.
    #[error("block crc {found:#06x} does not match magic {expected:#06x}")]
    CrcMismatch { expected: u16, found: u16 },

    /// A block invariant was violated (e.g. a stored-file block without the
    /// HAS_DATA flag).
    #[error("block not properly formatted")]
    BadBlock,

    /// A walker-level invariant was violated (e.g. a mark head outside a
    /// sub-block context, or a truncated common header).
    #[error("file not properly formatted")]
    BadFile,

    /// Reconstructed state disagrees with a new block (e.g. a packed-file
    /// path mismatch across a split).
    #[error("incorrect data")]
    BadData,

    /// A block's mandatory fields are zero.
    #[error("no data")]
    NoData,

    /// Two SFV lines bind the same file to different CRC-32 values.
    #[error("duplicate file in sfv")]
    DuplicateSfv,

    /// A read ran past the end of the input buffer.
    #[error("buffer underrun: need {needed} bytes, have {have}")]
    Underrun { needed: usize, have: usize },
}

/// Type alias for Result with ResceneError.
pub type Result<T> = std::result::Result<T, ResceneError>;
