//! File-type sniffing for the SRS walker.
//!
//! A registry of magic-byte predicates, queried in a deterministic order:
//! custom matchers first (in registration order), then the builtin media
//! matchers. The SRS walker registers its own matchers for the marker
//! blocks and the tag formats the builtin set does not know.

/// Block kinds the SRS walker can encounter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// An MP3 stream opening with an ID3v2 tag.
    Mp3,
    Matroska,
    Flac,
    Avi,
    /// An SRS marker block (`SRSF`/`SRST`/`SRSP`).
    Srs,
    Id3v1,
    Lyrics3,
    Unknown,
}

type BuiltinMatcher = fn(&[u8]) -> bool;

const BUILTINS: &[(FileKind, BuiltinMatcher)] = &[
    (FileKind::Mp3, is_mp3),
    (FileKind::Matroska, is_matroska),
    (FileKind::Flac, is_flac),
    (FileKind::Avi, is_avi),
];

fn is_mp3(buf: &[u8]) -> bool {
    // Only the ID3v2 form: a bare MPEG sync frame carries no tag to size.
    buf.len() > 2 && buf.starts_with(b"ID3")
}

fn is_matroska(buf: &[u8]) -> bool {
    buf.len() > 4
        && buf.starts_with(&[0x1A, 0x45, 0xDF, 0xA3])
        && contains(&buf[..buf.len().min(4096)], b"matroska")
}

fn is_flac(buf: &[u8]) -> bool {
    buf.len() > 3 && buf.starts_with(b"fLaC")
}

fn is_avi(buf: &[u8]) -> bool {
    buf.len() > 10 && buf.starts_with(b"RIFF") && &buf[8..11] == b"AVI"
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

/// Runtime-extensible magic-byte dispatch.
#[derive(Default)]
pub struct FileTypeRegistry {
    custom: Vec<(FileKind, Box<dyn Fn(&[u8]) -> bool>)>,
}

impl FileTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a custom matcher, consulted before the builtin set.
    pub fn add_matcher(&mut self, kind: FileKind, matcher: impl Fn(&[u8]) -> bool + 'static) {
        self.custom.push((kind, Box::new(matcher)));
    }

    /// Identify the block starting at `buf`.
    pub fn sniff(&self, buf: &[u8]) -> FileKind {
        for (kind, matcher) in &self.custom {
            if matcher(buf) {
                return *kind;
            }
        }
        for (kind, matcher) in BUILTINS {
            if matcher(buf) {
                return *kind;
            }
        }
        FileKind::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_magic_detection() {
        let registry = FileTypeRegistry::new();
        assert_eq!(registry.sniff(b"ID3\x03\x00\x00\x00\x00\x00\x00"), FileKind::Mp3);
        assert_eq!(registry.sniff(b"fLaC\x00\x00\x00\x22"), FileKind::Flac);
        assert_eq!(
            registry.sniff(b"RIFF\x10\x00\x00\x00AVI LIST"),
            FileKind::Avi
        );
        assert_eq!(registry.sniff(b"random bytes"), FileKind::Unknown);
    }

    #[test]
    fn matroska_requires_doctype_text() {
        let registry = FileTypeRegistry::new();
        let mut mkv = vec![0x1A, 0x45, 0xDF, 0xA3, 0x88];
        mkv.extend_from_slice(b"matroska");
        assert_eq!(registry.sniff(&mkv), FileKind::Matroska);

        let webm = [0x1A, 0x45, 0xDF, 0xA3, 0x84, b'w', b'e', b'b', b'm'];
        assert_eq!(registry.sniff(&webm), FileKind::Unknown);
    }

    #[test]
    fn custom_matchers_run_before_builtins() {
        let mut registry = FileTypeRegistry::new();
        registry.add_matcher(FileKind::Srs, |b| b.starts_with(b"ID3"));
        assert_eq!(registry.sniff(b"ID3\x03\x00"), FileKind::Srs);
    }

    #[test]
    fn short_buffers_never_match() {
        let registry = FileTypeRegistry::new();
        assert_eq!(registry.sniff(b"ID"), FileKind::Unknown);
        assert_eq!(registry.sniff(b""), FileKind::Unknown);
    }
}
