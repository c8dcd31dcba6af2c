//! SFV manifest extraction and CRC-32 correlation.
//!
//! After the SRR walk, every stored file with an `.sfv` extension is scanned
//! for `filename CRC` lines. The resulting table back-fills CRC values onto
//! the reconstructed RAR volume records: an exact lowercase-path match wins,
//! a base-name match only fills entries whose CRC is still unknown.
//!
//! The line grammar mirrors the SFV format in the wild: a comment starts
//! with `;` (leading whitespace allowed), a checksum line is printable-ASCII
//! filename text separated from 1–8 hex digits by spaces. Anything else is
//! skipped. Short non-empty lines are treated as comments.

use log::debug;
use rustc_hash::FxHashMap;

use crate::domain::Crc32Value;
use crate::error::{ResceneError, Result};
use crate::srr::SrrFile;

pub(crate) fn correlate(file: &mut SrrFile) -> Result<()> {
    let SrrFile {
        stored_files,
        rar_files,
        sfv_comments,
        ..
    } = file;
    let mut table: FxHashMap<String, u32> = FxHashMap::default();

    for stored in stored_files.iter() {
        if !has_sfv_extension(&stored.path) {
            continue;
        }
        debug!("scanning sfv manifest {}", stored.path);
        let prefix = dir_prefix(&stored.path);
        scan_manifest(&stored.data, &prefix, &mut table, sfv_comments)?;
    }

    for (filename, crc) in &table {
        for rar in rar_files.iter_mut() {
            let rar_path = rar.path.to_lowercase();
            if &rar_path == filename {
                rar.crc = Crc32Value::new(*crc);
                break;
            } else if base_name(&rar_path) == base_name(filename) && rar.crc.is_zero() {
                // Weak match; keep looking for a full-path entry.
                rar.crc = Crc32Value::new(*crc);
            }
        }
    }
    Ok(())
}

fn has_sfv_extension(path: &str) -> bool {
    let name = base_name(path);
    match name.rfind('.') {
        Some(i) => name[i..].eq_ignore_ascii_case(".sfv"),
        None => false,
    }
}

/// Lowercased directory of the stored-file path, with a trailing `/`, or
/// empty for a top-level path.
fn dir_prefix(path: &str) -> String {
    match path.rfind('/') {
        Some(i) if i > 0 => format!("{}/", path[..i].to_lowercase()),
        Some(_) => "/".to_string(),
        None => String::new(),
    }
}

fn base_name(path: &str) -> &str {
    match path.rfind('/') {
        Some(i) => &path[i + 1..],
        None => path,
    }
}

/// Scan one manifest's bytes, collecting CRC bindings and comments.
///
/// Lines are split on CR/LF runs; a line's raw length (terminator bytes
/// included) under 10 bytes classifies it as a comment rather than a
/// checksum candidate.
fn scan_manifest(
    data: &[u8],
    prefix: &str,
    table: &mut FxHashMap<String, u32>,
    comments: &mut Vec<String>,
) -> Result<()> {
    let mut i = 0;
    while i < data.len() {
        while i < data.len() && matches!(data[i], b'\r' | b'\n') {
            i += 1;
        }
        if i >= data.len() {
            break;
        }
        let start = i;
        while i < data.len() && !matches!(data[i], b'\r' | b'\n') {
            i += 1;
        }
        let line = &data[start..i];
        let mut raw_len = line.len();
        while i < data.len() && matches!(data[i], b'\r' | b'\n') {
            i += 1;
            raw_len += 1;
        }

        if raw_len < 10 {
            if !line.is_empty() {
                comments.push(String::from_utf8_lossy(line).into_owned());
            }
            continue;
        }
        if is_comment_line(line) {
            comments.push(String::from_utf8_lossy(line).into_owned());
            continue;
        }
        let Some((name, crc)) = parse_sfv_line(line) else {
            continue;
        };
        let key = format!("{}{}", prefix, name.to_lowercase());
        match table.get(&key) {
            Some(&existing) if existing != crc => return Err(ResceneError::DuplicateSfv),
            Some(_) => {}
            None => {
                table.insert(key, crc);
            }
        }
    }
    Ok(())
}

/// `;` after optional leading whitespace.
fn is_comment_line(line: &[u8]) -> bool {
    let mut i = 0;
    while i < line.len() && matches!(line[i], b' ' | b'\t' | 0x0c) {
        i += 1;
    }
    i < line.len() && line[i] == b';'
}

/// Recognize `filename CRC` with a printable-ASCII filename (internal spaces
/// allowed), at least one space before the CRC, and a 1–8 hex digit CRC.
/// Returns the filename text and the parsed value, or None for a
/// non-matching line.
fn parse_sfv_line(line: &[u8]) -> Option<(String, u32)> {
    let mut s = 0;
    while s < line.len() && matches!(line[s], b' ' | b'\t' | 0x0c) {
        s += 1;
    }
    let mut e = line.len();
    while e > s && matches!(line[e - 1], b' ' | b'\t' | 0x0c) {
        e -= 1;
    }
    let body = &line[s..e];

    let mut h = body.len();
    while h > 0 && body[h - 1].is_ascii_hexdigit() {
        h -= 1;
    }
    let crc_len = body.len() - h;
    if crc_len == 0 || crc_len > 8 {
        return None;
    }
    let mut sep = h;
    while sep > 0 && body[sep - 1] == b' ' {
        sep -= 1;
    }
    if sep == h || sep == 0 {
        // No separating space, or no filename at all.
        return None;
    }
    let name = &body[..sep];
    if !name.iter().all(|&b| (0x20..=0x7e).contains(&b)) {
        return None;
    }
    let crc_text = std::str::from_utf8(&body[h..]).ok()?;
    let crc = u32::from_str_radix(crc_text, 16).ok()?;
    Some((String::from_utf8_lossy(name).into_owned(), crc))
}
