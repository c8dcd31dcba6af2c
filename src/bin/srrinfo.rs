//! SRR/SRS inspection tool.
//!
//! Loads one or more reconstruction files, dispatches on the file extension
//! (`.srr` or `.srs`), and prints the record set of each: creating
//! application, stored files, RAR volumes with back-filled CRCs, archived
//! files, ISDb hashes and SFV comments for an SRR; the decoded block
//! sequence for an SRS.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use rayon::prelude::*;
use rescene::{SrrFile, SrsBlock, SrsFile};

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false)
        .init();

    let matches = rescene::parse_args();
    let files: Vec<String> = matches
        .get_many::<String>("files")
        .expect("at least one input file is required")
        .cloned()
        .collect();

    // Inputs are independent; parse them in parallel and report in order.
    let reports: Vec<Result<String>> = files
        .par_iter()
        .map(|file| inspect(Path::new(file)))
        .collect();

    let mut failed = false;
    for (file, report) in files.iter().zip(reports) {
        match report {
            Ok(text) => print!("{}", text),
            Err(err) => {
                eprintln!("{}: {:#}", file, err);
                failed = true;
            }
        }
    }
    if failed {
        std::process::exit(1);
    }
    Ok(())
}

fn inspect(path: &Path) -> Result<String> {
    let data = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("srr") => {
            let srr = SrrFile::parse(&data)
                .with_context(|| format!("failed to parse {}", path.display()))?;
            Ok(srr_report(path, &srr))
        }
        Some("srs") => {
            let srs = SrsFile::parse(&data)
                .with_context(|| format!("failed to parse {}", path.display()))?;
            Ok(srs_report(path, &srs))
        }
        _ => bail!("unrecognized extension (expected .srr or .srs)"),
    }
}

fn srr_report(path: &Path, srr: &SrrFile) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Parse : {} (SRR)", path.display());
    let _ = writeln!(out, "Creating Application:\n\t{}\n", srr.application_name);

    if srr.rar_compressed {
        let _ = writeln!(out, "SRR for compressed RARs.\n");
    }
    if !srr.stored_files.is_empty() {
        let _ = writeln!(out, "Stored files:");
        for stored in &srr.stored_files {
            let _ = writeln!(out, "\t{:9}  {}", stored.data.len(), stored.path);
        }
        let _ = writeln!(out);
    }
    if !srr.rar_files.is_empty() {
        let _ = writeln!(out, "RAR files:");
        for rar in &srr.rar_files {
            if !rar.crc.is_zero() {
                let _ = writeln!(out, "\t{} {} {}", rar.path, rar.crc, rar.size);
            } else {
                let _ = writeln!(out, "\t{} {}", rar.path, rar.size);
            }
        }
        let _ = writeln!(out);
    }
    if !srr.packed_files.is_empty() {
        let _ = writeln!(out, "Archived files:");
        for packed in &srr.packed_files {
            let _ = writeln!(out, "\t{} {} {}", packed.path, packed.crc, packed.size);
        }
        let _ = writeln!(out);
    }
    if !srr.oso_hashes.is_empty() {
        let _ = writeln!(out, "ISDb hashes:");
        for hash in &srr.oso_hashes {
            let _ = writeln!(out, "\t{} {:016x} {}", hash.path, hash.hash, hash.size);
        }
        let _ = writeln!(out);
    }
    if !srr.sfv_comments.is_empty() {
        let _ = writeln!(out, "SFV comments:");
        for comment in &srr.sfv_comments {
            let _ = writeln!(out, "\t{}", comment);
        }
        let _ = writeln!(out);
    }
    out
}

fn srs_report(path: &Path, srs: &SrsFile) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Parse : {} (SRS)", path.display());
    for block in &srs.blocks {
        let label = match block {
            SrsBlock::Id3v1(_) => "ID3v1".to_string(),
            SrsBlock::Id3v2(_) => "ID3v2".to_string(),
            SrsBlock::Lyrics3(_) => "Lyrics3".to_string(),
            SrsBlock::Marker(m) => String::from_utf8_lossy(&m.tag).into_owned(),
            SrsBlock::Mkv(_) => "MKV".to_string(),
            SrsBlock::Avi(_) => "AVI".to_string(),
        };
        let _ = writeln!(out, "\t{:9}  {}", block.size(), label);
    }
    out
}
