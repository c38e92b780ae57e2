//! # Storage Module - Souls Document Persistence
//!
//! Reads and writes the souls document (`<data_dir>/souls.json`). The document is
//! always written as a full snapshot of the in-memory ledger: the previous file is
//! replaced, never merged.
//!
//! ## Write protocol
//!
//! 1. Take an exclusive `fs2` lock on the destination file
//! 2. Write the new content into a unique temp file in the same directory and fsync it
//! 3. Atomically rename the temp file over the destination
//! 4. Best-effort fsync of the directory
//!
//! A crash mid-write therefore leaves either the old or the new document on disk,
//! never a truncated one.
//!
//! ## Reads
//!
//! A missing file is not an error: the data directory and an empty document are created
//! so the first autosave has somewhere to go. Leading NUL bytes (left behind by some
//! filesystems after power loss) are ignored.

pub mod autosave;

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use log::{debug, warn};

use crate::souls::{SoulsDocument, SoulsError};

/// Default file name for the souls document inside the data directory.
pub const SOULS_FILE_NAME: &str = "souls.json";

/// Resolve the souls document path from a data directory and file name.
pub fn souls_path(data_dir: &str, file_name: &str) -> PathBuf {
    Path::new(data_dir).join(file_name)
}

/// Load the souls document at `path`, creating an empty one when absent.
pub fn read_document(path: &Path) -> Result<SoulsDocument, SoulsError> {
    match fs::read_to_string(path) {
        Ok(data) => {
            let cleaned = data.trim_start_matches('\0');
            if cleaned.trim().is_empty() {
                return Ok(SoulsDocument::default());
            }
            Ok(serde_json::from_str(cleaned)?)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            let doc = SoulsDocument::default();
            if let Some(dir) = path.parent() {
                if !dir.as_os_str().is_empty() {
                    fs::create_dir_all(dir)?;
                }
            }
            write_document(path, &doc)?;
            debug!("Created empty souls document at {}", path.display());
            Ok(doc)
        }
        Err(e) => Err(e.into()),
    }
}

/// Serialize `doc` and atomically replace the file at `path`.
pub fn write_document(path: &Path, doc: &SoulsDocument) -> Result<(), SoulsError> {
    let content = serde_json::to_string_pretty(doc)?;
    write_file_locked(path, &content)
}

fn write_file_locked(path: &Path, content: &str) -> Result<(), SoulsError> {
    let dir = match path.parent() {
        Some(d) if !d.as_os_str().is_empty() => d,
        _ => Path::new("."),
    };
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }

    let lock_file = OpenOptions::new()
        .create(true)
        .read(true)
        .write(true)
        .truncate(false)
        .open(path)?;
    lock_file.lock_exclusive()?;

    let base = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(SOULS_FILE_NAME);
    let mut counter = 0u32;
    let tmp_path = loop {
        let candidate = dir.join(format!(".{}.tmp-{}-{}", base, std::process::id(), counter));
        match OpenOptions::new().write(true).create_new(true).open(&candidate) {
            Ok(mut tmp) => {
                tmp.write_all(content.as_bytes())?;
                tmp.flush()?;
                let _ = tmp.sync_all();
                break candidate;
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                counter = counter.saturating_add(1);
                continue;
            }
            Err(e) => return Err(e.into()),
        }
    };

    if let Err(e) = fs::rename(&tmp_path, path) {
        warn!("Failed to replace {}: {}", path.display(), e);
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }

    if let Ok(dir_file) = File::open(dir) {
        let _ = dir_file.sync_all();
    }

    drop(lock_file);
    Ok(())
}
