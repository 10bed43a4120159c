//! Single-entry zip archives for function code and dependency layers.
//!
//! Archives are deterministic: every entry carries the zip epoch timestamp
//! (1980-01-01 00:00) and fixed permissions, so packing the same code twice
//! yields identical bytes.

use std::io::{Cursor, Write};
use std::path::Path;

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use crate::{Error, Result};

/// File extension (case-insensitive) that selects archive output.
pub const ARCHIVE_EXTENSION: &str = "zip";

const ENTRY_PERMISSIONS: u32 = 0o644;

/// A compressed container holding exactly one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Archive {
    entry_name: String,
    payload: Vec<u8>,
}

impl Archive {
    /// Name of the single entry inside the archive.
    pub fn entry_name(&self) -> &str {
        &self.entry_name
    }

    /// Encoded zip bytes.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn into_payload(self) -> Vec<u8> {
        self.payload
    }
}

/// Pack bundle code into a single-entry archive named `entry_name`.
///
/// # Errors
///
/// Returns [`Error::EmptyBundle`] when `code` is empty.
///
/// # Example
///
/// ```
/// let archive = lamina_bundler::pack("index.js", "export const handler = () => 1;").unwrap();
/// assert_eq!(archive.entry_name(), "index.js");
/// ```
pub fn pack(entry_name: &str, code: &str) -> Result<Archive> {
    if code.is_empty() {
        return Err(Error::EmptyBundle {
            module: entry_name.to_string(),
        });
    }

    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default())
        .unix_permissions(ENTRY_PERMISSIONS);

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    writer.start_file(entry_name, options)?;
    writer.write_all(code.as_bytes())?;
    let payload = writer.finish()?.into_inner();

    tracing::debug!(entry = entry_name, bytes = payload.len(), "packed archive");

    Ok(Archive {
        entry_name: entry_name.to_string(),
        payload,
    })
}

/// Whether `path` selects archive output.
pub fn is_archive_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(ARCHIVE_EXTENSION))
}
