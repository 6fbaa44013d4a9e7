//! In-memory ZIP construction with per-entry compression.
//!
//! Entries are serialized in insertion order, so whatever is added first ends
//! up physically first in the archive (the EPUB `mimetype` entry relies on
//! this). Timestamps are pinned so that identical input produces identical
//! bytes.

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use crate::error::{Error, Result};

/// Default deflate level.
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;

/// How an entry is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    Stored,
    Deflated,
}

/// A single file waiting to be written.
#[derive(Debug, Clone)]
pub struct ArchiveEntry {
    pub path: String,
    pub data: Vec<u8>,
    pub compression: Compression,
}

/// Ordered collection of entries, serialized in one step.
#[derive(Debug, Clone)]
pub struct ArchiveWriter {
    entries: Vec<ArchiveEntry>,
    compression_level: u32,
}

impl ArchiveWriter {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            compression_level: DEFAULT_COMPRESSION_LEVEL,
        }
    }

    /// Set the deflate level (0-9) used for [`Compression::Deflated`] entries.
    pub fn with_compression_level(mut self, level: u32) -> Self {
        self.compression_level = level.min(9);
        self
    }

    /// Append an entry. Paths must be unique.
    pub fn add(
        &mut self,
        path: impl Into<String>,
        data: impl Into<Vec<u8>>,
        compression: Compression,
    ) -> Result<()> {
        let path = path.into();
        if self.entries.iter().any(|e| e.path == path) {
            return Err(Error::InvalidPackage(format!("duplicate archive entry {path}")));
        }
        tracing::debug!(path = %path, ?compression, "queued archive entry");
        self.entries.push(ArchiveEntry {
            path,
            data: data.into(),
            compression,
        });
        Ok(())
    }

    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write every entry into a finished ZIP archive.
    pub fn serialize(self) -> Result<Vec<u8>> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

        let stored = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Stored)
            .last_modified_time(DateTime::default());
        let deflated = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(i64::from(self.compression_level)))
            .last_modified_time(DateTime::default());

        for entry in &self.entries {
            let options = match entry.compression {
                Compression::Stored => stored,
                Compression::Deflated => deflated,
            };
            zip.start_file(entry.path.as_str(), options)?;
            zip.write_all(&entry.data)?;
        }

        let cursor = zip.finish()?;
        Ok(cursor.into_inner())
    }
}

impl Default for ArchiveWriter {
    fn default() -> Self {
        Self::new()
    }
}
