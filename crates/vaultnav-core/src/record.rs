//! File and listing records produced by the access layer.
//!
//! Records are built fresh on every request and never cached.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::ReadError;

/// The outcome of loading one file.
///
/// `exists == false` always means empty content and no stat fields, so
/// "absent" and "present but unreadable" stay distinguishable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRecord {
    /// Absolute, canonical location.
    pub path: PathBuf,
    /// Location relative to the root the caller asked about.
    pub relative_path: String,
    pub name: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<DateTime<Utc>>,
    pub exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ReadError>,
}

impl FileRecord {
    /// Record for a path with nothing behind it.
    #[must_use]
    pub fn missing(path: PathBuf, relative_path: String) -> Self {
        let name = file_name(&path);
        Self {
            path,
            relative_path,
            name,
            content: String::new(),
            size_bytes: None,
            modified: None,
            exists: false,
            error: Some(ReadError::NotFound),
        }
    }

    /// Record for an existing entry whose content could not be read.
    #[must_use]
    pub fn unreadable(
        path: PathBuf,
        relative_path: String,
        error: ReadError,
        size_bytes: Option<u64>,
        modified: Option<DateTime<Utc>>,
    ) -> Self {
        let name = file_name(&path);
        Self {
            path,
            relative_path,
            name,
            content: String::new(),
            size_bytes,
            modified,
            exists: true,
            error: Some(error),
        }
    }

    /// Record for a successfully read regular file.
    #[must_use]
    pub fn loaded(
        path: PathBuf,
        relative_path: String,
        content: String,
        size_bytes: u64,
        modified: Option<DateTime<Utc>>,
    ) -> Self {
        let name = file_name(&path);
        Self {
            path,
            relative_path,
            name,
            content,
            size_bytes: Some(size_bytes),
            modified,
            exists: true,
            error: None,
        }
    }

    /// True when the file existed and its content was read.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.exists && self.error.is_none()
    }
}

fn file_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Lightweight listing record. Content is not loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryEntry {
    pub name: String,
    pub absolute_path: PathBuf,
    pub relative_path: String,
}

/// Result of a recursive listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Listing {
    /// Matching files, in traversal order.
    pub entries: Vec<DirectoryEntry>,
    /// Directories that could not be read and were left out.
    pub skipped_dirs: usize,
}

impl Listing {
    /// Sort entries by relative path for stable presentation.
    pub fn sort(&mut self) {
        self.entries
            .sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    }
}
