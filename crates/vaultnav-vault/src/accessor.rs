//! Non-blocking file reads for resolved paths.

use std::io::ErrorKind;
use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::debug;

use vaultnav_core::error::{ReadError, Result};
use vaultnav_core::record::FileRecord;

use crate::resolver::ResolvedPath;

/// Reads file content and metadata for paths already checked by
/// [`PathResolver`](crate::resolver::PathResolver).
pub struct FileAccessor;

impl FileAccessor {
    /// Load a file as UTF-8 text, with its size and modification time.
    ///
    /// A missing file is a record with `exists == false`, never an error;
    /// that includes a path whose parent component is a regular file.
    /// When stat itself is denied the record reports `exists == true`
    /// with [`ReadError::PermissionDenied`], since absence cannot be shown.
    /// Directories, special files, permission failures, and invalid UTF-8
    /// are recorded on the returned [`FileRecord`] with `exists == true`.
    /// `relative_path` is computed against `base`.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Io`](vaultnav_core::VaultError::Io) only for
    /// unexpected filesystem failures (device errors and the like).
    pub async fn load(path: &ResolvedPath, base: &Path) -> Result<FileRecord> {
        let abs = path.as_path().to_path_buf();
        let rel = path.relative_to(base);

        let meta = match tokio::fs::metadata(&abs).await {
            Ok(meta) => meta,
            Err(e) if is_absent(&e) => {
                return Ok(FileRecord::missing(abs, rel));
            }
            Err(e) if e.kind() == ErrorKind::PermissionDenied => {
                // Existence is assumed: an unsearchable parent hides the entry.
                debug!(path = %abs.display(), "stat permission denied");
                return Ok(FileRecord::unreadable(
                    abs,
                    rel,
                    ReadError::PermissionDenied,
                    None,
                    None,
                ));
            }
            Err(e) => return Err(e.into()),
        };

        let modified = meta.modified().ok().map(DateTime::<Utc>::from);

        if !meta.is_file() {
            debug!(path = %abs.display(), "not a regular file");
            return Ok(FileRecord::unreadable(
                abs,
                rel,
                ReadError::NotRegularFile,
                None,
                modified,
            ));
        }

        let bytes = match tokio::fs::read(&abs).await {
            Ok(bytes) => bytes,
            // Removed between stat and read.
            Err(e) if is_absent(&e) => {
                return Ok(FileRecord::missing(abs, rel));
            }
            Err(e) if e.kind() == ErrorKind::PermissionDenied => {
                debug!(path = %abs.display(), "read permission denied");
                return Ok(FileRecord::unreadable(
                    abs,
                    rel,
                    ReadError::PermissionDenied,
                    Some(meta.len()),
                    modified,
                ));
            }
            Err(e) => return Err(e.into()),
        };

        let size = bytes.len() as u64;
        match String::from_utf8(bytes) {
            Ok(content) => Ok(FileRecord::loaded(abs, rel, content, size, modified)),
            Err(e) => {
                debug!(path = %abs.display(), error = %e, "invalid UTF-8");
                Ok(FileRecord::unreadable(
                    abs,
                    rel,
                    ReadError::InvalidEncoding(e.utf8_error().to_string()),
                    Some(size),
                    modified,
                ))
            }
        }
    }
}

/// `ENOENT`, or `ENOTDIR` for a path nested under a regular file.
fn is_absent(err: &std::io::Error) -> bool {
    matches!(err.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::PathResolver;
    use std::fs;

    fn vault() -> (tempfile::TempDir, PathResolver) {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("Daybook")).unwrap();
        let resolver = PathResolver::new(dir.path()).unwrap();
        (dir, resolver)
    }

    #[tokio::test]
    async fn loads_existing_file_with_metadata() {
        let (dir, resolver) = vault();
        fs::write(dir.path().join("Daybook/today.md"), "# Today\nwrote code").unwrap();

        let path = resolver.resolve("Daybook/today.md").unwrap();
        let rec = FileAccessor::load(&path, resolver.root()).await.unwrap();

        assert!(rec.exists);
        assert!(rec.is_loaded());
        assert_eq!(rec.content, "# Today\nwrote code");
        assert_eq!(rec.size_bytes, Some(18));
        assert!(rec.modified.is_some());
        assert_eq!(rec.name, "today.md");
        assert_eq!(rec.relative_path, "Daybook/today.md");
    }

    #[tokio::test]
    async fn missing_file_is_data_not_error() {
        let (_dir, resolver) = vault();
        let path = resolver.resolve("Daybook/nope.md").unwrap();
        let rec = FileAccessor::load(&path, resolver.root()).await.unwrap();

        assert!(!rec.exists);
        assert!(rec.content.is_empty());
        assert!(rec.size_bytes.is_none());
        assert!(rec.modified.is_none());
        assert_eq!(rec.error, Some(ReadError::NotFound));
    }

    #[tokio::test]
    async fn path_below_a_regular_file_is_missing() {
        let (dir, resolver) = vault();
        fs::write(dir.path().join("Daybook/plan.md"), "plan").unwrap();

        let path = resolver.resolve("Daybook/plan.md/child.md").unwrap();
        let rec = FileAccessor::load(&path, resolver.root()).await.unwrap();

        assert!(!rec.exists);
        assert_eq!(rec.error, Some(ReadError::NotFound));
        assert_eq!(rec.relative_path, "Daybook/plan.md/child.md");
    }

    #[tokio::test]
    async fn directory_is_not_a_regular_file() {
        let (_dir, resolver) = vault();
        let path = resolver.resolve("Daybook").unwrap();
        let rec = FileAccessor::load(&path, resolver.root()).await.unwrap();

        assert!(rec.exists);
        assert!(rec.content.is_empty());
        assert_eq!(rec.error, Some(ReadError::NotRegularFile));
    }

    #[tokio::test]
    async fn invalid_utf8_is_recorded_not_raised() {
        let (dir, resolver) = vault();
        fs::write(dir.path().join("Daybook/binary.md"), [0x66, 0x6f, 0xff, 0xfe]).unwrap();

        let path = resolver.resolve("Daybook/binary.md").unwrap();
        let rec = FileAccessor::load(&path, resolver.root()).await.unwrap();

        assert!(rec.exists);
        assert!(rec.content.is_empty());
        assert_eq!(rec.size_bytes, Some(4));
        assert!(matches!(rec.error, Some(ReadError::InvalidEncoding(_))));
    }

    #[tokio::test]
    async fn relative_path_follows_requested_base() {
        let (dir, resolver) = vault();
        fs::write(dir.path().join("Daybook/a.md"), "a").unwrap();

        let path = resolver.resolve("Daybook/a.md").unwrap();
        let base = resolver.resolve("Daybook").unwrap();
        let rec = FileAccessor::load(&path, base.as_path()).await.unwrap();
        assert_eq!(rec.relative_path, "a.md");
    }
}
