//! Recursive, suffix-filtered directory listing.
//!
//! The walk runs on the blocking pool. Symlinked directories are never
//! descended into; a symlinked file is listed only when its target
//! resolves inside the listing root.

use std::io;

use tracing::debug;
use walkdir::WalkDir;

use vaultnav_core::error::{Result, VaultError};
use vaultnav_core::record::{DirectoryEntry, Listing};

use crate::resolver::{join_error, relative_display, PathResolver, ResolvedPath};

pub struct DirectoryLister;

impl DirectoryLister {
    /// List regular files below `root` whose name ends with `suffix`
    /// (case-sensitive; an empty suffix matches everything).
    ///
    /// Entry order is whatever the traversal produced. Unreadable
    /// subdirectories are skipped and counted in [`Listing::skipped_dirs`].
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Io`] if `root` itself cannot be read.
    pub async fn list(root: &ResolvedPath, suffix: &str) -> Result<Listing> {
        let root = root.clone();
        let suffix = suffix.to_string();
        tokio::task::spawn_blocking(move || Self::walk(&root, &suffix))
            .await
            .map_err(join_error)?
    }

    /// Synchronous walk behind [`list`](Self::list).
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Io`] if `root` itself cannot be read.
    pub fn walk(root: &ResolvedPath, suffix: &str) -> Result<Listing> {
        let scope = PathResolver::for_resolved(root);
        let mut listing = Listing::default();

        for item in WalkDir::new(root.as_path()).follow_links(false).min_depth(1) {
            let entry = match item {
                Ok(entry) => entry,
                Err(err) if err.depth() == 0 => {
                    let msg = err.to_string();
                    return Err(VaultError::Io(
                        err.into_io_error().unwrap_or_else(|| io::Error::other(msg)),
                    ));
                }
                Err(err) => {
                    debug!(
                        path = ?err.path(),
                        error = %err,
                        "skipping unreadable directory"
                    );
                    listing.skipped_dirs += 1;
                    continue;
                }
            };

            let name = entry.file_name().to_string_lossy();
            if !name.ends_with(suffix) {
                continue;
            }

            let file_type = entry.file_type();
            let include = if file_type.is_file() {
                true
            } else if file_type.is_symlink() {
                match scope.resolve(entry.path()) {
                    Ok(target) => target.as_path().is_file(),
                    Err(e) => {
                        debug!(path = %entry.path().display(), error = %e, "symlink excluded");
                        false
                    }
                }
            } else {
                false
            };

            if include {
                listing.entries.push(DirectoryEntry {
                    name: name.into_owned(),
                    absolute_path: entry.path().to_path_buf(),
                    relative_path: relative_display(entry.path(), scope.root()),
                });
            }
        }

        Ok(listing)
    }
}
