//! Hierarchical context-file discovery.
//!
//! Looks for the configured context file at the vault root, the target
//! folder, and each immediate subdirectory of the target folder.

use std::path::{Path, PathBuf};

use tracing::debug;

use vaultnav_core::error::Result;
use vaultnav_core::navigation::{ContextStatus, NavigationContext, NavigationEntry, NavigationLevel};
use vaultnav_core::record::FileRecord;

use crate::accessor::FileAccessor;
use crate::resolver::{PathResolver, ResolvedPath};

pub struct NavigationDiscovery;

impl NavigationDiscovery {
    /// Visit root, target, then target subdirectories (sorted by name).
    ///
    /// Always yields `2 + number of subdirectories` entries. Absence is a
    /// `NotFound` entry; a context file that cannot be read, or whose
    /// symlink points outside its scope, is an `Unreadable` entry and its
    /// content is never read.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Io`](vaultnav_core::VaultError::Io) only if the
    /// target folder itself cannot be enumerated.
    pub async fn discover(
        vault_root: &ResolvedPath,
        target_folder: &ResolvedPath,
        context_file: &str,
    ) -> Result<NavigationContext> {
        let root_scope = PathResolver::for_resolved(vault_root);
        let target_scope = PathResolver::for_resolved(target_folder);
        let context = Path::new(context_file);

        let mut entries = vec![
            Self::visit(&root_scope, NavigationLevel::VaultRoot, context).await,
            Self::visit(&target_scope, NavigationLevel::TargetFolder, context).await,
        ];

        for name in Self::subdirectories(target_folder).await? {
            let relative = Path::new(&name).join(context);
            entries.push(
                Self::visit(&target_scope, NavigationLevel::Subdirectory(name), &relative).await,
            );
        }

        Ok(NavigationContext { entries })
    }

    /// Names of the immediate, non-symlink subdirectories of `dir`, sorted.
    /// Entries whose type cannot be read are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Io`](vaultnav_core::VaultError::Io) if `dir`
    /// cannot be read.
    pub async fn subdirectories(dir: &ResolvedPath) -> Result<Vec<String>> {
        let mut reader = tokio::fs::read_dir(dir.as_path()).await?;
        let mut names = Vec::new();
        while let Some(entry) = reader.next_entry().await? {
            // DirEntry::file_type does not follow symlinks.
            match entry.file_type().await {
                Ok(kind) if kind.is_dir() => {
                    names.push(entry.file_name().to_string_lossy().into_owned());
                }
                Ok(_) => {}
                Err(e) => {
                    debug!(entry = %entry.path().display(), error = %e, "skipping entry");
                }
            }
        }
        names.sort();
        Ok(names)
    }

    /// Resolve and load one context file. Any failure on this one path,
    /// a rejection or a symlink loop included, becomes an `Unreadable`
    /// entry so the rest of the batch is still returned.
    pub async fn visit(
        scope: &PathResolver,
        level: NavigationLevel,
        relative: &Path,
    ) -> NavigationEntry {
        let resolved = match scope.resolve_async(relative).await {
            Ok(resolved) => resolved,
            Err(e) => return unreadable(level, scope.root().join(relative), e.to_string()),
        };

        match FileAccessor::load(&resolved, scope.root()).await {
            Ok(record) => entry_from_record(level, record),
            Err(e) => unreadable(level, resolved.into_path_buf(), e.to_string()),
        }
    }
}

fn unreadable(level: NavigationLevel, path: PathBuf, error: String) -> NavigationEntry {
    debug!(%level, path = %path.display(), %error, "context file unreadable");
    NavigationEntry {
        level,
        path,
        status: ContextStatus::Unreadable,
        content: String::new(),
        error: Some(error),
    }
}

fn entry_from_record(level: NavigationLevel, record: FileRecord) -> NavigationEntry {
    let status = if record.is_loaded() {
        ContextStatus::Found
    } else if record.exists {
        ContextStatus::Unreadable
    } else {
        ContextStatus::NotFound
    };
    NavigationEntry {
        level,
        path: record.path,
        status,
        content: record.content,
        error: match status {
            ContextStatus::Unreadable => record.error.map(|e| e.to_string()),
            _ => None,
        },
    }
}
