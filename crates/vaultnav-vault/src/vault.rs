//! The [`Vault`] handle: one immutable configuration shared by every
//! access-layer operation.

use std::io::{self, ErrorKind};
use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;

use vaultnav_core::config::VaultConfig;
use vaultnav_core::error::{Result, VaultError};
use vaultnav_core::navigation::{NavigationContext, NavigationEntry, NavigationLevel};
use vaultnav_core::range::DateRangeResult;
use vaultnav_core::record::{FileRecord, Listing};

use crate::accessor::FileAccessor;
use crate::dates::{date_pattern, DateRangeLoader};
use crate::lister::DirectoryLister;
use crate::navigation::NavigationDiscovery;
use crate::resolver::{PathResolver, ResolvedPath};

/// Label used for the vault root in context-file inventories.
pub const ROOT_LABEL: &str = "/ (root)";

/// Read-only access to one vault and its target folder.
///
/// Cheap to clone; all clones share the same configuration.
#[derive(Debug, Clone)]
pub struct Vault {
    inner: Arc<VaultInner>,
}

#[derive(Debug)]
struct VaultInner {
    config: VaultConfig,
    root: PathResolver,
    target: PathResolver,
}

impl Vault {
    /// Validate the configuration and canonicalize the vault root and
    /// target folder once.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Config`] if the configuration is invalid or
    /// either directory is missing, and [`VaultError::PathEscape`] if the
    /// target folder resolves outside the vault root.
    pub fn open(config: VaultConfig) -> Result<Self> {
        config.validate()?;

        let meta = std::fs::metadata(&config.vault_path).map_err(|e| {
            VaultError::Config(format!(
                "vault root {} is not accessible: {e}",
                config.vault_path.display()
            ))
        })?;
        if !meta.is_dir() {
            return Err(VaultError::Config(format!(
                "vault root {} is not a directory",
                config.vault_path.display()
            )));
        }

        let root = PathResolver::new(&config.vault_path)?;
        let target_path = root.resolve(&config.target_folder)?;
        if !target_path.as_path().is_dir() {
            return Err(VaultError::Config(format!(
                "target folder {} is not a directory",
                target_path
            )));
        }
        let target = PathResolver::for_resolved(&target_path);

        info!(
            vault = %root.root().display(),
            target = %target.root().display(),
            context_file = %config.context_file,
            "vault opened"
        );

        Ok(Self {
            inner: Arc::new(VaultInner {
                config,
                root,
                target,
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &VaultConfig {
        &self.inner.config
    }

    /// Canonical vault root.
    #[must_use]
    pub fn root(&self) -> &Path {
        self.inner.root.root()
    }

    /// Canonical target folder.
    #[must_use]
    pub fn target(&self) -> &Path {
        self.inner.target.root()
    }

    /// Resolve a vault-relative (or absolute) path.
    ///
    /// # Errors
    ///
    /// See [`PathResolver::resolve`].
    pub async fn resolve(&self, candidate: impl AsRef<Path>) -> Result<ResolvedPath> {
        self.inner.root.resolve_async(candidate).await
    }

    /// Load a resolved path, relative paths computed against the vault root.
    ///
    /// # Errors
    ///
    /// See [`FileAccessor::load`].
    pub async fn load(&self, path: &ResolvedPath) -> Result<FileRecord> {
        FileAccessor::load(path, self.root()).await
    }

    /// Load a file named relative to the target folder.
    ///
    /// # Errors
    ///
    /// Path rejections abort; a missing file is a record, not an error.
    pub async fn load_file(&self, name: &str) -> Result<FileRecord> {
        let path = self.inner.target.resolve_async(name).await?;
        FileAccessor::load(&path, self.target()).await
    }

    /// Recursive listing of the target folder, sorted by relative path.
    /// `None` uses the configured default suffix.
    ///
    /// # Errors
    ///
    /// See [`DirectoryLister::list`].
    pub async fn list_target(&self, suffix: Option<&str>) -> Result<Listing> {
        let suffix = suffix.unwrap_or(&self.inner.config.default_suffix);
        let mut listing = DirectoryLister::list(&self.inner.target.root_path(), suffix).await?;
        listing.sort();
        Ok(listing)
    }

    /// Daily notes in the target folder for the window ending today.
    ///
    /// # Errors
    ///
    /// See [`DateRangeLoader::load_range_ending`].
    pub async fn recent_notes(&self, days_back: i64) -> Result<DateRangeResult> {
        let pattern = date_pattern(&self.inner.config.daily_note_format);
        DateRangeLoader::load_range(&self.inner.target.root_path(), days_back, pattern).await
    }

    /// Daily notes in the target folder for the window ending at `end`.
    ///
    /// # Errors
    ///
    /// See [`DateRangeLoader::load_range_ending`].
    pub async fn recent_notes_ending(
        &self,
        days_back: i64,
        end: NaiveDate,
    ) -> Result<DateRangeResult> {
        let pattern = date_pattern(&self.inner.config.daily_note_format);
        DateRangeLoader::load_range_ending(&self.inner.target.root_path(), days_back, end, pattern)
            .await
    }

    /// Context files from the vault root down to the target subdirectories.
    ///
    /// # Errors
    ///
    /// See [`NavigationDiscovery::discover`].
    pub async fn discover(&self) -> Result<NavigationContext> {
        NavigationDiscovery::discover(
            &self.inner.root.root_path(),
            &self.inner.target.root_path(),
            &self.inner.config.context_file,
        )
        .await
    }

    /// Context file of the target folder alone.
    pub async fn target_context(&self) -> NavigationEntry {
        NavigationDiscovery::visit(
            &self.inner.target,
            NavigationLevel::TargetFolder,
            Path::new(&self.inner.config.context_file),
        )
        .await
    }

    /// Context file of one vault-relative subdirectory.
    ///
    /// # Errors
    ///
    /// Path rejections abort, and a missing subdirectory is
    /// [`VaultError::Io`] with kind `NotFound`. A missing context file is a
    /// `NotFound` entry.
    pub async fn subdirectory_context(&self, subdir: &str) -> Result<NavigationEntry> {
        let dir = self.inner.root.resolve_async(subdir).await?;
        match tokio::fs::metadata(dir.as_path()).await {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => {
                return Err(VaultError::Io(io::Error::new(
                    ErrorKind::NotFound,
                    format!("not a directory: {subdir}"),
                )))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(VaultError::Io(io::Error::new(
                    ErrorKind::NotFound,
                    format!("subdirectory not found: {subdir}"),
                )))
            }
            Err(e) => return Err(e.into()),
        }

        let relative = Path::new(&dir.relative_to(self.root())).join(&self.inner.config.context_file);
        Ok(NavigationDiscovery::visit(
            &self.inner.root,
            NavigationLevel::Subdirectory(subdir.to_string()),
            &relative,
        )
        .await)
    }

    /// Every vault directory holding a context file, vault-relative and
    /// sorted, with the root shown as [`ROOT_LABEL`].
    ///
    /// # Errors
    ///
    /// See [`DirectoryLister::list`].
    pub async fn context_files(&self) -> Result<Vec<String>> {
        let context_file = &self.inner.config.context_file;
        let listing = DirectoryLister::list(&self.inner.root.root_path(), context_file).await?;

        let mut dirs: Vec<String> = listing
            .entries
            .into_iter()
            .filter(|e| &e.name == context_file)
            .map(|e| match e.relative_path.rsplit_once('/') {
                Some((parent, _)) => parent.to_string(),
                None => ROOT_LABEL.to_string(),
            })
            .collect();
        dirs.sort();
        Ok(dirs)
    }
}
