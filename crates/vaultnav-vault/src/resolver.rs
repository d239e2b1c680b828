//! Path resolution against a scope root.
//!
//! Every path the vault reads, lists, or stats goes through
//! [`PathResolver::resolve`]. Candidates are fully canonicalized (`..`,
//! `.`, and every symlink along the way, including dangling ones) and only
//! then compared against the canonical scope root.

use std::fmt;
use std::io::{self, ErrorKind};
use std::path::{Component, Path, PathBuf};

use tracing::warn;

use vaultnav_core::error::{Result, VaultError};

/// Symlink hops followed before giving up, matching the usual ELOOP limit.
const MAX_SYMLINK_HOPS: usize = 40;

/// A canonical path proven to lie inside the scope it was resolved against.
///
/// Only [`PathResolver`] can construct one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedPath(PathBuf);

impl ResolvedPath {
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    #[must_use]
    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }

    /// Path relative to `base` using `/` separators; empty when equal.
    /// Falls back to the full path when `base` is not an ancestor.
    #[must_use]
    pub fn relative_to(&self, base: &Path) -> String {
        relative_display(&self.0, base)
    }
}

impl AsRef<Path> for ResolvedPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for ResolvedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.display().fmt(f)
    }
}

pub(crate) fn relative_display(path: &Path, base: &Path) -> String {
    match path.strip_prefix(base) {
        Ok(rel) => rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/"),
        Err(_) => path.to_string_lossy().into_owned(),
    }
}

/// Validates candidate paths against one canonical scope root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathResolver {
    root: PathBuf,
}

impl PathResolver {
    /// Canonicalize `scope_root` and build a resolver for it.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Io`] if the root does not exist or cannot be
    /// canonicalized.
    pub fn new(scope_root: &Path) -> Result<Self> {
        let root = std::fs::canonicalize(scope_root)?;
        Ok(Self { root })
    }

    /// Resolver scoped to an already resolved directory.
    #[must_use]
    pub fn for_resolved(scope: &ResolvedPath) -> Self {
        Self {
            root: scope.0.clone(),
        }
    }

    /// The canonical scope root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The scope root itself as a resolved path.
    #[must_use]
    pub fn root_path(&self) -> ResolvedPath {
        ResolvedPath(self.root.clone())
    }

    /// Resolve `candidate` (relative to the scope root, or absolute) and
    /// check that it stays inside the scope.
    ///
    /// Missing trailing components are allowed, so a path to a file that
    /// does not exist yet still resolves; existing components are resolved
    /// through any symlinks first.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::PathSyntax`] for empty input, null bytes, or
    /// control characters, [`VaultError::PathEscape`] if the canonical
    /// result lies outside the scope, and [`VaultError::Io`] if a component
    /// cannot be inspected (e.g. permission denied, symlink loop).
    pub fn resolve(&self, candidate: impl AsRef<Path>) -> Result<ResolvedPath> {
        let candidate = candidate.as_ref();
        check_syntax(candidate)?;

        let canonical = canonicalize_lenient(&self.root.join(candidate), 0)?;

        if !canonical.starts_with(&self.root) {
            warn!(
                candidate = %candidate.display(),
                resolved = %canonical.display(),
                scope = %self.root.display(),
                "rejected path escape"
            );
            return Err(VaultError::PathEscape {
                path: candidate.display().to_string(),
                scope: self.root.display().to_string(),
            });
        }

        Ok(ResolvedPath(canonical))
    }

    /// [`resolve`](Self::resolve) on the blocking pool.
    ///
    /// # Errors
    ///
    /// Same as [`resolve`](Self::resolve); a panicked or cancelled worker
    /// surfaces as [`VaultError::Io`].
    pub async fn resolve_async(&self, candidate: impl AsRef<Path>) -> Result<ResolvedPath> {
        let resolver = self.clone();
        let candidate = candidate.as_ref().to_path_buf();
        tokio::task::spawn_blocking(move || resolver.resolve(candidate))
            .await
            .map_err(join_error)?
    }
}

pub(crate) fn join_error(err: tokio::task::JoinError) -> VaultError {
    VaultError::Io(io::Error::other(format!("blocking task failed: {err}")))
}

fn check_syntax(candidate: &Path) -> Result<()> {
    let raw = candidate.as_os_str();
    let reject = |reason: String| {
        Err(VaultError::PathSyntax {
            path: candidate.to_string_lossy().escape_debug().to_string(),
            reason,
        })
    };

    if raw.is_empty() {
        return reject("path is empty".to_string());
    }
    let text = raw.to_string_lossy();
    if text.contains('\0') {
        return reject("path contains a null byte".to_string());
    }
    if let Some(c) = text.chars().find(|c| c.is_control()) {
        return reject(format!("path contains control character U+{:04X}", c as u32));
    }
    Ok(())
}

/// Canonicalize an absolute path component by component.
///
/// Existing symlinks are replaced by their (recursively resolved) targets.
/// Components that do not exist are kept lexically, and a later `..` pops
/// them again, so the walk never has to trust a raw string.
fn canonicalize_lenient(path: &Path, hops: usize) -> io::Result<PathBuf> {
    let mut resolved = PathBuf::new();

    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => resolved.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            Component::Normal(name) => {
                resolved.push(name);
                match std::fs::symlink_metadata(&resolved) {
                    Ok(meta) if meta.file_type().is_symlink() => {
                        if hops >= MAX_SYMLINK_HOPS {
                            return Err(io::Error::other(format!(
                                "too many levels of symbolic links at {}",
                                resolved.display()
                            )));
                        }
                        let target = std::fs::read_link(&resolved)?;
                        resolved.pop();
                        let next = resolved.join(target);
                        resolved = canonicalize_lenient(&next, hops + 1)?;
                    }
                    Ok(_) => {}
                    Err(e) if e.kind() == ErrorKind::PermissionDenied => return Err(e),
                    // Missing (or below a non-directory): keep it lexical.
                    Err(_) => {}
                }
            }
        }
    }

    Ok(resolved)
}
