//! Hierarchical context-file discovery results.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// Where in the hierarchy a context file was looked for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum NavigationLevel {
    VaultRoot,
    TargetFolder,
    Subdirectory(String),
}

impl fmt::Display for NavigationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VaultRoot => f.write_str("vault root"),
            Self::TargetFolder => f.write_str("target folder"),
            Self::Subdirectory(name) => write!(f, "subdirectory '{name}'"),
        }
    }
}

/// Outcome of looking for the context file at one level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextStatus {
    Found,
    NotFound,
    /// The file exists but could not be read; see `error`.
    Unreadable,
}

/// One visited level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationEntry {
    pub level: NavigationLevel,
    pub path: PathBuf,
    pub status: ContextStatus,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Context files ordered root, target folder, then subdirectories by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NavigationContext {
    pub entries: Vec<NavigationEntry>,
}

impl NavigationContext {
    /// Number of levels where the context file was present and read.
    #[must_use]
    pub fn found_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.status == ContextStatus::Found)
            .count()
    }
}
