//! Process-wide vault configuration.
//!
//! Read once at startup (TOML file, optionally overridden by CLI flags)
//! and never mutated afterwards. Every access-layer component receives it
//! by handle instead of reading ambient state.

use std::path::{Path, PathBuf};

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

use crate::error::{Result, VaultError};

/// Vault location, target folder, and the conventions used inside them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultConfig {
    /// Root of the note vault. Every path the server touches lives below it.
    pub vault_path: PathBuf,

    /// Folder (relative to `vault_path`) most operations default to.
    pub target_folder: String,

    /// Well-known context file name checked at every navigation level.
    #[serde(default = "default_context_file")]
    pub context_file: String,

    /// Display name reported to MCP clients.
    #[serde(default = "default_server_name")]
    pub server_name: String,

    /// Human-readable server instructions. Generated when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,

    /// chrono format string mapping a calendar date to a daily-note filename.
    #[serde(default = "default_daily_note_format")]
    pub daily_note_format: String,

    /// Suffix filter used when a listing request does not name one.
    #[serde(default = "default_suffix")]
    pub default_suffix: String,
}

fn default_context_file() -> String {
    "CLAUDE.md".to_string()
}

fn default_server_name() -> String {
    "vaultnav".to_string()
}

fn default_daily_note_format() -> String {
    "%Y-%m-%d.md".to_string()
}

fn default_suffix() -> String {
    ".md".to_string()
}

impl VaultConfig {
    /// Build a configuration with default conventions.
    #[must_use]
    pub fn new(vault_path: impl Into<PathBuf>, target_folder: impl Into<String>) -> Self {
        Self {
            vault_path: vault_path.into(),
            target_folder: target_folder.into(),
            context_file: default_context_file(),
            server_name: default_server_name(),
            instructions: None,
            daily_note_format: default_daily_note_format(),
            default_suffix: default_suffix(),
        }
    }

    /// Parse a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Config`] if the TOML is malformed or a required
    /// field is missing.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| VaultError::Config(e.to_string()))
    }

    /// Read and parse a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Config`] naming the file if it cannot be read
    /// or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            VaultError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        toml::from_str(&raw)
            .map_err(|e| VaultError::Config(format!("cannot parse {}: {e}", path.display())))
    }

    /// Check the conventions for values that would break later operations.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Config`] describing the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.vault_path.as_os_str().is_empty() {
            return Err(VaultError::Config("vault_path must not be empty".to_string()));
        }
        if self.target_folder.trim().is_empty() {
            return Err(VaultError::Config(
                "target_folder must not be empty".to_string(),
            ));
        }
        if self.context_file.is_empty() {
            return Err(VaultError::Config(
                "context_file must not be empty".to_string(),
            ));
        }
        if self.context_file.contains(['/', '\\']) {
            return Err(VaultError::Config(format!(
                "context_file must be a bare file name, got '{}'",
                self.context_file
            )));
        }
        if self.daily_note_format.is_empty() {
            return Err(VaultError::Config(
                "daily_note_format must not be empty".to_string(),
            ));
        }
        if StrftimeItems::new(&self.daily_note_format).any(|item| matches!(item, Item::Error)) {
            return Err(VaultError::Config(format!(
                "daily_note_format '{}' is not a valid date format",
                self.daily_note_format
            )));
        }
        Ok(())
    }

    /// Server instructions, falling back to a description of the target folder.
    #[must_use]
    pub fn instructions(&self) -> String {
        self.instructions.clone().unwrap_or_else(|| {
            format!(
                "Navigation and file access for the {folder} folder of a note vault. \
                 Load {ctx} context files for orientation, list and read files in \
                 {folder}, and load recent daily notes by date. All access is \
                 read-only and confined to the vault.",
                folder = self.target_folder,
                ctx = self.context_file,
            )
        })
    }
}
