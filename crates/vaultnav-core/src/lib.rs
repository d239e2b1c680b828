//! # vaultnav-core
//!
//! Core types shared by the vaultnav crates:
//! - [`VaultConfig`] — immutable process-wide configuration
//! - Error hierarchy ([`VaultError`], [`ReadError`])
//! - Records ([`FileRecord`], [`DirectoryEntry`], [`Listing`])
//! - Date ranges ([`DateRangeResult`], [`DatedFile`])
//! - Navigation ([`NavigationContext`], [`NavigationEntry`])

pub mod config;
pub mod error;
pub mod navigation;
pub mod range;
pub mod record;

pub use config::VaultConfig;
pub use error::{ReadError, Result, VaultError};
pub use navigation::{ContextStatus, NavigationContext, NavigationEntry, NavigationLevel};
pub use range::{DateRangeResult, DatedFile, MAX_DAYS_BACK};
pub use record::{DirectoryEntry, FileRecord, Listing};
