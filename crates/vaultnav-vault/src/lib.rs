//! # vaultnav-vault
//!
//! Read-only, scope-checked access to a note vault.
//!
//! Every path is routed through [`PathResolver`] before any read, list, or
//! stat. The components:
//! - [`PathResolver`] — canonicalize and contain candidate paths
//! - [`FileAccessor`] — non-blocking content + metadata reads
//! - [`DirectoryLister`] — recursive suffix-filtered listing
//! - [`DateRangeLoader`] — daily notes for a window of dates
//! - [`NavigationDiscovery`] — context files from root to target subfolders
//! - [`Vault`] — the shared handle binding them to one [`VaultConfig`](vaultnav_core::VaultConfig)

pub mod accessor;
pub mod dates;
pub mod lister;
pub mod navigation;
pub mod resolver;
pub mod vault;

pub use accessor::FileAccessor;
pub use dates::{date_pattern, DateRangeLoader};
pub use lister::DirectoryLister;
pub use navigation::NavigationDiscovery;
pub use resolver::{PathResolver, ResolvedPath};
pub use vault::{Vault, ROOT_LABEL};
