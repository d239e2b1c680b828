//! # vaultnav-mcp
//!
//! MCP (Model Context Protocol) server for a note vault.
//!
//! Exposes read-only vault operations as MCP tools:
//! - `get_current_time`: Local time and UTC offset
//! - `load_navigation_context`: Context files from root to target subfolders
//! - `load_target_folder_context`: The target folder's own context file
//! - `discover_subdirectory_navigation`: One subdirectory's context file
//! - `list_navigation_files`: Every directory holding a context file
//! - `list_target_folder_files`: Recursive listing of the target folder
//! - `load_target_folder_file`: Read a file from the target folder
//! - `load_recent_files_by_date`: Daily notes for the last N days

pub mod tools;

pub use tools::VaultMcpService;
