//! MCP tool definitions for read-only vault navigation and file access.

use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ServerHandler,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use vaultnav_core::{ContextStatus, VaultError};
use vaultnav_vault::Vault;

/// Days loaded by `load_recent_files_by_date` when the caller gives none.
const DEFAULT_DAYS_BACK: i64 = 7;

/// MCP server exposing one vault's target folder and context files.
#[derive(Debug, Clone)]
pub struct VaultMcpService {
    vault: Vault,
    tool_router: ToolRouter<Self>,
}

impl VaultMcpService {
    /// Create a server over an opened vault.
    pub fn new(vault: Vault) -> Self {
        Self {
            vault,
            tool_router: Self::tool_router(),
        }
    }

    fn target_folder(&self) -> &str {
        &self.vault.config().target_folder
    }
}

fn render<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| error_json(&e.to_string()))
}

fn error_json(message: &str) -> String {
    serde_json::json!({ "error": message }).to_string()
}

fn failure(context: &str, err: &VaultError) -> String {
    debug!(%context, error = %err, "tool call failed");
    error_json(&format!("{context}: {err}"))
}

/// `md`, `.md`, and `` (all files) are all accepted.
fn normalize_suffix(extension: &str) -> String {
    if extension.is_empty() || extension.starts_with('.') {
        extension.to_string()
    } else {
        format!(".{extension}")
    }
}

// === Tool request types ===

/// Request to list files in the target folder.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListFilesRequest {
    /// File extension to filter by (e.g. "md" or ".txt"). Empty string lists
    /// every file; omitted uses the configured default.
    pub file_extension: Option<String>,
}

/// Request to load one file from the target folder.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LoadFileRequest {
    /// File name relative to the target folder (e.g. "2025-01-15.md")
    pub filename: String,
}

/// Request for date-named files in a recent window.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RecentFilesRequest {
    /// Number of days to look back from today, 1..=365 (default: 7)
    pub days_back: Option<i64>,
}

/// Request for one subdirectory's context file.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SubdirectoryRequest {
    /// Subdirectory path relative to the vault root (e.g. "Yoga", "Literature")
    pub subdirectory: String,
}

#[tool_router]
impl VaultMcpService {
    /// Current local date, time, and UTC offset.
    #[tool(
        description = "Get the current date and time with timezone information",
        annotations(read_only_hint = true, idempotent_hint = false, open_world_hint = false)
    )]
    fn get_current_time(&self) -> String {
        let now = chrono::Local::now();
        render(&serde_json::json!({
            "time": now.format("%Y-%m-%d %H:%M:%S").to_string(),
            "timezone": now.format("%:z").to_string(),
        }))
    }

    /// Context files at vault root, target folder, and target subdirectories.
    #[tool(
        description = "Load navigation context files from the vault root, the target folder, and each of its immediate subdirectories (read-only)",
        annotations(read_only_hint = true, idempotent_hint = true, open_world_hint = false)
    )]
    async fn load_navigation_context(&self) -> String {
        match self.vault.discover().await {
            Ok(nav) => render(&serde_json::json!({
                "entries": nav.entries,
                "found": nav.found_count(),
                "vault_path": self.vault.root(),
                "target_folder": self.target_folder(),
            })),
            Err(e) => failure("Failed to load navigation context", &e),
        }
    }

    /// Context file of the target folder alone.
    #[tool(
        description = "Load the navigation context file from the configured target folder (read-only)",
        annotations(read_only_hint = true, idempotent_hint = true, open_world_hint = false)
    )]
    async fn load_target_folder_context(&self) -> String {
        let entry = self.vault.target_context().await;
        let loaded = entry.status == ContextStatus::Found;
        let message = match entry.status {
            ContextStatus::Found => "Target folder navigation loaded".to_string(),
            ContextStatus::NotFound => format!(
                "No {} found in target folder: {}",
                self.vault.config().context_file,
                self.target_folder()
            ),
            ContextStatus::Unreadable => format!(
                "Target folder navigation unreadable: {}",
                entry.error.as_deref().unwrap_or("unknown error")
            ),
        };
        render(&serde_json::json!({
            "target_folder": self.target_folder(),
            "path": entry.path,
            "content": entry.content,
            "loaded": loaded,
            "status": entry.status,
            "message": message,
        }))
    }

    /// Context file of one vault subdirectory.
    #[tool(
        description = "Load the navigation context file from a specific vault subdirectory (read-only)",
        annotations(read_only_hint = true, idempotent_hint = true, open_world_hint = false)
    )]
    async fn discover_subdirectory_navigation(
        &self,
        Parameters(req): Parameters<SubdirectoryRequest>,
    ) -> String {
        match self.vault.subdirectory_context(&req.subdirectory).await {
            Ok(entry) => render(&entry),
            Err(e) => failure("Failed to discover subdirectory navigation", &e),
        }
    }

    /// Every directory in the vault that has a context file.
    #[tool(
        description = "List every vault directory that contains a navigation context file (read-only)",
        annotations(read_only_hint = true, idempotent_hint = true, open_world_hint = false)
    )]
    async fn list_navigation_files(&self) -> String {
        match self.vault.context_files().await {
            Ok(dirs) => render(&serde_json::json!({
                "total_count": dirs.len(),
                "available_navigation": dirs,
                "vault_path": self.vault.root(),
                "target_folder": self.vault.target(),
            })),
            Err(e) => failure("Failed to list navigation files", &e),
        }
    }

    /// Recursive listing of the target folder.
    #[tool(
        description = "List files in the target folder recursively, optionally filtered by extension (read-only)",
        annotations(read_only_hint = true, idempotent_hint = true, open_world_hint = false)
    )]
    async fn list_target_folder_files(
        &self,
        Parameters(req): Parameters<ListFilesRequest>,
    ) -> String {
        let suffix = req.file_extension.as_deref().map(normalize_suffix);
        match self.vault.list_target(suffix.as_deref()).await {
            Ok(listing) => render(&serde_json::json!({
                "target_folder": self.target_folder(),
                "folder_path": self.vault.target(),
                "total_count": listing.entries.len(),
                "files": listing.entries,
                "skipped_dirs": listing.skipped_dirs,
                "filter": suffix.as_deref().map_or_else(
                    || self.vault.config().default_suffix.clone(),
                    |s| if s.is_empty() { "all files".to_string() } else { s.to_string() },
                ),
            })),
            Err(e) => failure("Failed to list target folder files", &e),
        }
    }

    /// One file from the target folder.
    #[tool(
        description = "Load the content and metadata of a file in the target folder (read-only)",
        annotations(read_only_hint = true, idempotent_hint = true, open_world_hint = false)
    )]
    async fn load_target_folder_file(&self, Parameters(req): Parameters<LoadFileRequest>) -> String {
        match self.vault.load_file(&req.filename).await {
            Ok(record) => render(&serde_json::json!({
                "target_folder": self.target_folder(),
                "file": record,
            })),
            Err(e) => failure(&format!("Failed to load file {}", req.filename), &e),
        }
    }

    /// Date-named files for the last `days_back` days.
    #[tool(
        description = "Load date-named files (e.g. daily notes) from the target folder for the last N days, 1 to 365 (read-only)",
        annotations(read_only_hint = true, idempotent_hint = true, open_world_hint = false)
    )]
    async fn load_recent_files_by_date(
        &self,
        Parameters(req): Parameters<RecentFilesRequest>,
    ) -> String {
        let days_back = req.days_back.unwrap_or(DEFAULT_DAYS_BACK);
        match self.vault.recent_notes(days_back).await {
            Ok(result) => render(&serde_json::json!({
                "target_folder": self.target_folder(),
                "date_range": result,
            })),
            Err(e) => failure("Failed to load recent files", &e),
        }
    }
}

#[tool_handler]
impl ServerHandler for VaultMcpService {
    fn get_info(&self) -> ServerInfo {
        let mut info = ServerInfo {
            instructions: Some(self.vault.config().instructions()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        };
        info.server_info.name = self.vault.config().server_name.clone();
        info
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use vaultnav_core::VaultConfig;

    fn service() -> (tempfile::TempDir, VaultMcpService) {
        let dir = tempfile::tempdir().unwrap();
        let v = dir.path();
        fs::create_dir_all(v.join("Daybook/Week")).unwrap();
        fs::write(v.join("CLAUDE.md"), "root guide").unwrap();
        fs::write(v.join("Daybook/entry.md"), "entry").unwrap();
        fs::write(v.join("Daybook/notes.txt"), "txt").unwrap();

        let mut config = VaultConfig::new(v, "Daybook");
        config.server_name = "daybook-test".to_string();
        let vault = Vault::open(config).unwrap();
        (dir, VaultMcpService::new(vault))
    }

    fn parse(s: &str) -> serde_json::Value {
        serde_json::from_str(s).expect("tool output is JSON")
    }

    #[test]
    fn normalize_suffix_accepts_bare_and_dotted() {
        assert_eq!(normalize_suffix("md"), ".md");
        assert_eq!(normalize_suffix(".md"), ".md");
        assert_eq!(normalize_suffix(""), "");
    }

    #[test]
    fn server_info_uses_configured_name() {
        let (_dir, service) = service();
        let info = service.get_info();
        assert_eq!(info.server_info.name, "daybook-test");
        assert!(info.instructions.unwrap_or_default().contains("Daybook"));
    }

    #[test]
    fn current_time_has_time_and_timezone() {
        let (_dir, service) = service();
        let json = parse(&service.get_current_time());
        assert!(json["time"].as_str().is_some());
        assert!(json["timezone"].as_str().is_some());
    }

    #[tokio::test]
    async fn navigation_context_lists_every_level() {
        let (_dir, service) = service();
        let json = parse(&service.load_navigation_context().await);
        assert_eq!(json["entries"].as_array().unwrap().len(), 3);
        assert_eq!(json["found"], 1);
        assert_eq!(json["entries"][0]["status"], "found");
        assert_eq!(json["entries"][1]["status"], "not_found");
    }

    #[tokio::test]
    async fn list_files_applies_extension_filter() {
        let (_dir, service) = service();
        let json = parse(
            &service
                .list_target_folder_files(Parameters(ListFilesRequest {
                    file_extension: Some("txt".to_string()),
                }))
                .await,
        );
        assert_eq!(json["total_count"], 1);
        assert_eq!(json["filter"], ".txt");

        let json = parse(
            &service
                .list_target_folder_files(Parameters(ListFilesRequest {
                    file_extension: Some(String::new()),
                }))
                .await,
        );
        assert_eq!(json["total_count"], 2);
        assert_eq!(json["filter"], "all files");
    }

    #[tokio::test]
    async fn load_file_reports_missing_as_data() {
        let (_dir, service) = service();
        let json = parse(
            &service
                .load_target_folder_file(Parameters(LoadFileRequest {
                    filename: "missing.md".to_string(),
                }))
                .await,
        );
        assert_eq!(json["file"]["exists"], false);
        assert!(json.get("error").is_none());
    }

    #[tokio::test]
    async fn load_file_rejects_traversal() {
        let (_dir, service) = service();
        let json = parse(
            &service
                .load_target_folder_file(Parameters(LoadFileRequest {
                    filename: "../../etc/passwd".to_string(),
                }))
                .await,
        );
        assert!(json["error"].as_str().unwrap().contains("REJECTED"));
    }

    #[tokio::test]
    async fn recent_files_reject_out_of_range() {
        let (_dir, service) = service();
        let json = parse(
            &service
                .load_recent_files_by_date(Parameters(RecentFilesRequest {
                    days_back: Some(366),
                }))
                .await,
        );
        assert!(json["error"].as_str().unwrap().contains("between 1 and 365"));

        let json = parse(
            &service
                .load_recent_files_by_date(Parameters(RecentFilesRequest { days_back: None }))
                .await,
        );
        assert_eq!(json["date_range"]["requested_days"], 7);
    }

    #[tokio::test]
    async fn target_folder_context_reports_absence_as_not_loaded() {
        let (dir, service) = service();
        let json = parse(&service.load_target_folder_context().await);
        assert_eq!(json["loaded"], false);
        assert_eq!(json["status"], "not_found");
        assert_eq!(json["content"], "");
        assert!(json["message"].as_str().unwrap().contains("CLAUDE.md"));

        fs::write(dir.path().join("Daybook/CLAUDE.md"), "daybook guide").unwrap();
        let json = parse(&service.load_target_folder_context().await);
        assert_eq!(json["loaded"], true);
        assert_eq!(json["content"], "daybook guide");
    }

    #[test]
    fn every_tool_is_annotated_read_only() {
        let (_dir, service) = service();
        let tools = service.tool_router.list_all();
        assert_eq!(tools.len(), 8);
        for tool in tools {
            let annotations = tool.annotations.expect("annotations");
            assert_eq!(annotations.read_only_hint, Some(true), "{}", tool.name);
            // The clock is the only input that changes between calls.
            let idempotent = tool.name != "get_current_time";
            assert_eq!(annotations.idempotent_hint, Some(idempotent), "{}", tool.name);
        }
    }
}
