//! End-to-end tests for the vaultnav CLI.
//!
//! Tests invoke the `vaultnav` binary as a subprocess and verify JSON output.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn vaultnav() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_vaultnav"));
    for var in ["VAULTNAV_CONFIG", "VAULTNAV_VAULT", "VAULTNAV_TARGET", "RUST_LOG"] {
        cmd.env_remove(var);
    }
    cmd
}

fn run_in_vault(vault: &Path, args: &[&str]) -> Output {
    vaultnav()
        .arg("--vault")
        .arg(vault)
        .args(["--target", "Daybook"])
        .args(args)
        .output()
        .unwrap()
}

fn json_of(output: &Output) -> serde_json::Value {
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

fn init_vault() -> TempDir {
    let dir = TempDir::new().unwrap();
    let v = dir.path();
    fs::create_dir_all(v.join("Daybook/Rituals")).unwrap();
    fs::create_dir_all(v.join("Daybook/Archive")).unwrap();
    fs::create_dir_all(v.join("Yoga")).unwrap();
    fs::write(v.join("CLAUDE.md"), "# Vault guide").unwrap();
    fs::write(v.join("Daybook/CLAUDE.md"), "# Daybook guide").unwrap();
    fs::write(v.join("Yoga/CLAUDE.md"), "# Yoga guide").unwrap();
    fs::write(v.join("Daybook/Rituals/morning.md"), "stretch").unwrap();
    fs::write(v.join("Daybook/scratch.txt"), "scratch").unwrap();
    dir
}

// === Configuration ===

#[test]
fn e2e_requires_vault_and_target() {
    let output = vaultnav().arg("nav").output().unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--vault"), "{stderr}");
}

#[test]
fn e2e_config_file_is_honored() {
    let dir = init_vault();
    let config = dir.path().join("vaultnav.toml");
    fs::write(
        &config,
        format!(
            "vault_path = {:?}\ntarget_folder = \"Daybook\"\ndefault_suffix = \".txt\"\n",
            dir.path().display().to_string()
        ),
    )
    .unwrap();

    let output = vaultnav()
        .arg("--config")
        .arg(&config)
        .arg("list")
        .output()
        .unwrap();
    let json = json_of(&output);
    let entries = json["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["name"], "scratch.txt");
}

#[test]
fn e2e_missing_target_folder_fails() {
    let dir = init_vault();
    let output = vaultnav()
        .arg("--vault")
        .arg(dir.path())
        .args(["--target", "Nowhere", "nav"])
        .output()
        .unwrap();
    assert!(!output.status.success());
}

// === Navigation ===

#[test]
fn e2e_nav_returns_root_target_and_subdirectories() {
    let dir = init_vault();
    let json = json_of(&run_in_vault(dir.path(), &["nav"]));
    let entries = json["entries"].as_array().unwrap();

    assert_eq!(entries.len(), 4);
    assert_eq!(entries[0]["level"]["kind"], "vault_root");
    assert_eq!(entries[0]["content"], "# Vault guide");
    assert_eq!(entries[1]["level"]["kind"], "target_folder");
    assert_eq!(entries[1]["status"], "found");
    assert_eq!(entries[2]["level"]["name"], "Archive");
    assert_eq!(entries[2]["status"], "not_found");
    assert_eq!(entries[3]["level"]["name"], "Rituals");
}

#[test]
fn e2e_target_nav_loads_target_context() {
    let dir = init_vault();
    let json = json_of(&run_in_vault(dir.path(), &["target-nav"]));
    assert_eq!(json["level"]["kind"], "target_folder");
    assert_eq!(json["status"], "found");
    assert_eq!(json["content"], "# Daybook guide");
}

#[test]
fn e2e_nav_files_lists_context_directories() {
    let dir = init_vault();
    let json = json_of(&run_in_vault(dir.path(), &["nav-files"]));
    assert_eq!(json, serde_json::json!(["/ (root)", "Daybook", "Yoga"]));
}

#[test]
fn e2e_subdir_loads_context() {
    let dir = init_vault();
    let json = json_of(&run_in_vault(dir.path(), &["subdir", "Yoga"]));
    assert_eq!(json["status"], "found");
    assert_eq!(json["content"], "# Yoga guide");
}

#[test]
fn e2e_subdir_outside_vault_is_rejected() {
    let dir = init_vault();
    let output = run_in_vault(dir.path(), &["subdir", "../.."]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("REJECTED"));
}

// === Files ===

#[test]
fn e2e_list_defaults_to_markdown() {
    let dir = init_vault();
    let json = json_of(&run_in_vault(dir.path(), &["list"]));
    let names: Vec<&str> = json["entries"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["relative_path"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["CLAUDE.md", "Rituals/morning.md"]);
    assert_eq!(json["skipped_dirs"], 0);
}

#[test]
fn e2e_read_existing_and_missing() {
    let dir = init_vault();
    let json = json_of(&run_in_vault(dir.path(), &["read", "Rituals/morning.md"]));
    assert_eq!(json["exists"], true);
    assert_eq!(json["content"], "stretch");
    assert_eq!(json["size_bytes"], 7);

    let json = json_of(&run_in_vault(dir.path(), &["read", "nope.md"]));
    assert_eq!(json["exists"], false);
    assert_eq!(json["error"], "not_found");
}

#[test]
fn e2e_read_traversal_is_rejected() {
    let dir = init_vault();
    let output = run_in_vault(dir.path(), &["read", "../../../etc/passwd"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).is_empty());
}

// === Date ranges ===

#[test]
fn e2e_recent_finds_todays_note() {
    let dir = init_vault();
    let today = chrono::Local::now().date_naive();
    fs::write(
        dir.path()
            .join("Daybook")
            .join(format!("{}.md", today.format("%Y-%m-%d"))),
        "today's note",
    )
    .unwrap();

    let json = json_of(&run_in_vault(dir.path(), &["recent", "--days", "3"]));
    assert_eq!(json["requested_days"], 3);
    assert_eq!(json["total_found"], 1);
    assert_eq!(json["files"][0]["content"], "today's note");
}

#[test]
fn e2e_recent_rejects_out_of_range() {
    let dir = init_vault();
    for days in ["0", "366"] {
        let output = run_in_vault(dir.path(), &["recent", "--days", days]);
        assert!(!output.status.success());
        assert!(String::from_utf8_lossy(&output.stderr).contains("between 1 and 365"));
    }
}
