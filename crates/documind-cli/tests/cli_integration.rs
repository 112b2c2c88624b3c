//! CLI integration tests: run the actual documind binary.
//! Tests that need a live service at localhost:8000 are marked `#[ignore]`.

use std::process::Command;

fn documind() -> Command {
    Command::new(env!("CARGO_BIN_EXE_documind"))
}

#[test]
fn test_cli_dashboard_sample_json() {
    let output = documind()
        .args(["dashboard", "--sample", "--json"])
        .output()
        .expect("failed to execute");
    assert!(
        output.status.success(),
        "documind dashboard failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    let snapshot: serde_json::Value =
        serde_json::from_str(stdout.trim()).expect("invalid JSON output");
    assert_eq!(snapshot["stats"].as_array().unwrap().len(), 4);
}

#[test]
fn test_cli_list_requires_credentials() {
    let tmp = tempfile::tempdir().unwrap();
    let output = documind()
        .args(["documents", "list"])
        .current_dir(tmp.path())
        .env("HOME", tmp.path())
        .env("XDG_CONFIG_HOME", tmp.path())
        .output()
        .expect("failed to execute");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("credentials required"));
}

#[test]
#[ignore]
fn test_cli_register_and_list() {
    let email = format!("cli-{}@example.com", std::process::id());

    let register = documind()
        .args(["register", "--email", &email, "--password", "pw"])
        .output()
        .expect("failed to execute");
    assert!(
        register.status.success(),
        "register failed: {}",
        String::from_utf8_lossy(&register.stderr)
    );

    let list = documind()
        .args(["documents", "list", "--json", "--email", &email, "--password", "pw"])
        .output()
        .expect("failed to execute");
    assert!(list.status.success());
    let stdout = String::from_utf8_lossy(&list.stdout);
    let docs: Vec<serde_json::Value> =
        serde_json::from_str(stdout.trim()).expect("invalid JSON output");
    assert!(docs.is_empty());
}

#[test]
#[ignore]
fn test_cli_wrong_password() {
    let output = documind()
        .args(["login", "--email", "nobody@example.com", "--password", "nope"])
        .output()
        .expect("failed to execute");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Login failed"));
}
