use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn ragwire_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_ragwire"))
}

fn setup_test_env(checks: &str) -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let config_dir = root.join("config");
    fs::create_dir_all(&config_dir).unwrap();
    let payload_dir = root.join("payloads");
    fs::create_dir_all(&payload_dir).unwrap();

    fs::write(
        payload_dir.join("connection.json"),
        r#"{"id":"u1","email":"a@b.com","connected":true}"#,
    )
    .unwrap();
    fs::write(
        payload_dir.join("archived.json"),
        r#"{"filesCount":4,"chunksCount":30,"status":"archived","syncedAt":null,"error":null}"#,
    )
    .unwrap();
    fs::write(
        payload_dir.join("inconsistent.json"),
        r#"{"filesCount":4,"chunksCount":30,"status":"indexed","syncedAt":"2024-05-01T08:00:00Z","error":"quota exceeded"}"#,
    )
    .unwrap();
    fs::write(
        payload_dir.join("file.json"),
        r#"{"id":"f1","fileId":"1AbC","name":"Roadmap","mimeType":"application/pdf","webViewLink":"https://drive.google.com/file/d/1AbC/view","indexed":true}"#,
    )
    .unwrap();
    fs::write(
        payload_dir.join("hits.json"),
        r#"[
  {"docId":"d1","type":"pdf","title":"Alpha","url":"https://x/1","snippet":"a","score":0.2,"mimeType":"application/pdf","folderPath":null},
  {"docId":"d2","type":"gdoc","title":"Beta","url":"https://x/2","snippet":"b","score":0.9,"mimeType":"application/vnd.google-apps.document","folderPath":"/Team"},
  {"docId":"d3","type":"text","title":"Gamma","url":"https://x/3","snippet":"c","score":0.5,"mimeType":"text/plain","folderPath":null}
]"#,
    )
    .unwrap();
    fs::write(
        payload_dir.join("bundles.json"),
        r#"[{"bundleId":"s1","docIds":["p1","p2"],"locked":true},{"bundleId":"s2","docIds":["p3","p3"],"locked":false}]"#,
    )
    .unwrap();

    let config_content = format!(
        r#"[checks]
{}

[server]
bind = "127.0.0.1:7340"

[logging]
level = "warn"
"#,
        checks
    );
    let config_path = config_dir.join("ragwire.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn payload(config_path: &Path, name: &str) -> String {
    config_path
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("payloads")
        .join(name)
        .to_str()
        .unwrap()
        .to_string()
}

fn run_ragwire(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = ragwire_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run ragwire binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

#[test]
fn test_kinds_lists_every_contract() {
    let (_tmp, config_path) = setup_test_env("");
    let (stdout, stderr, success) = run_ragwire(&config_path, &["kinds"]);
    assert!(success, "kinds failed: {}", stderr);
    for name in [
        "drive.connection",
        "drive.file",
        "drive.sync_status",
        "drive.search_result",
        "rag.search_result",
        "rag.bundle",
        "rag.response",
        "rag.citation",
        "rag.user",
        "siftops.search_result",
        "siftops.bundle",
        "siftops.sync_status",
        "siftops.response",
        "siftops.citation",
    ] {
        assert!(stdout.contains(name), "missing {} in:\n{}", name, stdout);
    }
}

#[test]
fn test_missing_config_uses_defaults() {
    let tmp = TempDir::new().unwrap();
    let (_, stderr, success) = run_ragwire(&tmp.path().join("absent.toml"), &["kinds"]);
    assert!(success, "defaults should apply: {}", stderr);
}

#[test]
fn test_invalid_config_fails() {
    let tmp = TempDir::new().unwrap();
    let config_path = tmp.path().join("bad.toml");
    fs::write(&config_path, "[checks]\nscore_min = 3.0\nscore_max = 1.0\n").unwrap();
    let (_, stderr, success) = run_ragwire(&config_path, &["kinds"]);
    assert!(!success);
    assert!(stderr.contains("must not exceed"), "stderr: {}", stderr);
}

#[test]
fn test_check_connection_round_trips() {
    let (_tmp, config_path) = setup_test_env("");
    let file = payload(&config_path, "connection.json");
    let (stdout, stderr, success) = run_ragwire(&config_path, &["check", "drive.connection", &file]);
    assert!(success, "check failed: {}", stderr);

    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(
        value,
        serde_json::json!({"id": "u1", "email": "a@b.com", "connected": true})
    );
    assert!(stderr.contains("ok: valid drive.connection payload"));
}

#[test]
fn test_check_rejects_unknown_status() {
    let (_tmp, config_path) = setup_test_env("");
    let file = payload(&config_path, "archived.json");
    let (_, stderr, success) = run_ragwire(&config_path, &["check", "drive.sync_status", &file]);
    assert!(!success);
    assert!(stderr.contains("malformed drive.sync_status contract"), "stderr: {}", stderr);
    assert!(stderr.contains("archived"), "stderr: {}", stderr);
}

#[test]
fn test_check_fills_absent_nullable_fields() {
    let (_tmp, config_path) = setup_test_env("");
    let file = payload(&config_path, "file.json");
    let (stdout, stderr, success) = run_ragwire(&config_path, &["check", "drive.file", &file]);
    assert!(success, "check failed: {}", stderr);

    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert!(value["folderPath"].is_null());
    assert!(value["modifiedTime"].is_null());
    assert_eq!(value["fileId"], "1AbC");
}

#[test]
fn test_violation_warns_when_lenient() {
    let (_tmp, config_path) = setup_test_env("strict = false");
    let file = payload(&config_path, "inconsistent.json");
    let (_, stderr, success) = run_ragwire(&config_path, &["check", "drive.sync_status", &file]);
    assert!(success, "lenient check should pass: {}", stderr);
    assert!(stderr.contains("warning: error:"), "stderr: {}", stderr);
}

#[test]
fn test_violation_fails_when_strict() {
    let (_tmp, config_path) = setup_test_env("strict = true");
    let file = payload(&config_path, "inconsistent.json");
    let (_, stderr, success) = run_ragwire(&config_path, &["check", "drive.sync_status", &file]);
    assert!(!success);
    assert!(stderr.contains("1 check violation(s)"), "stderr: {}", stderr);
}

#[test]
fn test_check_many_json_report() {
    let (_tmp, config_path) = setup_test_env("");
    let file = payload(&config_path, "bundles.json");
    let (stdout, stderr, success) = run_ragwire(
        &config_path,
        &["check", "siftops.bundle", &file, "--many", "--json"],
    );
    assert!(success, "check failed: {}", stderr);

    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(report["contract"], "siftops.bundle");
    assert_eq!(report["normalized"].as_array().unwrap().len(), 2);
    assert_eq!(report["violations"][0]["field"], "[1].docIds[1]");
}

#[test]
fn test_check_unknown_kind() {
    let (_tmp, config_path) = setup_test_env("");
    let file = payload(&config_path, "connection.json");
    let (_, stderr, success) = run_ragwire(&config_path, &["check", "drive.folder", &file]);
    assert!(!success);
    assert!(stderr.contains("unknown contract kind"), "stderr: {}", stderr);
}

#[test]
fn test_rank_with_limit() {
    let (_tmp, config_path) = setup_test_env("");
    let file = payload(&config_path, "hits.json");
    let (stdout, stderr, success) = run_ragwire(
        &config_path,
        &["rank", "drive.search_result", &file, "--limit", "2"],
    );
    assert!(success, "rank failed: {}", stderr);

    let hits: Vec<serde_json::Value> = serde_json::from_str(&stdout).unwrap();
    let ids: Vec<&str> = hits.iter().map(|h| h["docId"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["d2", "d3"]);
}

#[test]
fn test_rank_normalize() {
    let (_tmp, config_path) = setup_test_env("");
    let file = payload(&config_path, "hits.json");
    let (stdout, _, success) = run_ragwire(
        &config_path,
        &["rank", "drive.search_result", &file, "--normalize"],
    );
    assert!(success);

    let hits: Vec<serde_json::Value> = serde_json::from_str(&stdout).unwrap();
    assert_eq!(hits[0]["score"], 1.0);
    assert_eq!(hits[2]["score"], 0.0);
}

#[test]
fn test_rank_rejects_non_search_kind() {
    let (_tmp, config_path) = setup_test_env("");
    let file = payload(&config_path, "bundles.json");
    let (_, stderr, success) = run_ragwire(&config_path, &["rank", "siftops.bundle", &file]);
    assert!(!success);
    assert!(stderr.contains("cannot be ranked"), "stderr: {}", stderr);
}
