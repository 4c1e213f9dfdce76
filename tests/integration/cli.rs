use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Binary with its configuration isolated in `temp`.
fn facet_graph(temp: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("facet-graph").unwrap();
    cmd.env("FACET_GRAPH_CONFIG", temp.path().join("config.toml"))
        .env_remove("RUST_LOG");
    cmd
}

fn stdout(cmd: &mut Command) -> String {
    let output = cmd.output().unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    String::from_utf8(output.stdout).unwrap()
}

#[test]
fn test_key_is_order_independent() {
    let temp = TempDir::new().unwrap();

    let first = stdout(facet_graph(&temp).args([
        "key",
        "/products",
        "--query",
        r#"{"size": "M", "color": "red", "gone": null}"#,
    ]));
    let second = stdout(facet_graph(&temp).args([
        "key",
        "/products",
        "--query",
        r#"{"color": "red", "size": "M"}"#,
    ]));

    assert_eq!(first, second);
    assert!(first.starts_with("/products?"));
}

#[test]
fn test_key_of_empty_query_is_the_id() {
    let temp = TempDir::new().unwrap();

    facet_graph(&temp)
        .args(["key", "/products", "--query", r#"{"color": [], "size": null}"#])
        .assert()
        .success()
        .stdout("/products\n");
}

#[test]
fn test_clean_prints_cleaned_query() {
    let temp = TempDir::new().unwrap();

    let output = stdout(facet_graph(&temp).args([
        "clean",
        "--query",
        r#"{"category": ["roses", null], "color": null, "size": 0, ".offset": 0}"#,
    ]));
    let cleaned: serde_json::Value = serde_json::from_str(&output).unwrap();

    assert_eq!(
        cleaned,
        serde_json::json!({"category": ["roses"], "size": 0, ".offset": 0})
    );
}

#[test]
fn test_clean_truthy_drops_falsy_facets() {
    let temp = TempDir::new().unwrap();

    let output = stdout(facet_graph(&temp).args([
        "clean",
        "--truthy",
        "--query",
        r#"{"size": 0, "label": "", "color": "red", ".offset": 0}"#,
    ]));
    let cleaned: serde_json::Value = serde_json::from_str(&output).unwrap();

    assert_eq!(cleaned, serde_json::json!({"color": "red", ".offset": 0}));
}

#[test]
fn test_retention_from_config_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("graph.toml");
    std::fs::write(&path, "retention = \"truthy\"\n").unwrap();

    facet_graph(&temp)
        .arg("--config")
        .arg(&path)
        .args(["key", "/products", "--query", r#"{"size": 0}"#])
        .assert()
        .success()
        .stdout("/products\n");
}

#[test]
fn test_invalid_query_fails() {
    let temp = TempDir::new().unwrap();

    facet_graph(&temp)
        .args(["clean", "--query", "{not json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));

    facet_graph(&temp)
        .args(["key", "/products", "--query", "[1, 2]"])
        .assert()
        .failure();
}

#[test]
fn test_invalid_config_fails() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("config.toml"), "timeout_secs = 0\n").unwrap();

    facet_graph(&temp)
        .args(["key", "/products"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("timeout_secs"));
}

#[test]
fn test_verbose_conflicts_with_quiet() {
    let temp = TempDir::new().unwrap();

    facet_graph(&temp)
        .args(["-v", "-q", "key", "/products"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_help_lists_commands() {
    let temp = TempDir::new().unwrap();

    facet_graph(&temp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("key"))
        .stdout(predicate::str::contains("clean"))
        .stdout(predicate::str::contains("fetch"))
        .stdout(predicate::str::contains("facets"));
}
