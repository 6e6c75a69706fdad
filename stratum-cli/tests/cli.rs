//! Integration tests for the stratum commands.
//!
//! Each test runs the real binary against a temporary configuration
//! project and checks stdout and the exit status.

mod common;

use common::TestEnv;
use predicates::prelude::*;

// ============================================================================
// Basic CLI
// ============================================================================

#[test]
fn test_help() {
    let env = TestEnv::new();
    env.command_bare()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Resolve layered configuration"))
        .stdout(predicate::str::contains("explain"));
}

#[test]
fn test_version() {
    let env = TestEnv::new();
    env.command_bare()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("stratum"));
}

#[test]
fn test_missing_subcommand_is_usage_error() {
    let env = TestEnv::new();
    env.command_bare().assert().failure();
}

// ============================================================================
// get
// ============================================================================

#[test]
fn test_get_base_value() {
    let env = TestEnv::with_project();
    assert_eq!(env.get("app.name", &[]), "demo");
    assert_eq!(env.get("app.greeting", &[]), "hello demo");
}

#[test]
fn test_get_with_profile_uses_variant() {
    let env = TestEnv::with_project();
    assert_eq!(env.get("app.name", &["--profile", "prod"]), "demo-prod");
    assert_eq!(
        env.get("app.greeting", &["--profile", "prod"]),
        "hello demo-prod"
    );
}

#[test]
fn test_get_gated_document() {
    let env = TestEnv::with_project();

    env.command()
        .arg("get")
        .arg("app.region")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not set"));

    assert_eq!(env.get("app.region", &["--profile", "eu"]), "eu-west");
}

#[test]
fn test_get_list() {
    let env = TestEnv::with_project();
    env.command()
        .args(["get", "servers", "--list"])
        .assert()
        .success()
        .stdout("alpha\nbeta\n");
}

#[test]
fn test_get_default_for_missing_property() {
    let env = TestEnv::with_project();
    env.command()
        .args(["get", "app.missing", "--default", "fallback"])
        .assert()
        .success()
        .stdout("fallback\n");
}

#[test]
fn test_set_overrides_imported_values() {
    let env = TestEnv::with_project();
    assert_eq!(env.get("app.name", &["--set", "app.name=cli"]), "cli");
    assert_eq!(
        env.get("app.greeting", &["--set", "app.name=cli"]),
        "hello cli"
    );
}

#[test]
fn test_set_without_settings() {
    let env = TestEnv::new();
    assert_eq!(
        env.get("greeting", &["--set", "name=world", "--set", "greeting=hi ${name}"]),
        "hi world"
    );
}

// ============================================================================
// resolve
// ============================================================================

#[test]
fn test_resolve_text() {
    let env = TestEnv::with_project();
    env.command()
        .arg("resolve")
        .assert()
        .success()
        .stdout(predicate::str::contains("# profiles: default"))
        .stdout(predicate::str::contains("app.name=demo\n"))
        .stdout(predicate::str::contains("servers[1]=beta\n"))
        .stdout(predicate::str::contains("app.region").not());
}

#[test]
fn test_resolve_json() {
    let env = TestEnv::with_project();
    let output = env
        .command()
        .args(["--profile", "prod", "resolve", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["properties"]["app.name"], "demo-prod");
    assert_eq!(json["profiles"]["active"], serde_json::json!(["prod"]));
    assert!(json.get("property_sources").is_none());
}

#[test]
fn test_resolve_json_with_sources() {
    let env = TestEnv::with_project();
    let output = env
        .command()
        .args(["resolve", "--format", "json", "--sources"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let sources = json["property_sources"].as_array().unwrap();
    assert!(sources.len() >= 2);
}

#[test]
fn test_resolve_yaml() {
    let env = TestEnv::with_project();
    env.command()
        .args(["resolve", "--format", "yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("properties:"))
        .stdout(predicate::str::contains("app.name: demo"));
}

// ============================================================================
// explain
// ============================================================================

#[test]
fn test_explain_profile_variant() {
    let env = TestEnv::with_project();
    env.command()
        .args(["--profile", "prod", "explain", "app.greeting"])
        .assert()
        .success()
        .stdout(predicate::str::contains("value:    hello demo-prod"))
        .stdout(predicate::str::contains("raw:      hello ${app.name}"))
        .stdout(predicate::str::contains("location: app.yml"));

    env.command()
        .args(["--profile", "prod", "explain", "app.name"])
        .assert()
        .success()
        .stdout(predicate::str::contains("profile:  prod"))
        .stdout(predicate::str::contains("app-prod.yml"));
}

#[test]
fn test_explain_json() {
    let env = TestEnv::with_project();
    let output = env
        .command()
        .args(["explain", "app.name", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["value"], "demo");
    assert_eq!(json["location"], "app.yml");
    assert_eq!(json["phase"], "before-profile-activation");
}

#[test]
fn test_explain_missing_property() {
    let env = TestEnv::with_project();
    env.command()
        .args(["explain", "nope"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Property 'nope' is not set"));
}

// ============================================================================
// tree
// ============================================================================

#[test]
fn test_tree_marks_inactive_documents() {
    let env = TestEnv::with_project();
    env.command()
        .args(["tree", "--sources"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("ROOT"))
        .stdout(predicate::str::contains("on-profile=eu"))
        .stdout(predicate::str::contains("(inactive)"))
        .stdout(predicate::str::contains("Property sources (highest precedence first):"));
}

#[test]
fn test_tree_with_profiles_activates_documents() {
    let env = TestEnv::with_project();
    env.command()
        .args(["--profile", "eu", "tree"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(inactive)").not());
}

// ============================================================================
// validate
// ============================================================================

#[test]
fn test_validate_valid_settings() {
    let env = TestEnv::with_project();
    env.command()
        .args(["validate", "stratum.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Settings are valid"));
}

#[test]
fn test_validate_invalid_profile_name() {
    let env = TestEnv::new();
    env.write("bad.yaml", "profiles:\n  active: ['prod eu']\n");
    env.command()
        .args(["validate", "bad.yaml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Validation error"));
}

#[test]
fn test_validate_unknown_field() {
    let env = TestEnv::new();
    env.write("bad.yaml", "profile: prod\n");
    env.command()
        .args(["validate", "bad.yaml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Parse error"));
}

#[test]
fn test_validate_missing_file() {
    let env = TestEnv::new();
    env.command()
        .args(["validate", "missing.yaml"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("File not found"));
}

// ============================================================================
// completions
// ============================================================================

#[test]
fn test_completions_bash() {
    let env = TestEnv::new();
    env.command_bare()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("stratum"));
}
