// integration tests for the config command

use crate::common::*;
use serde_json::json;
use std::fs;
use std::path::Path;

/// run `eligibility config ...` with text output against `config_path`
fn run_config(args: &[&str], config_path: &Path) -> std::process::Output {
    // use --no-json to get text output (stdout is piped in tests, which auto-enables JSON)
    let mut cmd_args = vec!["--config", config_path.to_str().unwrap(), "--no-json", "config"];
    cmd_args.extend(args);
    run_eligibility_with_env(&cmd_args, &[])
}

#[test]
fn test_config_path_prefers_flag_over_env() {
    let dir = create_test_dir("config_path_flag");
    let flag_path = dir.join("flag.json");
    let env_path = dir.join("env.json");

    let output = run_eligibility_with_env(
        &["--no-json", "--config", flag_path.to_str().unwrap(), "config", "path"],
        &[("ELIGIBILITY_CONFIG", env_path.to_str().unwrap())],
    );
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        flag_path.to_str().unwrap()
    );

    let output = run_eligibility(&["--no-json", "config", "path"], &env_path);
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        env_path.to_str().unwrap()
    );

    cleanup_test_dir(&dir);
}

#[test]
fn test_config_show_missing_file_shows_defaults() {
    let dir = create_test_dir("config_show_defaults");
    let config_path = dir.join("config.json");

    let output = run_eligibility(&["--json", "config", "show"], &config_path);

    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["result"]["rules"], json!({}));
    assert_eq!(json["result"]["settings"]["fuzzy_threshold"], 2);
    assert!(!config_path.exists(), "show must not create the file");

    cleanup_test_dir(&dir);
}

#[test]
fn test_config_default_is_valid() {
    let dir = create_test_dir("config_default_valid");
    let config_path = dir.join("config.json");

    let output = run_config(&["default"], &config_path);
    assert!(output.status.success());
    fs::write(&config_path, &output.stdout).unwrap();

    let output = run_config(&["verify"], &config_path);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "verify failed: {}", stdout);
    assert!(stdout.contains("Configuration is valid"));

    cleanup_test_dir(&dir);
}

#[test]
fn test_config_verify_reports_errors() {
    let dir = create_test_dir("config_verify_errors");
    let config_path = write_json(
        &dir,
        "config.json",
        &json!({
            "rules": { "broken": "total > 5" },
            "settings": { "default_rule": "missing" }
        }),
    );

    let output = run_config(&["verify"], &config_path);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_eq!(output.status.code(), Some(5));
    assert!(stdout.contains("2 error(s)"));
    assert!(stdout.contains("rules.broken: criteria must be an object, got string"));
    assert!(stdout.contains("settings.default_rule"));

    cleanup_test_dir(&dir);
}

#[test]
fn test_config_verify_missing_file() {
    let dir = create_test_dir("config_verify_missing");

    let output = run_config(&["verify"], &dir.join("config.json"));
    assert_eq!(output.status.code(), Some(5));

    cleanup_test_dir(&dir);
}

#[test]
fn test_config_set_rule_then_check() {
    let dir = create_test_dir("config_set_rule");
    let config_path = dir.join("config.json");
    let cart = write_json(&dir, "cart.json", &json!({ "customer": { "tier": "gold" } }));

    let output = run_config(&["set", "rules.vip", r#"{ "customer.tier": "gold" }"#], &config_path);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Set rules.vip"));

    let output = run_config(&["set", "settings.default_rule", "vip"], &config_path);
    assert!(output.status.success());

    let output = run_eligibility(
        &["--json", "check", "--cart", cart.to_str().unwrap()],
        &config_path,
    );
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout_json(&output)["result"]["source"], "rule:vip");

    cleanup_test_dir(&dir);
}

#[test]
fn test_config_set_rule_with_dotted_name() {
    let dir = create_test_dir("config_set_dotted_rule");
    let config_path = dir.join("config.json");

    let output = run_config(&["set", "rules.black.friday", r#"{ "total": { "gte": 100 } }"#], &config_path);
    assert!(output.status.success());

    let output = run_eligibility(&["--json", "rules", "show", "black.friday"], &config_path);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout_json(&output)["result"]["name"], "black.friday");

    cleanup_test_dir(&dir);
}

#[test]
fn test_config_set_invalid_values() {
    let dir = create_test_dir("config_set_invalid");
    let config_path = dir.join("config.json");

    let output = run_config(&["set", "rules.bad", "[1, 2]"], &config_path);
    assert_eq!(output.status.code(), Some(4));

    let output = run_config(&["set", "settings.nope", "1"], &config_path);
    assert_eq!(output.status.code(), Some(4));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unknown config key"));

    assert!(!config_path.exists(), "failed sets must not write the file");

    cleanup_test_dir(&dir);
}

#[test]
fn test_config_invalid_file_is_config_error() {
    let dir = create_test_dir("config_invalid_file");
    let config_path = dir.join("config.json");
    fs::write(&config_path, "{ rules: ").unwrap();

    let output = run_config(&["show"], &config_path);
    assert_eq!(output.status.code(), Some(5));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to parse config file"));

    cleanup_test_dir(&dir);
}
