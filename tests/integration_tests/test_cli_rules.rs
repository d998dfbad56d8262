// integration tests for the rules command

use crate::common::*;
use serde_json::json;

fn config_with_rules(name: &str) -> (std::path::PathBuf, std::path::PathBuf) {
    let dir = create_test_dir(name);
    let config = write_json(
        &dir,
        "config.json",
        &json!({
            "rules": {
                "summer_sale": { "total": { "gte": 50 }, "items.category": "swimwear" },
                "vip": { "customer.tier": { "in": ["gold", "platinum"] } }
            },
            "settings": { "default_rule": "vip" }
        }),
    );
    (dir, config)
}

#[test]
fn test_rules_list_json() {
    let (dir, config) = config_with_rules("rules_list_json");

    let output = run_eligibility(&["--json", "rules", "list"], &config);
    assert!(output.status.success());

    let json = stdout_json(&output);
    let rules = json["result"]["rules"].as_array().unwrap();
    assert_eq!(rules.len(), 2);
    assert_eq!(rules[0]["name"], "summer_sale");
    assert_eq!(rules[0]["entries"], 2);
    assert_eq!(rules[0]["is_default"], false);
    assert_eq!(rules[1]["name"], "vip");
    assert_eq!(rules[1]["is_default"], true);

    cleanup_test_dir(&dir);
}

#[test]
fn test_rules_list_text() {
    let (dir, config) = config_with_rules("rules_list_text");

    let output = run_eligibility(&["--no-json", "rules", "list"], &config);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("summer_sale  [2 entries]"));
    assert!(stdout.contains("vip (default)  [1 entries]"));

    cleanup_test_dir(&dir);
}

#[test]
fn test_rules_show() {
    let (dir, config) = config_with_rules("rules_show");

    let output = run_eligibility(&["--json", "rules", "show", "vip"], &config);
    assert!(output.status.success());

    let json = stdout_json(&output);
    assert_eq!(json["result"]["name"], "vip");
    assert_eq!(
        json["result"]["summary"],
        r#"all(customer.tier in ["gold", "platinum"])"#
    );
    assert_eq!(
        json["result"]["criteria"],
        json!({ "customer.tier": { "in": ["gold", "platinum"] } })
    );

    cleanup_test_dir(&dir);
}

#[test]
fn test_rules_show_unknown() {
    let (dir, config) = config_with_rules("rules_show_unknown");

    let output = run_eligibility(&["--no-json", "rules", "show", "vipp"], &config);

    assert_eq!(output.status.code(), Some(6));
    assert!(String::from_utf8_lossy(&output.stderr).contains("did you mean: vip"));

    cleanup_test_dir(&dir);
}
