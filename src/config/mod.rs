mod schema;

pub use schema::{Config, Settings, DEFAULT_FUZZY_THRESHOLD};

use anyhow::{anyhow, Context, Result};
use serde::de::DeserializeOwned;
use serde_json::{json, Value as JsonValue};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::conditions::{parse_criteria_at, Criteria};

pub const CONFIG_ENV_VAR: &str = "ELIGIBILITY_CONFIG";

pub fn get_config_path() -> Result<PathBuf> {
    if let Ok(path) = env::var(CONFIG_ENV_VAR) {
        return Ok(PathBuf::from(path));
    }

    // ~/.eligibility/config.json
    let home = dirs::home_dir().ok_or_else(|| anyhow!("Could not find home directory"))?;
    Ok(home.join(".eligibility").join("config.json"))
}

/// config path from --config, falling back to the env var and default location
pub fn get_config_path_with_override(path: Option<&Path>) -> Result<PathBuf> {
    match path {
        Some(p) => Ok(p.to_path_buf()),
        None => get_config_path(),
    }
}

/// parse strict JSON, falling back to JSON5 (comments, trailing commas)
///
/// strict JSON goes first so integers keep their exact representation.
pub fn parse_document<T: DeserializeOwned>(content: &str) -> Result<T> {
    match serde_json::from_str(content) {
        Ok(value) => Ok(value),
        Err(_) => json5::from_str(content).map_err(|e| anyhow!("{}", e)),
    }
}

/// load the config file at `path`; a missing file yields the defaults
pub fn load_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = parse_document(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    tracing::debug!(
        path = %path.display(),
        rules = config.rules.len(),
        "loaded config"
    );

    Ok(config)
}

pub fn load_with_override(path: Option<&Path>) -> Result<Config> {
    load_from(&get_config_path_with_override(path)?)
}

pub fn save_to(config: &Config, path: &Path) -> Result<()> {
    // ensure directory exists
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let content = serde_json::to_string_pretty(config).context("Failed to serialize config")?;

    fs::write(path, content)
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;

    Ok(())
}

pub fn save_with_override(config: &Config, path: Option<&Path>) -> Result<()> {
    save_to(config, &get_config_path_with_override(path)?)
}

/// parsed criteria of a named rule
pub fn rule_criteria(config: &Config, name: &str) -> Result<Option<Criteria>> {
    match config.rule(name) {
        Some(json) => {
            let criteria = parse_criteria_at(json, &format!("rules.{}", name))?;
            Ok(Some(criteria))
        }
        None => Ok(None),
    }
}

/// Verify configuration file and return a list of errors
pub fn verify(path: &Path) -> Result<Vec<String>> {
    let mut errors = Vec::new();

    if !path.exists() {
        return Err(anyhow!("config file not found: {}", path.display()));
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;

    let config: Config = match parse_document(&content) {
        Ok(c) => c,
        Err(e) => {
            return Err(anyhow!("invalid JSON: {}", e));
        }
    };

    // every rule must be a criteria mapping
    for (name, rule) in &config.rules {
        if let Err(e) = parse_criteria_at(rule, &format!("rules.{}", name)) {
            errors.push(e.to_string());
        }
    }

    if let Some(default_rule) = &config.settings.default_rule {
        if config.rule(default_rule).is_none() {
            errors.push(format!(
                "settings.default_rule: rule '{}' is not defined",
                default_rule
            ));
        }
    }

    Ok(errors)
}

pub fn set_value(config: &mut Config, key: &str, value: &str) -> Result<()> {
    // rule names may themselves contain dots
    if let Some(name) = key.strip_prefix("rules.").filter(|name| !name.is_empty()) {
        let rule: JsonValue = parse_document(value)
            .with_context(|| format!("Invalid criteria JSON for rule '{}'", name))?;
        parse_criteria_at(&rule, key)?;
        config.rules.insert(name.to_string(), rule);
        return Ok(());
    }

    match key {
        "settings.default_rule" => {
            config.settings.default_rule = match value {
                "" | "none" | "null" => None,
                name => Some(name.to_string()),
            };
        }
        "settings.fuzzy_threshold" => {
            config.settings.fuzzy_threshold = value
                .parse()
                .with_context(|| format!("Invalid number: {}", value))?;
        }
        _ => {
            return Err(anyhow!(
                "Unknown config key: {}. Valid keys: settings.default_rule, settings.fuzzy_threshold, rules.<name>",
                key
            ));
        }
    }

    Ok(())
}

/// generates a default config with example rules
pub fn default_with_examples() -> Config {
    let mut config = Config::default();

    config.rules.insert(
        "summer_sale".to_string(),
        json!({
            "items.category": { "in": ["swimwear", "sandals", "sunglasses"] },
            "total": { "gte": 50 }
        }),
    );
    config.rules.insert(
        "loyal_customer".to_string(),
        json!({
            "customer.orders": { "gt": 5 },
            "customer.status": "active"
        }),
    );
    config.rules.insert(
        "mid_range_basket".to_string(),
        json!({
            "total": { "and": { "gte": 20, "lte": 200 } },
            "shipping.country": { "or": { "in": ["FR", "BE"], "gt": "Z" } }
        }),
    );
    config.settings.default_rule = Some("summer_sale".to_string());

    config
}
