use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use serde_json::{json, Value as JsonValue};

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use crate::conditions::{parse_criteria_at, resolve, Criteria, EligibilityService};
use crate::config::{self, Config};

use super::error::CommandError;
use super::exit_codes;
use super::output::{self, CheckData, OutputMode, ResolveData, RuleDetail, RuleSummary};

/// read from stdin instead of a file
const STDIN_SOURCE: &str = "-";

#[derive(Parser)]
#[command(name = "eligibility")]
#[command(about = "Check whether a cart satisfies a set of matching criteria")]
#[command(version)]
pub struct Cli {
    /// Path to config file (overrides ELIGIBILITY_CONFIG env var and default location)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (auto-enabled when stdout is piped)
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Force text output even when stdout is piped
    #[arg(long, global = true, conflicts_with = "json")]
    pub no_json: bool,

    /// Suppress all output on success (errors still go to stderr)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log evaluation details to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check a cart against criteria (exit 0 when eligible, 2 when not)
    Check {
        /// Cart JSON file, or "-" to read stdin
        #[arg(short, long)]
        cart: String,

        /// Criteria JSON file, or "-" to read stdin
        #[arg(long, conflicts_with = "rule")]
        criteria: Option<String>,

        /// Named rule from the config file (defaults to settings.default_rule)
        #[arg(short, long)]
        rule: Option<String>,
    },

    /// Show the value a dotted path resolves to in a cart
    Resolve {
        /// Cart JSON file, or "-" to read stdin
        #[arg(short, long)]
        cart: String,

        /// Dotted path, e.g. "items.category"
        #[arg(short, long)]
        path: String,
    },

    /// Inspect the rules defined in the config file
    Rules {
        #[command(subcommand)]
        command: RulesCommands,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Print a shell completion script
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum RulesCommands {
    /// List configured rules
    List,

    /// Show a rule's criteria
    Show {
        /// Rule name
        name: String,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Show config file path
    Path,
    /// Validate the config file and every rule in it
    Verify,
    /// Print an example configuration
    Default,
    /// Set a configuration value
    Set {
        /// settings.default_rule, settings.fuzzy_threshold, or rules.<name>
        key: String,
        /// Value (criteria JSON for rules.<name>)
        value: String,
    },
}

/// read and parse a JSON/JSON5 document from a file or stdin
fn read_document(source: &str, what: &str) -> Result<JsonValue, CommandError> {
    let content = if source == STDIN_SOURCE {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| CommandError::input(format!("failed to read {} from stdin: {}", what, e)))?;
        buf
    } else {
        fs::read_to_string(source).map_err(|e| {
            CommandError::input(format!("failed to read {} file {}: {}", what, source, e))
        })?
    };

    config::parse_document(&content)
        .map_err(|e| CommandError::input(format!("invalid {} document: {:#}", what, e)))
}

fn source_label(source: &str) -> String {
    if source == STDIN_SOURCE {
        "stdin".to_string()
    } else {
        source.to_string()
    }
}

fn load_config(path: Option<&Path>) -> Result<Config, CommandError> {
    config::load_with_override(path).map_err(|e| CommandError::config(format!("{:#}", e)))
}

fn unknown_rule(config: &Config, name: &str) -> CommandError {
    let suggestions = config.similar_rule_names(name);
    tracing::debug!(name, ?suggestions, "rule not found");
    CommandError::rule_not_found(name, suggestions)
}

/// raw criteria of a named rule, suggesting similar names when it is missing
fn lookup_rule<'a>(config: &'a Config, name: &str) -> Result<&'a JsonValue, CommandError> {
    config.rule(name).ok_or_else(|| unknown_rule(config, name))
}

fn rule_criteria(config: &Config, name: &str) -> Result<Criteria, CommandError> {
    config::rule_criteria(config, name)
        .map_err(|e| CommandError::config(format!("{:#}", e)))?
        .ok_or_else(|| unknown_rule(config, name))
}

/// criteria for `check`: --criteria, then --rule, then settings.default_rule
fn select_criteria(
    criteria: Option<&str>,
    rule: Option<&str>,
    config_path: Option<&Path>,
) -> Result<(String, Criteria), CommandError> {
    if let Some(source) = criteria {
        let json = read_document(source, "criteria")?;
        let parsed =
            parse_criteria_at(&json, "").map_err(|e| CommandError::input(e.to_string()))?;
        return Ok((source_label(source), parsed));
    }

    let config = load_config(config_path)?;
    let name = match rule {
        Some(name) => name.to_string(),
        None => config.settings.default_rule.clone().ok_or_else(|| {
            CommandError::invalid_args(
                "no criteria given: pass --criteria or --rule, or set settings.default_rule",
            )
        })?,
    };

    let parsed = rule_criteria(&config, &name)?;
    Ok((format!("rule:{}", name), parsed))
}

pub fn check_cart(
    service: &EligibilityService,
    cart: &JsonValue,
    criteria: &Criteria,
    source: String,
) -> CheckData {
    CheckData {
        eligible: service.is_eligible(cart, criteria),
        source,
        criteria: criteria.to_string(),
    }
}

fn print_config(config: &Config, mode: OutputMode) -> Result<()> {
    if mode.is_json() {
        output::print_json(config);
    } else if !mode.is_quiet() {
        let json = serde_json::to_string_pretty(config).context("Failed to serialize config")?;
        println!("{}", json);
    }
    Ok(())
}

pub fn execute(cli: Cli, mode: OutputMode) -> Result<i32> {
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Check {
            cart,
            criteria,
            rule,
        } => {
            if cart == STDIN_SOURCE && criteria.as_deref() == Some(STDIN_SOURCE) {
                return Err(CommandError::invalid_args(
                    "--cart and --criteria cannot both read from stdin",
                )
                .into());
            }

            let (source, criteria) =
                select_criteria(criteria.as_deref(), rule.as_deref(), config_path)?;
            let cart = read_document(&cart, "cart")?;

            let data = check_cart(&EligibilityService::new(), &cart, &criteria, source);
            tracing::debug!(eligible = data.eligible, source = %data.source, "checked cart");

            if mode.is_json() {
                output::print_json(&data);
            } else if !mode.is_quiet() {
                let verdict = if data.eligible {
                    "eligible"
                } else {
                    "not eligible"
                };
                println!("{} ({})", verdict, data.source);
            }

            Ok(if data.eligible {
                exit_codes::SUCCESS
            } else {
                exit_codes::NOT_ELIGIBLE
            })
        }

        Commands::Resolve { cart, path } => {
            let cart = read_document(&cart, "cart")?;
            let resolved = resolve(&cart, &path);

            let data = ResolveData {
                path,
                found: !resolved.is_missing(),
                value: resolved.to_json(),
            };

            if mode.is_json() {
                output::print_json(&data);
            } else if !mode.is_quiet() {
                if data.found {
                    println!("{}", data.value);
                } else {
                    println!("{}: not found", data.path);
                }
            }
            Ok(exit_codes::SUCCESS)
        }

        Commands::Rules { command } => {
            let config = load_config(config_path)?;

            match command {
                RulesCommands::List => {
                    let rules: Vec<RuleSummary> = config
                        .rules
                        .iter()
                        .map(|(name, rule)| RuleSummary {
                            name: name.clone(),
                            entries: rule.as_object().map(|o| o.len()).unwrap_or(0),
                            is_default: config.settings.default_rule.as_deref()
                                == Some(name.as_str()),
                        })
                        .collect();

                    if mode.is_json() {
                        output::print_json(&json!({ "rules": rules }));
                    } else if !mode.is_quiet() {
                        if rules.is_empty() {
                            println!("No rules configured");
                        }
                        for rule in &rules {
                            let marker = if rule.is_default { " (default)" } else { "" };
                            println!("{}{}  [{} entries]", rule.name, marker, rule.entries);
                        }
                    }
                }
                RulesCommands::Show { name } => {
                    let criteria = rule_criteria(&config, &name)?;
                    let data = RuleDetail {
                        criteria: lookup_rule(&config, &name)?.clone(),
                        summary: criteria.to_string(),
                        name,
                    };

                    if mode.is_json() {
                        output::print_json(&data);
                    } else if !mode.is_quiet() {
                        println!("{}: {}", data.name, data.summary);
                        let json = serde_json::to_string_pretty(&data.criteria)
                            .context("Failed to serialize rule")?;
                        println!("{}", json);
                    }
                }
            }
            Ok(exit_codes::SUCCESS)
        }

        Commands::Config { command } => {
            match command {
                ConfigCommands::Show => {
                    let config = load_config(config_path)?;
                    print_config(&config, mode)?;
                }
                ConfigCommands::Path => {
                    let path = config::get_config_path_with_override(config_path)?;
                    if mode.is_json() {
                        output::print_json(&json!({ "path": path.display().to_string() }));
                    } else if !mode.is_quiet() {
                        println!("{}", path.display());
                    }
                }
                ConfigCommands::Verify => {
                    let path = config::get_config_path_with_override(config_path)?;
                    let errors = config::verify(&path)
                        .map_err(|e| CommandError::config(format!("{:#}", e)))?;

                    if !errors.is_empty() {
                        if !mode.is_json() {
                            println!(
                                "✗ Configuration has {} error(s): {}",
                                errors.len(),
                                path.display()
                            );
                            println!();
                            for error in &errors {
                                println!("  - {}", error);
                            }
                        }
                        return Err(CommandError::config(format!(
                            "configuration validation failed: {}",
                            errors.join("; ")
                        ))
                        .into());
                    }

                    if mode.is_json() {
                        output::print_json(
                            &json!({ "path": path.display().to_string(), "valid": true }),
                        );
                    } else if !mode.is_quiet() {
                        println!("✓ Configuration is valid: {}", path.display());
                    }
                }
                ConfigCommands::Default => {
                    print_config(&config::default_with_examples(), mode)?;
                }
                ConfigCommands::Set { key, value } => {
                    let mut config = load_config(config_path)?;
                    config::set_value(&mut config, &key, &value)
                        .map_err(|e| CommandError::invalid_args(format!("{:#}", e)))?;
                    config::save_with_override(&config, config_path)
                        .map_err(|e| CommandError::config(format!("{:#}", e)))?;

                    if mode.is_json() {
                        output::print_json(&json!({ "key": key, "value": value }));
                    } else if !mode.is_quiet() {
                        println!("Set {} = {}", key, value);
                    }
                }
            }
            Ok(exit_codes::SUCCESS)
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "eligibility", &mut io::stdout());
            Ok(exit_codes::SUCCESS)
        }
    }
}
