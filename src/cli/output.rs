//! what `eligibility` prints
//!
//! text for terminals, or one JSON-RPC 2.0 line per invocation so scripts can
//! tell a verdict (`result`) from a failure (`error`) without parsing stderr.
//! failure codes are the exit code moved into the application range, so
//! `RULE_NOT_FOUND` (6) is reported as -32006.

use serde::Serialize;
use serde_json::Value as JsonValue;
use std::io::IsTerminal;

use super::error::CommandError;
use super::exit_codes;

const JSONRPC_VERSION: &str = "2.0";

/// output mode determines how results are formatted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// human-readable text output
    Text,
    /// machine-readable JSON-RPC 2.0 output
    Json,
    /// no output on success (errors still go to stderr)
    Quiet,
}

impl OutputMode {
    /// determine output mode from CLI flags and environment
    ///
    /// priority: quiet > json > no_json > auto-detect
    pub fn from_flags(json: bool, no_json: bool, quiet: bool) -> Self {
        if quiet {
            return Self::Quiet;
        }
        if json {
            return Self::Json;
        }
        if no_json {
            return Self::Text;
        }
        // auto-detect: JSON when stdout is not a TTY (piped)
        if !std::io::stdout().is_terminal() {
            Self::Json
        } else {
            Self::Text
        }
    }

    pub fn is_json(&self) -> bool {
        matches!(self, Self::Json)
    }

    pub fn is_quiet(&self) -> bool {
        matches!(self, Self::Quiet)
    }
}

/// a single JSON-RPC line; `id` is always null since there is no request
#[derive(Serialize)]
pub struct Envelope<T: Serialize> {
    jsonrpc: &'static str,
    #[serde(flatten)]
    body: Body<T>,
    id: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "lowercase")]
enum Body<T: Serialize> {
    Result(T),
    Error(Failure),
}

impl<T: Serialize> Envelope<T> {
    pub fn result(result: T) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            body: Body::Result(result),
            id: None,
        }
    }
}

impl Envelope<()> {
    pub fn error(failure: Failure) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            body: Body::Error(failure),
            id: None,
        }
    }
}

/// the `error` member of a failed invocation
#[derive(Debug, Serialize)]
pub struct Failure {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<FailureData>,
}

#[derive(Debug, Default, Serialize)]
pub struct FailureData {
    /// rule names close to the one that was asked for
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
    /// full cause chain of an unexpected error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl Failure {
    pub fn new(exit_code: i32, message: impl Into<String>) -> Self {
        Self {
            code: rpc_code(exit_code),
            message: message.into(),
            data: None,
        }
    }

    /// an error that did not come with its own exit code
    pub fn unexpected(err: &anyhow::Error) -> Self {
        let mut failure = Self::new(exit_codes::ERROR, err.to_string());
        failure.data = Some(FailureData {
            suggestions: Vec::new(),
            details: Some(format!("{:#}", err)),
        });
        failure
    }
}

impl From<&CommandError> for Failure {
    fn from(err: &CommandError) -> Self {
        let mut failure = Self::new(err.code, err.message.clone());
        if !err.suggestions.is_empty() {
            failure.data = Some(FailureData {
                suggestions: err.suggestions.clone(),
                details: None,
            });
        }
        failure
    }
}

/// exit code moved into the -32000..-32099 application error range
pub fn rpc_code(exit_code: i32) -> i32 {
    -32000 - exit_code
}

/// result data for `check`
#[derive(Serialize)]
pub struct CheckData {
    pub eligible: bool,
    /// where the criteria came from: "rule:<name>", a file path or "stdin"
    pub source: String,
    /// compact rendering of the criteria that were applied
    pub criteria: String,
}

/// result data for `resolve`
#[derive(Serialize)]
pub struct ResolveData {
    pub path: String,
    pub found: bool,
    pub value: JsonValue,
}

/// a configured rule in `rules list`
#[derive(Serialize)]
pub struct RuleSummary {
    pub name: String,
    pub entries: usize,
    pub is_default: bool,
}

/// result data for `rules show`
#[derive(Serialize)]
pub struct RuleDetail {
    pub name: String,
    pub criteria: JsonValue,
    pub summary: String,
}

fn emit<T: Serialize>(envelope: &Envelope<T>) {
    if let Ok(json) = serde_json::to_string(envelope) {
        println!("{}", json);
    }
}

/// print a successful result to stdout
pub fn print_json<T: Serialize>(data: &T) {
    emit(&Envelope::result(data));
}

/// print a failure to stdout (JSON mode keeps everything on one stream)
pub fn print_json_failure(failure: Failure) {
    emit(&Envelope::error(failure));
}
