//! command error carrying an exit code

use super::exit_codes;

/// error returned by command execution
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct CommandError {
    /// exit code (maps to JSON-RPC error code via -32000 - code)
    pub code: i32,
    pub message: String,
    /// suggested alternatives (e.g., similar rule names)
    pub suggestions: Vec<String>,
}

impl CommandError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            suggestions: Vec::new(),
        }
    }

    pub fn invalid_args(message: impl Into<String>) -> Self {
        Self::new(exit_codes::INVALID_ARGS, message)
    }

    pub fn input(message: impl Into<String>) -> Self {
        Self::new(exit_codes::INPUT_ERROR, message)
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(exit_codes::CONFIG_ERROR, message)
    }

    pub fn rule_not_found(name: &str, suggestions: Vec<String>) -> Self {
        Self {
            code: exit_codes::RULE_NOT_FOUND,
            message: format!("rule '{}' is not defined", name),
            suggestions,
        }
    }
}

/// exit code for an error raised anywhere in a command
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<CommandError>()
        .map(|e| e.code)
        .unwrap_or(exit_codes::ERROR)
}
