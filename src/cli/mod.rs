mod commands;
mod error;
pub mod exit_codes;
mod output;

pub use commands::{Cli, Commands, ConfigCommands, RulesCommands};
pub use error::CommandError;
pub use output::OutputMode;

/// run a parsed command line and return the process exit code
pub fn run(cli: Cli) -> i32 {
    let mode = OutputMode::from_flags(cli.json, cli.no_json, cli.quiet);

    match commands::execute(cli, mode) {
        Ok(code) => code,
        Err(err) => {
            report_error(&err, mode);
            error::exit_code_for(&err)
        }
    }
}

fn report_error(err: &anyhow::Error, mode: OutputMode) {
    let command_error = err.downcast_ref::<CommandError>();

    if mode.is_json() {
        let failure = match command_error {
            Some(e) => output::Failure::from(e),
            None => output::Failure::unexpected(err),
        };
        output::print_json_failure(failure);
        return;
    }

    eprintln!("error: {:#}", err);
    if let Some(e) = command_error {
        if !e.suggestions.is_empty() {
            eprintln!("did you mean: {}", e.suggestions.join(", "));
        }
    }
}
