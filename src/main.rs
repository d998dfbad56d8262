use clap::Parser;
use eligibility::cli::{self, Cli};
use tracing_subscriber::EnvFilter;

fn main() {
    // handle broken pipe gracefully (e.g., when piping to `head` or `jq` that exits early)
    reset_sigpipe();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    std::process::exit(cli::run(cli));
}

/// reset SIGPIPE to default behavior (terminate process) instead of panicking
fn reset_sigpipe() {
    #[cfg(unix)]
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_DFL);
    }
}

/// logs go to stderr so stdout stays machine-readable
///
/// RUST_LOG wins unless --verbose is given
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("eligibility=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("eligibility=warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
