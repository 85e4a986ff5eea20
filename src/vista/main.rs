use std::io::IsTerminal;

mod cli;

use cli::commands::{run, Exit};

const LOG_ENV: &str = "VISTA_LOG";

fn main() {
    init_logging();
    if !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    match run() {
        Ok(Exit::Success) => {}
        Ok(Exit::Failure) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Diagnostics go to stderr so `--json` output on stdout stays parseable.
fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
