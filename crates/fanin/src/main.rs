//! fanin CLI - one merge-engine launch per multi-file selection
//!
//! Binary name: `fanin`

use std::process;

use tracing_subscriber::EnvFilter;

mod cli;

use cli::handlers::{exit_code, format_error, run_cli};

fn main() {
    // Silent unless FANIN_LOG asks otherwise; the usual invoker shows no console
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("FANIN_LOG").unwrap_or_else(|_| EnvFilter::new("off")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run_cli() {
        #[allow(clippy::print_stderr)]
        {
            eprintln!("Error: {}", format_error(&err));
        }

        #[allow(clippy::exit)]
        process::exit(exit_code(&err));
    }
}
