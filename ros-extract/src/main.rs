use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod classify_cmd;
mod cli;
mod extract_cmd;
mod path_guard;
mod pipeline;
mod render_cmd;

use cli::{Cli, Command};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match cli.command {
        Command::Extract(args) => extract_cmd::run_extract(args),
        Command::Classify(args) => classify_cmd::run_classify(args),
        Command::Script(args) => render_cmd::run_script(args),
        Command::Env(args) => render_cmd::run_env(args),
    }
}

/// Logs go to stderr; stdout carries documents and reports.
fn init_tracing(verbose: bool, quiet: bool) {
    let level = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
