//! layerkv CLI
//!
//! Interactive command loop for the layerkv transactional key-value store.
//!
//! # Commands
//!
//! - `SET <key> <value>` / `GET <key>` / `DELETE <key>` - point operations
//! - `COUNT <value>` - number of keys currently holding a value
//! - `BEGIN` / `COMMIT` / `ROLLBACK` - nested transactions
//! - `HELP` / `EXIT`

mod command;
mod config;
mod error;
mod repl;
mod report;

use clap::Parser;
use config::ReplConfig;
use layerkv_core::StorageEngine;
use repl::{Flow, Repl};
use report::StatsReport;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Transactional key-value store with nested transactions.
#[derive(Parser)]
#[command(name = "layerkv")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Script files to run before reading standard input
    scripts: Vec<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Suppress the banner and the prompt
    #[arg(short, long)]
    quiet: bool,

    /// Echo each command before its output
    #[arg(short, long)]
    echo: bool,

    /// Print engine statistics as JSON on exit
    #[arg(long)]
    stats: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging; stdout is reserved for command output
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let interactive = io::stdin().is_terminal();
    let mut config = ReplConfig::new()
        .show_banner(interactive && !cli.quiet)
        .echo_commands(cli.echo);
    if !cli.quiet {
        config = config.prompt("> ");
    }

    let mut repl = Repl::new(StorageEngine::in_memory(), config, io::stdout().lock());

    let mut flow = Flow::Continue;
    for script in &cli.scripts {
        flow = repl.run_script(script)?;
        if flow == Flow::Exit {
            break;
        }
    }
    if flow == Flow::Continue {
        if interactive {
            repl.run_interactive()?;
        } else if cli.scripts.is_empty() {
            repl.run_pipe(io::stdin().lock())?;
        }
    }

    if cli.stats {
        let report = StatsReport::from(repl.engine().stats().snapshot());
        drop(repl);
        println!("{}", report.to_json()?);
    }

    Ok(())
}
