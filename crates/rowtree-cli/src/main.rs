//! rowtree command-line driver
//!
//! Materializes flat join rows stored as JSON into nested records, and
//! resolves join names against a join tree.

mod commands;
mod error;
mod formatter;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use formatter::OutputFormat;
use tracing_subscriber::EnvFilter;

/// rowtree command-line driver
#[derive(Parser, Debug)]
#[command(name = "rowtree")]
#[command(version, about = "Materialize flat join rows into record trees")]
pub struct Args {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Materialize a JSON array of flat rows
    Arrange {
        /// Join tree spec (JSON)
        #[arg(short, long)]
        join: PathBuf,

        /// Flat rows (JSON array of objects)
        #[arg(short, long)]
        rows: PathBuf,

        /// Output format
        #[arg(long, default_value = "json", value_enum)]
        format: OutputFormat,
    },

    /// Resolve a dot-separated path of join names, e.g. `orders.order_lines`
    Resolve {
        /// Join tree spec (JSON)
        #[arg(short, long)]
        join: PathBuf,

        /// Join name path
        path: String,

        /// Output format
        #[arg(long, default_value = "table", value_enum)]
        format: OutputFormat,
    },
}

fn main() {
    let args = Args::parse();

    let default_directive = match args.verbose {
        0 => "rowtree_cli=info",
        1 => "rowtree_cli=debug,rowtree_core=debug",
        _ => "rowtree_cli=trace,rowtree_core=trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive)),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = match &args.command {
        Command::Arrange { join, rows, format } => commands::arrange(join, rows, *format),
        Command::Resolve { join, path, format } => commands::resolve(join, path, *format),
    };

    match result {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
