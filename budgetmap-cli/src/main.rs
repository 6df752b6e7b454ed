//! budgetmap CLI - categorize bank CSV exports in your terminal

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{automap, categories, inspect, map, progress, reset, review, suggest, summary, upload};

/// budgetmap - map bank transactions to budget categories
#[derive(Parser)]
#[command(name = "bm", version, about, long_about = None)]
struct Cli {
    /// Show debug logs (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a CSV export and reconcile it with stored mappings
    Upload {
        /// Path to CSV file
        file: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show column roles and row verdicts for a CSV without storing it
    Inspect {
        /// Path to CSV file
        file: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show mapping progress for a file
    Progress {
        /// Stored file name (defaults to the last upload)
        #[arg(long)]
        file: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Map a row to a category
    Map {
        /// Row position in the file
        row: usize,
        /// Category name
        category: String,
        /// Stored file name (defaults to the last upload)
        #[arg(long)]
        file: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Ask the LLM for a category suggestion
    Suggest {
        /// Row position in the file
        row: usize,
        /// Stored file name (defaults to the last upload)
        #[arg(long)]
        file: Option<String>,
        /// Store the suggestion when it is a known category
        #[arg(long)]
        apply: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Auto-map every unmapped row with LLM suggestions
    AutoMap {
        /// Stored file name (defaults to the last upload)
        #[arg(long)]
        file: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Walk unmapped rows interactively
    Review {
        /// Stored file name (defaults to the last upload)
        #[arg(long)]
        file: Option<String>,
    },

    /// Clear every category of a file
    Reset {
        /// Stored file name (defaults to the last upload)
        #[arg(long)]
        file: Option<String>,
        /// Skip confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },

    /// Manage categories
    Categories {
        #[command(subcommand)]
        command: Option<categories::CategoryCommands>,
    },

    /// Monthly spending per category
    Summary {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "budgetmap_core=debug,bm=debug"
    } else {
        "budgetmap_core=warn,bm=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = run(cli);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Upload { file, json } => upload::run(&file, json),
        Commands::Inspect { file, json } => inspect::run(&file, json),
        Commands::Progress { file, json } => progress::run(file.as_deref(), json),
        Commands::Map { row, category, file, json } => map::run(row, &category, file.as_deref(), json),
        Commands::Suggest { row, file, apply, json } => suggest::run(row, file.as_deref(), apply, json),
        Commands::AutoMap { file, json } => automap::run(file.as_deref(), json),
        Commands::Review { file } => review::run(file.as_deref()),
        Commands::Reset { file, yes } => reset::run(file.as_deref(), yes),
        Commands::Categories { command } => categories::run(command),
        Commands::Summary { json } => summary::run(json),
    }
}
