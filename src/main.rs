//! # ragwire CLI
//!
//! ## Usage
//!
//! ```bash
//! ragwire --config ./config/ragwire.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `ragwire kinds` | List every contract kind |
//! | `ragwire check <kind> [path]` | Decode, normalize, and check a payload |
//! | `ragwire rank <kind> [path]` | Rank an array of search hits |
//! | `ragwire serve` | Start the HTTP contract service |
//! | `ragwire completions <shell>` | Print a shell completion script |
//!
//! A missing config file is not an error; built-in defaults are used.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use ragwire::{check_cmd, config, kinds, logging, rank_cmd, server};

/// ragwire — check, normalize, and rank Drive, RAG, and siftops contracts.
#[derive(Parser)]
#[command(
    name = "ragwire",
    about = "Check, normalize, and rank Drive, RAG, and siftops wire contracts",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/ragwire.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all contract kinds with their family and description.
    Kinds,

    /// Decode a JSON payload as a contract kind and report problems.
    ///
    /// Prints the normalized payload on stdout and check violations on
    /// stderr. Fails on malformed input, and on violations when
    /// `[checks] strict = true`.
    Check {
        /// Contract kind, e.g. `drive.sync_status` (see `ragwire kinds`).
        kind: String,

        /// Payload file; `-` or omitted reads stdin.
        path: Option<PathBuf>,

        /// The payload is a JSON array of the kind.
        #[arg(long)]
        many: bool,

        /// Print the full report (contract, normalized, violations) as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Rank a JSON array of search hits by score (desc), then doc id.
    Rank {
        /// A search-result kind: `drive.search_result`, `rag.search_result`,
        /// or `siftops.search_result`.
        kind: String,

        /// Payload file; `-` or omitted reads stdin.
        path: Option<PathBuf>,

        /// Keep only the best N hits.
        #[arg(long)]
        limit: Option<usize>,

        /// Min-max normalize scores to [0, 1] before ranking.
        #[arg(long)]
        normalize: bool,
    },

    /// Start the HTTP contract service on `[server].bind`.
    Serve,

    /// Print a shell completion script.
    Completions {
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cfg = if cli.config.exists() {
        config::load_config(&cli.config)?
    } else {
        config::Config::minimal()
    };
    logging::init(&cfg.logging);
    tracing::debug!(config = %cli.config.display(), "configuration loaded");

    match cli.command {
        Commands::Kinds => {
            kinds::list_kinds();
        }
        Commands::Check {
            kind,
            path,
            many,
            json,
        } => {
            check_cmd::run_check(&cfg, &kind, path.as_deref(), many, json)?;
        }
        Commands::Rank {
            kind,
            path,
            limit,
            normalize,
        } => {
            rank_cmd::run_rank(&kind, path.as_deref(), limit, normalize)?;
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "ragwire", &mut std::io::stdout());
        }
    }

    Ok(())
}
