//! # deadlines
//!
//! Track deadlines stored on a remote deadline API, grouped by how soon
//! they are due: finished, within three days, a week, a month, a year, or
//! later.
//!
//! ## Usage
//!
//! Run without arguments (or with `ui`) for the interactive view:
//!
//! ```bash
//! deadlines --url http://localhost:8080/
//! ```
//!
//! **Key bindings**
//! *   `j`/`k`: Move selection
//! *   `a`: Add a deadline (title, description, due date)
//! *   `e`: Edit the selected deadline
//! *   `d`: Delete the selected deadline
//! *   `r`: Reload from the server
//! *   `q`: Quit
//!
//! Or script it:
//!
//! ```bash
//! deadlines add "Thesis" -d "Submit final draft" --due 2025-06-30
//! deadlines add "Groceries" -d "Milk and eggs" --due tomorrow
//! deadlines list
//! deadlines edit 4 --due "in 3 days"
//! deadlines remove 4
//! ```
//!
//! ## Configuration
//!
//! The API base URL comes from `--url`, then the `DEADLINES_URL` environment
//! variable, then `[api] base_url` in `~/.config/deadlines/config.toml`.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use tracing::warn;

use deadlines::api::HttpDeadlineApi;
use deadlines::commands::*;
use deadlines::config::Config;
use deadlines::logging::{self, LogTarget};
use deadlines::session::Session;
use deadlines::tui::run_tui;
use deadlines::DeadlineId;

#[derive(Parser)]
#[command(name = "deadlines")]
#[command(about = "Track deadlines grouped by urgency", long_about = None)]
struct Cli {
    /// Base URL of the deadline API
    #[arg(long, global = true)]
    url: Option<String>,
    /// Path to a config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new deadline
    Add {
        /// Deadline title (quoted if it has spaces)
        title: String,
        /// What has to be done
        #[arg(short, long)]
        description: String,
        /// Due date: YYYY-MM-DD, today, tomorrow, week, or e.g. 3d
        #[arg(short = 'D', long)]
        due: String,
    },
    /// List deadlines grouped by urgency
    List,
    /// Edit a deadline
    Edit {
        id: u64,
        /// New title
        #[arg(short, long)]
        title: Option<String>,
        /// New description
        #[arg(short, long)]
        description: Option<String>,
        /// New due date
        #[arg(short = 'D', long)]
        due: Option<String>,
    },
    /// Remove a deadline
    Remove {
        id: u64,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
    /// Open interactive TUI
    Ui,
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    if let Some(Commands::Completions { shell }) = cli.command {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "deadlines", &mut io::stdout());
        return Ok(());
    }

    let loaded = Config::load(cli.config.as_deref());
    let config = loaded.as_ref().cloned().unwrap_or_default();
    let interactive = matches!(cli.command, None | Some(Commands::Ui));
    let target = if interactive { LogTarget::File } else { LogTarget::Stderr };
    let _log_guard = logging::init(target, config.log.level.as_deref());
    if let Err(e) = &loaded {
        warn!(error = %e, "ignoring config file, using defaults");
    }

    let base_url = config.resolve_base_url(cli.url.as_deref())?;
    let api = HttpDeadlineApi::new(base_url);
    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;

    if interactive {
        return run_tui(runtime.handle().clone(), api)
            .map_err(|e| anyhow::anyhow!("TUI failed: {e}"));
    }

    let mut session = Session::new(api);
    runtime.block_on(async move {
        match cli.command {
            Some(Commands::Add { title, description, due }) => {
                cmd_add(&mut session, title, description, due).await.map(|_| ())
            }
            Some(Commands::List) => cmd_list(&mut session).await,
            Some(Commands::Edit { id, title, description, due }) => {
                cmd_edit(&mut session, DeadlineId(id), title, description, due)
                    .await
                    .map(|_| ())
            }
            Some(Commands::Remove { id }) => cmd_remove(&mut session, DeadlineId(id)).await,
            Some(Commands::Completions { .. }) | Some(Commands::Ui) | None => Ok(()),
        }
    })?;
    Ok(())
}
