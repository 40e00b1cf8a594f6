use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use binday_core::{BindayService, CouncilId, PostcodeQuery};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use url::Url;

/// Look up bin collection days for a property.
///
/// Without a subcommand an interactive terminal UI starts.
#[derive(Debug, Parser)]
#[command(name = "binday", version, about)]
pub(crate) struct Cli {
    /// Council site origin; property links are resolved against it.
    #[arg(
        long,
        env = "BINDAY_BASE_URL",
        default_value = "https://www.wakefield.gov.uk/"
    )]
    pub base_url: Url,

    /// User agent sent with every page request.
    #[arg(long, env = "BINDAY_USER_AGENT", default_value = "binday/0.1")]
    pub user_agent: String,

    /// Write logs to this file. Logging goes to stderr for subcommands otherwise.
    #[arg(long, env = "BINDAY_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Council to query in subcommands.
    #[arg(long, default_value = "wakefield")]
    pub council: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Print the properties registered at a postcode as JSON.
    Addresses {
        /// Postcode to search for, e.g. "WF1 2HQ".
        postcode: String,
    },
    /// Print the collection schedule of a property page as JSON.
    Collections {
        /// Property page URL as returned by `addresses`.
        url: String,
    },
}

/// Install the log subscriber. The TUI owns the terminal, so it only logs to a file.
pub(crate) fn init_tracing(cli: &Cli) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_err| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match (&cli.log_file, &cli.command) {
        (Some(path), _) => {
            let file = File::create(path)
                .with_context(|| format!("cannot create log file {}", path.display()))?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        (None, Some(_)) => builder.with_writer(io::stderr).init(),
        (None, None) => {}
    }
    Ok(())
}

pub(crate) async fn run_command(
    service: &BindayService,
    council: &CouncilId,
    command: Command,
) -> Result<()> {
    let json = match command {
        Command::Addresses { postcode } => {
            let addresses = service
                .lookup_addresses(council, &PostcodeQuery::new(postcode))
                .await?;
            serde_json::to_string_pretty(&addresses)?
        }
        Command::Collections { url } => {
            let records = service.extract_collections(council, &url).await?;
            serde_json::to_string_pretty(&records)?
        }
    };

    writeln!(io::stdout().lock(), "{json}")?;
    Ok(())
}
