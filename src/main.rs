mod client;
mod collect;
mod output;
mod utils;

use chrono::NaiveDate;
use clap::Parser;
use collect::StopPolicy;
use eyre::{Context, Result, eyre};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Export WATI team-inbox conversations to a CSV file,
/// newest first, back to a target assignment date.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Boundary date in DD-MM-YYYY format. Conversations assigned on or
    /// before this date end the run and are excluded from the output.
    #[arg(long, value_name = "DD-MM-YYYY")]
    date: String,

    /// Bearer token for the WATI API.
    /// Falls back to `token` in config.toml if omitted.
    #[arg(long, value_name = "TOKEN")]
    token: Option<String>,

    /// Path of the CSV file to write.
    /// Defaults to ./wati_conversations.csv if not set in config.
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Comma-separated topic names to filter on (e.g. "Counselor: A,Counselor: B").
    #[arg(long, value_name = "TOPICS", value_delimiter = ',')]
    topics: Option<Vec<String>>,

    /// When to end pagination relative to boundary-crossing conversations.
    #[arg(long, value_enum, default_value = "first-hit")]
    stop_policy: StopPolicy,

    /// Conversation-filter endpoint URL.
    /// Defaults to the hosted WATI instance if not set in config.
    #[arg(long, value_name = "URL")]
    endpoint: Option<String>,

    /// Path to a specific configuration file.
    /// Defaults to $XDG_CONFIG_HOME/wati-chat-export/config.toml
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print each page retrieved and each boundary hit.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress progress output.
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Deserialize, Default)]
struct FileConfig {
    token: Option<String>,
    endpoint: Option<String>,
    topics: Option<Vec<String>>,
    output: Option<PathBuf>,
}

fn load_file_config(explicit_path: Option<&Path>) -> Result<FileConfig> {
    let path = if let Some(p) = explicit_path {
        if !p.exists() {
            return Err(eyre!("Config file not found: {}", p.display()));
        }
        Some(p.to_path_buf())
    } else {
        // Search: XDG/OS config dir, then nothing
        dirs::config_dir()
            .map(|d| d.join("wati-chat-export/config.toml"))
            .filter(|p| p.exists())
    };

    match path {
        None => Ok(FileConfig::default()),
        Some(p) => {
            let content = fs::read_to_string(&p)
                .wrap_err_with(|| format!("Failed to read config: {}", p.display()))?;
            toml::from_str(&content)
                .wrap_err_with(|| format!("Failed to parse config: {}", p.display()))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1. Validate the boundary date before anything touches the network
    let boundary = NaiveDate::parse_from_str(&cli.date, "%d-%m-%Y")
        .map_err(|_| eyre!("Invalid date {:?}. Please use DD-MM-YYYY.", cli.date))?;

    // 2. Load config file (CLI path > default path)
    let file_cfg = load_file_config(cli.config.as_deref())?;

    // 3. Resolve the credential (CLI > Config)
    let token = cli.token.or(file_cfg.token).ok_or_else(|| {
        eyre!("No API token given.\nUse --token or set token in config.toml.")
    })?;

    // 4. Resolve endpoint, topics and output path (CLI > Config > Default)
    let endpoint = cli
        .endpoint
        .or(file_cfg.endpoint)
        .unwrap_or_else(|| client::DEFAULT_ENDPOINT.to_string());
    let topics = cli.topics.or(file_cfg.topics).unwrap_or_default();
    let output = cli
        .output
        .or(file_cfg.output)
        .unwrap_or_else(|| PathBuf::from("wati_conversations.csv"));

    let config = utils::RunConfig {
        boundary,
        endpoint,
        topics,
        output,
        stop_policy: cli.stop_policy,
        verbose: cli.verbose,
        quiet: cli.quiet,
    };

    // 5. Run the pagination loop and persist whatever it accumulated —
    //    a partial extract after an upstream failure is still written out.
    let client =
        client::ConversationClient::new(&config.endpoint, &token, config.topics.clone())?;
    let rows = collect::collect(&client, &config).await;
    output::write_csv(&config.output, &rows)?;

    if !config.quiet {
        eprintln!("Data saved to {}", config.output.display());
    }
    Ok(())
}
