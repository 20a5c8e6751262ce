use std::sync::Arc;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use spinlog::{cli, config, config::ApiConfig, error, types::PkceToken, warning};
use tokio::sync::Mutex;

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize with Spotify API
    Auth,

    /// Handle recently played tracks
    Recent(RecentOptions),

    /// Flatten all snapshots into the consolidated CSV dataset
    Export(ExportOptions),

    /// Handle followed artists
    Artists(ArtistsOptions),

    /// Show stored cursor and snapshot inventory
    Info(InfoOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
#[command(
    about = "Handle recently played tracks",
    args_conflicts_with_subcommands = true // disallow mixing --limit with subcommands
)]
pub struct RecentOptions {
    /// Maximum number of play events to display
    #[clap(long)]
    pub limit: Option<usize>,

    /// Subcommands under `recent` (e.g., `update`)
    #[command(subcommand)]
    pub command: Option<RecentSubcommand>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum RecentSubcommand {
    /// Fetch new play events and persist a snapshot
    Update,
}

#[derive(Parser, Debug, Clone)]
pub struct ExportOptions {
    /// Date naming the output file (YYYY-MM-DD, defaults to today)
    #[clap(long)]
    pub date: Option<String>,
}

#[derive(Parser, Debug, Clone)]
#[command(
    about = "Handle followed artists",
    args_conflicts_with_subcommands = true // disallow mixing --search with subcommands
)]
pub struct ArtistsOptions {
    /// Search for artists
    #[clap(long)]
    pub search: Option<String>,

    /// Subcommands under `artists` (e.g., `update`)
    #[command(subcommand)]
    pub command: Option<ArtistsSubcommand>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ArtistsSubcommand {
    /// Update followed artists dump
    Update,
}

#[derive(Parser, Debug, Clone)]
pub struct InfoOptions {
    #[clap(long)]
    cursor: bool,
    #[clap(long)]
    snapshots: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

// The config struct is only built for commands that talk to the network;
// export and info work off local files alone.
fn api_config() -> ApiConfig {
    match ApiConfig::from_env() {
        Ok(config) => config,
        Err(e) => error!("Cannot load configuration. Err: {}", e),
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        warning!("Cannot load environment file: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Auth => {
            let oauth_result: Arc<Mutex<Option<PkceToken>>> = Arc::new(Mutex::new(None));
            cli::auth(api_config(), Arc::clone(&oauth_result)).await;
        }

        Command::Recent(opt) => match opt.command {
            Some(RecentSubcommand::Update) => cli::update_recent(api_config()).await,
            None => cli::list_recent(opt.limit).await,
        },

        Command::Export(opt) => cli::export(opt.date).await,

        Command::Artists(opt) => match opt.command {
            Some(ArtistsSubcommand::Update) => cli::update_artists(api_config()).await,
            None => cli::list_artists(opt.search).await,
        },

        Command::Info(opt) => cli::info(opt.cursor, opt.snapshots).await,

        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
