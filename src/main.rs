use std::path::PathBuf;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use wayfinder::{cli, config, error};

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

    /// Forget stored credentials
    Logout,

    /// Load the complete listening history
    Load(LoadOptions),

    /// List saved tracks from the last loaded snapshot
    Library(LibraryOptions),

    /// Show the current user's profile
    Profile,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct LoadOptions {
    /// Write the whole dataset as JSON to this file
    #[clap(long, short)]
    output: Option<PathBuf>,

    /// Match genres to tracks by list position instead of artist id
    #[clap(long)]
    positional_genres: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct LibraryOptions {
    /// Filter by track, artist or genre
    #[clap(long)]
    search: Option<String>,

    /// Show at most this many tracks
    #[clap(long)]
    limit: Option<usize>,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Auth => cli::auth().await,
        Command::Logout => cli::logout().await,
        Command::Load(opt) => cli::load(opt.output, opt.positional_genres).await,
        Command::Library(opt) => cli::library(opt.search, opt.limit).await,
        Command::Profile => cli::profile().await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
