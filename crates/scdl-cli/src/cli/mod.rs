//! CLI for scdl, the SoundCloud track downloader.

mod commands;
mod progress;
mod session;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use scdl_core::config::{self, ScdlConfig};
use std::path::{Path, PathBuf};

use commands::{run_checksum, run_client_id, run_completions, run_get, run_info, run_man};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "scdl", version)]
#[command(about = "scdl: download SoundCloud tracks as single files", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

/// Flags shared by every command that talks to the API.
#[derive(Debug, Clone, Default, Args)]
pub struct SessionArgs {
    /// Send the signed-in session from the cookie jar and prefer high quality.
    #[arg(long, conflicts_with = "no_hq")]
    pub hq: bool,

    /// Stay anonymous even if `high_quality = true` in the config.
    #[arg(long)]
    pub no_hq: bool,

    /// Netscape cookie jar holding the `oauth_token` cookie.
    #[arg(long, value_name = "FILE")]
    pub cookies: Option<PathBuf>,

    /// Use this client id instead of scraping one from the site.
    #[arg(long, value_name = "ID")]
    pub client_id: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download one or more tracks, concurrently.
    Get {
        /// Track page URLs (https://soundcloud.com/<user>/<track>).
        #[arg(required = true)]
        urls: Vec<String>,

        #[command(flatten)]
        session: SessionArgs,

        /// Save directory (default: config `download_dir`, else the current directory).
        #[arg(short, long, value_name = "DIR")]
        output_dir: Option<PathBuf>,

        /// Replace existing files instead of adding a " (n)" suffix.
        #[arg(long)]
        overwrite: bool,

        /// Print the SHA-256 of each saved file.
        #[arg(long)]
        checksum: bool,
    },

    /// Resolve a track and show what `get` would fetch, without fetching it.
    Info {
        /// Track page URL.
        url: String,

        #[command(flatten)]
        session: SessionArgs,
    },

    /// Scrape a client id from the site and print it.
    ClientId,

    /// Compute SHA-256 of a file (e.g. after download).
    Checksum {
        /// Path to the file.
        path: String,
    },

    /// Print shell completions to stdout.
    Completions {
        /// Target shell.
        shell: Shell,
    },

    /// Print the man page to stdout.
    Man,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Get {
                urls,
                session,
                output_dir,
                overwrite,
                checksum,
            } => {
                let opts = commands::GetOptions {
                    output_dir,
                    overwrite,
                    checksum,
                };
                run_get(&load_config()?, &session, &opts, urls).await?;
            }
            CliCommand::Info { url, session } => run_info(&load_config()?, &session, &url).await?,
            CliCommand::ClientId => run_client_id(&load_config()?).await?,
            CliCommand::Checksum { path } => run_checksum(Path::new(&path)).await?,
            CliCommand::Completions { shell } => run_completions(shell)?,
            CliCommand::Man => run_man()?,
        }

        Ok(())
    }
}

fn load_config() -> Result<ScdlConfig> {
    let cfg = config::load_or_init()?;
    tracing::debug!("loaded config: {:?}", cfg);
    Ok(cfg)
}

#[cfg(test)]
mod tests;
