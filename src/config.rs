//! Command line and environment configuration

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use reqwest::Url;

use crate::model::{AlbumId, ArtistId, TrackId, DEFAULT_BASE_URL};

#[derive(Parser, Debug)]
#[command(name = "deezer-rs", version, about = "Browse the Deezer catalog from the terminal")]
pub struct Args {
    /// Catalog API root. Endpoint paths are appended to it.
    #[arg(long, env = "DEEZER_BASE_URL", default_value = DEFAULT_BASE_URL, value_parser = parse_base_url)]
    pub base_url: Url,

    /// Quiet period after a keystroke before the search is sent (0 sends immediately)
    #[arg(long, env = "DEEZER_DEBOUNCE_MS", default_value_t = 150)]
    pub debounce_ms: u64,

    /// Per-request timeout; unset means the HTTP client default
    #[arg(long, env = "DEEZER_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Directory for the rotating log file
    #[arg(long, env = "DEEZER_LOG_DIR", default_value = ".logs")]
    pub log_dir: PathBuf,

    /// Run one query and print the result instead of starting the TUI
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Search artists by name
    Search { query: String },
    /// List an artist's albums
    Albums { artist_id: ArtistId },
    /// List an album's tracks
    Tracks { album_id: AlbumId },
    /// Look up one artist
    Artist { id: ArtistId },
    /// Look up one album
    Album { id: AlbumId },
    /// Look up one track
    Track { id: TrackId },
}

impl Args {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

fn parse_base_url(raw: &str) -> Result<Url, String> {
    let url = Url::parse(raw).map_err(|e| format!("invalid URL: {}", e))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("unsupported scheme `{}`; expected http or https", url.scheme()));
    }
    if url.cannot_be_a_base() {
        return Err("URL cannot have paths appended".to_string());
    }
    Ok(url)
}
