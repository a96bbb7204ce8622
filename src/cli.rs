use crate::config::Config;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Identify medicinal plants from a photo of a leaf.
///
/// Without an image argument the desktop window opens.
#[derive(Debug, Parser)]
#[command(name = "leaf-identifier", version)]
pub struct Args {
    /// Analyze this image and print the result instead of opening a window
    #[arg(long, conflicts_with = "recent")]
    pub image: Option<PathBuf>,

    /// Re-analyze a recent image (0 is the newest)
    #[arg(long)]
    pub recent: Option<usize>,

    /// Show every result instead of the top ones
    #[arg(long)]
    pub all: bool,

    /// Use canned random predictions instead of the remote service
    #[arg(long)]
    pub fake: bool,

    #[arg(long, env = "LEAF_IDENTIFIER_API_URL")]
    pub api_url: Option<String>,

    #[arg(long, env = "LEAF_IDENTIFIER_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Where the recent images are kept
    #[arg(long, env = "LEAF_IDENTIFIER_STORE")]
    pub store: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Offset of log timestamps from UTC, in hours
    #[arg(long, allow_hyphen_values = true)]
    pub utc_offset: Option<i32>,
}

impl Args {
    pub fn is_headless(&self) -> bool {
        self.image.is_some() || self.recent.is_some()
    }

    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(api_url) = &self.api_url {
            config.api_url = api_url.clone();
        }
        if let Some(api_key) = &self.api_key {
            config.api_key = api_key.clone();
        }
        if let Some(store) = &self.store {
            config.recent_images_path = store.clone();
        }
        if let Some(timeout) = self.timeout {
            config.request_timeout = Duration::from_secs(timeout);
        }
        if let Some(offset) = self
            .utc_offset
            .and_then(|hours| chrono::FixedOffset::east_opt(hours * 3600))
        {
            config.logger_timezone = offset;
        }
        config
    }
}
