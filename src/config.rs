//! Environment based configuration

use crate::core::DownloadOptions;
use crate::error::TtError;
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_API_URL: &str = "TTGET_API_URL";
pub const ENV_OUTPUT_DIR: &str = "TTGET_OUTPUT_DIR";
pub const ENV_TIMEOUT: &str = "TTGET_TIMEOUT";
pub const ENV_EXIT_DELAY: &str = "TTGET_EXIT_DELAY";
pub const ENV_NO_PROGRESS: &str = "TTGET_NO_PROGRESS";

/// Runtime settings for a ttget session
#[derive(Debug, Clone)]
pub struct Config {
    /// Settings for the download pipeline
    pub download: DownloadOptions,
    /// Pause before exiting interactive mode
    pub exit_delay: Duration,
    /// Draw a progress bar while downloading
    pub show_progress: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            download: DownloadOptions::default(),
            exit_delay: Duration::from_secs(5),
            show_progress: true,
        }
    }
}

impl Config {
    /// Read settings from the process environment
    pub fn from_env() -> crate::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, TtError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(endpoint) = get(ENV_API_URL) {
            url::Url::parse(&endpoint)
                .map_err(|e| TtError::Config(format!("{ENV_API_URL}={endpoint}: {e}")))?;
            config.download = config.download.with_api_endpoint(&endpoint);
        }

        if let Some(dir) = get(ENV_OUTPUT_DIR) {
            config.download = config.download.with_output_dir(PathBuf::from(dir));
        }

        if let Some(timeout) = get(ENV_TIMEOUT) {
            config.download = config.download.with_timeout(parse_duration(ENV_TIMEOUT, &timeout)?);
        }

        if let Some(delay) = get(ENV_EXIT_DELAY) {
            config.exit_delay = parse_duration(ENV_EXIT_DELAY, &delay)?;
        }

        if let Some(flag) = get(ENV_NO_PROGRESS) {
            config.show_progress = flag.trim() == "0";
        }

        Ok(config)
    }
}

fn parse_duration(key: &str, value: &str) -> Result<Duration, TtError> {
    humantime::parse_duration(value.trim())
        .map_err(|e| TtError::Config(format!("{key}={value}: {e}")))
}
