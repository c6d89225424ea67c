//! Error types for ttget

use thiserror::Error;

/// Main error type for ttget operations
#[derive(Debug, Error)]
pub enum TtError {
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Server answered {status} for {url}")]
    HttpStatus { status: u16, url: String },

    #[error("No data from {url} for {}", idle_time(.idle))]
    Stalled { url: String, idle: std::time::Duration },

    #[error("Unexpected API response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Non-zero envelope code; the message is kept verbatim
    #[error("{0}")]
    Api(String),

    #[error("no download links found :c")]
    NoDownloadLink,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Carries the cause in its message, so it has no separate source
    #[error("While getting {link}, an error occurred:\n{cause}")]
    Link { link: String, cause: Box<TtError> },

    #[error("While reading input, an error occurred:\n{0}")]
    ReadInput(std::io::Error),
}

impl TtError {
    /// Attach the offending link to an error
    pub fn for_link(link: &str, cause: TtError) -> Self {
        TtError::Link {
            link: link.to_string(),
            cause: Box::new(cause),
        }
    }

    /// Short category name, used as a log field
    pub fn kind(&self) -> &'static str {
        match self {
            TtError::Transport(_) | TtError::HttpStatus { .. } | TtError::Stalled { .. } => {
                "transport"
            }
            TtError::Decode(_) => "decode",
            TtError::Api(_) => "api",
            TtError::NoDownloadLink => "no_link",
            TtError::Io(_) | TtError::ReadInput(_) => "io",
            TtError::Config(_) => "config",
            TtError::Link { cause, .. } => cause.kind(),
        }
    }
}

fn idle_time(idle: &std::time::Duration) -> humantime::FormattedDuration {
    humantime::format_duration(*idle)
}
