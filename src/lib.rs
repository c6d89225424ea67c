//! # ttget - short video downloader
//!
//! Resolves short video links through the tikwm API and saves the media
//! as `<author>_<YYYY-MM-DD>_<id>.mp4`.
//!
//! ## Features
//!
//! - HD rendition preferred, standard quality as fallback
//! - Deterministic filenames (creation date in UTC)
//! - Batch mode over arguments and an interactive read loop
//!
//! ## Example
//!
//! ```rust,no_run
//! use ttget::{DownloadOptions, Downloader};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let downloader = Downloader::with_options(
//!         DownloadOptions::default().with_output_dir("./downloads"),
//!     )?;
//!
//!     let plan = downloader.process("VIDEO_URL", None, |_| {}).await?;
//!     println!("Downloaded: {}", plan.filename);
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod download;
pub mod error;
pub mod platform;
pub mod utils;

// Re-export main types
pub use config::Config;
pub use crate::core::{DownloadOptions, DownloadPlan, Downloader, MediaRecord, Progress, Quality};
pub use error::TtError;

/// Result type alias for ttget operations
pub type Result<T> = std::result::Result<T, TtError>;
