//! Per-link download pipeline

use crate::core::media_info::{DownloadPlan, MediaRecord, Quality};
use crate::core::progress::ProgressCallback;
use crate::download::FileDownloader;
use crate::error::TtError;
use crate::platform::{HttpClientConfig, TikwmClient, DEFAULT_API_ENDPOINT};
use crate::utils::has_unsafe_chars;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Main downloader configuration
#[derive(Debug, Clone)]
pub struct DownloadOptions {
    /// Metadata lookup endpoint
    pub api_endpoint: String,
    /// Directory downloaded files are written to
    pub output_dir: PathBuf,
    /// Network timeout: bounds connecting, each lookup and every idle gap
    /// while streaming media; transport default when unset
    pub timeout: Option<Duration>,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            api_endpoint: DEFAULT_API_ENDPOINT.to_string(),
            output_dir: PathBuf::from("."),
            timeout: None,
        }
    }
}

impl DownloadOptions {
    /// Set lookup endpoint
    pub fn with_api_endpoint(mut self, endpoint: &str) -> Self {
        self.api_endpoint = endpoint.to_string();
        self
    }

    /// Set output directory
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Set network timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Resolves a link and downloads its media
pub struct Downloader {
    options: DownloadOptions,
    api: TikwmClient,
    files: FileDownloader,
}

impl Downloader {
    /// Create a new downloader with default options
    pub fn new() -> Result<Self, TtError> {
        Self::with_options(DownloadOptions::default())
    }

    /// Create a new downloader; both stages share one HTTP client
    pub fn with_options(options: DownloadOptions) -> Result<Self, TtError> {
        let http = HttpClientConfig {
            connect_timeout: options.timeout,
            ..HttpClientConfig::default()
        };
        let client = http.build()?;

        Ok(Self {
            api: TikwmClient::with_client(&options.api_endpoint, client.clone())
                .with_timeout(options.timeout),
            files: FileDownloader::with_client(client).with_idle_timeout(options.timeout),
            options,
        })
    }

    /// Current options
    pub fn options(&self) -> &DownloadOptions {
        &self.options
    }

    /// Look the link up through the metadata API
    pub async fn resolve(&self, link: &str) -> Result<MediaRecord, TtError> {
        self.api.resolve(link).await
    }

    /// Choose the download URL and filename for a record
    pub fn plan(&self, record: &MediaRecord) -> Result<DownloadPlan, TtError> {
        let plan = DownloadPlan::from_record(record)?;
        if plan.quality == Quality::Standard {
            info!("No HD rendition for {}, using standard quality", record.id);
        }
        if has_unsafe_chars(&plan.filename) {
            warn!(
                "Filename {:?} contains characters the filesystem may reject",
                plan.filename
            );
        }
        debug!("Planned {} -> {}", plan.url, plan.filename);
        Ok(plan)
    }

    /// Download the planned media into the output directory
    pub async fn fetch(
        &self,
        plan: &DownloadPlan,
        progress_callback: Option<ProgressCallback>,
    ) -> Result<PathBuf, TtError> {
        let output_path = self.options.output_dir.join(&plan.filename);
        self.files
            .download(&plan.url, &output_path, progress_callback)
            .await?;
        Ok(output_path)
    }

    /// Resolve, plan and fetch one link.
    ///
    /// `on_plan` sees the plan before any media byte is requested. Errors are
    /// wrapped with the link they belong to.
    pub async fn process<F>(
        &self,
        link: &str,
        progress_callback: Option<ProgressCallback>,
        on_plan: F,
    ) -> Result<DownloadPlan, TtError>
    where
        F: FnOnce(&DownloadPlan),
    {
        debug!("Processing link {:?}", link);
        let wrap = |e| TtError::for_link(link, e);

        let record = self.resolve(link).await.map_err(wrap)?;
        let plan = self.plan(&record).map_err(wrap)?;
        on_plan(&plan);
        self.fetch(&plan, progress_callback).await.map_err(wrap)?;

        info!("Finished {} as {}", link, plan.filename);
        Ok(plan)
    }
}
