//! Progress tracking for downloads

use std::sync::Arc;
use std::time::Instant;

/// Callback invoked after every received chunk
pub type ProgressCallback = Arc<dyn Fn(&Progress) + Send + Sync>;

/// Progress information for a download
#[derive(Debug, Clone)]
pub struct Progress {
    /// Total size in bytes, when the server announced it
    pub total_size: Option<u64>,
    /// Number of bytes downloaded
    pub downloaded_size: u64,
    /// Current download speed in bytes per second
    pub speed: Option<f64>,
    start_time: Instant,
}

impl Progress {
    /// Create a new progress tracker
    pub fn new(total_size: Option<u64>) -> Self {
        Self {
            total_size,
            downloaded_size: 0,
            speed: None,
            start_time: Instant::now(),
        }
    }

    /// Record additional received bytes
    pub fn advance(&mut self, bytes: u64) {
        self.downloaded_size += bytes;

        let elapsed = self.start_time.elapsed();
        if elapsed.as_millis() > 0 {
            self.speed = Some(self.downloaded_size as f64 / elapsed.as_secs_f64());
        }
    }

    /// Download progress as a percentage, if the total is known
    pub fn percent(&self) -> Option<f64> {
        match self.total_size {
            Some(total) if total > 0 => Some(self.downloaded_size as f64 / total as f64 * 100.0),
            _ => None,
        }
    }

    /// Check if download is complete
    pub fn is_complete(&self) -> bool {
        matches!(self.total_size, Some(total) if self.downloaded_size >= total)
    }
}

/// Format bytes as human-readable string
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    const THRESHOLD: f64 = 1024.0;

    if bytes == 0 {
        return "0 B".to_string();
    }

    let bytes_f64 = bytes as f64;
    let exp = (bytes_f64.ln() / THRESHOLD.ln()).floor() as usize;
    let exp = exp.min(UNITS.len() - 1);

    let value = bytes_f64 / THRESHOLD.powi(exp as i32);

    if exp == 0 {
        format!("{} {}", bytes, UNITS[exp])
    } else {
        format!("{:.1} {}", value, UNITS[exp])
    }
}
