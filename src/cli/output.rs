//! Output formatting and progress display

use crate::core::progress::{Progress, ProgressCallback};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::sync::Arc;

/// Where the sources live, from the package manifest
pub const SOURCE_URL: &str = env!("CARGO_PKG_REPOSITORY");

/// Writes user-facing messages to explicit output and error streams.
///
/// Write failures on these streams are ignored; there is nowhere left to
/// report them.
pub struct OutputFormatter<O: Write, E: Write> {
    out: O,
    err: E,
    show_progress: bool,
}

impl<O: Write, E: Write> OutputFormatter<O, E> {
    /// Create a new output formatter
    pub fn new(out: O, err: E) -> Self {
        Self {
            out,
            err,
            show_progress: true,
        }
    }

    /// Enable or disable the download progress bar
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Give back the underlying streams
    pub fn into_inner(self) -> (O, E) {
        (self.out, self.err)
    }

    /// Print usage text
    pub fn print_help(&mut self) {
        let _ = writeln!(self.err, "note: a firewall could block ttget from reaching the internet");
        let _ = writeln!(self.err, "usage example:");
        let _ = writeln!(
            self.err,
            "1. In terminal -- ttget https://www.tiktok.com/@shrimpydimpy/video/7133412834960018730"
        );
        let _ = writeln!(self.err, "2. Inline mode -- ttget");
        let _ = writeln!(self.err, "source code: {}", SOURCE_URL);
    }

    /// Print the interactive mode greeting
    pub fn print_banner(&mut self) {
        let _ = writeln!(
            self.err,
            "just enter down TikTok links to download (or an empty line for exit)"
        );
        let _ = writeln!(
            self.err,
            "  note: a firewall could block ttget from reaching the internet"
        );
        let _ = writeln!(self.err, "  source code: {}", SOURCE_URL);
    }

    /// Announce work on a link
    pub fn print_working_on(&mut self, link: &str) {
        let _ = writeln!(self.out, "  working on {}...", link);
        let _ = self.out.flush();
    }

    /// Report a finished interactive download
    pub fn print_done(&mut self, filename: &str) {
        let _ = writeln!(self.out, "done -> {}", filename);
    }

    /// Report a finished batch download
    pub fn print_filename(&mut self, filename: &str) {
        let _ = writeln!(self.out, "{}", filename);
    }

    /// Print the interactive mode goodbye
    pub fn print_farewell(&mut self) {
        let _ = writeln!(self.err, "see you next time");
    }

    /// Print warning message
    pub fn warning(&mut self, message: &str) {
        let _ = writeln!(self.err, "warning: {}", message);
    }

    /// Print error message
    pub fn error(&mut self, message: &str) {
        let _ = writeln!(self.err, "{}", message);
    }

    /// Ask for acknowledgment after an unexpected fault
    pub fn print_exit_prompt(&mut self) {
        let _ = writeln!(self.err, "\nPress Enter to exit...");
        let _ = self.err.flush();
    }

    /// Create a progress bar for one download.
    ///
    /// indicatif draws on the terminal's stderr and hides itself when that is
    /// not a tty.
    pub fn create_progress_bar(&self) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }

        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta}) {msg}")
            .ok()?
            .progress_chars("#>-");

        let progress_bar = ProgressBar::new(0);
        progress_bar.set_style(style);
        Some(progress_bar)
    }
}

/// Create a progress callback feeding a progress bar
pub fn create_progress_callback(progress_bar: ProgressBar) -> ProgressCallback {
    Arc::new(move |progress: &Progress| {
        if let Some(total) = progress.total_size {
            progress_bar.set_length(total);
        }
        progress_bar.set_position(progress.downloaded_size);
        if let Some(speed) = progress.speed {
            progress_bar.set_message(format!(
                "{}/s",
                crate::core::progress::format_bytes(speed as u64)
            ));
        }
    })
}
