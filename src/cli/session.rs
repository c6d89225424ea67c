//! Batch and interactive driving modes

use crate::cli::args::is_help_arg;
use crate::cli::output::{create_progress_callback, OutputFormatter};
use crate::core::{Downloader, Quality};
use crate::error::TtError;
use std::io::Write;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::info;

/// How a session ended without error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// All arguments were handled
    Finished,
    /// The user entered an empty line
    Farewell,
    /// Standard input was closed
    EndOfInput,
}

/// Drives the downloader over a sequence of links.
///
/// The first failing link ends the whole session; remaining links are not
/// attempted.
pub struct Session<O: Write, E: Write> {
    downloader: Downloader,
    output: OutputFormatter<O, E>,
    exit_delay: Duration,
}

impl<O: Write, E: Write> Session<O, E> {
    /// Create a new session
    pub fn new(downloader: Downloader, output: OutputFormatter<O, E>) -> Self {
        Self {
            downloader,
            output,
            exit_delay: Duration::from_secs(5),
        }
    }

    /// Set the pause before leaving interactive mode
    pub fn with_exit_delay(mut self, exit_delay: Duration) -> Self {
        self.exit_delay = exit_delay;
        self
    }

    /// Give back the output formatter
    pub fn into_output(self) -> OutputFormatter<O, E> {
        self.output
    }

    /// Process command line arguments in order
    pub async fn run_batch(&mut self, args: &[String]) -> Result<Exit, TtError> {
        for arg in args {
            if is_help_arg(arg) {
                self.output.print_help();
                continue;
            }

            let filename = self.process_link(arg).await?;
            self.output.print_filename(&filename);
        }

        Ok(Exit::Finished)
    }

    /// Read links from `input` until an empty line or end of input
    pub async fn run_interactive<R>(&mut self, mut input: R) -> Result<Exit, TtError>
    where
        R: AsyncBufRead + Unpin,
    {
        self.output.print_banner();

        let mut line = String::new();
        loop {
            line.clear();
            let read = input
                .read_line(&mut line)
                .await
                .map_err(TtError::ReadInput)?;
            if read == 0 {
                info!("Input closed, leaving interactive mode");
                self.output.print_farewell();
                return Ok(Exit::EndOfInput);
            }

            let links = split_links(&line);
            if links.is_empty() {
                self.output.print_farewell();
                tokio::time::sleep(self.exit_delay).await;
                return Ok(Exit::Farewell);
            }

            for link in &links {
                self.output.print_working_on(link);
                let filename = self.process_link(link).await?;
                self.output.print_done(&filename);
            }
        }
    }

    /// Run one link through the pipeline, returning the filename used
    async fn process_link(&mut self, link: &str) -> Result<String, TtError> {
        let progress_bar = self.output.create_progress_bar();
        let callback = progress_bar.clone().map(create_progress_callback);

        let output = &mut self.output;
        let processed = self
            .downloader
            .process(link, callback, |plan| {
                if plan.quality == Quality::Standard {
                    output.warning("couldn't find HD version, downloading how it is...");
                }
            })
            .await;
        if let Some(progress_bar) = progress_bar {
            progress_bar.finish_and_clear();
        }

        Ok(processed?.filename)
    }
}

/// Split an input line into links.
///
/// Tokens are separated by single spaces and trimmed of whitespace and quote
/// characters; tokens left empty are dropped.
pub fn split_links(line: &str) -> Vec<String> {
    line.split(' ')
        .map(|token| token.trim_matches(|c: char| c.is_whitespace() || c == '"' || c == '\''))
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}
