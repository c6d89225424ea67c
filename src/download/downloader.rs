//! Streaming file downloader

use crate::core::progress::{format_bytes, Progress, ProgressCallback};
use crate::error::TtError;
use futures_util::StreamExt;
use reqwest::Client;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

/// Downloads a single URL into a local file
#[derive(Debug, Clone)]
pub struct FileDownloader {
    client: Client,
    idle_timeout: Option<Duration>,
}

impl FileDownloader {
    /// Create a downloader with a default reqwest client
    pub fn new() -> Result<Self, TtError> {
        Ok(Self::with_client(Client::builder().build()?))
    }

    /// Reuse an existing reqwest client
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            idle_timeout: None,
        }
    }

    /// Give up when the server sends nothing for this long.
    ///
    /// Applies to the response head and to every body chunk, never to the
    /// transfer as a whole.
    pub fn with_idle_timeout(mut self, idle_timeout: Option<Duration>) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    /// Download `url` to `output_path`, returning the number of bytes written.
    ///
    /// Bytes go to a `.part` sibling first which is renamed over `output_path`
    /// once the body is complete, and removed on failure.
    pub async fn download(
        &self,
        url: &str,
        output_path: &Path,
        progress_callback: Option<ProgressCallback>,
    ) -> Result<u64, TtError> {
        info!("Starting download from URL: {}", url);
        let tmp_path = part_path(output_path);
        let mut file = File::create(&tmp_path).await?;

        let streamed = self.stream_to_file(url, &mut file, progress_callback).await;
        drop(file);

        let result = match streamed {
            Ok(downloaded) => tokio::fs::rename(&tmp_path, output_path)
                .await
                .map(|_| downloaded)
                .map_err(TtError::from),
            Err(e) => Err(e),
        };

        match result {
            Ok(downloaded) => {
                info!(
                    "Download completed: {} -> {}",
                    format_bytes(downloaded),
                    output_path.display()
                );
                Ok(downloaded)
            }
            Err(e) => {
                warn!("Download failed: {}, cleaning up temp file", e);
                let _ = tokio::fs::remove_file(&tmp_path).await;
                Err(e)
            }
        }
    }

    async fn stream_to_file(
        &self,
        url: &str,
        file: &mut File,
        progress_callback: Option<ProgressCallback>,
    ) -> Result<u64, TtError> {
        let response = self.idle(url, self.client.get(url).send()).await??;

        let status = response.status();
        if !status.is_success() {
            return Err(TtError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let mut progress = Progress::new(response.content_length());
        let mut stream = response.bytes_stream();

        while let Some(chunk) = self.idle(url, stream.next()).await? {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            progress.advance(chunk.len() as u64);

            debug!(
                "Downloaded {} bytes, total: {} ({:.1}%)",
                chunk.len(),
                progress.downloaded_size,
                progress.percent().unwrap_or_default()
            );

            if let Some(callback) = &progress_callback {
                callback(&progress);
            }
        }

        if let Some(total) = progress.total_size {
            if !progress.is_complete() {
                return Err(TtError::Io(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    format!("body ended after {} of {} bytes", progress.downloaded_size, total),
                )));
            }
        }

        file.flush().await?;
        file.sync_all().await?;

        Ok(progress.downloaded_size)
    }

    /// Await `fut`, failing once the idle timeout passes without progress
    async fn idle<F: Future>(&self, url: &str, fut: F) -> Result<F::Output, TtError> {
        match self.idle_timeout {
            Some(idle) => tokio::time::timeout(idle, fut)
                .await
                .map_err(|_| TtError::Stalled {
                    url: url.to_string(),
                    idle,
                }),
            None => Ok(fut.await),
        }
    }
}

fn part_path(output_path: &Path) -> PathBuf {
    let mut name = output_path.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_part_path() {
        assert_eq!(
            part_path(Path::new("dir/u_2022-01-15_1.mp4")),
            PathBuf::from("dir/u_2022-01-15_1.mp4.part")
        );
    }

    #[tokio::test]
    async fn test_download_writes_exact_bytes() {
        let mut server = mockito::Server::new_async().await;
        let body: Vec<u8> = (0..=255u8).cycle().take(64 * 1024).collect();
        let mock = server
            .mock("GET", "/video.mp4")
            .with_status(200)
            .with_header("content-type", "video/mp4")
            .with_body(body.clone())
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("clip.mp4");
        let seen = Arc::new(AtomicU64::new(0));
        let seen_clone = seen.clone();
        let callback: ProgressCallback = Arc::new(move |p: &Progress| {
            seen_clone.store(p.downloaded_size, Ordering::SeqCst);
        });

        let downloader = FileDownloader::new().unwrap();
        let written = downloader
            .download(&format!("{}/video.mp4", server.url()), &output, Some(callback))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(written, body.len() as u64);
        assert_eq!(std::fs::read(&output).unwrap(), body);
        assert_eq!(seen.load(Ordering::SeqCst), body.len() as u64);
        assert!(!part_path(&output).exists());
    }

    #[tokio::test]
    async fn test_download_replaces_existing_file() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/video.mp4")
            .with_status(200)
            .with_body("new")
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("clip.mp4");
        std::fs::write(&output, "old contents").unwrap();

        FileDownloader::new()
            .unwrap()
            .download(&format!("{}/video.mp4", server.url()), &output, None)
            .await
            .unwrap();

        assert_eq!(std::fs::read_to_string(&output).unwrap(), "new");
    }

    #[tokio::test]
    async fn test_download_http_error_cleans_up() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/expired.mp4")
            .with_status(403)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("clip.mp4");
        let url = format!("{}/expired.mp4", server.url());

        let err = FileDownloader::new()
            .unwrap()
            .download(&url, &output, None)
            .await
            .unwrap_err();

        match err {
            TtError::HttpStatus { status, url: failed } => {
                assert_eq!(status, 403);
                assert_eq!(failed, url);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!output.exists());
        assert!(!part_path(&output).exists());
    }

    #[tokio::test]
    async fn test_download_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("missing").join("clip.mp4");

        let err = FileDownloader::new()
            .unwrap()
            .download("http://127.0.0.1:9/never.mp4", &output, None)
            .await
            .unwrap_err();

        assert!(matches!(err, TtError::Io(_)));
    }

    #[tokio::test]
    async fn test_slow_body_within_idle_timeout_completes() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/slow.mp4")
            .with_status(200)
            .with_chunked_body(|w| {
                for _ in 0..4 {
                    w.write_all(b"chunk")?;
                    w.flush()?;
                    std::thread::sleep(Duration::from_millis(400));
                }
                Ok(())
            })
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("clip.mp4");

        // the transfer as a whole outlasts the timeout
        let written = FileDownloader::new()
            .unwrap()
            .with_idle_timeout(Some(Duration::from_secs(1)))
            .download(&format!("{}/slow.mp4", server.url()), &output, None)
            .await
            .unwrap();

        assert_eq!(written, 20);
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "chunk".repeat(4));
    }

    #[tokio::test]
    async fn test_stalled_body_fails_and_cleans_up() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/stuck.mp4")
            .with_status(200)
            .with_chunked_body(|w| {
                w.write_all(b"chunk")?;
                w.flush()?;
                std::thread::sleep(Duration::from_millis(1500));
                w.write_all(b"late")
            })
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("clip.mp4");

        let err = FileDownloader::new()
            .unwrap()
            .with_idle_timeout(Some(Duration::from_millis(300)))
            .download(&format!("{}/stuck.mp4", server.url()), &output, None)
            .await
            .unwrap_err();

        assert!(matches!(err, TtError::Stalled { idle, .. } if idle == Duration::from_millis(300)));
        assert!(!output.exists());
        assert!(!part_path(&output).exists());
    }

    #[tokio::test]
    async fn test_rename_failure_cleans_up() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/video.mp4")
            .with_status(200)
            .with_body("bytes")
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        // a non-empty directory cannot be replaced by a file
        let output = dir.path().join("clip.mp4");
        std::fs::create_dir(&output).unwrap();
        std::fs::write(output.join("keep"), "x").unwrap();

        let err = FileDownloader::new()
            .unwrap()
            .download(&format!("{}/video.mp4", server.url()), &output, None)
            .await
            .unwrap_err();

        assert!(matches!(err, TtError::Io(_)));
        assert!(!part_path(&output).exists());
        assert!(output.join("keep").exists());
    }
}
