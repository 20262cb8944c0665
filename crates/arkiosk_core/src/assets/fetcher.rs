//! Asset origins: a local directory or a static-file HTTP server.

use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::StatusCode;
use tracing::debug;

use super::errors::{FetchError, FetchResult};

/// Fetches raw asset bytes by candidate filename.
pub trait AssetFetcher {
    /// Fetch `name`, relative to the origin root.
    fn fetch(&self, name: &str) -> impl Future<Output = FetchResult<Vec<u8>>> + Send;
}

/// Reads assets from a local directory.
#[derive(Debug, Clone)]
pub struct FsFetcher {
    root: PathBuf,
}

impl FsFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetFetcher for FsFetcher {
    async fn fetch(&self, name: &str) -> FetchResult<Vec<u8>> {
        let path = self.root.join(name);
        debug!("Reading {}", path.display());

        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                if tokio::fs::metadata(&self.root).await.is_err() {
                    Err(FetchError::unavailable(format!(
                        "asset root {} does not exist",
                        self.root.display()
                    )))
                } else {
                    Err(FetchError::not_found(name))
                }
            }
            Err(e) => Err(FetchError::io(name, e.to_string())),
        }
    }
}

/// Downloads assets from `base_url/<name>`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl HttpFetcher {
    /// Build a fetcher with a per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> FetchResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::unavailable(format!("HTTP client setup failed: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Full URL for a candidate.
    pub fn url(&self, name: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            name.trim_start_matches('/')
        )
    }

    fn classify(&self, name: &str, e: reqwest::Error) -> FetchError {
        if e.is_connect() || e.is_timeout() {
            FetchError::unavailable(format!("{}: {}", self.base_url, e))
        } else {
            FetchError::io(name, e.to_string())
        }
    }
}

impl AssetFetcher for HttpFetcher {
    async fn fetch(&self, name: &str) -> FetchResult<Vec<u8>> {
        let url = self.url(name);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.classify(name, e))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND || status == StatusCode::GONE {
            return Err(FetchError::not_found(name));
        }
        if !status.is_success() {
            return Err(FetchError::status(name, status.as_u16()));
        }

        let mut bytes = Vec::with_capacity(response.content_length().unwrap_or(0) as usize);
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| self.classify(name, e))?;
            bytes.extend_from_slice(&chunk);
        }

        Ok(bytes)
    }
}
