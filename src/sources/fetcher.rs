use futures::StreamExt;
use reqwest::{Client, redirect::Policy};
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::FetcherConfig;
use crate::errors::{AppError, AppResult, FetchError, FetchResult, NetworkErrorKind};
use crate::models::{PlaylistDocument, PlaylistSource};
use crate::utils::url::UrlUtils;

/// Retrieves playlist text over HTTP.
///
/// One GET per call, redirects followed, no cookies, no retries. The body is
/// returned exactly as received, bounded by `max_body_size`.
#[derive(Debug, Clone)]
pub struct PlaylistFetcher {
    client: Client,
    timeout: Duration,
    max_body_size: usize,
}

impl PlaylistFetcher {
    pub fn new(config: &FetcherConfig) -> AppResult<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .redirect(Policy::limited(config.max_redirects))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            timeout: config.timeout,
            max_body_size: config.max_body_size,
        })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Validate an untrusted URL and fetch it with the default timeout.
    /// Invalid input fails before any network access.
    pub async fn fetch_url(&self, candidate: &str) -> FetchResult<PlaylistDocument> {
        let source = PlaylistSource::parse(candidate)?;
        self.fetch(&source).await
    }

    pub async fn fetch(&self, source: &PlaylistSource) -> FetchResult<PlaylistDocument> {
        self.fetch_with_timeout(source, self.timeout).await
    }

    pub async fn fetch_with_timeout(
        &self,
        source: &PlaylistSource,
        timeout: Duration,
    ) -> FetchResult<PlaylistDocument> {
        self.fetch_with_cancel(source, timeout, &CancellationToken::new())
            .await
    }

    /// Fetch, aborting when either `timeout` elapses or `cancel` fires.
    /// An aborted fetch never yields a partial body.
    pub async fn fetch_with_cancel(
        &self,
        source: &PlaylistSource,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> FetchResult<PlaylistDocument> {
        let display_url = UrlUtils::obfuscate_credentials(source.as_str());
        debug!("Fetching playlist from {}", display_url);
        let started = Instant::now();

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(FetchError::network(
                NetworkErrorKind::Cancelled,
                "request cancelled by caller",
            )),
            outcome = tokio::time::timeout(timeout, self.retrieve(source)) => match outcome {
                Ok(result) => result,
                Err(_) => Err(FetchError::timeout(format!(
                    "no complete response within {}",
                    humantime::format_duration(timeout)
                ))),
            },
        };

        match &result {
            Ok(document) => debug!(
                "Fetched {} bytes from {} in {}ms",
                document.len(),
                display_url,
                started.elapsed().as_millis()
            ),
            Err(FetchError::Upstream { status }) => {
                warn!("Upstream {} answered HTTP {}", display_url, status)
            }
            Err(e) => warn!("Failed to fetch playlist from {}: {}", display_url, e),
        }

        result
    }

    async fn retrieve(&self, source: &PlaylistSource) -> FetchResult<PlaylistDocument> {
        let response = self.client.get(source.url().clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Upstream {
                status: status.as_u16(),
            });
        }

        if let Some(declared) = response.content_length()
            && declared > self.max_body_size as u64
        {
            return Err(self.too_large());
        }

        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            if body.len() + chunk.len() > self.max_body_size {
                return Err(self.too_large());
            }
            body.extend_from_slice(&chunk);
        }

        let text = match String::from_utf8(body) {
            Ok(text) => text,
            Err(e) => {
                debug!("Playlist body is not valid UTF-8, decoding lossily");
                String::from_utf8_lossy(e.as_bytes()).into_owned()
            }
        };

        Ok(PlaylistDocument::new(source.clone(), text))
    }

    fn too_large(&self) -> FetchError {
        FetchError::network(
            NetworkErrorKind::BodyTooLarge,
            format!("body exceeds {} bytes", self.max_body_size),
        )
    }
}
