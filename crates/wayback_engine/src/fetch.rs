use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use tokio_util::sync::CancellationToken;

use crate::proxy::ProxyPool;
use crate::types::{FetchBody, FetchError, FetchOutcome};

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
    pub user_agent: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_bytes: 64 * 1024 * 1024,
            user_agent:
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:120.0) Gecko/20100101 Firefox/120.0"
                    .to_string(),
        }
    }
}

/// Attempt budget and inter-attempt delay for one retried fetch.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            delay: Duration::from_secs(2),
        }
    }
}

#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    /// Issue one GET with retries. A 404 resolves to
    /// [`FetchOutcome::NotFound`] immediately; network errors, non-200
    /// statuses and body-read errors are retried through a different proxy
    /// until the attempt budget is spent.
    async fn fetch_with_retry(&self, url: &str) -> Result<FetchOutcome, FetchError>;
}

/// [`Fetcher`] backed by per-attempt `reqwest` clients bound to rotating
/// proxies. With no pool configured, requests go out directly.
pub struct ProxyClientFetcher {
    settings: FetchSettings,
    retry: RetryPolicy,
    pool: Option<Arc<ProxyPool>>,
    cancel: CancellationToken,
}

impl ProxyClientFetcher {
    pub fn new(
        settings: FetchSettings,
        retry: RetryPolicy,
        pool: Option<Arc<ProxyPool>>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            settings,
            retry,
            pool,
            cancel,
        }
    }

    fn build_client(&self, proxy_url: Option<&str>) -> Result<reqwest::Client, String> {
        let mut builder = reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .user_agent(self.settings.user_agent.as_str());
        if let Some(proxy_url) = proxy_url {
            let proxy = reqwest::Proxy::all(proxy_url).map_err(|err| err.to_string())?;
            builder = builder.proxy(proxy);
        }
        builder.build().map_err(|err| err.to_string())
    }

    async fn attempt(
        &self,
        client: &reqwest::Client,
        url: &reqwest::Url,
    ) -> Result<FetchOutcome, String> {
        let response = client
            .get(url.clone())
            .send()
            .await
            .map_err(|err| err.to_string())?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(FetchOutcome::NotFound);
        }
        if !status.is_success() {
            return Err(format!("http status {}", status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|err| err.to_string())?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(format!(
                    "response larger than {} bytes",
                    self.settings.max_bytes
                ));
            }
            bytes.extend_from_slice(&chunk);
        }

        Ok(FetchOutcome::Success(FetchBody {
            bytes: bytes.into(),
            content_type,
        }))
    }
}

#[async_trait::async_trait]
impl Fetcher for ProxyClientFetcher {
    async fn fetch_with_retry(&self, url: &str) -> Result<FetchOutcome, FetchError> {
        let parsed =
            reqwest::Url::parse(url).map_err(|err| FetchError::InvalidUrl(err.to_string()))?;

        let max_attempts = self.retry.max_attempts.max(1);
        let mut last_error = String::from("no attempts were made");
        for attempt in 1..=max_attempts {
            if self.cancel.is_cancelled() {
                return Err(FetchError::Cancelled);
            }

            // The lease lives for exactly one attempt; dropping it returns
            // the proxy to the back of the pool before the backoff sleep,
            // so the next attempt checks out the next endpoint in line.
            let lease = match &self.pool {
                Some(pool) => Some(Arc::clone(pool).acquire().await),
                None => None,
            };
            let proxy_url = lease.as_ref().map(|lease| lease.endpoint().proxy_url());

            let result = match self.build_client(proxy_url.as_deref()) {
                Ok(client) => self.attempt(&client, &parsed).await,
                Err(err) => Err(err),
            };
            drop(lease);

            match result {
                Ok(outcome) => return Ok(outcome),
                Err(reason) => {
                    log::warn!("fetch attempt {attempt}/{max_attempts} failed for {url}: {reason}");
                    last_error = reason;
                }
            }

            if attempt < max_attempts {
                tokio::select! {
                    _ = self.cancel.cancelled() => return Err(FetchError::Cancelled),
                    _ = tokio::time::sleep(self.retry.delay) => {}
                }
            }
        }

        Err(FetchError::RetriesExhausted {
            attempts: max_attempts,
            last_error,
        })
    }
}
