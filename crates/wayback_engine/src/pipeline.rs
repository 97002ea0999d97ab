use std::path::Path;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::config::EngineConfig;
use crate::dedup::{is_already_saved, LocalImageIndex};
use crate::download::ImageDownloader;
use crate::extract::ImagePatterns;
use crate::fetch::{Fetcher, ProxyClientFetcher};
use crate::harvest::PageHarvester;
use crate::index::list_snapshot_pages;
use crate::proxy::{ProxyEndpoint, ProxyPool};
use crate::types::FetchError;
use crate::work::TaskQueue;

/// Final accounting for one completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub account: String,
    pub pages_parsed: usize,
    pub images_processed: usize,
    /// Images actually written to disk; `NotFound` images count as
    /// processed but not saved, so this is at most `images_processed`.
    pub images_saved: usize,
    pub processed_pages: Vec<String>,
    pub processed_images: Vec<String>,
    pub failed_pages: Vec<String>,
    pub failed_images: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("no proxies configured; at least one is required when proxies are enabled")]
    NoProxies,
    #[error("invalid media host pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("snapshot index fetch failed: {0}")]
    Index(#[from] FetchError),
    #[error("found no archived pages for account {0}")]
    NoSnapshots(String),
}

/// The harvest-and-download run: snapshot discovery, concurrent page
/// harvesting, local-cache dedup, then concurrent image download. The two
/// fan-out stages run sequentially relative to each other.
pub struct Pipeline {
    config: Arc<EngineConfig>,
    fetcher: Arc<dyn Fetcher>,
    patterns: Arc<ImagePatterns>,
    cancel: CancellationToken,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Pipeline {
    pub fn new(config: EngineConfig, proxies: Vec<ProxyEndpoint>) -> Result<Self, PipelineError> {
        if config.use_proxies && proxies.is_empty() {
            return Err(PipelineError::NoProxies);
        }
        let pool = config
            .use_proxies
            .then(|| Arc::new(ProxyPool::new(proxies)));
        let patterns = Arc::new(ImagePatterns::for_host(&config.media_host)?);
        let cancel = CancellationToken::new();
        let fetcher = Arc::new(ProxyClientFetcher::new(
            config.fetch.clone(),
            config.retry,
            pool,
            cancel.clone(),
        ));
        Ok(Self {
            config: Arc::new(config),
            fetcher,
            patterns,
            cancel,
        })
    }

    /// Token that stops workers at their next loop iteration or retry
    /// sleep. A cancelled run still drains its in-flight fetches.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Run the whole pipeline for one account. `account_root` must already
    /// contain the `media/` and `profile/` subdirectories; `local` is the
    /// filename index scanned from them before the run.
    pub async fn run(
        &self,
        account: &str,
        account_root: &Path,
        local: &LocalImageIndex,
    ) -> Result<RunReport, PipelineError> {
        log::info!("fetching list of archived pages for profile: {account}");
        let pages = list_snapshot_pages(self.fetcher.as_ref(), &self.config.timemap_url(account))
            .await?;
        if pages.is_empty() {
            return Err(PipelineError::NoSnapshots(account.to_string()));
        }
        log::info!("found {} archived pages", pages.len());

        let page_queue = Arc::new(TaskQueue::seeded(pages, self.config.max_passes));
        let image_queue = Arc::new(TaskQueue::new(self.config.max_passes));

        let harvester = PageHarvester::new(
            Arc::clone(&self.fetcher),
            Arc::clone(&self.patterns),
            Arc::clone(&self.config),
            self.cancel.clone(),
        );
        harvester
            .run(Arc::clone(&page_queue), Arc::clone(&image_queue))
            .await;
        log::info!(
            "found {} archived images for: {account}",
            image_queue.total()
        );

        // One filtering pass against the startup snapshot of local files,
        // before any download worker starts.
        let filtered = image_queue.retain(|url| !is_already_saved(url, &self.patterns, local));
        if filtered > 0 {
            log::info!("filtered {filtered} previously downloaded images");
        }

        let downloader = ImageDownloader::new(
            Arc::clone(&self.fetcher),
            Arc::clone(&self.patterns),
            Arc::clone(&self.config),
            account_root.to_path_buf(),
            self.cancel.clone(),
        );
        let images_saved = downloader.run(Arc::clone(&image_queue)).await;

        Ok(RunReport {
            account: account.to_string(),
            pages_parsed: page_queue.processed_len(),
            images_processed: image_queue.processed_len(),
            images_saved,
            processed_pages: page_queue.processed_snapshot(),
            processed_images: image_queue.processed_snapshot(),
            failed_pages: page_queue.failed_snapshot(),
            failed_images: image_queue.failed_snapshot(),
        })
    }
}
