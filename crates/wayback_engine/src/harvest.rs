use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::config::EngineConfig;
use crate::decode::decode_page;
use crate::extract::ImagePatterns;
use crate::fetch::Fetcher;
use crate::types::{FetchError, FetchOutcome};
use crate::work::TaskQueue;

/// Bounded-parallelism consumer of pending page URLs: fetches each archived
/// snapshot, extracts candidate image URLs from its HTML, and merges them
/// into the shared image queue.
pub struct PageHarvester {
    fetcher: Arc<dyn Fetcher>,
    patterns: Arc<ImagePatterns>,
    config: Arc<EngineConfig>,
    cancel: CancellationToken,
}

impl PageHarvester {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        patterns: Arc<ImagePatterns>,
        config: Arc<EngineConfig>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            fetcher,
            patterns,
            config,
            cancel,
        }
    }

    /// Drain the page queue with `page_workers` concurrent workers.
    /// Returns once the queue is empty and every in-flight worker has
    /// finished.
    pub async fn run(&self, pages: Arc<TaskQueue>, images: Arc<TaskQueue>) {
        let workers = self.config.page_workers.max(1);
        let mut handles = Vec::with_capacity(workers);
        for _ in 0..workers {
            let fetcher = Arc::clone(&self.fetcher);
            let patterns = Arc::clone(&self.patterns);
            let config = Arc::clone(&self.config);
            let cancel = self.cancel.clone();
            let pages = Arc::clone(&pages);
            let images = Arc::clone(&images);
            handles.push(tokio::spawn(async move {
                worker_loop(fetcher, patterns, config, cancel, pages, images).await;
            }));
        }
        for handle in handles {
            if let Err(err) = handle.await {
                log::error!("page worker panicked: {err}");
            }
        }
    }
}

async fn worker_loop(
    fetcher: Arc<dyn Fetcher>,
    patterns: Arc<ImagePatterns>,
    config: Arc<EngineConfig>,
    cancel: CancellationToken,
    pages: Arc<TaskQueue>,
    images: Arc<TaskQueue>,
) {
    while !cancel.is_cancelled() {
        let Some(task) = pages.pop() else {
            break;
        };

        let (processed, total) = pages.progress();
        log::info!("[{processed}/{total}] visiting {} to parse images", task.url);

        let snapshot_url = config.snapshot_url(&task.url);
        match fetcher.fetch_with_retry(&snapshot_url).await {
            Ok(FetchOutcome::Success(body)) => {
                let page = decode_page(&body.bytes, body.content_type.as_deref());
                let mut added = 0usize;
                for image_url in patterns.extract_image_urls(&page.text) {
                    if images.push_unique(image_url) {
                        added += 1;
                    }
                }
                pages.complete(&task.url);
                let (processed, total) = pages.progress();
                log::info!(
                    "[{processed}/{total}] parsed {} ({added} new images)",
                    task.url
                );
            }
            Ok(FetchOutcome::NotFound) => {
                log::info!("skipping {} - no longer in the archive", task.url);
                pages.complete(&task.url);
            }
            Err(FetchError::Cancelled) => {
                pages.requeue(task);
                break;
            }
            Err(err) => {
                log::warn!("error parsing images from {}: {err}", task.url);
                if !pages.requeue(task.clone()) {
                    log::error!("giving up on page {} after repeated failures", task.url);
                }
            }
        }
    }
}
