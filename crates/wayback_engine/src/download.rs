use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::config::EngineConfig;
use crate::extract::ImagePatterns;
use crate::fetch::Fetcher;
use crate::persist::AtomicFileWriter;
use crate::types::{FetchError, FetchOutcome, ResourceKind};
use crate::work::TaskQueue;

/// Bounded-parallelism consumer of pending image URLs: fetches each through
/// the archive and persists it under the kind-specific subdirectory of the
/// account root.
pub struct ImageDownloader {
    fetcher: Arc<dyn Fetcher>,
    patterns: Arc<ImagePatterns>,
    config: Arc<EngineConfig>,
    account_root: PathBuf,
    cancel: CancellationToken,
}

impl ImageDownloader {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        patterns: Arc<ImagePatterns>,
        config: Arc<EngineConfig>,
        account_root: PathBuf,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            fetcher,
            patterns,
            config,
            account_root,
            cancel,
        }
    }

    /// Drain the image queue with `image_workers` concurrent workers and
    /// return how many images were written to disk. A NotFound image
    /// counts as processed but not saved.
    pub async fn run(&self, images: Arc<TaskQueue>) -> usize {
        let saved = Arc::new(AtomicUsize::new(0));
        let workers = self.config.image_workers.max(1);
        let mut handles = Vec::with_capacity(workers);
        for _ in 0..workers {
            let fetcher = Arc::clone(&self.fetcher);
            let patterns = Arc::clone(&self.patterns);
            let config = Arc::clone(&self.config);
            let account_root = self.account_root.clone();
            let cancel = self.cancel.clone();
            let images = Arc::clone(&images);
            let saved = Arc::clone(&saved);
            handles.push(tokio::spawn(async move {
                worker_loop(
                    fetcher,
                    patterns,
                    config,
                    account_root,
                    cancel,
                    images,
                    saved,
                )
                .await;
            }));
        }
        for handle in handles {
            if let Err(err) = handle.await {
                log::error!("image worker panicked: {err}");
            }
        }
        saved.load(Ordering::Relaxed)
    }
}

async fn worker_loop(
    fetcher: Arc<dyn Fetcher>,
    patterns: Arc<ImagePatterns>,
    config: Arc<EngineConfig>,
    account_root: PathBuf,
    cancel: CancellationToken,
    images: Arc<TaskQueue>,
    saved: Arc<AtomicUsize>,
) {
    while !cancel.is_cancelled() {
        let Some(task) = images.pop() else {
            break;
        };

        let Some(filename) = patterns.filename_of(&task.url).map(str::to_string) else {
            log::warn!("no filename in image url {}, dropping it", task.url);
            images.complete(&task.url);
            continue;
        };
        let kind = ResourceKind::classify(&task.url);

        let (processed, total) = images.progress();
        log::info!(
            "[{processed}/{total}] fetching {} image {}",
            kind.subdir(),
            task.url
        );

        let snapshot_url = config.snapshot_url(&task.url);
        match fetcher.fetch_with_retry(&snapshot_url).await {
            Ok(FetchOutcome::Success(body)) => {
                let writer = AtomicFileWriter::new(account_root.join(kind.subdir()));
                match writer.write_bytes(&filename, &body.bytes) {
                    Ok(_) => {
                        saved.fetch_add(1, Ordering::Relaxed);
                        images.complete(&task.url);
                        let (processed, total) = images.progress();
                        log::info!("[{processed}/{total}] saved {}", task.url);
                    }
                    Err(err) => {
                        log::warn!("error saving {filename}: {err}");
                        if !images.requeue(task.clone()) {
                            log::error!("giving up on image {} after repeated failures", task.url);
                        }
                    }
                }
            }
            Ok(FetchOutcome::NotFound) => {
                log::info!("skipping {} - not a valid image resource", task.url);
                images.complete(&task.url);
            }
            Err(FetchError::Cancelled) => {
                images.requeue(task);
                break;
            }
            Err(err) => {
                log::warn!("error downloading image from {snapshot_url}: {err}");
                if !images.requeue(task.clone()) {
                    log::error!("giving up on image {} after repeated failures", task.url);
                }
            }
        }
    }
}
