use crate::fetch::{FetchSettings, RetryPolicy};

/// Tunable parameters for one scraping run.
///
/// Every archived fetch is pinned to `snapshot_timestamp`, not to the
/// capture time of the individual snapshot row. That mirrors the archive
/// layout this tool targets; change the field to aim at another capture.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Site whose account pages are looked up in the archive index.
    pub site: String,
    /// Host serving the account's images; extraction patterns are compiled
    /// against it.
    pub media_host: String,
    /// Archive service root.
    pub archive_base: String,
    /// Snapshot timestamp used verbatim for every page and image fetch.
    pub snapshot_timestamp: String,
    /// Concurrent workers draining the page queue.
    pub page_workers: usize,
    /// Concurrent workers draining the image queue.
    pub image_workers: usize,
    /// Ceiling on processing passes per task: one that still fails
    /// transiently on its last allowed pass is recorded as failed instead
    /// of re-enqueued, so a dead proxy set cannot loop forever.
    pub max_passes: u32,
    /// Route requests through the proxy pool. Requires at least one
    /// configured proxy when set.
    pub use_proxies: bool,
    pub retry: RetryPolicy,
    pub fetch: FetchSettings,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            site: "twitter.com".to_string(),
            media_host: "pbs.twimg.com".to_string(),
            archive_base: "https://web.archive.org".to_string(),
            snapshot_timestamp: "20200126021126".to_string(),
            page_workers: 50,
            image_workers: 50,
            max_passes: 3,
            use_proxies: true,
            retry: RetryPolicy::default(),
            fetch: FetchSettings::default(),
        }
    }
}

impl EngineConfig {
    /// Archive URL serving the raw capture of `original`.
    pub fn snapshot_url(&self, original: &str) -> String {
        format!(
            "{}/web/{}if_/{}",
            self.archive_base, self.snapshot_timestamp, original
        )
    }

    /// Timemap query listing every capture whose URL starts with the
    /// account's page.
    pub fn timemap_url(&self, account: &str) -> String {
        format!(
            "{}/web/timemap/json?url={}/{}&matchType=prefix",
            self.archive_base, self.site, account
        )
    }
}
