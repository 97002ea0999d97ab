use std::collections::HashSet;

use url::Url;

use crate::fetch::Fetcher;
use crate::types::{FetchError, FetchOutcome};

/// Query the archive timemap and return the distinct set of originally
/// captured page URLs. An empty result is a terminal condition for the
/// caller; there is nothing to harvest.
pub async fn list_snapshot_pages(
    fetcher: &dyn Fetcher,
    timemap_url: &str,
) -> Result<Vec<String>, FetchError> {
    match fetcher.fetch_with_retry(timemap_url).await? {
        FetchOutcome::Success(body) => Ok(parse_timemap(&body.bytes)),
        FetchOutcome::NotFound => {
            log::warn!("archive index has no timemap at {timemap_url}");
            Ok(Vec::new())
        }
    }
}

/// Parse a timemap JSON body: an array of rows whose third element is the
/// archived URL. Rows without an absolute http(s) URL there are discarded,
/// which also drops the header row. A body that is not the expected shape
/// logs a warning and yields zero pages.
pub fn parse_timemap(body: &[u8]) -> Vec<String> {
    let rows: Vec<Vec<serde_json::Value>> = match serde_json::from_slice(body) {
        Ok(rows) => rows,
        Err(err) => {
            log::warn!("timemap response was not the expected JSON shape: {err}");
            return Vec::new();
        }
    };

    let mut seen = HashSet::new();
    let mut pages = Vec::new();
    for row in rows {
        let Some(page_url) = row.get(2).and_then(|value| value.as_str()) else {
            continue;
        };
        if !is_absolute_http(page_url) {
            continue;
        }
        if seen.insert(page_url.to_string()) {
            pages.push(page_url.to_string());
        }
    }
    pages
}

fn is_absolute_http(raw: &str) -> bool {
    Url::parse(raw)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}
