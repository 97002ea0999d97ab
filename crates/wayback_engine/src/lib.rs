//! Wayback scraping engine: snapshot discovery, concurrent page
//! harvesting, and proxied image download.
mod config;
mod decode;
mod dedup;
mod download;
mod extract;
mod fetch;
mod harvest;
mod index;
mod persist;
mod pipeline;
mod proxy;
mod types;
mod work;

pub use config::EngineConfig;
pub use decode::{decode_page, DecodedPage};
pub use dedup::{is_already_saved, LocalImageIndex};
pub use download::ImageDownloader;
pub use extract::{profile_size_spread, ImagePatterns, PROFILE_STEM_CAP};
pub use fetch::{FetchSettings, Fetcher, ProxyClientFetcher, RetryPolicy};
pub use harvest::PageHarvester;
pub use index::{list_snapshot_pages, parse_timemap};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use pipeline::{Pipeline, PipelineError, RunReport};
pub use proxy::{ParseProxyError, ProxyEndpoint, ProxyLease, ProxyPool};
pub use types::{FetchBody, FetchError, FetchOutcome, ResourceKind};
pub use work::{Task, TaskQueue};
