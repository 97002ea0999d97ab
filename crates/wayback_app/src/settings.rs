use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use wayback_engine::{EngineConfig, RetryPolicy};

pub const SETTINGS_FILENAME: &str = "wayback_scraper.ron";

/// Optional RON settings file overriding the engine's tunables. Every field
/// has a default, so a partial file is fine and no file at all is fine.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub page_workers: usize,
    pub image_workers: usize,
    pub retry_attempts: u32,
    pub retry_delay_ms: u64,
    pub max_passes: u32,
    pub use_proxies: bool,
    pub snapshot_timestamp: String,
    pub site: String,
    pub media_host: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        let config = EngineConfig::default();
        Self {
            page_workers: config.page_workers,
            image_workers: config.image_workers,
            retry_attempts: config.retry.max_attempts,
            retry_delay_ms: config.retry.delay.as_millis() as u64,
            max_passes: config.max_passes,
            use_proxies: config.use_proxies,
            snapshot_timestamp: config.snapshot_timestamp,
            site: config.site,
            media_host: config.media_host,
        }
    }
}

impl AppSettings {
    /// Read the settings file if it exists; fall back to defaults when it
    /// is absent or does not parse.
    pub fn load_or_default(path: &Path) -> Self {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Self::default();
            }
            Err(err) => {
                log::warn!("failed to read settings from {:?}: {err}", path);
                return Self::default();
            }
        };
        match ron::from_str(&content) {
            Ok(settings) => {
                log::info!("loaded settings from {:?}", path);
                settings
            }
            Err(err) => {
                log::warn!("failed to parse settings from {:?}: {err}", path);
                Self::default()
            }
        }
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            site: self.site.clone(),
            media_host: self.media_host.clone(),
            snapshot_timestamp: self.snapshot_timestamp.clone(),
            page_workers: self.page_workers,
            image_workers: self.image_workers,
            max_passes: self.max_passes,
            use_proxies: self.use_proxies,
            retry: RetryPolicy {
                max_attempts: self.retry_attempts,
                delay: Duration::from_millis(self.retry_delay_ms),
            },
            ..EngineConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AppSettings;

    #[test]
    fn partial_settings_file_keeps_defaults_for_the_rest() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("settings.ron");
        std::fs::write(&path, "(retry_attempts: 3, use_proxies: false)").unwrap();

        let settings = AppSettings::load_or_default(&path);
        assert_eq!(settings.retry_attempts, 3);
        assert!(!settings.use_proxies);
        assert_eq!(settings.page_workers, AppSettings::default().page_workers);
    }

    #[test]
    fn missing_or_invalid_file_falls_back_to_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let missing = AppSettings::load_or_default(&dir.path().join("none.ron"));
        assert_eq!(missing.retry_attempts, AppSettings::default().retry_attempts);

        let path = dir.path().join("broken.ron");
        std::fs::write(&path, "not ron at all").unwrap();
        let broken = AppSettings::load_or_default(&path);
        assert!(broken.use_proxies);
    }

    #[test]
    fn engine_config_carries_the_overrides() {
        let settings = AppSettings {
            retry_attempts: 2,
            retry_delay_ms: 10,
            media_host: "pbs.example".to_string(),
            ..AppSettings::default()
        };
        let config = settings.engine_config();
        assert_eq!(config.retry.max_attempts, 2);
        assert_eq!(config.retry.delay.as_millis(), 10);
        assert_eq!(config.media_host, "pbs.example");
    }
}
