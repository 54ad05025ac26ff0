use crate::constants::{
    DEFAULT_API_BASE, ENV_API_BASE, ENV_OUTPUT_DIR, ENV_POLL_MS, ENV_TIMEOUT_SECS, POLL_INTERVAL,
    REQUEST_TIMEOUT, SECOND_DOWNLOAD_DELAY, SMOOTHING_INTERVAL,
};
use crate::error::ConfigError;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct MonitorConfig {
    /// Backend origin, without a trailing slash.
    pub api_base: String,
    pub poll_interval: Duration,
    pub smoothing_interval: Duration,
    /// Delay before each artifact download after the first.
    pub second_download_delay: Duration,
    pub request_timeout: Duration,
    /// Where artifacts land on completion.
    pub output_dir: PathBuf,
    /// Also fetch the bundled result package.
    pub download_package: bool,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            poll_interval: POLL_INTERVAL,
            smoothing_interval: SMOOTHING_INTERVAL,
            second_download_delay: SECOND_DOWNLOAD_DELAY,
            request_timeout: REQUEST_TIMEOUT,
            output_dir: PathBuf::from("."),
            download_package: false,
        }
    }
}

impl MonitorConfig {
    /// Defaults overlaid with the `PROGRESS_MONITOR_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(base) = lookup(ENV_API_BASE) {
            config = config.with_api_base(&base)?;
        }
        if let Some(raw) = lookup(ENV_POLL_MS) {
            let ms = parse_positive(ENV_POLL_MS, &raw)?;
            config.poll_interval = Duration::from_millis(ms);
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs = parse_positive(ENV_TIMEOUT_SECS, &raw)?;
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(dir) = lookup(ENV_OUTPUT_DIR) {
            if !dir.trim().is_empty() {
                config.output_dir = PathBuf::from(dir);
            }
        }

        Ok(config)
    }

    pub fn with_api_base(mut self, base: &str) -> Result<Self, ConfigError> {
        let base = base.trim().trim_end_matches('/');
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ConfigError::InvalidApiBase(base.to_string()));
        }
        self.api_base = base.to_string();
        Ok(self)
    }

    /// Absolute URL for a backend-relative path such as `/api/download/original/x`.
    pub fn resolve(&self, relative: &str) -> String {
        if relative.starts_with("http://") || relative.starts_with("https://") {
            return relative.to_string();
        }
        if relative.starts_with('/') {
            format!("{}{}", self.api_base, relative)
        } else {
            format!("{}/{}", self.api_base, relative)
        }
    }
}

fn parse_positive(var: &'static str, raw: &str) -> Result<u64, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(v) if v > 0 => Ok(v),
        _ => Err(ConfigError::InvalidValue {
            var,
            expected: "a positive integer",
            value: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_env() {
        let config = MonitorConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, MonitorConfig::default());
        assert_eq!(config.poll_interval, Duration::from_millis(1000));
        assert_eq!(config.smoothing_interval, Duration::from_millis(100));
        assert_eq!(config.second_download_delay, Duration::from_millis(600));
    }

    #[test]
    fn env_overrides_and_trims_base() {
        let config = MonitorConfig::from_lookup(lookup(&[
            (ENV_API_BASE, "https://sat.example.com/"),
            (ENV_POLL_MS, "250"),
            (ENV_TIMEOUT_SECS, "5"),
            (ENV_OUTPUT_DIR, "/tmp/results"),
        ]))
        .unwrap();

        assert_eq!(config.api_base, "https://sat.example.com");
        assert_eq!(config.poll_interval, Duration::from_millis(250));
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.output_dir, PathBuf::from("/tmp/results"));
    }

    #[test]
    fn rejects_malformed_values() {
        assert!(matches!(
            MonitorConfig::from_lookup(lookup(&[(ENV_POLL_MS, "0")])),
            Err(ConfigError::InvalidValue { var: ENV_POLL_MS, .. })
        ));
        assert!(matches!(
            MonitorConfig::from_lookup(lookup(&[(ENV_TIMEOUT_SECS, "soon")])),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            MonitorConfig::from_lookup(lookup(&[(ENV_API_BASE, "localhost:2025")])),
            Err(ConfigError::InvalidApiBase(_))
        ));
    }

    #[test]
    fn resolve_joins_relative_urls() {
        let config = MonitorConfig::default();
        assert_eq!(
            config.resolve("/api/download/original/abc"),
            "http://127.0.0.1:2025/api/download/original/abc"
        );
        assert_eq!(config.resolve("files/x.csv"), "http://127.0.0.1:2025/files/x.csv");
        assert_eq!(config.resolve("https://cdn.example.com/x"), "https://cdn.example.com/x");
    }
}
