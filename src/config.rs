//! Application configuration.
//!
//! Values are layered with figment: built-in defaults, then an optional
//! `knu-courses.toml`, then `KNU_`-prefixed environment variables.

use anyhow::Context;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::path::PathBuf;
use std::time::Duration;

/// Optional config file looked up in the working directory.
pub const CONFIG_FILE: &str = "knu-courses.toml";

/// Prefix for environment overrides, e.g. `KNU_SETTLE_DELAY=300ms`.
pub const ENV_PREFIX: &str = "KNU_";

const DEFAULT_PORTAL_URL: &str = "https://knuin.knu.ac.kr/public/stddm/lectPlnInqr.knu";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base level for this crate's log output (`RUST_LOG` takes precedence).
    pub log_level: String,
    /// Course-plan search page.
    pub portal_url: String,
    /// Chrome/Chromium executable. Auto-detected when unset.
    pub browser_path: Option<PathBuf>,
    pub headless: bool,
    pub window_width: u32,
    pub window_height: u32,
    /// Upper bound for every wait-until condition on the portal form.
    #[serde(with = "duration_serde")]
    pub wait_timeout: Duration,
    /// Interval between polls while waiting for an element.
    #[serde(with = "duration_serde")]
    pub poll_interval: Duration,
    /// Pause before reading grid state, giving the virtualized grid time to render.
    #[serde(with = "duration_serde")]
    pub settle_delay: Duration,
    /// Pixels the grid is scrolled per iteration.
    pub scroll_step: i64,
    /// Hard cap on scroll iterations for a single search.
    pub max_scroll_iterations: u32,
    /// Line-oriented professor rating file.
    pub rating_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            portal_url: DEFAULT_PORTAL_URL.to_string(),
            browser_path: None,
            headless: true,
            window_width: 1280,
            window_height: 1024,
            wait_timeout: Duration::from_secs(20),
            poll_interval: Duration::from_millis(100),
            settle_delay: Duration::from_millis(200),
            scroll_step: 320,
            max_scroll_iterations: 1000,
            rating_file: PathBuf::from("course_rating.txt"),
        }
    }
}

impl Config {
    /// Load the layered configuration.
    pub fn load() -> anyhow::Result<Self> {
        Self::figment()
            .extract()
            .context("Failed to load config")
    }

    pub fn figment() -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX))
    }
}

/// Parse a human duration such as `"200ms"`, `"20s"` or `"1.5m"`.
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let parser = fundu::DurationParser::with_all_time_units();
    let parsed = parser
        .parse(s.trim())
        .map_err(|e| format!("invalid duration {s:?}: {e}"))?;
    Duration::try_from(parsed).map_err(|e| format!("invalid duration {s:?}: {e}"))
}

/// Durations are written as integer milliseconds and read from either
/// milliseconds or a human-readable string.
mod duration_serde {
    use super::*;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum DurationValue {
        Millis(u64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        match DurationValue::deserialize(deserializer)? {
            DurationValue::Millis(ms) => Ok(Duration::from_millis(ms)),
            DurationValue::Text(text) => parse_duration(&text).map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_human_durations() {
        assert_eq!(parse_duration("200ms").unwrap(), Duration::from_millis(200));
        assert_eq!(parse_duration("20s").unwrap(), Duration::from_secs(20));
        assert!(parse_duration("soon").is_err());
    }

    #[test]
    fn defaults_survive_extraction() {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .extract()
            .unwrap();
        assert_eq!(config.scroll_step, 320);
        assert_eq!(config.settle_delay, Duration::from_millis(200));
        assert_eq!(config.wait_timeout, Duration::from_secs(20));
        assert!(config.headless);
    }

    #[test]
    fn string_durations_override_defaults() {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Serialized::default("settle_delay", "350ms"))
            .merge(Serialized::default("wait_timeout", 5000))
            .extract()
            .unwrap();
        assert_eq!(config.settle_delay, Duration::from_millis(350));
        assert_eq!(config.wait_timeout, Duration::from_secs(5));
    }
}
