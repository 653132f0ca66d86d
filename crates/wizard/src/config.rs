use std::path::PathBuf;
use std::time::Duration;

use crate::poller::DEFAULT_POLL_INTERVAL;

/// Wizard runtime settings.
#[derive(Debug, Clone)]
pub struct WizardConfig {
    /// How often the credit balance is refreshed (default: `60` seconds).
    pub credits_poll_interval: Duration,
    /// File backing the preset cache; in-memory when unset.
    pub preset_cache_path: Option<PathBuf>,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            credits_poll_interval: DEFAULT_POLL_INTERVAL,
            preset_cache_path: None,
        }
    }
}

impl WizardConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default     |
    /// |------------------------------|-------------|
    /// | `CREDITS_POLL_INTERVAL_SECS` | `60`        |
    /// | `PRESET_CACHE_PATH`          | unset       |
    ///
    /// Unparseable or zero intervals fall back to the default.
    pub fn from_env() -> Self {
        let credits_poll_interval = std::env::var("CREDITS_POLL_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_POLL_INTERVAL);

        let preset_cache_path = std::env::var("PRESET_CACHE_PATH")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        Self {
            credits_poll_interval,
            preset_cache_path,
        }
    }
}
