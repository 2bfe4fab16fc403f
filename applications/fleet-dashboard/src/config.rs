use std::env;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_DETAIL_LIMIT: u32 = 120;

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub api_url: String,
    pub fleet_interval: Duration,
    pub detail_interval: Duration,
    pub detail_limit: u32,
    pub command_status_clear: Duration,
    pub request_timeout: Duration,
    /// Asset to select once the first fleet cycle has run.
    pub select_asset: Option<String>,
    pub alarm_live: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            fleet_interval: Duration::from_secs(15),
            detail_interval: Duration::from_secs(5),
            detail_limit: DEFAULT_DETAIL_LIMIT,
            command_status_clear: Duration::from_millis(3000),
            request_timeout: Duration::from_secs(10),
            select_asset: None,
            alarm_live: false,
        }
    }
}

pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

impl DashboardConfig {
    /// Raise zero periods to [`MIN_INTERVAL`] and a zero detail limit to 1.
    /// Tokio intervals panic on a zero period.
    pub fn sanitized(mut self) -> Self {
        self.fleet_interval = self.fleet_interval.max(MIN_INTERVAL);
        self.detail_interval = self.detail_interval.max(MIN_INTERVAL);
        self.detail_limit = self.detail_limit.max(1);
        self
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup. Unparseable or zero
    /// values fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let positive = |key: &str| -> Option<u64> {
            lookup(key)
                .and_then(|s| s.trim().parse::<u64>().ok())
                .filter(|v| *v > 0)
        };

        let api_url = lookup("FLEET_API_URL")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.api_url);

        let fleet_interval = positive("FLEET_POLL_SECS")
            .map(Duration::from_secs)
            .unwrap_or(defaults.fleet_interval);

        let detail_interval = positive("DETAIL_POLL_SECS")
            .map(Duration::from_secs)
            .unwrap_or(defaults.detail_interval);

        let detail_limit = positive("DETAIL_LIMIT")
            .map(|v| v.min(u32::MAX as u64) as u32)
            .unwrap_or(defaults.detail_limit);

        let command_status_clear = positive("COMMAND_STATUS_CLEAR_MS")
            .map(Duration::from_millis)
            .unwrap_or(defaults.command_status_clear);

        let select_asset = lookup("SELECT_ASSET")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let alarm_live = lookup("ALARM_LIVE")
            .map(|s| matches!(s.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
            .unwrap_or(defaults.alarm_live);

        Self {
            api_url,
            fleet_interval,
            detail_interval,
            detail_limit,
            command_status_clear,
            request_timeout: defaults.request_timeout,
            select_asset,
            alarm_live,
        }
    }
}
