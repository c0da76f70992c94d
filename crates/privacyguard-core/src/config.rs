// ── Engine configuration ──
//
// Runtime settings the dashboard engine and view context need. Built by
// the config crate from the TOML file and CLI overrides.

use std::time::Duration;

use url::Url;

use crate::feedback::{DEFAULT_FADE_DURATION, DEFAULT_TOAST_DURATION};

pub const DEFAULT_API_URL: &str = "http://localhost:8001/api";
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(30);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Control API base, e.g. `http://localhost:8001/api`.
    pub api_url: Url,
    pub timeout: Duration,
    /// Accept self-signed TLS certificates.
    pub accept_invalid_certs: bool,
    /// Period of the background refresh cycle.
    pub refresh_interval: Duration,
    pub toast_duration: Duration,
    pub fade_duration: Duration,
}

impl DashboardConfig {
    pub fn new(api_url: Url) -> Self {
        Self {
            api_url,
            timeout: DEFAULT_TIMEOUT,
            accept_invalid_certs: false,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            toast_duration: DEFAULT_TOAST_DURATION,
            fade_duration: DEFAULT_FADE_DURATION,
        }
    }
}
