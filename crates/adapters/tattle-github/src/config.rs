/// Configuration for the pull-request poller.
#[derive(Debug, Clone)]
pub struct PullPollerConfig {
    /// Repository to watch, in `owner/repo` form.
    pub repo: String,
    /// Polling interval in seconds.
    pub poll_interval_secs: u64,
    /// Optional token for authenticated requests (higher rate limits).
    pub token: Option<String>,
    /// API root, overridable so tests can point at a local server.
    pub api_root: String,
}

impl Default for PullPollerConfig {
    fn default() -> Self {
        Self {
            repo: String::new(),
            poll_interval_secs: 60,
            token: None,
            api_root: "https://api.github.com".to_string(),
        }
    }
}
