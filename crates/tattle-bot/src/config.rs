use serde::Deserialize;

/// Top-level bot configuration, loaded from `tattle.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    pub server: String,
    pub port: u16,
    pub nick: String,
    pub channel: String,
    /// Lines containing any of these substrings are dropped before dispatch.
    pub ignore: Vec<String>,
    /// Trac base URL with trailing slash; enables the ticket lookup action.
    pub trac_url: Option<String>,
    /// Suppression window for repeat ticket lookups, in seconds.
    pub cooldown_secs: u64,
    pub github: Option<GithubSection>,
    pub feed: Option<FeedSection>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            server: "irc.libera.chat".to_string(),
            port: 6667,
            nick: "tattle".to_string(),
            channel: "#tattle".to_string(),
            ignore: Vec::new(),
            trac_url: None,
            cooldown_secs: 300,
            github: None,
            feed: None,
        }
    }
}

/// Pull-request tracker section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GithubSection {
    pub repo: String,
    pub poll_interval_secs: u64,
    pub token: Option<String>,
}

impl Default for GithubSection {
    fn default() -> Self {
        Self {
            repo: String::new(),
            poll_interval_secs: 60,
            token: None,
        }
    }
}

/// Feed tracker section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedSection {
    pub url: String,
    pub poll_interval_secs: u64,
}

impl Default for FeedSection {
    fn default() -> Self {
        Self {
            url: String::new(),
            poll_interval_secs: 60,
        }
    }
}

impl BotConfig {
    /// Load config from `tattle.toml` if it exists, then apply env var
    /// overrides.
    pub fn load() -> Self {
        let mut config = match std::fs::read_to_string("tattle.toml") {
            Ok(content) => match toml::from_str::<BotConfig>(&content) {
                Ok(cfg) => {
                    tracing::info!("Loaded configuration from tattle.toml");
                    cfg
                },
                Err(e) => {
                    tracing::warn!("Failed to parse tattle.toml: {e}, using defaults");
                    BotConfig::default()
                },
            },
            Err(_) => {
                tracing::info!("No tattle.toml found, using defaults");
                BotConfig::default()
            },
        };

        if let Ok(server) = std::env::var("TATTLE_SERVER")
            && !server.is_empty()
        {
            config.server = server;
        }
        if let Ok(val) = std::env::var("TATTLE_PORT")
            && let Ok(port) = val.parse::<u16>()
        {
            config.port = port;
        }
        if let Ok(nick) = std::env::var("TATTLE_NICK")
            && !nick.is_empty()
        {
            config.nick = nick;
        }
        if let Ok(channel) = std::env::var("TATTLE_CHANNEL")
            && !channel.is_empty()
        {
            config.channel = channel;
        }
        if let Ok(token) = std::env::var("TATTLE_GITHUB_TOKEN")
            && !token.is_empty()
            && let Some(github) = config.github.as_mut()
        {
            github.token = Some(token);
        }

        config
    }

    /// Validate configuration, exiting on anything the engine cannot run
    /// with.
    pub fn validate(&self) {
        if self.server.is_empty() || self.port == 0 {
            tracing::error!(server = self.server, port = self.port, "invalid server address");
            std::process::exit(1);
        }
        if self.nick.is_empty() {
            tracing::error!("nick must not be empty");
            std::process::exit(1);
        }
        if !self.channel.starts_with('#') {
            tracing::error!(channel = self.channel, "channel must start with '#'");
            std::process::exit(1);
        }
        if self.cooldown_secs == 0 {
            tracing::error!("cooldown_secs must be > 0");
            std::process::exit(1);
        }
        if let Some(url) = &self.trac_url
            && !url.ends_with('/')
        {
            tracing::error!(url, "trac_url must end with '/'");
            std::process::exit(1);
        }
        if let Some(github) = &self.github {
            if github.repo.split('/').filter(|p| !p.is_empty()).count() != 2 {
                tracing::error!(repo = github.repo, "github.repo must be owner/repo");
                std::process::exit(1);
            }
            if github.poll_interval_secs == 0 {
                tracing::error!("github.poll_interval_secs must be > 0");
                std::process::exit(1);
            }
            if github.token.is_some() {
                tracing::warn!(
                    "github token is set in config file, use TATTLE_GITHUB_TOKEN in production"
                );
            }
        }
        if let Some(feed) = &self.feed {
            if feed.url.is_empty() {
                tracing::error!("feed.url must not be empty");
                std::process::exit(1);
            }
            if feed.poll_interval_secs == 0 {
                tracing::error!("feed.poll_interval_secs must be > 0");
                std::process::exit(1);
            }
        }
    }
}
