use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use tattle_core::{Command, CooldownTracker};

use crate::actions::{self, Action};
use crate::config::BotConfig;
use crate::connection::Connection;
use crate::error::BotError;

/// The engine: one connection, one ordered action registry, and the shared
/// state reactions touch concurrently (the write half and the cooldown
/// table).
///
/// Frozen behind an `Arc` at construction; the registry is never mutated
/// once the read loop starts. Reactions run as detached tasks whose only
/// lifetime bound is process exit.
pub struct Bot {
    conn: Connection,
    nick: String,
    channel: String,
    ignore: Vec<String>,
    trac_url: Option<String>,
    cooldown: CooldownTracker,
    http: reqwest::Client,
    actions: Vec<Action>,
}

impl Bot {
    /// Build a bot with the default action registry: ticket lookups (when a
    /// tracker URL is configured), heartbeat replies, and the /me echo.
    pub fn new(conn: Connection, config: &BotConfig) -> Arc<Self> {
        let registry = actions::default_actions(&config.nick, config.trac_url.is_some());
        Self::with_actions(conn, config, registry)
    }

    /// Build a bot with an explicit action registry.
    pub fn with_actions(conn: Connection, config: &BotConfig, actions: Vec<Action>) -> Arc<Self> {
        let http = reqwest::Client::builder()
            .user_agent("tattle/0.1")
            .build()
            .expect("Failed to create HTTP client");
        Arc::new(Self {
            conn,
            nick: config.nick.clone(),
            channel: config.channel.clone(),
            ignore: config.ignore.clone(),
            trac_url: config.trac_url.clone(),
            cooldown: CooldownTracker::new(Duration::from_secs(config.cooldown_secs)),
            http,
            actions,
        })
    }

    pub fn nick(&self) -> &str {
        &self.nick
    }

    pub fn trac_url(&self) -> Option<&str> {
        self.trac_url.as_deref()
    }

    pub fn cooldown(&self) -> &CooldownTracker {
        &self.cooldown
    }

    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Send one framed command to the server.
    pub async fn send(&self, command: &Command) {
        self.conn.send_line(&command.to_string()).await;
    }

    /// Message the destination channel.
    pub async fn msg_channel(&self, text: &str) {
        self.send(&Command::Privmsg {
            target: self.channel.clone(),
            text: text.to_string(),
        })
        .await;
    }

    /// Message a single user.
    pub async fn private_msg(&self, user: &str, text: &str) {
        self.send(&Command::Privmsg {
            target: user.to_string(),
            text: text.to_string(),
        })
        .await;
    }

    /// The fixed three-line greeting sent immediately after connecting,
    /// before the read loop starts.
    pub async fn handshake(&self) {
        self.send(&Command::Register {
            nick: self.nick.clone(),
        })
        .await;
        self.send(&Command::Nick(self.nick.clone())).await;
        self.send(&Command::Join(self.channel.clone())).await;
    }

    /// The read loop: pull lines until the stream ends or errors. Both are
    /// fatal; the caller logs and exits.
    pub async fn run(self: Arc<Self>) -> Result<(), BotError> {
        loop {
            match self.conn.read_line().await {
                Ok(Some(line)) => Arc::clone(&self).dispatch(&line),
                Ok(None) => return Err(BotError::Disconnected),
                Err(e) => return Err(BotError::Read(e)),
            }
        }
    }

    /// Evaluate one line against the registry.
    ///
    /// Lines from ignored senders are dropped before any matcher runs.
    /// Matchers are evaluated sequentially in registration order; every
    /// match spawns its reaction as a detached task, so a slow reaction
    /// never delays the next line and same-line reactions never block each
    /// other.
    pub fn dispatch(self: Arc<Self>, line: &str) {
        if self.ignore.iter().any(|s| line.contains(s.as_str())) {
            tracing::debug!(line, "Dropped line from ignored sender");
            return;
        }
        for action in &self.actions {
            if let Some(capture) = (action.parse)(&action.re, line) {
                tracing::debug!(action = action.name, "Matched");
                let run = action.run.as_ref();
                tokio::spawn(run(Arc::clone(&self), capture));
            }
        }
    }
}

/// On interrupt: log, send the framed disconnect notice, exit. In-flight
/// reactions and pollers are abandoned at process exit.
pub fn spawn_signal_handler(bot: Arc<Bot>) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            return;
        }
        tracing::info!("Interrupt received, exiting normally");
        bot.send(&Command::Quit).await;
        std::process::exit(0);
    });
}

/// Forward poller announcements to the destination channel. Pollers stay
/// decoupled from the engine: they only ever see the sending half of this
/// channel.
pub fn spawn_announcer(bot: Arc<Bot>, mut rx: mpsc::UnboundedReceiver<String>) {
    tokio::spawn(async move {
        while let Some(text) = rx.recv().await {
            bot.msg_channel(&text).await;
        }
    });
}
