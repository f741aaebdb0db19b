use std::sync::Arc;

use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use tattle_bot::config::BotConfig;
use tattle_bot::connection::Connection;
use tattle_bot::engine::{self, Bot};
use tattle_feed::{FeedPoller, FeedPollerConfig};
use tattle_github::{PullPoller, PullPollerConfig};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = BotConfig::load();
    config.validate();

    let conn = match Connection::open(&config.server, config.port).await {
        Ok(conn) => conn,
        Err(e) => {
            tracing::error!(error = %e, "Cannot reach the server");
            std::process::exit(1);
        },
    };

    let bot = Bot::new(conn, &config);
    bot.handshake().await;
    engine::spawn_signal_handler(Arc::clone(&bot));

    let (tx, rx) = mpsc::unbounded_channel();
    if let Some(github) = &config.github {
        let poller = PullPoller::new(PullPollerConfig {
            repo: github.repo.clone(),
            poll_interval_secs: github.poll_interval_secs,
            token: github.token.clone(),
            ..PullPollerConfig::default()
        });
        tokio::spawn(poller.run(tx.clone()));
    }
    if let Some(feed) = &config.feed {
        let poller = FeedPoller::new(FeedPollerConfig {
            url: feed.url.clone(),
            poll_interval_secs: feed.poll_interval_secs,
        });
        tokio::spawn(poller.run(tx.clone()));
    }
    engine::spawn_announcer(Arc::clone(&bot), rx);
    drop(tx);

    if let Err(e) = bot.run().await {
        tracing::error!(error = %e, "Connection lost");
        std::process::exit(1);
    }
}
