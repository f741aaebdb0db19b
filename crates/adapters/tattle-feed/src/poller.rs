use tokio::sync::mpsc;

use crate::rss::{self, FeedItem};

/// Configuration for the feed poller.
#[derive(Debug, Clone)]
pub struct FeedPollerConfig {
    /// RSS feed URL.
    pub url: String,
    /// Polling interval in seconds.
    pub poll_interval_secs: u64,
}

impl Default for FeedPollerConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            poll_interval_secs: 60,
        }
    }
}

/// RSS polling announcer.
///
/// Each cycle fetches the feed and announces every entry published since the
/// previously-seen one, newest first, as one message pair (title by author,
/// then the link). The first cycle only records the newest entry.
pub struct FeedPoller {
    config: FeedPollerConfig,
    client: reqwest::Client,
    last_item: Option<FeedItem>,
}

impl FeedPoller {
    pub fn new(config: FeedPollerConfig) -> Self {
        let client = reqwest::Client::builder()
            .user_agent("tattle-feed-poller/0.1")
            .build()
            .expect("Failed to create HTTP client");
        Self {
            config,
            client,
            last_item: None,
        }
    }

    /// Run the poll loop forever, announcing new entries through `tx`.
    pub async fn run(mut self, tx: mpsc::UnboundedSender<String>) {
        let interval = std::time::Duration::from_secs(self.config.poll_interval_secs);
        loop {
            if let Err(e) = self.poll_once(&tx).await {
                tracing::warn!(feed = self.config.url, error = %e, "Feed poll failed");
            }
            tokio::time::sleep(interval).await;
        }
    }

    /// One poll cycle. Fetch or parse failures leave the snapshot untouched
    /// and announce nothing; an empty feed is a no-op, not an error.
    pub async fn poll_once(&mut self, tx: &mpsc::UnboundedSender<String>) -> Result<(), String> {
        let resp = self
            .client
            .get(&self.config.url)
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !resp.status().is_success() {
            return Err(format!("feed returned {}", resp.status()));
        }
        let body = resp.text().await.map_err(|e| e.to_string())?;
        let items = rss::parse_feed(&body)?;

        let Some(newest) = items.first() else {
            tracing::debug!(feed = self.config.url, "Feed has no entries");
            return Ok(());
        };

        let fresh = rss::entries_since(&items, self.last_item.as_ref());
        if self.last_item.is_none() {
            tracing::info!(feed = self.config.url, newest = newest.title, "Seeded feed snapshot");
        }
        for item in fresh {
            let _ = tx.send(format!("{} by {}", item.title, item.author));
            let _ = tx.send(item.link.clone());
        }

        self.last_item = Some(newest.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_xml(titles: &[&str]) -> String {
        let mut body = String::from("<rss><channel>");
        for title in titles {
            body.push_str(&format!(
                "<item><title>{title}</title><creator>alice</creator>\
                 <link>https://example.org/{title}</link></item>"
            ));
        }
        body.push_str("</channel></rss>");
        body
    }

    async fn mock_feed(server: &mut mockito::ServerGuard, titles: &[&str]) -> mockito::Mock {
        server
            .mock("GET", "/feed")
            .with_status(200)
            .with_header("content-type", "application/rss+xml")
            .with_body(feed_xml(titles))
            .create_async()
            .await
    }

    fn test_poller(api_root: &str) -> FeedPoller {
        FeedPoller::new(FeedPollerConfig {
            url: format!("{api_root}/feed"),
            ..FeedPollerConfig::default()
        })
    }

    #[tokio::test]
    async fn first_cycle_records_newest_and_stays_silent() {
        let mut server = mockito::Server::new_async().await;
        let mock = mock_feed(&mut server, &["A", "B", "C"]).await;

        let mut poller = test_poller(&server.url());
        let (tx, mut rx) = mpsc::unbounded_channel();
        poller.poll_once(&tx).await.unwrap();

        mock.assert_async().await;
        assert!(rx.try_recv().is_err());
        assert_eq!(poller.last_item.as_ref().unwrap().title, "A");
    }

    #[tokio::test]
    async fn second_cycle_announces_up_to_previous_entry() {
        let mut server = mockito::Server::new_async().await;
        let first = mock_feed(&mut server, &["A", "B", "C"]).await;

        let mut poller = test_poller(&server.url());
        let (tx, mut rx) = mpsc::unbounded_channel();
        poller.poll_once(&tx).await.unwrap();
        first.remove_async().await;

        mock_feed(&mut server, &["D", "A", "B"]).await;
        poller.poll_once(&tx).await.unwrap();

        assert_eq!(rx.recv().await.unwrap(), "D by alice");
        assert_eq!(rx.recv().await.unwrap(), "https://example.org/D");
        assert!(rx.try_recv().is_err());
        assert_eq!(poller.last_item.as_ref().unwrap().title, "D");
    }

    #[tokio::test]
    async fn empty_feed_is_a_noop() {
        let mut server = mockito::Server::new_async().await;
        let first = mock_feed(&mut server, &["A"]).await;

        let mut poller = test_poller(&server.url());
        let (tx, mut rx) = mpsc::unbounded_channel();
        poller.poll_once(&tx).await.unwrap();
        first.remove_async().await;

        mock_feed(&mut server, &[]).await;
        poller.poll_once(&tx).await.unwrap();

        assert!(rx.try_recv().is_err());
        // Snapshot untouched: entry A is still the last seen.
        assert_eq!(poller.last_item.as_ref().unwrap().title, "A");
    }

    #[tokio::test]
    async fn fetch_failure_leaves_snapshot_untouched() {
        let mut server = mockito::Server::new_async().await;
        let _err = server
            .mock("GET", "/feed")
            .with_status(500)
            .create_async()
            .await;

        let mut poller = test_poller(&server.url());
        let (tx, mut rx) = mpsc::unbounded_channel();
        assert!(poller.poll_once(&tx).await.is_err());
        assert!(poller.last_item.is_none());
        assert!(rx.try_recv().is_err());
    }
}
