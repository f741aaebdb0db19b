use std::collections::HashMap;

use serde::Deserialize;
use tokio::sync::mpsc;

use crate::config::PullPollerConfig;

/// One pull request as last observed, keyed by number in the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PullRequest {
    pub html_url: String,
    pub number: u64,
    pub state: String,
    pub title: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Pull-request polling announcer.
///
/// Each cycle fetches the repo's open and closed pull requests, diffs them
/// against the previous snapshot, and sends one message pair (text, then
/// URL) per detected change through `tx`. The very first successful cycle
/// only seeds the snapshot so a restart never floods the channel.
pub struct PullPoller {
    config: PullPollerConfig,
    client: reqwest::Client,
    snapshot: Option<HashMap<u64, PullRequest>>,
}

impl PullPoller {
    pub fn new(config: PullPollerConfig) -> Self {
        let client = reqwest::Client::builder()
            .user_agent("tattle-github-poller/0.1")
            .build()
            .expect("Failed to create HTTP client");
        Self {
            config,
            client,
            snapshot: None,
        }
    }

    /// Run the poll loop forever, announcing changes through `tx`.
    pub async fn run(mut self, tx: mpsc::UnboundedSender<String>) {
        let interval = std::time::Duration::from_secs(self.config.poll_interval_secs);
        loop {
            if let Err(e) = self.poll_once(&tx).await {
                tracing::warn!(repo = self.config.repo, error = %e, "Pull request poll failed");
            }
            tokio::time::sleep(interval).await;
        }
    }

    /// One poll cycle. On any fetch or parse error the snapshot is left
    /// untouched and nothing is announced; the next cycle retries.
    pub async fn poll_once(&mut self, tx: &mpsc::UnboundedSender<String>) -> Result<(), String> {
        let current = self.fetch_all().await?;
        match &self.snapshot {
            None => {
                tracing::info!(
                    repo = self.config.repo,
                    count = current.len(),
                    "Seeded pull request snapshot"
                );
            },
            Some(previous) => {
                for line in diff_pulls(previous, &current) {
                    let _ = tx.send(line);
                }
            },
        }
        self.snapshot = Some(current);
        Ok(())
    }

    /// Fetch open and closed pull requests and merge them into one map.
    async fn fetch_all(&self) -> Result<HashMap<u64, PullRequest>, String> {
        let mut merged = HashMap::new();
        for state in ["open", "closed"] {
            let url = format!(
                "{}/repos/{}/pulls?state={state}",
                self.config.api_root, self.config.repo
            );
            let mut request = self
                .client
                .get(&url)
                .header("Accept", "application/vnd.github+json");
            if let Some(token) = &self.config.token {
                request = request.header("Authorization", format!("Bearer {token}"));
            }
            let resp = request.send().await.map_err(|e| e.to_string())?;
            if !resp.status().is_success() {
                return Err(format!("GitHub API returned {}", resp.status()));
            }
            let pulls: Vec<PullRequest> = resp.json().await.map_err(|e| e.to_string())?;
            for pr in pulls {
                merged.insert(pr.number, pr);
            }
        }
        Ok(merged)
    }
}

/// Diff two snapshots into announcement lines, ascending by number.
///
/// A number absent from the previous snapshot is new; a present number with
/// a changed state is a transition; a present number with only a changed
/// update-timestamp is an update. Anything else is silent.
pub fn diff_pulls(
    previous: &HashMap<u64, PullRequest>,
    current: &HashMap<u64, PullRequest>,
) -> Vec<String> {
    let mut numbers: Vec<u64> = current.keys().copied().collect();
    numbers.sort_unstable();

    let mut lines = Vec::new();
    for number in numbers {
        let pr = &current[&number];
        match previous.get(&number) {
            None => {
                lines.push(format!("New pull request #{number}: {}", pr.title));
                lines.push(pr.html_url.clone());
            },
            Some(old) if old.state != pr.state => {
                lines.push(format!("Pull request \"{}\" is now {}.", pr.title, pr.state));
                lines.push(pr.html_url.clone());
            },
            Some(old) if old.updated_at != pr.updated_at => {
                lines.push(format!("Pull request \"{}\" has been updated.", pr.title));
                lines.push(pr.html_url.clone());
            },
            Some(_) => {},
        }
    }
    lines
}
