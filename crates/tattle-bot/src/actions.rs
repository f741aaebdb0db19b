use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use regex::Regex;

use tattle_core::{Capture, Command, matchers};

use crate::engine::Bot;

/// The side-effecting half of an action, run as a detached task per match.
pub type Reaction = Arc<dyn Fn(Arc<Bot>, Capture) -> BoxFuture<'static, ()> + Send + Sync>;

/// One registered pattern-triggered behavior. The regex is compiled once at
/// registration, not per line.
pub struct Action {
    pub name: &'static str,
    pub re: Regex,
    pub parse: fn(&Regex, &str) -> Option<Capture>,
    pub run: Reaction,
}

impl Action {
    pub fn new(
        name: &'static str,
        pattern: &str,
        parse: fn(&Regex, &str) -> Option<Capture>,
        run: Reaction,
    ) -> Self {
        Self {
            name,
            re: Regex::new(pattern).expect("action pattern is valid"),
            parse,
            run,
        }
    }
}

/// Box an async reaction function into the stored form.
pub fn reaction<F, Fut>(f: F) -> Reaction
where
    F: Fn(Arc<Bot>, Capture) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    Arc::new(move |bot, capture| f(bot, capture).boxed())
}

/// The default registry, in evaluation order. Ticket lookups are only
/// registered when a tracker URL is configured.
pub fn default_actions(nick: &str, with_tickets: bool) -> Vec<Action> {
    let mut registry = Vec::new();
    if with_tickets {
        registry.push(Action::new(
            "tickets",
            matchers::TICKET_PATTERN,
            matchers::parse_tickets,
            reaction(fetch_tickets),
        ));
    }
    registry.push(Action::new(
        "ping",
        matchers::PING_PATTERN,
        matchers::parse_ping,
        reaction(send_pong),
    ));
    registry.push(Action::new(
        "me-action",
        &matchers::me_action_pattern(nick),
        matchers::parse_me_action,
        reaction(respond_to_action),
    ));
    registry
}

/// Answer a heartbeat by echoing the token back.
async fn send_pong(bot: Arc<Bot>, capture: Capture) {
    let Capture::Ping(token) = capture else {
        return;
    };
    tracing::info!(token, "Ping received");
    bot.send(&Command::Pong(token)).await;
}

/// Resolve each referenced ticket to its detail page and announce it.
///
/// The cooldown gate keeps a ticket that is mentioned repeatedly from being
/// looked up more than once per window; error pages produce no output.
async fn fetch_tickets(bot: Arc<Bot>, capture: Capture) {
    let Capture::Tickets(numbers) = capture else {
        return;
    };
    let Some(base) = bot.trac_url() else {
        return;
    };
    for number in numbers {
        if !bot.cooldown().try_gate(&number) {
            continue;
        }
        let url = format!("{base}ticket/{number}");
        match lookup_ticket(bot.http(), &url).await {
            Ok(Some(summary)) => {
                bot.msg_channel(&summary).await;
                bot.msg_channel(&url).await;
            },
            Ok(None) => {
                tracing::debug!(ticket = number, "No such ticket");
            },
            Err(e) => {
                tracing::warn!(ticket = number, error = e, "Ticket lookup failed");
            },
        }
    }
}

async fn lookup_ticket(client: &reqwest::Client, url: &str) -> Result<Option<String>, String> {
    let resp = client.get(url).send().await.map_err(|e| e.to_string())?;
    let body = resp.text().await.map_err(|e| e.to_string())?;
    Ok(extract_summary(&body))
}

/// Pull the one-line summary out of a ticket page.
///
/// Trac renders the ticket title on a fixed row near the top of the markup;
/// an error page, or anything too short to carry that row, yields nothing.
fn extract_summary(body: &str) -> Option<String> {
    if body.contains("<h1>Error:") {
        return None;
    }
    let head: String = body.chars().take(300).collect();
    let title = head.lines().nth(8)?.trim();
    if title.is_empty() {
        None
    } else {
        Some(title.to_string())
    }
}

/// Mirror a `/me <verb> tattle` back at whoever sent it.
async fn respond_to_action(bot: Arc<Bot>, capture: Capture) {
    let Capture::MeAction { user, action } = capture else {
        return;
    };
    bot.msg_channel(&format!("\x01ACTION {action} {user}\x01"))
        .await;
}
