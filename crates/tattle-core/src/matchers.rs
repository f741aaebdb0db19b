//! Pure line matchers.
//!
//! Each matcher takes the action's compiled regex plus one inbound line and
//! returns a [`Capture`] on a hit. Matchers never perform I/O and retain
//! nothing across calls; patterns are compiled once at registration.

use std::sync::LazyLock;

use regex::Regex;

use crate::capture::Capture;

/// `#<digits>`, with an optional trailing letter captured so references like
/// `#123abc` can be rejected.
pub const TICKET_PATTERN: &str = r"#(\d+)([A-Za-z]?)";

/// Heartbeat prefix, case-sensitive.
pub const PING_PATTERN: &str = "^PING";

/// CTCP ACTION aimed at the bot: `\x01ACTION <verb> <nick>\x01`.
/// Built per-bot because it embeds the configured nick.
pub fn me_action_pattern(nick: &str) -> String {
    format!("\x01ACTION (\\w+) {}\x01", regex::escape(nick))
}

static SENDER_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^:([^!]+)!").expect("sender prefix regex is valid"));

/// Extract every well-formed ticket reference from a line.
///
/// A reference immediately followed by an alphabetic character is not a
/// ticket (`#123abc` is prose, not a reference). A line with no well-formed
/// references is no match.
pub fn parse_tickets(re: &Regex, line: &str) -> Option<Capture> {
    let mut numbers = Vec::new();
    for caps in re.captures_iter(line) {
        if caps.get(2).is_some_and(|m| !m.as_str().is_empty()) {
            continue;
        }
        numbers.push(caps[1].to_string());
    }
    if numbers.is_empty() {
        None
    } else {
        Some(Capture::Tickets(numbers))
    }
}

/// Capture the first whitespace-delimited token after `PING`.
/// A bare `PING` with nothing to echo is treated as no match.
pub fn parse_ping(re: &Regex, line: &str) -> Option<Capture> {
    if !re.is_match(line) {
        return None;
    }
    let token = line.split_whitespace().nth(1)?;
    Some(Capture::Ping(token.to_string()))
}

/// Capture the verb of a `/me <verb> <nick>` aimed at the bot, along with
/// the sender parsed from the `:<sender>!` prefix. A line without a
/// parseable sender is no match.
pub fn parse_me_action(re: &Regex, line: &str) -> Option<Capture> {
    let caps = re.captures(line)?;
    let user = SENDER_PREFIX.captures(line)?[1].to_string();
    Some(Capture::MeAction {
        user,
        action: caps[1].to_string(),
    })
}
