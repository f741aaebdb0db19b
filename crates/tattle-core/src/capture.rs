/// Structured value produced by a matcher and handed to its reaction.
///
/// A closed set of variants rather than an opaque payload: each reaction
/// pattern-matches on the variant it expects and ignores anything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capture {
    /// Ticket identifiers referenced in a line (`#123`), digits only.
    Tickets(Vec<String>),
    /// The token to echo back in a PONG.
    Ping(String),
    /// A CTCP ACTION aimed at the bot, with the sender it came from.
    MeAction { user: String, action: String },
}
