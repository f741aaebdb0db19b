use std::fmt;

/// Outbound IRC commands the bot emits.
///
/// Rendering via `Display` produces the exact wire form without the trailing
/// newline; the connection layer appends it when framing the write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Identify at handshake: `USER <nick> 8 * :<nick>`.
    Register { nick: String },
    /// Set the visible name: `NICK <nick>`.
    Nick(String),
    /// Join the destination channel: `JOIN <channel>`.
    Join(String),
    /// Message a channel or a user: `PRIVMSG <target> :<text>`.
    Privmsg { target: String, text: String },
    /// Heartbeat reply: `PONG <token>`.
    Pong(String),
    /// Orderly disconnect: `QUIT :`.
    Quit,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Register { nick } => write!(f, "USER {nick} 8 * :{nick}"),
            Self::Nick(nick) => write!(f, "NICK {nick}"),
            Self::Join(channel) => write!(f, "JOIN {channel}"),
            Self::Privmsg { target, text } => write!(f, "PRIVMSG {target} :{text}"),
            Self::Pong(token) => write!(f, "PONG {token}"),
            Self::Quit => write!(f, "QUIT :"),
        }
    }
}
