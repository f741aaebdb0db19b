use std::io;

/// Transport-level failures. All of these are fatal to the engine: without a
/// live connection there is nothing left to dispatch.
#[derive(Debug)]
pub enum BotError {
    Connect { addr: String, source: io::Error },
    Read(io::Error),
    Disconnected,
}

impl std::fmt::Display for BotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connect { addr, source } => {
                write!(f, "unable to connect to {addr}: {source}")
            },
            Self::Read(e) => write!(f, "read error: {e}"),
            Self::Disconnected => write!(f, "server closed the connection"),
        }
    }
}

impl std::error::Error for BotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Connect { source, .. } => Some(source),
            Self::Read(e) => Some(e),
            Self::Disconnected => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_address() {
        let err = BotError::Connect {
            addr: "irc.example.org:6667".to_string(),
            source: io::Error::new(io::ErrorKind::ConnectionRefused, "refused"),
        };
        let msg = err.to_string();
        assert!(msg.contains("irc.example.org:6667"));
        assert!(msg.contains("refused"));
    }

    #[test]
    fn disconnected_has_no_source() {
        use std::error::Error;
        assert!(BotError::Disconnected.source().is_none());
    }
}
