use std::io;

use tokio::io::{
    AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, ReadHalf, WriteHalf,
};
use tokio::net::TcpStream;
use tokio::sync::Mutex;

use crate::error::BotError;

/// Any duplex byte stream the connection can own. Production uses TCP;
/// tests hand in a `tokio::io::duplex` pipe.
pub trait Stream: AsyncRead + AsyncWrite + Send {}
impl<T: AsyncRead + AsyncWrite + Send> Stream for T {}

type BoxedStream = Box<dyn Stream + Unpin>;

/// The duplex connection to the server, exposing line-framed read and write
/// primitives.
///
/// The write half sits behind an async mutex and every message goes out as a
/// single `write_all`, so concurrent senders interleave whole lines, never
/// fragments of them.
pub struct Connection {
    reader: Mutex<BufReader<ReadHalf<BoxedStream>>>,
    writer: Mutex<WriteHalf<BoxedStream>>,
}

impl Connection {
    /// Dial the server. Failure here is fatal to the caller; the engine
    /// cannot run without a connection.
    pub async fn open(host: &str, port: u16) -> Result<Self, BotError> {
        let addr = format!("{host}:{port}");
        let stream = TcpStream::connect(&addr).await.map_err(|source| {
            BotError::Connect {
                addr: addr.clone(),
                source,
            }
        })?;
        tracing::info!(addr, "Connected");
        Ok(Self::from_stream(stream))
    }

    /// Wrap an already-established stream.
    pub fn from_stream(stream: impl AsyncRead + AsyncWrite + Send + Unpin + 'static) -> Self {
        let boxed: BoxedStream = Box::new(stream);
        let (read_half, write_half) = tokio::io::split(boxed);
        Self {
            reader: Mutex::new(BufReader::new(read_half)),
            writer: Mutex::new(write_half),
        }
    }

    /// Write one newline-terminated message. Write failures are logged and
    /// swallowed; callers get no failure signal and there is no retry.
    pub async fn send_line(&self, line: &str) {
        let mut framed = String::with_capacity(line.len() + 1);
        framed.push_str(line);
        framed.push('\n');
        let mut writer = self.writer.lock().await;
        match writer.write_all(framed.as_bytes()).await {
            Ok(()) => tracing::debug!(line, "Sent"),
            Err(e) => tracing::warn!(line, error = %e, "Send failed"),
        }
    }

    /// Await the next line, stripped of its terminator. `Ok(None)` is EOF.
    pub async fn read_line(&self) -> io::Result<Option<String>> {
        let mut reader = self.reader.lock().await;
        let mut line = String::new();
        let n = reader.read_line(&mut line).await?;
        if n == 0 {
            return Ok(None);
        }
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        Ok(Some(line))
    }
}
