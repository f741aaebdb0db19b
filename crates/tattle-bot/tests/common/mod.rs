use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

/// Minimal scripted IRC server: accepts one connection, collects every line
/// the bot sends, and writes whatever the test pushes through `outbound`.
pub struct MockIrcServer {
    pub addr: SocketAddr,
    received: mpsc::UnboundedReceiver<String>,
    pub outbound: mpsc::UnboundedSender<String>,
}

impl MockIrcServer {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock server");
        let addr = listener.local_addr().expect("local addr");

        let (recv_tx, received) = mpsc::unbounded_channel();
        let (outbound, mut out_rx) = mpsc::unbounded_channel::<String>();

        tokio::spawn(async move {
            let Ok((stream, _)) = listener.accept().await else {
                return;
            };
            let (read_half, mut write_half) = stream.into_split();
            let mut lines = BufReader::new(read_half).lines();
            loop {
                tokio::select! {
                    line = lines.next_line() => match line {
                        Ok(Some(line)) => {
                            let _ = recv_tx.send(line);
                        },
                        _ => break,
                    },
                    msg = out_rx.recv() => match msg {
                        Some(msg) => {
                            let framed = format!("{msg}\n");
                            if write_half.write_all(framed.as_bytes()).await.is_err() {
                                break;
                            }
                        },
                        None => break,
                    },
                }
            }
        });

        Self {
            addr,
            received,
            outbound,
        }
    }

    /// Next line the bot sent, or panic after a generous timeout.
    pub async fn expect_line(&mut self) -> String {
        tokio::time::timeout(Duration::from_secs(5), self.received.recv())
            .await
            .expect("timed out waiting for a line from the bot")
            .expect("connection closed before a line arrived")
    }

    /// Assert that the bot stays silent for `window`.
    pub async fn expect_silence(&mut self, window: Duration) {
        if let Ok(Some(line)) = tokio::time::timeout(window, self.received.recv()).await {
            panic!("expected silence, bot sent: {line}");
        }
    }
}
