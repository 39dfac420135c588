use crate::{ComError, framing};
use std::net::SocketAddr;
use tokio::net::{TcpListener, ToSocketAddrs};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

/// Capacity of the fan-out channel. A subscriber that falls further behind
/// than this skips ahead and loses the missed events.
const EVENT_BUFFER: usize = 64;

/// Publish-only broadcast server for line-oriented text events.
///
/// Subscribers connect over TCP and receive every line published while they
/// are connected. Delivery is best-effort: `publish` never blocks, events
/// sent with no subscriber present are dropped, and a subscriber too slow to
/// drain its buffer skips the backlog instead of exerting back-pressure.
pub struct EventServer {
    tx: broadcast::Sender<String>,
    local_addr: SocketAddr,
    _accept_task: JoinHandle<()>,
}

impl EventServer {
    /// Bind a TCP listener and start accepting subscriber connections.
    pub async fn bind(addr: impl ToSocketAddrs) -> Result<Self, ComError> {
        let listener = TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;

        let (tx, _) = broadcast::channel(EVENT_BUFFER);
        let tx_clone = tx.clone();

        // Spawn accept loop; each subscriber gets a forwarding task
        let accept_task = tokio::spawn(async move {
            loop {
                match listener.accept().await {
                    Ok((stream, addr)) => {
                        let rx = tx_clone.subscribe();
                        tokio::spawn(forward_events(stream, addr, rx));
                    }
                    Err(e) => {
                        log::warn!("Accept error: {}", e);
                        // Backoff to prevent CPU spin on persistent errors
                        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
                    }
                }
            }
        });

        Ok(Self {
            tx,
            local_addr,
            _accept_task: accept_task,
        })
    }

    /// Queue one event line for every connected subscriber.
    ///
    /// Fire-and-forget: returns immediately whether or not anyone is
    /// listening, and never retries.
    pub fn publish(&self, line: &str) {
        let _ = self.tx.send(line.to_string());
    }

    /// Return an in-process subscription to the event stream.
    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.tx.subscribe()
    }

    /// Number of attached subscriptions, TCP and in-process.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Return the local address the server is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }
}

impl Drop for EventServer {
    fn drop(&mut self) {
        self._accept_task.abort();
    }
}

/// Per-subscriber task: drain the broadcast channel onto the socket.
async fn forward_events(
    stream: tokio::net::TcpStream,
    addr: SocketAddr,
    mut rx: broadcast::Receiver<String>,
) {
    let (_, mut writer) = stream.into_split();

    loop {
        match rx.recv().await {
            Ok(line) => {
                if let Err(e) = framing::write_line(&mut writer, &line).await {
                    log::warn!("Subscriber {} disconnected: {}", addr, e);
                    break;
                }
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                log::warn!("Subscriber {} lagged, {} events dropped", addr, skipped);
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
