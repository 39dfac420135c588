use crate::{ComError, framing};
use std::net::SocketAddr;
use tokio::io::BufReader;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, ToSocketAddrs};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Pending requests shared across all clients.
const REQUEST_BUFFER: usize = 64;
/// Responses queued per client before further ones are dropped.
const REPLY_BUFFER: usize = 8;

/// One inbound command line plus the handle to answer its sender.
#[derive(Debug)]
pub struct CommandRequest {
    text: String,
    reply: mpsc::Sender<String>,
}

impl CommandRequest {
    /// Build a request. Servers do this internally; tests can pair a request
    /// with a channel of their own to observe responses.
    pub fn new(text: String, reply: mpsc::Sender<String>) -> Self {
        Self { text, reply }
    }

    /// The raw command text, terminator stripped.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Queue one response line for the requesting client.
    ///
    /// Non-blocking: a client that has stopped draining its socket loses the
    /// response rather than stalling the caller.
    pub fn respond(&self, line: &str) {
        if self.reply.try_send(line.to_string()).is_err() {
            log::warn!("Response dropped, client reply queue unavailable");
        }
    }
}

/// Request/response server for line-oriented text commands.
///
/// Each client connection gets a reader task that forwards complete lines
/// into a shared queue, and a writer task that drains that client's
/// responses back onto the socket. The consumer side is pull-based:
/// `try_recv` hands out queued requests without ever waiting.
pub struct CommandServer {
    rx: mpsc::Receiver<CommandRequest>,
    local_addr: SocketAddr,
    _accept_task: JoinHandle<()>,
}

impl CommandServer {
    /// Bind a TCP listener and start accepting client connections.
    pub async fn bind(addr: impl ToSocketAddrs) -> Result<Self, ComError> {
        let listener = TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;

        let (req_tx, rx) = mpsc::channel(REQUEST_BUFFER);

        let accept_task = tokio::spawn(async move {
            loop {
                match listener.accept().await {
                    Ok((stream, addr)) => {
                        let (read_half, write_half) = stream.into_split();
                        let (reply_tx, reply_rx) = mpsc::channel(REPLY_BUFFER);

                        tokio::spawn(write_replies(write_half, reply_rx));
                        tokio::spawn(read_requests(read_half, addr, req_tx.clone(), reply_tx));
                    }
                    Err(e) => {
                        log::warn!("Accept error: {}", e);
                        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
                    }
                }
            }
        });

        Ok(Self {
            rx,
            local_addr,
            _accept_task: accept_task,
        })
    }

    /// Take the next queued request, if any. Never waits.
    pub fn try_recv(&mut self) -> Option<CommandRequest> {
        self.rx.try_recv().ok()
    }

    /// Wait for the next request.
    pub async fn recv(&mut self) -> Result<CommandRequest, ComError> {
        self.rx.recv().await.ok_or(ComError::ConnectionClosed)
    }

    /// Return the local address the server is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }
}

impl Drop for CommandServer {
    fn drop(&mut self) {
        self._accept_task.abort();
    }
}

/// Per-client writer task: drain queued responses onto the socket.
async fn write_replies(mut writer: OwnedWriteHalf, mut reply_rx: mpsc::Receiver<String>) {
    while let Some(line) = reply_rx.recv().await {
        if framing::write_line(&mut writer, &line).await.is_err() {
            break;
        }
    }
}

/// Per-client reader task: forward complete lines into the shared queue.
async fn read_requests(
    read_half: OwnedReadHalf,
    addr: SocketAddr,
    req_tx: mpsc::Sender<CommandRequest>,
    reply_tx: mpsc::Sender<String>,
) {
    let mut reader = BufReader::new(read_half);

    loop {
        let text = match framing::read_line(&mut reader, framing::MAX_LINE).await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            // Oversized input is forwarded with empty text so the protocol
            // layer classifies it as malformed; the stream itself is intact.
            Err(ComError::MessageTooLarge(max)) => {
                log::warn!("Client {} sent a command over {} bytes", addr, max);
                String::new()
            }
            Err(e) => {
                log::warn!("Client {} disconnected: {}", addr, e);
                break;
            }
        };

        let request = CommandRequest::new(text, reply_tx.clone());
        if req_tx.send(request).await.is_err() {
            break; // Server dropped
        }
    }
}
