use crate::{ComError, framing};
use tokio::io::BufReader;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpStream, ToSocketAddrs};

/// Line-oriented client for either server.
///
/// Against an `EventServer` only `recv` is useful; against a
/// `CommandServer` the usual pattern is one `send` followed by one `recv`.
pub struct LineClient {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl LineClient {
    /// Connect to a server and return a LineClient.
    pub async fn connect(addr: impl ToSocketAddrs) -> Result<Self, ComError> {
        let stream = TcpStream::connect(addr).await?;
        let (read_half, write_half) = stream.into_split();

        Ok(Self {
            reader: BufReader::new(read_half),
            writer: write_half,
        })
    }

    /// Send one line to the server.
    pub async fn send(&mut self, line: &str) -> Result<(), ComError> {
        framing::write_line(&mut self.writer, line).await
    }

    /// Receive the next line from the server.
    ///
    /// Returns `ComError::ConnectionClosed` if the server closes the
    /// connection.
    pub async fn recv(&mut self) -> Result<String, ComError> {
        framing::read_line(&mut self.reader, framing::MAX_LINE)
            .await?
            .ok_or(ComError::ConnectionClosed)
    }
}
