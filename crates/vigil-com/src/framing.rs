use crate::ComError;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Maximum accepted line length in bytes, terminator excluded.
pub const MAX_LINE: usize = 1024;

/// Read one newline-terminated line.
///
/// Returns `Ok(None)` on a clean end of stream before any byte arrives; an
/// end of stream mid-line terminates that line. A line longer than `max` is
/// drained through its terminator and reported as `MessageTooLarge`, so the
/// connection stays line-aligned and the buffer never grows past the bound.
/// A trailing `\r` from a CRLF terminator is stripped.
///
/// Reads a byte at a time; callers should hand in a `BufReader`.
pub async fn read_line<R>(reader: &mut R, max: usize) -> Result<Option<String>, ComError>
where
    R: AsyncRead + Unpin,
{
    let mut buf: Vec<u8> = Vec::new();
    let mut byte = [0u8; 1];

    loop {
        let n = reader.read(&mut byte).await?;
        if n == 0 {
            if buf.is_empty() {
                return Ok(None);
            }
            break;
        }
        if byte[0] == b'\n' {
            break;
        }
        if buf.len() == max {
            drain_to_newline(reader).await?;
            return Err(ComError::MessageTooLarge(max));
        }
        buf.push(byte[0]);
    }

    if buf.last() == Some(&b'\r') {
        buf.pop();
    }

    match String::from_utf8(buf) {
        Ok(line) => Ok(Some(line)),
        Err(_) => Err(ComError::InvalidUtf8),
    }
}

/// Discard bytes until the next newline or end of stream.
async fn drain_to_newline<R>(reader: &mut R) -> Result<(), ComError>
where
    R: AsyncRead + Unpin,
{
    let mut byte = [0u8; 1];
    loop {
        let n = reader.read(&mut byte).await?;
        if n == 0 || byte[0] == b'\n' {
            return Ok(());
        }
    }
}

/// Write one line followed by its terminator.
pub async fn write_line<W>(writer: &mut W, line: &str) -> Result<(), ComError>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(line.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    Ok(())
}
