use std::fmt;

#[derive(Debug)]
pub enum ComError {
    Io(std::io::Error),
    ConnectionClosed,
    MessageTooLarge(usize),
    InvalidUtf8,
}

impl fmt::Display for ComError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComError::Io(err) => write!(f, "io error: {err}"),
            ComError::ConnectionClosed => write!(f, "connection closed"),
            ComError::MessageTooLarge(max) => write!(f, "message exceeds {max} bytes"),
            ComError::InvalidUtf8 => write!(f, "invalid UTF-8 in message"),
        }
    }
}

impl std::error::Error for ComError {}

impl From<std::io::Error> for ComError {
    fn from(err: std::io::Error) -> Self {
        ComError::Io(err)
    }
}
