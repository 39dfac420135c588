use std::fmt;

#[derive(Debug)]
pub enum SnapshotError {
    Encode(String),
    Geometry { expected: usize, got: usize },
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotError::Encode(msg) => write!(f, "encode error: {msg}"),
            SnapshotError::Geometry { expected, got } => {
                write!(f, "geometry mismatch: expected {expected} bytes, got {got}")
            }
        }
    }
}

impl std::error::Error for SnapshotError {}

impl From<image::ImageError> for SnapshotError {
    fn from(err: image::ImageError) -> Self {
        SnapshotError::Encode(err.to_string())
    }
}
