use std::fmt;

#[derive(Debug)]
pub enum SensorError {
    Device(String),
    Stream(String),
    Channel(String),
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorError::Device(msg) => write!(f, "device error: {msg}"),
            SensorError::Stream(msg) => write!(f, "stream error: {msg}"),
            SensorError::Channel(msg) => write!(f, "channel error: {msg}"),
        }
    }
}

impl std::error::Error for SensorError {}

impl From<std::io::Error> for SensorError {
    fn from(err: std::io::Error) -> Self {
        SensorError::Device(err.to_string())
    }
}
