use crate::DeltaError;
use std::fmt;
use vigil_com::ComError;
use vigil_sensor::SensorError;

#[derive(Debug)]
pub enum WatchError {
    Sensor(SensorError),
    Com(ComError),
    Delta(DeltaError),
    Record(std::io::Error),
}

impl fmt::Display for WatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WatchError::Sensor(err) => write!(f, "sensor error: {err}"),
            WatchError::Com(err) => write!(f, "transport error: {err}"),
            WatchError::Delta(err) => write!(f, "difference engine error: {err}"),
            WatchError::Record(err) => write!(f, "recording error: {err}"),
        }
    }
}

impl std::error::Error for WatchError {}

impl From<SensorError> for WatchError {
    fn from(err: SensorError) -> Self {
        WatchError::Sensor(err)
    }
}

impl From<ComError> for WatchError {
    fn from(err: ComError) -> Self {
        WatchError::Com(err)
    }
}

impl From<DeltaError> for WatchError {
    fn from(err: DeltaError) -> Self {
        WatchError::Delta(err)
    }
}
