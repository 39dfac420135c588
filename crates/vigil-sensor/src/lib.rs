//! Sensor abstraction for the vigil daemon.
//!
//! This crate defines the narrow contract the control loop depends on: a
//! `Sensor` delivers owned `Frame`s one at a time and can have its stream
//! stopped, retargeted to a different `VideoMode`, and restarted. Hardware
//! backends plug in behind the same trait; `SimSensor` is the synthetic
//! backend used for development and tests.

pub mod config;
pub mod error;
pub mod frame;
pub mod sim;
pub mod traits;

pub use config::SensorConfig;
pub use error::SensorError;
pub use frame::{Frame, VideoMode};
pub use sim::SimSensor;
pub use traits::Sensor;
