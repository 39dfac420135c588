//! The vigil daemon core: frame analysis and the control loop.
//!
//! One task pulls frames from a `Sensor`, diffs each against the previous
//! frame, publishes brightness/movement events to TCP subscribers, drains
//! queued text commands, and applies deferred video-mode switches. All
//! sensing state is owned by that task; the transports talk to it purely
//! through channels.

pub mod command;
pub mod config;
pub mod delta;
pub mod error;
pub mod events;
pub mod record;
pub mod state;
pub mod store;
pub mod watcher;

pub use command::{Command, CommandInterpreter};
pub use config::{RecordingConfig, WatchConfig};
pub use delta::{DeltaError, FrameStats};
pub use error::WatchError;
pub use events::EventPublisher;
pub use record::FfmpegSink;
pub use state::SensingState;
pub use store::FrameStore;
pub use watcher::Watcher;
