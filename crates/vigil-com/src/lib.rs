pub mod client;
pub mod command;
pub mod error;
pub mod events;
pub mod framing;

pub use client::LineClient;
pub use command::{CommandRequest, CommandServer};
pub use error::ComError;
pub use events::EventServer;
