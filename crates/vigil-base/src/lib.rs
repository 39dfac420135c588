pub mod logging;

pub use logging::{StdoutLogger, init_stdout_logger};

// Re-export log so downstream crates can use vigil_base::log::*
pub use log;
