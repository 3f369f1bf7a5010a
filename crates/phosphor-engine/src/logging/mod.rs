//! Logging utilities.
//!
//! Centralizes logger initialization. The engine itself only speaks through
//! the standard `log` facade; this module wires the `env_logger` backend.

mod init;

pub use init::{init_logging, LoggingConfig};
