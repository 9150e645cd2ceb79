//! Logging utilities.
//!
//! Every subsystem logs through the `log` facade; this module only owns the
//! one-time `env_logger` installation used by binaries and demos.

mod init;

pub use init::{init_logging, LoggingConfig, DEFAULT_FILTER};
