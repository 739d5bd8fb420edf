//! Shared utilities for peervote.

pub mod logging;

pub use logging::{init_logging, LogFormat, UnknownLogFormat};
