//! Common utilities shared by ReefEMS services
//!
//! Provides the service-level error type, logging initialization and
//! layered configuration loading. Protocol-level concerns live in the
//! individual driver crates.

pub mod config;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
pub use logging::{init_logging, LogConfig, LogFormat};
