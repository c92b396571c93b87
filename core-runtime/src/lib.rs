//! # Core Runtime Module
//!
//! Foundational runtime infrastructure for the transfer workspace:
//! - Logging and tracing setup
//! - Configuration management (`TransferConfig`)
//!
//! Every other crate depends on this one for its ambient conventions.

pub mod config;
pub mod error;
pub mod logging;

pub use config::{TransferConfig, TransferConfigBuilder};
pub use error::{Error, Result};
