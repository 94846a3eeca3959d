//! # Core Runtime Module
//!
//! Foundational runtime infrastructure shared by the artwork crates:
//! - Logging and tracing infrastructure
//! - Configuration management
//!
//! ## Overview
//!
//! Provider clients never read the environment or install subscribers
//! themselves. Hosts build an [`ArtworkConfig`](config::ArtworkConfig), call
//! [`init_logging`](logging::init_logging) once, and pass the pieces down.

pub mod config;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
