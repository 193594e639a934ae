//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the web shell core:
//! - Logging and tracing infrastructure
//! - Configuration management
//! - Typed event bus
//!
//! ## Overview
//!
//! This crate contains the runtime utilities the other crates depend on. It
//! establishes the configuration contract with the host, the logging
//! conventions, and the broadcast mechanism used to fan load-state changes out
//! to interested observers.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use error::{Error, Result};
