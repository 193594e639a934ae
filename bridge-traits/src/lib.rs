//! # Host Bridge Traits
//!
//! Platform abstraction traits that must be implemented by each host shell.
//!
//! ## Overview
//!
//! This crate defines the contract between the web shell core and the native
//! container that embeds the browser engine. Each trait represents a
//! capability the core requires but that is implemented differently per
//! platform (iOS, Android, desktop).
//!
//! ## Traits
//!
//! ### Web Content
//! - [`WebViewHost`](webview::WebViewHost) - The embedded web view: delegate registration, current URL, loads
//! - [`NavigationDelegate`](webview::NavigationDelegate) - Receiver of lifecycle callbacks and policy requests
//!
//! ### Platform Integration
//! - [`NetworkMonitor`](network::NetworkMonitor) - Connectivity detection for the offline indicator
//!
//! ### Utilities
//! - [`LoggerSink`](logging::LoggerSink) - Forward structured logs to host logging
//!
//! ## Error Handling
//!
//! Bridge operations return [`BridgeError`](error::BridgeError). Navigation
//! failures are not bridge errors: the engine reports them through
//! [`NavigationEvent`](webview::NavigationEvent) as a
//! [`NavigationError`](webview::NavigationError) value.
//!
//! ## Thread Safety
//!
//! Bridge traits require `Send + Sync` so hosts can keep their adapters in an
//! `Arc` and hand them to whichever thread owns the UI. Callbacks themselves
//! are always delivered on the UI thread.

pub mod error;
pub mod logging;
pub mod network;
pub mod webview;

pub use error::BridgeError;

// Re-export commonly used types
pub use logging::{ConsoleLogger, LogEntry, LogLevel, LoggerSink};
pub use network::{NetworkChangeStream, NetworkInfo, NetworkMonitor, NetworkStatus, NetworkType};
pub use webview::{
    NavigationAction, NavigationDelegate, NavigationError, NavigationEvent, NavigationPolicy,
    NavigationType, WebViewHost,
};
