//! # Shell Configuration Module
//!
//! Provides configuration management for the web shell core.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a
//! `ShellConfig` holding the host bridges and settings the core needs. It
//! enforces fail-fast validation so a misconfigured shell is rejected at
//! startup instead of showing a blank page.
//!
//! ## Required Dependencies
//!
//! - `WebViewHost` - The embedded web view the shell drives
//! - A start URL (`http` or `https`)
//!
//! ## Optional Dependencies
//!
//! - `NetworkMonitor` - Connectivity detection for the offline indicator
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::{OverlayAppearance, ShellConfig};
//! use std::sync::Arc;
//!
//! let config = ShellConfig::builder()
//!     .start_url("https://example.com/")
//!     .web_view(Arc::new(MyWebView::new()))
//!     .appearance(OverlayAppearance::default().with_dimmed_opacity(0.4))
//!     .build()?;
//! ```
//!
//! ## Error Handling
//!
//! A missing web view yields [`Error::CapabilityMissing`] with a message
//! naming what each platform should inject; every other problem yields
//! [`Error::Config`].

use crate::error::{Error, Result};
use crate::events::DEFAULT_EVENT_BUFFER_SIZE;
use bridge_traits::{NetworkMonitor, WebViewHost};
use std::sync::Arc;
use url::Url;

/// Upper bound for the event bus buffer.
const MAX_EVENT_BUFFER_SIZE: usize = 10_000;

/// Configuration for the web shell core.
///
/// Use [`ShellConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct ShellConfig {
    /// Page loaded into the web view at startup
    pub start_url: Url,

    /// Embedded web view (required)
    pub web_view: Arc<dyn WebViewHost>,

    /// Network connectivity monitor (optional)
    pub network_monitor: Option<Arc<dyn NetworkMonitor>>,

    /// Visual parameters of the loading overlay
    pub appearance: OverlayAppearance,

    /// Feature flags
    pub features: FeatureFlags,

    /// Buffer size of the load-status event bus
    pub event_buffer_size: usize,
}

impl std::fmt::Debug for ShellConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShellConfig")
            .field("start_url", &self.start_url.as_str())
            .field("web_view", &"WebViewHost { ... }")
            .field(
                "network_monitor",
                &self
                    .network_monitor
                    .as_ref()
                    .map(|_| "NetworkMonitor { ... }"),
            )
            .field("appearance", &self.appearance)
            .field("features", &self.features)
            .field("event_buffer_size", &self.event_buffer_size)
            .finish()
    }
}

/// Feature flags control optional functionality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeatureFlags {
    /// Show the offline indicator when the network monitor reports no
    /// connectivity (requires NetworkMonitor)
    pub enable_network_awareness: bool,
}

/// Opacity of the web content while the overlay is or is not shown.
///
/// The page stays faintly visible behind the loading animation and becomes
/// fully opaque once it has finished loading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayAppearance {
    /// Web view opacity once the page has finished loading
    pub loaded_opacity: f64,
    /// Web view opacity in every other state
    pub dimmed_opacity: f64,
}

impl Default for OverlayAppearance {
    fn default() -> Self {
        Self {
            loaded_opacity: 1.0,
            dimmed_opacity: 0.5,
        }
    }
}

impl OverlayAppearance {
    pub fn with_loaded_opacity(mut self, opacity: f64) -> Self {
        self.loaded_opacity = opacity;
        self
    }

    pub fn with_dimmed_opacity(mut self, opacity: f64) -> Self {
        self.dimmed_opacity = opacity;
        self
    }

    /// Validates that both opacities lie in `[0, 1]`.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("Loaded", self.loaded_opacity),
            ("Dimmed", self.dimmed_opacity),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::Config(format!(
                    "{} opacity must be between 0.0 and 1.0, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

impl ShellConfig {
    /// Creates a new builder for constructing a `ShellConfig`.
    pub fn builder() -> ShellConfigBuilder {
        ShellConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - Start URL uses http or https
    /// - Overlay opacities are within `[0, 1]`
    /// - Event buffer size is reasonable (> 0 and <= 10,000)
    /// - Feature flags are consistent with available bridges
    pub fn validate(&self) -> Result<()> {
        check_scheme(&self.start_url)?;
        self.appearance.validate()?;

        if self.event_buffer_size == 0 {
            return Err(Error::Config(
                "Event buffer size must be greater than 0".to_string(),
            ));
        }

        if self.event_buffer_size > MAX_EVENT_BUFFER_SIZE {
            return Err(Error::Config(format!(
                "Event buffer size exceeds maximum of {}",
                MAX_EVENT_BUFFER_SIZE
            )));
        }

        if self.features.enable_network_awareness && self.network_monitor.is_none() {
            return Err(Error::Config(
                "Network awareness enabled but no NetworkMonitor provided. \
                 Disable the feature or inject a NetworkMonitor implementation."
                    .to_string(),
            ));
        }

        Ok(())
    }
}

/// Parses a start URL, accepting only absolute http(s) URLs.
pub fn parse_start_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim())
        .map_err(|e| Error::Config(format!("Invalid start URL '{}': {}", raw, e)))?;
    check_scheme(&url)?;
    Ok(url)
}

fn check_scheme(url: &Url) -> Result<()> {
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(Error::Config(format!(
            "Start URL must use http or https, got '{}'",
            other
        ))),
    }
}

fn web_view_missing_error() -> Error {
    Error::capability_missing(
        "WebViewHost",
        "A WebViewHost implementation is required to display the page. \
         iOS: wrap the WKWebView and forward WKNavigationDelegate callbacks. \
         Android: wrap the WebView and forward WebViewClient callbacks. \
         Desktop: wrap the platform webview (WebView2/WebKitGTK).",
    )
}

/// Builder for constructing [`ShellConfig`] instances.
///
/// Call [`build()`](ShellConfigBuilder::build) once all required values are
/// set; it validates the result before returning it.
#[derive(Default)]
pub struct ShellConfigBuilder {
    start_url: Option<String>,
    web_view: Option<Arc<dyn WebViewHost>>,
    network_monitor: Option<Arc<dyn NetworkMonitor>>,
    appearance: Option<OverlayAppearance>,
    features: FeatureFlags,
    event_buffer_size: Option<usize>,
}

impl ShellConfigBuilder {
    /// Sets the page loaded at startup.
    ///
    /// # Examples
    ///
    /// ```
    /// use core_runtime::config::ShellConfig;
    ///
    /// let builder = ShellConfig::builder()
    ///     .start_url("https://example.com/");
    /// ```
    pub fn start_url(mut self, url: impl Into<String>) -> Self {
        self.start_url = Some(url.into());
        self
    }

    /// Sets the web view implementation (required).
    pub fn web_view(mut self, web_view: Arc<dyn WebViewHost>) -> Self {
        self.web_view = Some(web_view);
        self
    }

    /// Sets the network monitor implementation (optional).
    pub fn network_monitor(mut self, monitor: Arc<dyn NetworkMonitor>) -> Self {
        self.network_monitor = Some(monitor);
        self
    }

    /// Sets the overlay appearance.
    ///
    /// Default: loaded opacity 1.0, dimmed opacity 0.5
    pub fn appearance(mut self, appearance: OverlayAppearance) -> Self {
        self.appearance = Some(appearance);
        self
    }

    /// Enables or disables network awareness.
    pub fn enable_network_awareness(mut self, enable: bool) -> Self {
        self.features.enable_network_awareness = enable;
        self
    }

    /// Sets the event bus buffer size.
    ///
    /// Default: [`DEFAULT_EVENT_BUFFER_SIZE`]
    pub fn event_buffer_size(mut self, size: usize) -> Self {
        self.event_buffer_size = Some(size);
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if the start URL is missing or invalid, or any
    ///   setting fails [`ShellConfig::validate`]
    /// - [`Error::CapabilityMissing`] if no web view was provided
    pub fn build(self) -> Result<ShellConfig> {
        let raw_url = self
            .start_url
            .ok_or_else(|| Error::Config("Start URL is required".to_string()))?;
        let start_url = parse_start_url(&raw_url)?;

        let web_view = self.web_view.ok_or_else(web_view_missing_error)?;

        let config = ShellConfig {
            start_url,
            web_view,
            network_monitor: self.network_monitor,
            appearance: self.appearance.unwrap_or_default(),
            features: self.features,
            event_buffer_size: self.event_buffer_size.unwrap_or(DEFAULT_EVENT_BUFFER_SIZE),
        };

        config.validate()?;
        Ok(config)
    }
}
