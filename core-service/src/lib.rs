//! Core service façade and bootstrap helpers.
//!
//! This crate wires the host-provided web view and network monitor into the
//! shared Rust core. A host builds a [`ShellConfig`], calls
//! [`ShellService::bootstrap`], and renders its loading overlay from
//! [`ShellService::overlay`] or the status events from
//! [`ShellService::subscribe`].
//!
//! Enable the `network-awareness` feature to let the service spawn its own
//! connectivity watcher on the current Tokio runtime.

pub mod error;

pub use error::{CoreError, Result};

use std::sync::Arc;

use bridge_traits::network::{NetworkMonitor, NetworkStatus};
use core_runtime::config::{FeatureFlags, ShellConfig};
use core_runtime::events::Receiver;
use core_runtime::logging::redact_url;
use core_webview::{LoadStatus, OverlayState, WebLoader};
use tracing::{debug, info, instrument, warn};

struct ServiceInner {
    loader: WebLoader,
    network_monitor: Option<Arc<dyn NetworkMonitor>>,
    features: FeatureFlags,
}

/// Primary façade exposed to host applications.
///
/// Cloning is cheap; every clone drives the same web view. The navigation
/// delegate is removed on [`shutdown`](ShellService::shutdown) or when the
/// last clone is dropped.
#[derive(Clone)]
pub struct ShellService {
    inner: Arc<ServiceInner>,
}

impl ShellService {
    /// Validate `config`, attach the status tracker to the web view and start
    /// loading the start URL.
    ///
    /// ```ignore
    /// let config = ShellConfig::builder()
    ///     .start_url("https://example.com/app")
    ///     .web_view(Arc::new(PlatformWebView::new()))
    ///     .build()?;
    ///
    /// let shell = ShellService::bootstrap(config)?;
    /// ```
    #[instrument(skip(config), fields(start_url = %redact_url(config.start_url.as_str())))]
    pub fn bootstrap(config: ShellConfig) -> Result<Self> {
        config.validate().map_err(config_error)?;

        let loader = WebLoader::from_config(&config);
        loader.attach()?;
        loader.load(config.start_url.as_str())?;
        info!(loader_id = %loader.id(), "Web shell started");

        Ok(Self {
            inner: Arc::new(ServiceInner {
                loader,
                network_monitor: config.network_monitor,
                features: config.features,
            }),
        })
    }

    pub fn status(&self) -> LoadStatus {
        self.inner.loader.status()
    }

    pub fn overlay(&self) -> OverlayState {
        self.inner.loader.overlay()
    }

    /// Receive every load status change from now on.
    pub fn subscribe(&self) -> Receiver<LoadStatus> {
        self.inner.loader.subscribe()
    }

    /// Navigate the web view to another absolute http(s) URL.
    pub fn load(&self, url: &str) -> Result<()> {
        Ok(self.inner.loader.load(url)?)
    }

    /// Apply a connectivity change pushed by the host.
    pub fn update_connectivity(&self, status: NetworkStatus) {
        debug!(?status, "Connectivity update");
        self.inner.loader.update_connectivity(status);
    }

    /// Query the network monitor once and apply the result.
    ///
    /// Returns [`NetworkStatus::Indeterminate`] without querying anything
    /// when network awareness is disabled.
    pub async fn check_connectivity(&self) -> Result<NetworkStatus> {
        if !self.inner.features.enable_network_awareness {
            return Ok(NetworkStatus::Indeterminate);
        }

        let monitor = self.monitor()?;
        let info = monitor.get_network_info().await?;
        self.update_connectivity(info.status);
        Ok(info.status)
    }

    /// Apply monitor updates until the change stream closes.
    ///
    /// Returns immediately, without subscribing, when network awareness is
    /// disabled.
    pub async fn watch_connectivity(&self) -> Result<()> {
        if !self.inner.features.enable_network_awareness {
            debug!("Network awareness disabled; not watching connectivity");
            return Ok(());
        }

        let monitor = self.monitor()?;
        let mut changes = monitor.subscribe_changes().await?;

        while let Some(info) = changes.next().await {
            self.update_connectivity(info.status);
        }

        debug!("Network change stream closed");
        Ok(())
    }

    /// Run [`watch_connectivity`](ShellService::watch_connectivity) on the
    /// current Tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    #[cfg(feature = "network-awareness")]
    pub fn spawn_connectivity_watch(&self) -> tokio::task::JoinHandle<()> {
        let service = self.clone();
        tokio::spawn(async move {
            if let Err(e) = service.watch_connectivity().await {
                warn!(error = %e, "Connectivity watch stopped");
            }
        })
    }

    /// Detach from the web view. Later engine callbacks no longer change the
    /// status.
    pub fn shutdown(&self) {
        self.inner.loader.detach();
        info!(loader_id = %self.inner.loader.id(), "Web shell stopped");
    }

    fn monitor(&self) -> Result<&Arc<dyn NetworkMonitor>> {
        self.inner
            .network_monitor
            .as_ref()
            .ok_or_else(|| CoreError::CapabilityMissing {
                capability: "NetworkMonitor".to_string(),
                message: "Connectivity checks need a NetworkMonitor implementation. \
                          iOS: NWPathMonitor. Android: ConnectivityManager."
                    .to_string(),
            })
    }
}

impl std::fmt::Debug for ShellService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShellService")
            .field("loader", &self.inner.loader)
            .field("features", &self.inner.features)
            .finish()
    }
}

fn config_error(error: core_runtime::Error) -> CoreError {
    match error {
        core_runtime::Error::CapabilityMissing {
            capability,
            message,
        } => {
            warn!(%capability, "Missing host capability");
            CoreError::CapabilityMissing {
                capability,
                message,
            }
        }
        other => CoreError::Runtime(other),
    }
}
