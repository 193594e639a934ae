//! # Web Loader
//!
//! [`WebLoader`] owns the current [`LoadStatus`] of one web view. It installs a
//! [`NavigationMapper`] on the host, stores every status the mapper emits,
//! republishes changes on an [`EventBus`], and derives the overlay state the
//! host renders.
//!
//! ## Usage
//!
//! ```ignore
//! use core_webview::WebLoader;
//!
//! let loader = WebLoader::from_config(&config);
//! loader.attach()?;
//! loader.load(config.start_url.as_str())?;
//!
//! // later, from the UI layer
//! let overlay = loader.overlay();
//! ```
//!
//! Dropping the loader detaches the mapper from the web view.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bridge_traits::network::NetworkStatus;
use bridge_traits::webview::WebViewHost;
use core_runtime::config::{parse_start_url, OverlayAppearance, ShellConfig};
use core_runtime::events::{CoreEvent, EventBus, EventSeverity, Receiver};
use core_runtime::logging::redact_url;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::error::{Result, WebViewError};
use crate::mapper::NavigationMapper;
use crate::overlay::OverlayState;
use crate::status::LoadStatus;

/// Current status shared between the loader and the mapper callback.
struct StatusCell {
    loader_id: Uuid,
    current: Mutex<LoadStatus>,
    events: EventBus<LoadStatus>,
}

impl StatusCell {
    fn lock(&self) -> MutexGuard<'_, LoadStatus> {
        // The guarded value is replaced wholesale, so a poisoned lock still
        // holds a valid status.
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn get(&self) -> LoadStatus {
        self.lock().clone()
    }

    /// Replace the current status. Returns whether it changed.
    fn replace(&self, status: LoadStatus) -> bool {
        self.replace_if(status, |_| true)
    }

    /// Replace the current status if `guard` accepts it. The guard and the
    /// write happen under one lock acquisition.
    fn replace_if<G>(&self, status: LoadStatus, guard: G) -> bool
    where
        G: FnOnce(&LoadStatus) -> bool,
    {
        let changed = {
            let mut current = self.lock();
            if !guard(&current) {
                return false;
            }
            let changed = !current.is_equivalent(&status);
            *current = status.clone();
            changed
        };

        if !changed {
            return false;
        }

        log_transition(self.loader_id, &status);
        // No subscribers is fine; the UI reads the current value directly
        if self.events.emit(status).is_err() {
            debug!(loader_id = %self.loader_id, "No status subscribers");
        }
        true
    }
}

fn log_transition(loader_id: Uuid, status: &LoadStatus) {
    match status.severity() {
        EventSeverity::Error => error!(loader_id = %loader_id, status = %status, "{}", status.description()),
        EventSeverity::Warning => warn!(loader_id = %loader_id, status = %status, "{}", status.description()),
        EventSeverity::Info => info!(loader_id = %loader_id, status = %status, "{}", status.description()),
        EventSeverity::Debug => debug!(loader_id = %loader_id, status = %status, "{}", status.description()),
    }
}

/// Owner of the load status for one embedded web view.
pub struct WebLoader {
    web_view: Arc<dyn WebViewHost>,
    appearance: OverlayAppearance,
    cell: Arc<StatusCell>,
    attached: AtomicBool,
}

impl WebLoader {
    pub fn new(
        web_view: Arc<dyn WebViewHost>,
        appearance: OverlayAppearance,
        events: EventBus<LoadStatus>,
    ) -> Self {
        Self {
            web_view,
            appearance,
            cell: Arc::new(StatusCell {
                loader_id: Uuid::new_v4(),
                current: Mutex::new(LoadStatus::standby()),
                events,
            }),
            attached: AtomicBool::new(false),
        }
    }

    pub fn from_config(config: &ShellConfig) -> Self {
        Self::new(
            Arc::clone(&config.web_view),
            config.appearance,
            EventBus::new(config.event_buffer_size),
        )
    }

    /// Identifier used to correlate this loader's log lines.
    pub fn id(&self) -> Uuid {
        self.cell.loader_id
    }

    pub fn is_attached(&self) -> bool {
        self.attached.load(Ordering::Acquire)
    }

    /// Register a fresh [`NavigationMapper`] as the web view's delegate.
    ///
    /// # Errors
    ///
    /// - [`WebViewError::AlreadyAttached`] if called twice without `detach`
    /// - [`WebViewError::Bridge`] if the host rejects the delegate
    pub fn attach(&self) -> Result<()> {
        if self
            .attached
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(WebViewError::AlreadyAttached);
        }

        let cell = Arc::clone(&self.cell);
        let mapper = NavigationMapper::new(move |status| {
            cell.replace(status);
        });

        if let Err(e) = self.web_view.set_navigation_delegate(Box::new(mapper)) {
            self.attached.store(false, Ordering::Release);
            return Err(e.into());
        }
        debug!(loader_id = %self.id(), "Attached navigation mapper");
        Ok(())
    }

    /// Remove the mapper from the web view. No-op when not attached.
    pub fn detach(&self) {
        if !self.attached.swap(false, Ordering::AcqRel) {
            return;
        }
        self.web_view.clear_navigation_delegate();
        debug!(loader_id = %self.id(), "Detached navigation mapper");
    }

    /// Ask the web view to load `url` (absolute http or https).
    ///
    /// Status updates arrive through the mapper as the engine reports them.
    pub fn load(&self, url: &str) -> Result<()> {
        if !self.is_attached() {
            return Err(WebViewError::NotAttached);
        }

        let url = parse_start_url(url)?;
        info!(loader_id = %self.id(), url = %redact_url(url.as_str()), "Loading page");
        self.web_view.load_url(url.as_str())?;
        Ok(())
    }

    /// Current status value.
    pub fn status(&self) -> LoadStatus {
        self.cell.get()
    }

    /// Overlay description for the current status.
    pub fn overlay(&self) -> OverlayState {
        OverlayState::from_status(&self.status(), &self.appearance)
    }

    /// Receive every status change from now on.
    pub fn subscribe(&self) -> Receiver<LoadStatus> {
        self.cell.events.subscribe()
    }

    pub fn event_bus(&self) -> &EventBus<LoadStatus> {
        &self.cell.events
    }

    /// Apply a connectivity report from the host or a network monitor.
    ///
    /// Losing the network shows the offline indicator unless the page has
    /// already finished loading. Regaining it clears the offline indicator
    /// back to standby; the next navigation reports its own progress.
    pub fn update_connectivity(&self, network: NetworkStatus) {
        match network {
            NetworkStatus::Disconnected => {
                self.cell
                    .replace_if(LoadStatus::no_connection(), |current| {
                        !current.is_successful()
                    });
            }
            NetworkStatus::Connected => {
                self.cell.replace_if(LoadStatus::standby(), |current| {
                    *current == LoadStatus::NoConnection
                });
            }
            NetworkStatus::Indeterminate => {}
        }
    }
}

impl Drop for WebLoader {
    fn drop(&mut self) {
        self.detach();
    }
}

impl std::fmt::Debug for WebLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebLoader")
            .field("id", &self.id())
            .field("status", &self.status())
            .field("attached", &self.is_attached())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::error::Result as BridgeResult;
    use bridge_traits::webview::NavigationDelegate;
    use bridge_traits::BridgeError;
    use mockall::mock;

    mock! {
        WebView {}

        impl WebViewHost for WebView {
            fn current_url(&self) -> Option<String>;
            fn set_navigation_delegate(&self, delegate: Box<dyn NavigationDelegate>) -> BridgeResult<()>;
            fn clear_navigation_delegate(&self);
            fn load_url(&self, url: &str) -> BridgeResult<()>;
        }
    }

    fn loader_with(host: MockWebView) -> WebLoader {
        WebLoader::new(
            Arc::new(host),
            OverlayAppearance::default(),
            EventBus::new(8),
        )
    }

    fn accepting_host() -> MockWebView {
        let mut host = MockWebView::new();
        host.expect_set_navigation_delegate().returning(|_| Ok(()));
        host.expect_clear_navigation_delegate().return_const(());
        host
    }

    #[test]
    fn test_starts_in_standby() {
        let loader = loader_with(MockWebView::new());

        assert_eq!(loader.status(), LoadStatus::Standby);
        assert!(!loader.is_attached());
        assert_eq!(loader.overlay().web_view_opacity, 0.5);
    }

    #[test]
    fn test_attach_twice_fails() {
        let loader = loader_with(accepting_host());

        loader.attach().unwrap();
        assert!(matches!(loader.attach(), Err(WebViewError::AlreadyAttached)));
    }

    #[test]
    fn test_attach_propagates_bridge_error() {
        let mut host = MockWebView::new();
        host.expect_set_navigation_delegate()
            .returning(|_| Err(BridgeError::NotAvailable("web view torn down".to_string())));
        let loader = loader_with(host);

        assert!(matches!(loader.attach(), Err(WebViewError::Bridge(_))));
        assert!(!loader.is_attached());
    }

    #[test]
    fn test_load_requires_attach() {
        let loader = loader_with(MockWebView::new());

        assert!(matches!(
            loader.load("https://example.com/"),
            Err(WebViewError::NotAttached)
        ));
    }

    #[test]
    fn test_load_forwards_normalized_url() {
        let mut host = accepting_host();
        host.expect_load_url()
            .withf(|url| url == "https://example.com/")
            .times(1)
            .returning(|_| Ok(()));
        let loader = loader_with(host);

        loader.attach().unwrap();
        loader.load("https://example.com").unwrap();
    }

    #[test]
    fn test_load_rejects_non_http_url() {
        let loader = loader_with(accepting_host());
        loader.attach().unwrap();

        assert!(matches!(
            loader.load("javascript:alert(1)"),
            Err(WebViewError::Runtime(_))
        ));
    }

    #[test]
    fn test_drop_detaches() {
        let mut host = MockWebView::new();
        host.expect_set_navigation_delegate().returning(|_| Ok(()));
        host.expect_clear_navigation_delegate().times(1).return_const(());
        let loader = loader_with(host);

        loader.attach().unwrap();
        drop(loader);
    }

    #[test]
    fn test_detach_without_attach_is_noop() {
        let mut host = MockWebView::new();
        host.expect_clear_navigation_delegate().never();
        let loader = loader_with(host);

        loader.detach();
    }

    #[test]
    fn test_disconnect_before_finish_shows_offline() {
        let loader = loader_with(MockWebView::new());
        let mut events = loader.subscribe();

        loader.update_connectivity(NetworkStatus::Disconnected);

        assert_eq!(loader.status(), LoadStatus::NoConnection);
        assert_eq!(events.try_recv().unwrap(), LoadStatus::NoConnection);
    }

    #[test]
    fn test_disconnect_after_finish_keeps_page() {
        let loader = loader_with(MockWebView::new());
        loader.cell.replace(LoadStatus::finished());

        loader.update_connectivity(NetworkStatus::Disconnected);

        assert_eq!(loader.status(), LoadStatus::Finished);
    }

    #[test]
    fn test_reconnect_clears_offline() {
        let loader = loader_with(MockWebView::new());

        loader.update_connectivity(NetworkStatus::Disconnected);
        loader.update_connectivity(NetworkStatus::Indeterminate);
        assert_eq!(loader.status(), LoadStatus::NoConnection);

        loader.update_connectivity(NetworkStatus::Connected);
        assert_eq!(loader.status(), LoadStatus::Standby);
    }

    #[test]
    fn test_guarded_replace_leaves_status_untouched() {
        let loader = loader_with(MockWebView::new());
        let mut events = loader.subscribe();
        loader.cell.replace(LoadStatus::finished());
        events.try_recv().unwrap();

        let written = loader
            .cell
            .replace_if(LoadStatus::no_connection(), |current| {
                !current.is_successful()
            });

        assert!(!written);
        assert_eq!(loader.status(), LoadStatus::Finished);
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn test_disconnect_racing_finish_never_overwrites_finished() {
        let loader = Arc::new(loader_with(MockWebView::new()));
        loader.cell.replace(LoadStatus::progressing(0.5));

        let writer = {
            let loader = Arc::clone(&loader);
            std::thread::spawn(move || {
                loader.cell.replace(LoadStatus::finished());
            })
        };
        let watcher = {
            let loader = Arc::clone(&loader);
            std::thread::spawn(move || {
                loader.update_connectivity(NetworkStatus::Disconnected);
            })
        };
        writer.join().unwrap();
        watcher.join().unwrap();

        // Either the disconnect landed first and Finished replaced it, or
        // Finished landed first and the disconnect was dropped.
        assert_eq!(loader.status(), LoadStatus::Finished);
    }

    #[test]
    fn test_equivalent_status_is_not_republished() {
        let loader = loader_with(MockWebView::new());
        let mut events = loader.subscribe();

        assert!(loader.cell.replace(LoadStatus::progressing(0.3)));
        assert!(!loader.cell.replace(LoadStatus::progressing(0.30001)));
        assert!(loader.cell.replace(LoadStatus::progressing(0.4)));

        assert_eq!(events.try_recv().unwrap(), LoadStatus::progressing(0.3));
        assert_eq!(events.try_recv().unwrap(), LoadStatus::progressing(0.4));
        assert!(events.try_recv().is_err());
    }
}
