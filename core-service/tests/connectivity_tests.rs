//! Connectivity tests for the shell façade
//!
//! Drives a bootstrapped service with a scripted network monitor and checks
//! the offline indicator follows the reported connectivity.

use async_trait::async_trait;
use bridge_traits::error::Result as BridgeResult;
use bridge_traits::{
    NavigationDelegate, NavigationEvent, NetworkChangeStream, NetworkInfo, NetworkMonitor,
    NetworkStatus, NetworkType, WebViewHost,
};
use core_runtime::config::ShellConfig;
use core_service::ShellService;
use core_webview::{LoadStatus, OverlayIndicator};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct FakeWebView {
    delegate: Mutex<Option<Box<dyn NavigationDelegate>>>,
}

impl FakeWebView {
    fn fire(&self, event: NavigationEvent) {
        if let Some(delegate) = self.delegate.lock().unwrap().as_mut() {
            delegate.on_navigation_event(event);
        }
    }
}

impl WebViewHost for FakeWebView {
    fn current_url(&self) -> Option<String> {
        None
    }

    fn set_navigation_delegate(&self, delegate: Box<dyn NavigationDelegate>) -> BridgeResult<()> {
        *self.delegate.lock().unwrap() = Some(delegate);
        Ok(())
    }

    fn clear_navigation_delegate(&self) {
        self.delegate.lock().unwrap().take();
    }

    fn load_url(&self, _url: &str) -> BridgeResult<()> {
        Ok(())
    }
}

/// Monitor that replays a fixed list of changes.
struct ScriptedMonitor {
    current: NetworkInfo,
    changes: Mutex<Vec<NetworkInfo>>,
}

struct ScriptedStream(VecDeque<NetworkInfo>);

#[async_trait]
impl NetworkChangeStream for ScriptedStream {
    async fn next(&mut self) -> Option<NetworkInfo> {
        self.0.pop_front()
    }
}

#[async_trait]
impl NetworkMonitor for ScriptedMonitor {
    async fn get_network_info(&self) -> BridgeResult<NetworkInfo> {
        Ok(self.current.clone())
    }

    async fn subscribe_changes(&self) -> BridgeResult<Box<dyn NetworkChangeStream>> {
        let changes = std::mem::take(&mut *self.changes.lock().unwrap());
        Ok(Box::new(ScriptedStream(changes.into())))
    }
}

fn bootstrap(monitor: ScriptedMonitor) -> (Arc<FakeWebView>, ShellService) {
    bootstrap_with_awareness(monitor, true)
}

fn bootstrap_with_awareness(
    monitor: ScriptedMonitor,
    awareness: bool,
) -> (Arc<FakeWebView>, ShellService) {
    let web_view = Arc::new(FakeWebView::default());
    let config = ShellConfig::builder()
        .start_url("https://example.com/")
        .web_view(web_view.clone())
        .network_monitor(Arc::new(monitor))
        .enable_network_awareness(awareness)
        .build()
        .unwrap();
    (web_view, ShellService::bootstrap(config).unwrap())
}

fn dropping_connection() -> ScriptedMonitor {
    ScriptedMonitor {
        current: NetworkInfo::connected(NetworkType::WiFi),
        changes: Mutex::new(vec![NetworkInfo::disconnected()]),
    }
}

#[tokio::test]
async fn test_watch_applies_changes_in_order() {
    let (web_view, service) = bootstrap(ScriptedMonitor {
        current: NetworkInfo::connected(NetworkType::WiFi),
        changes: Mutex::new(vec![
            NetworkInfo::disconnected(),
            NetworkInfo::connected(NetworkType::Cellular),
        ]),
    });
    let mut events = service.subscribe();

    web_view.fire(NavigationEvent::ProvisionalStarted);
    service.watch_connectivity().await.unwrap();

    assert_eq!(events.try_recv().unwrap(), LoadStatus::progressing(0.0));
    assert_eq!(events.try_recv().unwrap(), LoadStatus::NoConnection);
    assert_eq!(events.try_recv().unwrap(), LoadStatus::Standby);
    assert_eq!(service.overlay().indicator, OverlayIndicator::Hidden);
}

#[tokio::test]
async fn test_offline_at_launch_then_page_loads() {
    let (web_view, service) = bootstrap(ScriptedMonitor {
        current: NetworkInfo::disconnected(),
        changes: Mutex::new(Vec::new()),
    });

    assert_eq!(
        service.check_connectivity().await.unwrap(),
        NetworkStatus::Disconnected
    );
    assert_eq!(service.overlay().indicator, OverlayIndicator::Offline);

    web_view.fire(NavigationEvent::ProvisionalStarted);
    web_view.fire(NavigationEvent::Committed);
    web_view.fire(NavigationEvent::Finished);

    assert_eq!(service.status(), LoadStatus::Finished);
    assert_eq!(service.overlay().web_view_opacity, 1.0);
}

#[tokio::test]
async fn test_shutdown_stops_tracking() {
    let (web_view, service) = bootstrap(ScriptedMonitor {
        current: NetworkInfo::connected(NetworkType::Ethernet),
        changes: Mutex::new(Vec::new()),
    });

    service.shutdown();
    web_view.fire(NavigationEvent::ProvisionalStarted);

    assert_eq!(service.status(), LoadStatus::Standby);
}

#[tokio::test]
async fn test_awareness_off_ignores_monitor() {
    let (_web_view, service) = bootstrap_with_awareness(dropping_connection(), false);

    assert_eq!(
        service.check_connectivity().await.unwrap(),
        NetworkStatus::Indeterminate
    );
    service.watch_connectivity().await.unwrap();

    assert_eq!(service.status(), LoadStatus::Standby);
    assert_eq!(service.overlay().indicator, OverlayIndicator::Hidden);
}

#[cfg(feature = "network-awareness")]
#[tokio::test]
async fn test_spawned_watch_applies_changes() {
    let (web_view, service) = bootstrap(dropping_connection());
    web_view.fire(NavigationEvent::ProvisionalStarted);

    service.spawn_connectivity_watch().await.unwrap();

    assert_eq!(service.status(), LoadStatus::NoConnection);
    assert_eq!(service.overlay().indicator, OverlayIndicator::Offline);
}

#[cfg(feature = "network-awareness")]
#[tokio::test]
async fn test_spawned_watch_with_awareness_off_keeps_status() {
    let (_web_view, service) = bootstrap_with_awareness(dropping_connection(), false);

    service.spawn_connectivity_watch().await.unwrap();

    assert_eq!(service.status(), LoadStatus::Standby);
}
