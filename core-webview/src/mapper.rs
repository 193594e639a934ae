//! # Navigation Event Mapper
//!
//! Translates the host web view's lifecycle callbacks into [`LoadStatus`]
//! values and hands each one to a single callback.
//!
//! | Incoming event | Guard | Emitted status |
//! |---|---|---|
//! | provisional start | start not already signalled | `Progressing(0.0)` |
//! | commit | | none, clears the start flag |
//! | finish | | `Finished` |
//! | provisional or committed failure | | `Failure(description)` |
//! | progress change | fraction below 1.0 | `Progressing(fraction)` |
//! | policy decision, page-internal, page already loaded | | none, sets the start flag |
//!
//! Policy decisions always allow the navigation. Engine errors never escape
//! the mapper; they are delivered as `Failure` through the same callback as
//! every other status.

use bridge_traits::webview::{
    NavigationAction, NavigationDelegate, NavigationError, NavigationEvent, NavigationPolicy,
    WebViewHost,
};
use tracing::{debug, trace};

use crate::status::LoadStatus;

/// Lifecycle-to-status translator.
///
/// Register it on a [`WebViewHost`] through
/// [`set_navigation_delegate`](WebViewHost::set_navigation_delegate); the
/// callback then runs synchronously on the UI thread for every transition.
///
/// ```
/// use bridge_traits::{NavigationDelegate, NavigationEvent};
/// use core_webview::{LoadStatus, NavigationMapper};
/// use std::sync::mpsc;
///
/// let (tx, rx) = mpsc::channel();
/// let mut mapper = NavigationMapper::new(move |status| {
///     tx.send(status).ok();
/// });
///
/// mapper.on_navigation_event(NavigationEvent::ProvisionalStarted);
/// mapper.on_navigation_event(NavigationEvent::Committed);
/// mapper.on_navigation_event(NavigationEvent::Finished);
///
/// let seen: Vec<LoadStatus> = rx.try_iter().collect();
/// assert_eq!(seen, vec![LoadStatus::progressing(0.0), LoadStatus::finished()]);
/// ```
pub struct NavigationMapper<F> {
    on_status: F,
    /// Set when a page-internal navigation was approved on a loaded page;
    /// the provisional start that follows is not signalled again.
    start_signaled: bool,
}

impl<F> NavigationMapper<F>
where
    F: FnMut(LoadStatus),
{
    pub fn new(on_status: F) -> Self {
        Self {
            on_status,
            start_signaled: false,
        }
    }

    /// Whether the next provisional start will be swallowed.
    pub fn start_suppressed(&self) -> bool {
        self.start_signaled
    }

    fn emit(&mut self, status: LoadStatus) {
        trace!(status = %status, "Emitting load status");
        (self.on_status)(status);
    }

    fn fail(&mut self, error: NavigationError, provisional: bool) {
        debug!(
            code = ?error.code,
            provisional,
            "Navigation failed: {}",
            error.description
        );
        self.emit(LoadStatus::failure(error.description));
    }
}

impl<F> NavigationDelegate for NavigationMapper<F>
where
    F: FnMut(LoadStatus) + Send,
{
    fn on_navigation_event(&mut self, event: NavigationEvent) {
        match event {
            NavigationEvent::ProvisionalStarted => {
                if self.start_signaled {
                    debug!("Skipping start signal for page-internal navigation");
                } else {
                    self.emit(LoadStatus::progressing(0.0));
                }
            }
            NavigationEvent::Committed => {
                self.start_signaled = false;
            }
            NavigationEvent::Finished => self.emit(LoadStatus::finished()),
            NavigationEvent::ProvisionalFailed(error) => self.fail(error, true),
            NavigationEvent::Failed(error) => self.fail(error, false),
            NavigationEvent::ProgressChanged(fraction) => {
                // Completion is reported by `Finished`
                if fraction < 1.0 {
                    self.emit(LoadStatus::progressing(fraction));
                }
            }
        }
    }

    fn decide_policy(
        &mut self,
        host: &dyn WebViewHost,
        action: &NavigationAction,
    ) -> NavigationPolicy {
        if action.navigation_type.is_page_internal() && host.current_url().is_some() {
            trace!("Page-internal navigation on a loaded page");
            self.start_signaled = true;
        }
        NavigationPolicy::Allow
    }
}

impl<F> std::fmt::Debug for NavigationMapper<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavigationMapper")
            .field("start_signaled", &self.start_signaled)
            .finish()
    }
}
