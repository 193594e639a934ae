//! Embedded Web View Abstraction
//!
//! Describes the capability surface the core needs from the host's web
//! rendering component (WKWebView on iOS, `android.webkit.WebView` on Android,
//! WebView2/WebKitGTK on desktop).
//!
//! The host owns the engine. It forwards main-frame lifecycle callbacks to the
//! registered [`NavigationDelegate`] and asks it for a [`NavigationPolicy`]
//! before each navigation. Everything is delivered on the UI thread in the
//! order the engine produces it:
//!
//! ```text
//! decide_policy ─> ProvisionalStarted ─> Committed ─> Finished
//!                                  └──> ProvisionalFailed
//!                                             └──> Failed
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::Result;

/// How a navigation was initiated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationType {
    /// User tapped a link
    LinkActivated,
    /// A form was submitted
    FormSubmitted,
    /// Back/forward list traversal
    BackForward,
    /// Page reload
    Reload,
    /// A form was resubmitted (e.g. reload after POST)
    FormResubmitted,
    /// Anything else, including script-driven and programmatic loads
    Other,
}

impl NavigationType {
    /// Whether the navigation was triggered by the page itself rather than by
    /// a user gesture.
    pub fn is_page_internal(self) -> bool {
        matches!(self, NavigationType::Other)
    }
}

/// A navigation request awaiting a policy decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationAction {
    pub navigation_type: NavigationType,
    /// URL the navigation is heading to, when the engine reports one
    pub target_url: Option<String>,
    pub is_main_frame: bool,
}

impl NavigationAction {
    pub fn new(navigation_type: NavigationType) -> Self {
        Self {
            navigation_type,
            target_url: None,
            is_main_frame: true,
        }
    }

    pub fn with_target_url(mut self, url: impl Into<String>) -> Self {
        self.target_url = Some(url.into());
        self
    }

    pub fn with_main_frame(mut self, is_main_frame: bool) -> Self {
        self.is_main_frame = is_main_frame;
        self
    }
}

/// Answer returned to the engine for a pending navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationPolicy {
    Allow,
    Cancel,
}

/// Error reported by the browser engine for a failed navigation.
///
/// `description` is the engine's localized, human-readable message and is
/// what the user ends up seeing.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{description}")]
pub struct NavigationError {
    pub description: String,
    /// Engine-specific error code (e.g. `NSURLErrorTimedOut`)
    pub code: Option<i64>,
}

impl NavigationError {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            code: None,
        }
    }

    pub fn with_code(mut self, code: i64) -> Self {
        self.code = Some(code);
        self
    }
}

/// Main-frame lifecycle notification forwarded by the host.
///
/// Hosts bridging over JSON send `{"event": "provisional_failed", "payload":
/// {"description": "...", "code": -1001}}`; unit events omit `payload`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "snake_case")]
pub enum NavigationEvent {
    /// The engine started loading a new page (provisional phase)
    ProvisionalStarted,
    /// The new page took over the view
    Committed,
    /// The page finished loading
    Finished,
    /// Loading failed before the page was committed
    ProvisionalFailed(NavigationError),
    /// Loading failed after the page was committed
    Failed(NavigationError),
    /// Engine's estimated load progress, in `[0, 1]`
    ProgressChanged(f64),
}

/// Receiver of navigation callbacks, registered on a [`WebViewHost`].
///
/// Callbacks are invoked synchronously on the UI thread; implementations must
/// not block.
pub trait NavigationDelegate: Send {
    /// Handle a lifecycle notification
    fn on_navigation_event(&mut self, event: NavigationEvent);

    /// Decide whether a requested navigation may proceed
    ///
    /// `host` is the web view asking, so the delegate can inspect its current
    /// state (e.g. whether a page is already loaded).
    fn decide_policy(
        &mut self,
        host: &dyn WebViewHost,
        action: &NavigationAction,
    ) -> NavigationPolicy;
}

/// Host web view trait
///
/// # Platform Support
///
/// - **iOS**: `WKWebView` + `WKNavigationDelegate`
/// - **Android**: `WebView` + `WebViewClient`/`WebChromeClient`
/// - **Desktop**: WebView2 (Windows), WebKitGTK (Linux), WKWebView (macOS)
///
/// # Example
///
/// ```ignore
/// use bridge_traits::webview::WebViewHost;
///
/// fn open_home(host: &dyn WebViewHost, delegate: Box<dyn NavigationDelegate>) -> Result<()> {
///     host.set_navigation_delegate(delegate)?;
///     host.load_url("https://example.com/")
/// }
/// ```
pub trait WebViewHost: Send + Sync {
    /// URL of the page currently loaded in the view, if any
    fn current_url(&self) -> Option<String>;

    /// Register the delegate receiving lifecycle callbacks
    ///
    /// Replaces any previously registered delegate.
    fn set_navigation_delegate(&self, delegate: Box<dyn NavigationDelegate>) -> Result<()>;

    /// Drop the registered delegate, if any
    fn clear_navigation_delegate(&self);

    /// Start loading `url` in the main frame
    fn load_url(&self, url: &str) -> Result<()>;
}
