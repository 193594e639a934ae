//! # Core Web View Module
//!
//! Page load tracking for the embedded web view:
//! - [`LoadStatus`]: the value the loading overlay renders from
//! - [`NavigationMapper`]: turns engine lifecycle callbacks into statuses
//! - [`OverlayState`]: what the host draws for a given status
//! - [`WebLoader`]: owns the current status for one web view and publishes
//!   changes on an event bus
//!
//! ## Flow
//!
//! ```text
//! host web view ──callbacks──> NavigationMapper ──LoadStatus──> WebLoader
//!                                                                 │
//!                                        overlay() / subscribe() <┘
//! ```

pub mod error;
pub mod loader;
pub mod mapper;
pub mod overlay;
pub mod status;

pub use error::{Result, WebViewError};
pub use loader::WebLoader;
pub use mapper::NavigationMapper;
pub use overlay::{OverlayIndicator, OverlayState};
pub use status::{LoadStatus, PROGRESS_TOLERANCE};
