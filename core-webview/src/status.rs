//! # Load Status Model
//!
//! [`LoadStatus`] is the single value describing where the embedded page is in
//! its load cycle. The overlay UI renders directly from it.
//!
//! ```text
//!            start              finish
//! Standby ──────────> Progressing ─────────> Finished
//!                          │
//!                          │ fail
//!                          └───────────────> Failure(reason)
//!
//! any state ── network lost ──> NoConnection
//! ```
//!
//! Values are immutable; every lifecycle event produces a fresh one that
//! replaces the previous value. No history is kept.
//!
//! ## Equality
//!
//! Two `Progressing` values are equal when their fractions differ by less than
//! [`PROGRESS_TOLERANCE`], so float noise from the engine does not register as
//! a change. `Failure` values compare their reasons exactly. Values of
//! different variants are never equal.

use core_runtime::events::{CoreEvent, EventSeverity};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Largest difference between two progress fractions still treated as equal.
pub const PROGRESS_TOLERANCE: f64 = 1e-4;

/// Page load state.
///
/// Construct through the associated functions so the progress invariant
/// (`0.0 <= progress <= 1.0`) holds:
///
/// ```
/// use core_webview::LoadStatus;
///
/// let status = LoadStatus::progressing(1.7);
/// assert_eq!(status.progress(), Some(1.0));
/// assert!(LoadStatus::failure("offline").has_error());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LoadStatus {
    /// Nothing has started loading yet
    #[default]
    Standby,
    /// A page load is underway
    Progressing {
        #[serde(deserialize_with = "deserialize_progress")]
        progress: f64,
    },
    /// The page loaded successfully
    Finished,
    /// The page failed to load
    Failure { reason: String },
    /// No network path is available
    NoConnection,
}

impl LoadStatus {
    pub fn standby() -> Self {
        LoadStatus::Standby
    }

    /// A load in progress. `progress` is clamped to `[0, 1]`; NaN becomes 0.
    pub fn progressing(progress: f64) -> Self {
        LoadStatus::Progressing {
            progress: clamp_progress(progress),
        }
    }

    pub fn finished() -> Self {
        LoadStatus::Finished
    }

    pub fn failure(reason: impl Into<String>) -> Self {
        LoadStatus::Failure {
            reason: reason.into(),
        }
    }

    pub fn no_connection() -> Self {
        LoadStatus::NoConnection
    }

    /// Progress fraction, only while a load is underway.
    pub fn progress(&self) -> Option<f64> {
        match self {
            LoadStatus::Progressing { progress } => Some(*progress),
            _ => None,
        }
    }

    /// Progress as a whole percentage (truncated), only while loading.
    pub fn percent(&self) -> Option<u8> {
        self.progress().map(|p| (p * 100.0) as u8)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadStatus::Progressing { .. })
    }

    pub fn is_successful(&self) -> bool {
        matches!(self, LoadStatus::Finished)
    }

    /// True for `Failure` and `NoConnection`.
    pub fn has_error(&self) -> bool {
        matches!(self, LoadStatus::Failure { .. } | LoadStatus::NoConnection)
    }

    /// Failure reason, only for `Failure`.
    pub fn error_reason(&self) -> Option<&str> {
        match self {
            LoadStatus::Failure { reason } => Some(reason.as_str()),
            _ => None,
        }
    }

    /// Variant-aware comparison: progress within [`PROGRESS_TOLERANCE`],
    /// failure reasons exactly, everything else by variant.
    pub fn is_equivalent(&self, other: &LoadStatus) -> bool {
        match (self, other) {
            (LoadStatus::Standby, LoadStatus::Standby)
            | (LoadStatus::Finished, LoadStatus::Finished)
            | (LoadStatus::NoConnection, LoadStatus::NoConnection) => true,
            (LoadStatus::Progressing { progress: a }, LoadStatus::Progressing { progress: b }) => {
                (a - b).abs() < PROGRESS_TOLERANCE
            }
            (LoadStatus::Failure { reason: a }, LoadStatus::Failure { reason: b }) => a == b,
            _ => false,
        }
    }
}

impl PartialEq for LoadStatus {
    fn eq(&self, other: &Self) -> bool {
        self.is_equivalent(other)
    }
}

impl fmt::Display for LoadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadStatus::Standby => write!(f, "Standby"),
            LoadStatus::Progressing { .. } => {
                write!(f, "Loading ({}%)", self.percent().unwrap_or_default())
            }
            LoadStatus::Finished => write!(f, "Finished"),
            LoadStatus::Failure { reason } => write!(f, "Failure ({})", reason),
            LoadStatus::NoConnection => write!(f, "No connection"),
        }
    }
}

impl CoreEvent for LoadStatus {
    fn description(&self) -> &str {
        match self {
            LoadStatus::Standby => "Waiting for navigation",
            LoadStatus::Progressing { .. } => "Page loading",
            LoadStatus::Finished => "Page loaded",
            LoadStatus::Failure { .. } => "Page failed to load",
            LoadStatus::NoConnection => "No network connection",
        }
    }

    fn severity(&self) -> EventSeverity {
        match self {
            LoadStatus::Failure { .. } => EventSeverity::Error,
            LoadStatus::NoConnection => EventSeverity::Warning,
            LoadStatus::Finished => EventSeverity::Info,
            LoadStatus::Standby | LoadStatus::Progressing { .. } => EventSeverity::Debug,
        }
    }
}

fn clamp_progress(progress: f64) -> f64 {
    if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 1.0)
    }
}

fn deserialize_progress<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    f64::deserialize(deserializer).map(clamp_progress)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_variants() -> Vec<LoadStatus> {
        vec![
            LoadStatus::standby(),
            LoadStatus::progressing(0.3),
            LoadStatus::finished(),
            LoadStatus::failure("timeout"),
            LoadStatus::no_connection(),
        ]
    }

    #[test]
    fn test_default_is_standby() {
        assert_eq!(LoadStatus::default(), LoadStatus::Standby);
    }

    #[test]
    fn test_progress_is_clamped() {
        assert_eq!(LoadStatus::progressing(-0.5).progress(), Some(0.0));
        assert_eq!(LoadStatus::progressing(3.0).progress(), Some(1.0));
        assert_eq!(LoadStatus::progressing(f64::NAN).progress(), Some(0.0));
        assert_eq!(LoadStatus::progressing(0.42).progress(), Some(0.42));
    }

    #[test]
    fn test_progress_equivalence_uses_tolerance() {
        let base = LoadStatus::progressing(0.5);

        assert!(base.is_equivalent(&LoadStatus::progressing(0.50005)));
        assert!(base.is_equivalent(&LoadStatus::progressing(0.49995)));
        assert!(!base.is_equivalent(&LoadStatus::progressing(0.5002)));
        assert!(!base.is_equivalent(&LoadStatus::progressing(0.6)));
    }

    #[test]
    fn test_failure_equivalence_is_exact() {
        assert_eq!(LoadStatus::failure("timeout"), LoadStatus::failure("timeout"));
        assert_ne!(LoadStatus::failure("timeout"), LoadStatus::failure("Timeout"));
        assert_ne!(LoadStatus::failure("timeout"), LoadStatus::failure("timeout "));
    }

    #[test]
    fn test_different_variants_never_equivalent() {
        let variants = all_variants();
        for (i, a) in variants.iter().enumerate() {
            for (j, b) in variants.iter().enumerate() {
                assert_eq!(a.is_equivalent(b), i == j, "{} vs {}", a, b);
            }
        }
    }

    #[test]
    fn test_accessors_per_variant() {
        for status in all_variants() {
            assert_eq!(status.progress().is_some(), status.is_loading());
            assert_eq!(
                status.error_reason().is_some(),
                matches!(status, LoadStatus::Failure { .. })
            );
            assert_eq!(status.is_successful(), status == LoadStatus::Finished);
        }

        assert!(LoadStatus::no_connection().has_error());
        assert!(LoadStatus::failure("x").has_error());
        assert!(!LoadStatus::finished().has_error());
        assert!(!LoadStatus::progressing(0.1).has_error());
        assert_eq!(LoadStatus::no_connection().error_reason(), None);
    }

    #[test]
    fn test_percent_truncates() {
        assert_eq!(LoadStatus::progressing(0.42).percent(), Some(42));
        assert_eq!(LoadStatus::progressing(0.999).percent(), Some(99));
        assert_eq!(LoadStatus::progressing(1.0).percent(), Some(100));
        assert_eq!(LoadStatus::finished().percent(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(LoadStatus::standby().to_string(), "Standby");
        assert_eq!(LoadStatus::progressing(0.42).to_string(), "Loading (42%)");
        assert_eq!(LoadStatus::finished().to_string(), "Finished");
        assert_eq!(
            LoadStatus::failure("The request timed out.").to_string(),
            "Failure (The request timed out.)"
        );
        assert_eq!(LoadStatus::no_connection().to_string(), "No connection");
    }

    #[test]
    fn test_severity() {
        assert_eq!(LoadStatus::failure("x").severity(), EventSeverity::Error);
        assert_eq!(LoadStatus::no_connection().severity(), EventSeverity::Warning);
        assert_eq!(LoadStatus::finished().severity(), EventSeverity::Info);
        assert_eq!(LoadStatus::progressing(0.2).severity(), EventSeverity::Debug);
        assert_eq!(LoadStatus::finished().description(), "Page loaded");
    }

    #[test]
    fn test_serialization_shape() {
        let json = serde_json::to_string(&LoadStatus::failure("timeout")).unwrap();
        assert_eq!(json, r#"{"status":"failure","reason":"timeout"}"#);

        let json = serde_json::to_string(&LoadStatus::no_connection()).unwrap();
        assert_eq!(json, r#"{"status":"no_connection"}"#);
    }

    #[test]
    fn test_deserialization_clamps_progress() {
        let status: LoadStatus =
            serde_json::from_str(r#"{"status":"progressing","progress":4.2}"#).unwrap();
        assert_eq!(status.progress(), Some(1.0));
    }
}
