//! Presentation model for the loading overlay.
//!
//! The host draws the branded animation, text and colors; this module only
//! decides *what* is shown for a given [`LoadStatus`]:
//!
//! | Status | Web view | Indicator |
//! |---|---|---|
//! | Standby | dimmed | none |
//! | Progressing | dimmed | full-screen loading animation with `Loading N%` |
//! | Finished | opaque | none |
//! | Failure | dimmed | `Error: <reason>` |
//! | NoConnection | dimmed | `No connection` |

use core_runtime::config::OverlayAppearance;
use serde::Serialize;

use crate::status::LoadStatus;

/// What the host should draw over the web view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OverlayIndicator {
    Hidden,
    /// Full-screen loading animation
    Loading { progress: f64, percent: u8 },
    Error { message: String },
    Offline,
}

impl OverlayIndicator {
    /// Text shown alongside the indicator, if any.
    pub fn label(&self) -> Option<String> {
        match self {
            OverlayIndicator::Hidden => None,
            OverlayIndicator::Loading { percent, .. } => Some(format!("Loading {}%", percent)),
            OverlayIndicator::Error { message } => Some(format!("Error: {}", message)),
            OverlayIndicator::Offline => Some("No connection".to_string()),
        }
    }

    /// Whether the indicator hides the page completely.
    pub fn covers_content(&self) -> bool {
        matches!(self, OverlayIndicator::Loading { .. })
    }
}

/// Complete overlay description for one status.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayState {
    pub web_view_opacity: f64,
    pub indicator: OverlayIndicator,
}

impl OverlayState {
    pub fn from_status(status: &LoadStatus, appearance: &OverlayAppearance) -> Self {
        let web_view_opacity = if status.is_successful() {
            appearance.loaded_opacity
        } else {
            appearance.dimmed_opacity
        };

        let indicator = match status {
            LoadStatus::Standby | LoadStatus::Finished => OverlayIndicator::Hidden,
            LoadStatus::Progressing { progress } => OverlayIndicator::Loading {
                progress: *progress,
                percent: status.percent().unwrap_or_default(),
            },
            LoadStatus::Failure { reason } => OverlayIndicator::Error {
                message: reason.clone(),
            },
            LoadStatus::NoConnection => OverlayIndicator::Offline,
        };

        Self {
            web_view_opacity,
            indicator,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overlay(status: LoadStatus) -> OverlayState {
        OverlayState::from_status(&status, &OverlayAppearance::default())
    }

    #[test]
    fn test_finished_shows_page() {
        let state = overlay(LoadStatus::finished());

        assert_eq!(state.web_view_opacity, 1.0);
        assert_eq!(state.indicator, OverlayIndicator::Hidden);
        assert_eq!(state.indicator.label(), None);
    }

    #[test]
    fn test_standby_is_dimmed_without_indicator() {
        let state = overlay(LoadStatus::standby());

        assert_eq!(state.web_view_opacity, 0.5);
        assert_eq!(state.indicator, OverlayIndicator::Hidden);
    }

    #[test]
    fn test_progress_covers_content() {
        let state = overlay(LoadStatus::progressing(0.42));

        assert_eq!(state.web_view_opacity, 0.5);
        assert!(state.indicator.covers_content());
        assert_eq!(state.indicator.label().as_deref(), Some("Loading 42%"));
    }

    #[test]
    fn test_failure_and_offline_labels() {
        let failed = overlay(LoadStatus::failure("The request timed out."));
        assert_eq!(
            failed.indicator.label().as_deref(),
            Some("Error: The request timed out.")
        );
        assert!(!failed.indicator.covers_content());

        let offline = overlay(LoadStatus::no_connection());
        assert_eq!(offline.indicator, OverlayIndicator::Offline);
        assert_eq!(offline.indicator.label().as_deref(), Some("No connection"));
    }

    #[test]
    fn test_custom_appearance() {
        let appearance = OverlayAppearance::default()
            .with_loaded_opacity(0.9)
            .with_dimmed_opacity(0.2);

        let loading = OverlayState::from_status(&LoadStatus::progressing(0.1), &appearance);
        let done = OverlayState::from_status(&LoadStatus::finished(), &appearance);

        assert_eq!(loading.web_view_opacity, 0.2);
        assert_eq!(done.web_view_opacity, 0.9);
    }

    #[test]
    fn test_indicator_serialization() {
        let json = serde_json::to_string(&OverlayIndicator::Loading {
            progress: 0.5,
            percent: 50,
        })
        .unwrap();

        assert_eq!(json, r#"{"kind":"loading","progress":0.5,"percent":50}"#);
    }
}
