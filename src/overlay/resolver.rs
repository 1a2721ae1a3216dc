//! Overlay view selection
//!
//! Picks what the overlay shows from the shared state snapshot and the
//! boundary's captured event. Most severe wins:
//!
//! 1. missing root layout tags
//! 2. build error
//! 3. runtime errors (a captured event replaces the reported list and opens fullscreen)
//! 4. static indicator
//! 5. nothing
//!
//! The static indicator is informational and is still shown next to the
//! runtime errors view; only the two full views suppress it.

use serde::{Deserialize, Serialize};

use crate::capture::ErrorEvent;
use crate::shared::{DebugInfo, OverlayState, VersionInfo};

/// How the runtime errors view presents itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayState {
    /// Covers the application
    Fullscreen,
    /// Collapsed into a corner badge
    #[default]
    Minimized,
    /// Dismissed by the developer
    Hidden,
}

/// Input for the runtime errors view
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeErrorsView {
    pub errors: Vec<ErrorEvent>,
    /// Initial display state for the view
    pub display: DisplayState,
    pub version_info: VersionInfo,
    pub has_static_indicator: bool,
    pub debug_info: Option<DebugInfo>,
}

/// The overlay chosen for one render pass
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    MissingTags {
        tags: Vec<String>,
    },
    BuildError {
        message: String,
        version_info: VersionInfo,
    },
    /// Runtime errors, with the static indicator alongside when
    /// `has_static_indicator` is set
    RuntimeErrors(RuntimeErrorsView),
    StaticIndicator,
    NoOverlay,
}

/// Individual views a resolution puts on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    MissingTags,
    BuildError,
    RuntimeErrors,
    StaticIndicator,
}

impl Resolution {
    /// Every view present, primary view first
    pub fn views(&self) -> Vec<ViewKind> {
        match self {
            Resolution::MissingTags { .. } => vec![ViewKind::MissingTags],
            Resolution::BuildError { .. } => vec![ViewKind::BuildError],
            Resolution::RuntimeErrors(view) if view.has_static_indicator => {
                vec![ViewKind::RuntimeErrors, ViewKind::StaticIndicator]
            }
            Resolution::RuntimeErrors(_) => vec![ViewKind::RuntimeErrors],
            Resolution::StaticIndicator => vec![ViewKind::StaticIndicator],
            Resolution::NoOverlay => Vec::new(),
        }
    }

    /// Whether the overlay covers the application
    pub fn is_blocking(&self) -> bool {
        match self {
            Resolution::MissingTags { .. } | Resolution::BuildError { .. } => true,
            Resolution::RuntimeErrors(view) => view.display == DisplayState::Fullscreen,
            Resolution::StaticIndicator | Resolution::NoOverlay => false,
        }
    }
}

/// Select the overlay for the current state and captured event
pub fn resolve(state: &OverlayState, captured: Option<&ErrorEvent>) -> Resolution {
    let missing_tags = Some(&state.root_layout_missing_tags).filter(|tags| !tags.is_empty());

    let runtime_errors = match captured {
        Some(event) => Some((vec![event.clone()], DisplayState::Fullscreen)),
        None if !state.errors.is_empty() => Some((state.errors.clone(), DisplayState::Minimized)),
        None => None,
    };

    match (
        missing_tags,
        state.build_error.as_deref(),
        runtime_errors,
        state.static_indicator,
    ) {
        (Some(tags), _, _, _) => Resolution::MissingTags { tags: tags.clone() },
        (None, Some(message), _, _) => Resolution::BuildError {
            message: message.to_string(),
            version_info: state.version_info.clone(),
        },
        (None, None, Some((errors, display)), has_static_indicator) => {
            Resolution::RuntimeErrors(RuntimeErrorsView {
                errors,
                display,
                version_info: state.version_info.clone(),
                has_static_indicator,
                debug_info: state.debug_info.clone(),
            })
        }
        (None, None, None, true) => Resolution::StaticIndicator,
        (None, None, None, false) => Resolution::NoOverlay,
    }
}
