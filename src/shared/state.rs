//! Overlay state shared between the host application and the overlay
//!
//! The host owns the state (usually behind `Arc<RwLock<_>>`) and feeds it
//! actions from the build/dev-server channel. The overlay only ever reads a
//! snapshot of it, once per render pass.

use crossbeam_channel::Receiver;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::capture::{ErrorEvent, ErrorKind};
use crate::shared::messages::OverlayAction;

/// How far the running toolkit version is behind the latest release
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Staleness {
    Fresh,
    StalePatch,
    StaleMinor,
    StaleMajor,
    StalePrerelease,
    Newer,
    #[default]
    Unknown,
}

impl Staleness {
    pub fn label(&self) -> &'static str {
        match self {
            Staleness::Fresh => "up to date",
            Staleness::StalePatch => "patch update available",
            Staleness::StaleMinor => "minor update available",
            Staleness::StaleMajor => "major update available",
            Staleness::StalePrerelease => "newer prerelease available",
            Staleness::Newer => "newer than latest release",
            Staleness::Unknown => "version status unknown",
        }
    }

    /// Whether a newer release than the installed one exists
    pub fn is_stale(&self) -> bool {
        matches!(
            self,
            Staleness::StalePatch
                | Staleness::StaleMinor
                | Staleness::StaleMajor
                | Staleness::StalePrerelease
        )
    }
}

/// Version metadata displayed alongside build and runtime errors
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VersionInfo {
    /// Installed version, if known
    pub installed: Option<String>,
    pub staleness: Staleness,
}

/// Opaque debugging metadata passed through to the runtime errors view
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DebugInfo(pub serde_json::Value);

/// Whether a refresh is in flight
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RefreshState {
    #[default]
    Idle,
    /// Errors reported while refreshing, applied when the refresh lands
    Pending { errors: Vec<ErrorEvent> },
}

/// Shared overlay state
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayState {
    /// Id assigned to the next reported runtime error
    pub next_id: u64,
    /// Present while the build is broken
    pub build_error: Option<String>,
    /// Runtime errors reported through the channel, oldest first
    pub errors: Vec<ErrorEvent>,
    pub refresh_state: RefreshState,
    /// The current page was statically rendered
    pub static_indicator: bool,
    /// Required document tags missing from the root layout
    pub root_layout_missing_tags: Vec<String>,
    pub debug_info: Option<DebugInfo>,
    pub version_info: VersionInfo,
}

impl Default for OverlayState {
    fn default() -> Self {
        Self {
            next_id: 1,
            build_error: None,
            errors: Vec::new(),
            refresh_state: RefreshState::Idle,
            static_indicator: false,
            root_layout_missing_tags: Vec::new(),
            debug_info: None,
            version_info: VersionInfo::default(),
        }
    }
}

impl OverlayState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one action from the channel
    pub fn apply(&mut self, action: OverlayAction) {
        match action {
            OverlayAction::BuildOk => self.build_error = None,
            OverlayAction::BuildError(message) => self.build_error = Some(message),
            OverlayAction::BeforeRefresh => {
                self.refresh_state = RefreshState::Pending { errors: Vec::new() };
            }
            OverlayAction::Refresh => {
                self.build_error = None;
                self.errors = match std::mem::take(&mut self.refresh_state) {
                    RefreshState::Pending { errors } => errors,
                    RefreshState::Idle => Vec::new(),
                };
            }
            OverlayAction::UnhandledError { reason, frames } => {
                self.push_error(ErrorKind::UnhandledException, reason, frames);
            }
            OverlayAction::UnhandledRejection { reason, frames } => {
                self.push_error(ErrorKind::UnhandledRejection, reason, frames);
            }
            OverlayAction::VersionInfo(info) => self.version_info = info,
            OverlayAction::StaticIndicator(visible) => self.static_indicator = visible,
            OverlayAction::DebugInfo(info) => self.debug_info = Some(info),
            OverlayAction::RootLayoutMissingTags(tags) => self.root_layout_missing_tags = tags,
        }
    }

    /// Apply every action currently queued on the receiver. Returns how many were applied.
    pub fn drain(&mut self, receiver: &Receiver<OverlayAction>) -> usize {
        let mut applied = 0;
        while let Ok(action) = receiver.try_recv() {
            self.apply(action);
            applied += 1;
        }
        if applied > 0 {
            debug!("Applied {} overlay action(s)", applied);
        }
        applied
    }

    /// Whether nothing would be shown by the overlay
    pub fn is_clear(&self) -> bool {
        self.build_error.is_none()
            && self.errors.is_empty()
            && !self.static_indicator
            && self.root_layout_missing_tags.is_empty()
    }

    fn push_error(
        &mut self,
        kind: ErrorKind,
        reason: crate::capture::ThrownError,
        frames: Vec<crate::capture::StackFrame>,
    ) {
        let event = ErrorEvent::new(self.next_id, kind, reason, frames);
        self.next_id += 1;

        let target = match &mut self.refresh_state {
            RefreshState::Pending { errors } => errors,
            RefreshState::Idle => &mut self.errors,
        };
        // A repeat of a known failure moves to the end instead of stacking up
        target.retain(|existing| !existing.same_failure(&event));
        target.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::{StackFrame, ThrownError};

    fn unhandled(message: &str) -> OverlayAction {
        OverlayAction::UnhandledError {
            reason: ThrownError::with_stack(message, format!("at f ({}.rs:1:1)", message)),
            frames: vec![StackFrame::new("f").at(format!("{}.rs", message), 1, 1)],
        }
    }

    #[test]
    fn test_default_state_is_clear() {
        let state = OverlayState::default();
        assert!(state.is_clear());
        assert_eq!(state.next_id, 1);
        assert_eq!(state.refresh_state, RefreshState::Idle);
    }

    #[test]
    fn test_build_error_lifecycle() {
        let mut state = OverlayState::new();
        state.apply(OverlayAction::BuildError("Module not found".into()));
        assert_eq!(state.build_error.as_deref(), Some("Module not found"));

        state.apply(OverlayAction::BuildOk);
        assert!(state.build_error.is_none());
    }

    #[test]
    fn test_unhandled_errors_get_sequential_ids() {
        let mut state = OverlayState::new();
        state.apply(unhandled("a"));
        state.apply(OverlayAction::UnhandledRejection {
            reason: ThrownError::new("rejected"),
            frames: vec![],
        });

        assert_eq!(state.errors.len(), 2);
        assert_eq!(state.errors[0].id, 1);
        assert_eq!(state.errors[1].id, 2);
        assert_eq!(state.errors[1].kind, ErrorKind::UnhandledRejection);
        assert_eq!(state.next_id, 3);
    }

    #[test]
    fn test_duplicate_errors_are_collapsed() {
        let mut state = OverlayState::new();
        state.apply(unhandled("a"));
        state.apply(unhandled("b"));
        state.apply(unhandled("a"));

        let messages: Vec<_> = state.errors.iter().map(|e| e.message()).collect();
        assert_eq!(messages, vec!["b", "a"]);
        assert_eq!(state.errors[1].id, 3);
    }

    #[test]
    fn test_refresh_replaces_errors_with_buffered_ones() {
        let mut state = OverlayState::new();
        state.apply(unhandled("old"));
        state.apply(OverlayAction::BuildError("broken".into()));

        state.apply(OverlayAction::BeforeRefresh);
        state.apply(unhandled("during"));
        // Buffered until the refresh lands
        assert_eq!(state.errors.len(), 1);
        assert_eq!(state.errors[0].message(), "old");

        state.apply(OverlayAction::Refresh);
        assert_eq!(state.refresh_state, RefreshState::Idle);
        assert!(state.build_error.is_none());
        assert_eq!(state.errors.len(), 1);
        assert_eq!(state.errors[0].message(), "during");
    }

    #[test]
    fn test_refresh_without_pending_clears_errors() {
        let mut state = OverlayState::new();
        state.apply(unhandled("stale"));
        state.apply(OverlayAction::Refresh);
        assert!(state.errors.is_empty());
        assert_eq!(state.refresh_state, RefreshState::Idle);
    }

    #[test]
    fn test_staleness_is_stale() {
        assert!(Staleness::StaleMajor.is_stale());
        assert!(Staleness::StalePrerelease.is_stale());
        assert!(!Staleness::Fresh.is_stale());
        assert!(!Staleness::Newer.is_stale());
        assert!(!Staleness::Unknown.is_stale());
    }

    #[test]
    fn test_passthrough_fields() {
        let mut state = OverlayState::new();
        state.apply(OverlayAction::StaticIndicator(true));
        state.apply(OverlayAction::RootLayoutMissingTags(vec!["html".into(), "body".into()]));
        state.apply(OverlayAction::VersionInfo(VersionInfo {
            installed: Some("1.2.3".into()),
            staleness: Staleness::StaleMinor,
        }));
        state.apply(OverlayAction::DebugInfo(DebugInfo(serde_json::json!({ "port": 9229 }))));

        assert!(state.static_indicator);
        assert_eq!(state.root_layout_missing_tags, vec!["html", "body"]);
        assert_eq!(state.version_info.installed.as_deref(), Some("1.2.3"));
        assert_eq!(state.debug_info.as_ref().unwrap().0["port"], 9229);
        assert!(!state.is_clear());
    }

    #[test]
    fn test_drain_applies_queued_actions() {
        let (sender, receiver) = crossbeam_channel::unbounded();
        sender.send(OverlayAction::BuildError("x".into())).unwrap();
        sender.send(OverlayAction::StaticIndicator(true)).unwrap();

        let mut state = OverlayState::new();
        assert_eq!(state.drain(&receiver), 2);
        assert_eq!(state.drain(&receiver), 0);
        assert!(state.static_indicator);
        assert!(state.build_error.is_some());
    }

    #[test]
    fn test_staleness_serializes_kebab_case() {
        let json = serde_json::to_string(&Staleness::StaleMajor).unwrap();
        assert_eq!(json, "\"stale-major\"");
    }
}
