//! Shared state and messaging between the host application and the overlay
//!
//! This module provides the overlay state the host owns, the actions that
//! update it, and the process-wide runtime error flag.

pub mod flag;
pub mod messages;
pub mod state;

pub use flag::RuntimeErrorFlag;
pub use messages::{Dispatcher, OverlayAction};
pub use state::{DebugInfo, OverlayState, RefreshState, Staleness, VersionInfo};

use parking_lot::RwLock;
use std::sync::Arc;

/// Overlay state as held by the host
pub type SharedOverlayState = Arc<RwLock<OverlayState>>;

/// Create empty shared overlay state
pub fn new_shared_state() -> SharedOverlayState {
    Arc::new(RwLock::new(OverlayState::default()))
}

/// Take the per-render-pass snapshot of the shared state
pub fn snapshot(state: &SharedOverlayState) -> OverlayState {
    state.read().clone()
}
