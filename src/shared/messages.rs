//! Actions delivered over the build/dev-server channel

use crossbeam_channel::{unbounded, Receiver, Sender};
use tracing::debug;

use crate::capture::{StackFrame, ThrownError};
use crate::shared::state::{DebugInfo, VersionInfo};

/// Messages that update the shared overlay state
#[derive(Debug, Clone)]
pub enum OverlayAction {
    /// The last build succeeded
    BuildOk,
    /// The build failed with the given compiler output
    BuildError(String),
    /// A refresh is about to be applied
    BeforeRefresh,
    /// A refresh has been applied
    Refresh,
    /// An exception escaped a handler outside any boundary
    UnhandledError {
        reason: ThrownError,
        frames: Vec<StackFrame>,
    },
    /// Asynchronous work failed and nobody handled it
    UnhandledRejection {
        reason: ThrownError,
        frames: Vec<StackFrame>,
    },
    VersionInfo(VersionInfo),
    /// Show or hide the static page indicator
    StaticIndicator(bool),
    DebugInfo(DebugInfo),
    /// Tags the root layout failed to render
    RootLayoutMissingTags(Vec<String>),
}

/// Cloneable handle for sending overlay actions
#[derive(Debug, Clone)]
pub struct Dispatcher {
    sender: Sender<OverlayAction>,
}

impl Dispatcher {
    /// Create a dispatcher and the receiver the state owner drains
    pub fn channel() -> (Self, Receiver<OverlayAction>) {
        let (sender, receiver) = unbounded();
        (Self { sender }, receiver)
    }

    /// Wrap an existing sender
    pub fn from_sender(sender: Sender<OverlayAction>) -> Self {
        Self { sender }
    }

    /// Send an action; a dropped receiver is not an error for the sender
    pub fn dispatch(&self, action: OverlayAction) {
        if self.sender.send(action).is_err() {
            debug!("Overlay action dropped, receiver is gone");
        }
    }

    pub fn on_build_ok(&self) {
        self.dispatch(OverlayAction::BuildOk);
    }

    pub fn on_build_error(&self, message: impl Into<String>) {
        self.dispatch(OverlayAction::BuildError(message.into()));
    }

    pub fn on_before_refresh(&self) {
        self.dispatch(OverlayAction::BeforeRefresh);
    }

    pub fn on_refresh(&self) {
        self.dispatch(OverlayAction::Refresh);
    }

    pub fn on_unhandled_error(&self, reason: ThrownError, frames: Vec<StackFrame>) {
        self.dispatch(OverlayAction::UnhandledError { reason, frames });
    }

    pub fn on_unhandled_rejection(&self, reason: ThrownError, frames: Vec<StackFrame>) {
        self.dispatch(OverlayAction::UnhandledRejection { reason, frames });
    }

    pub fn on_version_info(&self, info: VersionInfo) {
        self.dispatch(OverlayAction::VersionInfo(info));
    }

    pub fn on_static_indicator(&self, visible: bool) {
        self.dispatch(OverlayAction::StaticIndicator(visible));
    }

    pub fn on_debug_info(&self, info: DebugInfo) {
        self.dispatch(OverlayAction::DebugInfo(info));
    }

    pub fn on_root_layout_missing_tags(&self, tags: Vec<String>) {
        self.dispatch(OverlayAction::RootLayoutMissingTags(tags));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatcher_delivers_in_order() {
        let (dispatcher, receiver) = Dispatcher::channel();
        dispatcher.on_build_error("boom");
        dispatcher.clone().on_static_indicator(false);

        assert!(matches!(receiver.try_recv(), Ok(OverlayAction::BuildError(m)) if m == "boom"));
        assert!(matches!(receiver.try_recv(), Ok(OverlayAction::StaticIndicator(false))));
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn test_dispatch_after_receiver_dropped() {
        let (dispatcher, receiver) = Dispatcher::channel();
        drop(receiver);
        // Must not panic
        dispatcher.on_build_ok();
    }
}
