//! Thrown errors and the structured events built from them

use serde::{Deserialize, Serialize};
use std::any::Any;
use std::backtrace::Backtrace;
use std::cell::RefCell;
use std::sync::Once;
use thiserror::Error;

use crate::capture::frame::StackFrame;

/// Identifier used for events captured by a boundary; only one can exist at a time
pub const CAPTURED_EVENT_ID: u64 = 0;

/// A value thrown while rendering: a message plus the stack text, if any
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{message}")]
pub struct ThrownError {
    /// Human readable message
    pub message: String,
    /// Raw stack text as produced by the thrower
    pub stack: Option<String>,
}

impl ThrownError {
    /// An error without location information
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            stack: None,
        }
    }

    /// An error carrying stack text
    pub fn with_stack(message: impl Into<String>, stack: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            stack: Some(stack.into()),
        }
    }

    /// An error whose stack is the current thread's backtrace
    pub fn capture_here(message: impl Into<String>) -> Self {
        Self::with_stack(message, Backtrace::force_capture().to_string())
    }

    /// Convert a panic payload caught by `catch_unwind`
    ///
    /// The stack is whatever the panic hook stashed for this thread, so a
    /// panic only carries a stack once [`install_panic_hook`] has run.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(text) = payload.downcast_ref::<&str>() {
            (*text).to_string()
        } else if let Some(text) = payload.downcast_ref::<String>() {
            text.clone()
        } else {
            "panic with non-string payload".to_string()
        };

        Self {
            message,
            stack: take_panic_backtrace(),
        }
    }

    /// Whether the error has usable stack text
    pub fn has_stack(&self) -> bool {
        self.stack
            .as_deref()
            .map(|stack| !stack.trim().is_empty())
            .unwrap_or(false)
    }
}

/// Which producer reported an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    /// Thrown synchronously while rendering or running a handler
    UnhandledException,
    /// Rejected asynchronous work nobody awaited
    UnhandledRejection,
}

/// One error shown to the developer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEvent {
    /// Sequence number; captured events use [`CAPTURED_EVENT_ID`]
    pub id: u64,
    /// Producer tag
    pub kind: ErrorKind,
    /// The original error
    pub reason: ThrownError,
    /// Parsed stack frames, possibly empty
    pub frames: Vec<StackFrame>,
}

impl ErrorEvent {
    pub fn new(id: u64, kind: ErrorKind, reason: ThrownError, frames: Vec<StackFrame>) -> Self {
        Self {
            id,
            kind,
            reason,
            frames,
        }
    }

    pub fn message(&self) -> &str {
        &self.reason.message
    }

    /// First frame pointing at application code, falling back to the first frame
    pub fn top_frame(&self) -> Option<&StackFrame> {
        self.frames
            .iter()
            .find(|frame| !frame.is_internal())
            .or_else(|| self.frames.first())
    }

    /// Whether two events describe the same failure
    pub fn same_failure(&self, other: &ErrorEvent) -> bool {
        self.reason.message == other.reason.message && self.reason.stack == other.reason.stack
    }
}

thread_local! {
    static LAST_PANIC_BACKTRACE: RefCell<Option<String>> = const { RefCell::new(None) };
}

static PANIC_HOOK: Once = Once::new();

/// Install a panic hook that records a backtrace for the panicking thread
///
/// The previous hook still runs afterwards. Calling this more than once has no
/// further effect.
pub fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let backtrace = Backtrace::force_capture().to_string();
            LAST_PANIC_BACKTRACE.with(|slot| *slot.borrow_mut() = Some(backtrace));
            previous(info);
        }));
    });
}

/// Take the backtrace stashed by the most recent panic on this thread
pub fn take_panic_backtrace() -> Option<String> {
    LAST_PANIC_BACKTRACE.with(|slot| slot.borrow_mut().take())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_stack() {
        assert!(!ThrownError::new("boom").has_stack());
        assert!(!ThrownError::with_stack("boom", "  \n").has_stack());
        assert!(ThrownError::with_stack("boom", "at f (a.rs:1:1)").has_stack());
        assert!(ThrownError::capture_here("boom").has_stack());
    }

    #[test]
    fn test_from_panic_payloads() {
        let from_str = ThrownError::from_panic(Box::new("static message"));
        assert_eq!(from_str.message, "static message");

        let from_string = ThrownError::from_panic(Box::new(String::from("owned message")));
        assert_eq!(from_string.message, "owned message");

        let other = ThrownError::from_panic(Box::new(42_u32));
        assert_eq!(other.message, "panic with non-string payload");
    }

    #[test]
    fn test_panic_hook_stashes_backtrace() {
        install_panic_hook();
        let payload = std::panic::catch_unwind(|| panic!("hooked")).unwrap_err();

        let error = ThrownError::from_panic(payload);
        assert_eq!(error.message, "hooked");
        assert!(error.has_stack());
        // Consumed by the conversion above
        assert!(take_panic_backtrace().is_none());
    }

    #[test]
    fn test_top_frame_skips_internal() {
        let event = ErrorEvent::new(
            1,
            ErrorKind::UnhandledException,
            ThrownError::with_stack("boom", "stack"),
            vec![
                StackFrame::new("core::panicking::panic"),
                StackFrame::new("demo::render").at("src/app.rs", 3, 5),
            ],
        );
        assert_eq!(event.top_frame().map(|f| f.method_name.as_str()), Some("demo::render"));

        let internal_only = ErrorEvent::new(
            2,
            ErrorKind::UnhandledException,
            ThrownError::new("boom"),
            vec![StackFrame::new("std::rt::lang_start")],
        );
        assert_eq!(
            internal_only.top_frame().map(|f| f.method_name.as_str()),
            Some("std::rt::lang_start")
        );
    }

    #[test]
    fn test_event_serializes_kind() {
        let event =
            ErrorEvent::new(0, ErrorKind::UnhandledException, ThrownError::new("x"), vec![]);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"], "unhandled-exception");
        assert_eq!(json["reason"]["message"], "x");
    }
}
