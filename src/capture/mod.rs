//! Render Failure Capture
//!
//! The boundary wraps a renderable region. Rendering the region either
//! succeeds, or fails by returning a [`ThrownError`] or panicking; a failure
//! with stack text becomes the boundary's single captured [`ErrorEvent`] and
//! raises the process-wide [`RuntimeErrorFlag`]. Nothing escapes the boundary.

pub mod event;
pub mod frame;

pub use event::{
    install_panic_hook, take_panic_backtrace, ErrorEvent, ErrorKind, ThrownError,
    CAPTURED_EVENT_ID,
};
pub use frame::{DefaultStackParser, StackFrame, StackParseError, StackParser};

use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::{debug, info, warn};

use crate::shared::RuntimeErrorFlag;

/// Result of one render attempt of a wrapped region
#[derive(Debug, Clone, PartialEq)]
pub enum RenderOutcome<T = ()> {
    /// The region rendered normally
    Rendered(T),
    /// The region failed; holds the captured event, or `None` when the error
    /// had no stack and nothing displayable was produced
    Failed(Option<ErrorEvent>),
}

impl<T> RenderOutcome<T> {
    pub fn is_failed(&self) -> bool {
        matches!(self, RenderOutcome::Failed(_))
    }
}

/// Error capture boundary around a renderable region
pub struct ErrorCaptureBoundary {
    captured: Option<ErrorEvent>,
    flag: RuntimeErrorFlag,
    parser: Box<dyn StackParser>,
}

impl ErrorCaptureBoundary {
    /// Create a boundary using the default stack parser
    pub fn new(flag: RuntimeErrorFlag) -> Self {
        Self::with_parser(flag, DefaultStackParser)
    }

    /// Create a boundary with a custom stack parser
    pub fn with_parser(flag: RuntimeErrorFlag, parser: impl StackParser + 'static) -> Self {
        Self {
            captured: None,
            flag,
            parser: Box::new(parser),
        }
    }

    /// Render the wrapped region
    ///
    /// While an event is captured the region is not rendered again; the
    /// caller is expected to show its fallback container instead.
    pub fn render<T>(
        &mut self,
        content: impl FnOnce() -> Result<T, ThrownError>,
    ) -> RenderOutcome<T> {
        if let Some(event) = &self.captured {
            return RenderOutcome::Failed(Some(event.clone()));
        }

        let error = match catch_unwind(AssertUnwindSafe(content)) {
            Ok(Ok(value)) => return RenderOutcome::Rendered(value),
            Ok(Err(error)) => error,
            Err(payload) => ThrownError::from_panic(payload),
        };

        RenderOutcome::Failed(self.capture(error).cloned())
    }

    /// Convert a thrown error into the captured event
    ///
    /// Errors without stack text leave the boundary with no captured event
    /// and do not touch the runtime error flag.
    pub fn capture(&mut self, error: ThrownError) -> Option<&ErrorEvent> {
        let Some(stack) = error.stack.as_deref().filter(|_| error.has_stack()) else {
            debug!("Render failed without a stack, not surfacing: {}", error.message);
            self.captured = None;
            return None;
        };

        if self.flag.raise() {
            info!("First runtime error recorded for this process");
        }

        let frames = self.parse_frames(stack);
        info!(
            "Captured render error: {} ({} frame(s))",
            error.message,
            frames.len()
        );

        self.captured = Some(ErrorEvent::new(
            CAPTURED_EVENT_ID,
            ErrorKind::UnhandledException,
            error,
            frames,
        ));
        self.captured.as_ref()
    }

    /// Parse stack text; any parser failure, including a panic, yields no frames
    fn parse_frames(&self, stack: &str) -> Vec<StackFrame> {
        match catch_unwind(AssertUnwindSafe(|| self.parser.parse(stack))) {
            Ok(Ok(frames)) => frames,
            Ok(Err(e)) => {
                debug!("Stack parse failed, using no frames: {}", e);
                Vec::new()
            }
            Err(_) => {
                warn!("Stack parser panicked, using no frames");
                Vec::new()
            }
        }
    }

    /// The currently captured event, if any
    pub fn captured(&self) -> Option<&ErrorEvent> {
        self.captured.as_ref()
    }

    /// Discard the captured event so the region renders again
    pub fn reset(&mut self) {
        if self.captured.take().is_some() {
            info!("Error boundary recovered");
        }
    }

    /// Handle to the shared runtime error flag
    pub fn flag(&self) -> &RuntimeErrorFlag {
        &self.flag
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STACK: &str = "   0: demo::render\n             at ./src/app.rs:10:5\n   1: main\n";

    struct PanickingParser;

    impl StackParser for PanickingParser {
        fn parse(&self, _stack: &str) -> Result<Vec<StackFrame>, StackParseError> {
            panic!("parser bug")
        }
    }

    struct FailingParser;

    impl StackParser for FailingParser {
        fn parse(&self, _stack: &str) -> Result<Vec<StackFrame>, StackParseError> {
            Err(StackParseError::NoFrames { lines: 1 })
        }
    }

    #[test]
    fn test_capture_with_stack() {
        let flag = RuntimeErrorFlag::new();
        let mut boundary = ErrorCaptureBoundary::new(flag.clone());

        let event = boundary
            .capture(ThrownError::with_stack("boom", STACK))
            .cloned()
            .unwrap();

        assert_eq!(event.id, CAPTURED_EVENT_ID);
        assert_eq!(event.kind, ErrorKind::UnhandledException);
        assert_eq!(event.message(), "boom");
        assert_eq!(event.frames, DefaultStackParser.parse(STACK).unwrap());
        assert!(flag.is_raised());
        assert_eq!(boundary.captured(), Some(&event));
    }

    #[test]
    fn test_capture_without_stack() {
        let flag = RuntimeErrorFlag::new();
        let mut boundary = ErrorCaptureBoundary::new(flag.clone());

        assert!(boundary.capture(ThrownError::new("no location")).is_none());
        assert!(boundary.captured().is_none());
        assert!(!flag.is_raised());
    }

    #[test]
    fn test_unstacked_capture_clears_previous_event() {
        let mut boundary = ErrorCaptureBoundary::new(RuntimeErrorFlag::new());
        boundary.capture(ThrownError::with_stack("first", STACK));
        boundary.capture(ThrownError::new("second"));
        assert!(boundary.captured().is_none());
        // The flag stays raised from the first capture
        assert!(boundary.flag().is_raised());
    }

    #[test]
    fn test_second_capture_replaces_first() {
        let mut boundary = ErrorCaptureBoundary::new(RuntimeErrorFlag::new());
        boundary.capture(ThrownError::with_stack("first", STACK));
        boundary.capture(ThrownError::with_stack("second", "    at other (b.rs:2:2)"));

        let event = boundary.captured().unwrap();
        assert_eq!(event.message(), "second");
        assert_eq!(event.frames.len(), 1);
        assert_eq!(event.frames[0].method_name, "other");
    }

    #[test]
    fn test_parser_failures_yield_empty_frames() {
        let flag = RuntimeErrorFlag::new();
        let mut failing = ErrorCaptureBoundary::with_parser(flag.clone(), FailingParser);
        let event = failing.capture(ThrownError::with_stack("boom", STACK)).unwrap();
        assert!(event.frames.is_empty());

        let mut panicking = ErrorCaptureBoundary::with_parser(flag.clone(), PanickingParser);
        let event = panicking.capture(ThrownError::with_stack("boom", STACK)).unwrap();
        assert!(event.frames.is_empty());
        assert!(flag.is_raised());
    }

    #[test]
    fn test_render_ok() {
        let mut boundary = ErrorCaptureBoundary::new(RuntimeErrorFlag::new());
        let outcome = boundary.render(|| Ok(7));
        assert_eq!(outcome, RenderOutcome::Rendered(7));
        assert!(boundary.captured().is_none());
    }

    #[test]
    fn test_render_error_is_captured_and_sticks() {
        let mut boundary = ErrorCaptureBoundary::new(RuntimeErrorFlag::new());
        let outcome: RenderOutcome =
            boundary.render(|| Err(ThrownError::with_stack("boom", STACK)));
        assert!(matches!(&outcome, RenderOutcome::Failed(Some(e)) if e.message() == "boom"));

        let mut rendered = false;
        let outcome = boundary.render(|| {
            rendered = true;
            Ok(())
        });
        assert!(!rendered);
        assert!(outcome.is_failed());

        boundary.reset();
        assert_eq!(boundary.render(|| Ok(())), RenderOutcome::Rendered(()));
    }

    #[test]
    fn test_render_unstacked_error_fails_without_event() {
        let flag = RuntimeErrorFlag::new();
        let mut boundary = ErrorCaptureBoundary::new(flag.clone());
        let outcome: RenderOutcome = boundary.render(|| Err(ThrownError::new("bare")));
        assert_eq!(outcome, RenderOutcome::Failed(None));
        assert!(!flag.is_raised());

        // Nothing is retained, so the next attempt renders again
        assert_eq!(boundary.render(|| Ok(())), RenderOutcome::Rendered(()));
    }

    #[test]
    fn test_render_panic_is_contained() {
        install_panic_hook();
        let flag = RuntimeErrorFlag::new();
        let mut boundary = ErrorCaptureBoundary::new(flag.clone());

        let outcome: RenderOutcome = boundary.render(|| panic!("render exploded"));

        match outcome {
            RenderOutcome::Failed(Some(event)) => {
                assert_eq!(event.message(), "render exploded");
                assert!(!event.frames.is_empty());
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert!(flag.is_raised());
    }
}
