//! Process-wide "a runtime error happened" flag
//!
//! Starts lowered and only ever moves to raised. Handles are cheap clones of
//! one shared cell, so the boundary raising it and collaborators reading it
//! (e.g. to stop attempting recovery) see the same value.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared one-way runtime error flag
#[derive(Debug, Clone, Default)]
pub struct RuntimeErrorFlag {
    raised: Arc<AtomicBool>,
}

impl RuntimeErrorFlag {
    /// Create a new, lowered flag
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the flag. Returns `true` if this call performed the transition.
    pub fn raise(&self) -> bool {
        !self.raised.swap(true, Ordering::AcqRel)
    }

    /// Whether any runtime error has been recorded
    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::Acquire)
    }
}
