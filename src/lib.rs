//! dev-overlay - in-process developer error overlay for egui applications
//!
//! Wraps application content in an error capture boundary and draws exactly
//! one diagnostic view on top of it: missing root layout tags, a build
//! error, the runtime error list, or the static route indicator.
//!
//! ```no_run
//! use dev_overlay::{shared, AppConfig, DevOverlay, Dispatcher, RuntimeErrorFlag};
//!
//! let state = shared::new_shared_state();
//! let (dispatcher, actions) = Dispatcher::channel();
//! let mut overlay = DevOverlay::new(&AppConfig::default(), RuntimeErrorFlag::new());
//!
//! # let ctx = egui::Context::default();
//! egui::CentralPanel::default().show(&ctx, |ui| {
//!     state.write().drain(&actions);
//!     let snapshot = shared::snapshot(&state);
//!     overlay.show(ui, &snapshot, Some(&dispatcher), |ui| {
//!         ui.label("application content");
//!         Ok(())
//!     });
//! });
//! ```

pub mod capture;
pub mod config;
pub mod overlay;
pub mod shared;
pub mod storage;
pub mod views;

pub use capture::{
    install_panic_hook, DefaultStackParser, ErrorCaptureBoundary, ErrorEvent, ErrorKind,
    RenderOutcome, StackFrame, StackParser, ThrownError,
};
pub use config::AppConfig;
pub use overlay::{resolve, DevOverlay, DisplayState, Resolution, RuntimeErrorsView, ViewKind};
pub use shared::{Dispatcher, OverlayAction, OverlayState, RuntimeErrorFlag};
pub use views::{EguiViews, OverlayViews};
