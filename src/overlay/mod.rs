//! Overlay Presentation Layer
//!
//! [`DevOverlay`] wraps the host's content in an error capture boundary and,
//! on every render pass, resolves and draws the diagnostic view for the
//! current state on isolated foreground layers.

pub mod portal;
pub mod resolver;

pub use portal::ShadowPortal;
pub use resolver::{resolve, DisplayState, Resolution, RuntimeErrorsView, ViewKind};

use tracing::debug;

use crate::capture::{install_panic_hook, ErrorCaptureBoundary, ErrorEvent, ThrownError};
use crate::config::{AppConfig, OverlaySettings};
use crate::shared::{Dispatcher, OverlayState, RuntimeErrorFlag};
use crate::views::{theme, EguiViews, OverlayViews, ViewContext};

/// Error overlay around a region of host content
pub struct DevOverlay<V: OverlayViews = EguiViews> {
    boundary: ErrorCaptureBoundary,
    portal: ShadowPortal,
    views: V,
    settings: OverlaySettings,
    hide_internal_frames: bool,
}

impl DevOverlay<EguiViews> {
    /// Create an overlay with the built-in egui views
    pub fn new(config: &AppConfig, flag: RuntimeErrorFlag) -> Self {
        Self::with_views(config, ErrorCaptureBoundary::new(flag), EguiViews::new())
    }
}

impl<V: OverlayViews> DevOverlay<V> {
    /// Create an overlay with a custom boundary and view implementation
    pub fn with_views(config: &AppConfig, boundary: ErrorCaptureBoundary, views: V) -> Self {
        if config.capture.install_panic_hook {
            install_panic_hook();
        }

        Self {
            boundary,
            portal: ShadowPortal::new("dev_overlay", theme::overlay_style()),
            views,
            settings: config.overlay.clone(),
            hide_internal_frames: config.capture.hide_internal_frames,
        }
    }

    /// Run one render pass
    ///
    /// `content` draws the host application. If it fails, the region it was
    /// given is blanked and left empty. `state` is this pass's snapshot of
    /// the shared overlay state; `dispatcher` is passed untouched to the
    /// static indicator.
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        state: &OverlayState,
        dispatcher: Option<&Dispatcher>,
        content: impl FnOnce(&mut egui::Ui) -> Result<(), ThrownError>,
    ) -> Resolution {
        let region = ui.max_rect();
        if self.boundary.render(|| content(ui)).is_failed() {
            render_fallback(ui, region);
        }

        let resolution = resolve(state, self.boundary.captured());
        if self.settings.enabled {
            let ctx = ui.ctx().clone();
            self.present(&ctx, &resolution, dispatcher);
        }
        resolution
    }

    fn present(
        &mut self,
        ctx: &egui::Context,
        resolution: &Resolution,
        dispatcher: Option<&Dispatcher>,
    ) {
        let cx = ViewContext {
            ctx,
            portal: &self.portal,
            settings: &self.settings,
            hide_internal_frames: self.hide_internal_frames,
        };

        if !matches!(resolution, Resolution::RuntimeErrors(_)) {
            self.views.runtime_errors_dismissed();
        }

        match resolution {
            Resolution::MissingTags { tags } => self.views.missing_tags(&cx, tags),
            Resolution::BuildError {
                message,
                version_info,
            } => self.views.build_error(&cx, message, version_info),
            Resolution::RuntimeErrors(view) => {
                self.views.runtime_errors(&cx, view);
                if view.has_static_indicator {
                    self.views.static_indicator(&cx, dispatcher);
                }
            }
            Resolution::StaticIndicator => self.views.static_indicator(&cx, dispatcher),
            Resolution::NoOverlay => {}
        }
    }

    /// The event captured from the wrapped content, if any
    pub fn captured(&self) -> Option<&ErrorEvent> {
        self.boundary.captured()
    }

    /// Drop the captured event so the content renders again, e.g. after a refresh
    pub fn recover(&mut self) {
        debug!("Overlay boundary reset requested");
        self.boundary.reset();
    }

    pub fn settings(&self) -> &OverlaySettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: OverlaySettings) {
        self.settings = settings;
    }

    pub fn views(&self) -> &V {
        &self.views
    }

    pub fn runtime_error_flag(&self) -> &RuntimeErrorFlag {
        self.boundary.flag()
    }
}

/// Empty stand-in for content that failed to render
///
/// Covers anything the content painted before failing and reserves the
/// region so the surrounding layout keeps its shape.
fn render_fallback(ui: &mut egui::Ui, region: egui::Rect) {
    let fill = ui.visuals().panel_fill;
    ui.painter().rect_filled(region, 0.0, fill);
    ui.allocate_rect(region, egui::Sense::hover());
}
