//! Overlay views
//!
//! The four presentational views the overlay can show, behind the
//! [`OverlayViews`] trait so hosts and tests can substitute their own.

pub mod build_error;
pub mod missing_tags;
pub mod runtime_errors;
pub mod static_indicator;
pub mod theme;

pub use runtime_errors::RuntimeErrorsPanel;

use crate::config::OverlaySettings;
use crate::overlay::{RuntimeErrorsView, ShadowPortal};
use crate::shared::{Dispatcher, VersionInfo};

/// Everything a view needs to draw itself
pub struct ViewContext<'a> {
    pub ctx: &'a egui::Context,
    /// Isolated layers to draw into
    pub portal: &'a ShadowPortal,
    pub settings: &'a OverlaySettings,
    pub hide_internal_frames: bool,
}

/// Presentational views driven by the overlay
pub trait OverlayViews {
    fn missing_tags(&mut self, cx: &ViewContext<'_>, tags: &[String]);

    fn build_error(&mut self, cx: &ViewContext<'_>, message: &str, version_info: &VersionInfo);

    fn runtime_errors(&mut self, cx: &ViewContext<'_>, view: &RuntimeErrorsView);

    /// Called on passes where the runtime errors view is not shown. Views
    /// with their own state drop it here so the next showing starts fresh.
    fn runtime_errors_dismissed(&mut self) {}

    /// The dispatcher is handed over untouched; the indicator uses it to hide itself
    fn static_indicator(&mut self, cx: &ViewContext<'_>, dispatcher: Option<&Dispatcher>);
}

/// egui implementation of the overlay views
#[derive(Debug, Default)]
pub struct EguiViews {
    runtime_errors: RuntimeErrorsPanel,
}

impl EguiViews {
    pub fn new() -> Self {
        Self::default()
    }

    /// State of the runtime errors panel
    pub fn runtime_errors_panel(&self) -> &RuntimeErrorsPanel {
        &self.runtime_errors
    }
}

impl OverlayViews for EguiViews {
    fn missing_tags(&mut self, cx: &ViewContext<'_>, tags: &[String]) {
        missing_tags::show(cx, tags);
    }

    fn build_error(&mut self, cx: &ViewContext<'_>, message: &str, version_info: &VersionInfo) {
        build_error::show(cx, message, version_info);
    }

    fn runtime_errors(&mut self, cx: &ViewContext<'_>, view: &RuntimeErrorsView) {
        self.runtime_errors.show(cx, view);
    }

    fn runtime_errors_dismissed(&mut self) {
        self.runtime_errors.reset();
    }

    fn static_indicator(&mut self, cx: &ViewContext<'_>, dispatcher: Option<&Dispatcher>) {
        static_indicator::show(cx, dispatcher);
    }
}

/// Footer line with the installed version and its staleness
pub(crate) fn version_footer(ui: &mut egui::Ui, version_info: &VersionInfo) {
    let Some(installed) = version_info.installed.as_deref() else {
        return;
    };
    let color = if version_info.staleness.is_stale() {
        theme::ThemeColors::WARNING
    } else {
        theme::ThemeColors::TEXT_MUTED
    };
    ui.add_space(8.0);
    ui.label(
        egui::RichText::new(format!("v{} ({})", installed, version_info.staleness.label()))
            .small()
            .color(color),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::{ErrorEvent, ErrorKind, StackFrame, ThrownError};
    use crate::overlay::DisplayState;
    use crate::shared::Staleness;

    fn runtime_view(display: DisplayState) -> RuntimeErrorsView {
        RuntimeErrorsView {
            errors: vec![ErrorEvent::new(
                0,
                ErrorKind::UnhandledException,
                ThrownError::with_stack("boom", "at f (a.rs:1:1)"),
                vec![
                    StackFrame::new("core::panicking::panic"),
                    StackFrame::new("app::render").at("src/app.rs", 4, 2),
                ],
            )],
            display,
            version_info: VersionInfo {
                installed: Some("0.1.0".into()),
                staleness: Staleness::Fresh,
            },
            has_static_indicator: true,
            debug_info: None,
        }
    }

    /// Draw every view headlessly; none of them may panic
    #[test]
    fn test_all_views_draw() {
        let ctx = egui::Context::default();
        let portal = ShadowPortal::new("views_test", theme::overlay_style());
        let settings = OverlaySettings::default();
        let (dispatcher, _receiver) = Dispatcher::channel();
        let mut views = EguiViews::new();

        for display in [DisplayState::Fullscreen, DisplayState::Minimized] {
            ctx.begin_frame(egui::RawInput::default());
            let cx = ViewContext {
                ctx: &ctx,
                portal: &portal,
                settings: &settings,
                hide_internal_frames: true,
            };
            views.missing_tags(&cx, &["html".to_string(), "body".to_string()]);
            views.build_error(&cx, "error[E0425]: cannot find value", &VersionInfo::default());
            views.runtime_errors(&cx, &runtime_view(display));
            views.static_indicator(&cx, Some(&dispatcher));
            let _ = ctx.end_frame();
        }
    }
}
