//! Demo Application
//!
//! A small eframe app whose content can be made to fail on demand. The side
//! panel plays the part of the build/dev-server channel and feeds actions to
//! the shared overlay state through a [`Dispatcher`].

use crossbeam_channel::Receiver;
use eframe::egui;
use tracing::info;

use dev_overlay::capture::{DefaultStackParser, StackParser};
use dev_overlay::shared::{self, SharedOverlayState, VersionInfo};
use dev_overlay::{
    AppConfig, DevOverlay, Dispatcher, OverlayAction, Resolution, RuntimeErrorFlag, ThrownError,
};

/// How the demo content should fail on its next render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FailureMode {
    Panic,
    Error,
    Unstacked,
}

/// The application content wrapped by the overlay
#[derive(Debug, Default)]
struct DemoContent {
    clicks: u32,
    failure: Option<FailureMode>,
}

impl DemoContent {
    fn render(&mut self, ui: &mut egui::Ui) -> Result<(), ThrownError> {
        ui.heading("Demo application");
        ui.add_space(8.0);
        ui.label("This panel is wrapped in the error overlay boundary.");
        if ui.button(format!("Clicked {} time(s)", self.clicks)).clicked() {
            self.clicks += 1;
        }

        match self.failure.take() {
            None => Ok(()),
            Some(FailureMode::Panic) => {
                panic!("demo content panicked after {} click(s)", self.clicks)
            }
            Some(FailureMode::Error) => Err(ThrownError::capture_here(
                "demo content returned an error",
            )),
            Some(FailureMode::Unstacked) => Err(ThrownError::new(
                "demo content failed without a stack",
            )),
        }
    }
}

/// The demo eframe application
pub struct DemoApp {
    /// State owned by the host and read by the overlay
    shared_state: SharedOverlayState,
    dispatcher: Dispatcher,
    actions: Receiver<OverlayAction>,
    overlay: DevOverlay,
    content: DemoContent,
    last_resolution: Resolution,
}

impl DemoApp {
    pub fn new(config: &AppConfig) -> Self {
        let (dispatcher, actions) = Dispatcher::channel();
        dispatcher.on_version_info(VersionInfo {
            installed: Some(env!("CARGO_PKG_VERSION").to_string()),
            ..VersionInfo::default()
        });

        Self {
            shared_state: shared::new_shared_state(),
            dispatcher,
            actions,
            overlay: DevOverlay::new(config, RuntimeErrorFlag::new()),
            content: DemoContent::default(),
            last_resolution: Resolution::NoOverlay,
        }
    }

    /// Window options for the demo
    pub fn options() -> eframe::NativeOptions {
        eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([1100.0, 720.0])
                .with_min_inner_size([720.0, 480.0])
                .with_title("dev-overlay demo"),
            ..Default::default()
        }
    }

    /// Apply queued channel actions; a landed refresh remounts the content
    fn process_actions(&mut self) {
        let mut state = self.shared_state.write();
        while let Ok(action) = self.actions.try_recv() {
            if matches!(action, OverlayAction::Refresh) {
                self.overlay.recover();
            }
            state.apply(action);
        }
    }

    fn render_controls(&mut self, ui: &mut egui::Ui) {
        let state = shared::snapshot(&self.shared_state);

        ui.heading("Channel");
        ui.add_space(8.0);

        if state.build_error.is_none() {
            if ui.button("Break build").clicked() {
                self.dispatcher.on_build_error(
                    "error[E0432]: unresolved import `crate::widgets`\n --> src/app.rs:3:5",
                );
            }
        } else if ui.button("Fix build").clicked() {
            self.dispatcher.on_build_ok();
        }

        if ui.button("Report runtime error").clicked() {
            let reason = ThrownError::capture_here("background task failed");
            self.dispatcher.on_unhandled_error(reason.clone(), parse_frames(&reason));
        }
        if ui.button("Report unhandled rejection").clicked() {
            let reason = ThrownError::capture_here("request future was dropped with an error");
            self.dispatcher.on_unhandled_rejection(reason.clone(), parse_frames(&reason));
        }

        let indicator_label = if state.static_indicator {
            "Hide static indicator"
        } else {
            "Show static indicator"
        };
        if ui.button(indicator_label).clicked() {
            self.dispatcher.on_static_indicator(!state.static_indicator);
        }

        if state.root_layout_missing_tags.is_empty() {
            if ui.button("Drop <body> tag").clicked() {
                self.dispatcher.on_root_layout_missing_tags(vec!["body".to_string()]);
            }
        } else if ui.button("Restore tags").clicked() {
            self.dispatcher.on_root_layout_missing_tags(Vec::new());
        }

        if ui.button("Refresh").clicked() {
            self.dispatcher.on_before_refresh();
            self.dispatcher.on_refresh();
        }

        ui.add_space(16.0);
        ui.heading("Content");
        ui.add_space(8.0);

        if ui.button("Panic in render").clicked() {
            self.content.failure = Some(FailureMode::Panic);
        }
        if ui.button("Return error").clicked() {
            self.content.failure = Some(FailureMode::Error);
        }
        if ui.button("Fail without stack").clicked() {
            self.content.failure = Some(FailureMode::Unstacked);
        }

        ui.add_space(16.0);
        ui.separator();
        let flag = if self.overlay.runtime_error_flag().is_raised() { "raised" } else { "lowered" };
        ui.label(format!("Runtime error flag: {}", flag));
        ui.label(format!("Reported errors: {}", state.errors.len()));
        if state.is_clear() {
            ui.label("Channel state is clear");
        }
        ui.label(format!("Views: {:?}", self.last_resolution.views()));
    }
}

fn parse_frames(reason: &ThrownError) -> Vec<dev_overlay::StackFrame> {
    reason
        .stack
        .as_deref()
        .and_then(|stack| DefaultStackParser.parse(stack).ok())
        .unwrap_or_default()
}

impl eframe::App for DemoApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_actions();

        egui::SidePanel::left("channel_controls")
            .resizable(false)
            .default_width(220.0)
            .show(ctx, |ui| {
                self.render_controls(ui);
            });

        let snapshot = shared::snapshot(&self.shared_state);
        egui::CentralPanel::default().show(ctx, |ui| {
            let resolution = self.overlay.show(ui, &snapshot, Some(&self.dispatcher), |ui| {
                self.content.render(ui)
            });
            if resolution != self.last_resolution {
                info!("Overlay now showing {:?}", resolution.views());
                self.last_resolution = resolution;
            }
        });
    }
}

/// Run the demo application
pub fn run_demo(config: &AppConfig) -> Result<(), eframe::Error> {
    let app = DemoApp::new(config);
    eframe::run_native(
        "dev-overlay demo",
        DemoApp::options(),
        Box::new(|_cc| Ok(Box::new(app))),
    )
}
