//! Runtime errors view
//!
//! Shown either as a fullscreen dialog paging through the errors or as a
//! corner badge. The resolver picks the initial display state; after that the
//! developer can minimize, hide or reopen it. A different set of errors
//! starts over from the resolver's choice.

use egui::RichText;

use crate::capture::{ErrorEvent, ErrorKind, StackFrame};
use crate::overlay::{DisplayState, RuntimeErrorsView};
use crate::views::theme::{self, ThemeColors};
use crate::views::{version_footer, ViewContext};

/// Vertical room left for the static indicator below the badge
const INDICATOR_CLEARANCE: f32 = 34.0;

/// Interactive state of the runtime errors view
#[derive(Debug, Default)]
pub struct RuntimeErrorsPanel {
    display: DisplayState,
    active: usize,
    show_all_frames: bool,
    /// Identity of the errors the state belongs to
    seen: Vec<(u64, String)>,
}

impl RuntimeErrorsPanel {
    pub fn display(&self) -> DisplayState {
        self.display
    }

    /// Index of the error currently shown
    pub fn active(&self) -> usize {
        self.active
    }

    /// Adopt a new set of errors. Returns `true` if the set changed and the
    /// panel was reset to the view's initial display state.
    pub fn sync(&mut self, view: &RuntimeErrorsView) -> bool {
        let identity: Vec<(u64, String)> = view
            .errors
            .iter()
            .map(|event| (event.id, event.message().to_string()))
            .collect();

        if identity == self.seen {
            self.active = self.active.min(view.errors.len().saturating_sub(1));
            return false;
        }

        self.seen = identity;
        self.display = view.display;
        self.active = 0;
        self.show_all_frames = false;
        true
    }

    /// Forget the errors and the developer's choices
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn set_display(&mut self, display: DisplayState) {
        self.display = display;
    }

    pub fn next(&mut self, len: usize) {
        if self.active + 1 < len {
            self.active += 1;
            self.show_all_frames = false;
        }
    }

    pub fn previous(&mut self) {
        if self.active > 0 {
            self.active -= 1;
            self.show_all_frames = false;
        }
    }

    pub fn show(&mut self, cx: &ViewContext<'_>, view: &RuntimeErrorsView) {
        self.sync(view);
        if view.errors.is_empty() {
            return;
        }

        match self.display {
            DisplayState::Hidden => {}
            DisplayState::Minimized => self.show_badge(cx, view),
            DisplayState::Fullscreen => {
                if cx.ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
                    self.display = DisplayState::Minimized;
                    self.show_badge(cx, view);
                } else {
                    self.show_dialog(cx, view);
                }
            }
        }
    }

    fn show_badge(&mut self, cx: &ViewContext<'_>, view: &RuntimeErrorsView) {
        let anchor = cx.settings.anchor;
        let mut offset = anchor.inset(cx.settings.offset);
        if view.has_static_indicator {
            // Keep clear of the indicator in the same corner
            offset.y += if offset.y < 0.0 { -INDICATOR_CLEARANCE } else { INDICATOR_CLEARANCE };
        }

        let count = view.errors.len();
        let label = format!("{} issue{}", count, if count == 1 { "" } else { "s" });

        cx.portal.anchored(cx.ctx, "runtime_errors_badge", anchor.align(), offset, |ui| {
            egui::Frame::none()
                .fill(ThemeColors::ERROR_MUTED)
                .rounding(egui::Rounding::same(12.0))
                .inner_margin(egui::Margin::symmetric(10.0, 4.0))
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        let open = egui::Button::new(RichText::new(label).strong()).frame(false);
                        let open = ui.add(open);
                        if open.clicked() {
                            self.display = DisplayState::Fullscreen;
                        }
                        if ui.add(egui::Button::new("x").frame(false)).clicked() {
                            self.display = DisplayState::Hidden;
                        }
                    });
                });
        });
    }

    fn show_dialog(&mut self, cx: &ViewContext<'_>, view: &RuntimeErrorsView) {
        let backdrop = theme::backdrop(cx.settings.opacity);
        let Some(event) = view.errors.get(self.active) else {
            return;
        };

        cx.portal.fullscreen(cx.ctx, "runtime_errors", backdrop, |ui| {
            let width = (ui.available_width() * 0.85).min(960.0);
            let max_frames_height = ui.available_height() * 0.5;
            ui.add_space(ui.available_height() * 0.06);
            ui.vertical_centered(|ui| {
                ui.set_max_width(width);
                theme::dialog_frame().show(ui, |ui| {
                    ui.with_layout(egui::Layout::top_down(egui::Align::Min), |ui| {
                        self.dialog_header(ui, view.errors.len());
                        ui.add_space(8.0);

                        ui.label(RichText::new(title(event)).heading().color(ThemeColors::ERROR));
                        ui.add_space(4.0);
                        ui.label(RichText::new(event.message()).monospace());

                        if let Some(location) = event.top_frame().and_then(StackFrame::location) {
                            ui.label(
                                RichText::new(format!("at {}", location))
                                    .small()
                                    .color(ThemeColors::TEXT_SECONDARY),
                            );
                        }

                        ui.add_space(12.0);
                        egui::ScrollArea::vertical()
                            .max_height(max_frames_height)
                            .auto_shrink([false, true])
                            .show(ui, |ui| {
                                self.frame_list(ui, event, cx);
                            });

                        if let Some(debug_info) = &view.debug_info {
                            ui.add_space(8.0);
                            ui.label(
                                RichText::new(format!("Debug: {}", debug_info.0))
                                    .small()
                                    .color(ThemeColors::TEXT_MUTED),
                            );
                        }
                        version_footer(ui, &view.version_info);
                    });
                });
            });
        });
    }

    fn dialog_header(&mut self, ui: &mut egui::Ui, len: usize) {
        ui.horizontal(|ui| {
            if ui.add_enabled(self.active > 0, egui::Button::new("<")).clicked() {
                self.previous();
            }
            if ui.add_enabled(self.active + 1 < len, egui::Button::new(">")).clicked() {
                self.next(len);
            }
            let plural = if len == 1 { "" } else { "s" };
            ui.label(
                RichText::new(format!(
                    "{} of {} unhandled error{}",
                    self.active + 1,
                    len,
                    plural
                ))
                .color(ThemeColors::TEXT_SECONDARY),
            );

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("x").on_hover_text("Hide").clicked() {
                    self.display = DisplayState::Hidden;
                }
                if ui.button("_").on_hover_text("Minimize (Esc)").clicked() {
                    self.display = DisplayState::Minimized;
                }
            });
        });
    }

    fn frame_list(&mut self, ui: &mut egui::Ui, event: &ErrorEvent, cx: &ViewContext<'_>) {
        let frames = visible_frames(&event.frames, cx.hide_internal_frames);
        if frames.is_empty() {
            ui.label(
                RichText::new("No stack frames available")
                    .small()
                    .color(ThemeColors::TEXT_MUTED),
            );
            return;
        }

        let limit = if self.show_all_frames {
            frames.len()
        } else {
            frames.len().min(cx.settings.max_frames)
        };

        theme::code_frame().show(ui, |ui| {
            for frame in &frames[..limit] {
                ui.label(RichText::new(&frame.method_name).monospace());
                if let Some(location) = frame.location() {
                    ui.label(
                        RichText::new(format!("    {}", location))
                            .monospace()
                            .color(ThemeColors::TEXT_MUTED),
                    );
                }
            }
        });

        let hidden = frames.len() - limit;
        if hidden > 0 && ui.link(format!("Show {} more frame(s)", hidden)).clicked() {
            self.show_all_frames = true;
        }
    }
}

fn title(event: &ErrorEvent) -> &'static str {
    match event.kind {
        ErrorKind::UnhandledException => "Unhandled Runtime Error",
        ErrorKind::UnhandledRejection => "Unhandled Rejection",
    }
}

/// Frames to list, optionally without internal ones
pub fn visible_frames(frames: &[StackFrame], hide_internal: bool) -> Vec<&StackFrame> {
    frames
        .iter()
        .filter(|frame| !hide_internal || !frame.is_internal())
        .collect()
}
