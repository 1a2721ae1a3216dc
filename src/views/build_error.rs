//! Build error view

use egui::RichText;

use crate::shared::VersionInfo;
use crate::views::theme::{self, ThemeColors};
use crate::views::{version_footer, ViewContext};

pub fn show(cx: &ViewContext<'_>, message: &str, version_info: &VersionInfo) {
    let backdrop = theme::backdrop(cx.settings.opacity);
    cx.portal.fullscreen(cx.ctx, "build_error", backdrop, |ui| {
        let width = (ui.available_width() * 0.85).min(960.0);
        let max_output_height = ui.available_height() * 0.55;
        ui.add_space(ui.available_height() * 0.08);
        ui.vertical_centered(|ui| {
            ui.set_max_width(width);
            theme::dialog_frame().show(ui, |ui| {
                ui.with_layout(egui::Layout::top_down(egui::Align::Min), |ui| {
                    ui.label(
                        RichText::new("Failed to compile")
                            .heading()
                            .color(ThemeColors::ERROR),
                    );
                    ui.add_space(12.0);

                    theme::code_frame().show(ui, |ui| {
                        egui::ScrollArea::vertical()
                            .max_height(max_output_height)
                            .auto_shrink([false, true])
                            .show(ui, |ui| {
                                ui.label(RichText::new(message).monospace());
                            });
                    });

                    ui.add_space(12.0);
                    ui.label(
                        RichText::new(
                            "This error occurred during the build process and can only \
                             be dismissed by fixing the error.",
                        )
                        .small()
                        .color(ThemeColors::TEXT_SECONDARY),
                    );
                    version_footer(ui, version_info);
                });
            });
        });
    });
}
