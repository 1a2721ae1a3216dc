//! Missing root layout tags view

use egui::RichText;

use crate::views::theme::{self, ThemeColors};
use crate::views::ViewContext;

/// Human readable list: `<html>` or `<html> and <body>` or `<html>, <head> and <body>`
pub fn format_tags(tags: &[String]) -> String {
    let quoted: Vec<String> = tags.iter().map(|tag| format!("<{}>", tag)).collect();
    match quoted.split_last() {
        None => String::new(),
        Some((last, [])) => last.clone(),
        Some((last, rest)) => format!("{} and {}", rest.join(", "), last),
    }
}

pub fn show(cx: &ViewContext<'_>, tags: &[String]) {
    let backdrop = theme::backdrop(cx.settings.opacity);
    cx.portal.fullscreen(cx.ctx, "missing_tags", backdrop, |ui| {
        let width = (ui.available_width() * 0.8).min(720.0);
        ui.add_space(ui.available_height() * 0.15);
        ui.vertical_centered(|ui| {
            ui.set_max_width(width);
            theme::dialog_frame().show(ui, |ui| {
                ui.label(
                    RichText::new("Missing required root layout tags")
                        .heading()
                        .color(ThemeColors::ERROR),
                );
                ui.add_space(12.0);
                ui.label(format!(
                    "The following tags are missing in the root layout: {}.",
                    format_tags(tags)
                ));
                ui.add_space(8.0);
                ui.label(
                    RichText::new(
                        "Missing tags prevent the document from rendering correctly. \
                         Add them to the root layout.",
                    )
                    .color(ThemeColors::TEXT_SECONDARY),
                );
            });
        });
    });
}
