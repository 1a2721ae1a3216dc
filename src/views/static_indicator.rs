//! Static route indicator

use egui::RichText;

use crate::shared::Dispatcher;
use crate::views::theme::ThemeColors;
use crate::views::ViewContext;

pub fn show(cx: &ViewContext<'_>, dispatcher: Option<&Dispatcher>) {
    let anchor = cx.settings.anchor;
    cx.portal.anchored(
        cx.ctx,
        "static_indicator",
        anchor.align(),
        anchor.inset(cx.settings.offset),
        |ui| {
            egui::Frame::none()
                .fill(ThemeColors::BG_BADGE)
                .rounding(egui::Rounding::same(12.0))
                .inner_margin(egui::Margin::symmetric(10.0, 4.0))
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.label(RichText::new("Static route").small().color(ThemeColors::INFO));
                        if let Some(dispatcher) = dispatcher {
                            let close = ui
                                .add(egui::Button::new(RichText::new("x").small()).frame(false))
                                .on_hover_text("Hide static indicator");
                            if close.clicked() {
                                dispatcher.on_static_indicator(false);
                            }
                        }
                    });
                });
        },
    );
}
