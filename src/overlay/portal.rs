//! Isolated rendering root for overlay views
//!
//! Every layer the portal opens is a foreground [`egui::Area`] keyed under the
//! portal's id, with the overlay style set on that layer's `Ui` only. Style
//! changes made by views stay inside their layer and never reach the host
//! context.

use egui::{Align2, Color32, Context, Id, Order, Style, Ui, Vec2};
use std::hash::Hash;
use std::sync::Arc;

/// Foreground layers with a private style
pub struct ShadowPortal {
    id: Id,
    style: Arc<Style>,
}

impl ShadowPortal {
    pub fn new(id_salt: impl Hash, style: Style) -> Self {
        Self {
            id: Id::new(id_salt),
            style: Arc::new(style),
        }
    }

    /// Layer id for a named view
    pub fn layer_id(&self, name: &str) -> Id {
        self.id.with(name)
    }

    /// Open a layer covering the whole screen, painted with `backdrop` first
    pub fn fullscreen<R>(
        &self,
        ctx: &Context,
        name: &str,
        backdrop: Color32,
        add_contents: impl FnOnce(&mut Ui) -> R,
    ) -> R {
        let screen = ctx.screen_rect();
        egui::Area::new(self.layer_id(name))
            .order(Order::Foreground)
            .fixed_pos(screen.min)
            .show(ctx, |ui| {
                ui.set_style(self.style.clone());
                ui.painter().rect_filled(screen, 0.0, backdrop);
                ui.set_min_size(screen.size());
                ui.set_max_size(screen.size());
                add_contents(ui)
            })
            .inner
    }

    /// Open a layer pinned to a screen corner
    pub fn anchored<R>(
        &self,
        ctx: &Context,
        name: &str,
        align: Align2,
        offset: Vec2,
        add_contents: impl FnOnce(&mut Ui) -> R,
    ) -> R {
        egui::Area::new(self.layer_id(name))
            .order(Order::Foreground)
            .anchor(align, offset)
            .show(ctx, |ui| {
                ui.set_style(self.style.clone());
                add_contents(ui)
            })
            .inner
    }
}
