// src/app/ui/mod.rs
pub mod grid;
pub mod topbar;

use eframe::egui as eg;

/// What a click on a card asks the app to do. Collected while drawing and
/// applied afterwards, so drawing only ever borrows the catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardAction {
    Open(u64),
    ToggleFavorite(u64),
}

impl crate::app::FinderApp {
    pub(crate) fn ui_render_splash(&self, ui: &mut eg::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(28.0);
            ui.heading("TV Series Finder");
            ui.add(eg::Spinner::new().size(18.0));
            ui.separator();
            if !self.status_message.is_empty() {
                ui.label(&self.status_message);
            }
            ui.add_space(8.0);
            ui.monospace(format!("Source: {}", self.config.api_base()));
            ui.monospace(format!("Posters: {}", self.poster_dir.display()));
        });
    }
}
