// src/app/ui/topbar.rs
use eframe::egui as eg;

use crate::app::filters::{genre_label, GENRE_OPTIONS};
use crate::app::{POSTER_W_MAX, POSTER_W_MIN};

impl crate::app::FinderApp {
    pub(crate) fn mark_dirty(&mut self) {
        self.view_dirty = true;
    }

    // ---------- TOP BAR ----------
    pub(crate) fn ui_render_topbar(&mut self, ui: &mut eg::Ui) {
        ui.horizontal(|ui| {
            // Search
            let resp = ui.add(
                eg::TextEdit::singleline(&mut self.criteria.query)
                    .hint_text("Search shows…")
                    .desired_width(200.0),
            );
            if resp.changed() {
                self.mark_dirty();
            }

            ui.separator();

            // Genre
            let mut changed_genre = false;
            eg::ComboBox::from_id_source("genre_combo")
                .selected_text(genre_label(self.criteria.genre.as_deref()))
                .show_ui(ui, |ui| {
                    if ui
                        .selectable_value(&mut self.criteria.genre, None, genre_label(None))
                        .clicked()
                    {
                        changed_genre = true;
                    }
                    for (tag, label) in GENRE_OPTIONS {
                        if ui
                            .selectable_value(&mut self.criteria.genre, Some(tag.to_string()), label)
                            .clicked()
                        {
                            changed_genre = true;
                        }
                    }
                });
            if changed_genre {
                self.mark_dirty();
            }

            // Sort
            if ui
                .checkbox(&mut self.criteria.sort_by_rating, "Sort by rating ⭐")
                .changed()
            {
                self.mark_dirty();
            }

            if !self.criteria.is_empty() && ui.small_button("Reset").clicked() {
                self.criteria = Default::default();
                self.mark_dirty();
            }

            ui.separator();

            // Poster size
            ui.label("Poster:");
            ui.add(eg::Slider::new(&mut self.poster_width_ui, POSTER_W_MIN..=POSTER_W_MAX).suffix(" px"));

            ui.separator();
            ui.label(format!("{} of {} shows", self.view.len(), self.catalog.len()));
            if self.posters_in_flight() > 0 {
                ui.add(eg::Spinner::new().size(12.0))
                    .on_hover_text(format!("{} posters downloading", self.posters_in_flight()));
            }
        });

        if !self.status_message.is_empty() {
            ui.small(&self.status_message);
        }
    }
}
