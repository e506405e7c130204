// src/app/ui/grid.rs
use eframe::egui as eg;

use super::CardAction;
use crate::app::{PosterSize, Show};

pub const H_SPACING: f32 = 6.0;
pub const V_SPACING: f32 = 10.0;
const TEXT_H: f32 = 58.0;
const POSTER_ASPECT: f32 = 1.4;
const FAVORITE_CARD_W: f32 = 96.0;

/// Everything a card needs, copied out so drawing can borrow the app mutably.
struct CardModel {
    id: u64,
    name: String,
    rating: String,
    thumb: Option<String>,
    is_favorite: bool,
}

fn favorite_button_text(is_favorite: bool) -> &'static str {
    if is_favorite {
        "❤ Remove"
    } else {
        "🤍 Add"
    }
}

fn card_height(card_w: f32) -> f32 {
    card_w * POSTER_ASPECT + TEXT_H
}

impl crate::app::FinderApp {
    fn card_model(&self, show: &Show) -> CardModel {
        CardModel {
            id: show.id,
            name: show.name.clone(),
            rating: format!("⭐ {}", show.rating_label()),
            thumb: show.thumb_url().map(str::to_string),
            is_favorite: self.favorites.contains(show.id),
        }
    }

    fn ui_draw_card(
        &mut self,
        ui: &mut eg::Ui,
        ctx: &eg::Context,
        card: &CardModel,
        card_w: f32,
        id_salt: &str,
    ) -> Option<CardAction> {
        let mut action = None;
        let card_h = card_height(card_w);

        ui.allocate_ui_with_layout(
            eg::vec2(card_w, card_h),
            eg::Layout::top_down(eg::Align::Min),
            |ui| {
                ui.set_min_size(eg::vec2(card_w, card_h));
                let rect = ui.max_rect();
                let poster_rect = eg::Rect::from_min_size(
                    rect.min,
                    eg::vec2(card_w, card_w * POSTER_ASPECT),
                );
                let text_rect =
                    eg::Rect::from_min_max(eg::pos2(rect.min.x, poster_rect.max.y), rect.max);

                let resp = ui
                    .interact(poster_rect, eg::Id::new((id_salt, card.id)), eg::Sense::click())
                    .on_hover_cursor(eg::CursorIcon::PointingHand);
                if resp.clicked() {
                    action = Some(CardAction::Open(card.id));
                }

                let tex = card
                    .thumb
                    .as_deref()
                    .and_then(|url| self.poster_texture(ctx, url, PosterSize::Thumb));
                match tex {
                    Some(tex) => {
                        ui.painter().image(
                            tex.id(),
                            poster_rect,
                            eg::Rect::from_min_max(eg::pos2(0.0, 0.0), eg::pos2(1.0, 1.0)),
                            eg::Color32::WHITE,
                        );
                    }
                    None => {
                        ui.painter()
                            .rect_filled(poster_rect, 6.0, eg::Color32::from_gray(40));
                        ui.painter().text(
                            poster_rect.center(),
                            eg::Align2::CENTER_CENTER,
                            "📺",
                            eg::FontId::proportional(card_w * 0.25),
                            eg::Color32::from_gray(110),
                        );
                    }
                }
                if resp.hovered() {
                    ui.painter().rect_stroke(
                        poster_rect.shrink(1.0),
                        6.0,
                        eg::Stroke::new(2.0, eg::Color32::YELLOW),
                    );
                }

                ui.allocate_ui_at_rect(text_rect, |ui| {
                    ui.add(
                        eg::Label::new(eg::RichText::new(&card.name).strong().size(13.0))
                            .truncate(),
                    );
                    ui.horizontal(|ui| {
                        ui.small(&card.rating);
                        if ui
                            .small_button(favorite_button_text(card.is_favorite))
                            .clicked()
                        {
                            action = Some(CardAction::ToggleFavorite(card.id));
                        }
                    });
                });
            },
        );
        action
    }

    // ---------- FAVORITES STRIP ----------
    pub(crate) fn ui_render_favorites(&mut self, ui: &mut eg::Ui, ctx: &eg::Context) {
        ui.heading(format!("Favorites ({})", self.favorites.len()));
        if self.favorites.is_empty() {
            ui.weak("No favorites yet. Use 🤍 Add on a show to keep it here.");
            ui.separator();
            return;
        }

        let cards: Vec<CardModel> = self
            .favorites
            .list()
            .iter()
            .map(|s| self.card_model(s))
            .collect();

        let mut action = None;
        eg::ScrollArea::horizontal()
            .id_source("favorites_strip")
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.spacing_mut().item_spacing = eg::vec2(H_SPACING, V_SPACING);
                    for card in &cards {
                        if let Some(a) = self.ui_draw_card(ui, ctx, card, FAVORITE_CARD_W, "fav") {
                            action = Some(a);
                        }
                    }
                });
            });
        ui.separator();

        if let Some(a) = action {
            self.apply_card_action(a, ctx);
        }
    }

    // ---------- RESULTS GRID ----------
    pub(crate) fn ui_render_results(&mut self, ui: &mut eg::Ui, ctx: &eg::Context) {
        if self.view.is_empty() {
            ui.vertical_centered(|ui| {
                ui.add_space(24.0);
                if self.catalog.is_empty() {
                    ui.label("No shows loaded.");
                } else {
                    ui.label("No shows match the current filters.");
                }
            });
            return;
        }

        let cards: Vec<CardModel> = self.visible_shows().map(|s| self.card_model(s)).collect();

        let card_w = self.poster_width_ui;
        let avail = ui.available_width();
        let cols = ((avail + H_SPACING) / (card_w + H_SPACING))
            .floor()
            .max(1.0) as usize;
        let n_rows = cards.len().div_ceil(cols);

        let mut action = None;
        ui.spacing_mut().item_spacing = eg::vec2(H_SPACING, V_SPACING);
        eg::ScrollArea::vertical()
            .id_source("results_grid")
            .auto_shrink([false; 2])
            .show_rows(ui, card_height(card_w), n_rows, |ui, rows| {
                for row in rows {
                    let start = row * cols;
                    let end = (start + cols).min(cards.len());
                    ui.horizontal(|ui| {
                        for card in &cards[start..end] {
                            if let Some(a) = self.ui_draw_card(ui, ctx, card, card_w, "grid") {
                                action = Some(a);
                            }
                        }
                    });
                }
            });

        if let Some(a) = action {
            self.apply_card_action(a, ctx);
        }
    }
}
