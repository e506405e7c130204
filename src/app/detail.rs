// src/app/detail.rs
use eframe::egui as eg;

use crate::app::utils::{format_premiered, html_to_text, join_genres, safe_link};
use crate::app::{PosterSize, Show};

const DETAIL_W: f32 = 560.0;
const DETAIL_POSTER_W: f32 = 210.0;

/// "Running · 60 min · AMC" with missing parts left out.
fn facts_line(show: &Show) -> String {
    let mut parts = Vec::new();
    if let Some(status) = show.status.as_deref().filter(|s| !s.is_empty()) {
        parts.push(status.to_string());
    }
    if let Some(min) = show.runtime {
        parts.push(format!("{min} min"));
    }
    if let Some(net) = show.network.as_ref().map(|n| n.name.as_str()).filter(|n| !n.is_empty()) {
        parts.push(net.to_string());
    }
    parts.join(" · ")
}

impl crate::app::FinderApp {
    pub(crate) fn ui_render_detail_window(&mut self, ctx: &eg::Context) {
        let Some(show) = self.detail.current().cloned() else {
            return;
        };
        let loading = self.detail.is_loading();
        let is_favorite = self.favorites.contains(show.id);

        // the full image once cached, the grid thumbnail until then
        let tex = show
            .original_url()
            .and_then(|url| self.poster_texture(ctx, url, PosterSize::Full))
            .or_else(|| {
                show.thumb_url()
                    .and_then(|url| self.poster_texture(ctx, url, PosterSize::Thumb))
            });

        let mut open = true;
        let mut close_clicked = false;
        let mut toggle_clicked = false;

        // dimmed backdrop under the window; a click on it closes the window
        let screen = ctx.screen_rect();
        let backdrop_clicked = eg::Area::new(eg::Id::new("detail_backdrop"))
            .order(eg::Order::Middle)
            .fixed_pos(screen.min)
            .show(ctx, |ui| {
                ui.painter()
                    .rect_filled(screen, 0.0, eg::Color32::from_black_alpha(140));
                ui.allocate_rect(screen, eg::Sense::click()).clicked()
            })
            .inner;

        eg::Window::new(show.name.as_str())
            .id(eg::Id::new("detail_window"))
            .order(eg::Order::Foreground)
            .open(&mut open)
            .collapsible(false)
            .resizable(true)
            .default_width(DETAIL_W)
            .anchor(eg::Align2::CENTER_CENTER, eg::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.horizontal_top(|ui| {
                    let poster_size = eg::vec2(DETAIL_POSTER_W, DETAIL_POSTER_W * 1.4);
                    match &tex {
                        Some(tex) => {
                            ui.image((tex.id(), poster_size));
                        }
                        None => {
                            let (rect, _) =
                                ui.allocate_exact_size(poster_size, eg::Sense::hover());
                            ui.painter().rect_filled(rect, 8.0, eg::Color32::from_gray(40));
                            ui.painter().text(
                                rect.center(),
                                eg::Align2::CENTER_CENTER,
                                "No image",
                                eg::FontId::proportional(14.0),
                                eg::Color32::WHITE,
                            );
                        }
                    }

                    ui.vertical(|ui| {
                        ui.heading(&show.name);
                        if loading {
                            ui.horizontal(|ui| {
                                ui.add(eg::Spinner::new().size(12.0));
                                ui.weak("Loading details…");
                            });
                        }
                        ui.add_space(4.0);

                        eg::Grid::new("detail_facts")
                            .num_columns(2)
                            .spacing([12.0, 4.0])
                            .show(ui, |ui| {
                                ui.strong("Genres");
                                ui.label(join_genres(&show.genres));
                                ui.end_row();

                                ui.strong("Language");
                                ui.label(show.language.as_deref().unwrap_or("—"));
                                ui.end_row();

                                ui.strong("Premiered");
                                ui.label(format_premiered(show.premiered.as_deref()));
                                ui.end_row();

                                ui.strong("Rating");
                                ui.label(format!("⭐ {}", show.rating_label()));
                                ui.end_row();
                            });

                        let facts = facts_line(&show);
                        if !facts.is_empty() {
                            ui.label(eg::RichText::new(facts).weak());
                        }
                        if let Some(url) = safe_link(show.official_site.as_deref()) {
                            ui.hyperlink_to("Official site", url);
                        }
                        ui.add_space(6.0);
                        let fav_text = if is_favorite {
                            "❤ Remove from favorites"
                        } else {
                            "🤍 Add to favorites"
                        };
                        if ui.button(fav_text).clicked() {
                            toggle_clicked = true;
                        }
                    });
                });

                ui.separator();
                eg::ScrollArea::vertical()
                    .id_source("detail_summary")
                    .max_height(220.0)
                    .show(ui, |ui| {
                        let text = show
                            .summary
                            .as_deref()
                            .map(html_to_text)
                            .filter(|t| !t.is_empty())
                            .unwrap_or_else(|| "No summary available.".to_string());
                        ui.add(eg::Label::new(text).wrap());
                    });

                ui.separator();
                ui.with_layout(eg::Layout::right_to_left(eg::Align::Center), |ui| {
                    if ui.button("Close").clicked() {
                        close_clicked = true;
                    }
                });
            });

        if toggle_clicked {
            self.toggle_favorite(&show);
        }
        let escape = ctx.input(|i| i.key_pressed(eg::Key::Escape));
        if !open || close_clicked || escape || backdrop_clicked {
            self.detail.dismiss();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::data::Network;
    use crate::app::storage::MemoryKv;
    use crate::app::FinderApp;
    use crate::config::AppConfig;

    fn app_showing(show: Show) -> (FinderApp, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let mut app = FinderApp::with_parts(
            AppConfig::default(),
            None,
            Box::new(MemoryKv::default()),
            dir.path().to_path_buf(),
            None,
        );
        app.detail.request(show);
        (app, dir)
    }

    /// Lay out once, then hover, press and release at `at`, one frame each.
    fn click_at(app: &mut FinderApp, ctx: &eg::Context, at: eg::Pos2) {
        let screen = eg::Rect::from_min_size(eg::Pos2::ZERO, eg::vec2(1200.0, 800.0));
        let press = |pressed| eg::Event::PointerButton {
            pos: at,
            button: eg::PointerButton::Primary,
            pressed,
            modifiers: eg::Modifiers::default(),
        };
        let frames = vec![
            vec![],
            vec![eg::Event::PointerMoved(at)],
            vec![press(true)],
            vec![press(false)],
        ];
        for events in frames {
            let input = eg::RawInput {
                screen_rect: Some(screen),
                events,
                ..Default::default()
            };
            let _ = ctx.run(input, |ctx| app.ui_render_detail_window(ctx));
        }
    }

    #[test]
    fn backdrop_click_dismisses_window() {
        let ctx = eg::Context::default();
        let (mut app, _dir) = app_showing(Show {
            id: 7,
            name: "Lost".into(),
            ..Show::default()
        });
        assert!(app.detail.current().is_some());

        click_at(&mut app, &ctx, eg::pos2(6.0, 6.0));
        assert!(app.detail.current().is_none());
    }

    #[test]
    fn click_inside_window_keeps_it_open() {
        let ctx = eg::Context::default();
        let (mut app, _dir) = app_showing(Show {
            id: 7,
            name: "Lost".into(),
            ..Show::default()
        });

        click_at(&mut app, &ctx, eg::pos2(600.0, 400.0));
        assert_eq!(app.detail.current().map(|s| s.id), Some(7));
    }

    #[test]
    fn facts_skip_missing_parts() {
        let mut show = Show {
            status: Some("Ended".into()),
            runtime: Some(60),
            network: Some(Network {
                name: "AMC".into(),
            }),
            ..Show::default()
        };
        assert_eq!(facts_line(&show), "Ended · 60 min · AMC");

        show.runtime = None;
        show.network = None;
        assert_eq!(facts_line(&show), "Ended");
        assert_eq!(facts_line(&Show::default()), "");
    }
}
