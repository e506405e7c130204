// src/app/mod.rs

// ---- Standard lib imports ----
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};

// ---- Crates ----
use eframe::egui as eg;
use tracing::{info, warn};

// ---- Local modules ----
pub mod api;
pub mod cache;
pub mod data;
pub mod favorites;
pub mod filters;
pub mod gfx;
pub mod loader;
pub mod selection;
pub mod storage;
pub mod types;
pub mod utils;

mod detail;
mod prefetch;
mod ui;

pub use data::Show;
pub use types::*;

use crate::config::AppConfig;
use api::{ShowSource, TvMazeClient};
use favorites::FavoritesStore;
use filters::{filtered_indices, FilterCriteria};
use prefetch::{PosterPool, MAX_UPLOADS_PER_FRAME};
use selection::DetailSlot;
use storage::KvStore;

// ---- Tunables ----
const STATUS_EMIT_EVERY_MS: u64 = 120;
const POSTER_W_MIN: f32 = 110.0;
const POSTER_W_MAX: f32 = 220.0;

pub struct FinderApp {
    config: AppConfig,
    source: Option<Arc<dyn ShowSource>>,

    // catalog, written only by the loader
    catalog: Vec<Show>,
    catalog_rx: Option<Receiver<CatalogMsg>>,
    catalog_started: bool,
    boot_phase: BootPhase,

    // derived view
    criteria: FilterCriteria,
    view: Vec<usize>,
    view_dirty: bool,

    favorites: FavoritesStore<Box<dyn KvStore>>,

    // detail window
    detail: DetailSlot,
    detail_tx: Sender<DetailMsg>,
    detail_rx: Receiver<DetailMsg>,

    // artwork
    poster_dir: PathBuf,
    poster_pool: Option<PosterPool>,
    posters: HashMap<(String, PosterSize), PosterSlot>,
    uploads_left: usize,
    poster_width_ui: f32,

    // status line
    status_message: String,
    status_last_emit: Instant,
}

impl FinderApp {
    /// Production wiring: HTTP client, SQLite favorites, poster workers.
    pub fn new(config: AppConfig, ctx: &eg::Context) -> Self {
        let root = cache::cache_dir(&config);
        let poster_dir = cache::poster_cache_dir(&root);
        let kv = storage::open_or_memory(&config.favorites_db_path(&root));

        let source: Option<Arc<dyn ShowSource>> = match TvMazeClient::new(&config) {
            Ok(c) => Some(Arc::new(c)),
            Err(e) => {
                warn!("API client unavailable: {e}");
                None
            }
        };

        let pool = match PosterPool::start(
            config.poster_workers,
            poster_dir.clone(),
            config.http_timeout_secs,
            loader::ctx_waker(ctx),
        ) {
            Ok(p) => Some(p),
            Err(e) => {
                warn!("{e}; posters disabled");
                None
            }
        };

        info!(
            "cache at {}, api {}",
            root.display(),
            config.api_base()
        );
        let mut app = Self::with_parts(config, source, kv, poster_dir, pool);
        app.queue_catalog_thumbs();
        app
    }

    pub(crate) fn with_parts(
        config: AppConfig,
        source: Option<Arc<dyn ShowSource>>,
        kv: Box<dyn KvStore>,
        poster_dir: PathBuf,
        poster_pool: Option<PosterPool>,
    ) -> Self {
        let (detail_tx, detail_rx) = mpsc::channel::<DetailMsg>();
        Self {
            config,
            source,

            catalog: Vec::new(),
            catalog_rx: None,
            catalog_started: false,
            boot_phase: BootPhase::Starting,

            criteria: FilterCriteria::default(),
            view: Vec::new(),
            view_dirty: true,

            favorites: FavoritesStore::load(kv),

            detail: DetailSlot::default(),
            detail_tx,
            detail_rx,

            poster_dir,
            poster_pool,
            posters: HashMap::new(),
            uploads_left: MAX_UPLOADS_PER_FRAME,
            poster_width_ui: 150.0,

            status_message: String::new(),
            status_last_emit: Instant::now(),
        }
    }

    fn set_status<S: Into<String>>(&mut self, s: S) {
        let s = s.into();
        let due = self.status_last_emit.elapsed() >= Duration::from_millis(STATUS_EMIT_EVERY_MS);
        if self.status_message != s || due {
            self.status_message = s;
            self.status_last_emit = Instant::now();
        }
    }

    /// Recompute the visible rows if the catalog or any criterion changed.
    pub(crate) fn refresh_view(&mut self) {
        if !self.view_dirty {
            return;
        }
        self.view = filtered_indices(&self.catalog, &self.criteria);
        self.view_dirty = false;
    }

    pub(crate) fn visible_shows(&self) -> impl Iterator<Item = &Show> {
        self.view.iter().filter_map(|&i| self.catalog.get(i))
    }

    fn find_show(&self, id: u64) -> Option<Show> {
        self.catalog
            .iter()
            .chain(self.favorites.list().iter())
            .find(|s| s.id == id)
            .cloned()
    }

    pub(crate) fn toggle_favorite(&mut self, show: &Show) {
        let now_fav = self.favorites.toggle(show);
        info!(
            "{} {} ({} favorites)",
            if now_fav { "favorited" } else { "unfavorited" },
            show.name,
            self.favorites.len()
        );
        if let Some(url) = show.thumb_url() {
            self.request_poster(url, PosterSize::Thumb);
        }
    }

    pub(crate) fn apply_card_action(&mut self, action: ui::CardAction, ctx: &eg::Context) {
        match action {
            ui::CardAction::Open(id) => {
                if let Some(show) = self.find_show(id) {
                    self.show_detail(show, ctx);
                }
            }
            ui::CardAction::ToggleFavorite(id) => {
                if let Some(show) = self.find_show(id) {
                    self.toggle_favorite(&show);
                }
            }
        }
    }
}

// ========== App impl ==========
impl eframe::App for FinderApp {
    fn update(&mut self, ctx: &eg::Context, _frame: &mut eframe::Frame) {
        if self.boot_phase == BootPhase::Starting {
            self.start_catalog_load(ctx);
        }

        self.poll_catalog(ctx);
        self.poll_details();
        self.poll_prefetch_done();
        self.refresh_view();
        self.uploads_left = MAX_UPLOADS_PER_FRAME;

        eg::TopBottomPanel::top("controls").show(ctx, |ui| {
            self.ui_render_topbar(ui);
        });

        self.ui_render_detail_window(ctx);

        eg::CentralPanel::default().show(ctx, |ui| {
            if self.boot_phase != BootPhase::Ready {
                self.ui_render_splash(ui);
                return;
            }
            self.ui_render_favorites(ui, ctx);
            self.ui_render_results(ui, ctx);
        });

        // posters left waiting on the upload budget need another frame
        if self.uploads_left == 0 {
            ctx.request_repaint();
        } else if self.boot_phase != BootPhase::Ready || self.posters_in_flight() > 0 {
            ctx.request_repaint_after(Duration::from_millis(250));
        }
    }
}
