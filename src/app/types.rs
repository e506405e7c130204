// src/app/types.rs
use eframe::egui::TextureHandle;
use std::path::PathBuf;
use std::sync::Arc;

use super::data::Show;

/// Called by worker threads after they post a message, so the UI loop wakes up.
pub type Waker = Arc<dyn Fn() + Send + Sync>;

// ---- cross-thread messages ----
pub enum CatalogMsg {
    Done(Vec<Show>),
    Error(String),
}

/// Identifies one detail request; only the latest ticket may fill the panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DetailTicket {
    pub seq: u64,
    pub id: u64,
}

pub struct DetailMsg {
    pub ticket: DetailTicket,
    pub result: Result<Show, String>,
}

pub struct PrefetchDone {
    pub url: String,
    pub key: String,
    pub result: Result<PathBuf, String>,
}

// ---- app phases / states ----
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BootPhase {
    Starting,
    LoadingCatalog,
    Ready,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PosterState {
    Pending, // queued or downloading
    Cached,  // file present on disk (ready to upload)
    Ready,   // texture uploaded
    Failed,  // permanent failure
}

/// Artwork variants; each is cached separately.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PosterSize {
    Thumb,
    Full,
}

impl PosterSize {
    pub const fn key_suffix(self) -> &'static str {
        match self {
            Self::Thumb => "__s",
            Self::Full => "__l",
        }
    }
}

pub struct PosterSlot {
    pub key: String,
    pub path: Option<PathBuf>,
    pub tex: Option<TextureHandle>, // UI thread only
    pub state: PosterState,
}
