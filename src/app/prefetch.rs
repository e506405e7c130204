// src/app/prefetch.rs
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use eframe::egui as eg;
use tracing::{debug, warn};

use super::cache::{download_and_store_resized_with_client, find_any_by_key, url_to_cache_key};
use super::types::{PosterSize, PosterSlot, PosterState, PrefetchDone, Waker};

const RESIZE_QUALITY: u8 = 80;
const FULL_MAX_W: u32 = 680;
pub(crate) const MAX_DONE_PER_FRAME: usize = 24;
pub(crate) const MAX_UPLOADS_PER_FRAME: usize = 6;

pub(crate) struct PosterJob {
    pub url: String,
    pub key: String,
    pub max_width: u32,
}

/// Fixed set of download threads sharing one HTTP client and one job queue.
pub(crate) struct PosterPool {
    work_tx: Sender<PosterJob>,
    done_rx: Receiver<PrefetchDone>,
}

impl PosterPool {
    pub fn start(workers: usize, dir: PathBuf, timeout_secs: u64, wake: Waker) -> Result<Self, String> {
        let client = reqwest::blocking::Client::builder()
            .user_agent("tvfinder/posters")
            .timeout(Duration::from_secs(timeout_secs))
            .pool_max_idle_per_host(16)
            .default_headers({
                use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
                let mut h = HeaderMap::new();
                h.insert(
                    ACCEPT,
                    HeaderValue::from_static("image/avif,image/webp,image/*;q=0.8,*/*;q=0.5"),
                );
                h
            })
            .build()
            .map_err(|e| format!("http client build failed: {e}"))?;
        let client = Arc::new(client);

        let (work_tx, work_rx) = mpsc::channel::<PosterJob>();
        let (done_tx, done_rx) = mpsc::channel::<PrefetchDone>();
        let work_rx = Arc::new(Mutex::new(work_rx));

        for _ in 0..workers.max(1) {
            let work_rx = Arc::clone(&work_rx);
            let done_tx = done_tx.clone();
            let client = Arc::clone(&client);
            let dir = dir.clone();
            let wake = Arc::clone(&wake);

            std::thread::spawn(move || loop {
                let job = match work_rx.lock() {
                    Ok(rx) => rx.recv(),
                    Err(_) => break,
                };
                let Ok(job) = job else {
                    break;
                };

                let result = download_and_store_resized_with_client(
                    &client,
                    &dir,
                    &job.url,
                    &job.key,
                    job.max_width,
                    RESIZE_QUALITY,
                );
                let done = PrefetchDone {
                    url: job.url,
                    key: job.key,
                    result,
                };
                if done_tx.send(done).is_err() {
                    break;
                }
                wake();
            });
        }

        Ok(Self { work_tx, done_rx })
    }

    pub fn submit(&self, job: PosterJob) -> bool {
        self.work_tx.send(job).is_ok()
    }
}

impl crate::app::FinderApp {
    /// Make sure artwork for `url` is cached or on its way.
    pub(crate) fn request_poster(&mut self, url: &str, size: PosterSize) {
        let slot_key = (url.to_string(), size);
        if self.posters.contains_key(&slot_key) {
            return;
        }

        let key = format!("{}{}", url_to_cache_key(url), size.key_suffix());
        let path = find_any_by_key(&self.poster_dir, &key);
        let mut state = if path.is_some() {
            PosterState::Cached
        } else {
            PosterState::Pending
        };

        if path.is_none() {
            let max_width = match size {
                PosterSize::Thumb => self.config.thumb_max_width,
                PosterSize::Full => FULL_MAX_W,
            };
            let queued = self.poster_pool.as_ref().is_some_and(|pool| {
                pool.submit(PosterJob {
                    url: url.to_string(),
                    key: key.clone(),
                    max_width,
                })
            });
            if !queued {
                state = PosterState::Failed;
            }
        }

        self.posters.insert(
            slot_key,
            PosterSlot {
                key,
                path,
                tex: None,
                state,
            },
        );
    }

    /// Queue thumbnails for every show, in catalog order.
    pub(crate) fn queue_catalog_thumbs(&mut self) {
        let urls: Vec<String> = self
            .catalog
            .iter()
            .chain(self.favorites.list().iter())
            .filter_map(|s| s.thumb_url().map(str::to_string))
            .collect();
        for url in urls {
            self.request_poster(&url, PosterSize::Thumb);
        }
    }

    pub(crate) fn poll_prefetch_done(&mut self) {
        let Some(pool) = self.poster_pool.as_ref() else {
            return;
        };
        let mut finished = Vec::new();
        while finished.len() < MAX_DONE_PER_FRAME {
            match pool.done_rx.try_recv() {
                Ok(msg) => finished.push(msg),
                Err(_) => break,
            }
        }

        for msg in finished {
            // thumb and full-size slots may share a url; the key tells them apart
            let slot = [PosterSize::Thumb, PosterSize::Full]
                .into_iter()
                .find_map(|size| {
                    self.posters
                        .get(&(msg.url.clone(), size))
                        .filter(|s| s.key == msg.key)
                        .map(|_| size)
                })
                .and_then(|size| self.posters.get_mut(&(msg.url.clone(), size)));
            let Some(slot) = slot else {
                continue;
            };
            match msg.result {
                Ok(path) => {
                    slot.path = Some(path);
                    slot.state = PosterState::Cached;
                }
                Err(e) => {
                    debug!("poster failed {}: {e}", msg.url);
                    slot.state = PosterState::Failed;
                }
            }
        }
    }

    /// Upload a cached poster to the GPU if the per-frame budget allows.
    /// Returns the texture when one is available.
    pub(crate) fn poster_texture(
        &mut self,
        ctx: &eg::Context,
        url: &str,
        size: PosterSize,
    ) -> Option<eg::TextureHandle> {
        let slot = self.posters.get_mut(&(url.to_string(), size))?;
        if slot.state == PosterState::Cached && self.uploads_left > 0 {
            self.uploads_left -= 1;
            if let Some(path) = slot.path.as_ref() {
                match super::gfx::load_texture_from_path(ctx, path, &slot.key) {
                    Ok(tex) => {
                        slot.tex = Some(tex);
                        slot.state = PosterState::Ready;
                    }
                    Err(e) => {
                        warn!("poster upload failed for {url}: {e}");
                        slot.state = PosterState::Failed;
                    }
                }
            }
        }
        slot.tex.clone()
    }

    pub(crate) fn posters_in_flight(&self) -> usize {
        self.posters
            .values()
            .filter(|s| s.state == PosterState::Pending)
            .count()
    }
}
