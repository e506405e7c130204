// src/app/loader.rs
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;

use eframe::egui as eg;
use tracing::{error, info};

use super::api::ShowSource;
use super::types::{BootPhase, CatalogMsg, DetailMsg, DetailTicket, Waker};

/// Fetch the whole catalog on a worker thread. One message is sent, then the
/// channel closes.
pub fn spawn_catalog_load(source: Arc<dyn ShowSource>, wake: Waker) -> Receiver<CatalogMsg> {
    let (tx, rx) = mpsc::channel::<CatalogMsg>();
    std::thread::spawn(move || {
        let msg = match source.list_shows() {
            Ok(list) => CatalogMsg::Done(list),
            Err(e) => CatalogMsg::Error(e),
        };
        let _ = tx.send(msg);
        wake();
    });
    rx
}

/// Fetch one full record for the detail window on a worker thread.
pub fn spawn_detail_fetch(
    source: Arc<dyn ShowSource>,
    ticket: DetailTicket,
    tx: Sender<DetailMsg>,
    wake: Waker,
) {
    std::thread::spawn(move || {
        let result = source.show(ticket.id);
        let _ = tx.send(DetailMsg { ticket, result });
        wake();
    });
}

impl crate::app::FinderApp {
    /// Kick off the one catalog request of this run.
    pub(crate) fn start_catalog_load(&mut self, ctx: &eg::Context) {
        if self.catalog_started {
            return;
        }
        self.catalog_started = true;
        self.boot_phase = BootPhase::LoadingCatalog;
        self.set_status("Loading shows…");

        let Some(source) = self.source.clone() else {
            error!("catalog load skipped: no API client");
            self.boot_phase = BootPhase::Ready;
            self.set_status("No shows loaded.");
            return;
        };
        self.catalog_rx = Some(spawn_catalog_load(source, ctx_waker(ctx)));
    }

    pub(crate) fn poll_catalog(&mut self, ctx: &eg::Context) {
        let Some(rx) = self.catalog_rx.as_ref() else {
            return;
        };
        match rx.try_recv() {
            Ok(CatalogMsg::Done(list)) => {
                info!("catalog loaded: {} shows", list.len());
                self.set_status(format!("{} shows loaded.", list.len()));
                self.catalog = list;
                self.view_dirty = true;
                self.catalog_rx = None;
                self.boot_phase = BootPhase::Ready;
                self.queue_catalog_thumbs();
                ctx.request_repaint();
            }
            Ok(CatalogMsg::Error(e)) => {
                error!("Error loading shows: {e}");
                self.set_status("No shows loaded.");
                self.catalog_rx = None;
                self.boot_phase = BootPhase::Ready;
                ctx.request_repaint();
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                error!("catalog loader exited without a result");
                self.catalog_rx = None;
                self.boot_phase = BootPhase::Ready;
            }
        }
    }

    /// Open the detail window for `summary` and refresh it from the API.
    pub(crate) fn show_detail(&mut self, summary: crate::app::Show, ctx: &eg::Context) {
        let ticket = self.detail.request(summary);
        match self.source.clone() {
            Some(source) => {
                spawn_detail_fetch(source, ticket, self.detail_tx.clone(), ctx_waker(ctx));
            }
            None => {
                self.detail.resolve(ticket, Err("no API client".into()));
            }
        }
    }

    pub(crate) fn poll_details(&mut self) {
        while let Ok(msg) = self.detail_rx.try_recv() {
            if self.detail.resolve(msg.ticket, msg.result) {
                if let Some(url) = self.detail.current().and_then(|s| s.original_url()) {
                    let url = url.to_string();
                    self.request_poster(&url, super::PosterSize::Full);
                }
            }
        }
    }
}

pub(crate) fn ctx_waker(ctx: &eg::Context) -> Waker {
    let ctx = ctx.clone();
    Arc::new(move || ctx.request_repaint())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::data::Show;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct FakeSource {
        shows: Result<Vec<Show>, String>,
        detail_calls: AtomicUsize,
    }

    impl ShowSource for FakeSource {
        fn list_shows(&self) -> Result<Vec<Show>, String> {
            self.shows.clone()
        }

        fn show(&self, id: u64) -> Result<Show, String> {
            self.detail_calls.fetch_add(1, Ordering::SeqCst);
            match &self.shows {
                Ok(list) => list
                    .iter()
                    .find(|s| s.id == id)
                    .cloned()
                    .ok_or_else(|| format!("HTTP 404 Not Found for /shows/{id}")),
                Err(e) => Err(e.clone()),
            }
        }
    }

    fn fake(shows: Result<Vec<Show>, String>) -> Arc<FakeSource> {
        Arc::new(FakeSource {
            shows,
            detail_calls: AtomicUsize::new(0),
        })
    }

    fn counting_waker() -> (Waker, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let h = Arc::clone(&hits);
        let wake: Waker = Arc::new(move || {
            h.fetch_add(1, Ordering::SeqCst);
        });
        (wake, hits)
    }

    #[test]
    fn catalog_load_delivers_list_and_wakes() {
        let list = vec![Show {
            id: 1,
            name: "Lost".into(),
            ..Show::default()
        }];
        let (wake, hits) = counting_waker();
        let rx = spawn_catalog_load(fake(Ok(list.clone())), wake);
        match rx.recv_timeout(Duration::from_secs(5)).unwrap() {
            CatalogMsg::Done(got) => assert_eq!(got, list),
            CatalogMsg::Error(e) => panic!("unexpected error {e}"),
        }
        // the worker wakes the UI right after sending; wait for it to finish
        assert!(rx.recv_timeout(Duration::from_secs(5)).is_err());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn catalog_failure_is_reported_not_panicked() {
        let (wake, _) = counting_waker();
        let rx = spawn_catalog_load(fake(Err("dns failure".into())), wake);
        match rx.recv_timeout(Duration::from_secs(5)).unwrap() {
            CatalogMsg::Error(e) => assert!(e.contains("dns")),
            CatalogMsg::Done(_) => panic!("expected an error"),
        }
    }

    #[test]
    fn detail_fetch_carries_its_ticket() {
        let src = fake(Ok(vec![Show {
            id: 42,
            name: "X".into(),
            language: Some("English".into()),
            ..Show::default()
        }]));
        let (tx, rx) = mpsc::channel();
        let (wake, _) = counting_waker();
        let ticket = DetailTicket { seq: 7, id: 42 };
        spawn_detail_fetch(src.clone(), ticket, tx, wake);
        let msg = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(msg.ticket, ticket);
        assert_eq!(msg.result.unwrap().language.as_deref(), Some("English"));
        assert_eq!(src.detail_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn failed_detail_fetch_resolves_to_summary() {
        use crate::app::selection::{DetailSlot, Selection};

        let src = fake(Err("timeout".into()));
        let (tx, rx) = mpsc::channel();
        let (wake, _) = counting_waker();

        let summary = Show {
            id: 42,
            name: "X".into(),
            ..Show::default()
        };
        let mut slot = DetailSlot::default();
        let ticket = slot.request(summary.clone());
        spawn_detail_fetch(src, ticket, tx, wake);

        let msg = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(slot.resolve(msg.ticket, msg.result));
        assert_eq!(slot.selection(), &Selection::Ready(summary));
    }
}
