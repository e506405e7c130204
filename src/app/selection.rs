// src/app/selection.rs
use tracing::{debug, warn};

use super::data::Show;
use super::types::DetailTicket;

#[derive(Clone, Debug, Default, PartialEq)]
pub enum Selection {
    #[default]
    None,
    /// Summary is on screen while the full record is fetched.
    Loading(Show),
    Ready(Show),
}

/// The single "currently selected" slot behind the detail window.
#[derive(Debug, Default)]
pub struct DetailSlot {
    selection: Selection,
    pending: Option<DetailTicket>,
    next_seq: u64,
}

impl DetailSlot {
    /// Replace the current selection with `summary` and hand out the ticket the
    /// matching fetch must present in `resolve`.
    pub fn request(&mut self, summary: Show) -> DetailTicket {
        self.next_seq += 1;
        let ticket = DetailTicket {
            seq: self.next_seq,
            id: summary.id,
        };
        self.pending = Some(ticket);
        self.selection = Selection::Loading(summary);
        ticket
    }

    /// Apply a finished fetch. Returns false when the ticket is stale and the
    /// response was dropped.
    pub fn resolve(&mut self, ticket: DetailTicket, result: Result<Show, String>) -> bool {
        if self.pending != Some(ticket) {
            debug!(
                "dropping stale detail response for show {} (seq {})",
                ticket.id, ticket.seq
            );
            return false;
        }
        self.pending = None;

        let summary = match std::mem::take(&mut self.selection) {
            Selection::Loading(s) | Selection::Ready(s) => s,
            Selection::None => return false,
        };

        self.selection = match result {
            Ok(full) if full.id == ticket.id => Selection::Ready(full),
            Ok(other) => {
                warn!(
                    "detail for show {} came back as show {}; keeping summary",
                    ticket.id, other.id
                );
                Selection::Ready(summary)
            }
            Err(e) => {
                warn!("detail fetch for show {} failed: {e}", ticket.id);
                Selection::Ready(summary)
            }
        };
        true
    }

    pub fn dismiss(&mut self) {
        self.pending = None;
        self.selection = Selection::None;
    }

    pub fn current(&self) -> Option<&Show> {
        match &self.selection {
            Selection::None => None,
            Selection::Loading(s) | Selection::Ready(s) => Some(s),
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub const fn is_loading(&self) -> bool {
        matches!(self.selection, Selection::Loading(_))
    }

    pub fn selected_id(&self) -> Option<u64> {
        self.current().map(|s| s.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(id: u64, name: &str) -> Show {
        Show {
            id,
            name: name.into(),
            ..Show::default()
        }
    }

    fn full(id: u64, name: &str) -> Show {
        Show {
            id,
            name: name.into(),
            summary: Some("<p>full record</p>".into()),
            language: Some("English".into()),
            ..Show::default()
        }
    }

    #[test]
    fn success_replaces_summary_with_full_record() {
        let mut slot = DetailSlot::default();
        let t = slot.request(summary(1, "A"));
        assert!(slot.is_loading());
        assert_eq!(slot.current().map(|s| s.name.as_str()), Some("A"));

        assert!(slot.resolve(t, Ok(full(1, "A"))));
        assert_eq!(slot.selection(), &Selection::Ready(full(1, "A")));
    }

    #[test]
    fn failure_falls_back_to_summary() {
        let mut slot = DetailSlot::default();
        let t = slot.request(summary(42, "X"));
        assert!(slot.resolve(t, Err("connection reset".into())));
        assert_eq!(slot.selection(), &Selection::Ready(summary(42, "X")));
        assert!(!slot.is_loading());
    }

    #[test]
    fn mismatched_record_falls_back_to_summary() {
        let mut slot = DetailSlot::default();
        let t = slot.request(summary(5, "Five"));
        assert!(slot.resolve(t, Ok(full(6, "Six"))));
        assert_eq!(slot.current(), Some(&summary(5, "Five")));
    }

    #[test]
    fn late_response_for_older_request_is_dropped() {
        let mut slot = DetailSlot::default();
        let ta = slot.request(summary(1, "A"));
        let tb = slot.request(summary(2, "B"));
        // B is shown immediately, never A
        assert_eq!(slot.selected_id(), Some(2));

        assert!(!slot.resolve(ta, Ok(full(1, "A"))));
        assert_eq!(slot.selected_id(), Some(2));
        assert!(slot.is_loading());

        assert!(slot.resolve(tb, Ok(full(2, "B"))));
        assert_eq!(slot.current(), Some(&full(2, "B")));
    }

    #[test]
    fn reselecting_same_show_uses_latest_ticket() {
        let mut slot = DetailSlot::default();
        let first = slot.request(summary(3, "C"));
        let second = slot.request(summary(3, "C"));
        assert_ne!(first, second);
        assert!(!slot.resolve(first, Err("slow".into())));
        assert!(slot.resolve(second, Ok(full(3, "C"))));
        assert_eq!(slot.current(), Some(&full(3, "C")));
    }

    #[test]
    fn dismiss_clears_and_ignores_in_flight_response() {
        let mut slot = DetailSlot::default();
        let t = slot.request(summary(9, "Nine"));
        slot.dismiss();
        assert_eq!(slot.current(), None);
        assert!(!slot.resolve(t, Ok(full(9, "Nine"))));
        assert_eq!(slot.selection(), &Selection::None);
    }
}
