// src/app/favorites.rs
use std::collections::HashSet;

use tracing::{debug, warn};

use super::data::Show;
use super::storage::KvStore;

pub const FAVORITES_KEY: &str = "myFavorites";

/// Insertion-ordered favorites, unique by show id. The store is the only
/// writer of `FAVORITES_KEY` and rewrites the whole list after every change.
pub struct FavoritesStore<S: KvStore> {
    items: Vec<Show>,
    store: S,
}

impl<S: KvStore> FavoritesStore<S> {
    /// Read prior state once. Missing or unreadable data starts an empty list.
    pub fn load(store: S) -> Self {
        let items = match store.get(FAVORITES_KEY) {
            Ok(Some(raw)) => decode_favorites(&raw),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("favorites read failed: {e}");
                Vec::new()
            }
        };
        debug!("loaded {} favorites", items.len());
        Self { items, store }
    }

    pub fn list(&self) -> &[Show] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, id: u64) -> bool {
        self.items.iter().any(|s| s.id == id)
    }

    /// Add or remove `show` by id. Returns whether it is a favorite afterwards.
    pub fn toggle(&mut self, show: &Show) -> bool {
        let now_fav = if let Some(pos) = self.items.iter().position(|s| s.id == show.id) {
            self.items.remove(pos);
            false
        } else {
            self.items.push(show.clone());
            true
        };
        self.persist();
        now_fav
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn persist(&mut self) {
        let json = match serde_json::to_string(&self.items) {
            Ok(j) => j,
            Err(e) => {
                warn!("favorites encode failed: {e}");
                return;
            }
        };
        if let Err(e) = self.store.put(FAVORITES_KEY, &json) {
            warn!("favorites write failed: {e}");
        }
    }
}

fn decode_favorites(raw: &str) -> Vec<Show> {
    match serde_json::from_str::<Option<Vec<Show>>>(raw) {
        Ok(list) => {
            let mut seen = HashSet::new();
            let mut list = list.unwrap_or_default();
            list.retain(|s| seen.insert(s.id));
            list
        }
        Err(e) => {
            warn!("stored favorites are malformed ({e}); starting empty");
            Vec::new()
        }
    }
}
