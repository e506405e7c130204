use std::cmp::Ordering;

use super::data::Show;

/// Genre choices offered in the top bar: (tag sent to the filter, label).
/// This list is fixed and does not follow the loaded catalog.
pub const GENRE_OPTIONS: [(&str, &str); 4] = [
    ("Drama", "Drama"),
    ("Science-Fiction", "Science Fiction"),
    ("Comedy", "Comedy"),
    ("Action", "Action"),
];

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub query: String,
    pub genre: Option<String>,
    pub sort_by_rating: bool,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        self.query.is_empty() && self.active_genre().is_none() && !self.sort_by_rating
    }

    fn active_genre(&self) -> Option<&str> {
        self.genre.as_deref().filter(|g| !g.is_empty())
    }
}

pub fn genre_label(tag: Option<&str>) -> &'static str {
    match tag {
        None | Some("") => "All genres",
        Some(t) => GENRE_OPTIONS
            .iter()
            .find(|(tag, _)| *tag == t)
            .map_or("Other", |(_, label)| *label),
    }
}

pub fn matches_query(show: &Show, needle_lower: &str) -> bool {
    needle_lower.is_empty() || show.name.to_lowercase().contains(needle_lower)
}

/// Missing ratings order below every present one.
pub fn cmp_rating_desc(a: &Show, b: &Show) -> Ordering {
    match (a.rating_average(), b.rating_average()) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Derive the visible rows (as catalog indices) from the catalog and criteria.
/// Name and genre filters apply first, then the optional stable rating sort.
pub fn filtered_indices(shows: &[Show], criteria: &FilterCriteria) -> Vec<usize> {
    let needle = criteria.query.to_lowercase();
    let genre = criteria.active_genre();

    let mut out: Vec<usize> = shows
        .iter()
        .enumerate()
        .filter(|(_, s)| matches_query(s, &needle))
        .filter(|(_, s)| genre.map_or(true, |g| s.has_genre(g)))
        .map(|(i, _)| i)
        .collect();

    if criteria.sort_by_rating {
        out.sort_by(|&a, &b| cmp_rating_desc(&shows[a], &shows[b]));
    }
    out
}
