// src/app/api.rs
use std::time::Duration;

use reqwest::blocking::Client;
use tracing::debug;

use super::data::Show;
use crate::config::AppConfig;

/// Read-only access to the show catalog. Implemented over HTTP by
/// `TvMazeClient`; tests substitute in-process fakes.
pub trait ShowSource: Send + Sync {
    fn list_shows(&self) -> Result<Vec<Show>, String>;
    fn show(&self, id: u64) -> Result<Show, String>;
}

pub struct TvMazeClient {
    client: Client,
    base: String,
}

impl TvMazeClient {
    pub fn new(cfg: &AppConfig) -> Result<Self, String> {
        let client = Client::builder()
            .user_agent(concat!("tvfinder/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(cfg.http_timeout_secs))
            .default_headers({
                use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
                let mut h = HeaderMap::new();
                h.insert(ACCEPT, HeaderValue::from_static("application/json"));
                h
            })
            .build()
            .map_err(|e| format!("http client: {e}"))?;
        Ok(Self {
            client,
            base: cfg.api_base().to_string(),
        })
    }

    fn get_bytes(&self, url: &str) -> Result<Vec<u8>, String> {
        debug!("GET {url}");
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| format!("GET {url}: {e}"))?;
        if !resp.status().is_success() {
            return Err(format!("HTTP {} for {url}", resp.status()));
        }
        resp.bytes()
            .map(|b| b.to_vec())
            .map_err(|e| format!("read body {url}: {e}"))
    }
}

impl ShowSource for TvMazeClient {
    fn list_shows(&self) -> Result<Vec<Show>, String> {
        let body = self.get_bytes(&shows_url(&self.base))?;
        parse_show_list(&body)
    }

    fn show(&self, id: u64) -> Result<Show, String> {
        let body = self.get_bytes(&show_url(&self.base, id))?;
        parse_show(&body)
    }
}

pub fn shows_url(base: &str) -> String {
    format!("{base}/shows")
}

pub fn show_url(base: &str, id: u64) -> String {
    format!("{base}/shows/{id}")
}

pub fn parse_show_list(body: &[u8]) -> Result<Vec<Show>, String> {
    serde_json::from_slice(body).map_err(|e| format!("decode shows: {e}"))
}

pub fn parse_show(body: &[u8]) -> Result<Show, String> {
    serde_json::from_slice(body).map_err(|e| format!("decode show: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_are_built_from_base() {
        let cfg = AppConfig {
            api_base_url: "https://api.example.test/".into(),
            ..AppConfig::default()
        };
        assert_eq!(shows_url(cfg.api_base()), "https://api.example.test/shows");
        assert_eq!(show_url(cfg.api_base(), 42), "https://api.example.test/shows/42");
    }

    #[test]
    fn parses_list_with_mixed_records() {
        let body = br#"[
            {"id":1,"name":"Breaking Bad","genres":["Drama"],"rating":{"average":9.5},
             "image":{"medium":"https://m/1.jpg","original":"https://o/1.jpg"},
             "language":"English","premiered":"2008-01-20","summary":"<p>Chemistry.</p>",
             "weight":99,"_links":{"self":{"href":"x"}}},
            {"id":2,"name":"Friends","genres":["Comedy"],"rating":{"average":8.0},"image":null}
        ]"#;
        let shows = parse_show_list(body).unwrap();
        assert_eq!(shows.len(), 2);
        assert_eq!(shows[0].thumb_url(), Some("https://m/1.jpg"));
        assert_eq!(shows[1].rating_average(), Some(8.0));
        assert_eq!(shows[1].summary, None);
    }

    #[test]
    fn rejects_non_list_bodies() {
        assert!(parse_show_list(b"{\"message\":\"rate limited\"}").is_err());
        assert!(parse_show_list(b"<html>").is_err());
        assert!(parse_show(b"[]").is_err());
    }
}
