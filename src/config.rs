use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use tracing::{info, warn};

pub const CONFIG_FILE: &str = "config.json";
pub const DEFAULT_API_BASE: &str = "https://api.tvmaze.com";
pub const DEFAULT_CACHE_DIR: &str = ".tvfinder_cache";
pub const FAVORITES_DB_FILE: &str = "favorites.db";

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub api_base_url: String,
    pub cache_dir: Option<String>,
    pub favorites_db: Option<String>,
    pub poster_workers: usize,
    pub http_timeout_secs: u64,
    pub thumb_max_width: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE.to_string(),
            cache_dir: None,
            favorites_db: None,
            poster_workers: 8,
            http_timeout_secs: 20,
            thumb_max_width: 240,
        }
    }
}

impl AppConfig {
    /// Base URL without a trailing slash so endpoints can be appended verbatim.
    pub fn api_base(&self) -> &str {
        self.api_base_url.trim_end_matches('/')
    }

    pub fn favorites_db_path(&self, cache_dir: &Path) -> PathBuf {
        self.favorites_db
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| cache_dir.join(FAVORITES_DB_FILE))
    }
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(alias = "api_base")]
    api_base_url: Option<String>,
    cache_dir: Option<String>,
    favorites_db: Option<String>,
    poster_workers: Option<usize>,
    http_timeout_secs: Option<u64>,
    thumb_max_width: Option<u32>,
}

pub fn load_config() -> AppConfig {
    load_config_from(Path::new(CONFIG_FILE))
}

pub fn load_config_from(cfg_path: &Path) -> AppConfig {
    match fs::read_to_string(cfg_path) {
        Ok(raw) => match parse_config(&raw) {
            Ok(cfg) => {
                info!("Loaded config from {}", cfg_path.display());
                cfg
            }
            Err(err) => {
                warn!("Failed to parse {} ({}). Using defaults.", cfg_path.display(), err);
                AppConfig::default()
            }
        },
        Err(_) => {
            info!("No {} found; using defaults", cfg_path.display());
            AppConfig::default()
        }
    }
}

/// Merge a raw JSON document over the defaults.
pub fn parse_config(raw: &str) -> Result<AppConfig, String> {
    let parsed: RawConfig = serde_json::from_str(raw).map_err(|e| e.to_string())?;
    let mut cfg = AppConfig::default();

    if let Some(base) = parsed.api_base_url {
        let base = base.trim();
        if base.starts_with("http://") || base.starts_with("https://") {
            cfg.api_base_url = base.to_string();
        } else {
            warn!("Ignoring api_base_url `{base}`: expected an http(s) URL.");
        }
    }
    if parsed.cache_dir.is_some() {
        cfg.cache_dir = parsed.cache_dir;
    }
    if parsed.favorites_db.is_some() {
        cfg.favorites_db = parsed.favorites_db;
    }
    if let Some(n) = parsed.poster_workers {
        cfg.poster_workers = n.clamp(1, 32);
    }
    if let Some(secs) = parsed.http_timeout_secs {
        cfg.http_timeout_secs = secs.max(1);
    }
    if let Some(w) = parsed.thumb_max_width {
        cfg.thumb_max_width = w.clamp(80, 680);
    }

    Ok(cfg)
}

pub fn resolve_relative_path(p: &str) -> String {
    let path = Path::new(p);
    if path.is_absolute() {
        return p.to_string();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path).to_string_lossy().into_owned())
        .unwrap_or_else(|_| p.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let cfg = parse_config("{}").unwrap();
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.api_base(), "https://api.tvmaze.com");
    }

    #[test]
    fn values_are_merged_and_clamped() {
        let cfg = parse_config(
            r#"{ "api_base": "http://localhost:8080/", "poster_workers": 99,
                 "http_timeout_secs": 0, "thumb_max_width": 10, "cache_dir": "/tmp/tvf" }"#,
        )
        .unwrap();
        assert_eq!(cfg.api_base(), "http://localhost:8080");
        assert_eq!(cfg.poster_workers, 32);
        assert_eq!(cfg.http_timeout_secs, 1);
        assert_eq!(cfg.thumb_max_width, 80);
        assert_eq!(cfg.cache_dir.as_deref(), Some("/tmp/tvf"));
    }

    #[test]
    fn non_http_base_is_ignored() {
        let cfg = parse_config(r#"{ "api_base_url": "ftp://example.com" }"#).unwrap();
        assert_eq!(cfg.api_base_url, DEFAULT_API_BASE);
    }

    #[test]
    fn missing_or_broken_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert_eq!(load_config_from(&missing), AppConfig::default());

        let broken = dir.path().join("config.json");
        fs::write(&broken, "{ not json").unwrap();
        assert_eq!(load_config_from(&broken), AppConfig::default());
    }

    #[test]
    fn favorites_db_defaults_into_cache_dir() {
        let cfg = AppConfig::default();
        let p = cfg.favorites_db_path(Path::new("/data/cache"));
        assert_eq!(p, Path::new("/data/cache").join(FAVORITES_DB_FILE));

        let cfg = AppConfig {
            favorites_db: Some("/elsewhere/favs.db".into()),
            ..AppConfig::default()
        };
        assert_eq!(
            cfg.favorites_db_path(Path::new("/data/cache")),
            PathBuf::from("/elsewhere/favs.db")
        );
    }
}
