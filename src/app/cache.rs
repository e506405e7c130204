use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use image::{imageops::FilterType, DynamicImage, GenericImageView};
use reqwest::blocking::Client;
use tracing::{debug, warn};

use crate::config::{resolve_relative_path, AppConfig, DEFAULT_CACHE_DIR};

const POSTER_RETENTION_DAYS: u64 = 14;
const POSTER_RETENTION_SECS: u64 = POSTER_RETENTION_DAYS * 24 * 60 * 60;

/// Resolve and create the cache root, falling back to a local folder.
pub fn cache_dir(cfg: &AppConfig) -> PathBuf {
    let mut path = PathBuf::from(
        cfg.cache_dir
            .clone()
            .unwrap_or_else(|| resolve_relative_path(DEFAULT_CACHE_DIR)),
    );
    if let Err(e) = fs::create_dir_all(&path) {
        warn!("failed to create cache dir {}: {e}", path.display());
        path = PathBuf::from(resolve_relative_path(DEFAULT_CACHE_DIR));
        let _ = fs::create_dir_all(&path);
    }
    path
}

/// `<cache>/posters`, pruned of stale files once per call.
pub fn poster_cache_dir(cache_root: &Path) -> PathBuf {
    let mut path = cache_root.join("posters");
    if let Err(e) = fs::create_dir_all(&path) {
        warn!("failed to create poster cache dir {}: {e}", path.display());
        path = cache_root.to_path_buf();
    }
    match prune_poster_cache_in_dir(&path) {
        Ok(0) => {}
        Ok(n) => debug!("pruned {n} stale posters"),
        Err(err) => warn!("poster cache prune failed: {err}"),
    }
    path
}

pub fn prune_poster_cache_in_dir(dir: &Path) -> std::io::Result<usize> {
    let cutoff = SystemTime::now()
        .checked_sub(Duration::from_secs(POSTER_RETENTION_SECS))
        .unwrap_or(SystemTime::UNIX_EPOCH);
    let mut removed = 0usize;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_ascii_lowercase());
        match ext.as_deref() {
            // interrupted downloads never become valid
            Some("part") => {
                let _ = fs::remove_file(&path);
                removed += 1;
                continue;
            }
            Some("jpg" | "jpeg" | "png" | "webp") => {}
            _ => continue,
        }
        let modified = entry
            .metadata()?
            .modified()
            .unwrap_or(SystemTime::UNIX_EPOCH);
        if modified < cutoff {
            let _ = fs::remove_file(&path);
            removed += 1;
        }
    }
    Ok(removed)
}

pub fn url_to_cache_key(url: &str) -> String {
    format!("{:x}", md5::compute(url.as_bytes()))
}

pub fn find_any_by_key(dir: &Path, key: &str) -> Option<PathBuf> {
    ["jpg", "jpeg", "png", "webp"]
        .iter()
        .map(|ext| dir.join(format!("{key}.{ext}")))
        .find(|p| p.is_file())
}

/// Return (width, height, RGBA8 bytes) for a cached image file.
pub fn load_rgba_image(path: &Path) -> Result<(u32, u32, Vec<u8>), String> {
    let img = image::ImageReader::open(path)
        .map_err(|e| format!("open image {}: {e}", path.display()))?
        .with_guessed_format()
        .map_err(|e| format!("guess format {}: {e}", path.display()))?
        .decode()
        .map_err(|e| format!("decode {}: {e}", path.display()))?;
    let (w, h) = img.dimensions();
    Ok((w, h, img.to_rgba8().into_raw()))
}

/// Scale down to `max_width` keeping aspect, and encode as JPEG.
pub fn resize_to_jpeg(img: DynamicImage, max_width: u32, quality: u8) -> Result<Vec<u8>, String> {
    let (w, h) = img.dimensions();
    let out = if w > max_width {
        let new_h = ((h as f32) * (max_width as f32 / w as f32))
            .round()
            .max(1.0) as u32;
        img.resize_exact(max_width, new_h, FilterType::CatmullRom)
    } else {
        img
    };

    // JPEG has no alpha channel
    let rgb = out.to_rgb8();
    let mut jpeg_bytes: Vec<u8> = Vec::new();
    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut jpeg_bytes, quality)
        .encode(
            rgb.as_raw(),
            rgb.width(),
            rgb.height(),
            image::ExtendedColorType::Rgb8,
        )
        .map_err(|e| format!("jpeg encode: {e}"))?;
    Ok(jpeg_bytes)
}

/// Download an image with a shared client, resize it and store it as
/// `<dir>/<key>.jpg`. An existing file is reused.
pub fn download_and_store_resized_with_client(
    client: &Client,
    dir: &Path,
    url: &str,
    key: &str,
    max_width: u32,
    quality: u8,
) -> Result<PathBuf, String> {
    let dest = dir.join(format!("{key}.jpg"));
    if dest.exists() {
        return Ok(dest);
    }

    let bytes = client
        .get(url)
        .send()
        .and_then(|r| r.error_for_status())
        .and_then(|r| r.bytes())
        .map_err(|e| format!("download {url}: {e}"))?;

    let img = image::load_from_memory(&bytes).map_err(|e| format!("decode {url}: {e}"))?;
    let jpeg_bytes = resize_to_jpeg(img, max_width, quality)?;
    write_atomic(&dest, &jpeg_bytes)?;
    Ok(dest)
}

fn write_atomic(dest: &Path, bytes: &[u8]) -> Result<(), String> {
    if let Some(parent) = dest.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let tmp = dest.with_extension("jpg.part");
    {
        let mut f = fs::File::create(&tmp).map_err(|e| format!("create tmp: {e}"))?;
        f.write_all(bytes).map_err(|e| format!("write: {e}"))?;
    }
    fs::rename(&tmp, dest).map_err(|e| format!("rename: {e}"))
}
