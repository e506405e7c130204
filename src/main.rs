// src/main.rs
use std::env;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn pick_renderer() -> eframe::Renderer {
    match env::var("TVF_RENDERER").as_deref() {
        Ok("glow") => eframe::Renderer::Glow,
        Ok("wgpu") => eframe::Renderer::Wgpu,
        _ => {
            #[cfg(target_os = "windows")]
            {
                eframe::Renderer::Wgpu
            }
            #[cfg(not(target_os = "windows"))]
            {
                eframe::Renderer::Glow
            }
        }
    }
}

fn main() -> eframe::Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();

    let config = tvfinder::config::load_config();
    info!(
        "starting with {} poster workers, {}s HTTP timeout",
        config.poster_workers, config.http_timeout_secs
    );

    let options = eframe::NativeOptions {
        renderer: pick_renderer(),
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([1180.0, 820.0])
            .with_min_inner_size([560.0, 420.0]),
        ..Default::default()
    };

    match eframe::run_native(
        "TV Series Finder",
        options,
        Box::new(|cc| {
            Ok(Box::new(tvfinder::app::FinderApp::new(
                config,
                &cc.egui_ctx,
            )))
        }),
    ) {
        Ok(_) => Ok(()),
        Err(e) => {
            error!("eframe failed to start: {e:?}");
            error!("Hint: try TVF_RENDERER=wgpu or TVF_RENDERER=glow.");
            Err(e)
        }
    }
}
