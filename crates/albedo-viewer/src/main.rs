use std::path::PathBuf;
use std::time::Duration;

use albedo_engine::SurfaceHost;
use albedo_engine::assets::{AssetId, ResourceDir};
use albedo_engine::device::GpuContext;
use albedo_engine::logging::{LoggingConfig, init_logging};
use albedo_engine::render::PbrRenderer;
use albedo_engine::window::{Runtime, RuntimeConfig};
use anyhow::Result;
use winit::dpi::LogicalSize;

const ASSETS_ENV: &str = "ALBEDO_ASSETS";
const REDRAW_ENV: &str = "ALBEDO_REDRAW_MS";

/// Asset directory: first argument, then `$ALBEDO_ASSETS`, then `./assets`.
fn asset_dir() -> PathBuf {
    std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| std::env::var_os(ASSETS_ENV).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("assets"))
}

/// Optional fixed redraw interval, for watching frame cost without input.
fn redraw_interval() -> Option<Duration> {
    let raw = std::env::var(REDRAW_ENV).ok()?;
    match raw.parse::<u64>() {
        Ok(ms) if ms > 0 => Some(Duration::from_millis(ms)),
        _ => {
            log::warn!("ignoring {REDRAW_ENV}={raw:?}; expected a positive integer");
            None
        }
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let assets = ResourceDir::new(asset_dir());
    for asset in [AssetId::Color, AssetId::MetalAlbedo] {
        match assets.resolve(asset) {
            Some(path) => log::info!("`{asset}` -> {}", path.display()),
            None => log::warn!("`{asset}` not found under {}", assets.root().display()),
        }
    }

    let gpu = GpuContext::new();
    let host = SurfaceHost::new(PbrRenderer::new(gpu.clone()), assets);

    let config = RuntimeConfig {
        title: "albedo".to_string(),
        initial_size: LogicalSize::new(800.0, 600.0),
    };

    let runtime = Runtime::new(config, gpu, host)?;

    if let Some(interval) = redraw_interval() {
        let requester = runtime.render_requester();
        std::thread::spawn(move || {
            while requester.request_render() {
                std::thread::sleep(interval);
            }
        });
    }

    runtime.run()?;

    log::info!("bye");
    Ok(())
}
