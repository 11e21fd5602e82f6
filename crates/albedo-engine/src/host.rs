//! Surface host: forwards surface lifecycle events to a rendering core.
//!
//! The host owns the surface configuration and the render-trigger mode, and
//! decodes the bundled image assets the core samples from. It holds no GPU
//! objects; the core reaches the GPU through its own context.

use anyhow::{Context, Result};

use crate::assets::{AssetId, DecodeOptions, ImageSource, acquire};
use crate::core::{HostConfig, RenderMode, RenderingCore, SurfaceCallbacks, SurfaceConfig};

/// Adapter between the platform's surface callbacks and a [`RenderingCore`].
pub struct SurfaceHost<C, S> {
    config: HostConfig,
    core: C,
    assets: S,
}

impl<C, S> SurfaceHost<C, S>
where
    C: RenderingCore,
    S: ImageSource,
{
    /// Creates a host requesting RGBA8 color, 16-bit depth, no stencil and
    /// API version 3, redrawing only when invalidated.
    pub fn new(core: C, assets: S) -> Self {
        Self::with_config(HostConfig::default(), core, assets)
    }

    pub fn with_config(config: HostConfig, core: C, assets: S) -> Self {
        log::debug!(
            "surface host: {:?}, mode {:?}, resize {:?}",
            config.surface,
            config.render_mode,
            config.resize_policy
        );
        Self { config, core, assets }
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    pub fn core(&self) -> &C {
        &self.core
    }

    /// Consumes the host, returning the core and the asset source.
    pub fn into_parts(self) -> (C, S) {
        (self.core, self.assets)
    }
}

impl<C, S> SurfaceCallbacks for SurfaceHost<C, S>
where
    C: RenderingCore,
    S: ImageSource,
{
    fn surface_config(&self) -> SurfaceConfig {
        self.config.surface
    }

    fn render_mode(&self) -> RenderMode {
        self.config.render_mode
    }

    fn on_surface_created(&mut self) -> Result<()> {
        log::debug!("surface created");
        self.core.init().context("rendering core failed to initialize")
    }

    fn on_surface_changed(&mut self, width: u32, height: u32) -> Result<()> {
        let (w, h) = self.config.resize_policy.apply(width, height);
        log::debug!("surface changed to {width}x{height}, resizing core to {w}x{h}");

        self.core
            .resize(w, h)
            .with_context(|| format!("rendering core failed to resize to {w}x{h}"))?;

        // `color` is decoded and released without being uploaded; the decode
        // only fails the callback when the asset is missing. Removable.
        let _color = acquire(&self.assets, AssetId::Color, DecodeOptions::UNSCALED)?;
        let albedo = acquire(&self.assets, AssetId::MetalAlbedo, DecodeOptions::UNSCALED)?;

        self.core
            .upload_texture_2d(albedo.pixels(), albedo.width(), albedo.height())
            .with_context(|| {
                format!(
                    "rendering core rejected `{}` texture ({}x{})",
                    AssetId::MetalAlbedo,
                    albedo.width(),
                    albedo.height()
                )
            })
    }

    fn on_draw_frame(&mut self) -> Result<()> {
        log::trace!("draw frame");
        self.core.step()
    }
}
