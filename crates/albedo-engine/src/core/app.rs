use anyhow::Result;

use super::config::{RenderMode, SurfaceConfig};

/// Contract the rendering core exposes to the surface host.
///
/// Implementations perform all GPU work. The GPU context is reached implicitly
/// (see [`crate::device::GpuContext`]); nothing here carries a device handle.
///
/// Calls are strictly serialized on the render thread and are never re-entrant.
pub trait RenderingCore {
    /// Called once per surface (re-)creation, before any other call for that surface.
    fn init(&mut self) -> Result<()>;

    /// Called on every surface dimension change, including the first sizing.
    fn resize(&mut self, width: u32, height: u32) -> Result<()>;

    /// Uploads a tightly packed RGBA8 buffer as the 2D albedo texture.
    ///
    /// `pixels` is only borrowed for the duration of the call.
    fn upload_texture_2d(&mut self, pixels: &[u8], width: u32, height: u32) -> Result<()>;

    /// Renders one frame.
    fn step(&mut self) -> Result<()>;
}

/// Surface lifecycle events, invoked by a platform driver.
///
/// The driver (see [`crate::window::Runtime`]) owns the window and the GPU
/// context and decides what to do with a returned error.
pub trait SurfaceCallbacks {
    /// Surface configuration requested from the platform.
    fn surface_config(&self) -> SurfaceConfig;

    /// Render-trigger policy requested from the platform.
    fn render_mode(&self) -> RenderMode;

    /// The surface was created (or re-created after being lost).
    fn on_surface_created(&mut self) -> Result<()>;

    /// The surface's pixel dimensions changed.
    fn on_surface_changed(&mut self, width: u32, height: u32) -> Result<()>;

    /// A frame was requested.
    fn on_draw_frame(&mut self) -> Result<()>;
}
