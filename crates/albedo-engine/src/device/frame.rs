/// The swapchain texture of one frame plus the encoder recording into it.
///
/// Acquired by [`Gpu::begin_frame`](super::Gpu::begin_frame) and handed back to
/// [`Gpu::submit`](super::Gpu::submit). The next texture cannot be acquired
/// while this one is alive.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}

impl GpuFrame {
    /// Size of the acquired texture in pixels.
    ///
    /// Can lag behind the window size between a resize event and the reconfigure.
    pub fn target_size(&self) -> (u32, u32) {
        let size = self.surface_texture.texture.size();
        (size.width, size.height)
    }
}
