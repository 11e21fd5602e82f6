use crate::core::SurfaceConfig;

/// Initialization parameters for the GPU layer.
///
/// Usually derived from the host's [`SurfaceConfig`] through
/// [`GpuInit::from_surface_config`].
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Prefer an sRGB surface format when available.
    pub prefer_srgb: bool,

    /// Require 8 bits per color channel; other formats are a last resort.
    pub prefer_rgba8: bool,

    /// Depth/stencil attachment format, `None` when neither is requested.
    pub depth_format: Option<wgpu::TextureFormat>,

    /// Present mode (swap behavior).
    ///
    /// FIFO is broadly supported and never tears.
    pub present_mode: wgpu::PresentMode,

    /// Optional alpha mode preference for the surface.
    ///
    /// If provided but unsupported on the current surface, a supported mode is selected.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    /// Required wgpu features.
    pub required_features: wgpu::Features,

    /// Limits requested from the adapter/device.
    pub required_limits: wgpu::Limits,

    /// Desired maximum frame latency for the surface.
    ///
    /// This value is a hint; support depends on platform/backend.
    pub desired_maximum_frame_latency: u32,
}

impl GpuInit {
    /// Maps a surface request onto wgpu parameters.
    ///
    /// The color buffer is linear, as a default GLES window surface is.
    /// API version 3 and below ask for GLES3-class limits; the adapter is free
    /// to offer more.
    pub fn from_surface_config(config: &SurfaceConfig) -> Self {
        let required_limits = if config.api_version <= 3 {
            wgpu::Limits::downlevel_webgl2_defaults()
        } else {
            wgpu::Limits::downlevel_defaults()
        };

        Self {
            prefer_srgb: false,
            prefer_rgba8: config.is_rgba8(),
            depth_format: depth_format_for(config.depth_bits, config.stencil_bits),
            required_limits,
            ..Self::default()
        }
    }
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            prefer_rgba8: true,
            depth_format: None,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
        }
    }
}

/// Smallest portable depth/stencil format covering the requested bit depths.
pub(crate) fn depth_format_for(depth_bits: u8, stencil_bits: u8) -> Option<wgpu::TextureFormat> {
    match (depth_bits, stencil_bits) {
        (0, 0) => None,
        (_, stencil) if stencil > 0 => Some(wgpu::TextureFormat::Depth24PlusStencil8),
        (1..=16, _) => Some(wgpu::TextureFormat::Depth16Unorm),
        (17..=24, _) => Some(wgpu::TextureFormat::Depth24Plus),
        _ => Some(wgpu::TextureFormat::Depth32Float),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth16_no_stencil() {
        assert_eq!(depth_format_for(16, 0), Some(wgpu::TextureFormat::Depth16Unorm));
    }

    #[test]
    fn no_depth_no_stencil() {
        assert_eq!(depth_format_for(0, 0), None);
    }

    #[test]
    fn stencil_forces_combined_format() {
        assert_eq!(depth_format_for(16, 8), Some(wgpu::TextureFormat::Depth24PlusStencil8));
        assert_eq!(depth_format_for(0, 8), Some(wgpu::TextureFormat::Depth24PlusStencil8));
    }

    #[test]
    fn deep_depth_formats() {
        assert_eq!(depth_format_for(24, 0), Some(wgpu::TextureFormat::Depth24Plus));
        assert_eq!(depth_format_for(32, 0), Some(wgpu::TextureFormat::Depth32Float));
    }

    #[test]
    fn default_surface_config_maps_to_gles3_request() {
        let init = GpuInit::from_surface_config(&SurfaceConfig::default());
        assert!(init.prefer_rgba8);
        assert!(!init.prefer_srgb);
        assert_eq!(init.depth_format, Some(wgpu::TextureFormat::Depth16Unorm));
        assert_eq!(init.required_limits, wgpu::Limits::downlevel_webgl2_defaults());
    }
}
