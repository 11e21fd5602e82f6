/// Pixel-format and context request for the drawing surface.
///
/// Fixed at construction; never mutated afterwards.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct SurfaceConfig {
    pub red_bits: u8,
    pub green_bits: u8,
    pub blue_bits: u8,
    pub alpha_bits: u8,
    pub depth_bits: u8,
    pub stencil_bits: u8,

    /// Requested GPU API version. The platform may substitute a compatible
    /// higher version.
    pub api_version: u8,
}

impl SurfaceConfig {
    /// Returns `true` when every color channel requests exactly 8 bits.
    pub fn is_rgba8(&self) -> bool {
        [self.red_bits, self.green_bits, self.blue_bits, self.alpha_bits]
            .iter()
            .all(|&b| b == 8)
    }
}

impl Default for SurfaceConfig {
    /// RGBA8 color, 16-bit depth, no stencil, API version 3.
    fn default() -> Self {
        Self {
            red_bits: 8,
            green_bits: 8,
            blue_bits: 8,
            alpha_bits: 8,
            depth_bits: 16,
            stencil_bits: 0,
            api_version: 3,
        }
    }
}

/// When the platform driver produces frames.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RenderMode {
    /// Redraw after every event-loop wait.
    Continuously,
    /// Redraw only on explicit invalidation.
    WhenDirty,
}

/// How surface dimensions are forwarded to [`super::RenderingCore::resize`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum ResizePolicy {
    /// Forward `(width, height)`.
    #[default]
    Corrected,
    /// Forward `(width, width)`, matching the legacy call site that passed the
    /// width twice. Only useful for output parity with that build.
    Mirrored,
}

impl ResizePolicy {
    /// Maps surface dimensions onto the pair handed to the rendering core.
    pub fn apply(self, width: u32, height: u32) -> (u32, u32) {
        match self {
            ResizePolicy::Corrected => (width, height),
            ResizePolicy::Mirrored => (width, width),
        }
    }
}

/// Surface host configuration.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct HostConfig {
    pub surface: SurfaceConfig,
    pub render_mode: RenderMode,
    pub resize_policy: ResizePolicy,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            surface: SurfaceConfig::default(),
            render_mode: RenderMode::WhenDirty,
            resize_policy: ResizePolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_surface_is_rgba8_depth16_no_stencil_v3() {
        let c = SurfaceConfig::default();
        assert!(c.is_rgba8());
        assert_eq!(c.depth_bits, 16);
        assert_eq!(c.stencil_bits, 0);
        assert_eq!(c.api_version, 3);
    }

    #[test]
    fn default_host_renders_when_dirty() {
        assert_eq!(HostConfig::default().render_mode, RenderMode::WhenDirty);
    }

    #[test]
    fn resize_policy_corrected_keeps_height() {
        assert_eq!(ResizePolicy::Corrected.apply(800, 600), (800, 600));
    }

    #[test]
    fn resize_policy_mirrored_repeats_width() {
        assert_eq!(ResizePolicy::Mirrored.apply(800, 600), (800, 800));
    }

    #[test]
    fn rgba565_is_not_rgba8() {
        let c = SurfaceConfig { red_bits: 5, green_bits: 6, blue_bits: 5, alpha_bits: 0, ..Default::default() };
        assert!(!c.is_rgba8());
    }
}
