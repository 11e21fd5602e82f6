use anyhow::Result;

use super::bitmap::Bitmap;

/// Bundled image resources known to the surface host.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum AssetId {
    Color,
    MetalAlbedo,
}

impl AssetId {
    /// Resource name, without extension.
    pub fn name(self) -> &'static str {
        match self {
            AssetId::Color => "color",
            AssetId::MetalAlbedo => "metal_albedo",
        }
    }
}

impl std::fmt::Display for AssetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Decode parameters.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct DecodeOptions {
    /// Resample from the resource density to the display density.
    ///
    /// `false` decodes at native resolution.
    pub scaled: bool,
}

impl DecodeOptions {
    /// Native resolution, no implicit resampling.
    pub const UNSCALED: Self = Self { scaled: false };
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self { scaled: true }
    }
}

/// Decode/release facility for bundled images.
pub trait ImageSource {
    /// Decodes `asset` into an RGBA8 bitmap.
    fn decode(&self, asset: AssetId, options: DecodeOptions) -> Result<Bitmap>;

    /// Takes back a bitmap previously returned by [`decode`](Self::decode).
    fn release(&self, bitmap: Bitmap) {
        drop(bitmap);
    }
}

impl<S: ImageSource + ?Sized> ImageSource for &S {
    fn decode(&self, asset: AssetId, options: DecodeOptions) -> Result<Bitmap> {
        (**self).decode(asset, options)
    }

    fn release(&self, bitmap: Bitmap) {
        (**self).release(bitmap)
    }
}
