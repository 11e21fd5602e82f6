use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::imageops::FilterType;

use super::bitmap::Bitmap;
use super::source::{AssetId, DecodeOptions, ImageSource};

/// Extensions probed, in order, when resolving a resource name.
const EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "webp", "bmp", "gif"];

/// Largest side a scaled decode may produce.
const MAX_SCALED_SIDE: u32 = 16384;

/// Image resources bundled in a directory, addressed by file stem.
///
/// `metal_albedo` resolves to the first of `metal_albedo.png`,
/// `metal_albedo.jpg`, ... that exists under the root.
#[derive(Debug, Clone)]
pub struct ResourceDir {
    root: PathBuf,

    /// Display density divided by resource density. Applied only to scaled decodes.
    density_scale: f32,
}

impl ResourceDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            density_scale: 1.0,
        }
    }

    /// Sets the density ratio used when [`DecodeOptions::scaled`] is requested.
    ///
    /// Non-finite or non-positive values are ignored.
    pub fn with_density_scale(mut self, scale: f32) -> Self {
        if scale.is_finite() && scale > 0.0 {
            self.density_scale = scale;
        } else {
            log::warn!("ignoring invalid density scale {scale}");
        }
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the file backing `asset`, if any.
    pub fn resolve(&self, asset: AssetId) -> Option<PathBuf> {
        EXTENSIONS
            .iter()
            .map(|ext| self.root.join(format!("{}.{ext}", asset.name())))
            .find(|p| p.is_file())
    }

    fn scaled_size(&self, width: u32, height: u32) -> Result<(u32, u32)> {
        let scale = f64::from(self.density_scale);
        let side = |n: u32| -> Result<u32> {
            let scaled = (f64::from(n) * scale).round().max(1.0);
            anyhow::ensure!(
                scaled <= f64::from(MAX_SCALED_SIDE),
                "scaled side {scaled} exceeds {MAX_SCALED_SIDE} (density scale {})",
                self.density_scale
            );
            Ok(scaled as u32)
        };
        Ok((side(width)?, side(height)?))
    }
}

impl ImageSource for ResourceDir {
    fn decode(&self, asset: AssetId, options: DecodeOptions) -> Result<Bitmap> {
        let path = self.resolve(asset).with_context(|| {
            format!(
                "no image resource `{asset}` under {}",
                self.root.display()
            )
        })?;

        let img = image::ImageReader::open(&path)
            .with_context(|| format!("failed to open {}", path.display()))?
            .with_guessed_format()
            .with_context(|| format!("failed to sniff format of {}", path.display()))?
            .decode()
            .with_context(|| format!("failed to decode {}", path.display()))?;

        let mut rgba = img.into_rgba8();

        if options.scaled && self.density_scale != 1.0 {
            let (w, h) = self
                .scaled_size(rgba.width(), rgba.height())
                .with_context(|| format!("cannot scale `{asset}` from {}", path.display()))?;
            log::debug!(
                "scaling `{asset}` {}x{} -> {w}x{h}",
                rgba.width(),
                rgba.height()
            );
            rgba = image::imageops::resize(&rgba, w, h, FilterType::Triangle);
        }

        Ok(Bitmap::from(rgba))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_png(dir: &Path, name: &str, w: u32, h: u32) {
        let img = image::RgbaImage::from_pixel(w, h, image::Rgba([200, 100, 50, 255]));
        img.save(dir.join(name)).unwrap();
    }

    #[test]
    fn decodes_png_at_native_resolution() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "metal_albedo.png", 8, 4);

        let res = ResourceDir::new(dir.path()).with_density_scale(2.0);
        let bmp = res.decode(AssetId::MetalAlbedo, DecodeOptions::UNSCALED).unwrap();

        assert_eq!((bmp.width(), bmp.height()), (8, 4));
        assert_eq!(bmp.pixels().len(), 8 * 4 * 4);
        assert_eq!(&bmp.pixels()[..4], &[200, 100, 50, 255]);
    }

    #[test]
    fn scaled_decode_applies_density() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "color.png", 8, 4);

        let res = ResourceDir::new(dir.path()).with_density_scale(0.5);
        let bmp = res.decode(AssetId::Color, DecodeOptions { scaled: true }).unwrap();

        assert_eq!((bmp.width(), bmp.height()), (4, 2));
    }

    #[test]
    fn resolves_by_stem_in_extension_order() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "color.png", 1, 1);
        write_png(dir.path(), "color.bmp", 1, 1);

        let res = ResourceDir::new(dir.path());
        let path = res.resolve(AssetId::Color).unwrap();
        assert_eq!(path.extension().unwrap(), "png");
        assert!(res.resolve(AssetId::MetalAlbedo).is_none());
    }

    #[test]
    fn missing_resource_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let res = ResourceDir::new(dir.path());
        let err = res.decode(AssetId::Color, DecodeOptions::UNSCALED).unwrap_err();
        assert!(format!("{err:#}").contains("color"));
    }

    #[test]
    fn corrupt_resource_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("color.png"), b"definitely not a png").unwrap();

        let res = ResourceDir::new(dir.path());
        assert!(res.decode(AssetId::Color, DecodeOptions::UNSCALED).is_err());
    }

    #[test]
    fn invalid_density_is_ignored() {
        let res = ResourceDir::new(".").with_density_scale(-1.0);
        assert_eq!(res.scaled_size(10, 10).unwrap(), (10, 10));
    }

    #[test]
    fn oversized_scaled_decode_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "color.png", 2, 2);

        let res = ResourceDir::new(dir.path()).with_density_scale(1.0e9);
        let err = res.decode(AssetId::Color, DecodeOptions { scaled: true }).unwrap_err();
        assert!(format!("{err:#}").contains("exceeds"));

        // The unscaled path ignores the density entirely.
        let bmp = res.decode(AssetId::Color, DecodeOptions::UNSCALED).unwrap();
        assert_eq!((bmp.width(), bmp.height()), (2, 2));
    }

    #[test]
    fn scaled_size_accepts_the_largest_side() {
        let res = ResourceDir::new(".").with_density_scale(2.0);
        assert_eq!(res.scaled_size(MAX_SCALED_SIDE / 2, 1).unwrap(), (MAX_SCALED_SIDE, 2));
        assert!(res.scaled_size(MAX_SCALED_SIDE / 2 + 1, 1).is_err());
    }
}
