use std::ops::Deref;

use anyhow::{Context, Result};

use super::source::{AssetId, DecodeOptions, ImageSource};

/// Decoded image: tightly packed RGBA8 rows, top row first.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Bitmap {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
}

impl Bitmap {
    /// Wraps an RGBA8 buffer.
    ///
    /// Fails when `pixels.len()` is not `width * height * 4`.
    pub fn from_rgba8(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        let expected = (width as usize) * (height as usize) * 4;
        anyhow::ensure!(
            pixels.len() == expected,
            "RGBA8 buffer is {} bytes, expected {expected} for {width}x{height}",
            pixels.len()
        );
        Ok(Self { pixels, width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

impl From<image::RgbaImage> for Bitmap {
    fn from(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            pixels: img.into_raw(),
            width,
            height,
        }
    }
}

/// Scoped ownership of a decoded bitmap.
///
/// The bitmap is returned to its source through [`ImageSource::release`] when
/// the guard is dropped, on every exit path, unwinding included.
pub struct ScopedBitmap<'s, S: ImageSource + ?Sized> {
    source: &'s S,
    bitmap: Bitmap,
}

/// Decodes `asset` from `source` into a release-on-drop guard.
pub fn acquire<'s, S>(
    source: &'s S,
    asset: AssetId,
    options: DecodeOptions,
) -> Result<ScopedBitmap<'s, S>>
where
    S: ImageSource + ?Sized,
{
    let bitmap = source
        .decode(asset, options)
        .with_context(|| format!("failed to decode image asset `{asset}`"))?;

    log::trace!("decoded `{asset}` ({}x{})", bitmap.width(), bitmap.height());

    Ok(ScopedBitmap {
        source,
        bitmap,
    })
}

impl<S: ImageSource + ?Sized> Deref for ScopedBitmap<'_, S> {
    type Target = Bitmap;

    fn deref(&self) -> &Bitmap {
        &self.bitmap
    }
}

impl<S: ImageSource + ?Sized> Drop for ScopedBitmap<'_, S> {
    fn drop(&mut self) {
        self.source.release(std::mem::take(&mut self.bitmap));
    }
}
