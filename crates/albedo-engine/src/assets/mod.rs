//! Bitmap assets.
//!
//! Decoding goes through [`ImageSource`]; every decoded buffer is held by a
//! [`ScopedBitmap`] guard that hands it back to its source exactly once.

mod bitmap;
mod resource_dir;
mod source;

pub use bitmap::{Bitmap, ScopedBitmap, acquire};
pub use resource_dir::ResourceDir;
pub use source::{AssetId, DecodeOptions, ImageSource};
