//! Albedo engine crate.
//!
//! A surface host that forwards GPU surface lifecycle events to a rendering
//! core, plus the pieces needed to run one on a desktop window:
//!
//! - [`core`]: the rendering-core and surface-callback contracts
//! - [`host`]: the surface host
//! - [`assets`]: bitmap decoding with scoped release
//! - [`device`]: wgpu device/surface management
//! - [`window`]: the winit platform driver
//! - [`render`]: a wgpu rendering core

pub mod assets;
pub mod core;
pub mod device;
pub mod host;
pub mod logging;
pub mod render;
pub mod window;

pub use host::SurfaceHost;
