//! GPU device + surface management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue for a window
//! - translating a [`SurfaceConfig`](crate::core::SurfaceConfig) into surface
//!   and depth formats
//! - acquiring frames and providing encoders/views for rendering
//! - publishing the live GPU to the rendering core through [`GpuContext`]

mod context;
mod error;
mod frame;
mod gpu;
mod init;
mod surface;

pub use context::GpuContext;
pub use error::{SurfaceErrorAction, SurfaceLost};
pub use frame::GpuFrame;
pub use gpu::Gpu;
pub use init::GpuInit;
