//! GPU rendering core.
//!
//! [`PbrRenderer`] implements [`RenderingCore`](crate::core::RenderingCore) on
//! top of wgpu. It reaches the device through a shared
//! [`GpuContext`](crate::device::GpuContext) and owns every pipeline, buffer
//! and texture it creates.

mod camera;
mod mesh;
mod pbr;

pub use camera::Camera;
pub use mesh::{CUBE_VERTEX_COUNT, Vertex, cube_vertices};
pub use pbr::PbrRenderer;
