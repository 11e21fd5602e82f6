use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// Interleaved cube vertex: position, texcoord, normal.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub pos: [f32; 3],
    pub uv: [f32; 2],
    pub normal: [f32; 3],
}

impl Vertex {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x3, // pos
        1 => Float32x2, // uv
        2 => Float32x3  // normal
    ];

    pub(super) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

pub const CUBE_VERTEX_COUNT: usize = 36;

// (normal, u axis, v axis) per face, with u × v = normal.
const FACES: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
    ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
    ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
    ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
    ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
    ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
];

// Two CCW triangles over the face's (s, t) square.
const CORNERS: [(f32, f32); 6] = [
    (-1.0, -1.0),
    (1.0, -1.0),
    (1.0, 1.0),
    (-1.0, -1.0),
    (1.0, 1.0),
    (-1.0, 1.0),
];

/// Unit cube centered on the origin, one texture copy per face, CCW outward.
pub fn cube_vertices() -> [Vertex; CUBE_VERTEX_COUNT] {
    let mut out = [Vertex::zeroed(); CUBE_VERTEX_COUNT];

    for (f, (n, u, v)) in FACES.iter().enumerate() {
        let (n, u, v) = (Vec3::from(*n), Vec3::from(*u), Vec3::from(*v));
        for (c, (s, t)) in CORNERS.iter().enumerate() {
            let pos = 0.5 * (n + *s * u + *t * v);
            out[f * CORNERS.len() + c] = Vertex {
                pos: pos.to_array(),
                uv: [(s + 1.0) * 0.5, (1.0 - t) * 0.5],
                normal: n.to_array(),
            };
        }
    }

    out
}
