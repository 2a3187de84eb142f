//! GPU-facing plain-old-data types shared with the WGSL shaders.

use half::f16;

/// One mesh vertex. Must match the vertex layout declared in
/// `renderer/pipelines/mesh.rs` and the inputs of `vertexShader`:
/// position at offset 0, color at 12, texture coordinate at 16,
/// occlusion at 20, stride 24.
#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    /// Object-space position.
    pub position: [f32; 3],
    /// Vertex color, one byte per channel, normalized on the GPU.
    pub color: [u8; 4],
    /// Texture coordinate.
    pub uv: [f16; 2],
    /// Baked ambient-occlusion factor, 0 (fully occluded) to 1 (open).
    pub occlusion: f32,
}

// The pipeline declares a 24-byte stride; keep the struct honest.
const _: [(); 24] = [(); std::mem::size_of::<MeshVertex>()];

/// Per-frame transform uniform: one column-major mat4, copied verbatim
/// into the 64-byte uniform buffer.
#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Uniforms {
    pub model_view_proj: [[f32; 4]; 4],
}

const _: [(); 64] = [(); std::mem::size_of::<Uniforms>()];
