//! Mesh/texture provider.
//!
//! The renderer only ever sees already-generated vertex, index and texel
//! data; reading model or image files from disk is someone else's job.
//! [`MeshData::demo_cube`] supplies a built-in model so the combined demo
//! runs without any assets.

use crate::data::types::MeshVertex;
use crate::error::ViewerError;
use half::f16;
use wgpu::util::DeviceExt;

/// CPU-side mesh and texture, as an asset loader would hand them over.
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    /// Triangle list indices into `vertices`.
    pub indices: Vec<u16>,
    pub texture_size: (u32, u32),
    /// Tightly packed RGBA8 texels, row-major.
    pub texels: Vec<u8>,
}

impl MeshData {
    /// A textured cube: four vertices per face so each face gets its own
    /// uv square and tint, wound counter-clockwise seen from outside.
    pub fn demo_cube() -> Self {
        // (four corners, tint) per face; corners ordered so that
        // (v1-v0) x (v2-v1) points out of the cube.
        #[rustfmt::skip]
        let faces: [([[f32; 3]; 4], [u8; 4]); 6] = [
            // +z
            (
                [[-1.0, -1.0,  1.0], [ 1.0, -1.0,  1.0], [ 1.0,  1.0,  1.0], [-1.0,  1.0,  1.0]],
                [255, 255, 255, 255],
            ),
            // +x
            (
                [[ 1.0, -1.0,  1.0], [ 1.0, -1.0, -1.0], [ 1.0,  1.0, -1.0], [ 1.0,  1.0,  1.0]],
                [255, 128, 128, 255],
            ),
            // -z
            (
                [[ 1.0, -1.0, -1.0], [-1.0, -1.0, -1.0], [-1.0,  1.0, -1.0], [ 1.0,  1.0, -1.0]],
                [255, 255, 128, 255],
            ),
            // -x
            (
                [[-1.0, -1.0, -1.0], [-1.0, -1.0,  1.0], [-1.0,  1.0,  1.0], [-1.0,  1.0, -1.0]],
                [128, 255, 128, 255],
            ),
            // +y
            (
                [[-1.0,  1.0,  1.0], [ 1.0,  1.0,  1.0], [ 1.0,  1.0, -1.0], [-1.0,  1.0, -1.0]],
                [128, 128, 255, 255],
            ),
            // -y
            (
                [[-1.0, -1.0, -1.0], [ 1.0, -1.0, -1.0], [ 1.0, -1.0,  1.0], [-1.0, -1.0,  1.0]],
                [255, 128, 255, 255],
            ),
        ];

        let corner_uvs: [[f32; 2]; 4] = [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];

        let mut vertices = Vec::with_capacity(24);
        let mut indices: Vec<u16> = Vec::with_capacity(36);
        for (corners, color) in faces {
            let base = vertices.len() as u16;
            for (position, uv) in corners.into_iter().zip(corner_uvs) {
                vertices.push(MeshVertex {
                    position,
                    color,
                    uv: [f16::from_f32(uv[0]), f16::from_f32(uv[1])],
                    // A lone cube has nothing to occlude it.
                    occlusion: 1.0,
                });
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
        }

        let (texture_size, texels) = checkerboard(64, 64, 8);

        Self {
            vertices,
            indices,
            texture_size,
            texels,
        }
    }
}

/// Two-tone checker pattern, RGBA8, `cell` pixels per square.
fn checkerboard(width: u32, height: u32, cell: u32) -> ((u32, u32), Vec<u8>) {
    let mut texels = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            let dark = ((x / cell) + (y / cell)) % 2 == 0;
            let v = if dark { 96 } else { 230 };
            texels.extend_from_slice(&[v, v, v, 255]);
        }
    }
    ((width, height), texels)
}

/// GPU handles for one renderable mesh. The texture object is kept alive
/// for the lifetime of its view.
pub struct MeshGpu {
    pub vtx: wgpu::Buffer,
    pub idx: wgpu::Buffer,
    pub index_count: u32,
    /// Bind group joining the frame uniform, the texture and its sampler.
    pub bind: wgpu::BindGroup,
    _texture: wgpu::Texture,
}

impl MeshGpu {
    /// Uploads mesh data and builds the bind group against the mesh
    /// pipeline's layout and the shared transform uniform buffer.
    pub fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        uniform_buffer: &wgpu::Buffer,
        data: &MeshData,
    ) -> Result<Self, ViewerError> {
        if data.vertices.is_empty() || data.indices.is_empty() {
            return Err(ViewerError::ResourceMissing("mesh geometry"));
        }
        let (tex_w, tex_h) = data.texture_size;
        if data.texels.len() != (tex_w * tex_h * 4) as usize {
            return Err(ViewerError::ResourceMissing("mesh texture texels"));
        }

        let vtx = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh VB"),
            contents: bytemuck::cast_slice(&data.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let idx = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh IB"),
            contents: bytemuck::cast_slice(&data.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let tex_size = wgpu::Extent3d {
            width: tex_w,
            height: tex_h,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Mesh Texture"),
            size: tex_size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &data.texels,
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(4 * tex_w),
                rows_per_image: Some(tex_h),
            },
            tex_size,
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Mesh Sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let bind = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Mesh Bind Group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        Ok(Self {
            vtx,
            idx,
            index_count: data.indices.len() as u32,
            bind,
            _texture: texture,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_cube_is_well_formed() {
        let cube = MeshData::demo_cube();

        assert_eq!(cube.vertices.len(), 24);
        assert_eq!(cube.indices.len(), 36);
        assert!(cube
            .indices
            .iter()
            .all(|&i| (i as usize) < cube.vertices.len()));

        let (w, h) = cube.texture_size;
        assert_eq!(cube.texels.len(), (w * h * 4) as usize);
    }

    #[test]
    fn demo_cube_faces_wind_outward() {
        let cube = MeshData::demo_cube();

        // For a convex solid centered on the origin, every triangle's
        // outward normal must point away from the origin.
        for tri in cube.indices.chunks(3) {
            let p = |i: u16| glam::Vec3::from(cube.vertices[i as usize].position);
            let (a, b, c) = (p(tri[0]), p(tri[1]), p(tri[2]));
            let normal = (b - a).cross(c - b);
            let centroid = (a + b + c) / 3.0;
            assert!(
                normal.dot(centroid) > 0.0,
                "inward-facing triangle: {tri:?}"
            );
        }
    }
}
