use bytemuck::{Pod, Zeroable};
use sceneview_assets::ObjMesh;
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x3,
        2 => Float32x2,
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// CPU-side indexed mesh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Unit cube centered on the origin, one quad per face.
    pub fn cube() -> Self {
        // (normal, tangent u, tangent v) per face.
        const FACES: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
            ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
            ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
            ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
            ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
        ];
        let mut mesh = Self::default();
        for (n, u, v) in FACES {
            mesh.push_face(n, u, v, 0.5);
        }
        mesh
    }

    /// Unit quad in the XY plane facing +Z.
    pub fn quad() -> Self {
        let mut mesh = Self::default();
        mesh.push_face([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], 0.5);
        for v in &mut mesh.vertices {
            v.normal = [0.0, 0.0, 1.0];
        }
        mesh
    }

    /// Line list through the given endpoint pairs.
    pub fn lines(endpoints: &[[f32; 3]]) -> Self {
        Self {
            vertices: endpoints
                .iter()
                .map(|&position| Vertex {
                    position,
                    normal: [0.0, 1.0, 0.0],
                    uv: [0.0, 0.0],
                })
                .collect(),
            indices: (0..endpoints.len() as u32).collect(),
        }
    }

    pub fn from_obj(obj: &ObjMesh) -> Self {
        Self {
            vertices: obj
                .positions
                .iter()
                .zip(&obj.normals)
                .zip(&obj.uvs)
                .map(|((&position, &normal), &uv)| Vertex {
                    position,
                    normal,
                    uv,
                })
                .collect(),
            indices: obj.indices.clone(),
        }
    }

    /// Append a square face centered at `normal * half`, spanned by `u`/`v`,
    /// wound counter-clockwise when seen from the normal side.
    fn push_face(&mut self, normal: [f32; 3], u: [f32; 3], v: [f32; 3], half: f32) {
        let base = self.vertices.len() as u32;
        let corners = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];
        for (su, sv) in corners {
            let position = std::array::from_fn(|i| {
                normal[i] * half + u[i] * su * half + v[i] * sv * half
            });
            self.vertices.push(Vertex {
                position,
                normal,
                uv: [(su + 1.0) * 0.5, 1.0 - (sv + 1.0) * 0.5],
            });
        }
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }
}

/// Mesh resident on the GPU.
pub struct GpuMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

impl GpuMesh {
    pub fn upload(device: &wgpu::Device, label: &str, mesh: &MeshData) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}_vertex_buffer")),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}_index_buffer")),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
        }
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn face_normal(mesh: &MeshData, tri: &[u32]) -> Vec3 {
        let p = |i: u32| Vec3::from(mesh.vertices[i as usize].position);
        (p(tri[1]) - p(tri[0])).cross(p(tri[2]) - p(tri[0]))
    }

    #[test]
    fn cube_has_six_faces() {
        let cube = MeshData::cube();
        assert_eq!(cube.vertices.len(), 24);
        assert_eq!(cube.indices.len(), 36);
        for v in &cube.vertices {
            assert!(v.position.iter().all(|c| c.abs() == 0.5));
        }
    }

    #[test]
    fn cube_winding_matches_normals() {
        let cube = MeshData::cube();
        for tri in cube.indices.chunks_exact(3) {
            let geometric = face_normal(&cube, tri);
            let stored = Vec3::from(cube.vertices[tri[0] as usize].normal);
            assert!(geometric.dot(stored) > 0.0);
        }
    }

    #[test]
    fn quad_faces_positive_z() {
        let quad = MeshData::quad();
        assert_eq!(quad.vertices.len(), 4);
        assert!(quad.vertices.iter().all(|v| v.position[2] == 0.0));
        assert!(face_normal(&quad, &quad.indices[..3]).z > 0.0);
        assert!(quad.vertices.iter().all(|v| v.normal == [0.0, 0.0, 1.0]));
    }

    #[test]
    fn uvs_cover_unit_square() {
        let quad = MeshData::quad();
        let uvs: Vec<[f32; 2]> = quad.vertices.iter().map(|v| v.uv).collect();
        assert!(uvs.contains(&[0.0, 0.0]));
        assert!(uvs.contains(&[1.0, 1.0]));
    }

    #[test]
    fn lines_index_sequentially() {
        let lines = MeshData::lines(&[[0.0; 3], [1.0, 0.0, 0.0], [0.0; 3], [0.0, 0.0, 1.0]]);
        assert_eq!(lines.indices, vec![0, 1, 2, 3]);
    }

    #[test]
    fn obj_conversion_keeps_indices() {
        let obj = ObjMesh {
            positions: vec![[0.0; 3], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            normals: vec![[0.0, 0.0, 1.0]; 3],
            uvs: vec![[0.0; 2]; 3],
            indices: vec![0, 1, 2],
        };
        let mesh = MeshData::from_obj(&obj);
        assert_eq!(mesh.vertices.len(), 3);
        assert_eq!(mesh.indices, obj.indices);
        assert_eq!(mesh.vertices[1].position, [1.0, 0.0, 0.0]);
    }
}
