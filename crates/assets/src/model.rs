use crate::AssetError;
use std::path::Path;

/// Indexed triangle mesh read from an OBJ file. All arrays share one index
/// space.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjMesh {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

impl ObjMesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Load an OBJ file, triangulated, with every sub-model merged into one mesh.
///
/// Missing texture coordinates become zero; missing normals are rebuilt from
/// the faces. Material libraries are ignored.
pub fn load_obj(path: impl AsRef<Path>) -> Result<ObjMesh, AssetError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(AssetError::NotFound(path.to_path_buf()));
    }
    let (models, _materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            single_index: true,
            triangulate: true,
            ..Default::default()
        },
    )?;

    let mut out = ObjMesh::default();
    let mut needs_normals = false;
    for model in &models {
        let mesh = &model.mesh;
        let base = out.positions.len() as u32;
        let count = mesh.positions.len() / 3;

        out.positions
            .extend(mesh.positions.chunks_exact(3).map(|p| [p[0], p[1], p[2]]));
        if mesh.normals.len() == mesh.positions.len() {
            out.normals
                .extend(mesh.normals.chunks_exact(3).map(|n| [n[0], n[1], n[2]]));
        } else {
            needs_normals = true;
            out.normals.extend(std::iter::repeat_n([0.0; 3], count));
        }
        if mesh.texcoords.len() / 2 == count {
            // OBJ has v pointing up; textures are sampled top-down.
            out.uvs
                .extend(mesh.texcoords.chunks_exact(2).map(|t| [t[0], 1.0 - t[1]]));
        } else {
            out.uvs.extend(std::iter::repeat_n([0.0; 2], count));
        }
        out.indices.extend(mesh.indices.iter().map(|i| i + base));
    }

    if needs_normals {
        compute_normals(&mut out);
    }
    tracing::info!(
        "loaded model {} ({} vertices, {} triangles)",
        path.display(),
        out.vertex_count(),
        out.triangle_count()
    );
    Ok(out)
}

/// Area-weighted vertex normals for vertices whose normal is zero.
fn compute_normals(mesh: &mut ObjMesh) {
    let mut acc = vec![[0.0f32; 3]; mesh.positions.len()];
    for tri in mesh.indices.chunks_exact(3) {
        let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| mesh.positions[i as usize]);
        let e1 = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
        let e2 = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
        let n = [
            e1[1] * e2[2] - e1[2] * e2[1],
            e1[2] * e2[0] - e1[0] * e2[2],
            e1[0] * e2[1] - e1[1] * e2[0],
        ];
        for &i in tri {
            let v = &mut acc[i as usize];
            v[0] += n[0];
            v[1] += n[1];
            v[2] += n[2];
        }
    }
    for (normal, sum) in mesh.normals.iter_mut().zip(acc) {
        if *normal != [0.0; 3] {
            continue;
        }
        let len = (sum[0] * sum[0] + sum[1] * sum[1] + sum[2] * sum[2]).sqrt();
        if len > f32::EPSILON {
            *normal = [sum[0] / len, sum[1] / len, sum[2] / len];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_obj(text: &str) -> tempfile::NamedTempFile {
        let mut tmp = tempfile::Builder::new().suffix(".obj").tempfile().unwrap();
        tmp.write_all(text.as_bytes()).unwrap();
        tmp
    }

    #[test]
    fn quad_is_triangulated() {
        let obj = write_obj(
            "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\n\
             vt 0 0\nvt 1 0\nvt 1 1\nvt 0 1\n\
             vn 0 0 1\n\
             f 1/1/1 2/2/1 3/3/1 4/4/1\n",
        );
        let mesh = load_obj(obj.path()).unwrap();
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.vertex_count(), mesh.uvs.len());
        assert!(mesh.normals.iter().all(|n| *n == [0.0, 0.0, 1.0]));
        // First vertex has v = 0, flipped to 1.
        assert_eq!(mesh.uvs[0], [0.0, 1.0]);
    }

    #[test]
    fn missing_normals_are_computed() {
        let obj = write_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n");
        let mesh = load_obj(obj.path()).unwrap();
        assert_eq!(mesh.triangle_count(), 1);
        for n in &mesh.normals {
            assert!((n[2] - 1.0).abs() < 1e-6);
        }
        assert!(mesh.uvs.iter().all(|uv| *uv == [0.0, 0.0]));
    }

    #[test]
    fn sub_models_are_merged_with_offset_indices() {
        let obj = write_obj(
            "o first\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n\
             o second\nv 0 0 1\nv 1 0 1\nv 0 1 1\nf 4 5 6\n",
        );
        let mesh = load_obj(obj.path()).unwrap();
        assert_eq!(mesh.vertex_count(), 6);
        assert_eq!(mesh.triangle_count(), 2);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertex_count()));
        assert!(mesh.indices[3..].iter().all(|&i| i >= 3));
    }

    #[test]
    fn missing_model_is_not_found() {
        let err = load_obj("/nonexistent/Armchair.obj").unwrap_err();
        assert!(matches!(err, AssetError::NotFound(_)));
    }
}
