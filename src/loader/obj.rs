//! Wavefront OBJ meshes via `tobj`.
//!
//! Every object/group in the file becomes one [`Mesh`]. Faces are
//! triangulated on load. Missing normals are rebuilt by accumulating face
//! normals on each vertex; a material's diffuse texture is attached through
//! the same [`TextureCache`] the JSON builder uses.

use std::io::BufRead;
use std::path::Path;

use super::{BuildOptions, LoadError, TextureCache};
use crate::math::vec2::Vec2;
use crate::math::vec3::Vec3;
use crate::mesh::{Face, Mesh, Vertex};

/// Loads all objects of an OBJ file (and its MTL library, if any).
pub fn load_obj<P: AsRef<Path>>(path: P, options: BuildOptions) -> Result<Vec<Mesh>, LoadError> {
    let path = path.as_ref();
    let (models, materials) = tobj::load_obj(path, &tobj::GPU_LOAD_OPTIONS)?;
    let materials = materials.unwrap_or_else(|err| {
        log::warn!("{}: material library not loaded: {err}", path.display());
        Vec::new()
    });

    let mut textures = TextureCache::new(options);
    models
        .into_iter()
        .map(|model| build_mesh(model, &materials, &mut textures))
        .collect()
}

/// Loads OBJ geometry from a reader. Material libraries are not resolved.
pub fn load_obj_from_reader<R: BufRead>(reader: &mut R) -> Result<Vec<Mesh>, LoadError> {
    let (models, _) = tobj::load_obj_buf(reader, &tobj::GPU_LOAD_OPTIONS, |_| {
        Err(tobj::LoadError::OpenFileFailed)
    })?;

    let mut textures = TextureCache::default();
    models
        .into_iter()
        .map(|model| build_mesh(model, &[], &mut textures))
        .collect()
}

fn build_mesh(
    model: tobj::Model,
    materials: &[tobj::Material],
    textures: &mut TextureCache,
) -> Result<Mesh, LoadError> {
    let name = model.name;
    let source = model.mesh;

    let positions: Vec<Vec3> = source
        .positions
        .chunks_exact(3)
        .map(|p| Vec3::new(p[0], p[1], p[2]))
        .collect();
    let vertex_count = positions.len();

    if source.indices.len() % 3 != 0 {
        return Err(LoadError::IndexArrayLength {
            mesh: name,
            len: source.indices.len(),
        });
    }
    let faces: Vec<Face> = source
        .indices
        .chunks_exact(3)
        .map(|f| Face::new(f[0] as usize, f[1] as usize, f[2] as usize))
        .collect();

    let normals: Vec<Vec3> = if source.normals.len() == vertex_count * 3 {
        source
            .normals
            .chunks_exact(3)
            .map(|n| Vec3::new(n[0], n[1], n[2]))
            .collect()
    } else {
        accumulate_normals(&positions, &faces)
    };

    // OBJ puts the UV origin at the bottom-left; textures are stored top-left.
    let uvs: Vec<Vec2> = if source.texcoords.len() == vertex_count * 2 {
        source
            .texcoords
            .chunks_exact(2)
            .map(|t| Vec2::new(t[0], 1.0 - t[1]))
            .collect()
    } else {
        vec![Vec2::ZERO; vertex_count]
    };

    let vertices = positions
        .iter()
        .zip(&normals)
        .zip(&uvs)
        .map(|((&p, &n), &uv)| Vertex::new(p, n, uv))
        .collect();

    let mut mesh = Mesh::new(name, vertices, faces)?;
    if let Some(texture_name) = source
        .material_id
        .and_then(|id| materials.get(id))
        .and_then(|m| m.diffuse_texture.as_deref())
    {
        mesh.set_texture(textures.get(texture_name));
    }

    log::debug!(
        "built OBJ mesh `{}`: {} vertices, {} faces",
        mesh.name(),
        mesh.vertices().len(),
        mesh.faces().len()
    );
    Ok(mesh)
}

/// Sums each face's geometric normal onto its three vertices.
///
/// Out-of-range indices are skipped here; `Mesh::new` reports them.
fn accumulate_normals(positions: &[Vec3], faces: &[Face]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];
    for face in faces {
        let [a, b, c] = face.indices();
        if a >= positions.len() || b >= positions.len() || c >= positions.len() {
            continue;
        }
        let n = (positions[b] - positions[a]).cross(positions[c] - positions[a]);
        normals[a] = normals[a] + n;
        normals[b] = normals[b] + n;
        normals[c] = normals[c] + n;
    }
    normals
}
