//! JSON scene payloads in the Babylon export layout.
//!
//! ```text
//! {
//!   "materials": [ { "id": "m0", "name": "Wood", "diffuseTexture": { "name": "wood.png" } } ],
//!   "meshes": [ {
//!     "name": "Cube",
//!     "vertices": [ x, y, z, nx, ny, nz, (u, v, (u2, v2)) , ... ],
//!     "indices":  [ a, b, c, ... ],
//!     "uvCount": 1,
//!     "position": [ 0, 0, 0 ],
//!     "materialId": "m0"
//!   } ]
//! }
//! ```
//!
//! The vertex array is consumed in windows whose size depends on `uvCount`:
//! 6 scalars without UVs, 8 with one UV pair, 10 with two (only the first pair
//! is used). Unknown fields are ignored.

use std::collections::HashMap;
use std::io::Read;

use serde::Deserialize;

use super::{BuildOptions, LoadError, TextureCache};
use crate::math::vec2::Vec2;
use crate::math::vec3::Vec3;
use crate::mesh::{Face, Mesh, Vertex};

#[derive(Debug, Clone, Deserialize)]
pub struct SceneFile {
    pub materials: Vec<MaterialRecord>,
    pub meshes: Vec<MeshRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MaterialRecord {
    pub id: String,
    pub name: String,
    #[serde(rename = "diffuseTexture", default)]
    pub diffuse_texture: Option<TextureRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TextureRecord {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MeshRecord {
    pub name: String,
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
    #[serde(rename = "uvCount")]
    pub uv_count: u32,
    pub position: [f32; 3],
    #[serde(rename = "materialId", default)]
    pub material_id: Option<String>,
}

impl SceneFile {
    pub fn from_json_str(json: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LoadError> {
        Ok(serde_json::from_reader(reader)?)
    }
}

impl MeshRecord {
    /// Scalars per vertex for this record's UV channel count.
    pub fn vertex_window(&self) -> Result<usize, LoadError> {
        match self.uv_count {
            0 => Ok(6),
            1 => Ok(8),
            2 => Ok(10),
            uv_count => Err(LoadError::UnsupportedUvCount {
                mesh: self.name.clone(),
                uv_count,
            }),
        }
    }
}

/// Builds meshes from a scene, sharing textures between them.
pub struct MeshBuilder {
    textures: TextureCache,
}

impl MeshBuilder {
    pub fn new(options: BuildOptions) -> Self {
        Self {
            textures: TextureCache::new(options),
        }
    }

    /// Builds every mesh of `scene`, in document order.
    ///
    /// Stops at the first malformed mesh.
    pub fn build_all(&mut self, scene: &SceneFile) -> Result<Vec<Mesh>, LoadError> {
        let materials: HashMap<&str, &MaterialRecord> = scene
            .materials
            .iter()
            .map(|m| (m.id.as_str(), m))
            .collect();

        scene
            .meshes
            .iter()
            .map(|record| self.build_mesh(record, &materials))
            .collect()
    }

    /// Builds one mesh record. `materials` maps material ids to materials.
    pub fn build_mesh(
        &mut self,
        record: &MeshRecord,
        materials: &HashMap<&str, &MaterialRecord>,
    ) -> Result<Mesh, LoadError> {
        let window = record.vertex_window()?;
        if record.vertices.len() % window != 0 {
            return Err(LoadError::VertexArrayLength {
                mesh: record.name.clone(),
                len: record.vertices.len(),
                window,
            });
        }
        if record.indices.len() % 3 != 0 {
            return Err(LoadError::IndexArrayLength {
                mesh: record.name.clone(),
                len: record.indices.len(),
            });
        }

        let material = match record.material_id.as_deref() {
            Some(id) => Some(materials.get(id).copied().ok_or_else(|| {
                LoadError::UnknownMaterial {
                    mesh: record.name.clone(),
                    material: id.to_string(),
                }
            })?),
            None => None,
        };

        let has_uv = record.uv_count > 0;
        let vertices = record
            .vertices
            .chunks_exact(window)
            .map(|w| {
                let texture_coordinates = if has_uv {
                    Vec2::new(w[6], w[7])
                } else {
                    Vec2::ZERO
                };
                Vertex::new(
                    Vec3::new(w[0], w[1], w[2]),
                    Vec3::new(w[3], w[4], w[5]),
                    texture_coordinates,
                )
            })
            .collect();

        let faces = record
            .indices
            .chunks_exact(3)
            .map(|f| Face::new(f[0] as usize, f[1] as usize, f[2] as usize))
            .collect();

        let [x, y, z] = record.position;
        let mut mesh =
            Mesh::new(record.name.clone(), vertices, faces)?.with_position(Vec3::new(x, y, z));

        if let Some(texture_name) = material
            .and_then(|m| m.diffuse_texture.as_ref())
            .map(|t| t.name.as_str())
        {
            mesh.set_texture(self.textures.get(texture_name));
        }

        log::debug!(
            "built mesh `{}`: {} vertices, {} faces{}",
            mesh.name(),
            mesh.vertices().len(),
            mesh.faces().len(),
            if mesh.texture().is_some() { ", textured" } else { "" }
        );
        Ok(mesh)
    }

    pub fn textures(&self) -> &TextureCache {
        &self.textures
    }
}

/// Builds every mesh of `scene` with a fresh texture cache.
pub fn build_meshes(scene: &SceneFile, options: BuildOptions) -> Result<Vec<Mesh>, LoadError> {
    MeshBuilder::new(options).build_all(scene)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const TRIANGLE_NO_UV: &str = r#"{
        "materials": [],
        "meshes": [{
            "name": "Tri",
            "vertices": [0, 0, 0,  0, 0, -1,
                         1, 0, 0,  0, 0, -1,
                         0, 1, 0,  0, 0, -1],
            "indices": [0, 1, 2],
            "uvCount": 0,
            "position": [1, 2, 3]
        }]
    }"#;

    fn scene_with(mesh: &str, materials: &str) -> SceneFile {
        let json = format!(r#"{{ "materials": [{materials}], "meshes": [{mesh}] }}"#);
        SceneFile::from_json_str(&json).unwrap()
    }

    #[test]
    fn builds_vertices_faces_and_position() {
        let scene = SceneFile::from_json_str(TRIANGLE_NO_UV).unwrap();
        let meshes = build_meshes(&scene, BuildOptions::default()).unwrap();

        assert_eq!(meshes.len(), 1);
        let mesh = &meshes[0];
        assert_eq!(mesh.name(), "Tri");
        assert_eq!(mesh.vertices().len(), 3);
        assert_eq!(mesh.faces().len(), 1);
        assert_eq!(mesh.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(mesh.vertices()[1].coordinates, Vec3::RIGHT);
        assert_eq!(mesh.vertices()[1].texture_coordinates, Vec2::ZERO);
        assert_relative_eq!(mesh.faces()[0].normal.z, -1.0);
        assert!(mesh.texture().is_none());
    }

    #[test]
    fn two_uv_channels_use_ten_scalar_windows_and_first_pair() {
        let mesh = r#"{
            "name": "Quad", "uvCount": 2, "position": [0, 0, 0],
            "vertices": [0,0,0, 0,0,1, 0.1,0.2, 9,9,
                         1,0,0, 0,0,1, 0.3,0.4, 9,9,
                         0,1,0, 0,0,1, 0.5,0.6, 9,9],
            "indices": [0, 1, 2]
        }"#;
        let meshes = build_meshes(&scene_with(mesh, ""), BuildOptions::default()).unwrap();
        assert_eq!(meshes[0].vertices().len(), 3);
        assert_eq!(meshes[0].vertices()[2].texture_coordinates, Vec2::new(0.5, 0.6));
    }

    #[test]
    fn non_divisible_vertex_array_is_rejected() {
        let mesh = r#"{
            "name": "Broken", "uvCount": 1, "position": [0, 0, 0],
            "vertices": [0,0,0, 0,0,1, 0,0, 1,0,0, 0,0,1, 1],
            "indices": []
        }"#;
        let err = build_meshes(&scene_with(mesh, ""), BuildOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            LoadError::VertexArrayLength { len: 15, window: 8, .. }
        ));
    }

    #[test]
    fn non_divisible_index_array_is_rejected() {
        let mesh = r#"{
            "name": "Broken", "uvCount": 0, "position": [0, 0, 0],
            "vertices": [0,0,0, 0,0,1, 1,0,0, 0,0,1, 0,1,0, 0,0,1],
            "indices": [0, 1]
        }"#;
        let err = build_meshes(&scene_with(mesh, ""), BuildOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::IndexArrayLength { len: 2, .. }));
    }

    #[test]
    fn unsupported_uv_count_is_rejected() {
        let mesh = r#"{
            "name": "Odd", "uvCount": 3, "position": [0, 0, 0],
            "vertices": [], "indices": []
        }"#;
        let err = build_meshes(&scene_with(mesh, ""), BuildOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedUvCount { uv_count: 3, .. }));
    }

    #[test]
    fn unknown_material_is_rejected() {
        let mesh = r#"{
            "name": "Lost", "uvCount": 0, "position": [0, 0, 0],
            "vertices": [], "indices": [], "materialId": "nope"
        }"#;
        let err = build_meshes(&scene_with(mesh, ""), BuildOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::UnknownMaterial { ref material, .. } if material == "nope"));
    }

    #[test]
    fn missing_required_field_is_a_json_error() {
        let err = SceneFile::from_json_str(r#"{ "materials": [] }"#).unwrap_err();
        assert!(matches!(err, LoadError::Json(_)));
    }

    #[test]
    fn meshes_sharing_a_material_share_its_texture() {
        let materials = r#"{ "id": "m0", "name": "Wood", "diffuseTexture": { "name": "wood.png" } },
                           { "id": "m1", "name": "Plain" }"#;
        let mesh = |name: &str, material: &str| {
            format!(
                r#"{{ "name": "{name}", "uvCount": 1, "position": [0, 0, 0],
                     "vertices": [], "indices": [], "materialId": "{material}" }}"#
            )
        };
        let json = format!(
            r#"{{ "materials": [{materials}], "meshes": [{}, {}, {}] }}"#,
            mesh("A", "m0"),
            mesh("B", "m0"),
            mesh("C", "m1"),
        );
        let scene = SceneFile::from_json_str(&json).unwrap();
        let mut builder = MeshBuilder::new(BuildOptions::with_texture_root("/nonexistent"));
        let meshes = builder.build_all(&scene).unwrap();

        let a = meshes[0].texture().unwrap();
        let b = meshes[1].texture().unwrap();
        assert!(std::ptr::eq(a, b));
        assert_eq!((a.width(), a.height()), (512, 512));
        assert!(meshes[2].texture().is_none());
        assert_eq!(builder.textures().len(), 1);
    }
}
