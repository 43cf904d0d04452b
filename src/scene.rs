//! Collections of meshes loaded from one payload.
//!
//! A [`Scene`] keeps meshes in payload order (the order they are rendered in)
//! and indexes them by name for the embedding application.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::loader::{self, BuildOptions, LoadError, SceneFile};
use crate::mesh::Mesh;

#[derive(Debug, Default)]
pub struct Scene {
    meshes: Vec<Mesh>,
    mesh_names: HashMap<String, usize>,
}

impl Scene {
    pub fn new(meshes: Vec<Mesh>) -> Self {
        let mut scene = Self::default();
        for mesh in meshes {
            scene.add_mesh(mesh);
        }
        scene
    }

    /// Loads a JSON scene file. Textures resolve relative to the file's directory.
    pub fn from_babylon_file<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);
        let document = SceneFile::from_reader(reader)?;
        let root = path.parent().unwrap_or_else(|| Path::new("."));
        Ok(Self::new(loader::build_meshes(
            &document,
            BuildOptions::with_texture_root(root),
        )?))
    }

    pub fn from_babylon_str(json: &str, options: BuildOptions) -> Result<Self, LoadError> {
        let document = SceneFile::from_json_str(json)?;
        Ok(Self::new(loader::build_meshes(&document, options)?))
    }

    /// Loads an OBJ file. Textures resolve relative to the file's directory.
    pub fn from_obj<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let root = path.parent().unwrap_or_else(|| Path::new("."));
        Ok(Self::new(loader::load_obj(
            path,
            BuildOptions::with_texture_root(root),
        )?))
    }

    // ============ Mesh Access ============

    /// Get a mesh by name.
    pub fn mesh(&self, name: &str) -> Option<&Mesh> {
        self.mesh_names.get(name).map(|&i| &self.meshes[i])
    }

    /// Get a mutable reference to a mesh by name.
    pub fn mesh_mut(&mut self, name: &str) -> Option<&mut Mesh> {
        self.mesh_names
            .get(name)
            .copied()
            .map(move |i| &mut self.meshes[i])
    }

    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    pub fn meshes_mut(&mut self) -> &mut [Mesh] {
        &mut self.meshes
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// Add a mesh to the end of the render order.
    ///
    /// A later mesh with the same name shadows the earlier one in name lookups.
    pub fn add_mesh(&mut self, mesh: Mesh) {
        let name = mesh.name().to_string();
        let index = self.meshes.len();
        self.meshes.push(mesh);
        self.mesh_names.insert(name, index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::vec3::Vec3;

    #[test]
    fn meshes_are_found_by_name_and_keep_order() {
        let mut scene = Scene::new(vec![
            Mesh::cube(),
            Mesh::cube().with_position(Vec3::new(3.0, 0.0, 0.0)),
        ]);
        assert_eq!(scene.mesh_count(), 2);
        // Both are called "Cube": the later one wins the lookup.
        assert_eq!(scene.mesh("Cube").unwrap().position.x, 3.0);

        scene.mesh_mut("Cube").unwrap().rotation.y = 1.0;
        assert_eq!(scene.meshes()[1].rotation.y, 1.0);
        assert!(scene.mesh("Missing").is_none());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = Scene::from_babylon_file("/nonexistent/scene.babylon").unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
    }
}
