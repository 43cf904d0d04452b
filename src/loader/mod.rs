//! Mesh builders: turn scene payloads into [`Mesh`](crate::mesh::Mesh) records.
//!
//! Two sources are supported:
//! - [`babylon`]: the JSON scene format with interleaved vertex windows
//! - [`obj`]: Wavefront OBJ files
//!
//! Both attach diffuse textures through a shared [`TextureCache`], so meshes
//! naming the same image share one decoded texture.

pub mod babylon;
pub mod obj;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::texture::Texture;

pub use babylon::{build_meshes, MaterialRecord, MeshBuilder, MeshRecord, SceneFile};
pub use obj::load_obj;

/// Canonical texture size used for every texture a payload references.
pub const DEFAULT_TEXTURE_SIZE: (u32, u32) = (512, 512);

/// Errors raised while building meshes from a payload.
///
/// Every variant is fatal for the mesh being built; no partial mesh is returned.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("invalid scene document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid OBJ file: {0}")]
    Obj(#[from] tobj::LoadError),

    #[error("mesh `{mesh}`: unsupported uvCount {uv_count} (expected 0, 1 or 2)")]
    UnsupportedUvCount { mesh: String, uv_count: u32 },

    #[error("mesh `{mesh}`: vertex array length {len} is not a multiple of {window}")]
    VertexArrayLength {
        mesh: String,
        len: usize,
        window: usize,
    },

    #[error("mesh `{mesh}`: index array length {len} is not a multiple of 3")]
    IndexArrayLength { mesh: String, len: usize },

    #[error("mesh `{mesh}`: face index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        mesh: String,
        index: usize,
        vertex_count: usize,
    },

    #[error("mesh `{mesh}`: unknown material `{material}`")]
    UnknownMaterial { mesh: String, material: String },
}

/// Options shared by the mesh builders.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildOptions {
    /// Directory texture names are resolved against.
    pub texture_root: PathBuf,
    pub texture_size: (u32, u32),
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            texture_root: PathBuf::from("."),
            texture_size: DEFAULT_TEXTURE_SIZE,
        }
    }
}

impl BuildOptions {
    pub fn with_texture_root(root: impl Into<PathBuf>) -> Self {
        Self {
            texture_root: root.into(),
            ..Self::default()
        }
    }
}

/// Textures requested by name, each loaded at most once.
#[derive(Debug, Default)]
pub struct TextureCache {
    options: BuildOptions,
    loaded: HashMap<String, Arc<Texture>>,
}

impl TextureCache {
    pub fn new(options: BuildOptions) -> Self {
        Self {
            options,
            loaded: HashMap::new(),
        }
    }

    /// Returns the texture for `name`, starting its decode on first request.
    pub fn get(&mut self, name: &str) -> Arc<Texture> {
        let options = &self.options;
        self.loaded
            .entry(name.to_string())
            .or_insert_with(|| {
                let (width, height) = options.texture_size;
                Arc::new(Texture::load(
                    options.texture_root.join(name),
                    width,
                    height,
                ))
            })
            .clone()
    }

    pub fn len(&self) -> usize {
        self.loaded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loaded.is_empty()
    }

    /// All textures requested so far.
    pub fn textures(&self) -> impl Iterator<Item = &Arc<Texture>> {
        self.loaded.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_name_shares_one_texture() {
        let mut cache = TextureCache::new(BuildOptions::with_texture_root("/nonexistent"));
        let a = cache.get("wood.png");
        let b = cache.get("wood.png");
        let c = cache.get("stone.png");
        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(cache.len(), 2);
        assert_eq!((a.width(), a.height()), DEFAULT_TEXTURE_SIZE);
    }
}
