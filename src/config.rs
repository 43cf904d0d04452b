//! Renderer configuration.
//!
//! [`RenderConfig`] carries the fixed parameters of a frame: projection,
//! the single light and the background the color buffer is cleared to.
//! `Default` holds the canonical values; an embedder can also deserialize
//! a partial config from JSON, missing fields falling back to the defaults.

use serde::Deserialize;

use crate::colors::Color4;
use crate::light::PointLight;
use crate::projection::{DEFAULT_FOV, DEFAULT_Z_FAR, DEFAULT_Z_NEAR};

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Vertical field of view in radians.
    pub fov: f32,
    pub z_near: f32,
    pub z_far: f32,
    pub light: PointLight,
    /// Color the buffer is reset to by `Device::clear`.
    pub background: Color4,
    pub shading: ShadingMode,
}

/// How the light term is sampled over a triangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShadingMode {
    /// N·L per vertex, interpolated across the triangle.
    #[default]
    Gouraud,
    /// One N·L per triangle, taken at the centroid.
    Flat,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            fov: DEFAULT_FOV,
            z_near: DEFAULT_Z_NEAR,
            z_far: DEFAULT_Z_FAR,
            light: PointLight::default(),
            background: Color4::TRANSPARENT,
            shading: ShadingMode::Gouraud,
        }
    }
}

impl RenderConfig {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Serde adapter reading a [`Vec3`](crate::math::vec3::Vec3) from `[x, y, z]`.
pub(crate) mod vec3_array {
    use serde::{Deserialize, Deserializer};

    use crate::math::vec3::Vec3;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec3, D::Error>
    where
        D: Deserializer<'de>,
    {
        let [x, y, z] = <[f32; 3]>::deserialize(deserializer)?;
        Ok(Vec3::new(x, y, z))
    }
}
