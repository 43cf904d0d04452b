//! Lighting for the renderer.

use serde::Deserialize;

use crate::math::vec3::Vec3;

/// Default light position used by [`PointLight::default`].
pub const DEFAULT_LIGHT_POSITION: Vec3 = Vec3::new(0.0, 10.0, 10.0);

/// A single point light in world space.
///
/// There is no attenuation: intensity depends only on the angle between the
/// surface normal and the direction toward the light.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PointLight {
    #[serde(with = "crate::config::vec3_array")]
    pub position: Vec3,
}

impl PointLight {
    pub fn new(position: Vec3) -> Self {
        Self { position }
    }

    /// Diffuse intensity at `point` for a surface with `normal`, in [0.0, 1.0].
    pub fn intensity(&self, point: Vec3, normal: Vec3) -> f32 {
        compute_n_dot_l(point, normal, self.position)
    }
}

impl Default for PointLight {
    fn default() -> Self {
        Self::new(DEFAULT_LIGHT_POSITION)
    }
}

/// Cosine of the angle between `normal` and the direction from `point` to the light.
///
/// Both vectors are normalized first; back-facing results clamp to 0.
pub fn compute_n_dot_l(point: Vec3, normal: Vec3, light_position: Vec3) -> f32 {
    let light_direction = (light_position - point).normalize();
    normal.normalize().dot(light_direction).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_direct_illumination() {
        // Light straight above the point, normal facing up
        let n_dot_l = compute_n_dot_l(Vec3::ZERO, Vec3::UP, Vec3::new(0.0, 5.0, 0.0));
        assert_eq!(n_dot_l, 1.0);
    }

    #[test]
    fn test_no_illumination_when_orthogonal() {
        let n_dot_l = compute_n_dot_l(Vec3::ZERO, Vec3::RIGHT, Vec3::new(0.0, 5.0, 0.0));
        assert_eq!(n_dot_l, 0.0);
    }

    #[test]
    fn test_facing_away_clamps_to_zero() {
        let n_dot_l = compute_n_dot_l(Vec3::ZERO, -Vec3::UP, Vec3::new(0.0, 5.0, 0.0));
        assert_eq!(n_dot_l, 0.0);
    }

    #[test]
    fn test_unnormalized_normal_is_normalized() {
        // Normal at 45 degrees, scaled up
        let light = PointLight::new(Vec3::new(0.0, 10.0, 0.0));
        let intensity = light.intensity(Vec3::ZERO, Vec3::new(0.0, 3.0, 3.0));
        assert_relative_eq!(intensity, std::f32::consts::FRAC_1_SQRT_2, epsilon = 1e-5);
    }
}
