//! Mesh data model: vertices, triangular faces and per-face normals.

use std::sync::Arc;

use crate::loader::LoadError;
use crate::math::mat4::Mat4;
use crate::math::vec2::Vec2;
use crate::math::vec3::Vec3;
use crate::texture::Texture;

/// A mesh vertex in object space.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Vertex {
    pub coordinates: Vec3,
    /// Unit length once the vertex belongs to a mesh.
    pub normal: Vec3,
    pub texture_coordinates: Vec2,
}

impl Vertex {
    pub fn new(coordinates: Vec3, normal: Vec3, texture_coordinates: Vec2) -> Self {
        Self {
            coordinates,
            normal,
            texture_coordinates,
        }
    }
}

// The members a, b, and c are indices into the vertex list of the owning
// mesh. The normal is derived from the three vertex normals.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Face {
    pub a: usize,
    pub b: usize,
    pub c: usize,
    pub normal: Vec3,
}

impl Face {
    pub fn new(a: usize, b: usize, c: usize) -> Self {
        Self {
            a,
            b,
            c,
            normal: Vec3::ZERO,
        }
    }

    pub fn indices(&self) -> [usize; 3] {
        [self.a, self.b, self.c]
    }
}

/// A triangle mesh placed in the world.
///
/// Geometry is fixed at construction. The embedding application animates the
/// mesh by writing `rotation` and `position` between frames.
#[derive(Clone, Debug)]
pub struct Mesh {
    name: String,
    vertices: Vec<Vertex>,
    faces: Vec<Face>,
    /// Euler angles in radians, fed to the world matrix as (yaw, pitch, roll).
    pub rotation: Vec3,
    pub position: Vec3,
    texture: Option<Arc<Texture>>,
}

impl Mesh {
    /// Builds a mesh, normalizing vertex normals and computing face normals.
    ///
    /// Fails if any face index is outside the vertex list.
    pub fn new(
        name: impl Into<String>,
        mut vertices: Vec<Vertex>,
        faces: Vec<Face>,
    ) -> Result<Self, LoadError> {
        let name = name.into();
        for face in &faces {
            if let Some(&index) = face.indices().iter().find(|&&i| i >= vertices.len()) {
                return Err(LoadError::IndexOutOfRange {
                    mesh: name,
                    index,
                    vertex_count: vertices.len(),
                });
            }
        }
        for vertex in &mut vertices {
            vertex.normal = vertex.normal.normalize();
        }

        let mut mesh = Self {
            name,
            vertices,
            faces,
            rotation: Vec3::ZERO,
            position: Vec3::ZERO,
            texture: None,
        };
        mesh.compute_face_normals();
        Ok(mesh)
    }

    /// The 8-vertex, 12-face cube spanning [-1, 1] on every axis.
    ///
    /// Each corner's normal points away from the center.
    pub fn cube() -> Self {
        let vertices = CUBE_VERTICES
            .iter()
            .map(|&corner| Vertex::new(corner, corner.normalize(), Vec2::ZERO))
            .collect();
        let faces = CUBE_FACES
            .iter()
            .map(|&[a, b, c]| Face::new(a, b, c))
            .collect();

        // Static indices, always in range: skip validation.
        let mut mesh = Self {
            name: "Cube".to_string(),
            vertices,
            faces,
            rotation: Vec3::ZERO,
            position: Vec3::ZERO,
            texture: None,
        };
        mesh.compute_face_normals();
        mesh
    }

    fn compute_face_normals(&mut self) {
        for face in &mut self.faces {
            let a = self.vertices[face.a].normal;
            let b = self.vertices[face.b].normal;
            let c = self.vertices[face.c].normal;
            face.normal = ((a + b + c) / 3.0).normalize();
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn texture(&self) -> Option<&Texture> {
        self.texture.as_deref()
    }

    pub fn set_texture(&mut self, texture: Arc<Texture>) {
        self.texture = Some(texture);
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// World matrix: rotation (yaw = x, pitch = y, roll = z) then translation.
    pub fn world_matrix(&self) -> Mat4 {
        Mat4::rotation_yaw_pitch_roll(self.rotation.x, self.rotation.y, self.rotation.z)
            * Mat4::translation(self.position.x, self.position.y, self.position.z)
    }
}

const CUBE_VERTICES: [Vec3; 8] = [
    Vec3::new(-1.0, 1.0, 1.0),
    Vec3::new(1.0, 1.0, 1.0),
    Vec3::new(-1.0, -1.0, 1.0),
    Vec3::new(1.0, -1.0, 1.0),
    Vec3::new(-1.0, 1.0, -1.0),
    Vec3::new(1.0, 1.0, -1.0),
    Vec3::new(1.0, -1.0, -1.0),
    Vec3::new(-1.0, -1.0, -1.0),
];

const CUBE_FACES: [[usize; 3]; 12] = [
    // +Z
    [0, 1, 2],
    [1, 2, 3],
    // +X
    [1, 3, 6],
    [1, 5, 6],
    // -Z
    [5, 6, 7],
    [4, 5, 7],
    // -X
    [0, 4, 7],
    [0, 2, 7],
    // +Y
    [0, 1, 4],
    [1, 4, 5],
    // -Y
    [2, 3, 7],
    [3, 6, 7],
];

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn face_normal_is_normalized_average_of_vertex_normals() {
        let vertices = vec![
            Vertex::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 2.0), Vec2::ZERO),
            Vertex::new(Vec3::RIGHT, Vec3::UP, Vec2::ZERO),
            Vertex::new(Vec3::UP, Vec3::FORWARD, Vec2::ZERO),
        ];
        let mesh = Mesh::new("tri", vertices, vec![Face::new(0, 1, 2)]).unwrap();

        let n = mesh.faces()[0].normal;
        assert_relative_eq!(n.magnitude(), 1.0, epsilon = 1e-6);
        assert_relative_eq!(n.x, 0.0);
        assert_relative_eq!(n.y, 1.0 / 5.0_f32.sqrt(), epsilon = 1e-6);
        assert_relative_eq!(n.z, 2.0 / 5.0_f32.sqrt(), epsilon = 1e-6);
        // Vertex normals are unit length too
        assert_relative_eq!(mesh.vertices()[0].normal.z, 1.0);
    }

    #[test]
    fn out_of_range_face_index_is_rejected() {
        let vertices = vec![Vertex::default(); 3];
        let err = Mesh::new("bad", vertices, vec![Face::new(0, 1, 3)]).unwrap_err();
        assert!(matches!(
            err,
            LoadError::IndexOutOfRange { index: 3, vertex_count: 3, .. }
        ));
    }

    #[test]
    fn cube_has_eight_vertices_and_twelve_faces() {
        let cube = Mesh::cube();
        assert_eq!(cube.vertices().len(), 8);
        assert_eq!(cube.faces().len(), 12);
        for face in cube.faces() {
            assert_relative_eq!(face.normal.magnitude(), 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn world_matrix_translates_after_rotating() {
        let mut mesh = Mesh::cube().with_position(Vec3::new(0.0, 0.0, 5.0));
        mesh.rotation = Vec3::new(std::f32::consts::FRAC_PI_2, 0.0, 0.0);
        let p = mesh.world_matrix().transform_coordinates(Vec3::FORWARD);
        assert_relative_eq!(p.x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(p.z, 5.0, epsilon = 1e-5);
    }
}
