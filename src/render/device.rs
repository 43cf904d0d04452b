//! The rendering device.
//!
//! [`Device`] owns the color and depth buffers and drives a frame:
//!
//! ```text
//! clear() -> render(camera, meshes) -> present(surface)
//! ```
//!
//! Per mesh, vertices go object -> world -> view -> clip space through a
//! single combined matrix, then to pixels. Faces whose view-space normal
//! points away from the camera are culled before projection.

use super::framebuffer::{FrameBuffer, BYTES_PER_PIXEL, DEPTH_CLEAR};
use super::scanline::ScanlineRasterizer;
use super::{FrameStats, ProjectedVertex};
use crate::camera::Camera;
use crate::colors::Color4;
use crate::config::RenderConfig;
use crate::math::mat4::Mat4;
use crate::math::vec3::Vec3;
use crate::mesh::{Mesh, Vertex};
use crate::projection::Projection;
use crate::surface::Surface;
use crate::texture::Texture;

pub struct Device {
    color_buffer: Vec<u8>,
    depth_buffer: Vec<f32>,
    width: u32,
    height: u32,
    config: RenderConfig,
    projection: Projection,
    rasterizer: ScanlineRasterizer,
}

impl Device {
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_config(width, height, RenderConfig::default())
    }

    pub fn with_config(width: u32, height: u32, config: RenderConfig) -> Self {
        let size = width as usize * height as usize;
        let mut device = Self {
            color_buffer: vec![0; size * BYTES_PER_PIXEL],
            depth_buffer: vec![DEPTH_CLEAR; size],
            width,
            height,
            projection: Projection::for_viewport(
                config.fov,
                width,
                height,
                config.z_near,
                config.z_far,
            ),
            rasterizer: ScanlineRasterizer::new(config.light, config.shading),
            config,
        };
        device.clear();
        device
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Resets the color buffer to the background and the depth buffer to
    /// [`DEPTH_CLEAR`].
    pub fn clear(&mut self) {
        let background = self.config.background.to_rgba8();
        for pixel in self.color_buffer.chunks_exact_mut(BYTES_PER_PIXEL) {
            pixel.copy_from_slice(&background);
        }
        self.depth_buffer.fill(DEPTH_CLEAR);
    }

    pub fn as_framebuffer(&mut self) -> FrameBuffer<'_> {
        FrameBuffer::new(
            &mut self.color_buffer,
            &mut self.depth_buffer,
            self.width,
            self.height,
        )
    }

    /// Depth-tested write of one fragment; off-screen points are ignored.
    pub fn draw_point(&mut self, x: i32, y: i32, z: f32, color: Color4) {
        self.as_framebuffer().draw_point(x, y, z, color);
    }

    /// Projects a vertex to screen space.
    ///
    /// `transform` is the combined world-view-projection matrix; `world` gives
    /// the world-space position and normal used for lighting.
    pub fn project(&self, vertex: &Vertex, transform: &Mat4, world: &Mat4) -> ProjectedVertex {
        let point = transform.transform_coordinates(vertex.coordinates);
        let width = self.width as f32;
        let height = self.height as f32;

        ProjectedVertex {
            // Clip space is centered on the origin; pixels start top-left.
            coordinates: Vec3::new(
                point.x * width + width / 2.0,
                -point.y * height + height / 2.0,
                point.z,
            ),
            normal: world.transform_normal(vertex.normal),
            world_coordinates: world.transform_coordinates(vertex.coordinates),
            texture_coordinates: vertex.texture_coordinates,
        }
    }

    /// Fills a projected triangle with `color`, lit and optionally textured.
    pub fn draw_triangle(
        &mut self,
        v1: &ProjectedVertex,
        v2: &ProjectedVertex,
        v3: &ProjectedVertex,
        color: Color4,
        texture: Option<&Texture>,
    ) {
        let mut fb = FrameBuffer::new(
            &mut self.color_buffer,
            &mut self.depth_buffer,
            self.width,
            self.height,
        );
        self.rasterizer
            .draw_triangle([v1, v2, v3], color, texture, &mut fb);
    }

    /// Renders every mesh, in order, into the buffers.
    ///
    /// Does not clear first; call [`clear`](Self::clear) between frames.
    pub fn render(&mut self, camera: &Camera, meshes: &[Mesh]) -> FrameStats {
        let view = camera.view_matrix();
        let projection = self.projection.matrix();
        let mut stats = FrameStats {
            meshes: meshes.len(),
            ..FrameStats::default()
        };

        for mesh in meshes {
            let world = mesh.world_matrix();
            let world_view = world * view;
            let transform = world_view * projection;
            let vertices = mesh.vertices();

            for face in mesh.faces() {
                // Back-face culling
                let normal = world_view.transform_normal(face.normal);
                if normal.z >= 0.0 {
                    stats.faces_culled += 1;
                    continue;
                }

                let [a, b, c] = face
                    .indices()
                    .map(|i| self.project(&vertices[i], &transform, &world));
                self.draw_triangle(&a, &b, &c, Color4::WHITE, mesh.texture());
                stats.faces_drawn += 1;
            }
        }

        log::trace!(
            "frame: {} meshes, {} faces drawn, {} culled",
            stats.meshes,
            stats.faces_drawn,
            stats.faces_culled
        );
        stats
    }

    /// Hands the color buffer to `surface`.
    pub fn present<S: Surface>(&self, surface: &mut S) -> Result<(), S::Error> {
        surface.present_color_buffer(&self.color_buffer, self.width, self.height)
    }

    /// RGBA8 bytes, row-major, top row first.
    pub fn color_buffer(&self) -> &[u8] {
        &self.color_buffer
    }

    pub fn depth_buffer(&self) -> &[f32] {
        &self.depth_buffer
    }
}
