//! Rendering pipeline: device, buffers and triangle fill.
//!
//! [`Device`] owns the color and depth buffers and runs a frame over a list of
//! meshes; [`FrameBuffer`] is the borrowed, depth-tested view the
//! [`ScanlineRasterizer`] writes through.

mod device;
mod framebuffer;
mod scanline;

pub use device::Device;
pub use framebuffer::{FrameBuffer, BYTES_PER_PIXEL, DEPTH_CLEAR};
pub use scanline::{
    classify, interpolate, scan_edges, sort_vertices, Edge, EdgeSample, Handedness, ScanEdges,
    ScanVertex, ScanlineRasterizer,
};

use crate::math::vec2::Vec2;
use crate::math::vec3::Vec3;

/// A vertex after projection, carrying what the triangle fill needs.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct ProjectedVertex {
    /// Screen x, screen y (pixels, y down) and projected depth.
    pub coordinates: Vec3,
    /// Normal in world space.
    pub normal: Vec3,
    pub world_coordinates: Vec3,
    pub texture_coordinates: Vec2,
}

/// Per-frame counters returned by [`Device::render`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct FrameStats {
    pub meshes: usize,
    pub faces_drawn: usize,
    pub faces_culled: usize,
}
