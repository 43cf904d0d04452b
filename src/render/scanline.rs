//! Scanline triangle rasterization with Gouraud lighting and texture mapping.
//!
//! # Algorithm Overview
//!
//! 1. **Sort vertices** by screen Y so `v1` is the top, `v3` the bottom and
//!    `v2` the middle vertex.
//! 2. **Light each vertex** once: the N·L term of its world position and
//!    world normal against the point light.
//! 3. **Classify** the triangle by which side of the long edge `v1 -> v3`
//!    the middle vertex lies on:
//!
//! ```text
//!   Right:  v1            Left:     v1
//!           | \                    / |
//!           |  v2                v2  |
//!           | /                    \ |
//!           v3                      v3
//! ```
//!
//! 4. **Walk the rows** from `v1.y` to `v3.y`. Each row is bounded by a start
//!    (left) and an end (right) edge; the short edge switches from `v1 -> v2`
//!    to `v2 -> v3` once the row passes the middle vertex. Depth, lighting and
//!    UV are linearly interpolated along both edges, then across the row.
//!
//! All interpolation goes through [`interpolate`], which clamps the gradient
//! to [0, 1] so overshoot at triangle edges never extrapolates an attribute.
//! Interpolation is linear in screen space, not perspective-correct.

use super::framebuffer::FrameBuffer;
use super::ProjectedVertex;
use crate::colors::Color4;
use crate::config::ShadingMode;
use crate::light::PointLight;
use crate::math::vec2::Vec2;
use crate::math::vec3::Vec3;
use crate::texture::Texture;

/// Linear blend from `min` to `max`, with `gradient` clamped to [0, 1].
#[inline]
pub fn interpolate(min: f32, max: f32, gradient: f32) -> f32 {
    min + (max - min) * gradient.clamp(0.0, 1.0)
}

/// A screen-space vertex with its lighting already computed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScanVertex {
    /// Screen x, screen y, projected depth.
    pub position: Vec3,
    pub n_dot_l: f32,
    pub uv: Vec2,
}

/// Side of the long edge `v1 -> v3` the middle vertex lies on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Handedness {
    Right,
    Left,
}

/// One triangle edge, walked from `from` to `to`.
#[derive(Clone, Copy, Debug)]
pub struct Edge<'a> {
    pub from: &'a ScanVertex,
    pub to: &'a ScanVertex,
}

/// Attribute values where a row crosses an edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeSample {
    pub x: f32,
    pub z: f32,
    pub n_dot_l: f32,
    pub uv: Vec2,
}

impl Edge<'_> {
    /// Progress of row `y` along the edge. A horizontal edge counts as fully walked.
    #[inline]
    pub fn gradient(&self, y: f32) -> f32 {
        let span = self.to.position.y - self.from.position.y;
        if span != 0.0 {
            (y - self.from.position.y) / span
        } else {
            1.0
        }
    }

    #[inline]
    pub fn sample(&self, y: f32) -> EdgeSample {
        let g = self.gradient(y);
        let (a, b) = (self.from, self.to);
        EdgeSample {
            x: interpolate(a.position.x, b.position.x, g),
            z: interpolate(a.position.z, b.position.z, g),
            n_dot_l: interpolate(a.n_dot_l, b.n_dot_l, g),
            uv: Vec2::new(interpolate(a.uv.x, b.uv.x, g), interpolate(a.uv.y, b.uv.y, g)),
        }
    }
}

/// The edges bounding one row: `start` on the left, `end` on the right.
#[derive(Clone, Copy, Debug)]
pub struct ScanEdges<'a> {
    pub start: Edge<'a>,
    pub end: Edge<'a>,
}

/// Sorts three vertices by screen Y (ascending: top to bottom).
///
/// Three compare-and-swap steps; after sorting `v[0].y <= v[1].y <= v[2].y`.
pub fn sort_vertices<'a>(mut v: [&'a ProjectedVertex; 3]) -> [&'a ProjectedVertex; 3] {
    if v[1].coordinates.y < v[0].coordinates.y {
        v.swap(0, 1);
    }
    if v[2].coordinates.y < v[0].coordinates.y {
        v.swap(0, 2);
    }
    if v[2].coordinates.y < v[1].coordinates.y {
        v.swap(1, 2);
    }
    v
}

/// Classifies a Y-sorted triangle by comparing the inverse slopes of
/// `v1 -> v2` and `v1 -> v3`.
///
/// When `v1 -> v2` is horizontal the middle vertex is on whichever side of
/// `v1` its x lies.
pub fn classify(v: &[ScanVertex; 3]) -> Handedness {
    let (p1, p2, p3) = (v[0].position, v[1].position, v[2].position);

    let d13 = if p3.y - p1.y > 0.0 {
        (p3.x - p1.x) / (p3.y - p1.y)
    } else {
        0.0
    };

    if p2.y - p1.y > 0.0 {
        let d12 = (p2.x - p1.x) / (p2.y - p1.y);
        if d12 > d13 {
            Handedness::Right
        } else {
            Handedness::Left
        }
    } else if p2.x > p1.x {
        Handedness::Right
    } else {
        Handedness::Left
    }
}

/// Selects the start/end edges for row `y` of a Y-sorted triangle.
pub fn scan_edges(v: &[ScanVertex; 3], y: f32, handedness: Handedness) -> ScanEdges<'_> {
    let [v1, v2, v3] = v;
    let above_middle = y < v2.position.y;

    let ((a, b), (c, d)) = match (handedness, above_middle) {
        (Handedness::Right, true) => ((v1, v3), (v1, v2)),
        (Handedness::Right, false) => ((v1, v3), (v2, v3)),
        (Handedness::Left, true) => ((v1, v2), (v1, v3)),
        (Handedness::Left, false) => ((v2, v3), (v1, v3)),
    };

    ScanEdges {
        start: Edge { from: a, to: b },
        end: Edge { from: c, to: d },
    }
}

/// Interpolated bounds of a single row.
struct ScanLine {
    y: i32,
    start: EdgeSample,
    end: EdgeSample,
}

impl ScanLine {
    fn new(y: i32, edges: ScanEdges<'_>) -> Self {
        let row = y as f32;
        Self {
            y,
            start: edges.start.sample(row),
            end: edges.end.sample(row),
        }
    }

    /// Fills pixels `floor(start.x)..floor(end.x)` of the row.
    fn draw(self, buffer: &mut FrameBuffer, color: Color4, texture: Option<&Texture>) {
        let sx = self.start.x.floor();
        let ex = self.end.x.floor();
        if !(sx.is_finite() && ex.is_finite()) {
            return;
        }

        // Columns outside the buffer would be clipped by draw_point anyway.
        let first = sx.max(0.0) as i32;
        let last = ex.min(buffer.width() as f32) as i32;

        for x in first..last {
            let gradient = (x as f32 - sx) / (ex - sx);

            let z = interpolate(self.start.z, self.end.z, gradient);
            let n_dot_l = interpolate(self.start.n_dot_l, self.end.n_dot_l, gradient);
            let u = interpolate(self.start.uv.x, self.end.uv.x, gradient);
            let v = interpolate(self.start.uv.y, self.end.uv.y, gradient);

            let texel = texture.map_or(Color4::WHITE, |t| t.map(u, v));
            let shaded = Color4::new(
                color.r * n_dot_l * texel.r,
                color.g * n_dot_l * texel.g,
                color.b * n_dot_l * texel.b,
                1.0,
            );
            buffer.draw_point(x, self.y, z, shaded);
        }
    }
}

/// Scanline triangle rasterizer lit by a single point light.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanlineRasterizer {
    light: PointLight,
    shading: ShadingMode,
}

impl ScanlineRasterizer {
    pub fn new(light: PointLight, shading: ShadingMode) -> Self {
        Self { light, shading }
    }

    pub fn light(&self) -> &PointLight {
        &self.light
    }

    /// Fills a projected triangle into the frame buffer.
    ///
    /// Each pixel is `color * n_dot_l * texel`, where the texel is opaque white
    /// without a texture. Degenerate and off-screen triangles draw nothing.
    pub fn draw_triangle(
        &self,
        vertices: [&ProjectedVertex; 3],
        color: Color4,
        texture: Option<&Texture>,
        buffer: &mut FrameBuffer,
    ) {
        let sorted = sort_vertices(vertices);
        let lighting = self.lighting(&sorted);

        let scan = [0, 1, 2].map(|i| ScanVertex {
            position: sorted[i].coordinates,
            n_dot_l: lighting[i],
            uv: sorted[i].texture_coordinates,
        });
        let handedness = classify(&scan);

        let top = scan[0].position.y.floor();
        let bottom = scan[2].position.y.floor();
        if !(top.is_finite() && bottom.is_finite()) {
            return;
        }

        // Rows outside the buffer would be clipped by draw_point anyway.
        let first = top.max(0.0) as i32;
        let last = bottom.min(buffer.height() as f32 - 1.0) as i32;

        for y in first..=last {
            ScanLine::new(y, scan_edges(&scan, y as f32, handedness)).draw(buffer, color, texture);
        }
    }

    fn lighting(&self, v: &[&ProjectedVertex; 3]) -> [f32; 3] {
        match self.shading {
            ShadingMode::Gouraud => {
                v.map(|p| self.light.intensity(p.world_coordinates, p.normal))
            }
            ShadingMode::Flat => {
                let centroid =
                    (v[0].world_coordinates + v[1].world_coordinates + v[2].world_coordinates)
                        / 3.0;
                let normal = (v[0].normal + v[1].normal + v[2].normal) / 3.0;
                [self.light.intensity(centroid, normal); 3]
            }
        }
    }
}
