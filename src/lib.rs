//! A CPU-based software 3D rasterizer.
//!
//! Meshes are projected with a left-handed look-at camera and a perspective
//! projection, back-face culled, then filled scanline by scanline into an
//! RGBA8 color buffer with a z-buffer, Gouraud lighting from a single point
//! light and optional texture mapping. Nothing touches the GPU; presenting the
//! finished buffer is left to a [`Surface`](surface::Surface).
//!
//! # Quick Start
//!
//! ```no_run
//! use softengine::prelude::*;
//!
//! let mut device = Device::new(640, 480);
//! let camera = Camera::new(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);
//! let meshes = vec![Mesh::cube()];
//!
//! device.clear();
//! device.render(&camera, &meshes);
//!
//! let mut surface = ImageSurface::new();
//! device.present(&mut surface)?;
//! surface.save("cube.png")?;
//! # Ok::<(), softengine::surface::SurfaceError>(())
//! ```

// Public API - exposed to library consumers
pub mod camera;
pub mod colors;
pub mod config;
pub mod light;
pub mod loader;
pub mod math;
pub mod mesh;
pub mod projection;
pub mod render;
pub mod scene;
pub mod surface;
pub mod texture;
#[cfg(feature = "window")]
pub mod window;

// Re-export commonly needed types at crate root for convenience
pub use camera::Camera;
pub use config::{RenderConfig, ShadingMode};
pub use loader::{BuildOptions, LoadError};
pub use mesh::Mesh;
pub use projection::Projection;
pub use render::{Device, FrameStats};
pub use scene::Scene;
pub use texture::Texture;

/// Prelude module for convenient imports.
///
/// # Example
/// ```ignore
/// use softengine::prelude::*;
/// ```
pub mod prelude {
    // Scene
    pub use crate::camera::Camera;
    pub use crate::mesh::{Face, Mesh, Vertex};
    pub use crate::scene::Scene;
    pub use crate::texture::Texture;

    // Configuration
    pub use crate::config::{RenderConfig, ShadingMode};
    pub use crate::light::PointLight;
    pub use crate::loader::{BuildOptions, LoadError};
    pub use crate::projection::Projection;

    // Math
    pub use crate::colors::Color4;
    pub use crate::math::mat4::Mat4;
    pub use crate::math::vec2::Vec2;
    pub use crate::math::vec3::Vec3;

    // Rendering
    pub use crate::render::{Device, FrameStats};
    pub use crate::surface::{ImageSurface, Surface};

    // Window
    #[cfg(feature = "window")]
    pub use crate::window::{FrameLimiter, Window, WindowEvent};
}

/// Module exposing internals for benchmarking. Not part of the stable API.
pub mod bench {
    pub use crate::render::{FrameBuffer, ProjectedVertex, ScanlineRasterizer};
}
