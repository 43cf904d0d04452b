use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use std::thread;
use std::time::{Duration, Instant};

use image::{imageops, DynamicImage, ImageResult, RgbaImage};

use crate::colors::Color4;

/// Load state of a [`Texture`].
///
/// A texture starts out `Loading` and moves to `Ready` exactly once, when its
/// decode thread publishes the pixel grid. There is no way back. A texture
/// whose decode failed stays `Loading`; [`Texture::has_failed`] tells the two apart.
#[derive(Debug, Clone, Copy)]
pub enum TextureState<'a> {
    Loading,
    Ready(&'a RgbaImage),
}

/// A fixed-size texture for texture mapping.
///
/// The pixel grid is decoded in the background; until it is available every
/// lookup returns opaque white, so a texture can be drawn on any frame.
pub struct Texture {
    width: u32,
    height: u32,
    pixels: Arc<OnceLock<RgbaImage>>,
    failed: Arc<AtomicBool>,
}

impl Texture {
    /// Starts decoding the image file at `path` into a `width` x `height` grid.
    pub fn load<P: AsRef<Path>>(path: P, width: u32, height: u32) -> Self {
        let path = path.as_ref().to_path_buf();
        let label = path.display().to_string();
        Self::spawn_decode(width, height, label, move || image::open(&path))
    }

    /// Starts decoding an in-memory image payload (PNG, JPEG, BMP).
    pub fn from_memory(bytes: Vec<u8>, width: u32, height: u32) -> Self {
        Self::spawn_decode(width, height, "<memory>".to_string(), move || {
            image::load_from_memory(&bytes)
        })
    }

    /// Wraps an already decoded image. The texture is ready immediately.
    pub fn from_image(image: RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        let pixels = OnceLock::new();
        let _ = pixels.set(image);
        Self {
            width,
            height,
            pixels: Arc::new(pixels),
            failed: Arc::new(AtomicBool::new(false)),
        }
    }

    fn spawn_decode<F>(width: u32, height: u32, label: String, decode: F) -> Self
    where
        F: FnOnce() -> ImageResult<DynamicImage> + Send + 'static,
    {
        let pixels = Arc::new(OnceLock::new());
        let slot = Arc::clone(&pixels);
        let failed = Arc::new(AtomicBool::new(false));
        let failure = Arc::clone(&failed);

        log::debug!("decoding texture {label} ({width}x{height})");
        let spawned = thread::Builder::new()
            .name("texture-decode".into())
            .spawn(move || match decode() {
                Ok(decoded) => {
                    let _ = slot.set(fit_to_grid(decoded, width, height));
                    log::debug!("texture {label} ready");
                }
                Err(err) => {
                    log::warn!("failed to decode texture {label}: {err}");
                    failure.store(true, Ordering::Release);
                }
            });
        if let Err(err) = spawned {
            log::warn!("could not start texture decode thread: {err}");
            failed.store(true, Ordering::Release);
        }

        Self {
            width,
            height,
            pixels,
            failed,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn state(&self) -> TextureState<'_> {
        match self.pixels.get() {
            Some(pixels) => TextureState::Ready(pixels),
            None => TextureState::Loading,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state(), TextureState::Ready(_))
    }

    /// True once decoding has failed. The texture then never becomes ready.
    pub fn has_failed(&self) -> bool {
        self.failed.load(Ordering::Acquire)
    }

    /// Polls until the texture is ready, its decode fails, or `timeout` elapses.
    ///
    /// Rendering never needs this; it is for one-shot embedders (such as a
    /// headless render) that want the decoded pixels in their single frame.
    pub fn wait_ready(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while !self.is_ready() {
            if self.has_failed() || Instant::now() >= deadline {
                return false;
            }
            thread::sleep(Duration::from_millis(1));
        }
        true
    }

    /// Returns the texel color for texture coordinates `(tu, tv)`.
    ///
    /// Coordinates outside [0, 1] repeat the texture. Returns opaque white
    /// while the texture is still loading.
    #[inline]
    pub fn map(&self, tu: f32, tv: f32) -> Color4 {
        match self.state() {
            TextureState::Loading => Color4::WHITE,
            TextureState::Ready(pixels) => {
                let width = self.width as f32;
                let height = self.height as f32;
                let u = ((tu * width) % width).abs() as u32;
                let v = ((tv * height) % height).abs() as u32;

                pixels
                    .get_pixel_checked(u, v)
                    .map(|p| Color4::from_rgba8(p.0))
                    .unwrap_or(Color4::WHITE)
            }
        }
    }
}

impl std::fmt::Debug for Texture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Texture")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("ready", &self.is_ready())
            .field("failed", &self.has_failed())
            .finish()
    }
}

/// Draws the decoded image at the top-left of a transparent `width` x `height`
/// grid, cropping anything that does not fit.
fn fit_to_grid(decoded: DynamicImage, width: u32, height: u32) -> RgbaImage {
    let decoded = decoded.to_rgba8();
    if decoded.dimensions() == (width, height) {
        return decoded;
    }
    let mut grid = RgbaImage::new(width, height);
    imageops::replace(&mut grid, &decoded, 0, 0);
    grid
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba};
    use std::io::Cursor;

    /// A 4x1 strip with a distinct color per column.
    fn strip() -> RgbaImage {
        let mut image = RgbaImage::new(4, 1);
        for x in 0..4 {
            image.put_pixel(x, 0, Rgba([x as u8 * 60, 0, 0, 255]));
        }
        image
    }

    fn encode_png(image: &RgbaImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn loading_texture_maps_to_white() {
        // Garbage bytes never decode, so the texture stays loading.
        let texture = Texture::from_memory(vec![0, 1, 2, 3], 4, 4);
        assert!(!texture.wait_ready(Duration::from_millis(50)));
        for (u, v) in [(0.0, 0.0), (0.5, 0.5), (-3.0, 7.25)] {
            assert_eq!(texture.map(u, v), Color4::WHITE);
        }
    }

    #[test]
    fn failed_decode_ends_the_wait_early() {
        let texture = Texture::from_memory(b"not an image".to_vec(), 4, 4);
        let started = Instant::now();
        assert!(!texture.wait_ready(Duration::from_secs(30)));
        assert!(started.elapsed() < Duration::from_secs(10));
        assert!(texture.has_failed());
        assert!(!texture.is_ready());
        assert_eq!(texture.map(0.5, 0.5), Color4::WHITE);
    }

    #[test]
    fn coordinates_wrap_past_one() {
        let texture = Texture::from_image(strip());
        assert_eq!(texture.map(1.25, 0.0), texture.map(0.25, 0.0));
        assert_eq!(texture.map(0.25, 0.0).to_rgba8(), [60, 0, 0, 255]);
    }

    #[test]
    fn negative_coordinates_wrap_through_absolute_value() {
        let texture = Texture::from_image(strip());
        assert_eq!(texture.map(-0.25, 0.0), texture.map(0.25, 0.0));
    }

    #[test]
    fn decoded_payload_becomes_ready() {
        let texture = Texture::from_memory(encode_png(&strip()), 4, 1);
        assert!(texture.wait_ready(Duration::from_secs(5)));
        assert_eq!(texture.map(0.75, 0.0).to_rgba8(), [180, 0, 0, 255]);
    }

    #[test]
    fn smaller_image_is_padded_with_transparent_pixels() {
        let texture = Texture::from_memory(encode_png(&strip()), 8, 2);
        assert!(texture.wait_ready(Duration::from_secs(5)));
        assert_eq!(texture.map(0.125, 0.0).to_rgba8(), [60, 0, 0, 255]);
        assert_eq!(texture.map(0.0, 0.5).to_rgba8(), [0, 0, 0, 0]);
    }
}
