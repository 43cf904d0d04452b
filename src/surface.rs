//! Destinations for a finished color buffer.
//!
//! A [`Surface`] receives the RGBA8 bytes of a frame once it has been
//! rendered. The SDL window implements it for interactive display;
//! [`ImageSurface`] keeps the frame in memory and writes it out as a PNG.

use std::path::Path;

use image::RgbaImage;
use thiserror::Error;

/// Host surface the device presents its color buffer to.
pub trait Surface {
    type Error;

    /// Receives `width * height` RGBA8 pixels, row-major, top row first.
    fn present_color_buffer(
        &mut self,
        buffer: &[u8],
        width: u32,
        height: u32,
    ) -> Result<(), Self::Error>;
}

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("color buffer holds {len} bytes, expected {expected} for {width}x{height}")]
    BufferSize {
        len: usize,
        expected: usize,
        width: u32,
        height: u32,
    },

    #[error("nothing has been presented yet")]
    Empty,

    #[error(transparent)]
    Image(#[from] image::ImageError),
}

/// In-memory surface holding the last presented frame.
#[derive(Debug, Default)]
pub struct ImageSurface {
    frame: Option<RgbaImage>,
}

impl ImageSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frame(&self) -> Option<&RgbaImage> {
        self.frame.as_ref()
    }

    pub fn into_frame(self) -> Option<RgbaImage> {
        self.frame
    }

    /// Writes the last presented frame. The format follows the file extension.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), SurfaceError> {
        let frame = self.frame.as_ref().ok_or(SurfaceError::Empty)?;
        frame.save(path.as_ref())?;
        log::debug!(
            "saved {}x{} frame to {}",
            frame.width(),
            frame.height(),
            path.as_ref().display()
        );
        Ok(())
    }
}

impl Surface for ImageSurface {
    type Error = SurfaceError;

    fn present_color_buffer(
        &mut self,
        buffer: &[u8],
        width: u32,
        height: u32,
    ) -> Result<(), Self::Error> {
        let expected = width as usize * height as usize * 4;
        let frame = RgbaImage::from_raw(width, height, buffer.to_vec())
            .filter(|_| buffer.len() == expected)
            .ok_or(SurfaceError::BufferSize {
                len: buffer.len(),
                expected,
                width,
                height,
            })?;
        self.frame = Some(frame);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presented_bytes_become_the_frame() {
        let mut surface = ImageSurface::new();
        let buffer = [255, 0, 0, 255, 0, 0, 255, 128];
        surface.present_color_buffer(&buffer, 2, 1).unwrap();

        let frame = surface.frame().unwrap();
        assert_eq!(frame.dimensions(), (2, 1));
        assert_eq!(frame.get_pixel(1, 0).0, [0, 0, 255, 128]);
    }

    #[test]
    fn wrong_buffer_size_is_rejected() {
        let mut surface = ImageSurface::new();
        let err = surface.present_color_buffer(&[0; 12], 2, 2).unwrap_err();
        assert!(matches!(err, SurfaceError::BufferSize { len: 12, expected: 16, .. }));
        assert!(surface.frame().is_none());
    }

    #[test]
    fn saving_before_presenting_fails() {
        let surface = ImageSurface::new();
        assert!(matches!(surface.save("unused.png"), Err(SurfaceError::Empty)));
    }
}
