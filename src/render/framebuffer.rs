//! Frame buffer abstraction for 2D pixel access.
//!
//! Provides a view into the color and depth buffers with bounds-checked,
//! depth-tested pixel writes.

use crate::colors::Color4;

/// Bytes per color buffer cell (RGBA8).
pub const BYTES_PER_PIXEL: usize = 4;

/// Depth written by `clear`; larger than any projected depth.
pub const DEPTH_CLEAR: f32 = f32::MAX;

/// A view into color and depth buffers.
///
/// Wraps 1D slices with width/height metadata to enable safe 2D pixel access.
/// This is a borrowed view, not an owning type - it's meant to be created
/// temporarily when you need to pass buffers + dimensions together.
///
/// # Depth Buffer
///
/// The depth buffer stores the projected z of the nearest fragment so far.
/// Smaller values are closer to the camera.
pub struct FrameBuffer<'a> {
    color_buffer: &'a mut [u8],
    depth_buffer: &'a mut [f32],
    width: u32,
    height: u32,
}

impl<'a> FrameBuffer<'a> {
    /// Create a new FrameBuffer view from buffer slices and dimensions.
    ///
    /// # Panics
    /// Panics in debug builds if buffer lengths don't match width * height
    pub fn new(
        color_buffer: &'a mut [u8],
        depth_buffer: &'a mut [f32],
        width: u32,
        height: u32,
    ) -> Self {
        debug_assert_eq!(
            color_buffer.len(),
            width as usize * height as usize * BYTES_PER_PIXEL,
            "Color buffer size doesn't match dimensions"
        );
        debug_assert_eq!(
            depth_buffer.len(),
            width as usize * height as usize,
            "Depth buffer size doesn't match dimensions"
        );
        Self {
            color_buffer,
            depth_buffer,
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Writes a fragment if it lies on screen. There is no clip on `z`.
    #[inline]
    pub fn draw_point(&mut self, x: i32, y: i32, z: f32, color: Color4) {
        if x >= 0 && y >= 0 && x < self.width as i32 && y < self.height as i32 {
            self.put_pixel(x as u32, y as u32, z, color);
        }
    }

    /// Depth-tested write of an on-screen pixel.
    ///
    /// The fragment is discarded only when the stored depth is strictly
    /// smaller; a fragment at exactly the stored depth overwrites it.
    #[inline]
    pub fn put_pixel(&mut self, x: u32, y: u32, z: f32, color: Color4) {
        let index = y as usize * self.width as usize + x as usize;
        if self.depth_buffer[index] < z {
            return;
        }
        self.depth_buffer[index] = z;

        let offset = index * BYTES_PER_PIXEL;
        self.color_buffer[offset..offset + BYTES_PER_PIXEL].copy_from_slice(&color.to_rgba8());
    }

    /// Get the RGBA bytes at (x, y), or None if out of bounds.
    #[inline]
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<[u8; 4]> {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            let offset = (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL;
            let mut rgba = [0; 4];
            rgba.copy_from_slice(&self.color_buffer[offset..offset + BYTES_PER_PIXEL]);
            Some(rgba)
        } else {
            None
        }
    }

    /// Get the stored depth at (x, y), or None if out of bounds.
    #[inline]
    pub fn get_depth(&self, x: i32, y: i32) -> Option<f32> {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            Some(self.depth_buffer[y as usize * self.width as usize + x as usize])
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffers(width: u32, height: u32) -> (Vec<u8>, Vec<f32>) {
        let size = (width * height) as usize;
        (vec![0; size * BYTES_PER_PIXEL], vec![DEPTH_CLEAR; size])
    }

    #[test]
    fn nearer_fragment_wins() {
        let (mut color, mut depth) = buffers(2, 2);
        let mut fb = FrameBuffer::new(&mut color, &mut depth, 2, 2);

        fb.draw_point(1, 1, 0.5, Color4::WHITE);
        fb.draw_point(1, 1, 0.8, Color4::BLACK);
        assert_eq!(fb.get_pixel(1, 1), Some([255, 255, 255, 255]));

        fb.draw_point(1, 1, 0.2, Color4::BLACK);
        assert_eq!(fb.get_pixel(1, 1), Some([0, 0, 0, 255]));
        assert_eq!(fb.get_depth(1, 1), Some(0.2));
    }

    #[test]
    fn equal_depth_overwrites() {
        let (mut color, mut depth) = buffers(1, 1);
        let mut fb = FrameBuffer::new(&mut color, &mut depth, 1, 1);

        fb.draw_point(0, 0, 0.5, Color4::WHITE);
        fb.draw_point(0, 0, 0.5, Color4::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(fb.get_pixel(0, 0), Some([255, 0, 0, 255]));
    }

    #[test]
    fn off_screen_points_are_clipped() {
        let (mut color, mut depth) = buffers(2, 2);
        let mut fb = FrameBuffer::new(&mut color, &mut depth, 2, 2);

        for (x, y) in [(-1, 0), (0, -1), (2, 0), (0, 2)] {
            fb.draw_point(x, y, 0.0, Color4::WHITE);
        }
        drop(fb);
        assert!(color.iter().all(|&c| c == 0));
        assert!(depth.iter().all(|&d| d == DEPTH_CLEAR));
    }
}
