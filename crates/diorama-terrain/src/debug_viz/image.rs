//! A flat RGBA pixel buffer for preview renders.

/// Row-major RGBA image. Row 0 is the world's minimum z.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DebugImage {
    pub width: u32,
    pub height: u32,
    /// `width * height * 4` bytes.
    pub pixels: Vec<u8>,
}

impl DebugImage {
    /// Fully transparent image.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
        }
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let idx = self.offset(x, y);
        self.pixels[idx..idx + 4].copy_from_slice(&rgba);
    }

    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    pub fn get_pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = self.offset(x, y);
        [
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Distinct RGB colors among opaque pixels.
    pub fn unique_color_count(&self) -> usize {
        self.pixels
            .chunks_exact(4)
            .filter(|px| px[3] > 0)
            .map(|px| (px[0], px[1], px[2]))
            .collect::<std::collections::HashSet<_>>()
            .len()
    }

    /// Hand the buffer to an encoder.
    pub fn into_raw(self) -> Vec<u8> {
        self.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_image_is_transparent() {
        let image = DebugImage::new(16, 8);
        assert_eq!(image.dimensions(), (16, 8));
        assert_eq!(image.pixels.len(), 16 * 8 * 4);
        assert_eq!(image.unique_color_count(), 0);
    }

    #[test]
    fn test_set_and_get_pixel() {
        let mut image = DebugImage::new(10, 10);
        image.set_pixel(3, 5, [255, 128, 64, 255]);
        assert_eq!(image.get_pixel(3, 5), [255, 128, 64, 255]);
        assert_eq!(image.pixels[(5 * 10 + 3) * 4 + 1], 128);
    }

    #[test]
    fn test_unique_colors_ignore_transparent() {
        let mut image = DebugImage::new(4, 1);
        image.set_pixel(0, 0, [255, 0, 0, 255]);
        image.set_pixel(1, 0, [0, 255, 0, 255]);
        image.set_pixel(2, 0, [255, 0, 0, 255]);
        assert_eq!(image.unique_color_count(), 2);
    }
}
