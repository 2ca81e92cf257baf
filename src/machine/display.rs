use crate::machine::config::{PIXEL_OFF, PIXEL_ON, SCREEN_HEIGHT, SCREEN_WIDTH};

pub const PIXEL_COUNT: usize = SCREEN_WIDTH * SCREEN_HEIGHT;

/// 64x32 monochrome framebuffer, row-major, one byte (0 or 1) per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayBuffer {
    pixels: [u8; PIXEL_COUNT],
}

impl Default for DisplayBuffer {
    fn default() -> Self {
        Self {
            pixels: [0; PIXEL_COUNT],
        }
    }
}

impl DisplayBuffer {
    pub fn clear(&mut self) {
        self.pixels = [0; PIXEL_COUNT];
    }

    /// Pixel state at (x, y); coordinates wrap around the screen edges.
    pub fn is_lit(&self, x: usize, y: usize) -> bool {
        self.pixels[Self::location(x, y)] == 1
    }

    /// Flips the pixel at (x, y), wrapping. Returns true if a lit pixel was erased.
    pub fn toggle(&mut self, x: usize, y: usize) -> bool {
        let location = Self::location(x, y);
        let erased = self.pixels[location] == 1;
        self.pixels[location] ^= 1;
        erased
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn lit_count(&self) -> usize {
        self.pixels.iter().filter(|pixel| **pixel == 1).count()
    }

    /// Snapshot for the rendering side: one 32-bit colour per pixel.
    pub fn to_rgba(&self) -> Vec<u32> {
        self.pixels
            .iter()
            .map(|pixel| if *pixel == 1 { PIXEL_ON } else { PIXEL_OFF })
            .collect()
    }

    fn location(x: usize, y: usize) -> usize {
        (x % SCREEN_WIDTH) + (y % SCREEN_HEIGHT) * SCREEN_WIDTH
    }
}
