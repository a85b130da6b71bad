//! Monochrome pixel framebuffer emulating the 84x48 LCD
//!
//! Sprites are 8x8 bitmaps, one byte per row, most significant bit leftmost.
//! The terminal shows two pixel rows per character using half blocks.

use glam::IVec2;

use crate::line_cells;

pub type Bitmap = [u8; 8];

pub const TOM_BITMAP: Bitmap = [
    0b1111_1100,
    0b0010_0000,
    0b0010_0000,
    0b0010_0000,
    0b0010_0000,
    0,
    0,
    0,
];

pub const JERRY_BITMAP: Bitmap = [
    0b1111_1100,
    0b0001_0000,
    0b0001_0000,
    0b0010_0000,
    0b1100_0000,
    0,
    0,
    0,
];

pub const CHEESE_BITMAP: Bitmap = [
    0b0100_1000,
    0b1111_1100,
    0b0100_1000,
    0b1111_1100,
    0b0100_1000,
    0,
    0,
    0,
];

pub const TRAP_BITMAP: Bitmap = [0b0011_0000, 0b0011_0000, 0b1111_1100, 0, 0, 0, 0, 0];

pub const DOOR_BITMAP: Bitmap = [
    0b1111_1100,
    0b1000_0100,
    0b1000_0100,
    0b1111_1100,
    0,
    0,
    0,
    0,
];

pub const FIREWORK_BITMAP: Bitmap = [0b1000_0000, 0, 0, 0, 0, 0, 0, 0];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: i32,
    height: i32,
    pixels: Vec<bool>,
}

impl PixelBuffer {
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            pixels: vec![false; (width * height) as usize],
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn clear(&mut self) {
        self.pixels.fill(false);
    }

    pub fn set(&mut self, p: IVec2) {
        if let Some(i) = self.index(p) {
            self.pixels[i] = true;
        }
    }

    pub fn get(&self, p: IVec2) -> bool {
        self.index(p).is_some_and(|i| self.pixels[i])
    }

    pub fn line(&mut self, from: IVec2, to: IVec2) {
        for p in line_cells(from, to) {
            self.set(p);
        }
    }

    /// Draw the set bits of a bitmap with its top-left corner at `origin`
    pub fn blit(&mut self, origin: IVec2, bitmap: &Bitmap) {
        for (dy, row) in bitmap.iter().enumerate() {
            for dx in 0..8 {
                if row & (0x80 >> dx) != 0 {
                    self.set(origin + IVec2::new(dx, dy as i32));
                }
            }
        }
    }

    pub fn lit_count(&self) -> usize {
        self.pixels.iter().filter(|p| **p).count()
    }

    /// Half-block rendering, two pixel rows per text row
    pub fn lines(&self) -> Vec<String> {
        (0..self.height)
            .step_by(2)
            .map(|y| {
                (0..self.width)
                    .map(|x| {
                        let top = self.get(IVec2::new(x, y));
                        let bottom = self.get(IVec2::new(x, y + 1));
                        match (top, bottom) {
                            (true, true) => '█',
                            (true, false) => '▀',
                            (false, true) => '▄',
                            (false, false) => ' ',
                        }
                    })
                    .collect()
            })
            .collect()
    }

    fn index(&self, p: IVec2) -> Option<usize> {
        if p.x < 0 || p.y < 0 || p.x >= self.width || p.y >= self.height {
            return None;
        }
        Some((p.y * self.width + p.x) as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blit_door_outline() {
        let mut fb = PixelBuffer::new(10, 10);
        fb.blit(IVec2::new(2, 2), &DOOR_BITMAP);

        assert!(fb.get(IVec2::new(2, 2)));
        assert!(fb.get(IVec2::new(7, 2)));
        assert!(!fb.get(IVec2::new(8, 2)));
        assert!(!fb.get(IVec2::new(4, 3)));
        assert_eq!(fb.lit_count(), 6 + 2 + 2 + 6);
    }

    #[test]
    fn test_blit_clips_at_edges() {
        let mut fb = PixelBuffer::new(4, 4);
        fb.blit(IVec2::new(2, 3), &TOM_BITMAP);
        assert_eq!(fb.lit_count(), 2);
    }

    #[test]
    fn test_half_block_rows() {
        let mut fb = PixelBuffer::new(3, 2);
        fb.set(IVec2::new(0, 0));
        fb.set(IVec2::new(1, 1));
        fb.set(IVec2::new(2, 0));
        fb.set(IVec2::new(2, 1));
        assert_eq!(fb.lines(), vec!["▀▄█".to_string()]);
    }
}
