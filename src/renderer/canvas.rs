//! Character-cell framebuffer for the terminal game

use glam::IVec2;

use crate::line_cells;

/// A grid of characters, row-major; off-grid writes are clipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: i32,
    height: i32,
    cells: Vec<char>,
}

impl Canvas {
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            cells: vec![' '; (width * height) as usize],
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn clear(&mut self) {
        self.cells.fill(' ');
    }

    pub fn put(&mut self, cell: IVec2, ch: char) {
        if cell.x >= 0 && cell.y >= 0 && cell.x < self.width && cell.y < self.height {
            self.cells[(cell.y * self.width + cell.x) as usize] = ch;
        }
    }

    pub fn get(&self, cell: IVec2) -> Option<char> {
        if cell.x >= 0 && cell.y >= 0 && cell.x < self.width && cell.y < self.height {
            Some(self.cells[(cell.y * self.width + cell.x) as usize])
        } else {
            None
        }
    }

    /// Write a string starting at `origin`, left to right
    pub fn text(&mut self, origin: IVec2, text: &str) {
        for (i, ch) in text.chars().enumerate() {
            self.put(origin + IVec2::new(i as i32, 0), ch);
        }
    }

    /// Draw a straight line of `ch`
    pub fn line(&mut self, from: IVec2, to: IVec2, ch: char) {
        for cell in line_cells(from, to) {
            self.put(cell, ch);
        }
    }

    /// Rows as strings, top to bottom
    pub fn lines(&self) -> Vec<String> {
        self.cells
            .chunks(self.width as usize)
            .map(|row| row.iter().collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_and_clipping() {
        let mut canvas = Canvas::new(6, 2);
        canvas.text(IVec2::new(3, 0), "abcdef");
        canvas.put(IVec2::new(-1, 1), 'x');
        canvas.put(IVec2::new(0, 5), 'x');

        assert_eq!(canvas.lines(), vec!["   abc".to_string(), "      ".to_string()]);
    }

    #[test]
    fn test_line_draws_every_cell() {
        let mut canvas = Canvas::new(5, 3);
        canvas.line(IVec2::new(0, 1), IVec2::new(4, 1), '~');
        assert_eq!(canvas.lines()[1], "~~~~~");
        assert_eq!(canvas.get(IVec2::new(2, 0)), Some(' '));
    }
}
