//! Wall occupancy grid for the current level
//!
//! Walls are rasterised once per level; collision and placement queries read
//! this grid instead of the rendered screen.

use glam::IVec2;

use super::level::{Level, WallSegment};
use crate::line_cells;

#[derive(Debug, Clone)]
pub struct Playfield {
    pub width: i32,
    pub height: i32,
    /// First row below the status area
    pub top: i32,
    walls: Vec<bool>,
}

impl Playfield {
    /// An empty playfield
    pub fn new(width: i32, height: i32, top: i32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            top,
            walls: vec![false; (width * height) as usize],
        }
    }

    /// Playfield with every wall of a level rasterised
    pub fn from_level(level: &Level, width: i32, height: i32, top: i32) -> Self {
        let mut field = Self::new(width, height, top);
        for wall in &level.walls {
            field.add_wall(wall);
        }
        field
    }

    pub fn add_wall(&mut self, wall: &WallSegment) {
        for cell in line_cells(wall.from, wall.to) {
            if let Some(i) = self.index(cell) {
                self.walls[i] = true;
            }
        }
    }

    /// True when a wall occupies the cell (outside the grid is never a wall)
    #[inline]
    pub fn is_wall(&self, cell: IVec2) -> bool {
        self.index(cell).is_some_and(|i| self.walls[i])
    }

    /// True when the cell lies in the playable area below the status rows
    #[inline]
    pub fn in_bounds(&self, cell: IVec2) -> bool {
        cell.x >= 0 && cell.x < self.width && cell.y >= self.top && cell.y < self.height
    }

    /// Any wall within the rectangle `[origin, origin + size)`
    pub fn any_wall(&self, origin: IVec2, size: IVec2) -> bool {
        (origin.y..origin.y + size.y)
            .any(|y| (origin.x..origin.x + size.x).any(|x| self.is_wall(IVec2::new(x, y))))
    }

    /// Cells holding a wall, row-major
    pub fn wall_cells(&self) -> impl Iterator<Item = IVec2> + '_ {
        self.walls
            .iter()
            .enumerate()
            .filter(|(_, wall)| **wall)
            .map(|(i, _)| IVec2::new(i as i32 % self.width, i as i32 / self.width))
    }

    fn index(&self, cell: IVec2) -> Option<usize> {
        if cell.x < 0 || cell.y < 0 || cell.x >= self.width || cell.y >= self.height {
            return None;
        }
        Some((cell.y * self.width + cell.x) as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wall_rasterised() {
        let mut field = Playfield::new(20, 10, 2);
        field.add_wall(&WallSegment {
            from: IVec2::new(2, 5),
            to: IVec2::new(8, 5),
        });

        assert!(field.is_wall(IVec2::new(2, 5)));
        assert!(field.is_wall(IVec2::new(8, 5)));
        assert!(!field.is_wall(IVec2::new(9, 5)));
        assert_eq!(field.wall_cells().count(), 7);
        assert!(field.any_wall(IVec2::new(0, 4), IVec2::new(3, 2)));
        assert!(!field.any_wall(IVec2::new(0, 0), IVec2::new(20, 4)));
    }

    #[test]
    fn test_off_grid_walls_clipped() {
        let mut field = Playfield::new(10, 10, 0);
        field.add_wall(&WallSegment {
            from: IVec2::new(-5, 3),
            to: IVec2::new(15, 3),
        });
        assert_eq!(field.wall_cells().count(), 10);
        assert!(!field.is_wall(IVec2::new(-1, 3)));
    }

    #[test]
    fn test_bounds_exclude_status_rows() {
        let field = Playfield::new(10, 10, 4);
        assert!(!field.in_bounds(IVec2::new(0, 3)));
        assert!(field.in_bounds(IVec2::new(0, 4)));
        assert!(!field.in_bounds(IVec2::new(10, 5)));
        assert!(!field.in_bounds(IVec2::new(3, 10)));
    }
}
