//! Conway's Game of Life on a wrapping grid.

use crate::point::Point;

/// Glider heading down and to the right.
pub const GLIDER: [Point; 5] = [
    Point { x: 1, y: 0 },
    Point { x: 2, y: 1 },
    Point { x: 0, y: 2 },
    Point { x: 1, y: 2 },
    Point { x: 2, y: 2 },
];

/// Life grid whose edges wrap around.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Life {
    cells: Vec<bool>,
    width: usize,
    height: usize,
}

/// Wraps a coordinate offset into `0..limit`.
fn wrap(n: usize, delta: isize, limit: usize) -> usize {
    (n as isize + delta).rem_euclid(limit as isize) as usize
}

impl Life {
    /// Creates an empty grid.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            cells: vec![false; width * height],
            width,
            height,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Sets a cell. Coordinates wrap around the grid.
    pub fn set(&mut self, x: usize, y: usize, alive: bool) {
        let idx = (y % self.height) * self.width + (x % self.width);
        self.cells[idx] = alive;
    }

    /// Gets a cell. Coordinates wrap around the grid.
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.cells[(y % self.height) * self.width + (x % self.width)]
    }

    /// Number of live cells.
    pub fn population(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    fn neighbours(&self, x: usize, y: usize) -> usize {
        let mut count = 0;
        for dx in -1..=1 {
            for dy in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                if self.get(wrap(x, dx, self.width), wrap(y, dy, self.height)) {
                    count += 1;
                }
            }
        }
        count
    }

    /// Advances one generation.
    pub fn step(&mut self) {
        let mut next = vec![false; self.cells.len()];
        for y in 0..self.height {
            for x in 0..self.width {
                let alive = self.get(x, y);
                next[y * self.width + x] = matches!(
                    (alive, self.neighbours(x, y)),
                    (true, 2) | (_, 3)
                );
            }
        }
        self.cells = next;
    }

    /// Iterates over all cells as `(x, y, alive)`.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, bool)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, &alive)| (i % self.width, i / self.width, alive))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(points: &[Point]) -> Life {
        let mut life = Life::new(20, 14);
        for p in points {
            life.set(p.x, p.y, true);
        }
        life
    }

    #[test]
    fn test_blinker_oscillates() {
        let mut life = seeded(&[
            Point { x: 5, y: 4 },
            Point { x: 5, y: 5 },
            Point { x: 5, y: 6 },
        ]);
        let start = life.clone();

        life.step();
        assert!(life.get(4, 5) && life.get(5, 5) && life.get(6, 5));
        assert!(!life.get(5, 4) && !life.get(5, 6));
        assert_eq!(life.population(), 3);

        life.step();
        assert_eq!(life, start);
    }

    #[test]
    fn test_block_is_still() {
        let mut life = seeded(&[
            Point { x: 0, y: 0 },
            Point { x: 1, y: 0 },
            Point { x: 0, y: 1 },
            Point { x: 1, y: 1 },
        ]);
        let start = life.clone();
        life.step();
        assert_eq!(life, start);
    }

    #[test]
    fn test_lonely_cell_dies() {
        let mut life = seeded(&[Point { x: 10, y: 10 }]);
        life.step();
        assert_eq!(life.population(), 0);
    }

    #[test]
    fn test_wraps_around_edges() {
        // Vertical blinker across the top/bottom edge.
        let mut life = seeded(&[
            Point { x: 0, y: 13 },
            Point { x: 0, y: 0 },
            Point { x: 0, y: 1 },
        ]);
        life.step();
        assert!(life.get(19, 0) && life.get(0, 0) && life.get(1, 0));
        assert_eq!(life.population(), 3);
    }

    #[test]
    fn test_glider_returns_after_full_lap() {
        let mut life = seeded(&GLIDER);
        let start = life.clone();
        // A glider moves one cell diagonally every 4 generations; on a
        // 20x14 torus it is back where it started after lcm(20, 14) cells.
        for _ in 0..4 * 140 {
            life.step();
        }
        assert_eq!(life, start);
        assert_eq!(life.population(), 5);
    }

    #[test]
    fn test_cells_iteration() {
        let life = seeded(&[Point { x: 3, y: 2 }]);
        let alive: Vec<_> = life.cells().filter(|c| c.2).collect();
        assert_eq!(alive, vec![(3, 2, true)]);
        assert_eq!(life.cells().count(), 280);
    }
}
