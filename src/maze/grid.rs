use crate::error::{Error, Result};

use super::{Coord, Direction};

/// Wall state stored for a single cell. Left and top walls belong to the neighbors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Walls {
    pub right: bool,
    pub bottom: bool,
}

impl Walls {
    pub const CLOSED: Walls = Walls {
        right: true,
        bottom: true,
    };
}

impl Default for Walls {
    fn default() -> Self {
        Walls::CLOSED
    }
}

/// A `width` x `height` maze where each cell records its right and bottom walls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MazeGrid {
    walls: Box<[Walls]>,
    width: usize,
    height: usize,
    title: String,
}

impl MazeGrid {
    /// Creates a maze with every wall present.
    pub fn new(width: usize, height: usize, title: impl Into<String>) -> Result<Self> {
        if width < 1 || height < 1 {
            return Err(Error::InvalidArgument(format!(
                "maze dimensions must be at least 1x1, got {}x{}",
                width, height
            )));
        }
        let len = width.checked_mul(height).ok_or_else(|| {
            Error::InvalidArgument(format!("maze dimensions {}x{} are too large", width, height))
        })?;
        let mut walls = Vec::new();
        walls.try_reserve_exact(len).map_err(|e| {
            Error::InvalidArgument(format!("cannot allocate a {}x{} maze: {}", width, height, e))
        })?;
        walls.resize(len, Walls::CLOSED);
        Ok(MazeGrid {
            walls: walls.into_boxed_slice(),
            width,
            height,
            title: title.into(),
        })
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.walls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.walls.is_empty()
    }

    pub fn is_in_bounds(&self, coord: Coord) -> bool {
        coord.0 < self.height && coord.1 < self.width
    }

    /// Row-major index of a cell.
    pub fn ravel_index(&self, row: usize, col: usize) -> Result<usize> {
        if !self.is_in_bounds((row, col)) {
            return Err(Error::CellOutOfRange {
                row,
                col,
                width: self.width,
                height: self.height,
            });
        }
        Ok(row * self.width + col)
    }

    /// Both walls of a cell.
    pub fn walls(&self, row: usize, col: usize) -> Result<Walls> {
        Ok(self.walls[self.ravel_index(row, col)?])
    }

    pub fn right_wall(&self, row: usize, col: usize) -> Result<bool> {
        Ok(self.walls(row, col)?.right)
    }

    pub fn bottom_wall(&self, row: usize, col: usize) -> Result<bool> {
        Ok(self.walls(row, col)?.bottom)
    }

    pub fn set_right_wall(&mut self, row: usize, col: usize, present: bool) -> Result<()> {
        let idx = self.ravel_index(row, col)?;
        self.walls[idx].right = present;
        Ok(())
    }

    pub fn set_bottom_wall(&mut self, row: usize, col: usize, present: bool) -> Result<()> {
        let idx = self.ravel_index(row, col)?;
        self.walls[idx].bottom = present;
        Ok(())
    }

    /// Sets the wall separating `from` and its neighbor in `direction`.
    ///
    /// The outer boundary is not addressable this way.
    pub fn set_wall_toward(&mut self, from: Coord, direction: Direction, present: bool) -> Result<()> {
        let to = self.neighbor(from, direction)?;
        match direction {
            Direction::Right => self.set_right_wall(from.0, from.1, present),
            Direction::Down => self.set_bottom_wall(from.0, from.1, present),
            Direction::Left => self.set_right_wall(to.0, to.1, present),
            Direction::Up => self.set_bottom_wall(to.0, to.1, present),
        }
    }

    /// Whether one can walk from `from` to its neighbor in `direction`.
    ///
    /// Moves that would leave the grid are never open.
    pub fn is_open(&self, from: Coord, direction: Direction) -> Result<bool> {
        self.ravel_index(from.0, from.1)?;
        let Some(to) = direction.step(from, self.width, self.height) else {
            return Ok(false);
        };
        let wall = match direction {
            Direction::Right => self.right_wall(from.0, from.1)?,
            Direction::Down => self.bottom_wall(from.0, from.1)?,
            Direction::Left => self.right_wall(to.0, to.1)?,
            Direction::Up => self.bottom_wall(to.0, to.1)?,
        };
        Ok(!wall)
    }

    /// Number of open passages between adjacent cells. Boundary walls are not counted.
    pub fn open_passages(&self) -> usize {
        (0..self.height)
            .flat_map(|row| (0..self.width).map(move |col| (row, col)))
            .map(|(row, col)| {
                let walls = self.walls[row * self.width + col];
                let right = col + 1 < self.width && !walls.right;
                let down = row + 1 < self.height && !walls.bottom;
                right as usize + down as usize
            })
            .sum()
    }

    fn neighbor(&self, from: Coord, direction: Direction) -> Result<Coord> {
        self.ravel_index(from.0, from.1)?;
        direction
            .step(from, self.width, self.height)
            .ok_or_else(|| {
                Error::InvalidArgument(format!(
                    "cell [{},{}] has no neighbor {:?}",
                    from.0, from.1, direction
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_fully_walled() {
        let maze = MazeGrid::new(4, 3, "walled").unwrap();
        assert_eq!(maze.width(), 4);
        assert_eq!(maze.height(), 3);
        assert_eq!(maze.title(), "walled");
        assert_eq!(maze.len(), 12);
        assert_eq!(maze.open_passages(), 0);
        assert!(maze.right_wall(2, 3).unwrap());
        assert!(maze.bottom_wall(0, 0).unwrap());
    }

    #[test]
    fn test_invalid_dimensions() {
        assert!(matches!(
            MazeGrid::new(0, 3, "x"),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            MazeGrid::new(3, 0, "x"),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            MazeGrid::new(usize::MAX, 2, "x"),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_unallocatable_dimensions() {
        // 2^62 cells fit in usize but not in any allocation
        assert!(matches!(
            MazeGrid::new(1 << 31, 1 << 31, "x"),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_setters_are_idempotent() {
        let mut maze = MazeGrid::new(2, 2, "x").unwrap();
        maze.set_right_wall(0, 0, false).unwrap();
        maze.set_right_wall(0, 0, false).unwrap();
        assert!(!maze.right_wall(0, 0).unwrap());
        assert!(maze.bottom_wall(0, 0).unwrap());

        maze.set_bottom_wall(1, 1, true).unwrap();
        assert_eq!(maze.walls(1, 1).unwrap(), Walls::CLOSED);
        assert_eq!(maze.open_passages(), 1);
    }

    #[test]
    fn test_out_of_range() {
        let mut maze = MazeGrid::new(3, 2, "x").unwrap();
        assert!(matches!(
            maze.right_wall(2, 0),
            Err(Error::CellOutOfRange { row: 2, col: 0, .. })
        ));
        assert!(matches!(
            maze.set_bottom_wall(0, 3, false),
            Err(Error::CellOutOfRange { row: 0, col: 3, .. })
        ));
        assert!(maze.is_in_bounds((1, 2)));
        assert!(!maze.is_in_bounds((2, 2)));
    }

    #[test]
    fn test_is_open_and_set_wall_toward() {
        let mut maze = MazeGrid::new(3, 3, "x").unwrap();
        maze.set_wall_toward((1, 1), Direction::Left, false).unwrap();
        maze.set_wall_toward((1, 1), Direction::Up, false).unwrap();

        assert!(!maze.right_wall(1, 0).unwrap());
        assert!(!maze.bottom_wall(0, 1).unwrap());
        assert!(maze.is_open((1, 1), Direction::Left).unwrap());
        assert!(maze.is_open((1, 0), Direction::Right).unwrap());
        assert!(maze.is_open((0, 1), Direction::Down).unwrap());
        assert!(!maze.is_open((1, 1), Direction::Right).unwrap());

        // The boundary is never open, whatever is stored
        maze.set_right_wall(0, 2, false).unwrap();
        assert!(!maze.is_open((0, 2), Direction::Right).unwrap());
        assert!(maze.set_wall_toward((0, 2), Direction::Up, false).is_err());
    }
}
