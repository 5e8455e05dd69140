pub mod cell;
pub mod codec;
pub mod grid;

pub use cell::TraversalState;
pub use grid::{MazeGrid, Walls};

/// A cell address as `(row, col)`.
pub type Coord = (usize, usize);

/// The four moves between adjacent cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Right,
    Down,
    Left,
    Up,
}

impl Direction {
    /// All directions, in the order the solver tries them.
    pub const ALL: [Direction; 4] = [
        Direction::Right,
        Direction::Down,
        Direction::Left,
        Direction::Up,
    ];

    /// Returns the neighbor of `from` in this direction, or `None` if it would leave a
    /// `width` x `height` grid.
    pub fn step(self, from: Coord, width: usize, height: usize) -> Option<Coord> {
        let (row, col) = from;
        match self {
            Direction::Right => (col + 1 < width).then(|| (row, col + 1)),
            Direction::Down => (row + 1 < height).then(|| (row + 1, col)),
            Direction::Left => col.checked_sub(1).map(|c| (row, c)),
            Direction::Up => row.checked_sub(1).map(|r| (r, col)),
        }
    }
}

/// Get in-bounds neighbors of a cell, walls ignored.
pub fn get_neighbors(coord: Coord, maze: &MazeGrid) -> impl Iterator<Item = (Direction, Coord)> {
    let (width, height) = (maze.width(), maze.height());
    let directions: &'static [Direction] = if maze.is_in_bounds(coord) {
        &Direction::ALL
    } else {
        &[]
    };
    directions.iter().filter_map(move |&direction| {
        direction
            .step(coord, width, height)
            .map(|neighbor| (direction, neighbor))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_stays_in_bounds() {
        assert_eq!(Direction::Right.step((0, 0), 3, 2), Some((0, 1)));
        assert_eq!(Direction::Right.step((0, 2), 3, 2), None);
        assert_eq!(Direction::Down.step((1, 0), 3, 2), None);
        assert_eq!(Direction::Left.step((1, 0), 3, 2), None);
        assert_eq!(Direction::Up.step((0, 1), 3, 2), None);
        assert_eq!(Direction::Up.step((1, 1), 3, 2), Some((0, 1)));
    }

    #[test]
    fn test_get_neighbors() {
        let maze = MazeGrid::new(3, 3, "test").unwrap();
        let center = get_neighbors((1, 1), &maze).map(|(_, c)| c).collect::<Vec<_>>();
        assert_eq!(center, vec![(1, 2), (2, 1), (1, 0), (0, 1)]);

        let corner = get_neighbors((2, 2), &maze).collect::<Vec<_>>();
        assert_eq!(corner, vec![(Direction::Left, (2, 1)), (Direction::Up, (1, 2))]);

        assert_eq!(get_neighbors((3, 0), &maze).count(), 0);
    }
}
