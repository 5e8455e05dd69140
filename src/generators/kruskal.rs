use rand::{Rng, seq::SliceRandom};

use crate::{
    disjoint_sets::DisjointSets,
    error::Result,
    maze::{Coord, Direction, MazeGrid, get_neighbors},
};

/// Random draws allowed per `n * log2(n)` before switching to the edge sweep.
const DRAW_BUDGET_FACTOR: usize = 64;

/// Wall edge between a cell and its right or bottom neighbor
#[derive(Clone, Copy)]
struct Edge {
    from: Coord,
    direction: Direction,
}

/// Carves a perfect maze into a fully walled `maze`.
///
/// Repeatedly draws a random cell and a random in-bounds neighbor and knocks down the wall
/// between them if they are not connected yet, until every cell is in one set.
pub fn randomized_kruskal<R: Rng>(maze: &mut MazeGrid, rng: &mut R) -> Result<()> {
    let total_cells = maze.len();
    let mut sets = DisjointSets::new(total_cells);
    let mut remaining = sets.count();

    let max_draws = DRAW_BUDGET_FACTOR * total_cells * (total_cells.ilog2() as usize + 1);
    let mut draws = 0;

    while remaining > 1 && draws < max_draws {
        draws += 1;

        let idx = rng.random_range(0..total_cells);
        let from = (idx / maze.width(), idx % maze.width());

        let neighbors = get_neighbors(from, maze).collect::<Vec<_>>();
        if neighbors.is_empty() {
            continue;
        }
        let (direction, to) = neighbors[rng.random_range(0..neighbors.len())];
        let to_idx = maze.ravel_index(to.0, to.1)?;

        // Already connected, discard the draw
        if sets.find(idx)? == sets.find(to_idx)? {
            continue;
        }
        maze.set_wall_toward(from, direction, false)?;
        sets.union(idx, to_idx)?;
        remaining -= 1;
    }

    if remaining > 1 {
        tracing::warn!(
            "Random draws exhausted after {} draws with {} sets left, sweeping remaining edges",
            draws,
            remaining
        );
        remaining = sweep_edges(maze, &mut sets, rng)?;
    }

    debug_assert_eq!(remaining, sets.count());
    tracing::debug!(
        "Generated {}x{} maze in {} draws",
        maze.width(),
        maze.height(),
        draws
    );
    Ok(())
}

/// Classic Kruskal over a shuffled edge list. Returns the number of sets left, which is 1.
fn sweep_edges<R: Rng>(maze: &mut MazeGrid, sets: &mut DisjointSets, rng: &mut R) -> Result<usize> {
    let (width, height) = (maze.width(), maze.height());

    // Collect all possible edges (walls between adjacent cells)
    let mut edges: Vec<Edge> = (0..height)
        .flat_map(|row| (0..width).map(move |col| (row, col)))
        .flat_map(|from| {
            [
                (from.1 + 1 < width).then_some(Edge {
                    from,
                    direction: Direction::Right,
                }),
                (from.0 + 1 < height).then_some(Edge {
                    from,
                    direction: Direction::Down,
                }),
            ]
        })
        .flatten()
        .collect();

    edges.shuffle(rng);

    for edge in edges {
        let (row, col) = edge.from;
        let idx1 = row * width + col;
        let idx2 = match edge.direction {
            Direction::Right => idx1 + 1,
            _ => idx1 + width,
        };

        // If cells are not yet connected, remove the wall between them
        if sets.union(idx1, idx2)?.is_some() {
            maze.set_wall_toward(edge.from, edge.direction, false)?;
        }
    }
    Ok(sets.count())
}
