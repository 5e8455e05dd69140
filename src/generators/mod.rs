use rand::{SeedableRng, rngs::StdRng};

mod kruskal;

use kruskal::randomized_kruskal;

use crate::{error::Result, maze::MazeGrid};

/// Get a random number generator, optionally seeded for reproducibility.
fn get_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    }
}

/// Generates a random perfect maze with `rows` rows and `cols` columns.
pub fn generate(rows: usize, cols: usize) -> Result<MazeGrid> {
    generate_with_seed(rows, cols, None)
}

/// Like [`generate`], but reproducible when `seed` is given.
pub fn generate_with_seed(rows: usize, cols: usize, seed: Option<u64>) -> Result<MazeGrid> {
    let mut maze = MazeGrid::new(cols, rows, format!("rand({}x{})", rows, cols))?;
    let mut rng = get_rng(seed);
    randomized_kruskal(&mut maze, &mut rng)?;
    Ok(maze)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_generate_dimensions_and_title() {
        let maze = generate(3, 5).unwrap();
        assert_eq!(maze.height(), 3);
        assert_eq!(maze.width(), 5);
        assert_eq!(maze.title(), "rand(3x5)");
    }

    #[test]
    fn test_generate_rejects_empty() {
        assert!(matches!(generate(0, 4), Err(Error::InvalidArgument(_))));
        assert!(matches!(generate(4, 0), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_seed_is_reproducible() {
        let a = generate_with_seed(12, 9, Some(7)).unwrap();
        let b = generate_with_seed(12, 9, Some(7)).unwrap();
        assert_eq!(a, b);
    }
}
