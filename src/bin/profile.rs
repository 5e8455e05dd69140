use std::time::Instant;

use mazeplay::{
    generators::generate,
    solvers::{SolverConfig, SolverFlags, StateTracker, solve_dfs},
};

/// Usage: profile [iterations] [rows] [cols]
fn main() -> std::io::Result<()> {
    let mut args = std::env::args();
    args.next(); // Skip executable name
    let num_iters = args.next().and_then(|s| s.parse::<usize>().ok()).unwrap_or(1);
    let rows = args.next().and_then(|s| s.parse::<usize>().ok()).unwrap_or(255);
    let cols = args.next().and_then(|s| s.parse::<usize>().ok()).unwrap_or(rows);

    let config = SolverConfig::default();
    let flags = SolverFlags::new();
    let mut generate_time = std::time::Duration::ZERO;
    let mut solve_time = std::time::Duration::ZERO;

    for _ in 0..num_iters {
        let start = Instant::now();
        let maze = generate(rows, cols).map_err(std::io::Error::other)?;
        generate_time += start.elapsed();

        let start = Instant::now();
        let mut tracker = StateTracker::new(maze.width(), maze.height());
        solve_dfs(&maze, &mut tracker, &flags, &config).map_err(std::io::Error::other)?;
        solve_time += start.elapsed();
    }

    println!(
        "{} x {}x{}: generate {:?}, solve {:?}",
        num_iters, rows, cols, generate_time, solve_time
    );
    Ok(())
}
