use std::{path::PathBuf, process::ExitCode, time::Duration};

use clap::{Parser, Subcommand};
use mazeplay::{
    MazeGrid,
    app::{App, TerminalSession},
    codec,
    generators::generate_with_seed,
    logging::init_tracing,
    solvers::{SolveOutcome, SolverConfig, SolverFlags, StateTracker, solve_dfs},
};

/// Generate, save, load and solve perfect mazes
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Solve without the terminal display and print the outcome
    #[arg(long, global = true)]
    headless: bool,

    /// Delay between solver steps in milliseconds [default: 100, or 0 when headless]
    #[arg(long, global = true)]
    delay_ms: Option<u64>,

    /// Start solving right away instead of waiting for Enter/Space
    #[arg(long, global = true)]
    start_running: bool,

    /// Directory for the log file
    #[arg(long, global = true, default_value = ".")]
    log_dir: PathBuf,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a random maze
    Random {
        /// Number of rows (maze height)
        rows: usize,
        /// Number of columns (maze width)
        cols: usize,
        /// Also save the maze to this file
        #[arg(long)]
        save: Option<PathBuf>,
        /// Random seed
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Load a maze from a file
    Load { file: PathBuf },
}

fn main() -> ExitCode {
    let args = Args::parse();
    let _guard = init_tracing(&args.log_dir);

    let maze = match build_maze(&args.command) {
        Ok(maze) => maze,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("mazeplay: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let delay = Duration::from_millis(
        args.delay_ms
            .unwrap_or(if args.headless { 0 } else { 100 }),
    );

    let result = if args.headless {
        solve_headless(&maze, delay)
    } else {
        solve_in_terminal(maze, delay, !args.start_running)
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("mazeplay: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn build_maze(command: &Command) -> mazeplay::Result<MazeGrid> {
    match command {
        Command::Random {
            rows,
            cols,
            save,
            seed,
        } => {
            let maze = generate_with_seed(*rows, *cols, *seed)?;
            tracing::info!("Generated {}", maze.title());
            if let Some(path) = save {
                // A failed save is reported but the maze is still shown
                if let Err(e) = codec::save(&maze, path) {
                    tracing::error!("{}", e);
                    eprintln!("mazeplay: error writing maze to file {}", path.display());
                    eprintln!("{}", e);
                }
            }
            Ok(maze)
        }
        Command::Load { file } => codec::load(file),
    }
}

fn solve_headless(maze: &MazeGrid, step_delay: Duration) -> std::io::Result<()> {
    let mut tracker = StateTracker::new(maze.width(), maze.height());
    let config = SolverConfig {
        step_delay,
        ..SolverConfig::default()
    };
    let outcome =
        solve_dfs(maze, &mut tracker, &SolverFlags::new(), &config).map_err(std::io::Error::other)?;

    match outcome {
        SolveOutcome::Solved { path, .. } => {
            println!(
                "{}: path of {} cells found ({} forward, {} backtrack)",
                maze.title(),
                path.len(),
                tracker.forward(),
                tracker.backtracked()
            );
        }
        SolveOutcome::Unreachable { .. } => {
            println!(
                "{}: no path found ({} forward, {} backtrack)",
                maze.title(),
                tracker.forward(),
                tracker.backtracked()
            );
        }
    }
    Ok(())
}

fn solve_in_terminal(maze: MazeGrid, step_delay: Duration, start_paused: bool) -> std::io::Result<()> {
    let app = App::new(step_delay, start_paused);
    let mut session = TerminalSession::enter()?;
    let result = app.run(session.stdout(), maze);
    // Leave the alternate screen before printing the outcome
    drop(session);

    match result? {
        Some(SolveOutcome::Solved {
            forward_steps,
            backtrack_steps,
            ..
        }) => println!(
            "Solved in {} forward and {} backtrack steps.",
            forward_steps, backtrack_steps
        ),
        Some(SolveOutcome::Unreachable { .. }) => println!("No path found."),
        None => {}
    }
    Ok(())
}
