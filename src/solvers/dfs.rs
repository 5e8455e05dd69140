use super::{SolveOutcome, SolverConfig, control::checkpoint};
use crate::{
    error::Result,
    maze::{Coord, Direction, MazeGrid, TraversalState},
    solvers::{SolverControl, StateSink},
};

/// A cell on the DFS stack and the next direction to try from it.
struct Frame {
    coord: Coord,
    next_direction: usize,
}

/// Walks `maze` depth-first from the top-left cell to the bottom-right cell.
///
/// Neighbors are tried right, down, left, up. Every transition goes through `sink`, and
/// `control` is consulted right before each report. Returns `Err(Error::Cancelled)` if the
/// run is cancelled, either by `control` or by the sink.
pub fn solve_dfs<S, C>(
    maze: &MazeGrid,
    sink: &mut S,
    control: &C,
    config: &SolverConfig,
) -> Result<SolveOutcome>
where
    S: StateSink + ?Sized,
    C: SolverControl + ?Sized,
{
    let start = (0, 0);
    let goal = (maze.height() - 1, maze.width() - 1);
    tracing::info!(
        "[solver] Solving {:?} from {:?} to {:?}",
        maze.title(),
        start,
        goal
    );

    let mut visited = vec![false; maze.len()];
    let mut forward_steps = 0;
    let mut backtrack_steps = 0;

    let mut report = |coord: Coord, state: TraversalState| -> Result<bool> {
        if !config.step_delay.is_zero() {
            std::thread::sleep(config.step_delay);
        }
        checkpoint(control, config.pause_poll_interval)?;
        sink.report(coord.0, coord.1, state)
    };

    report(start, TraversalState::Forward)?;
    forward_steps += 1;
    visited[0] = true;
    let mut stack = vec![Frame {
        coord: start,
        next_direction: 0,
    }];

    while let Some(frame) = stack.last_mut() {
        if frame.coord == goal {
            let path = stack.iter().map(|f| f.coord).collect::<Vec<_>>();
            tracing::info!(
                "[solver] Goal reached after {} forward and {} backtrack steps, path length {}",
                forward_steps,
                backtrack_steps,
                path.len()
            );
            return Ok(SolveOutcome::Solved {
                path,
                forward_steps,
                backtrack_steps,
            });
        }

        // Find the next open, unvisited neighbor of the top cell
        let mut next = None;
        while frame.next_direction < Direction::ALL.len() {
            let direction = Direction::ALL[frame.next_direction];
            frame.next_direction += 1;
            if !maze.is_open(frame.coord, direction)? {
                continue;
            }
            let Some(neighbor) = direction.step(frame.coord, maze.width(), maze.height()) else {
                continue;
            };
            let idx = maze.ravel_index(neighbor.0, neighbor.1)?;
            if !visited[idx] {
                visited[idx] = true;
                next = Some(neighbor);
                break;
            }
        }

        match next {
            Some(neighbor) => {
                report(neighbor, TraversalState::Forward)?;
                forward_steps += 1;
                stack.push(Frame {
                    coord: neighbor,
                    next_direction: 0,
                });
            }
            None => {
                let coord = frame.coord;
                report(coord, TraversalState::Backtracked)?;
                backtrack_steps += 1;
                stack.pop();
            }
        }
    }

    tracing::info!(
        "[solver] Goal {:?} is unreachable from {:?}",
        goal,
        start
    );
    Ok(SolveOutcome::Unreachable {
        forward_steps,
        backtrack_steps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::Error,
        generators::generate_with_seed,
        maze::codec::read_maze,
        solvers::SolverFlags,
    };
    use std::{
        io::Cursor,
        sync::{Arc, Mutex},
        time::Duration,
    };

    type Report = (usize, usize, TraversalState);

    /// Records reports; pauses or cancels `flags` once `trigger_after` reports arrived.
    #[derive(Default)]
    struct RecordingSink {
        reports: Arc<Mutex<Vec<Report>>>,
        flags: Option<SolverFlags>,
        trigger_after: usize,
        cancel_instead: bool,
    }

    impl StateSink for RecordingSink {
        fn report(&mut self, row: usize, col: usize, state: TraversalState) -> Result<bool> {
            let mut reports = self.reports.lock().unwrap();
            let changed = !reports
                .iter()
                .rev()
                .find(|r| (r.0, r.1) == (row, col))
                .is_some_and(|r| r.2 == state);
            reports.push((row, col, state));
            if let Some(flags) = &self.flags {
                if reports.len() == self.trigger_after {
                    if self.cancel_instead {
                        flags.cancel();
                    } else {
                        flags.pause();
                    }
                }
            }
            Ok(changed)
        }
    }

    fn fast_config() -> SolverConfig {
        SolverConfig {
            pause_poll_interval: Duration::from_millis(2),
            step_delay: Duration::ZERO,
        }
    }

    fn parse(text: &str) -> MazeGrid {
        read_maze(Cursor::new(text), "test.maze").unwrap()
    }

    fn run(maze: &MazeGrid) -> (Result<SolveOutcome>, Vec<Report>) {
        let mut sink = RecordingSink::default();
        let result = solve_dfs(maze, &mut sink, &SolverFlags::new(), &fast_config());
        let reports = sink.reports.lock().unwrap().clone();
        (result, reports)
    }

    use TraversalState::{Backtracked as B, Forward as F};

    #[test]
    fn test_open_2x2() {
        let maze = parse("maze 2 2\n0 0\n1 0\n0 1\n1 1\n");
        let (result, reports) = run(&maze);
        assert_eq!(reports, vec![(0, 0, F), (0, 1, F), (1, 1, F)]);
        assert_eq!(
            result.unwrap(),
            SolveOutcome::Solved {
                path: vec![(0, 0), (0, 1), (1, 1)],
                forward_steps: 3,
                backtrack_steps: 0,
            }
        );
    }

    #[test]
    fn test_backtracks_out_of_dead_end() {
        // (0,1) is a dead end, the way to the goal goes down first
        let maze = parse("maze 2 2\n0 0\n1 1\n0 1\n1 1\n");
        let (result, reports) = run(&maze);
        assert_eq!(
            reports,
            vec![(0, 0, F), (0, 1, F), (0, 1, B), (1, 0, F), (1, 1, F)]
        );
        assert_eq!(
            result.unwrap(),
            SolveOutcome::Solved {
                path: vec![(0, 0), (1, 0), (1, 1)],
                forward_steps: 4,
                backtrack_steps: 1,
            }
        );
    }

    #[test]
    fn test_single_cell() {
        let maze = parse("maze 1 1\n1 1\n");
        let (result, reports) = run(&maze);
        assert_eq!(reports, vec![(0, 0, F)]);
        assert!(result.unwrap().is_solved());
    }

    #[test]
    fn test_unreachable_goal() {
        let maze = parse("maze 2 1\n1 1\n1 1\n");
        let (result, reports) = run(&maze);
        assert_eq!(reports, vec![(0, 0, F), (0, 0, B)]);
        assert_eq!(
            result.unwrap(),
            SolveOutcome::Unreachable {
                forward_steps: 1,
                backtrack_steps: 1,
            }
        );
    }

    #[test]
    fn test_generated_mazes_are_solved() {
        for seed in 0..10 {
            let maze = generate_with_seed(8, 11, Some(seed)).unwrap();
            let n = maze.len();
            let (result, reports) = run(&maze);

            assert_eq!(reports[0], (0, 0, F));
            assert_eq!(*reports.last().unwrap(), (7, 10, F));

            let forwards = reports.iter().filter(|r| r.2 == F).count();
            let backtracks = reports.iter().filter(|r| r.2 == B).count();
            assert!(forwards <= n);
            assert!(backtracks <= n - 1);

            match result.unwrap() {
                SolveOutcome::Solved { path, .. } => {
                    assert_eq!(path.first(), Some(&(0, 0)));
                    assert_eq!(path.last(), Some(&(7, 10)));
                    for pair in path.windows(2) {
                        let direction = Direction::ALL
                            .into_iter()
                            .find(|d| d.step(pair[0], 11, 8) == Some(pair[1]))
                            .unwrap();
                        assert!(maze.is_open(pair[0], direction).unwrap());
                    }
                }
                other => panic!("expected a solution, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_sink_cancellation_propagates() {
        struct CancellingSink(usize);
        impl StateSink for CancellingSink {
            fn report(&mut self, _: usize, _: usize, _: TraversalState) -> Result<bool> {
                if self.0 == 0 {
                    return Err(Error::Cancelled);
                }
                self.0 -= 1;
                Ok(true)
            }
        }

        let maze = generate_with_seed(6, 6, Some(1)).unwrap();
        let mut sink = CancellingSink(4);
        let result = solve_dfs(&maze, &mut sink, &SolverFlags::new(), &fast_config());
        assert!(matches!(result, Err(Error::Cancelled)));
        assert_eq!(sink.0, 0);
    }

    #[test]
    fn test_cancel_stops_within_one_step() {
        let maze = generate_with_seed(10, 10, Some(5)).unwrap();
        let flags = SolverFlags::new();
        let mut sink = RecordingSink {
            flags: Some(flags.clone()),
            trigger_after: 6,
            cancel_instead: true,
            ..Default::default()
        };
        let result = solve_dfs(&maze, &mut sink, &flags, &fast_config());
        assert!(matches!(result, Err(Error::Cancelled)));
        assert_eq!(sink.reports.lock().unwrap().len(), 6);
    }

    #[test]
    fn test_cancel_while_paused() {
        let maze = generate_with_seed(4, 4, Some(2)).unwrap();
        let flags = SolverFlags::paused();
        let controller = flags.clone();
        let reports = Arc::new(Mutex::new(Vec::new()));
        let mut sink = RecordingSink {
            reports: reports.clone(),
            ..Default::default()
        };

        let handle =
            std::thread::spawn(move || solve_dfs(&maze, &mut sink, &flags, &fast_config()));
        std::thread::sleep(Duration::from_millis(30));
        controller.cancel();

        assert!(matches!(handle.join().unwrap(), Err(Error::Cancelled)));
        assert!(reports.lock().unwrap().is_empty());
    }

    #[test]
    fn test_pause_then_resume_keeps_order() {
        let maze = generate_with_seed(12, 12, Some(9)).unwrap();
        let (expected_result, expected) = run(&maze);
        let pause_after = 5;
        assert!(expected.len() > pause_after);

        let flags = SolverFlags::new();
        let controller = flags.clone();
        let reports = Arc::new(Mutex::new(Vec::new()));
        let mut sink = RecordingSink {
            reports: reports.clone(),
            flags: Some(flags.clone()),
            trigger_after: pause_after,
            cancel_instead: false,
        };

        let solve_maze = maze.clone();
        let handle =
            std::thread::spawn(move || solve_dfs(&solve_maze, &mut sink, &flags, &fast_config()));

        // Wait for the sink to pause the run, then make sure nothing else arrives
        while !controller.is_paused() {
            std::thread::sleep(Duration::from_millis(1));
        }
        std::thread::sleep(Duration::from_millis(50));
        assert_eq!(reports.lock().unwrap().len(), pause_after);
        assert_eq!(reports.lock().unwrap()[..], expected[..pause_after]);

        controller.resume();
        let result = handle.join().unwrap();
        assert_eq!(result.unwrap(), expected_result.unwrap());
        assert_eq!(*reports.lock().unwrap(), expected);
    }
}
