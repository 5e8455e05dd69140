use std::time::Duration;

pub mod control;
mod dfs;

pub use control::{SolverControl, SolverFlags, StateSink, StateTracker, checkpoint};
pub use dfs::solve_dfs;

use crate::maze::Coord;

/// Tuning for a solve run.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// How often to re-check the flags while paused.
    pub pause_poll_interval: Duration,
    /// Extra sleep after each step so a viewer can follow along.
    pub step_delay: Duration,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            pause_poll_interval: Duration::from_millis(100),
            step_delay: Duration::ZERO,
        }
    }
}

/// How a finished (not cancelled) solve run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveOutcome {
    /// The goal was reached. `path` runs from the start to the goal.
    Solved {
        path: Vec<Coord>,
        forward_steps: usize,
        backtrack_steps: usize,
    },
    /// Every reachable cell was explored without meeting the goal.
    Unreachable {
        forward_steps: usize,
        backtrack_steps: usize,
    },
}

impl SolveOutcome {
    pub fn is_solved(&self) -> bool {
        matches!(self, SolveOutcome::Solved { .. })
    }
}
