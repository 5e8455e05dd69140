use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use crate::{
    error::{Error, Result},
    maze::TraversalState,
};

/// Pause/cancel queries polled by the solver once per step.
pub trait SolverControl {
    fn should_pause(&self) -> bool;
    fn should_cancel(&self) -> bool;
}

/// Receives every state change the solver makes, in order.
pub trait StateSink {
    /// Records that cell `(row, col)` is now in `state`.
    ///
    /// Returns whether the state actually changed. An `Err(Error::Cancelled)` stops the solver.
    fn report(&mut self, row: usize, col: usize, state: TraversalState) -> Result<bool>;
}

impl<S: StateSink + ?Sized> StateSink for &mut S {
    fn report(&mut self, row: usize, col: usize, state: TraversalState) -> Result<bool> {
        (**self).report(row, col, state)
    }
}

/// Per-cell traversal state with forward/backtrack counters.
///
/// Counters only move when a report actually changes a cell, so re-reporting is harmless.
#[derive(Debug, Clone)]
pub struct StateTracker {
    states: Vec<TraversalState>,
    width: usize,
    forward: usize,
    backtracked: usize,
}

impl StateTracker {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            states: vec![TraversalState::Unvisited; width * height],
            width,
            forward: 0,
            backtracked: 0,
        }
    }

    pub fn get(&self, row: usize, col: usize) -> Option<TraversalState> {
        if col >= self.width {
            return None;
        }
        self.states.get(row * self.width + col).copied()
    }

    /// Number of changes to `Forward`.
    pub fn forward(&self) -> usize {
        self.forward
    }

    /// Number of changes to `Backtracked`.
    pub fn backtracked(&self) -> usize {
        self.backtracked
    }
}

impl StateSink for StateTracker {
    fn report(&mut self, row: usize, col: usize, state: TraversalState) -> Result<bool> {
        let height = self.states.len() / self.width.max(1);
        if col >= self.width || row >= height {
            return Err(Error::CellOutOfRange {
                row,
                col,
                width: self.width,
                height,
            });
        }
        let slot = &mut self.states[row * self.width + col];
        if *slot == state {
            return Ok(false);
        }
        *slot = state;
        match state {
            TraversalState::Forward => self.forward += 1,
            TraversalState::Backtracked => self.backtracked += 1,
            TraversalState::Unvisited => {}
        }
        Ok(true)
    }
}

/// Shared pause and cancel flags.
///
/// Clones share the same flags, so the controller keeps one handle and the solver another.
#[derive(Debug, Clone, Default)]
pub struct SolverFlags {
    paused: Arc<AtomicBool>,
    cancelled: Arc<AtomicBool>,
}

impl SolverFlags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flags that start out paused.
    pub fn paused() -> Self {
        let flags = Self::default();
        flags.pause();
        flags
    }

    pub fn pause(&self) {
        self.paused.store(true, Ordering::Relaxed);
    }

    pub fn resume(&self) {
        self.paused.store(false, Ordering::Relaxed);
    }

    /// Flips the pause flag and returns whether the solver is now paused.
    pub fn toggle_pause(&self) -> bool {
        !self.paused.fetch_xor(true, Ordering::Relaxed)
    }

    /// Stops the run for good.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Relaxed)
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

impl SolverControl for SolverFlags {
    fn should_pause(&self) -> bool {
        self.is_paused()
    }

    fn should_cancel(&self) -> bool {
        self.is_cancelled()
    }
}

/// Blocks while paused, re-checking every `poll_interval`.
///
/// Returns `Err(Error::Cancelled)` as soon as cancellation is seen, paused or not.
pub fn checkpoint<C: SolverControl + ?Sized>(control: &C, poll_interval: Duration) -> Result<()> {
    let mut announced = false;
    loop {
        if control.should_cancel() {
            return Err(Error::Cancelled);
        }
        if !control.should_pause() {
            if announced {
                tracing::info!("[solver] Resumed");
            }
            return Ok(());
        }
        if !announced {
            tracing::info!("[solver] Paused");
            announced = true;
        }
        std::thread::sleep(poll_interval);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_tracker_counts_only_changes() {
        let mut tracker = StateTracker::new(3, 2);
        assert!(tracker.report(1, 2, TraversalState::Forward).unwrap());
        assert!(!tracker.report(1, 2, TraversalState::Forward).unwrap());
        assert!(tracker.report(1, 2, TraversalState::Backtracked).unwrap());
        assert!(!tracker.report(0, 0, TraversalState::Unvisited).unwrap());

        assert_eq!(tracker.forward(), 1);
        assert_eq!(tracker.backtracked(), 1);
        assert_eq!(tracker.get(1, 2), Some(TraversalState::Backtracked));
        assert_eq!(tracker.get(0, 3), None);
        assert!(matches!(
            tracker.report(2, 0, TraversalState::Forward),
            Err(Error::CellOutOfRange { row: 2, col: 0, .. })
        ));
    }

    #[test]
    fn test_flags_are_shared_between_clones() {
        let controller = SolverFlags::new();
        let solver_side = controller.clone();
        assert!(!solver_side.should_pause());

        assert!(controller.toggle_pause());
        assert!(solver_side.should_pause());
        assert!(!controller.toggle_pause());
        assert!(!solver_side.should_pause());

        controller.cancel();
        assert!(solver_side.should_cancel());
        assert!(SolverFlags::paused().is_paused());
    }

    #[test]
    fn test_checkpoint_passes_when_running() {
        let flags = SolverFlags::new();
        assert!(checkpoint(&flags, Duration::from_millis(1)).is_ok());
    }

    #[test]
    fn test_checkpoint_cancel_wins_over_pause() {
        let flags = SolverFlags::paused();
        flags.cancel();
        assert!(matches!(
            checkpoint(&flags, Duration::from_millis(1)),
            Err(Error::Cancelled)
        ));
    }

    #[test]
    fn test_checkpoint_blocks_until_resumed() {
        let flags = SolverFlags::paused();
        let controller = flags.clone();
        let handle = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(50));
            controller.resume();
        });

        let start = Instant::now();
        checkpoint(&flags, Duration::from_millis(1)).unwrap();
        assert!(start.elapsed() >= Duration::from_millis(40));
        handle.join().unwrap();
    }

    #[test]
    fn test_checkpoint_cancelled_while_paused() {
        let flags = SolverFlags::paused();
        let controller = flags.clone();
        let handle = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(20));
            controller.cancel();
        });

        assert!(checkpoint(&flags, Duration::from_millis(1)).is_err());
        handle.join().unwrap();
    }
}
