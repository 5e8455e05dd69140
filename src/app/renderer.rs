use std::{
    io::{Stdout, Write},
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
        mpsc::Receiver,
    },
};

use crossterm::{
    QueueableCommand, cursor, queue,
    style::{self, Attribute, Color, Stylize},
    terminal::{self, ClearType},
};
use unicode_truncate::UnicodeTruncateStr;

use crate::{
    maze::{Coord, MazeGrid, TraversalState, cell::GridCell},
    solvers::{StateSink, StateTracker},
};

/// Everything the render thread draws.
#[derive(Debug, Clone, Copy)]
pub enum RenderEvent {
    /// A solver report, forwarded in order.
    Report { coord: Coord, state: TraversalState },
    Status(SolverStatus),
    Resize,
    /// The solver thread is done; no more events follow.
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverStatus {
    Paused,
    Running,
    Solved,
    Unreachable,
    Cancelled,
}

impl std::fmt::Display for SolverStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverStatus::Paused => write!(f, "PAUSED"),
            SolverStatus::Running => write!(f, "RUNNING"),
            SolverStatus::Solved => write!(f, "SOLVED"),
            SolverStatus::Unreachable => write!(f, "NO PATH"),
            SolverStatus::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

pub struct Renderer {
    /// Standard output handle to write to the terminal
    stdout: Stdout,
    maze: Arc<MazeGrid>,
    /// What the display currently shows for each cell, plus the step counters
    tracker: StateTracker,
    status: SolverStatus,
}

impl Renderer {
    /// Rows reserved under the maze for the banner
    pub const NUM_BANNER_ROWS: u16 = 2;

    pub fn new(maze: Arc<MazeGrid>, status: SolverStatus) -> Self {
        let tracker = StateTracker::new(maze.width(), maze.height());
        Self {
            stdout: std::io::stdout(),
            maze,
            tracker,
            status,
        }
    }

    /// Size of the drawn maze in blocks: one per cell, one per wall, one per corner.
    pub fn grid_size(maze: &MazeGrid) -> (usize, usize) {
        (maze.width() * 2 + 1, maze.height() * 2 + 1)
    }

    /// Whether the maze and its banner fit in a terminal of the given size.
    pub fn fits(maze: &MazeGrid, term_width: u16, term_height: u16) -> bool {
        let (width, height) = Renderer::grid_size(maze);
        width * GridCell::CELL_WIDTH as usize <= term_width as usize
            && height + Renderer::NUM_BANNER_ROWS as usize <= term_height as usize
    }

    /// The block drawn at `(x, y)`.
    ///
    /// The outer frame is always walled, except for the entrance left of the top-left cell and
    /// the exit right of the bottom-right cell. Inside, walls come from the maze.
    pub fn block_at(maze: &MazeGrid, tracker: &StateTracker, x: usize, y: usize) -> GridCell {
        let (width, height) = (maze.width(), maze.height());
        let wall_if = |present: bool| {
            if present {
                GridCell::Wall
            } else {
                GridCell::Passage
            }
        };
        match (x % 2, y % 2) {
            // Corner
            (0, 0) => GridCell::Wall,
            // Cell
            (1, 1) => {
                let (row, col) = (y / 2, x / 2);
                GridCell::Cell(tracker.get(row, col).unwrap_or_default())
            }
            // Vertical wall left of cell (row, x / 2)
            (0, 1) => {
                let row = y / 2;
                if x == 0 {
                    return wall_if(row != 0);
                }
                let col = x / 2 - 1;
                if col + 1 == width {
                    return wall_if(row + 1 != height);
                }
                wall_if(maze.right_wall(row, col).unwrap_or(true))
            }
            // Horizontal wall above cell (y / 2, col)
            _ => {
                let col = x / 2;
                if y == 0 || y / 2 == height {
                    return GridCell::Wall;
                }
                wall_if(maze.bottom_wall(y / 2 - 1, col).unwrap_or(true))
            }
        }
    }

    fn draw_all(&mut self) -> std::io::Result<()> {
        let (width, height) = Renderer::grid_size(&self.maze);
        queue!(
            self.stdout,
            terminal::Clear(ClearType::All),
            cursor::MoveTo(0, 0)
        )?;
        for y in 0..height {
            for x in 0..width {
                let block = Renderer::block_at(&self.maze, &self.tracker, x, y);
                self.stdout.queue(style::Print(block))?;
            }
            self.stdout.queue(style::Print("\r\n"))?;
        }
        self.draw_banner()
    }

    fn draw_cell(&mut self, (row, col): Coord) -> std::io::Result<()> {
        let (x, y) = (col * 2 + 1, row * 2 + 1);
        let block = Renderer::block_at(&self.maze, &self.tracker, x, y);
        queue!(
            self.stdout,
            cursor::MoveTo(x as u16 * GridCell::CELL_WIDTH, y as u16),
            style::Print(block)
        )
    }

    fn draw_banner(&mut self) -> std::io::Result<()> {
        let (_, height) = Renderer::grid_size(&self.maze);
        let term_width = terminal::size().map(|(w, _)| w as usize).unwrap_or(80);

        let stats = format!(
            "{}  forward: {}  backtrack: {}  [{}]",
            self.maze.title(),
            self.tracker.forward(),
            self.tracker.backtracked(),
            self.status
        );
        let (stats, _) = stats.unicode_truncate(term_width);
        let help = "Enter/Space: pause/resume  Esc/q: quit";
        let (help, _) = help.unicode_truncate(term_width);

        let color = match self.status {
            SolverStatus::Paused => Color::Yellow,
            SolverStatus::Running => Color::Cyan,
            SolverStatus::Solved => Color::Green,
            SolverStatus::Unreachable | SolverStatus::Cancelled => Color::Red,
        };
        queue!(
            self.stdout,
            cursor::MoveTo(0, height as u16),
            terminal::Clear(ClearType::CurrentLine),
            style::PrintStyledContent(stats.with(color).attribute(Attribute::Bold)),
            cursor::MoveTo(0, height as u16 + 1),
            terminal::Clear(ClearType::CurrentLine),
            style::PrintStyledContent(help.with(Color::DarkGrey)),
        )
    }

    /// Render loop: draws events until `Finished` arrives or the channel closes, then sets `done`.
    pub fn render(&mut self, events: Receiver<RenderEvent>, done: &AtomicBool) -> std::io::Result<()> {
        self.draw_all()?;
        self.stdout.flush()?;

        loop {
            let event = match events.recv() {
                Err(_e) => {
                    // Channel disconnected, exit the thread
                    break;
                }
                Ok(event) => event,
            };
            match event {
                RenderEvent::Report { coord, state } => {
                    let changed = self
                        .tracker
                        .report(coord.0, coord.1, state)
                        .map_err(std::io::Error::other)?;
                    if changed {
                        self.draw_cell(coord)?;
                    }
                    self.draw_banner()?;
                }
                RenderEvent::Status(status) => {
                    tracing::debug!("[render] Status changed to {}", status);
                    self.status = status;
                    self.draw_banner()?;
                }
                RenderEvent::Resize => {
                    self.draw_all()?;
                }
                RenderEvent::Finished => {
                    tracing::debug!("[render] Solver finished, exiting render loop");
                    break;
                }
            }
            self.stdout.flush()?;
        }

        // Move cursor below the maze and banner after exiting
        let (_, height) = Renderer::grid_size(&self.maze);
        queue!(
            self.stdout,
            cursor::MoveTo(0, height as u16 + Renderer::NUM_BANNER_ROWS),
            cursor::Show
        )?;
        self.stdout.flush()?;
        done.store(true, Ordering::Relaxed);
        Ok(())
    }
}
