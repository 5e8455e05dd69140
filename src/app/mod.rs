mod renderer;

use std::{
    io::{Stdout, Write},
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
        mpsc::{Receiver, RecvTimeoutError, Sender, SyncSender},
    },
    time::Duration,
};

use crossterm::{
    ExecutableCommand, cursor,
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    style::{self, Attribute, Color, Stylize},
    terminal::{self, ClearType},
};

pub use renderer::{RenderEvent, Renderer, SolverStatus};

use crate::{
    error::{Error, Result},
    maze::{MazeGrid, TraversalState, cell::GridCell},
    solvers::{SolveOutcome, SolverConfig, SolverFlags, StateSink, StateTracker, solve_dfs},
};

/// What a terminal event asks the app to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UserCommand {
    Quit,
    TogglePause,
    Redraw,
}

impl UserCommand {
    /// Esc/q quits, Enter/Space toggles pause, a resize redraws. Everything else is ignored.
    fn from_event(event: &Event) -> Option<Self> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Esc | KeyCode::Char('q') => Some(UserCommand::Quit),
                KeyCode::Enter | KeyCode::Char(' ') => Some(UserCommand::TogglePause),
                _ => None,
            },
            Event::Resize(..) => Some(UserCommand::Redraw),
            _ => None,
        }
    }
}

/// Raw mode and the alternate screen, held for as long as the session lives.
pub struct TerminalSession {
    stdout: Stdout,
}

impl TerminalSession {
    /// Enters raw mode and the alternate screen.
    ///
    /// Also installs a panic hook that leaves the session first, whichever thread panics.
    pub fn enter() -> std::io::Result<Self> {
        terminal::enable_raw_mode()?;
        let previous_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let _ = leave_terminal(&mut std::io::stdout());
            previous_hook(info);
        }));

        let mut session = TerminalSession {
            stdout: std::io::stdout(),
        };
        execute!(
            session.stdout,
            terminal::EnterAlternateScreen,
            terminal::Clear(ClearType::All),
            cursor::Hide,
            cursor::MoveTo(0, 0)
        )?;
        Ok(session)
    }

    pub fn stdout(&mut self) -> &mut Stdout {
        &mut self.stdout
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        if let Err(e) = leave_terminal(&mut self.stdout) {
            tracing::warn!("Failed to restore the terminal: {}", e);
        }
    }
}

fn leave_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
    execute!(stdout, terminal::LeaveAlternateScreen, cursor::Show)?;
    terminal::disable_raw_mode()
}

/// Forwards solver reports to the render thread.
///
/// Keeps its own copy of the traversal state to answer whether a report changed anything.
/// A closed channel means nobody is watching any more, which cancels the run.
pub struct ChannelSink {
    tracker: StateTracker,
    tx: SyncSender<RenderEvent>,
}

impl ChannelSink {
    pub fn new(maze: &MazeGrid, tx: SyncSender<RenderEvent>) -> Self {
        Self {
            tracker: StateTracker::new(maze.width(), maze.height()),
            tx,
        }
    }
}

impl StateSink for ChannelSink {
    fn report(&mut self, row: usize, col: usize, state: TraversalState) -> Result<bool> {
        let changed = self.tracker.report(row, col, state)?;
        self.tx
            .send(RenderEvent::Report {
                coord: (row, col),
                state,
            })
            .map_err(|_| Error::Cancelled)?;
        Ok(changed)
    }
}

pub struct App {
    /// Timeout for receiving input events, a.k.a. how often to check the render done flag
    input_recv_timeout: Duration,
    /// Timeout for polling input events in the input thread
    user_input_event_poll_timeout: Duration,
    /// Delay between solver steps
    step_delay: Duration,
    /// Whether the solver waits for the first Enter/Space before moving
    start_paused: bool,
}

impl Default for App {
    fn default() -> Self {
        Self {
            input_recv_timeout: Duration::from_millis(100),
            user_input_event_poll_timeout: Duration::from_millis(100),
            step_delay: Duration::from_millis(100),
            start_paused: true,
        }
    }
}

impl App {
    /// Maximum number of render events to buffer between the solver and render threads
    const MAX_EVENTS_IN_CHANNEL_BUFFER: usize = 16;

    pub fn new(step_delay: Duration, start_paused: bool) -> Self {
        Self {
            step_delay,
            start_paused,
            ..Self::default()
        }
    }

    /// Show `maze` and let the solver run on it under user control.
    /// Returns None if the run was cancelled or the maze does not fit the terminal
    pub fn run(&self, stdout: &mut Stdout, maze: MazeGrid) -> std::io::Result<Option<SolveOutcome>> {
        let (term_width, term_height) = terminal::size()?;
        if !Renderer::fits(&maze, term_width, term_height) {
            let (width, height) = Renderer::grid_size(&maze);
            let msg = format!(
                "Terminal size is too small ({}x{}) for a {}x{} maze, which needs {}x{}. Please resize the terminal.\r\n",
                term_width,
                term_height,
                maze.width(),
                maze.height(),
                width * GridCell::CELL_WIDTH as usize,
                height + Renderer::NUM_BANNER_ROWS as usize
            );
            stdout.execute(style::PrintStyledContent(
                msg.with(Color::Yellow).attribute(Attribute::Bold),
            ))?;
            App::prompt_quit(stdout)?;
            return Ok(None);
        }

        let maze = Arc::new(maze);
        let flags = if self.start_paused {
            SolverFlags::paused()
        } else {
            SolverFlags::new()
        };
        // Flag to indicate rendering is done. Set to true by the render thread when it finishes.
        let render_done = Arc::new(AtomicBool::new(false));

        let (command_tx, command_rx) = std::sync::mpsc::channel::<UserCommand>();
        let poll_timeout = self.user_input_event_poll_timeout;
        let render_done_for_input = render_done.clone();
        let flags_for_input = flags.clone();
        // Spawn a thread to turn terminal events into commands
        let input_thread_handle = std::thread::spawn(move || -> std::io::Result<()> {
            App::read_commands(command_tx, poll_timeout, &render_done_for_input, &flags_for_input)
        });

        let (render_event_tx, render_event_rx) =
            std::sync::mpsc::sync_channel::<RenderEvent>(App::MAX_EVENTS_IN_CHANNEL_BUFFER);

        // Spawn a thread to draw the maze and the solver's progress
        let initial_status = if flags.is_paused() {
            SolverStatus::Paused
        } else {
            SolverStatus::Running
        };
        let maze_for_render = maze.clone();
        let render_done_for_render = render_done.clone();
        let render_thread_handle = std::thread::spawn(move || {
            let mut renderer = Renderer::new(maze_for_render, initial_status);
            let rendered = renderer.render(render_event_rx, &render_done_for_render);
            // Release the other threads even if drawing failed
            render_done_for_render.store(true, Ordering::Relaxed);
            rendered
        });

        // Spawn a thread to solve the maze
        let config = SolverConfig {
            step_delay: self.step_delay,
            ..SolverConfig::default()
        };
        let flags_for_compute = flags.clone();
        let render_event_tx_for_compute = render_event_tx.clone();
        let compute_thread_handle = std::thread::spawn(move || -> Result<SolveOutcome> {
            App::compute(&maze, render_event_tx_for_compute, &flags_for_compute, &config)
        });

        // Main thread loop to listen for user input events while solving
        self.app_loop(command_rx, render_event_tx, &render_done, &flags);
        // Nothing drives the solver any more; a paused solver would otherwise wait forever
        flags.cancel();

        // Wait for input thread to finish
        let _ = input_thread_handle.join();

        // Wait for compute thread to finish
        let result = compute_thread_handle
            .join()
            .expect("Compute thread panicked");

        // Wait for render thread to finish
        render_thread_handle
            .join()
            .expect("Render thread panicked")?;

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(Error::Cancelled) => {
                tracing::info!("Solving was cancelled by user.");
                return Ok(None);
            }
            Err(e) => return Err(std::io::Error::other(e)),
        };

        let msg = if outcome.is_solved() {
            "Path found! "
        } else {
            "No path found. "
        };
        stdout.execute(style::PrintStyledContent(
            msg.with(Color::Green).attribute(Attribute::Bold),
        ))?;
        App::prompt_quit(stdout)?;
        Ok(Some(outcome))
    }

    /// Solve the maze, forwarding every report to the renderer
    /// Always ends the render stream with the final status and `Finished`
    fn compute(
        maze: &MazeGrid,
        render_event_tx: SyncSender<RenderEvent>,
        flags: &SolverFlags,
        config: &SolverConfig,
    ) -> Result<SolveOutcome> {
        let mut sink = ChannelSink::new(maze, render_event_tx.clone());
        let result = solve_dfs(maze, &mut sink, flags, config);

        let status = match &result {
            Ok(SolveOutcome::Solved { .. }) => SolverStatus::Solved,
            Ok(SolveOutcome::Unreachable { .. }) => SolverStatus::Unreachable,
            Err(_) => SolverStatus::Cancelled,
        };
        // Errors only happen if the renderer has exited already
        render_event_tx.send(RenderEvent::Status(status)).ok();
        render_event_tx.send(RenderEvent::Finished).ok();
        result
    }

    /// Applies user commands to the solver until the render thread finishes or the user quits
    fn app_loop(
        &self,
        commands: Receiver<UserCommand>,
        render_event_tx: SyncSender<RenderEvent>,
        render_done: &AtomicBool,
        flags: &SolverFlags,
    ) {
        tracing::info!("Started main app loop");
        while !render_done.load(Ordering::Relaxed) {
            let command = match commands.recv_timeout(self.input_recv_timeout) {
                Ok(command) => command,
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => break,
            };

            let render_event = match command {
                UserCommand::Quit => {
                    tracing::debug!("[app loop] Quit requested, cancelling solver");
                    flags.cancel();
                    break;
                }
                UserCommand::TogglePause if flags.is_cancelled() => continue,
                UserCommand::TogglePause => {
                    let status = if flags.toggle_pause() {
                        SolverStatus::Paused
                    } else {
                        SolverStatus::Running
                    };
                    tracing::debug!("[app loop] Toggled solver to {}", status);
                    RenderEvent::Status(status)
                }
                UserCommand::Redraw => RenderEvent::Resize,
            };

            if render_event_tx.send(render_event).is_err() {
                break;
            }
        }
        tracing::info!("Exiting main app loop");
    }

    /// Input thread body. Stops after forwarding `Quit`, or once rendering is done or the solver
    /// is cancelled.
    fn read_commands(
        commands: Sender<UserCommand>,
        poll_timeout: Duration,
        render_done: &AtomicBool,
        flags: &SolverFlags,
    ) -> std::io::Result<()> {
        while !render_done.load(Ordering::Relaxed) && !flags.is_cancelled() {
            if !event::poll(poll_timeout)? {
                continue;
            }
            let Some(command) = UserCommand::from_event(&event::read()?) else {
                continue;
            };
            if commands.send(command).is_err() || command == UserCommand::Quit {
                break;
            }
        }
        tracing::debug!("[input loop] Exiting");
        Ok(())
    }

    /// Prints the exit hint and blocks until the user quits.
    fn prompt_quit(stdout: &mut Stdout) -> std::io::Result<()> {
        stdout.execute(style::PrintStyledContent(
            "Press Esc or q to exit...\r\n"
                .with(Color::Blue)
                .attribute(Attribute::Bold),
        ))?;
        while UserCommand::from_event(&event::read()?) != Some(UserCommand::Quit) {}
        Ok(())
    }
}
