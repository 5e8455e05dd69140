use crossterm::style::{Color, Stylize};

use std::fmt;

/// How far the solver has got with a cell.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalState {
    /// Not reached yet.
    #[default]
    Unvisited,
    /// On the current path from the start.
    Forward,
    /// Explored and abandoned.
    Backtracked,
}

impl fmt::Display for TraversalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TraversalState::Unvisited => "unvisited",
            TraversalState::Forward => "forward",
            TraversalState::Backtracked => "backtracked",
        };
        f.write_str(name)
    }
}

/// One block of the rendered maze. Cells, the walls between them, and the corners
/// each take one block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridCell {
    Wall,
    /// A gap in a wall.
    Passage,
    Cell(TraversalState),
}

impl GridCell {
    /// The width of each block when rendered, in character widths.
    pub const CELL_WIDTH: u16 = 2;
}

impl fmt::Display for GridCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let styled_symbol = match self {
            GridCell::Wall => "⬜".with(Color::White),
            GridCell::Passage => "  ".with(Color::Reset),
            GridCell::Cell(state) => match state {
                TraversalState::Unvisited => "  ".with(Color::Reset),
                TraversalState::Forward => "🟩".with(Color::Green),
                TraversalState::Backtracked => "🟥".with(Color::Red),
            },
        };

        #[cfg(debug_assertions)]
        {
            use unicode_width::UnicodeWidthStr;
            assert_eq!(
                styled_symbol.content().width(),
                GridCell::CELL_WIDTH as usize,
                "Each cell must occupy exactly two character widths."
            );
        }

        write!(f, "{}", styled_symbol)
    }
}
