use std::fmt;

/// Errors produced while building, loading, saving or solving a maze.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Bad construction parameters (rows, columns, set size).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("cell [{row},{col}] does not exist in a {width}x{height} maze")]
    CellOutOfRange {
        row: usize,
        col: usize,
        width: usize,
        height: usize,
    },

    #[error("element {element} is out of range for disjoint sets of size {size}")]
    ElementOutOfRange { element: usize, size: usize },

    /// The persisted maze is malformed. `file` names where it came from.
    #[error("{file}: {kind}")]
    Format { file: String, kind: FormatErrorKind },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// The solve run was stopped by its controller. Not a failure.
    #[error("solver cancelled")]
    Cancelled,
}

/// What exactly is wrong with a maze file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatErrorKind {
    Empty,
    NotAMaze,
    IllegalDimensions,
    MissingCell { row: usize, col: usize },
    BadCell { row: usize, col: usize },
}

impl fmt::Display for FormatErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatErrorKind::Empty => write!(f, "file is empty"),
            FormatErrorKind::NotAMaze => write!(f, "not a maze"),
            FormatErrorKind::IllegalDimensions => write!(f, "maze has illegal dimension(s)"),
            FormatErrorKind::MissingCell { row, col } => {
                write!(f, "missing cell descriptions starting at [{},{}]", row, col)
            }
            FormatErrorKind::BadCell { row, col } => {
                write!(f, "bad description for cell [{},{}]", row, col)
            }
        }
    }
}

impl Error {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
