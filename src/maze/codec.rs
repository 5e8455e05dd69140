//! Text format for persisted mazes:
//!
//! ```text
//! maze <W> <H>
//! <r> <b>        one line per cell, row-major from [0,0]
//! ```
//!
//! Any nonzero flag means the wall is present.

use std::{
    fs::File,
    io::{BufRead, BufReader, Write},
    path::Path,
};

use crate::error::{Error, FormatErrorKind, Result};

use super::MazeGrid;

/// Header keyword of a maze file.
const MAGIC: &str = "maze";

/// Loads a maze from `path`. The maze title is the path.
pub fn load(path: impl AsRef<Path>) -> Result<MazeGrid> {
    let path = path.as_ref();
    let name = path.display().to_string();
    let file = File::open(path).map_err(|source| Error::Io {
        context: format!("error opening {}", name),
        source,
    })?;
    let maze = read_maze(BufReader::new(file), &name)?;
    tracing::info!(
        "Loaded {}x{} maze from {}",
        maze.width(),
        maze.height(),
        name
    );
    Ok(maze)
}

/// Saves `maze` to `path`, overwriting any existing file.
///
/// Each cell line goes straight to the file, so a failed write names the cell it belongs to.
pub fn save(maze: &MazeGrid, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let name = path.display().to_string();
    let file = File::create(path).map_err(|source| Error::Io {
        context: format!("error creating {}", name),
        source,
    })?;
    write_maze(maze, file, &name)?;
    tracing::info!("Saved maze {:?} to {}", maze.title(), name);
    Ok(())
}

/// Parses a maze from `reader`. `name` identifies the source in errors and becomes the title.
///
/// Nothing is returned unless every cell parsed.
pub fn read_maze<R: BufRead>(reader: R, name: &str) -> Result<MazeGrid> {
    let format_error = |kind| Error::Format {
        file: name.to_string(),
        kind,
    };
    let read_error = |source| Error::Io {
        context: format!("error reading {}", name),
        source,
    };

    let mut lines = reader.lines();

    let header = match lines.next() {
        Some(line) => line.map_err(read_error)?,
        None => return Err(format_error(FormatErrorKind::Empty)),
    };
    let tokens = header.split_whitespace().collect::<Vec<_>>();
    if tokens.len() < 3 || tokens[0] != MAGIC {
        return Err(format_error(FormatErrorKind::NotAMaze));
    }
    let dimension = |token: &str| match token.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(format_error(FormatErrorKind::IllegalDimensions)),
    };
    let width = dimension(tokens[1])?;
    let height = dimension(tokens[2])?;

    let cell_count = width
        .checked_mul(height)
        .ok_or_else(|| format_error(FormatErrorKind::IllegalDimensions))?;

    // The grid is only sized once the cells are actually there
    let mut cells = Vec::new();
    for i in 0..cell_count {
        let (row, col) = (i / width, i % width);
        let line = match lines.next() {
            Some(line) => line.map_err(read_error)?,
            None => return Err(format_error(FormatErrorKind::MissingCell { row, col })),
        };
        let cell =
            parse_cell(&line).ok_or_else(|| format_error(FormatErrorKind::BadCell { row, col }))?;
        cells.push(cell);
    }

    let mut maze = MazeGrid::new(width, height, name)
        .map_err(|_| format_error(FormatErrorKind::IllegalDimensions))?;
    for (i, (right, bottom)) in cells.into_iter().enumerate() {
        let (row, col) = (i / width, i % width);
        maze.set_right_wall(row, col, right)?;
        maze.set_bottom_wall(row, col, bottom)?;
    }
    Ok(maze)
}

/// Parses `<r> <b>`. Extra tokens are ignored.
fn parse_cell(line: &str) -> Option<(bool, bool)> {
    let mut tokens = line.split_whitespace();
    let right = tokens.next()?.parse::<i64>().ok()?;
    let bottom = tokens.next()?.parse::<i64>().ok()?;
    Some((right != 0, bottom != 0))
}

/// Writes `maze` to `writer`. `name` identifies the destination in errors.
pub fn write_maze<W: Write>(maze: &MazeGrid, mut writer: W, name: &str) -> Result<()> {
    writeln!(writer, "{} {} {}", MAGIC, maze.width(), maze.height()).map_err(|source| {
        Error::Io {
            context: format!("error writing header of {}", name),
            source,
        }
    })?;

    for row in 0..maze.height() {
        for col in 0..maze.width() {
            let walls = maze.walls(row, col)?;
            let line = format!("{} {}\n", walls.right as u8, walls.bottom as u8);
            writer
                .write_all(line.as_bytes())
                .map_err(|source| Error::Io {
                    context: format!("error writing {} at cell [{},{}]", name, row, col),
                    source,
                })?;
        }
    }

    writer.flush().map_err(|source| Error::Io {
        context: format!("error flushing {}", name),
        source,
    })
}
