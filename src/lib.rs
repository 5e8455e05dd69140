pub mod app;
pub mod disjoint_sets;
pub mod error;
pub mod generators;
pub mod logging;
pub mod maze;
pub mod solvers;

pub use disjoint_sets::DisjointSets;
pub use error::{Error, FormatErrorKind, Result};
pub use maze::{MazeGrid, TraversalState, codec};
