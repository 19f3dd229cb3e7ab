#![warn(missing_docs)]

//! # `roadbuilder`
//!
//! A sliding-tile road puzzle. A 4×4 board holds fifteen road tiles and one gap; the player slides tiles into the gap
//! until a road runs from the start cell (top left) to the end cell (bottom right), then sends the car off.
//!
//! Load a [`PuzzleConfig`] (the [bundled](PuzzleConfig::bundled) one or your own JSON) and turn it into a [`Puzzle`],
//! or work with the pieces directly: a [`ConnectionTable`] says which tile may touch which on each side,
//! a [`Board`] is built with a [`BoardBuilder`] or from a [`BoardSnapshot`], and a [`PathValidator`] judges it.
//!
//! # Internals
//! Two adjacent tiles join only if *both* list each other on the facing sides.
//! The board is turned into an undirected graph with one node per tile and one edge per join,
//! and the validator runs a breadth-first search over it from the start cell.
//! Before searching, the start and end cells must hold tiles from the table's start and end lists;
//! if either does not, the answer is "no road" and the graph is never built.
//!
//! The table is reference data and never changes in place. Editing happens on a [`TableEditor`] copy,
//! and [`TableEditor::commit`] hands back a fresh table.

pub use board::{Board, BoardSnapshot};
pub use builder::{BoardBuilder, BuilderInvalidReason};
pub use cell::Cell;
pub use config::{PuzzleConfig, Settings};
pub use editor::TableEditor;
pub use error::{PuzzleError, Result};
pub use game::{Phase, Puzzle};
pub use location::{Position, BOARD_SIZE};
pub use shape::Side;
pub use solver::PathValidator;
pub use tile::{ConnectionTable, TableSpec, Tile, TileId, TileSpec};

pub(crate) mod board;
mod tests;
pub(crate) mod location;
pub(crate) mod shape;
pub(crate) mod cell;
pub mod builder;
pub(crate) mod config;
pub(crate) mod editor;
pub(crate) mod error;
pub(crate) mod game;
pub(crate) mod solver;
pub(crate) mod tile;
#[cfg(feature = "wasm")]
pub mod wasm;
