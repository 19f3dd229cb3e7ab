use crate::builder::BuilderInvalidReason;
use crate::game::Phase;
use crate::location::Position;
use crate::shape::Side;
use crate::tile::TileId;

/// Everything that can go wrong while loading, building, or playing a puzzle.
///
/// A road that does not reach the end is not an error; see [`PathValidator::validate`](crate::PathValidator::validate).
#[derive(Debug, thiserror::Error)]
pub enum PuzzleError {
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("tile `{tile}` lists unknown tile `{reference}` on its {side} side")]
    UnknownReference { tile: String, side: Side, reference: String },

    #[error("the {0} tile list is empty")]
    EmptyAllowList(&'static str),

    #[error("unknown tile `{0}`")]
    UnknownTile(String),

    #[error("tile id {0} has no entry in the connection table")]
    MissingTileData(TileId),

    #[error("board must be 4x4, found a row of length {found} at row {row}")]
    RaggedRow { row: usize, found: usize },

    #[error("board must be 4x4, found {0} rows")]
    WrongRowCount(usize),

    #[error("board must have exactly one empty cell, found {0}")]
    EmptyCellCount(usize),

    #[error("board is invalid: {0:?}")]
    InvalidBuilder(Vec<BuilderInvalidReason>),

    #[error("position {0} is outside the board")]
    OutOfBounds(Position),

    #[error("position {0} holds no tile")]
    NotATile(Position),

    #[error("tile at {0} is not next to the empty cell")]
    NotAdjacentToEmpty(Position),

    #[error("cannot do that while {0}")]
    WrongPhase(Phase),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, PuzzleError>;
