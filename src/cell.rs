use crate::tile::TileId;

/// What occupies one square of a board.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Cell {
    /// A placed road piece.
    Tile(TileId),
    /// The single gap tiles slide into.
    #[default]
    Empty,
}

impl Cell {
    /// The tile here, if any.
    pub fn tile(&self) -> Option<TileId> {
        match self {
            Cell::Tile(id) => Some(*id),
            Cell::Empty => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Cell::Empty
    }
}
