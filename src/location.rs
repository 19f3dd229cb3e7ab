use std::fmt::{Display, Formatter};

use ndarray::Ix;
use serde::{Deserialize, Serialize};
use strum::VariantArray;

use crate::shape::Side;

pub type Coord = usize;

/// Width and height of every board.
pub const BOARD_SIZE: Coord = 4;

#[derive(Clone, Eq, Hash, Copy, PartialEq, Ord, PartialOrd, Debug, Serialize, Deserialize)]
/// A cell `(row, column)` on a board. The top left corner is `Position(0, 0)`.
pub struct Position(pub Coord, pub Coord);

impl Position {
    /// Where every road begins.
    pub const START: Self = Self(0, 0);
    /// Where every road has to arrive.
    pub const END: Self = Self(BOARD_SIZE - 1, BOARD_SIZE - 1);

    pub(crate) fn as_index(&self) -> (Coord, Coord) {
        (self.0, self.1)
    }

    /// Whether this position lies on a [`BOARD_SIZE`]×[`BOARD_SIZE`] board.
    pub fn in_bounds(&self) -> bool {
        self.0 < BOARD_SIZE && self.1 < BOARD_SIZE
    }

    pub(crate) fn offset_by(self, rhs: (isize, isize)) -> Self {
        Self(self.0.wrapping_add_signed(rhs.0), self.1.wrapping_add_signed(rhs.1))
    }

    /// Step once towards `side`, returning [`None`] if that walks off the board.
    pub fn step(self, side: Side) -> Option<Self> {
        Some(side.attempt_from(self)).filter(Position::in_bounds)
    }

    /// Every in-bounds neighbour of this position along with the side it lies on.
    pub fn neighbors(self) -> impl Iterator<Item = (Side, Position)> {
        Side::VARIANTS.iter().filter_map(move |side| self.step(*side).map(|pos| (*side, pos)))
    }

    /// The side of `self` on which `other` sits, if the two are orthogonally adjacent.
    pub fn side_towards(self, other: Position) -> Option<Side> {
        Side::VARIANTS.iter().copied().find(|side| side.attempt_from(self) == other)
    }
}

impl From<(Ix, Ix)> for Position {
    fn from(value: (Ix, Ix)) -> Self {
        Self(value.0, value.1)
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.0, self.1)
    }
}
