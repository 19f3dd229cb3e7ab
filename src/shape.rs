use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use strum::VariantArray;

use crate::location::Position;

/// One of the four edges of a square tile, and equally the direction of a step across that edge.
#[derive(Copy, Clone, VariantArray, Eq, PartialEq, Hash, Debug, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    /// Attempt the step from `position` across this side and return the resultant [`Position`].
    ///
    /// No bounds check happens here; see [`Position::step`] for that.
    pub(crate) fn attempt_from(&self, position: Position) -> Position {
        match self {
            Self::Top => position.offset_by((-1, 0)),
            Self::Right => position.offset_by((0, 1)),
            Self::Bottom => position.offset_by((1, 0)),
            Self::Left => position.offset_by((0, -1)),
        }
    }

    /// The side a neighbour presents back to us.
    pub fn opposite(&self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Right => Self::Left,
            Self::Bottom => Self::Top,
            Self::Left => Self::Right,
        }
    }

    /// Stable index for per-side arrays.
    #[inline]
    pub(crate) fn index(&self) -> usize {
        *self as usize
    }
}

impl Display for Side {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Top => "top",
            Self::Right => "right",
            Self::Bottom => "bottom",
            Self::Left => "left",
        })
    }
}
