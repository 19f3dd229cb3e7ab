use std::collections::HashMap;

use itertools::Itertools;
use ndarray::Array2;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::cell::Cell;
use crate::error::{PuzzleError, Result};
use crate::location::{Position, BOARD_SIZE};
use crate::tile::{ConnectionTable, TileId};

/// Serialized board: rows of tile keys, top to bottom, with `null` for the gap.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoardSnapshot(pub Vec<Vec<Option<String>>>);

impl BoardSnapshot {
    /// Build a snapshot from anything shaped like rows of optional keys.
    pub fn from_rows<R, S>(rows: R) -> Self
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        Self(rows.into_iter()
            .map(|row| row.into_iter().map(|key| key.map(Into::into)).collect())
            .collect())
    }
}

/// A 4×4 arrangement of tiles with exactly one empty cell.
///
/// [`Board`]s come from a [`BoardBuilder`](crate::builder::BoardBuilder) or a [`BoardSnapshot`].
/// The only way to change one afterwards is [`Self::slide`], which swaps a tile with the neighbouring gap,
/// so the tiles on the board never change, only their order.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Board {
    cells: Array2<Cell>,
    empty: Position,
}

impl Board {
    pub(crate) fn from_cells(cells: Array2<Cell>) -> Result<Self> {
        if cells.nrows() != BOARD_SIZE {
            return Err(PuzzleError::WrongRowCount(cells.nrows()));
        }
        if cells.ncols() != BOARD_SIZE {
            return Err(PuzzleError::RaggedRow { row: 0, found: cells.ncols() });
        }

        let empties = cells.indexed_iter()
            .filter(|(_, cell)| cell.is_empty())
            .map(|(ind, _)| Position::from(ind))
            .collect_vec();

        match empties.as_slice() {
            [empty] => Ok(Self { empty: *empty, cells }),
            _ => Err(PuzzleError::EmptyCellCount(empties.len())),
        }
    }

    /// Resolve a [`BoardSnapshot`] against `table`.
    ///
    /// Fails if the snapshot is not 4×4, mentions a key `table` does not know, or does not have exactly one gap.
    pub fn from_snapshot(table: &ConnectionTable, snapshot: &BoardSnapshot) -> Result<Self> {
        let rows = &snapshot.0;
        if rows.len() != BOARD_SIZE {
            return Err(PuzzleError::WrongRowCount(rows.len()));
        }
        if let Some((row, found)) = rows.iter().map(Vec::len).enumerate().find(|(_, len)| *len != BOARD_SIZE) {
            return Err(PuzzleError::RaggedRow { row, found });
        }

        let cells = rows.iter()
            .flatten()
            .map(|key| match key {
                Some(key) => table.id_of(key).map(Cell::Tile),
                None => Ok(Cell::Empty),
            })
            .collect::<Result<Vec<Cell>>>()?;

        // shape is checked above
        let cells = Array2::from_shape_vec((BOARD_SIZE, BOARD_SIZE), cells)
            .map_err(|_| PuzzleError::WrongRowCount(rows.len()))?;

        Self::from_cells(cells)
    }

    /// Convert back to keys. Fails only if this board was built against a different table.
    pub fn snapshot(&self, table: &ConnectionTable) -> Result<BoardSnapshot> {
        self.cells.rows().into_iter()
            .map(|row| row.iter()
                .map(|cell| match cell {
                    Cell::Tile(id) => table.tile(*id).map(|tile| Some(tile.key().to_string())),
                    Cell::Empty => Ok(None),
                })
                .collect::<Result<Vec<_>>>())
            .collect::<Result<Vec<_>>>()
            .map(BoardSnapshot)
    }

    /// The cell at `position`, or [`None`] if it is off the board.
    pub fn get(&self, position: Position) -> Option<Cell> {
        self.cells.get(position.as_index()).copied()
    }

    /// The cell at `position`, failing if it is off the board.
    pub fn cell(&self, position: Position) -> Result<Cell> {
        self.get(position).ok_or(PuzzleError::OutOfBounds(position))
    }

    /// Where the gap currently is.
    pub fn empty(&self) -> Position {
        self.empty
    }

    /// Every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (Position, Cell)> + '_ {
        self.cells.indexed_iter().map(|(ind, cell)| (Position::from(ind), *cell))
    }

    /// How many of each tile the board holds. Slides never change this.
    pub fn tile_counts(&self) -> HashMap<TileId, usize> {
        self.cells.iter().filter_map(Cell::tile).counts()
    }

    /// Tiles which may slide right now, i.e. those orthogonally adjacent to the gap.
    pub fn movable(&self) -> Vec<Position> {
        self.empty.neighbors().map(|(_, position)| position).collect_vec()
    }

    /// Slide the tile at `position` into the gap.
    pub fn slide(&mut self, position: Position) -> Result<()> {
        match self.cell(position)? {
            Cell::Empty => Err(PuzzleError::NotATile(position)),
            Cell::Tile(_) if position.side_towards(self.empty).is_none() => Err(PuzzleError::NotAdjacentToEmpty(position)),
            Cell::Tile(_) => {
                self.cells.swap(position.as_index(), self.empty.as_index());
                self.empty = position;
                Ok(())
            }
        }
    }

    /// Make `moves` random slides, never immediately undoing the previous one.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R, moves: usize) {
        let mut previous = None;
        for _ in 0..moves {
            let candidates = self.movable().into_iter()
                .filter(|position| Some(*position) != previous)
                .collect_vec();
            let Some(choice) = candidates.choose(rng).copied() else {
                break;
            };

            // after the slide, the undo move is the tile now sitting in the old gap
            previous = Some(self.empty);
            // choice is adjacent to the gap by construction of movable()
            let _ = self.slide(choice);
        }
    }

    /// Lay the board out as text, one row per line, using each tile's glyph and `.` for the gap.
    pub fn render(&self, table: &ConnectionTable) -> Result<String> {
        let mut out = String::with_capacity(BOARD_SIZE * (BOARD_SIZE + 1));

        for row in self.cells.rows() {
            for cell in row {
                out.push(match cell {
                    Cell::Tile(id) => table.tile(*id)?.glyph(),
                    Cell::Empty => '.',
                });
            }
            out.push('\n');
        }

        Ok(out)
    }
}
