use ndarray::Array2;

use crate::board::Board;
use crate::cell::Cell;
use crate::error::{PuzzleError, Result};
use crate::location::{Position, BOARD_SIZE};
use crate::tile::ConnectionTable;

/// Reasons a builder may become invalid while building.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BuilderInvalidReason {
    /// A tile or the gap was placed outside the board.
    OutOfBounds,
    /// A tile key has no entry in the connection table the builder was created with.
    UnknownTile,
    /// Some position was neither given a tile nor marked as the gap.
    Unfilled,
}

/// Builds a [`Board`] one cell at a time, resolving tile keys against a [`ConnectionTable`].
///
/// Builders mutate themselves while building but can be [`Clone`]d to save their state at some point.
/// Once invalid, every further call is ignored and [`Self::build`] reports why.
#[derive(Clone)]
pub struct BoardBuilder<'a> {
    table: &'a ConnectionTable,
    cells: Array2<Option<Cell>>,
    invalid_reasons: Vec<BuilderInvalidReason>,
}

impl<'a> BoardBuilder<'a> {
    /// Start a builder with every position unfilled.
    pub fn new(table: &'a ConnectionTable) -> Self {
        Self {
            table,
            cells: Array2::from_elem((BOARD_SIZE, BOARD_SIZE), None),
            invalid_reasons: Default::default(),
        }
    }

    fn set(&mut self, position: Position, cell: Cell) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        match self.cells.get_mut(position.as_index()) {
            Some(slot) => *slot = Some(cell),
            None => self.invalid_reasons.push(BuilderInvalidReason::OutOfBounds),
        }

        self
    }

    /// Place the tile known as `key` at `position`, replacing whatever was there.
    ///
    /// May cause the builder to enter an [`UnknownTile`](BuilderInvalidReason::UnknownTile) or [`OutOfBounds`](BuilderInvalidReason::OutOfBounds) invalid state.
    pub fn place(&mut self, position: Position, key: &str) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        match self.table.id_of(key) {
            Ok(id) => self.set(position, Cell::Tile(id)),
            Err(_) => {
                self.invalid_reasons.push(BuilderInvalidReason::UnknownTile);
                self
            }
        }
    }

    /// Fill a whole row, left to right, with `None` marking the gap.
    pub fn row(&mut self, row: usize, keys: [Option<&str>; BOARD_SIZE]) -> &mut Self {
        for (col, key) in keys.into_iter().enumerate() {
            match key {
                Some(key) => self.place(Position(row, col), key),
                None => self.leave_empty(Position(row, col)),
            };
        }

        self
    }

    /// Mark `position` as the gap.
    pub fn leave_empty(&mut self, position: Position) -> &mut Self {
        self.set(position, Cell::Empty)
    }

    /// Fill every position not yet given with the tile known as `key`.
    pub fn fill(&mut self, key: &str) -> &mut Self {
        let unfilled = self.cells.indexed_iter()
            .filter(|(_, cell)| cell.is_none())
            .map(|(ind, _)| Position::from(ind))
            .collect::<Vec<_>>();

        for position in unfilled {
            self.place(position, key);
        }

        self
    }

    /// Check the validity of this builder, ensuring no [`BuilderInvalidReason`] condition has arisen.
    ///
    /// Returns `None` if the builder is valid, `Some(&Vec<BuilderInvalidReason>)` otherwise.
    pub fn is_valid(&self) -> Option<&Vec<BuilderInvalidReason>> {
        if self.invalid_reasons.is_empty() {
            None
        } else {
            Some(&self.invalid_reasons)
        }
    }

    /// Convert the state of this builder into a [`Board`].
    ///
    /// Fails with [`PuzzleError::InvalidBuilder`] if the builder is invalid or incomplete,
    /// or [`PuzzleError::EmptyCellCount`] if it does not hold exactly one gap.
    pub fn build(&self) -> Result<Board> {
        if let Some(reasons) = self.is_valid() {
            return Err(PuzzleError::InvalidBuilder(reasons.clone()));
        }

        if self.cells.iter().any(Option::is_none) {
            return Err(PuzzleError::InvalidBuilder(vec![BuilderInvalidReason::Unfilled]));
        }

        Board::from_cells(self.cells.mapv(Option::unwrap_or_default))
    }
}
