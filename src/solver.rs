use std::collections::HashSet;

use log::{debug, trace};
use petgraph::algo::astar;
use petgraph::graphmap::UnGraphMap;
use petgraph::visit::Bfs;
use unordered_pair::UnorderedPair;

use crate::board::Board;
use crate::error::{PuzzleError, Result};
use crate::location::{Position, BOARD_SIZE};
use crate::shape::Side;
use crate::tile::{ConnectionTable, TileId};

/// Sides which, stepped across, lead to a cell later in row-major order. Every adjacency is seen once from these.
const FORWARD_SIDES: [Side; 2] = [Side::Right, Side::Bottom];

/// Decides whether the tiles on a board form a road from a start cell to an end cell.
///
/// # Rules
/// Before searching, the start cell must hold one of the table's start tiles and the end cell one of its end tiles;
/// otherwise the answer is `false` and no search happens. The gap counts as neither.
///
/// Two orthogonally adjacent tiles are joined iff each lists the other on the facing side,
/// see [`ConnectionTable::connects`]. The search is breadth-first over those joins from the start cell;
/// reaching the end cell is checked on each dequeued cell, never by treating the gap as a step.
///
/// Results depend only on the board and the table, so validating an unchanged board always gives the same answer.
pub struct PathValidator<'a> {
    table: &'a ConnectionTable,
}

impl<'a> PathValidator<'a> {
    pub fn new(table: &'a ConnectionTable) -> Self {
        Self { table }
    }

    /// Reject anything that cannot be searched: positions off the board and tiles unknown to the table.
    fn check_input(&self, board: &Board, start: Position, end: Position) -> Result<()> {
        for position in [start, end] {
            if !position.in_bounds() {
                return Err(PuzzleError::OutOfBounds(position));
            }
        }

        for (_, cell) in board.cells() {
            if let Some(id) = cell.tile() {
                self.table.tile(id)?;
            }
        }

        Ok(())
    }

    fn tile_at(board: &Board, position: Position) -> Option<TileId> {
        board.get(position).and_then(|cell| cell.tile())
    }

    fn endpoints_allowed(&self, board: &Board, start: Position, end: Position) -> bool {
        let start_ok = Self::tile_at(board, start).is_some_and(|id| self.table.is_start_tile(id));
        if !start_ok {
            debug!("start cell {} does not hold a start tile", start);
            return false;
        }

        let end_ok = Self::tile_at(board, end).is_some_and(|id| self.table.is_end_tile(id));
        if !end_ok {
            debug!("end cell {} does not hold an end tile", end);
            return false;
        }

        true
    }

    /// The graph of joined tiles. Nodes are every tile-holding position; edges carry the side as seen from the lower position.
    fn graph(&self, board: &Board) -> Result<UnGraphMap<Position, Side>> {
        let mut graph = UnGraphMap::with_capacity(
            BOARD_SIZE * BOARD_SIZE,
            // "horizontal" plus "vertical" adjacencies
            2 * (BOARD_SIZE - 1) * BOARD_SIZE,
        );

        for (position, cell) in board.cells() {
            let Some(id) = cell.tile() else {
                continue;
            };
            graph.add_node(position);

            for side in FORWARD_SIDES {
                let Some(neighbor_position) = position.step(side) else {
                    continue;
                };
                let Some(neighbor) = Self::tile_at(board, neighbor_position) else {
                    continue;
                };

                if self.table.connects(id, side, neighbor)? {
                    graph.add_edge(position, neighbor_position, side);
                }
            }
        }

        Ok(graph)
    }

    /// Whether a road joins `start` to `end`.
    ///
    /// Errors only for malformed input; a missing road is `Ok(false)`.
    pub fn validate(&self, board: &Board, start: Position, end: Position) -> Result<bool> {
        self.check_input(board, start, end)?;
        if !self.endpoints_allowed(board, start, end) {
            return Ok(false);
        }

        let graph = self.graph(board)?;
        let mut bfs = Bfs::new(&graph, start);
        while let Some(position) = bfs.next(&graph) {
            trace!("visiting {}", position);
            if position == end {
                debug!("road found from {} to {}", start, end);
                return Ok(true);
            }
        }

        debug!("no road from {} to {}", start, end);
        Ok(false)
    }

    /// The shortest road from `start` to `end`, both included, if one exists.
    ///
    /// The same preconditions as [`Self::validate`] apply, so this is `Some` exactly when that is `true`.
    pub fn route(&self, board: &Board, start: Position, end: Position) -> Result<Option<Vec<Position>>> {
        self.check_input(board, start, end)?;
        if !self.endpoints_allowed(board, start, end) {
            return Ok(None);
        }

        let graph = self.graph(board)?;
        Ok(astar(&graph, start, |position| position == end, |_| 1usize, |_| 0)
            .map(|(_, path)| path))
    }

    /// Every pair of adjacent tiles that joins, regardless of whether it lies on a road from start to end.
    pub fn connections(&self, board: &Board) -> Result<HashSet<UnorderedPair<Position>>> {
        Ok(self.graph(board)?
            .all_edges()
            .map(|(a, b, _)| UnorderedPair(a, b))
            .collect())
    }
}
