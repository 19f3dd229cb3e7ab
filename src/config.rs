use std::path::Path;
use std::time::Duration;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::board::{Board, BoardSnapshot};
use crate::error::Result;
use crate::game::Puzzle;
use crate::location::Position;
use crate::tile::{ConnectionTable, TableSpec};

const BUNDLED: &str = include_str!("../assets/puzzle.json");

/// Tunables for a [`Puzzle`]. Every field may be left out of the JSON.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Cell the road has to start from.
    pub start: Position,
    /// Cell the road has to arrive at.
    pub end: Position,
    /// How long the car drives before the verdict shows.
    pub drive_duration_ms: u64,
    /// How long a win or loss is shown before play resumes.
    pub result_duration_ms: u64,
    /// Random slides per shuffle.
    pub shuffle_moves: usize,
    /// Shuffle the layout before the first round.
    pub shuffle_on_start: bool,
    /// Fixed seed for shuffling; random if absent.
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            start: Position::START,
            end: Position::END,
            drive_duration_ms: 1500,
            result_duration_ms: 2000,
            shuffle_moves: 60,
            shuffle_on_start: true,
            seed: None,
        }
    }
}

impl Settings {
    pub fn drive_duration(&self) -> Duration {
        Duration::from_millis(self.drive_duration_ms)
    }

    pub fn result_duration(&self) -> Duration {
        Duration::from_millis(self.result_duration_ms)
    }
}

/// Everything needed to set up a [`Puzzle`]: settings, the connection table, and the starting layout.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PuzzleConfig {
    #[serde(default)]
    pub settings: Settings,
    pub table: TableSpec,
    pub layout: BoardSnapshot,
}

impl PuzzleConfig {
    /// The configuration shipped with the crate.
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        debug!("reading puzzle configuration from {}", path.as_ref().display());
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    /// Resolve the connection table.
    pub fn table(&self) -> Result<ConnectionTable> {
        ConnectionTable::from_spec(&self.table)
    }

    /// Resolve the starting layout against `table`.
    pub fn board(&self, table: &ConnectionTable) -> Result<Board> {
        Board::from_snapshot(table, &self.layout)
    }

    /// Build a ready-to-play [`Puzzle`], shuffled if the settings ask for it.
    pub fn into_puzzle(self) -> Result<Puzzle> {
        let table = self.table()?;
        let board = self.board(&table)?;
        let shuffle = self.settings.shuffle_on_start;

        let mut puzzle = Puzzle::new(table, board, self.settings);
        if shuffle {
            puzzle.new_round();
        }

        Ok(puzzle)
    }
}
