//! Bindings for running the puzzle in a browser.

use std::time::Duration;

use js_sys::Array;
use wasm_bindgen::prelude::*;

use crate::board::Board;
use crate::config::PuzzleConfig;
use crate::editor::TableEditor;
use crate::game::Puzzle;
use crate::location::Position;
use crate::solver::PathValidator;
use crate::tile::ConnectionTable;

fn positions_to_array(positions: &[Position]) -> Array {
    positions.iter()
        .map(|Position(row, col)| Array::of2(&JsValue::from(*row as u32), &JsValue::from(*col as u32)))
        .collect()
}

/// Check a board given as JSON rows of tile keys against a JSON connection table, using the default start and end cells.
#[wasm_bindgen(js_name = validateBoard)]
pub fn validate_board(table_json: &str, board_json: &str) -> Result<bool, JsError> {
    let table = ConnectionTable::from_json(table_json)?;
    let board = Board::from_snapshot(&table, &serde_json::from_str(board_json)?)?;
    Ok(PathValidator::new(&table).validate(&board, Position::START, Position::END)?)
}

/// A [`Puzzle`] handle for JavaScript.
#[wasm_bindgen]
pub struct WasmPuzzle {
    inner: Puzzle,
}

#[wasm_bindgen]
impl WasmPuzzle {
    /// Load from a JSON configuration, or the bundled one when none is given.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<WasmPuzzle, JsError> {
        let config = match config_json {
            Some(json) => PuzzleConfig::from_json(&json)?,
            None => PuzzleConfig::bundled()?,
        };

        Ok(Self { inner: config.into_puzzle()? })
    }

    pub fn click(&mut self, row: usize, col: usize) -> Result<(), JsError> {
        Ok(self.inner.click(Position(row, col))?)
    }

    pub fn drive(&mut self) -> Result<bool, JsError> {
        Ok(self.inner.drive()?)
    }

    /// Advance the round clock by `elapsed_ms` and return the resulting phase name.
    pub fn advance(&mut self, elapsed_ms: f64) -> String {
        self.inner.advance(Duration::from_millis(elapsed_ms.max(0.0) as u64)).to_string()
    }

    pub fn phase(&self) -> String {
        self.inner.phase().to_string()
    }

    pub fn moves(&self) -> usize {
        self.inner.moves()
    }

    pub fn render(&self) -> Result<String, JsError> {
        Ok(self.inner.board().render(self.inner.table())?)
    }

    /// The board as JSON rows of tile keys, `null` marking the gap.
    pub fn board(&self) -> Result<String, JsError> {
        let snapshot = self.inner.board().snapshot(self.inner.table())?;
        Ok(serde_json::to_string(&snapshot)?)
    }

    /// `[row, col]` pairs of every tile that may slide now.
    pub fn movable(&self) -> Array {
        positions_to_array(&self.inner.board().movable())
    }

    /// `[row, col]` pairs the car drives along, empty if no road was found.
    pub fn route(&self) -> Array {
        positions_to_array(self.inner.route().unwrap_or_default())
    }

    /// Suspend play and return the active table as JSON for editing.
    #[wasm_bindgen(js_name = enterEditor)]
    pub fn enter_editor(&mut self) -> Result<String, JsError> {
        Ok(self.inner.enter_editor()?.to_json()?)
    }

    /// Replace the active table with the edited JSON one and resume play.
    #[wasm_bindgen(js_name = commitEditor)]
    pub fn commit_editor(&mut self, table_json: &str) -> Result<(), JsError> {
        let editor = TableEditor::new(serde_json::from_str(table_json)?);
        Ok(self.inner.commit_editor(editor)?)
    }

    #[wasm_bindgen(js_name = cancelEditor)]
    pub fn cancel_editor(&mut self) -> Result<(), JsError> {
        Ok(self.inner.cancel_editor()?)
    }
}
