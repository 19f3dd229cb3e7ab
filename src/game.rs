use std::fmt::{Display, Formatter};
use std::time::Duration;

use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::board::Board;
use crate::config::Settings;
use crate::editor::TableEditor;
use crate::error::{PuzzleError, Result};
use crate::location::Position;
use crate::solver::PathValidator;
use crate::tile::ConnectionTable;

/// Where a [`Puzzle`] is in its round.
///
/// `Playing → Testing → {Won | Failed} → Playing`, with `Editor` entered from and left back to `Playing`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Phase {
    /// Tiles may be slid and the car sent off.
    Playing,
    /// The car is on its way; the verdict is known but not yet shown.
    Testing,
    /// The road held. A new round starts once the result has been shown.
    Won,
    /// The road broke somewhere.
    Failed,
    /// The connection table is being edited and play is suspended.
    Editor,
}

impl Display for Phase {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Phase::Playing => "playing",
            Phase::Testing => "testing",
            Phase::Won => "won",
            Phase::Failed => "failed",
            Phase::Editor => "editing",
        })
    }
}

/// A board, the table it is judged by, and the round state around them.
///
/// Time only moves when the caller says so through [`Self::advance`], so a UI loop and a test drive it the same way.
pub struct Puzzle {
    board: Board,
    table: ConnectionTable,
    settings: Settings,
    phase: Phase,
    // time left in the current timed phase
    timer: Duration,
    verdict: Option<bool>,
    route: Option<Vec<Position>>,
    moves: usize,
    rng: StdRng,
}

impl Puzzle {
    /// Start playing `board` as given; no shuffle happens here.
    pub fn new(table: ConnectionTable, board: Board, settings: Settings) -> Self {
        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            board,
            table,
            settings,
            phase: Phase::Playing,
            timer: Duration::ZERO,
            verdict: None,
            route: None,
            moves: 0,
            rng,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn table(&self) -> &ConnectionTable {
        &self.table
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Slides made this round.
    pub fn moves(&self) -> usize {
        self.moves
    }

    /// The road the car takes, once a drive has found one.
    pub fn route(&self) -> Option<&[Position]> {
        self.route.as_deref()
    }

    /// Time left before the current timed phase ends. Zero outside `Testing`, `Won` and `Failed`.
    pub fn remaining(&self) -> Duration {
        self.timer
    }

    fn require(&self, phase: Phase) -> Result<()> {
        match self.phase == phase {
            true => Ok(()),
            false => Err(PuzzleError::WrongPhase(self.phase)),
        }
    }

    fn enter(&mut self, phase: Phase, timer: Duration) {
        info!("puzzle {} -> {}", self.phase, phase);
        self.phase = phase;
        self.timer = timer;
    }

    /// Slide the tile at `position` into the gap.
    pub fn click(&mut self, position: Position) -> Result<()> {
        self.require(Phase::Playing)?;
        self.board.slide(position)?;
        self.moves += 1;
        Ok(())
    }

    /// Send the car off. The verdict is decided now and returned, but only shown once the drive time has passed.
    pub fn drive(&mut self) -> Result<bool> {
        self.require(Phase::Playing)?;

        let validator = PathValidator::new(&self.table);
        let route = validator.route(&self.board, self.settings.start, self.settings.end)?;
        let verdict = route.is_some();

        self.verdict = Some(verdict);
        self.route = route;
        self.enter(Phase::Testing, self.settings.drive_duration());

        Ok(verdict)
    }

    /// Let `elapsed` pass, moving through as many timed phases as it covers. Returns the phase afterwards.
    pub fn advance(&mut self, elapsed: Duration) -> Phase {
        let mut elapsed = elapsed;

        while matches!(self.phase, Phase::Testing | Phase::Won | Phase::Failed) {
            if elapsed < self.timer {
                self.timer -= elapsed;
                break;
            }

            elapsed -= self.timer;
            self.finish_timed_phase();
        }

        self.phase
    }

    fn finish_timed_phase(&mut self) {
        match self.phase {
            Phase::Testing => {
                let next = match self.verdict {
                    Some(true) => Phase::Won,
                    _ => Phase::Failed,
                };
                self.enter(next, self.settings.result_duration());
            }
            Phase::Won => {
                self.new_round();
                self.enter(Phase::Playing, Duration::ZERO);
            }
            Phase::Failed => {
                self.verdict = None;
                self.route = None;
                self.enter(Phase::Playing, Duration::ZERO);
            }
            Phase::Playing | Phase::Editor => {}
        }
    }

    /// Shuffle the board and clear the round's counters.
    pub fn new_round(&mut self) {
        self.board.shuffle(&mut self.rng, self.settings.shuffle_moves);
        self.moves = 0;
        self.verdict = None;
        self.route = None;
    }

    /// Suspend play and hand out a copy of the table to edit.
    pub fn enter_editor(&mut self) -> Result<TableEditor> {
        self.require(Phase::Playing)?;
        self.enter(Phase::Editor, Duration::ZERO);
        Ok(self.table.edit())
    }

    /// Swap in the edited table and resume play.
    ///
    /// If the edits do not validate, the old table stays active and the puzzle remains in the editor.
    pub fn commit_editor(&mut self, editor: TableEditor) -> Result<()> {
        self.require(Phase::Editor)?;

        let table = editor.commit().inspect_err(|err| warn!("edited table rejected: {}", err))?;
        // re-resolve by key so the board never carries ids from the old table
        let board = Board::from_snapshot(&table, &self.board.snapshot(&self.table)?)?;

        self.table = table;
        self.board = board;
        self.enter(Phase::Playing, Duration::ZERO);
        Ok(())
    }

    /// Leave the editor without changing the table.
    pub fn cancel_editor(&mut self) -> Result<()> {
        self.require(Phase::Editor)?;
        self.enter(Phase::Playing, Duration::ZERO);
        Ok(())
    }
}
