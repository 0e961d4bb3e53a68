pub mod config;
pub mod field;
pub mod leaderboard;
mod stopwatch;

use field::{Field, FieldError, RevealOutcome};
use rand::{rngs::StdRng, SeedableRng};
use std::time::{Duration, Instant};
use stopwatch::Stopwatch;
use thiserror::Error;
use tracing::{debug, info};

/// The enum represents the variants of everything that can possibly go wrong when setting up a game. Once created,
/// a game never fails: the actions which make no sense are simply ignored.
#[derive(Debug, PartialEq, Eq, Error)]
pub enum MinesweeperError {
    /// Something's wrong with the requested field.
    #[error(transparent)]
    Field(#[from] FieldError),
}

/// The status of a game.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum MinesweeperStatus {
    /// After the field has been created, but before it has been populated with mines on the first opened cell.
    Pre,
    /// An ongoing game.
    On,
    /// A finished game. `true` for victory, `false` for loss.
    End(bool),
}

/// Describes all the possible actions a player can take.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MinesweeperAction {
    /// A request to open a cell by its position. Opening an already open cell opens its surroundings instead.
    Reveal((u8, u8)),
    /// A request to flag a cell by its position. Flagging an open cell flags its surroundings instead.
    Flag((u8, u8)),
    /// Ends the game with a victory right away. Only meant for the cheat mode.
    ForceWin,
}

/// The struct representing a Minesweeper game itself.
#[derive(Debug)]
pub struct Minesweeper {
    /// The field used in the game.
    field: Field,
    /// The game status.
    status: MinesweeperStatus,
    /// The number of the cells flagged so far. Can exceed the number of mines.
    flags_amount: u16,
    /// The in-game stopwatch. It's started as soon as the first cell gets opened and is frozen when the game ends.
    stopwatch: Stopwatch,
    /// The source of the mines' positions.
    rng: StdRng,
}

impl Minesweeper {
    /// Creates a game on an empty field. The mines are placed on the first opened cell.
    pub fn new(rows_amount: u8, columns_amount: u8, mines_amount: u16) -> Result<Self, MinesweeperError> {
        Self::with_rng(rows_amount, columns_amount, mines_amount, StdRng::from_entropy())
    }

    /// Same as [`Minesweeper::new`], but the mines' layout is fully determined by the seed.
    pub fn with_seed(
        rows_amount: u8,
        columns_amount: u8,
        mines_amount: u16,
        seed: u64,
    ) -> Result<Self, MinesweeperError> {
        Self::with_rng(rows_amount, columns_amount, mines_amount, StdRng::seed_from_u64(seed))
    }

    fn with_rng(
        rows_amount: u8,
        columns_amount: u8,
        mines_amount: u16,
        rng: StdRng,
    ) -> Result<Self, MinesweeperError> {
        let field = Field::new(rows_amount, columns_amount, mines_amount)?;

        Ok(Minesweeper {
            field,
            status: MinesweeperStatus::Pre,
            flags_amount: 0,
            stopwatch: Stopwatch::default(),
            rng,
        })
    }

    /// A fresh game with the same dimensions and number of mines.
    pub fn restart(&self) -> Result<Self, MinesweeperError> {
        Self::new(self.rows(), self.columns(), self.mines_amount())
    }

    /// The method performs the requested action and returns the status of the game afterwards.
    pub fn take_action(&mut self, action: MinesweeperAction) -> MinesweeperStatus {
        match action {
            MinesweeperAction::Reveal(position) => self.reveal(position),
            MinesweeperAction::Flag(position) => self.flag(position),
            MinesweeperAction::ForceWin => self.force_win(),
        };

        self.status
    }

    /// Opens a cell.
    ///
    /// The very first opening places the mines around the cell and starts the clock, even when the cell is flagged and
    /// stays closed. Opening an open cell tries to open its surroundings (see [`Minesweeper::reveal_neighbors`]).
    /// Nothing happens for flagged cells, for positions outside the field and after the game has ended.
    pub fn reveal(&mut self, position: (u8, u8)) {
        if self.is_game_over() {
            return;
        }

        if self.field.get_cell(position).is_none() {
            return;
        }

        if self.status == MinesweeperStatus::Pre {
            self.start(position);
        }

        let Some(cell) = self.field.get_cell(position) else {
            return;
        };
        let (is_revealed, is_flagged) = (cell.is_revealed(), cell.is_flagged());

        if is_flagged {
            return;
        }

        if is_revealed {
            self.reveal_neighbors(position);
            return;
        }

        let outcome = self.field.open_cell(position);
        self.settle(outcome);
    }

    /// Opens the cells surrounding an open one, provided that the number of flags around it matches the number of mines
    /// around it. A cell without mines around opens its surroundings unconditionally.
    pub fn reveal_neighbors(&mut self, position: (u8, u8)) {
        if self.is_game_over() {
            return;
        }

        let outcome = self.field.open_surrounding_cells(position);
        self.settle(outcome);
    }

    /// Toggles the flag of a closed cell. Flagging an open cell tries to flag its surroundings instead (see
    /// [`Minesweeper::flag_neighbors`]).
    pub fn flag(&mut self, position: (u8, u8)) {
        if self.is_game_over() {
            return;
        }

        let Some(cell) = self.field.get_cell(position) else {
            return;
        };

        if cell.is_revealed() {
            self.flag_neighbors(position);
            return;
        }

        match self.field.toggle_cell_flag(position) {
            Some(true) => self.flags_amount += 1,
            Some(false) => self.flags_amount = self.flags_amount.saturating_sub(1),
            None => (),
        }
    }

    /// Flags all the closed cells around an open one when each of them must be a mine.
    ///
    /// The flags counter is recounted from the field afterwards, so it stays in sync with the single-cell flagging.
    pub fn flag_neighbors(&mut self, position: (u8, u8)) {
        if self.is_game_over() {
            return;
        }

        if self.field.flag_surrounding_cells(position) {
            self.flags_amount = self.field.get_flagged_cells_amount();
        }
    }

    /// Ends the game with a victory.
    pub fn force_win(&mut self) {
        if self.is_game_over() {
            return;
        }

        info!("Victory forced");
        self.finish(true);
    }

    /// The number of the open cells.
    pub fn revealed_cells(&self) -> u16 {
        self.field.get_revealed_cells_amount()
    }

    /// Restarts the clock from now.
    pub fn start_timer(&mut self) {
        self.stopwatch.start();
    }

    /// Freezes the clock.
    pub fn stop_timer(&mut self) {
        self.stopwatch.stop();
    }

    /// Zero before the first move, running during the game and frozen once it has ended.
    pub fn elapsed_time(&self) -> Duration {
        self.stopwatch.get_elapsed_time()
    }

    /// Between the first opened cell and the end of the game.
    pub fn is_timer_running(&self) -> bool {
        self.stopwatch.is_running()
    }

    /// The moment the first cell has been opened.
    pub fn start_time(&self) -> Option<Instant> {
        self.stopwatch.get_start_time()
    }

    pub fn get_field(&self) -> &Field {
        &self.field
    }

    pub fn get_status(&self) -> MinesweeperStatus {
        self.status
    }

    pub fn rows(&self) -> u8 {
        self.field.get_size().0
    }

    pub fn columns(&self) -> u8 {
        self.field.get_size().1
    }

    pub fn mines_amount(&self) -> u16 {
        self.field.get_mines_amount()
    }

    pub fn flags_amount(&self) -> u16 {
        self.flags_amount
    }

    pub fn is_first_move(&self) -> bool {
        self.status == MinesweeperStatus::Pre
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self.status, MinesweeperStatus::End(_))
    }

    pub fn is_game_won(&self) -> bool {
        self.status == MinesweeperStatus::End(true)
    }

    /// Places the mines around the first opened cell and starts the clock.
    fn start(&mut self, position: (u8, u8)) {
        debug!(?position, "First move");
        self.field.populate_with_mines(position, &mut self.rng);
        self.status = MinesweeperStatus::On;
        self.start_timer();
    }

    /// Updates the status after some cells have been opened.
    fn settle(&mut self, outcome: RevealOutcome) {
        match outcome {
            RevealOutcome::Detonated => self.finish(false),
            RevealOutcome::Safe if self.field.check_all_non_mines_open() => self.finish(true),
            RevealOutcome::Safe => (),
        }
    }

    fn finish(&mut self, victory: bool) {
        self.status = MinesweeperStatus::End(victory);
        self.stop_timer();

        info!(
            victory,
            elapsed_ms = self.elapsed_time().as_millis() as u64,
            revealed = self.revealed_cells(),
            "Game over"
        );
    }

    #[cfg(test)]
    fn with_field(field: Field) -> Self {
        debug!(size = ?field.get_size(), "Game over a prepared field");

        let mut stopwatch = Stopwatch::default();
        stopwatch.start();

        Minesweeper {
            field,
            status: MinesweeperStatus::On,
            flags_amount: 0,
            stopwatch,
            rng: StdRng::seed_from_u64(0),
        }
    }
}
