//! The terminal application

use crate::game_ui::render_game;
use crate::leaderboard_ui::render_leaderboard;
use crate::tui::Render;
use crate::update::MoveCursorDirection;
use ratatui::widgets::TableState;
use ratatui::Frame;
use std::cmp;
use std::time::Duration;
use tracing::{debug, error, info};
use visweeper::config::{BoardSize, GameConfig};
use visweeper::leaderboard::{Entry, Leaderboard};
use visweeper::{Minesweeper, MinesweeperError};

/// The hint flashed when the arrows are pressed without the arrow keys being enabled.
pub const ARROW_KEYS_HINT: &str = "h← j↓ k↑ l→";
/// The longest accepted player name.
pub const NAME_MAX_LENGTH: usize = 20;
/// The longest accepted count prefix.
const COUNT_PREFIX_MAX_LENGTH: usize = 4;

/// The terminal application
#[derive(Debug)]
pub struct App {
    /// The app can be represented by one variant at a time.
    pub variant: AppVariant,
    /// Indicates that the main application loop should be broken on the next tick and thus the app should quit.
    pub should_quit: bool,
    /// The startup configuration. Only the board size ever changes: the leaderboard can restart the game with a
    /// different one.
    config: GameConfig,
    leaderboard: Leaderboard,
}

impl App {
    /// Starts with a new game, or with the leaderboard when the scores have been asked for.
    pub fn new(config: GameConfig, leaderboard: Leaderboard, show_scores: bool) -> Result<App, MinesweeperError> {
        let variant = if show_scores {
            AppVariant::InLeaderboard(AppLeaderboard::new(config.size, leaderboard.clone(), None))
        } else {
            AppVariant::InGame(AppGame::new(config)?)
        };

        Ok(App {
            variant,
            should_quit: false,
            config,
            leaderboard,
        })
    }

    /// Moves between the views when the current one is done.
    pub fn tick(&mut self) -> Result<(), MinesweeperError> {
        match &self.variant {
            AppVariant::InGame(game) if game.should_quit => self.quit(),
            AppVariant::InGame(game) if game.game.is_game_won() && self.config.is_score_eligible() => {
                let time = game.game.elapsed_time();
                info!(size = self.config.size.label(), ms = time.as_millis() as u64, "Eligible win");

                self.variant = AppVariant::InLeaderboard(AppLeaderboard::new(
                    self.config.size,
                    self.leaderboard.clone(),
                    Some(time),
                ));
            }
            AppVariant::InLeaderboard(board) if board.should_quit => self.quit(),
            AppVariant::InLeaderboard(board) if board.wants_restart => {
                self.config.size = board.size;
                self.variant = AppVariant::InGame(AppGame::new(self.config)?);
            }
            _ => (),
        };

        Ok(())
    }

    /// Quit the application altogether.
    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}

impl Render for App {
    fn render(&mut self, frame: &mut Frame) {
        match &mut self.variant {
            AppVariant::InGame(game) => render_game(game, frame),
            AppVariant::InLeaderboard(board) => render_leaderboard(board, frame),
        }
    }
}

/// The current application variant.
#[derive(Debug)]
pub enum AppVariant {
    /// When the game's being displayed
    InGame(AppGame),
    /// When the scores are being displayed
    InLeaderboard(AppLeaderboard),
}

/// The Game app variant
#[derive(Debug)]
pub struct AppGame {
    /// The game instance.
    pub game: Minesweeper,
    pub config: GameConfig,
    /// The position of the currently selected cell relative to the whole field.
    pub cursor_position: (u8, u8),
    /// The amounts of rows and columns that fit into the terminal. Updated on every render.
    pub visible_size: (u8, u8),
    /// The first visible row and column. The window slides so that the cursor always stays in it.
    pub window_offset: (u8, u8),
    /// The digits typed so far, repeating the next move that many times (e.g. `5l`).
    pub count_prefix: String,
    /// A one-shot message replacing the progress bar on the next render.
    pub message: Option<String>,
    /// Shows the mines (cheat mode only).
    pub show_mines: bool,
    pub show_help: bool,
    pub should_quit: bool,
}

impl AppGame {
    pub fn new(config: GameConfig) -> Result<Self, MinesweeperError> {
        let (rows_amount, columns_amount) = config.size.dimensions();
        let game = Minesweeper::new(rows_amount, columns_amount, config.mines_amount())?;

        info!(size = config.size.label(), mines = game.mines_amount(), "New game");

        Ok(AppGame {
            game,
            config,
            cursor_position: (
                (rows_amount / 2).saturating_sub(1),
                (columns_amount / 2).saturating_sub(1),
            ),
            visible_size: (rows_amount, columns_amount),
            window_offset: (0, 0),
            count_prefix: String::new(),
            message: None,
            show_mines: false,
            show_help: false,
            should_quit: false,
        })
    }

    /// Moves the cursor, as many cells as the count prefix says (one if there's none), stopping at the edges.
    pub fn move_cursor(&mut self, direction: MoveCursorDirection) {
        let count = self.take_count() as i32;
        let (rows_amount, columns_amount, _) = self.game.get_field().get_size();
        let (cy, cx) = (self.cursor_position.0 as i32, self.cursor_position.1 as i32);

        let (cy, cx) = match direction {
            MoveCursorDirection::Up => (cy - count, cx),
            MoveCursorDirection::Left => (cy, cx - count),
            MoveCursorDirection::Down => (cy + count, cx),
            MoveCursorDirection::Right => (cy, cx + count),
        };

        self.cursor_position = (
            cy.clamp(0, rows_amount as i32 - 1) as u8,
            cx.clamp(0, columns_amount as i32 - 1) as u8,
        );

        self.scroll_to_cursor();
    }

    /// Arrow keys only move the cursor when they've been enabled at startup.
    pub fn move_cursor_with_arrow(&mut self, direction: MoveCursorDirection) {
        if self.config.arrow_keys {
            self.move_cursor(direction);
        } else {
            self.message = Some(ARROW_KEYS_HINT.to_string());
        }
    }

    /// Appends a digit to the count prefix. A leading zero is ignored.
    pub fn push_count_digit(&mut self, digit: char) {
        if !digit.is_ascii_digit() || (digit == '0' && self.count_prefix.is_empty()) {
            return;
        }

        if self.count_prefix.len() < COUNT_PREFIX_MAX_LENGTH {
            self.count_prefix.push(digit);
        }
    }

    fn take_count(&mut self) -> u16 {
        let count = std::mem::take(&mut self.count_prefix);
        count.parse().unwrap_or(1)
    }

    pub fn reveal(&mut self) {
        debug!(position = ?self.cursor_position, "Reveal");
        self.game.reveal(self.cursor_position);
    }

    pub fn flag(&mut self) {
        debug!(position = ?self.cursor_position, "Flag");
        self.game.flag(self.cursor_position);
    }

    /// A fresh game on the same board. The cursor stays where it is.
    pub fn restart(&mut self) -> Result<(), MinesweeperError> {
        self.game = self.game.restart()?;
        self.show_mines = false;
        self.count_prefix.clear();

        info!("Game restarted");
        Ok(())
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn toggle_mines(&mut self) {
        if self.config.cheat {
            self.show_mines = !self.show_mines;
        }
    }

    pub fn force_win(&mut self) {
        if self.config.cheat {
            self.game.force_win();
        }
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Stores how much of the field fits into the terminal and slides the window accordingly.
    pub fn set_visible_size(&mut self, visible_rows_amount: u8, visible_columns_amount: u8) {
        let (rows_amount, columns_amount, _) = self.game.get_field().get_size();

        self.visible_size = (
            visible_rows_amount.clamp(1, rows_amount),
            visible_columns_amount.clamp(1, columns_amount),
        );

        self.scroll_to_cursor();
    }

    fn scroll_to_cursor(&mut self) {
        fn slide(offset: u8, cursor: u8, visible: u8, total: u8) -> u8 {
            let offset = if cursor < offset {
                cursor
            } else if cursor >= offset + visible {
                cursor + 1 - visible
            } else {
                offset
            };

            cmp::min(offset, total - visible)
        }

        let (rows_amount, columns_amount, _) = self.game.get_field().get_size();
        let (visible_rows_amount, visible_columns_amount) = self.visible_size;

        self.window_offset = (
            slide(self.window_offset.0, self.cursor_position.0, visible_rows_amount, rows_amount),
            slide(self.window_offset.1, self.cursor_position.1, visible_columns_amount, columns_amount),
        );
    }
}

/// The Leaderboard app variant
#[derive(Debug)]
pub struct AppLeaderboard {
    /// The board size which results are shown.
    pub size: BoardSize,
    /// The results, or the message of what went wrong when loading them.
    pub entries: Result<Vec<Entry>, String>,
    /// The time waiting to be submitted along with the player's name.
    pub pending_time: Option<Duration>,
    pub name: String,
    /// Whether the keys go to the name box (`true`) or to the table (`false`).
    pub name_focused: bool,
    /// Set after an attempt to submit an empty name.
    pub name_rejected: bool,
    pub table_state: TableState,
    pub wants_restart: bool,
    pub should_quit: bool,
    leaderboard: Leaderboard,
}

impl AppLeaderboard {
    pub fn new(size: BoardSize, leaderboard: Leaderboard, pending_time: Option<Duration>) -> Self {
        let mut board = AppLeaderboard {
            size,
            entries: Ok(vec![]),
            pending_time,
            name: String::new(),
            name_focused: pending_time.is_some(),
            name_rejected: false,
            table_state: TableState::default(),
            wants_restart: false,
            should_quit: false,
            leaderboard,
        };

        board.reload();
        board
    }

    fn reload(&mut self) {
        self.entries = self.leaderboard.get_all(self.size).map_err(|err| {
            error!(%err, size = self.size.label(), "Couldn't load the scores");
            err.to_string()
        });

        let has_entries = self.entries.as_ref().is_ok_and(|entries| !entries.is_empty());
        self.table_state.select(has_entries.then_some(0));
    }

    /// Moves the focus between the name box and the table. Only possible while a name is expected.
    pub fn switch_focus(&mut self) {
        if self.pending_time.is_some() {
            self.name_focused = !self.name_focused;
        }
    }

    pub fn push_name_char(&mut self, c: char) {
        if self.name.chars().count() < NAME_MAX_LENGTH && !c.is_control() {
            self.name.push(c);
        }
    }

    pub fn pop_name_char(&mut self) {
        self.name.pop();
    }

    /// Records the pending time under the typed name. An empty name is refused.
    pub fn submit(&mut self) {
        let Some(time) = self.pending_time else {
            return;
        };

        let name = self.name.trim();
        if name.is_empty() {
            self.name_rejected = true;
            return;
        }

        if let Err(err) = self.leaderboard.insert(self.size, name, time) {
            error!(%err, "Couldn't record the score");
        }

        self.pending_time = None;
        self.name_focused = false;
        self.reload();
    }

    /// Removes all the results of the shown board size.
    pub fn clear(&mut self) {
        if let Err(err) = self.leaderboard.clear(self.size) {
            error!(%err, "Couldn't clear the scores");
        }

        self.reload();
    }

    /// Shows the next board size, unless a time is waiting to be submitted for the current one.
    pub fn cycle_size(&mut self) {
        if self.pending_time.is_none() {
            self.size = self.size.next();
            self.reload();
        }
    }

    pub fn select_next(&mut self) {
        let len = self.entries.as_ref().map_or(0, Vec::len);
        if len > 0 {
            let next = self.table_state.selected().map_or(0, |i| cmp::min(i + 1, len - 1));
            self.table_state.select(Some(next));
        }
    }

    pub fn select_previous(&mut self) {
        if let Some(selected) = self.table_state.selected() {
            self.table_state.select(Some(selected.saturating_sub(1)));
        }
    }

    pub fn restart(&mut self) {
        self.wants_restart = true;
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}

#[cfg(test)]
mod test {
    use super::{AppGame, AppLeaderboard, ARROW_KEYS_HINT};
    use crate::update::MoveCursorDirection::{Down, Left, Right, Up};
    use std::time::Duration;
    use tempfile::TempDir;
    use visweeper::config::{BoardSize, GameConfig};
    use visweeper::leaderboard::Leaderboard;

    fn open_leaderboard() -> (TempDir, Leaderboard) {
        let dir = tempfile::tempdir().unwrap();
        let leaderboard = Leaderboard::open(dir.path().join("leaderboard.db")).unwrap();
        (dir, leaderboard)
    }

    #[test]
    fn the_cursor_starts_in_the_middle() {
        let app = AppGame::new(GameConfig::default()).unwrap();

        assert_eq!(app.cursor_position, (4, 4));
    }

    #[test]
    fn the_cursor_stops_at_the_edges() {
        let mut app = AppGame::new(GameConfig::default()).unwrap();

        for _ in 0..20 {
            app.move_cursor(Up);
            app.move_cursor(Left);
        }
        assert_eq!(app.cursor_position, (0, 0));

        for _ in 0..20 {
            app.move_cursor(Down);
            app.move_cursor(Right);
        }
        assert_eq!(app.cursor_position, (9, 9));
    }

    #[test]
    fn the_count_prefix_repeats_the_move_once() {
        let mut app = AppGame::new(GameConfig::default()).unwrap();

        app.push_count_digit('3');
        app.move_cursor(Right);
        assert_eq!(app.cursor_position, (4, 7));
        assert!(app.count_prefix.is_empty());

        app.move_cursor(Right);
        assert_eq!(app.cursor_position, (4, 8));

        app.push_count_digit('1');
        app.push_count_digit('0');
        app.move_cursor(Up);
        assert_eq!(app.cursor_position, (0, 8));
    }

    #[test]
    fn a_leading_zero_is_ignored() {
        let mut app = AppGame::new(GameConfig::default()).unwrap();
        app.push_count_digit('0');
        app.push_count_digit('2');

        assert_eq!(app.count_prefix, "2");
    }

    #[test]
    fn arrows_are_hinted_unless_enabled() {
        let mut app = AppGame::new(GameConfig::default()).unwrap();
        app.move_cursor_with_arrow(Down);

        assert_eq!(app.cursor_position, (4, 4));
        assert_eq!(app.message.as_deref(), Some(ARROW_KEYS_HINT));

        let mut app = AppGame::new(GameConfig {
            arrow_keys: true,
            ..GameConfig::default()
        })
        .unwrap();
        app.move_cursor_with_arrow(Down);

        assert_eq!(app.cursor_position, (5, 4));
        assert!(app.message.is_none());
    }

    #[test]
    fn cheats_need_the_cheat_mode() {
        let mut app = AppGame::new(GameConfig::default()).unwrap();
        app.toggle_mines();
        app.force_win();

        assert!(!app.show_mines);
        assert!(!app.game.is_game_over());

        let mut app = AppGame::new(GameConfig {
            cheat: true,
            ..GameConfig::default()
        })
        .unwrap();
        app.toggle_mines();
        app.force_win();

        assert!(app.show_mines);
        assert!(app.game.is_game_won());
    }

    #[test]
    fn restart_hides_the_mines_again() {
        let mut app = AppGame::new(GameConfig {
            cheat: true,
            ..GameConfig::default()
        })
        .unwrap();
        app.toggle_mines();
        app.reveal();

        app.restart().unwrap();

        assert!(!app.show_mines);
        assert!(app.game.is_first_move());
    }

    #[test]
    fn the_window_follows_the_cursor() {
        let mut app = AppGame::new(GameConfig {
            size: BoardSize::ExtraLarge,
            ..GameConfig::default()
        })
        .unwrap();
        app.set_visible_size(10, 20);
        // the cursor starts at (17, 17)
        assert_eq!(app.window_offset, (8, 0));

        app.push_count_digit('9');
        app.move_cursor(Right);
        assert_eq!(app.cursor_position, (17, 26));
        assert_eq!(app.window_offset, (8, 7));

        for _ in 0..40 {
            app.move_cursor(Up);
        }
        assert_eq!(app.window_offset, (0, 7));
    }

    #[test]
    fn the_window_never_goes_past_the_field() {
        let mut app = AppGame::new(GameConfig::default()).unwrap();
        app.set_visible_size(200, 200);

        assert_eq!(app.visible_size, (10, 10));
        assert_eq!(app.window_offset, (0, 0));
    }

    #[test]
    fn an_empty_name_is_refused() {
        let (_db, leaderboard) = open_leaderboard();
        let mut board = AppLeaderboard::new(BoardSize::Small, leaderboard, Some(Duration::from_secs(30)));

        board.push_name_char(' ');
        board.submit();

        assert!(board.name_rejected);
        assert!(board.pending_time.is_some());
        assert_eq!(board.entries, Ok(vec![]));
    }

    #[test]
    fn submitting_records_the_time_and_shows_it() {
        let (_db, leaderboard) = open_leaderboard();
        let mut board = AppLeaderboard::new(BoardSize::Medium, leaderboard, Some(Duration::from_secs(75)));
        assert!(board.name_focused);

        "Eve".chars().for_each(|c| board.push_name_char(c));
        board.submit();

        assert!(board.pending_time.is_none());
        assert!(!board.name_focused);
        let entries = board.entries.clone().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "Eve");
        assert_eq!(entries[0].time, Duration::from_secs(75));
        assert_eq!(board.table_state.selected(), Some(0));
    }

    #[test]
    fn the_name_length_is_limited() {
        let (_db, leaderboard) = open_leaderboard();
        let mut board = AppLeaderboard::new(BoardSize::Small, leaderboard, Some(Duration::from_secs(1)));

        (0..30).for_each(|_| board.push_name_char('x'));
        assert_eq!(board.name.len(), super::NAME_MAX_LENGTH);

        board.pop_name_char();
        assert_eq!(board.name.len(), super::NAME_MAX_LENGTH - 1);
    }

    #[test]
    fn the_size_is_locked_while_a_time_is_pending() {
        let (_db, leaderboard) = open_leaderboard();
        let mut board = AppLeaderboard::new(BoardSize::Large, leaderboard, Some(Duration::from_secs(1)));

        board.cycle_size();
        assert_eq!(board.size, BoardSize::Large);

        board.pending_time = None;
        board.cycle_size();
        assert_eq!(board.size, BoardSize::ExtraLarge);
    }

    #[test]
    fn the_focus_only_switches_while_a_name_is_expected() {
        let (_db, leaderboard) = open_leaderboard();
        let mut board = AppLeaderboard::new(BoardSize::Small, leaderboard.clone(), None);

        board.switch_focus();
        assert!(!board.name_focused);

        let mut board = AppLeaderboard::new(BoardSize::Small, leaderboard, Some(Duration::from_secs(1)));
        board.switch_focus();
        assert!(!board.name_focused);
        board.switch_focus();
        assert!(board.name_focused);
    }

    #[test]
    fn clear_empties_the_shown_size() {
        let (_db, leaderboard) = open_leaderboard();
        leaderboard.insert(BoardSize::Small, "A", Duration::from_secs(5)).unwrap();
        leaderboard.insert(BoardSize::Medium, "B", Duration::from_secs(5)).unwrap();

        let mut board = AppLeaderboard::new(BoardSize::Small, leaderboard.clone(), None);
        assert_eq!(board.entries.as_ref().map(Vec::len), Ok(1));

        board.clear();

        assert_eq!(board.entries, Ok(vec![]));
        assert_eq!(board.table_state.selected(), None);
        assert_eq!(leaderboard.get_all(BoardSize::Medium).unwrap().len(), 1);
    }
}
