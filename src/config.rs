//! The startup configuration of a game: the board preset, the density of mines and the modes which disqualify a game
//! from the leaderboard.

use std::fmt::{Display, Formatter};
use thiserror::Error;

/// The percentage of cells holding a mine when nothing else is requested.
pub const DEFAULT_MINE_PERCENT: u8 = 16;

/// Everything that can be wrong with the startup configuration.
#[derive(Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The density of mines must be a percentage.
    #[error("the mine percentage must be between 0 and 100, got {0}")]
    InvalidMinePercent(u8),
}

/// The board presets. The label of a preset doubles as its leaderboard category.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BoardSize {
    /// 10x10
    #[default]
    Small,
    /// 16x16
    Medium,
    /// 16x30
    Large,
    /// 36x36
    ExtraLarge,
}

impl BoardSize {
    pub const ALL: [BoardSize; 4] = [
        BoardSize::Small,
        BoardSize::Medium,
        BoardSize::Large,
        BoardSize::ExtraLarge,
    ];

    /// The amounts of rows and columns respectively.
    pub fn dimensions(&self) -> (u8, u8) {
        match self {
            BoardSize::Small => (10, 10),
            BoardSize::Medium => (16, 16),
            BoardSize::Large => (16, 30),
            BoardSize::ExtraLarge => (36, 36),
        }
    }

    /// The short name, which is also the key the scores are stored under.
    pub fn label(&self) -> &'static str {
        match self {
            BoardSize::Small => "S",
            BoardSize::Medium => "M",
            BoardSize::Large => "L",
            BoardSize::ExtraLarge => "XL",
        }
    }

    /// The next preset, wrapping around after the largest one.
    pub fn next(&self) -> BoardSize {
        let index = BoardSize::ALL.iter().position(|size| size == self).unwrap_or(0);
        BoardSize::ALL[(index + 1) % BoardSize::ALL.len()]
    }
}

/// The label along with the dimensions, e.g. `L (16x30)`.
impl Display for BoardSize {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let (rows, columns) = self.dimensions();
        write!(f, "{} ({}x{})", self.label(), rows, columns)
    }
}

/// The options a game is started with.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub size: BoardSize,
    /// The share of cells holding a mine, in percents.
    pub mine_percent: u8,
    /// Allows peeking at the mines and winning on demand.
    pub cheat: bool,
    /// Allows moving the cursor with the arrow keys.
    pub arrow_keys: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            size: BoardSize::default(),
            mine_percent: DEFAULT_MINE_PERCENT,
            cheat: false,
            arrow_keys: false,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.mine_percent > 100 {
            return Err(ConfigError::InvalidMinePercent(self.mine_percent));
        }

        Ok(())
    }

    /// The number of mines for the chosen board, rounded down.
    pub fn mines_amount(&self) -> u16 {
        let (rows, columns) = self.size.dimensions();
        let cells = rows as u32 * columns as u32;

        (cells * self.mine_percent as u32 / 100) as u16
    }

    /// Only the games played with the default density and without any assistance make it to the leaderboard.
    pub fn is_score_eligible(&self) -> bool {
        self.mine_percent == DEFAULT_MINE_PERCENT && !self.cheat && !self.arrow_keys
    }
}
