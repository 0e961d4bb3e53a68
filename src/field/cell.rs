use std::fmt::{Debug, Display, Formatter};

/// The cell's state.
///
/// A cell can either be open or closed. When closed, it can also either be or not be flagged. An open cell can't hold
/// a flag, which is why the flag lives inside the `Closed` variant.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum CellState {
    /// Represents a closed cell.
    ///
    /// The boolean value indicates whether the cell's flagged (`true`) or not (`false`).
    Closed(bool),
    /// Represents an open cell.
    Open,
}

/// A cell starts closed and not flagged.
impl Default for CellState {
    fn default() -> Self {
        CellState::Closed(false)
    }
}

/// The representation of a cell.
///
/// The mine and the number of mines around are only written while the field is being populated. The state is the only
/// part that changes during the game.
#[derive(Copy, Clone, PartialEq, Eq, Default)]
pub struct Cell {
    /// Whether the cell holds a mine.
    mined: bool,
    /// The number of mined cells among the (up to 8) adjacent ones. Kept for mined cells too.
    mines_around: u8,
    /// The cell's state is either of the `CellState` enum.
    state: CellState,
}

impl Cell {
    /// Creates a new closed un-flagged empty `Cell` instance.
    pub fn new() -> Self {
        Cell::default()
    }

    /// Checks whether the cell is mined.
    pub fn is_mine(&self) -> bool {
        self.mined
    }

    /// Mines the cell.
    pub(crate) fn mine(&mut self) {
        self.mined = true;
    }

    /// Returns the amount of mines around the cell.
    pub fn neighbor_mines(&self) -> u8 {
        self.mines_around
    }

    /// Increments the number representing the amount of mines around the cell.
    pub(crate) fn increment_mines_around_amount(&mut self) {
        self.mines_around += 1;
    }

    /// Checks whether the cell is open.
    pub fn is_revealed(&self) -> bool {
        self.state == CellState::Open
    }

    /// Opens the cell. Opening drops the flag, if any.
    pub(crate) fn open(&mut self) {
        self.state = CellState::Open;
    }

    /// Check whether the cell is flagged.
    pub fn is_flagged(&self) -> bool {
        matches!(self.state, CellState::Closed(true))
    }

    /// Toggles the flag of the cell.
    ///
    /// Won't produce any effect if the cell itself is open.
    pub(crate) fn toggle_flag(&mut self) {
        if let CellState::Closed(is_flagged) = self.state {
            self.state = CellState::Closed(!is_flagged)
        };
    }

    /// Puts a flag on the cell. Won't produce any effect if the cell is open.
    pub(crate) fn set_flag(&mut self) {
        if let CellState::Closed(_) = self.state {
            self.state = CellState::Closed(true)
        };
    }
}

/// The `Debug` implementation displays the closed cells as open.
impl Debug for Cell {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_flagged() {
            return write!(f, "F");
        }

        if self.mined {
            write!(f, "*")
        } else if self.mines_around == 0 {
            write!(f, " ")
        } else {
            write!(f, "{}", self.mines_around)
        }
    }
}

/// The `Display` implementation represents the cell in a real-game fashion.
impl Display for Cell {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.state {
            // In the real game, the cells don't reveal their inner state.
            CellState::Closed(true) => write!(f, "F"),
            CellState::Closed(false) => write!(f, "·"),
            CellState::Open => write!(f, "{:?}", self),
        }
    }
}

#[cfg(test)]
mod test {
    use super::Cell;

    #[test]
    fn new_creates_a_closed_unflagged_empty_cell() {
        let cell = Cell::new();

        assert!(!cell.is_mine());
        assert!(!cell.is_revealed());
        assert!(!cell.is_flagged());
        assert_eq!(cell.neighbor_mines(), 0);
    }

    #[test]
    fn a_default_cell_is_closed_and_unflagged() {
        let cell = Cell::default();

        assert_eq!(cell, Cell::new());
        assert!(!cell.is_revealed());
        assert!(!cell.is_flagged());
    }

    #[test]
    fn mine_correctly_makes_the_cell_a_mine() {
        let mut cell = Cell::new();
        cell.mine();

        assert!(cell.is_mine());
        assert!(!cell.is_revealed());
    }

    #[test]
    fn mined_cells_keep_counting_adjacent_mines() {
        let mut cell = Cell::new();
        cell.mine();
        cell.increment_mines_around_amount();
        cell.increment_mines_around_amount();

        assert_eq!(cell.neighbor_mines(), 2);
    }

    #[test]
    fn toggle_flag_correctly_toggles_the_flag() {
        let mut cell = Cell::new();

        cell.toggle_flag();
        assert!(cell.is_flagged());

        cell.toggle_flag();
        assert!(!cell.is_flagged());
    }

    #[test]
    fn opening_a_flagged_cell_drops_the_flag() {
        let mut cell = Cell::new();
        cell.toggle_flag();
        cell.open();

        assert!(cell.is_revealed());
        assert!(!cell.is_flagged());
    }

    #[test]
    fn flags_can_not_be_put_on_open_cells() {
        let mut cell = Cell::new();
        cell.open();

        cell.toggle_flag();
        assert!(!cell.is_flagged());

        cell.set_flag();
        assert!(!cell.is_flagged());
    }

    #[test]
    fn set_flag_does_not_toggle() {
        let mut cell = Cell::new();
        cell.set_flag();
        cell.set_flag();

        assert!(cell.is_flagged());
    }

    #[test]
    fn display_hides_the_contents_of_closed_cells() {
        let mut cell = Cell::new();
        cell.mine();
        assert_eq!(cell.to_string(), "·");

        cell.toggle_flag();
        assert_eq!(cell.to_string(), "F");
    }

    #[test]
    fn display_shows_the_number_of_open_cells() {
        let mut cell = Cell::new();
        cell.increment_mines_around_amount();
        cell.increment_mines_around_amount();
        cell.increment_mines_around_amount();
        cell.open();

        assert_eq!(cell.to_string(), "3");
    }
}
