pub mod cell;

use cell::Cell;
use rand::Rng;
use std::fmt::{Debug, Display, Formatter};
use thiserror::Error;
use tracing::{debug, warn};

/// The enum represents all the variants of what can possibly go wrong when creating a field.
#[derive(Debug, PartialEq, Eq, Error)]
pub enum FieldError {
    /// Used when the user tries to create a field without rows or without columns.
    #[error("the field needs at least one row and one column")]
    NotEnoughCells,
    /// Used when the required number of mines leaves no cell without a mine.
    ///
    /// The value represents the maximum allowed number of mines for the field with the given dimensions.
    #[error("too many mines, at most {0} fit into the field")]
    InvalidMinesAmount(u16),
}

/// What happened after a batch of cells has been opened.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RevealOutcome {
    /// No mine has been opened. This includes the case when nothing has been opened at all.
    Safe,
    /// A mine has been opened. The opening stops right at it.
    Detonated,
}

/// The field representation.
///
/// The field is basically a grid (a 2D vector) of cells with a known number of mines.
#[derive(Clone, PartialEq, Eq)]
pub struct Field {
    /// The grid of cells of the field. A 2D vector, where the top level represents rows, and the nested vector of each
    /// row represents cells.
    grid: Vec<Vec<Cell>>,
    /// The total number of mined cells (once populated).
    mines_amount: u16,
}

impl Field {
    /// Creates a new [`Field`] with the provided dimensions and number of mines.
    ///
    /// Even though the method accepts the desired mines amount, it doesn't populate the field with them: the cell to
    /// keep safe is only known once the player opens their first cell.
    ///
    /// Fails with [`FieldError::NotEnoughCells`] if either dimension is zero, and with
    /// [`FieldError::InvalidMinesAmount`] if there wouldn't be a single cell left without a mine.
    pub fn new(rows_amount: u8, columns_amount: u8, mines_amount: u16) -> Result<Self, FieldError> {
        let cells_amount = rows_amount as u16 * columns_amount as u16;

        if cells_amount == 0 {
            return Err(FieldError::NotEnoughCells);
        }

        if mines_amount >= cells_amount {
            return Err(FieldError::InvalidMinesAmount(cells_amount - 1));
        }

        let grid = vec![vec![Cell::new(); columns_amount as usize]; rows_amount as usize];

        Ok(Field { grid, mines_amount })
    }

    /// Populates the field with randomly distributed mines, the total amount of which is known from the time when the
    /// field was created.
    ///
    /// Neither the excepted cell nor its neighbours get a mine. When the field is too crowded for that, only the
    /// excepted cell itself is kept safe.
    ///
    /// Coordinates are drawn uniformly and rejected when they hit a mine or the excluded zone.
    pub fn populate_with_mines<R: Rng + ?Sized>(&mut self, excepted_cell_position: (u8, u8), rng: &mut R) {
        let (rows_amount, columns_amount, cells_amount) = self.get_size();

        let mut excluded = self.get_adjacent_cells_positions(excepted_cell_position);
        excluded.push(excepted_cell_position);

        if self.mines_amount > cells_amount - excluded.len() as u16 {
            warn!(
                mines = self.mines_amount,
                cells = cells_amount,
                "Field too crowded to keep the neighbours safe, only the opened cell is excluded"
            );
            excluded = vec![excepted_cell_position];
        }

        let mut mines_placed = 0;

        while mines_placed < self.mines_amount {
            let position = (rng.gen_range(0..rows_amount), rng.gen_range(0..columns_amount));

            if excluded.contains(&position) || self.get_cell(position).is_some_and(|cell| cell.is_mine()) {
                continue;
            }

            self.place_mine(position);
            mines_placed += 1;
        }

        debug!(mines = mines_placed, excepted = ?excepted_cell_position, "Mines placed");
    }

    /// Mines a cell and increments the counters of its neighbours.
    pub(crate) fn place_mine(&mut self, position: (u8, u8)) {
        if let Some(cell) = self.get_cell_mut(position) {
            cell.mine();
        } else {
            return;
        }

        for adjacent_position in self.get_adjacent_cells_positions(position) {
            if let Some(cell) = self.get_cell_mut(adjacent_position) {
                cell.increment_mines_around_amount();
            }
        }
    }

    /// Returns the field's height (the number of rows), width (the number of columns) and the two values multiplied,
    /// which is effectively the total number of cells.
    pub fn get_size(&self) -> (u8, u8, u16) {
        let rows_amount = self.grid.len() as u8;
        let columns_amount = self.grid.first().map(|row| row.len()).unwrap_or(0) as u8;
        let cells_amount = rows_amount as u16 * columns_amount as u16;

        (rows_amount, columns_amount, cells_amount)
    }

    pub fn get_mines_amount(&self) -> u16 {
        self.mines_amount
    }

    /// Returns a read-only cell reference by its position or [`None`] if there's no cell at the given position.
    pub fn get_cell(&self, (row_index, column_index): (u8, u8)) -> Option<&Cell> {
        self.grid
            .get(row_index as usize)
            .and_then(|r| r.get(column_index as usize))
    }

    /// Returns a mutable cell reference by its position or [`None`] if there's no cell at the given position.
    fn get_cell_mut(&mut self, (row_index, column_index): (u8, u8)) -> Option<&mut Cell> {
        self.grid
            .get_mut(row_index as usize)
            .and_then(|r| r.get_mut(column_index as usize))
    }

    /// Returns the positions of the cells adjacent to the given one which actually exist in the field: up to 8 for
    /// inner cells, 5 along the edges and 3 in the corners.
    pub fn get_adjacent_cells_positions(&self, (row_index, column_index): (u8, u8)) -> Vec<(u8, u8)> {
        let (rows_amount, columns_amount, _) = self.get_size();
        // Transform the coordinates into `i16` to be able to subtract and add without overflow.
        let (row_index, column_index) = (row_index as i16, column_index as i16);

        (-1..=1)
            .flat_map(|dr| (-1..=1).map(move |dc| (dr, dc)))
            .filter(|&offset| offset != (0, 0))
            .map(|(dr, dc)| (row_index + dr, column_index + dc))
            .filter(|&(r, c)| r >= 0 && c >= 0 && r < rows_amount as i16 && c < columns_amount as i16)
            .map(|(r, c)| (r as u8, c as u8))
            .collect()
    }

    /// Opens a cell by its position.
    ///
    /// Opening a cell with no mines around also opens its neighbours, which cascades through all the connected cells
    /// with no mines around. Flagged and already open cells are left as they are.
    pub fn open_cell(&mut self, position: (u8, u8)) -> RevealOutcome {
        self.open_cells(vec![position])
    }

    /// Opens all the cells surrounding the target one.
    ///
    /// Is an equivalent of the middle-click in the classic game. The method won't produce any effect if the target
    /// cell is closed or if its numerical value differs from the number of flags placed around it. A cell with no mines
    /// around opens its neighbours unconditionally.
    pub fn open_surrounding_cells(&mut self, position: (u8, u8)) -> RevealOutcome {
        let Some(target_cell) = self.get_cell(position) else {
            return RevealOutcome::Safe;
        };

        if !target_cell.is_revealed() {
            return RevealOutcome::Safe;
        }

        let mines_around = target_cell.neighbor_mines();
        let adjacent_cells_positions = self.get_adjacent_cells_positions(position);

        if mines_around > 0 {
            let flagged_adjacent_cells_amount = adjacent_cells_positions
                .iter()
                .filter_map(|&adjacent_position| self.get_cell(adjacent_position))
                .filter(|adjacent_cell| adjacent_cell.is_flagged())
                .count();

            if flagged_adjacent_cells_amount != mines_around as usize {
                return RevealOutcome::Safe;
            }
        }

        self.open_cells(adjacent_cells_positions)
    }

    /// The work list behind both kinds of opening. Native recursion would go as deep as the whole field on an empty
    /// board, so the pending positions are kept on an explicit stack instead.
    fn open_cells(&mut self, positions: Vec<(u8, u8)>) -> RevealOutcome {
        let mut pending = positions;

        while let Some(position) = pending.pop() {
            let Some(cell) = self.get_cell_mut(position) else {
                continue;
            };

            if cell.is_revealed() || cell.is_flagged() {
                continue;
            }

            cell.open();

            if cell.is_mine() {
                return RevealOutcome::Detonated;
            }

            if cell.neighbor_mines() == 0 {
                pending.extend(self.get_adjacent_cells_positions(position));
            }
        }

        RevealOutcome::Safe
    }

    /// Toggles flag for the closed cell (if any) with the given position.
    ///
    /// Returns the new flag value, or [`None`] if nothing has been toggled.
    pub fn toggle_cell_flag(&mut self, position: (u8, u8)) -> Option<bool> {
        let cell = self.get_cell_mut(position)?;

        if cell.is_revealed() {
            return None;
        }

        cell.toggle_flag();
        Some(cell.is_flagged())
    }

    /// Flags all the closed cells surrounding an open one, but only if their number matches the number of mines around
    /// it (that is, every closed neighbour must be a mine).
    ///
    /// Returns whether the flags have been placed. Already flagged neighbours stay flagged.
    pub fn flag_surrounding_cells(&mut self, position: (u8, u8)) -> bool {
        let Some(target_cell) = self.get_cell(position) else {
            return false;
        };

        let mines_around = target_cell.neighbor_mines();

        if !target_cell.is_revealed() || mines_around == 0 {
            return false;
        }

        let closed_adjacent_cells_positions: Vec<_> = self
            .get_adjacent_cells_positions(position)
            .into_iter()
            .filter(|&adjacent_position| self.get_cell(adjacent_position).is_some_and(|cell| !cell.is_revealed()))
            .collect();

        if closed_adjacent_cells_positions.len() != mines_around as usize {
            return false;
        }

        for adjacent_position in closed_adjacent_cells_positions {
            if let Some(cell) = self.get_cell_mut(adjacent_position) {
                cell.set_flag();
            }
        }

        true
    }

    /// The method returns the total number of all the currently flagged cells in the field.
    pub fn get_flagged_cells_amount(&self) -> u16 {
        self.grid.iter().flatten().filter(|cell| cell.is_flagged()).count() as u16
    }

    /// The method returns the total number of all the open cells in the field.
    pub fn get_revealed_cells_amount(&self) -> u16 {
        self.grid.iter().flatten().filter(|cell| cell.is_revealed()).count() as u16
    }

    /// Checks that all the cells without mines are open. This is effectively the win-condition for the game.
    pub fn check_all_non_mines_open(&self) -> bool {
        let (_, _, cells_amount) = self.get_size();
        self.get_revealed_cells_amount() == cells_amount - self.mines_amount
    }
}

impl Debug for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for row in self.grid.iter() {
            for cell in row {
                write!(f, "{:?} ", cell)?;
            }

            writeln!(f)?;
        }

        Ok(())
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "   ")?;
        for i in 0..self.get_size().1 {
            write!(f, "{:<2}", i % 10)?;
        }

        writeln!(f)?;

        for (i, row) in self.grid.iter().enumerate() {
            write!(f, "{:>2} ", i)?;

            for cell in row {
                write!(f, "{} ", cell)?;
            }

            writeln!(f)?;
        }

        Ok(())
    }
}
