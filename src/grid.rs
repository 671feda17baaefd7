use std::fmt::{Debug, Display, Formatter};

use crate::board::Color;
use crate::error::{ConfigError, MoveError};
use crate::symmetry::D1Symmetry;

/// The column-drop grid, row 0 is the top and `rows - 1` is the bottom.
///
/// Cells are write-once: the only mutation is [Grid::apply_move],
/// which fills the lowest empty cell of a column.
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct Grid {
    columns: usize,
    rows: usize,
    cells: Vec<Option<Color>>,
}

impl Grid {
    pub const MIN_SIZE: usize = 4;
    pub const MAX_SIZE: usize = 10;
    /// The row count used by the local and bot modes.
    pub const DEFAULT_ROWS: usize = 6;

    /// Construct an empty grid, both dimensions must be in `MIN_SIZE..=MAX_SIZE`.
    pub fn new(columns: usize, rows: usize) -> Result<Self, ConfigError> {
        check_size("columns", columns)?;
        check_size("rows", rows)?;
        Ok(Grid {
            columns,
            rows,
            cells: vec![None; columns * rows],
        })
    }

    /// A `size x size` grid, as used by networked games.
    pub fn square(size: usize) -> Result<Self, ConfigError> {
        Grid::new(size, size)
    }

    /// A grid with the given number of columns and [Grid::DEFAULT_ROWS] rows.
    pub fn with_columns(columns: usize) -> Result<Self, ConfigError> {
        Grid::new(columns, Self::DEFAULT_ROWS)
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// The piece at `(row, col)`. Panics if the coordinate is out of bounds.
    pub fn cell(&self, row: usize, col: usize) -> Option<Color> {
        self.cells[self.index(row, col)]
    }

    /// A column is playable iff it exists and its top cell is empty.
    pub fn is_column_playable(&self, column: usize) -> bool {
        column < self.columns && self.cell(0, column).is_none()
    }

    /// The row a piece dropped in `column` would land on.
    pub fn landing_row(&self, column: usize) -> Option<usize> {
        if column >= self.columns {
            return None;
        }
        (0..self.rows).rev().find(|&row| self.cell(row, column).is_none())
    }

    /// Drop a piece of `color` in `column` and return the row it landed on.
    pub fn apply_move(&mut self, column: usize, color: Color) -> Result<usize, MoveError> {
        if column >= self.columns {
            return Err(MoveError::InvalidColumn(column));
        }
        let row = self.landing_row(column).ok_or(MoveError::ColumnFull(column))?;

        let index = self.index(row, column);
        debug_assert!(self.cells[index].is_none());
        self.cells[index] = Some(color);
        Ok(row)
    }

    pub fn playable_columns(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.columns).filter(move |&col| self.is_column_playable(col))
    }

    pub fn is_full(&self) -> bool {
        self.playable_columns().next().is_none()
    }

    /// The number of pieces on the grid.
    pub fn piece_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Temporarily place `color` at the empty cell `(row, col)`, evaluate `f` and restore the cell.
    /// The placement is never observable outside of `f`.
    pub(crate) fn with_trial<R>(&mut self, row: usize, col: usize, color: Color, f: impl FnOnce(&Grid) -> R) -> R {
        let index = self.index(row, col);
        assert!(self.cells[index].is_none(), "trial placement on occupied cell ({}, {})", row, col);

        self.cells[index] = Some(color);
        let result = f(self);
        self.cells[index] = None;

        result
    }

    /// Map this grid under the given symmetry.
    pub fn map(&self, sym: D1Symmetry) -> Grid {
        let mut cells = vec![None; self.cells.len()];
        for row in 0..self.rows {
            for col in 0..self.columns {
                cells[row * self.columns + sym.map_axis(col, self.columns)] = self.cell(row, col);
            }
        }
        Grid {
            columns: self.columns,
            rows: self.rows,
            cells,
        }
    }

    /// Map a column under the given symmetry.
    pub fn map_column(&self, sym: D1Symmetry, column: usize) -> usize {
        sym.map_axis(column, self.columns)
    }

    fn index(&self, row: usize, col: usize) -> usize {
        assert!(
            row < self.rows && col < self.columns,
            "({}, {}) is out of bounds for {}x{} grid",
            row,
            col,
            self.columns,
            self.rows
        );
        row * self.columns + col
    }

    /// Build a grid from text rows (top first) without applying gravity.
    /// Only used to test line detection on arbitrary patterns.
    #[cfg(test)]
    pub(crate) fn from_pattern(rows: &[&str]) -> Grid {
        let columns = rows[0].len();
        let cells = rows
            .iter()
            .flat_map(|row| {
                assert_eq!(row.len(), columns);
                row.chars().map(|c| match c {
                    'Y' => Some(Color::Yellow),
                    'R' => Some(Color::Red),
                    _ => None,
                })
            })
            .collect();
        Grid {
            columns,
            rows: rows.len(),
            cells,
        }
    }
}

fn check_size(name: &str, value: usize) -> Result<(), ConfigError> {
    if (Grid::MIN_SIZE..=Grid::MAX_SIZE).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Validation(format!(
            "grid {} must be in {}..={}, got {}",
            name,
            Grid::MIN_SIZE,
            Grid::MAX_SIZE,
            value
        )))
    }
}

fn cell_to_char(cell: Option<Color>) -> char {
    match cell {
        Some(color) => color.to_char(),
        None => '.',
    }
}

impl Debug for Grid {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Grid {{ {}x{}, cells: \"", self.columns, self.rows)?;
        for row in 0..self.rows {
            if row != 0 {
                write!(f, "/")?;
            }
            for col in 0..self.columns {
                write!(f, "{}", cell_to_char(self.cell(row, col)))?;
            }
        }
        write!(f, "\" }}")
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for row in 0..self.rows {
            for col in 0..self.columns {
                write!(f, "{}", cell_to_char(self.cell(row, col)))?;
            }
            writeln!(f)?;
        }
        for col in 0..self.columns {
            write!(f, "{}", col)?;
        }
        writeln!(f)
    }
}
