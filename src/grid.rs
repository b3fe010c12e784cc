use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassageAxis {
    Vertical,
    Horizontal,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("maze dimensions must be positive, got {rows}x{cols}")]
    InvalidDimensions { rows: usize, cols: usize },
    #[error("cell ({row}, {col}) is outside the {rows}x{cols} grid")]
    OutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },
    #[error("index ({row}, {col}) is invalid for the {axis:?} passage table")]
    IndexError {
        row: usize,
        col: usize,
        axis: PassageAxis,
    },
}

/// Visited cells plus the two passage tables of one maze, bundled so that
/// generation owns all three and projection reads them afterwards.
///
/// Passages are stored row-major: `verticals` has `cols - 1` entries per row
/// (the wall between column `c` and `c + 1`), `horizontals` has `cols`
/// entries for each of the `rows - 1` row boundaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MazeGrid {
    rows: usize,
    cols: usize,
    visited: Vec<bool>,
    verticals: Vec<bool>,
    horizontals: Vec<bool>,
}

impl MazeGrid {
    pub fn new(rows: usize, cols: usize) -> Result<Self, GridError> {
        if rows == 0 || cols == 0 {
            return Err(GridError::InvalidDimensions { rows, cols });
        }
        Ok(Self {
            rows,
            cols,
            visited: vec![false; rows * cols],
            verticals: vec![false; rows * (cols - 1)],
            horizontals: vec![false; (rows - 1) * cols],
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn in_bounds(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols
    }

    fn check_cell(&self, row: usize, col: usize) -> Result<(), GridError> {
        if self.in_bounds(row, col) {
            Ok(())
        } else {
            Err(GridError::OutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            })
        }
    }

    pub fn is_visited(&self, row: usize, col: usize) -> Result<bool, GridError> {
        self.check_cell(row, col)?;
        Ok(self.visited[row * self.cols + col])
    }

    /// Idempotent: marking an already-visited cell is fine.
    pub fn mark_visited(&mut self, row: usize, col: usize) -> Result<(), GridError> {
        self.check_cell(row, col)?;
        self.visited[row * self.cols + col] = true;
        Ok(())
    }

    /// Removes the wall between column `col` and `col + 1` in `row`.
    pub fn open_vertical(&mut self, row: usize, col: usize) -> Result<(), GridError> {
        if row >= self.rows || col + 1 >= self.cols {
            return Err(GridError::IndexError {
                row,
                col,
                axis: PassageAxis::Vertical,
            });
        }
        self.verticals[row * (self.cols - 1) + col] = true;
        Ok(())
    }

    /// Removes the wall between row `row` and `row + 1` in `col`.
    pub fn open_horizontal(&mut self, row: usize, col: usize) -> Result<(), GridError> {
        if row + 1 >= self.rows || col >= self.cols {
            return Err(GridError::IndexError {
                row,
                col,
                axis: PassageAxis::Horizontal,
            });
        }
        self.horizontals[row * self.cols + col] = true;
        Ok(())
    }

    pub fn vertical_open(&self, row: usize, col: usize) -> bool {
        debug_assert!(row < self.rows && col + 1 < self.cols);
        self.verticals[row * (self.cols - 1) + col]
    }

    pub fn horizontal_open(&self, row: usize, col: usize) -> bool {
        debug_assert!(row + 1 < self.rows && col < self.cols);
        self.horizontals[row * self.cols + col]
    }

    pub fn all_visited(&self) -> bool {
        self.visited.iter().all(|&v| v)
    }

    /// Open passages summed over both tables.
    pub fn open_passage_count(&self) -> usize {
        let verticals = self.verticals.iter().filter(|&&open| open).count();
        let horizontals = self.horizontals.iter().filter(|&&open| open).count();
        verticals + horizontals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_dimensions() {
        assert_eq!(
            MazeGrid::new(0, 5),
            Err(GridError::InvalidDimensions { rows: 0, cols: 5 })
        );
        assert_eq!(
            MazeGrid::new(3, 0),
            Err(GridError::InvalidDimensions { rows: 3, cols: 0 })
        );
        assert!(MazeGrid::new(1, 1).is_ok());
    }

    #[test]
    fn visited_roundtrip_is_idempotent() {
        let mut grid = MazeGrid::new(4, 6).unwrap();
        assert_eq!(grid.is_visited(2, 3), Ok(false));
        grid.mark_visited(2, 3).unwrap();
        grid.mark_visited(2, 3).unwrap();
        assert_eq!(grid.is_visited(2, 3), Ok(true));
        assert_eq!(grid.is_visited(2, 4), Ok(false));
    }

    #[test]
    fn cell_access_out_of_bounds() {
        let mut grid = MazeGrid::new(4, 6).unwrap();
        let err = grid.is_visited(4, 0).unwrap_err();
        assert_eq!(
            err,
            GridError::OutOfBounds {
                row: 4,
                col: 0,
                rows: 4,
                cols: 6
            }
        );
        assert!(grid.mark_visited(0, 6).is_err());
    }

    #[test]
    fn passage_tables_are_one_short() {
        let mut grid = MazeGrid::new(4, 6).unwrap();
        // Last valid vertical column is cols - 2, last horizontal row rows - 2.
        grid.open_vertical(3, 4).unwrap();
        grid.open_horizontal(2, 5).unwrap();
        assert!(grid.vertical_open(3, 4));
        assert!(grid.horizontal_open(2, 5));

        assert_eq!(
            grid.open_vertical(0, 5),
            Err(GridError::IndexError {
                row: 0,
                col: 5,
                axis: PassageAxis::Vertical
            })
        );
        assert_eq!(
            grid.open_horizontal(3, 0),
            Err(GridError::IndexError {
                row: 3,
                col: 0,
                axis: PassageAxis::Horizontal
            })
        );
    }

    #[test]
    fn counts_open_passages_across_both_tables() {
        let mut grid = MazeGrid::new(4, 6).unwrap();
        assert_eq!(grid.open_passage_count(), 0);
        grid.open_vertical(0, 0).unwrap();
        grid.open_vertical(0, 0).unwrap();
        grid.open_horizontal(0, 0).unwrap();
        assert_eq!(grid.open_passage_count(), 2);
        assert!(!grid.all_visited());
    }
}
