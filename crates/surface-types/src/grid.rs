//! Dense interpolated surface grid.

use crate::error::SurfaceError;

/// Row-major grid of interpolated weights with square cells.
///
/// Rows follow the y axis (dendrogram distance), columns the x axis (time).
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceGrid {
    rows: usize,
    cols: usize,
    cell_size: f64,
    values: Vec<f64>,
}

impl SurfaceGrid {
    /// Create a grid from row-major values.
    pub fn new(
        rows: usize,
        cols: usize,
        cell_size: f64,
        values: Vec<f64>,
    ) -> Result<Self, SurfaceError> {
        if values.len() != rows * cols {
            return Err(SurfaceError::InvalidInput(format!(
                "grid of {}x{} needs {} values, got {}",
                rows,
                cols,
                rows * cols,
                values.len()
            )));
        }
        Ok(Self {
            rows,
            cols,
            cell_size,
            values,
        })
    }

    /// Create a grid filled with zeros.
    pub fn zeros(rows: usize, cols: usize, cell_size: f64) -> Self {
        Self {
            rows,
            cols,
            cell_size,
            values: vec![0.0; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Side length of one square cell.
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Value at row `r`, column `c`.
    ///
    /// # Panics
    /// Panics if the cell is outside the grid.
    pub fn get(&self, r: usize, c: usize) -> f64 {
        assert!(r < self.rows && c < self.cols, "cell out of bounds");
        self.values[r * self.cols + c]
    }

    /// Values of row `r`, left to right.
    pub fn row(&self, r: usize) -> &[f64] {
        &self.values[r * self.cols..(r + 1) * self.cols]
    }

    /// All values in row-major order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Largest cell value, or 0.0 for an empty grid.
    pub fn max_value(&self) -> f64 {
        self.values.iter().copied().fold(0.0, f64::max)
    }
}
