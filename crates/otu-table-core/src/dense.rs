//! Dense storage backend.
//!
//! [`DenseMatrix`] keeps every cell in a row-major `Vec` with an explicit
//! shape. Row and column extraction hand out plain `Vec`s, so densification
//! is a no-op and iteration follows storage order directly.

use snafu::ensure;

use crate::backend::{Backend, CoordMap, Element, MatrixInput};
use crate::error::{TableResult, VectorLengthMismatchSnafu};
use crate::table::Table;

/// A table backed by a [`DenseMatrix`].
pub type DenseTable<T> = Table<DenseMatrix<T>>;

/// Row-major dense matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix<T> {
    nrows: usize,
    ncols: usize,
    cells: Vec<T>,
}

impl<T: Element> DenseMatrix<T> {
    /// Build from per-row vectors; every row must share one length.
    pub fn from_rows(rows: Vec<Vec<T>>) -> TableResult<Self> {
        let nrows = rows.len();
        let ncols = rows.first().map_or(0, Vec::len);
        let mut cells = Vec::with_capacity(nrows * ncols);
        for row in rows {
            ensure!(
                row.len() == ncols,
                VectorLengthMismatchSnafu {
                    expected: ncols,
                    found: row.len(),
                }
            );
            cells.extend(row);
        }
        Ok(Self {
            nrows,
            ncols,
            cells,
        })
    }

    /// Copy of row `row`, in column order.
    pub fn row(&self, row: usize) -> Vec<T> {
        self.cells[row * self.ncols..(row + 1) * self.ncols].to_vec()
    }

    /// Copy of column `col`, in row order.
    pub fn column(&self, col: usize) -> Vec<T> {
        (0..self.nrows)
            .map(|row| self.cells[row * self.ncols + col].clone())
            .collect()
    }

    fn transposed(&self) -> Self {
        let mut cells = Vec::with_capacity(self.cells.len());
        for col in 0..self.ncols {
            for row in 0..self.nrows {
                cells.push(self.cells[row * self.ncols + col].clone());
            }
        }
        Self {
            nrows: self.ncols,
            ncols: self.nrows,
            cells,
        }
    }

    fn from_coords(coords: CoordMap<T>) -> Self {
        let nrows = coords.keys().map(|&(r, _)| r + 1).max().unwrap_or(0);
        let ncols = coords.keys().map(|&(_, c)| c + 1).max().unwrap_or(0);
        let mut matrix = Self::empty(nrows, ncols);
        for ((row, col), value) in coords {
            matrix.set_cell(row, col, value);
        }
        matrix
    }
}

impl<T: Element> Backend for DenseMatrix<T> {
    type Elem = T;
    type Vector = Vec<T>;

    fn shape(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    fn empty(rows: usize, cols: usize) -> Self {
        Self {
            nrows: rows,
            ncols: cols,
            cells: vec![T::default(); rows * cols],
        }
    }

    fn cell(&self, row: usize, col: usize) -> T {
        self.cells[row * self.ncols + col].clone()
    }

    fn set_cell(&mut self, row: usize, col: usize, value: T) {
        self.cells[row * self.ncols + col] = value;
    }

    fn row_vectors(&self) -> TableResult<Box<dyn Iterator<Item = Vec<T>> + '_>> {
        Ok(Box::new((0..self.nrows).map(move |row| self.row(row))))
    }

    fn column_vectors(&self) -> TableResult<Box<dyn Iterator<Item = Vec<T>> + '_>> {
        Ok(Box::new((0..self.ncols).map(move |col| self.column(col))))
    }

    fn densify(vector: &Vec<T>) -> TableResult<Vec<T>> {
        Ok(vector.clone())
    }

    fn from_input(input: MatrixInput<Self>, transpose: bool) -> TableResult<Self> {
        let matrix = match input {
            MatrixInput::Dense(vector) => {
                let ncols = vector.len();
                Self {
                    nrows: 1,
                    ncols,
                    cells: vector,
                }
            }
            MatrixInput::DenseRows(rows) | MatrixInput::Vectors(rows) => Self::from_rows(rows)?,
            MatrixInput::Coords(coords) => Self::from_coords(coords),
            MatrixInput::CoordRows(maps) => {
                let nrows = maps.len();
                let ncols = maps
                    .iter()
                    .flat_map(|map| map.keys().map(|&(_, c)| c + 1))
                    .max()
                    .unwrap_or(0);
                let mut matrix = Self::empty(nrows, ncols);
                for (row, map) in maps.into_iter().enumerate() {
                    for ((_, col), value) in map {
                        matrix.set_cell(row, col, value);
                    }
                }
                matrix
            }
        };
        Ok(if transpose { matrix.transposed() } else { matrix })
    }
}
