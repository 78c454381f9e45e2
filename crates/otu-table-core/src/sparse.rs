//! Sparse coordinate storage backend.
//!
//! [`CooMatrix`] stores only non-zero cells in an ordered
//! `(row, col) -> f64` map; absent coordinates read as `0.0`. An explicitly
//! assigned zero is collapsed to absent: `set` removes the stored entry and
//! the coercion paths never store zero-valued coordinates, so `nnz`,
//! equality, and the exchange-format triple encoding all agree on which
//! cells exist.

use std::collections::BTreeMap;

use log::warn;
use snafu::ensure;

use crate::backend::{Backend, CoordMap, MatrixInput};
use crate::error::{TableResult, VectorLengthMismatchSnafu};
use crate::table::Table;

/// A table backed by a [`CooMatrix`].
pub type SparseTable = Table<CooMatrix>;

/// Coordinate-map sparse matrix; absent cells read as `0.0`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CooMatrix {
    nrows: usize,
    ncols: usize,
    entries: BTreeMap<(usize, usize), f64>,
}

impl CooMatrix {
    /// An all-zero matrix of the given extent.
    pub fn new(nrows: usize, ncols: usize) -> Self {
        Self {
            nrows,
            ncols,
            entries: BTreeMap::new(),
        }
    }

    /// Build a sparse matrix from `(row, col) -> value` coordinates.
    ///
    /// Accepts any iterable of coordinate/value pairs (a map, or an
    /// equivalent list of pairs). Dimensions default to
    /// `(max row + 1, max col + 1)` over all supplied coordinates unless
    /// `shape` is given explicitly. With `transpose`, every coordinate is
    /// stored at its swapped position and the resulting dimensions are
    /// swapped accordingly. Zero values contribute to dimension inference
    /// but are not stored.
    pub fn from_coords<I>(coords: I, shape: Option<(usize, usize)>, transpose: bool) -> Self
    where
        I: IntoIterator<Item = ((usize, usize), f64)>,
    {
        let mut entries = BTreeMap::new();
        let (mut max_row, mut max_col) = (0_usize, 0_usize);
        let mut seen_any = false;
        for ((row, col), value) in coords {
            seen_any = true;
            max_row = max_row.max(row + 1);
            max_col = max_col.max(col + 1);
            if value == 0.0 {
                continue;
            }
            let key = if transpose { (col, row) } else { (row, col) };
            if entries.insert(key, value).is_some() {
                warn!("duplicate coordinate ({row}, {col}) overwrites an earlier value");
            }
        }
        let (nrows, ncols) = match shape {
            Some(shape) => shape,
            None if seen_any => (max_row, max_col),
            None => (0, 0),
        };
        let (nrows, ncols) = if transpose { (ncols, nrows) } else { (nrows, ncols) };
        Self {
            nrows,
            ncols,
            entries,
        }
    }

    /// Number of stored (non-zero) cells.
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    /// Read one cell; absent coordinates read as `0.0`.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.entries.get(&(row, col)).copied().unwrap_or(0.0)
    }

    /// Write one cell. Zero removes any stored entry.
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        if value == 0.0 {
            self.entries.remove(&(row, col));
        } else {
            self.entries.insert((row, col), value);
        }
    }

    /// Extract row `row` as a flat sparse vector of length `ncols`.
    pub fn row(&self, row: usize) -> SparseVec {
        let entries = self
            .entries
            .range((row, 0)..(row + 1, 0))
            .map(|(&(_, col), &value)| (col, value))
            .collect();
        SparseVec {
            len: self.ncols,
            entries,
        }
    }

    /// Extract column `col` as a flat sparse vector of length `nrows`.
    pub fn column(&self, col: usize) -> SparseVec {
        let entries = self
            .entries
            .iter()
            .filter(|&(&(_, c), _)| c == col)
            .map(|(&(row, _), &value)| (row, value))
            .collect();
        SparseVec {
            len: self.nrows,
            entries,
        }
    }

    /// Iterate stored cells as `(row, col, value)` triples in row-major,
    /// then column-major, order.
    pub fn entries(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.entries.iter().map(|(&(row, col), &value)| (row, col, value))
    }
}

/// One extracted row or column, exposed as a flat sparse vector.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVec {
    len: usize,
    entries: BTreeMap<usize, f64>,
}

impl SparseVec {
    /// An all-zero vector of the given length.
    pub fn new(len: usize) -> Self {
        Self {
            len,
            entries: BTreeMap::new(),
        }
    }

    /// Build from a dense slice, skipping zero values.
    pub fn from_dense(values: &[f64]) -> Self {
        let entries = values
            .iter()
            .enumerate()
            .filter(|(_, &v)| v != 0.0)
            .map(|(i, &v)| (i, v))
            .collect();
        Self {
            len: values.len(),
            entries,
        }
    }

    /// Total element count, implicit zeros included.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the vector has zero total length.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Read one position; absent positions read as `0.0`.
    pub fn get(&self, index: usize) -> f64 {
        self.entries.get(&index).copied().unwrap_or(0.0)
    }

    /// Write one position. Zero removes any stored entry.
    pub fn set(&mut self, index: usize, value: f64) {
        if value == 0.0 {
            self.entries.remove(&index);
        } else {
            self.entries.insert(index, value);
        }
    }

    /// Materialize the vector densely, implicit zeros included.
    pub fn to_dense(&self) -> Vec<f64> {
        let mut dense = vec![0.0; self.len];
        for (&index, &value) in &self.entries {
            dense[index] = value;
        }
        dense
    }

    /// Iterate stored `(index, value)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.entries.iter().map(|(&index, &value)| (index, value))
    }
}

impl Backend for CooMatrix {
    type Elem = f64;
    type Vector = SparseVec;

    fn shape(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    fn empty(rows: usize, cols: usize) -> Self {
        Self::new(rows, cols)
    }

    fn cell(&self, row: usize, col: usize) -> f64 {
        self.get(row, col)
    }

    fn set_cell(&mut self, row: usize, col: usize, value: f64) {
        self.set(row, col, value);
    }

    fn row_vectors(&self) -> TableResult<Box<dyn Iterator<Item = SparseVec> + '_>> {
        Ok(Box::new((0..self.nrows).map(move |row| self.row(row))))
    }

    fn column_vectors(&self) -> TableResult<Box<dyn Iterator<Item = SparseVec> + '_>> {
        Ok(Box::new((0..self.ncols).map(move |col| self.column(col))))
    }

    fn densify(vector: &SparseVec) -> TableResult<Vec<f64>> {
        Ok(vector.to_dense())
    }

    fn from_input(input: MatrixInput<Self>, transpose: bool) -> TableResult<Self> {
        match input {
            MatrixInput::Dense(vector) => {
                let shape = (1, vector.len());
                let coords = vector
                    .into_iter()
                    .enumerate()
                    .map(|(col, value)| ((0, col), value));
                Ok(Self::from_coords(coords, Some(shape), transpose))
            }
            MatrixInput::DenseRows(rows) => {
                let nrows = rows.len();
                let ncols = rows.first().map_or(0, Vec::len);
                let mut coords = Vec::new();
                for (row, values) in rows.into_iter().enumerate() {
                    ensure!(
                        values.len() == ncols,
                        VectorLengthMismatchSnafu {
                            expected: ncols,
                            found: values.len(),
                        }
                    );
                    coords.extend(
                        values
                            .into_iter()
                            .enumerate()
                            .map(move |(col, value)| ((row, col), value)),
                    );
                }
                Ok(Self::from_coords(coords, Some((nrows, ncols)), transpose))
            }
            MatrixInput::Coords(coords) => Ok(Self::from_coords(coords, None, transpose)),
            MatrixInput::CoordRows(maps) => {
                let nrows = maps.len();
                let mut ncols = 0;
                let mut coords = Vec::new();
                for (row, map) in maps.into_iter().enumerate() {
                    for ((key_row, col), value) in map {
                        if key_row != row {
                            warn!(
                                "coordinate row {key_row} ignored; entry assigned to list position {row}"
                            );
                        }
                        ncols = ncols.max(col + 1);
                        coords.push(((row, col), value));
                    }
                }
                Ok(Self::from_coords(coords, Some((nrows, ncols)), transpose))
            }
            MatrixInput::Vectors(vectors) => {
                let nrows = vectors.len();
                let ncols = vectors.first().map_or(0, SparseVec::len);
                let mut coords = Vec::new();
                for (row, vector) in vectors.into_iter().enumerate() {
                    ensure!(
                        vector.len() == ncols,
                        VectorLengthMismatchSnafu {
                            expected: ncols,
                            found: vector.len(),
                        }
                    );
                    coords.extend(vector.iter().map(|(col, value)| ((row, col), value)));
                }
                Ok(Self::from_coords(coords, Some((nrows, ncols)), transpose))
            }
        }
    }
}
