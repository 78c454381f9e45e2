//! The generic observation x sample table.
//!
//! [`Table`] owns a backend matrix plus the ids and metadata for both axes,
//! and expresses every shared algorithm (iteration, filtering,
//! transformation, delimited rendering) purely against the
//! [`Backend`](crate::backend::Backend) hooks, so dense- and sparse-backed
//! tables behave identically. Metadata-driven grouping lives in the
//! [`bin`] submodule.
//!
//! Construction validates, in order: id counts against the data extent,
//! metadata lengths against id counts, and id uniqueness per axis. The first
//! failing check aborts the constructor; no partial table is returned.
//! Derived tables (filter/transform/bin results) are re-validated through
//! the same path and never share mutable backing storage with their source.

pub mod bin;

use std::collections::HashSet;

use snafu::ensure;

use crate::backend::{Backend, Element, MatrixInput};
use crate::error::{
    Axis, AxisLengthMismatchSnafu, DuplicateIdSnafu, EmptyTableSnafu, IndexOutOfRangeSnafu,
    MetadataLengthMismatchSnafu, TableError, TableResult,
};
use crate::metadata::{normalize_metadata, MetadataMap};

/// Semantic table categories understood by the exchange format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableType {
    /// An OTU (operational taxonomic unit) abundance table.
    Otu,
}

impl TableType {
    /// Exchange-format label for this category.
    pub fn label(self) -> &'static str {
        match self {
            TableType::Otu => "OTU table",
        }
    }
}

/// A two-dimensional observation x sample table over backend `B`.
///
/// Shape and identity are fixed at construction; the only mutation is
/// explicit cell assignment through [`Table::set`]. Every filtering,
/// transformation, or binning operation returns a new table of the same
/// backend type.
#[derive(Debug, Clone)]
pub struct Table<B: Backend> {
    data: B,
    sample_ids: Vec<String>,
    observation_ids: Vec<String>,
    sample_metadata: Option<Vec<MetadataMap>>,
    observation_metadata: Option<Vec<MetadataMap>>,
    table_id: Option<String>,
    table_type: Option<TableType>,
}

/// Staged constructor for [`Table`]; invariants are checked by
/// [`TableBuilder::build`].
#[derive(Debug, Clone)]
pub struct TableBuilder<B: Backend> {
    data: B,
    sample_ids: Vec<String>,
    observation_ids: Vec<String>,
    sample_metadata: Option<Vec<Option<MetadataMap>>>,
    observation_metadata: Option<Vec<Option<MetadataMap>>>,
    table_id: Option<String>,
    table_type: Option<TableType>,
}

impl<B: Backend> TableBuilder<B> {
    /// Attach per-sample metadata, aligned with the sample ids. Entry-level
    /// `None`s are normalized to empty maps.
    pub fn sample_metadata(mut self, metadata: Vec<Option<MetadataMap>>) -> Self {
        self.sample_metadata = Some(metadata);
        self
    }

    /// Attach per-observation metadata, aligned with the observation ids.
    /// Entry-level `None`s are normalized to empty maps.
    pub fn observation_metadata(mut self, metadata: Vec<Option<MetadataMap>>) -> Self {
        self.observation_metadata = Some(metadata);
        self
    }

    /// Attach a free-form identifier for the whole table.
    pub fn table_id(mut self, id: impl Into<String>) -> Self {
        self.table_id = Some(id.into());
        self
    }

    /// Declare the semantic table category (required for exchange-format
    /// serialization).
    pub fn table_type(mut self, table_type: TableType) -> Self {
        self.table_type = Some(table_type);
        self
    }

    /// Validate the invariants and produce the table.
    pub fn build(self) -> TableResult<Table<B>> {
        let table = Table {
            data: self.data,
            sample_ids: self.sample_ids,
            observation_ids: self.observation_ids,
            sample_metadata: self.sample_metadata.map(normalize_metadata),
            observation_metadata: self.observation_metadata.map(normalize_metadata),
            table_id: self.table_id,
            table_type: self.table_type,
        };
        table.validate()?;
        Ok(table)
    }
}

impl<B: Backend> Table<B> {
    /// Start building a table from backend data and the two id sequences.
    pub fn builder<S, O>(data: B, sample_ids: S, observation_ids: O) -> TableBuilder<B>
    where
        S: IntoIterator,
        S::Item: Into<String>,
        O: IntoIterator,
        O::Item: Into<String>,
    {
        TableBuilder {
            data,
            sample_ids: sample_ids.into_iter().map(Into::into).collect(),
            observation_ids: observation_ids.into_iter().map(Into::into).collect(),
            sample_metadata: None,
            observation_metadata: None,
            table_id: None,
            table_type: None,
        }
    }

    /// Construct a table with no metadata, id, or semantic type.
    pub fn new<S, O>(data: B, sample_ids: S, observation_ids: O) -> TableResult<Self>
    where
        S: IntoIterator,
        S::Item: Into<String>,
        O: IntoIterator,
        O::Item: Into<String>,
    {
        Self::builder(data, sample_ids, observation_ids).build()
    }

    fn validate(&self) -> TableResult<()> {
        let (nrows, ncols) = self.data.shape();
        ensure!(
            self.observation_ids.len() == nrows,
            AxisLengthMismatchSnafu {
                axis: Axis::Observation,
                ids: self.observation_ids.len(),
                extent: nrows,
            }
        );
        ensure!(
            self.sample_ids.len() == ncols,
            AxisLengthMismatchSnafu {
                axis: Axis::Sample,
                ids: self.sample_ids.len(),
                extent: ncols,
            }
        );
        if let Some(metadata) = &self.observation_metadata {
            ensure!(
                metadata.len() == self.observation_ids.len(),
                MetadataLengthMismatchSnafu {
                    axis: Axis::Observation,
                    metadata: metadata.len(),
                    ids: self.observation_ids.len(),
                }
            );
        }
        if let Some(metadata) = &self.sample_metadata {
            ensure!(
                metadata.len() == self.sample_ids.len(),
                MetadataLengthMismatchSnafu {
                    axis: Axis::Sample,
                    metadata: metadata.len(),
                    ids: self.sample_ids.len(),
                }
            );
        }
        check_unique(&self.observation_ids, Axis::Observation)?;
        check_unique(&self.sample_ids, Axis::Sample)?;
        Ok(())
    }

    /// `(observations, samples)` extent of the table.
    pub fn shape(&self) -> (usize, usize) {
        self.data.shape()
    }

    /// Borrow the backend matrix.
    pub fn data(&self) -> &B {
        &self.data
    }

    /// Sample (column) ids, in declared order.
    pub fn sample_ids(&self) -> &[String] {
        &self.sample_ids
    }

    /// Observation (row) ids, in declared order.
    pub fn observation_ids(&self) -> &[String] {
        &self.observation_ids
    }

    /// Per-sample metadata, if any was attached.
    pub fn sample_metadata(&self) -> Option<&[MetadataMap]> {
        self.sample_metadata.as_deref()
    }

    /// Per-observation metadata, if any was attached.
    pub fn observation_metadata(&self) -> Option<&[MetadataMap]> {
        self.observation_metadata.as_deref()
    }

    /// Free-form table identifier, if any.
    pub fn table_id(&self) -> Option<&str> {
        self.table_id.as_deref()
    }

    /// Semantic table category, if declared.
    pub fn table_type(&self) -> Option<TableType> {
        self.table_type
    }

    /// Read the cell at `(observation, sample)`.
    pub fn get(&self, index: (usize, usize)) -> TableResult<B::Elem> {
        let (row, col) = index;
        let (nrows, ncols) = self.data.shape();
        ensure!(
            row < nrows && col < ncols,
            IndexOutOfRangeSnafu {
                row,
                col,
                nrows,
                ncols,
            }
        );
        Ok(self.data.cell(row, col))
    }

    /// Overwrite the cell at `(observation, sample)` in place.
    pub fn set(&mut self, index: (usize, usize), value: B::Elem) -> TableResult<()> {
        let (row, col) = index;
        let (nrows, ncols) = self.data.shape();
        ensure!(
            row < nrows && col < ncols,
            IndexOutOfRangeSnafu {
                row,
                col,
                nrows,
                ncols,
            }
        );
        self.data.set_cell(row, col, value);
        Ok(())
    }

    /// Iterate samples as `(dense vector, id, metadata)` triples, in
    /// declared order.
    ///
    /// The iterator is restartable: each call starts an independent
    /// traversal. On a backend without the extraction hooks the first item
    /// is the capability error.
    pub fn iter_samples(&self) -> AxisIter<'_, B> {
        AxisIter::new(
            self.data.column_vectors(),
            &self.sample_ids,
            self.sample_metadata.as_deref(),
        )
    }

    /// Iterate observations as `(dense vector, id, metadata)` triples, in
    /// declared order.
    pub fn iter_observations(&self) -> AxisIter<'_, B> {
        AxisIter::new(
            self.data.row_vectors(),
            &self.observation_ids,
            self.observation_metadata.as_deref(),
        )
    }

    /// Keep the samples for which `predicate` holds (or fails, under
    /// `invert`), leaving the observation axis untouched.
    pub fn filter_samples<F>(&self, mut predicate: F, invert: bool) -> TableResult<Self>
    where
        F: FnMut(&[B::Elem], &str, Option<&MetadataMap>) -> bool,
    {
        let mut keep = Vec::new();
        for (index, triple) in self.iter_samples().enumerate() {
            let (dense, id, metadata) = triple?;
            if predicate(&dense, id, metadata) != invert {
                keep.push(index);
            }
        }
        self.subset_samples(&keep)
    }

    /// Keep the observations for which `predicate` holds (or fails, under
    /// `invert`), leaving the sample axis untouched.
    pub fn filter_observations<F>(&self, mut predicate: F, invert: bool) -> TableResult<Self>
    where
        F: FnMut(&[B::Elem], &str, Option<&MetadataMap>) -> bool,
    {
        let mut keep = Vec::new();
        for (index, triple) in self.iter_observations().enumerate() {
            let (dense, id, metadata) = triple?;
            if predicate(&dense, id, metadata) != invert {
                keep.push(index);
            }
        }
        self.subset_observations(&keep)
    }

    /// Apply `transform` to every sample (column) vector. Ids and metadata
    /// on both axes are unchanged; `transform` must preserve vector length.
    pub fn transform_samples<F>(&self, mut transform: F) -> TableResult<Self>
    where
        F: FnMut(&[B::Elem]) -> Vec<B::Elem>,
    {
        let (nrows, _) = self.data.shape();
        let mut columns = Vec::with_capacity(self.sample_ids.len());
        for triple in self.iter_samples() {
            let (dense, _, _) = triple?;
            columns.push(transform(&dense));
        }
        let data = if columns.is_empty() {
            B::empty(nrows, 0)
        } else {
            B::from_input(MatrixInput::DenseRows(columns), true)?
        };
        self.rebuild(
            data,
            self.sample_ids.clone(),
            self.sample_metadata.clone(),
            self.observation_ids.clone(),
            self.observation_metadata.clone(),
        )
    }

    /// Apply `transform` to every observation (row) vector. Ids and
    /// metadata on both axes are unchanged; `transform` must preserve
    /// vector length.
    pub fn transform_observations<F>(&self, mut transform: F) -> TableResult<Self>
    where
        F: FnMut(&[B::Elem]) -> Vec<B::Elem>,
    {
        let (_, ncols) = self.data.shape();
        let mut rows = Vec::with_capacity(self.observation_ids.len());
        for triple in self.iter_observations() {
            let (dense, _, _) = triple?;
            rows.push(transform(&dense));
        }
        let data = if rows.is_empty() {
            B::empty(0, ncols)
        } else {
            B::from_input(MatrixInput::DenseRows(rows), false)?
        };
        self.rebuild(
            data,
            self.sample_ids.clone(),
            self.sample_metadata.clone(),
            self.observation_ids.clone(),
            self.observation_metadata.clone(),
        )
    }

    /// Render the table as tab-separated text: a `#RowIDs` header carrying
    /// the sample ids, then one line per observation.
    pub fn delimited_self(&self) -> TableResult<String> {
        let (nrows, ncols) = self.data.shape();
        ensure!(nrows > 0 && ncols > 0, EmptyTableSnafu);
        let mut lines = Vec::with_capacity(nrows + 1);
        lines.push(format!("#RowIDs\t{}", self.sample_ids.join("\t")));
        for triple in self.iter_observations() {
            let (dense, id, _) = triple?;
            let cells: Vec<String> = dense.iter().map(Element::fmt_delimited).collect();
            lines.push(format!("{id}\t{}", cells.join("\t")));
        }
        Ok(lines.join("\n"))
    }

    /// Iterate `(observation id, sample id)` pairs for every non-zero cell,
    /// in row-major order.
    pub fn nonzero(&self) -> TableResult<Vec<(&str, &str)>> {
        let mut pairs = Vec::new();
        for triple in self.iter_observations() {
            let (dense, observation_id, _) = triple?;
            for (col, value) in dense.iter().enumerate() {
                if !value.is_zero() {
                    pairs.push((observation_id, self.sample_ids[col].as_str()));
                }
            }
        }
        Ok(pairs)
    }

    /// Rebuild a derived table through the invariant checks. The semantic
    /// type carries over; the free-form table id does not.
    fn rebuild(
        &self,
        data: B,
        sample_ids: Vec<String>,
        sample_metadata: Option<Vec<MetadataMap>>,
        observation_ids: Vec<String>,
        observation_metadata: Option<Vec<MetadataMap>>,
    ) -> TableResult<Self> {
        let table = Table {
            data,
            sample_ids,
            observation_ids,
            sample_metadata,
            observation_metadata,
            table_id: None,
            table_type: self.table_type,
        };
        table.validate()?;
        Ok(table)
    }

    /// New table restricted to the sample positions in `keep`, in order.
    fn subset_samples(&self, keep: &[usize]) -> TableResult<Self> {
        let (nrows, _) = self.data.shape();
        let data = if keep.is_empty() {
            B::empty(nrows, 0)
        } else {
            let vectors: Vec<B::Vector> = self.data.column_vectors()?.collect();
            let picked = keep.iter().map(|&i| vectors[i].clone()).collect();
            B::from_input(MatrixInput::Vectors(picked), true)?
        };
        let sample_ids = keep.iter().map(|&i| self.sample_ids[i].clone()).collect();
        let sample_metadata = self
            .sample_metadata
            .as_ref()
            .map(|md| keep.iter().map(|&i| md[i].clone()).collect());
        self.rebuild(
            data,
            sample_ids,
            sample_metadata,
            self.observation_ids.clone(),
            self.observation_metadata.clone(),
        )
    }

    /// New table restricted to the observation positions in `keep`, in
    /// order.
    fn subset_observations(&self, keep: &[usize]) -> TableResult<Self> {
        let (_, ncols) = self.data.shape();
        let data = if keep.is_empty() {
            B::empty(0, ncols)
        } else {
            let vectors: Vec<B::Vector> = self.data.row_vectors()?.collect();
            let picked = keep.iter().map(|&i| vectors[i].clone()).collect();
            B::from_input(MatrixInput::Vectors(picked), false)?
        };
        let observation_ids = keep
            .iter()
            .map(|&i| self.observation_ids[i].clone())
            .collect();
        let observation_metadata = self
            .observation_metadata
            .as_ref()
            .map(|md| keep.iter().map(|&i| md[i].clone()).collect());
        self.rebuild(
            data,
            self.sample_ids.clone(),
            self.sample_metadata.clone(),
            observation_ids,
            observation_metadata,
        )
    }
}

/// Tables compare equal when their data matrices, id sequences, and
/// metadata sequences all agree; the table id and semantic type do not
/// participate.
impl<B: Backend> PartialEq for Table<B> {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
            && self.sample_ids == other.sample_ids
            && self.observation_ids == other.observation_ids
            && self.sample_metadata == other.sample_metadata
            && self.observation_metadata == other.observation_metadata
    }
}

/// Default iteration walks samples, like [`Table::iter_samples`].
impl<'a, B: Backend> IntoIterator for &'a Table<B> {
    type Item = TableResult<(Vec<B::Elem>, &'a str, Option<&'a MetadataMap>)>;
    type IntoIter = AxisIter<'a, B>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_samples()
    }
}

/// Restartable iterator over one axis of a table, yielding
/// `(dense vector, id, metadata)` triples.
pub struct AxisIter<'a, B: Backend> {
    vectors: Option<Box<dyn Iterator<Item = B::Vector> + 'a>>,
    pending: Option<TableError>,
    ids: std::slice::Iter<'a, String>,
    metadata: Option<std::slice::Iter<'a, MetadataMap>>,
}

impl<'a, B: Backend> AxisIter<'a, B> {
    fn new(
        vectors: TableResult<Box<dyn Iterator<Item = B::Vector> + 'a>>,
        ids: &'a [String],
        metadata: Option<&'a [MetadataMap]>,
    ) -> Self {
        match vectors {
            Ok(vectors) => AxisIter {
                vectors: Some(vectors),
                pending: None,
                ids: ids.iter(),
                metadata: metadata.map(|metadata| metadata.iter()),
            },
            Err(err) => AxisIter {
                vectors: None,
                pending: Some(err),
                ids: ids.iter(),
                metadata: None,
            },
        }
    }
}

impl<'a, B: Backend> Iterator for AxisIter<'a, B> {
    type Item = TableResult<(Vec<B::Elem>, &'a str, Option<&'a MetadataMap>)>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(err) = self.pending.take() {
            return Some(Err(err));
        }
        let vector = self.vectors.as_mut()?.next()?;
        let id = self.ids.next()?;
        let metadata = self.metadata.as_mut().and_then(Iterator::next);
        match B::densify(&vector) {
            Ok(dense) => Some(Ok((dense, id.as_str(), metadata))),
            Err(err) => Some(Err(err)),
        }
    }
}

fn check_unique(ids: &[String], axis: Axis) -> TableResult<()> {
    let mut seen = HashSet::with_capacity(ids.len());
    for id in ids {
        ensure!(
            seen.insert(id.as_str()),
            DuplicateIdSnafu {
                axis,
                id: id.as_str(),
            }
        );
    }
    Ok(())
}
