//! Error types and SNAFU context selectors for the table crate.
//!
//! This module centralizes the `TableError` enum used by the public API and
//! exposes context selectors (via `#[snafu(visibility(pub(crate)))]`) so the
//! backend and table modules can attach error context without re-exporting
//! everything at the crate root. Keep new variants here to ensure consistent
//! user-facing messages.

use std::fmt;

use snafu::prelude::*;

/// Convenience alias for results carrying a [`TableError`].
pub type TableResult<T> = Result<T, TableError>;

/// The two axes of a table, used to report which side an invariant
/// violation occurred on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// The row axis (one entry per observation).
    Observation,
    /// The column axis (one entry per sample).
    Sample,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Observation => write!(f, "observation"),
            Axis::Sample => write!(f, "sample"),
        }
    }
}

/// Errors raised by table construction, access, and serialization.
///
/// Construction failures are fatal to the constructor call: no partially
/// built table is ever returned. `Unimplemented` is deliberately distinct
/// from the data-shaped variants so callers can tell "this backend does not
/// supply that capability" apart from "this input is bad".
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum TableError {
    /// The id sequence on one axis does not match the data extent.
    #[snafu(display("{ids} {axis} ids supplied for a data extent of {extent}"))]
    AxisLengthMismatch {
        /// Axis on which the mismatch was detected.
        axis: Axis,
        /// Number of ids supplied for that axis.
        ids: usize,
        /// Matrix extent (rows or columns) along that axis.
        extent: usize,
    },

    /// A metadata sequence was supplied whose length does not match its axis.
    #[snafu(display("{metadata} {axis} metadata entries supplied for {ids} {axis} ids"))]
    MetadataLengthMismatch {
        /// Axis on which the mismatch was detected.
        axis: Axis,
        /// Number of metadata entries supplied.
        metadata: usize,
        /// Number of ids on that axis.
        ids: usize,
    },

    /// An id occurs more than once within a single axis.
    #[snafu(display("duplicate {axis} id {id:?}"))]
    DuplicateId {
        /// Axis carrying the duplicate.
        axis: Axis,
        /// The offending id.
        id: String,
    },

    /// A vector fed to the coercion boundary has the wrong length.
    #[snafu(display("input vector of length {found} where {expected} was expected"))]
    VectorLengthMismatch {
        /// Length every vector in the input must have.
        expected: usize,
        /// Length actually found.
        found: usize,
    },

    /// A cell index lies outside the matrix extent.
    #[snafu(display("index ({row}, {col}) out of range for a {nrows} x {ncols} table"))]
    IndexOutOfRange {
        /// Requested row index.
        row: usize,
        /// Requested column index.
        col: usize,
        /// Number of rows in the table.
        nrows: usize,
        /// Number of columns in the table.
        ncols: usize,
    },

    /// The table holds no data, so there is nothing to render.
    #[snafu(display("table has no data to render"))]
    EmptyTable,

    /// The backend does not supply the invoked hook.
    #[snafu(display("backend does not implement {operation}"))]
    Unimplemented {
        /// Name of the missing backend hook.
        operation: String,
    },

    /// The table carries no semantic type, so the exchange format cannot
    /// label it.
    #[snafu(display("table has no semantic type; cannot build an exchange-format object"))]
    UntypedTable,

    /// The matrix element type has no exchange-format representation.
    #[snafu(display("matrix elements of type {type_name} are not representable in the exchange format"))]
    UnsupportedElementType {
        /// Rust type of the offending elements.
        type_name: String,
    },
}
