//! Wrapper prelude.
//!
//! The `otu-table-format` crate is the supported public entry point.
//! Downstream code should prefer importing from this prelude instead of
//! depending on internal core module paths.

pub use crate::backend;
pub use crate::{
    BiomElementType, BiomTable, CooMatrix, DenseMatrix, DenseTable, MatrixType, MetadataMap,
    SparseTable, Table, TableError, TableResult, TableType,
};
