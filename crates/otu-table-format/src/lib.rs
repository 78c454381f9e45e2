//! # otu-table-format
//!
//! Dense- and sparse-backed observation/sample abundance tables with
//! metadata and BIOM v0.9 serialization.
//!
//! This crate is the supported public entry point and provides a small,
//! stable surface over `otu-table-core`.
//!
//! ## Example
//!
//! ```rust,ignore
//! use otu_table_format::prelude::*;
//! ```

/// Convenience prelude with the stable, supported surface.
pub mod prelude;

/// Backend contract namespace (wrapper-only).
pub mod backend {
    pub use otu_table_core::backend::{Backend, CoordMap, Element, MatrixInput};
}

pub use otu_table_core::biom::{
    BiomAxisEntry, BiomElementType, BiomMatrix, BiomTable, MatrixType, BIOM_FORMAT,
    BIOM_FORMAT_URL,
};
pub use otu_table_core::dense::{DenseMatrix, DenseTable};
pub use otu_table_core::error::{Axis, TableError, TableResult};
pub use otu_table_core::metadata::MetadataMap;
pub use otu_table_core::sparse::{CooMatrix, SparseTable, SparseVec};
pub use otu_table_core::table::{AxisIter, Table, TableBuilder, TableType};
