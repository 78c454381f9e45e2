//! Storage contract shared by the dense and sparse matrix engines.
//!
//! The generic table algorithms (iteration, filtering, transformation,
//! binning, delimited rendering) are written once against the small set of
//! hooks defined here; a backend supplies row/column extraction, native
//! vector densification, and coercion of external inputs into its own 2-D
//! representation. External inputs arrive in several shapes depending on the
//! call site, so the coercion boundary is an explicit sum type
//! ([`MatrixInput`]) rather than runtime type inspection.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::biom::BiomElementType;
use crate::error::{TableResult, UnimplementedSnafu};

/// Ordered `(row, col) -> value` coordinate map accepted at the coercion
/// boundary.
pub type CoordMap<E> = BTreeMap<(usize, usize), E>;

/// Cell contract for matrix elements.
///
/// `Default` doubles as the background value: the value an absent sparse
/// coordinate reads as, and the fill used when materializing from
/// coordinates.
pub trait Element: std::fmt::Debug + Clone + PartialEq + Default {
    /// Exchange-format element tag for matrices of this type, or `None`
    /// when the exchange format cannot represent it.
    fn biom_element_type() -> Option<BiomElementType>;

    /// Project the value into JSON for the exchange-format `data` field.
    fn to_json(&self) -> Value;

    /// Render the value for tab-delimited text output.
    fn fmt_delimited(&self) -> String;

    /// Whether this is the background value.
    fn is_zero(&self) -> bool;

    /// Rust type name used in serialization-refused diagnostics.
    fn type_name() -> &'static str {
        std::any::type_name::<Self>()
    }
}

impl Element for i64 {
    fn biom_element_type() -> Option<BiomElementType> {
        Some(BiomElementType::Int)
    }

    fn to_json(&self) -> Value {
        Value::from(*self)
    }

    fn fmt_delimited(&self) -> String {
        self.to_string()
    }

    fn is_zero(&self) -> bool {
        *self == 0
    }
}

impl Element for f64 {
    fn biom_element_type() -> Option<BiomElementType> {
        Some(BiomElementType::Float)
    }

    fn to_json(&self) -> Value {
        Value::from(*self)
    }

    // Always keep a decimal point so integral floats render as "5.0".
    fn fmt_delimited(&self) -> String {
        format!("{self:?}")
    }

    fn is_zero(&self) -> bool {
        *self == 0.0
    }
}

impl Element for String {
    fn biom_element_type() -> Option<BiomElementType> {
        Some(BiomElementType::Str)
    }

    fn to_json(&self) -> Value {
        Value::String(self.clone())
    }

    fn fmt_delimited(&self) -> String {
        self.clone()
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

/// Arbitrary JSON cells model matrices of composite values. They can be
/// stored and compared but have no exchange-format representation, so
/// serialization refuses them.
impl Element for Value {
    fn biom_element_type() -> Option<BiomElementType> {
        None
    }

    fn to_json(&self) -> Value {
        self.clone()
    }

    fn fmt_delimited(&self) -> String {
        self.to_string()
    }

    fn is_zero(&self) -> bool {
        self.is_null()
    }
}

/// External inputs accepted by [`Backend::from_input`].
///
/// Filtering and transformation feed the coercion hook different shapes
/// (native vectors, freshly computed dense vectors), and callers building
/// tables from scratch supply coordinate maps; each variant has one coercion
/// rule per backend.
#[derive(Debug, Clone)]
pub enum MatrixInput<B: Backend> {
    /// A single dense vector, wrapped as a `1 x n` row matrix (or an
    /// `n x 1` column matrix under transpose).
    Dense(Vec<B::Elem>),
    /// One dense vector per row; all vectors must share one length.
    DenseRows(Vec<Vec<B::Elem>>),
    /// A `(row, col) -> value` coordinate map; dimensions are inferred from
    /// the largest coordinates.
    Coords(CoordMap<B::Elem>),
    /// One coordinate map per row. Column keys are honored; the row position
    /// comes from the list, not from the map keys.
    CoordRows(Vec<CoordMap<B::Elem>>),
    /// Backend-native single-row vectors, one per row; all vectors must
    /// share one length.
    Vectors(Vec<B::Vector>),
}

/// Storage contract implemented by the dense and sparse matrix engines.
///
/// The four hook methods (`row_vectors`, `column_vectors`, `densify`,
/// `from_input`) carry default bodies that fail with
/// [`TableError::Unimplemented`](crate::error::TableError::Unimplemented):
/// a backend that does not supply them can still hold data, but it cannot
/// drive the generic table algorithms, and callers can tell that apart from
/// a data error.
pub trait Backend: std::fmt::Debug + Clone + PartialEq + Sized {
    /// Cell type stored by this backend.
    type Elem: Element;

    /// Native single-row vector produced by row and column extraction.
    type Vector: std::fmt::Debug + Clone + PartialEq;

    /// `(rows, cols)` extent of the matrix.
    fn shape(&self) -> (usize, usize);

    /// An all-background matrix of the given extent.
    fn empty(rows: usize, cols: usize) -> Self;

    /// Read one cell. Callers must bounds-check against [`Backend::shape`].
    fn cell(&self, row: usize, col: usize) -> Self::Elem;

    /// Overwrite one cell. Callers must bounds-check against
    /// [`Backend::shape`].
    fn set_cell(&mut self, row: usize, col: usize, value: Self::Elem);

    /// Lazily yield each row as a native vector, in storage order.
    fn row_vectors(&self) -> TableResult<Box<dyn Iterator<Item = Self::Vector> + '_>> {
        UnimplementedSnafu {
            operation: "row_vectors",
        }
        .fail()
    }

    /// Lazily yield each column as a native vector, in storage order.
    fn column_vectors(&self) -> TableResult<Box<dyn Iterator<Item = Self::Vector> + '_>> {
        UnimplementedSnafu {
            operation: "column_vectors",
        }
        .fail()
    }

    /// Materialize a native vector into a dense `Vec`, implicit background
    /// values included.
    fn densify(vector: &Self::Vector) -> TableResult<Vec<Self::Elem>> {
        let _ = vector;
        UnimplementedSnafu {
            operation: "densify",
        }
        .fail()
    }

    /// Coerce an external input into this backend's native matrix, swapping
    /// the axes when `transpose` is set.
    fn from_input(input: MatrixInput<Self>, transpose: bool) -> TableResult<Self> {
        let _ = (input, transpose);
        UnimplementedSnafu {
            operation: "from_input",
        }
        .fail()
    }
}
