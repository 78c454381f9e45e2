//! BIOM v0.9 exchange-format serialization.
//!
//! [`Table::to_biom`] renders a semantically typed table into the structured
//! object downstream format writers and analysis tools consume. The field
//! names and the `matrix_type` / `matrix_element_type` literals are a wire
//! contract; the element type is detected from the matrix element type, and
//! matrices whose elements have no exchange representation are refused
//! rather than silently coerced.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use snafu::OptionExt;

use crate::backend::{Backend, Element};
use crate::dense::DenseMatrix;
use crate::error::{TableResult, UnsupportedElementTypeSnafu, UntypedTableSnafu};
use crate::metadata::MetadataMap;
use crate::sparse::CooMatrix;
use crate::table::Table;

/// Fixed `format` field value.
pub const BIOM_FORMAT: &str = "Biological Observation Matrix v0.9";

/// Fixed `format_url` field value.
pub const BIOM_FORMAT_URL: &str =
    "http://www.qiime.org/svn_documentation/documentation/biom_format.html";

/// Matrix encoding tag: how the `data` field is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatrixType {
    /// `data` is a nested array of every cell value.
    Dense,
    /// `data` is a list of `[row, col, value]` triples for stored cells.
    Sparse,
}

/// Element-type tag for the matrix cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BiomElementType {
    /// Integer-valued cells.
    Int,
    /// Floating-point cells.
    Float,
    /// String-valued cells.
    Str,
}

/// One `rows` / `columns` entry: an id plus its metadata or `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BiomAxisEntry {
    /// Row or column identifier.
    pub id: String,
    /// Attached metadata, `null` when the axis carries none.
    pub metadata: Option<MetadataMap>,
}

/// The exchange-format object.
///
/// Downstream consumers depend on these exact key names and on
/// `matrix_type` / `matrix_element_type` being the enumerated literals.
#[derive(Debug, Clone, Serialize)]
pub struct BiomTable {
    /// Free-form table identifier, or `null`.
    pub id: Option<String>,
    /// Fixed format version string ([`BIOM_FORMAT`]).
    pub format: &'static str,
    /// Fixed documentation URL ([`BIOM_FORMAT_URL`]).
    pub format_url: &'static str,
    /// Semantic table type label, for example `"OTU table"`.
    #[serde(rename = "type")]
    pub table_type: &'static str,
    /// Identity of the generating library.
    pub generated_by: String,
    /// Generation timestamp.
    pub date: DateTime<Utc>,
    /// Per-observation entries, in declared order.
    pub rows: Vec<BiomAxisEntry>,
    /// Per-sample entries, in declared order.
    pub columns: Vec<BiomAxisEntry>,
    /// Matrix encoding tag.
    pub matrix_type: MatrixType,
    /// Element-type tag.
    pub matrix_element_type: BiomElementType,
    /// `[observations, samples]` extent.
    pub shape: [usize; 2],
    /// Cell payload, encoded per [`MatrixType`].
    pub data: Value,
}

/// Exchange-format encoding supplied by each backend.
pub trait BiomMatrix: Backend {
    /// Matrix encoding tag for this backend.
    fn matrix_type() -> MatrixType;

    /// Encode the full matrix into the `data` field.
    fn matrix_data(&self) -> Value;
}

impl<T: Element> BiomMatrix for DenseMatrix<T> {
    fn matrix_type() -> MatrixType {
        MatrixType::Dense
    }

    fn matrix_data(&self) -> Value {
        let (nrows, _) = self.shape();
        Value::Array(
            (0..nrows)
                .map(|row| Value::Array(self.row(row).iter().map(Element::to_json).collect()))
                .collect(),
        )
    }
}

impl BiomMatrix for CooMatrix {
    fn matrix_type() -> MatrixType {
        MatrixType::Sparse
    }

    fn matrix_data(&self) -> Value {
        Value::Array(
            self.entries()
                .map(|(row, col, value)| json!([row, col, value]))
                .collect(),
        )
    }
}

impl<B: BiomMatrix> Table<B> {
    /// Render the table as a BIOM v0.9 exchange object.
    ///
    /// The table must carry a semantic [`TableType`](crate::table::TableType);
    /// matrices whose element type has no exchange representation are
    /// refused with `UnsupportedElementType`. An empty table serializes with
    /// empty `rows`, `columns`, and `data`.
    pub fn to_biom(&self) -> TableResult<BiomTable> {
        let table_type = self.table_type().context(UntypedTableSnafu)?;
        let matrix_element_type =
            B::Elem::biom_element_type().context(UnsupportedElementTypeSnafu {
                type_name: B::Elem::type_name(),
            })?;
        let (nrows, ncols) = self.shape();
        Ok(BiomTable {
            id: self.table_id().map(str::to_owned),
            format: BIOM_FORMAT,
            format_url: BIOM_FORMAT_URL,
            table_type: table_type.label(),
            generated_by: format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            date: Utc::now(),
            rows: axis_entries(self.observation_ids(), self.observation_metadata()),
            columns: axis_entries(self.sample_ids(), self.sample_metadata()),
            matrix_type: B::matrix_type(),
            matrix_element_type,
            shape: [nrows, ncols],
            data: self.data().matrix_data(),
        })
    }
}

fn axis_entries(ids: &[String], metadata: Option<&[MetadataMap]>) -> Vec<BiomAxisEntry> {
    ids.iter()
        .enumerate()
        .map(|(index, id)| BiomAxisEntry {
            id: id.clone(),
            metadata: metadata.map(|metadata| metadata[index].clone()),
        })
        .collect()
}
