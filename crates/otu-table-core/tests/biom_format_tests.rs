//! Golden tests for the BIOM v0.9 exchange objects.
//!
//! Each test serializes a table, strips the volatile `date` and
//! `generated_by` fields (asserting along the way that both keys exist),
//! and compares the remainder against a literal JSON value, so the exact
//! key names and `matrix_type` / `matrix_element_type` literals are pinned.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use otu_table_core::biom::BiomMatrix;
use otu_table_core::dense::DenseMatrix;
use otu_table_core::metadata::MetadataMap;
use otu_table_core::sparse::CooMatrix;
use otu_table_core::table::{Table, TableType};
use serde_json::{json, Value};

type TestResult = Result<(), Box<dyn std::error::Error>>;

// =============================================================================
// Test Helpers
// =============================================================================

fn md(pairs: &[(&str, Value)]) -> MetadataMap {
    pairs.iter().cloned().collect()
}

/// Serialize and strip the volatile fields, asserting they were present.
fn biom_json<B: BiomMatrix>(table: &Table<B>) -> Value {
    let mut value = serde_json::to_value(table.to_biom().unwrap()).unwrap();
    let object = value.as_object_mut().unwrap();
    assert!(object.remove("date").is_some(), "date key must exist");
    assert!(
        object.remove("generated_by").is_some(),
        "generated_by key must exist"
    );
    value
}

fn sample_metadata() -> Vec<Option<MetadataMap>> {
    vec![
        Some(md(&[("barcode", json!("aatt"))])),
        Some(md(&[("barcode", json!("ttgg"))])),
    ]
}

fn observation_metadata() -> Vec<Option<MetadataMap>> {
    vec![
        Some(md(&[("taxonomy", json!(["k__a", "p__b"]))])),
        Some(md(&[("taxonomy", json!(["k__a", "p__c"]))])),
    ]
}

const FORMAT: &str = "Biological Observation Matrix v0.9";
const FORMAT_URL: &str =
    "http://www.qiime.org/svn_documentation/documentation/biom_format.html";

// =============================================================================
// Dense tables
// =============================================================================

#[test]
fn dense_minimal_table() -> TestResult {
    let table = Table::builder(
        DenseMatrix::from_rows(vec![vec![5_i64, 6], vec![7, 8]])?,
        ["a", "b"],
        ["1", "2"],
    )
    .table_type(TableType::Otu)
    .build()?;

    let expected = json!({
        "rows": [
            {"id": "1", "metadata": null},
            {"id": "2", "metadata": null},
        ],
        "format": FORMAT,
        "data": [[5, 6], [7, 8]],
        "columns": [
            {"id": "a", "metadata": null},
            {"id": "b", "metadata": null},
        ],
        "matrix_type": "dense",
        "shape": [2, 2],
        "format_url": FORMAT_URL,
        "type": "OTU table",
        "id": null,
        "matrix_element_type": "int",
    });
    assert_eq!(biom_json(&table), expected);
    Ok(())
}

#[test]
fn dense_rich_table() -> TestResult {
    let table = Table::builder(
        DenseMatrix::from_rows(vec![vec![5_i64, 6], vec![7, 8]])?,
        ["a", "b"],
        ["1", "2"],
    )
    .sample_metadata(sample_metadata())
    .observation_metadata(observation_metadata())
    .table_type(TableType::Otu)
    .build()?;

    let expected = json!({
        "rows": [
            {"id": "1", "metadata": {"taxonomy": ["k__a", "p__b"]}},
            {"id": "2", "metadata": {"taxonomy": ["k__a", "p__c"]}},
        ],
        "format": FORMAT,
        "data": [[5, 6], [7, 8]],
        "columns": [
            {"id": "a", "metadata": {"barcode": "aatt"}},
            {"id": "b", "metadata": {"barcode": "ttgg"}},
        ],
        "matrix_type": "dense",
        "shape": [2, 2],
        "format_url": FORMAT_URL,
        "type": "OTU table",
        "id": null,
        "matrix_element_type": "int",
    });
    assert_eq!(biom_json(&table), expected);
    Ok(())
}

#[test]
fn dense_empty_table() -> TestResult {
    let table = Table::builder(
        DenseMatrix::<i64>::from_rows(vec![])?,
        Vec::<&str>::new(),
        Vec::<&str>::new(),
    )
    .table_type(TableType::Otu)
    .build()?;

    let expected = json!({
        "rows": [],
        "format": FORMAT,
        "data": [],
        "columns": [],
        "matrix_type": "dense",
        "shape": [0, 0],
        "format_url": FORMAT_URL,
        "type": "OTU table",
        "id": null,
        "matrix_element_type": "int",
    });
    assert_eq!(biom_json(&table), expected);
    Ok(())
}

#[test]
fn dense_partial_metadata_tables() -> TestResult {
    let with_sample_md = Table::builder(
        DenseMatrix::from_rows(vec![vec![0_i64, 2], vec![9, 10]])?,
        ["a", "b"],
        ["1", "2"],
    )
    .sample_metadata(sample_metadata())
    .table_id("TestTable1")
    .table_type(TableType::Otu)
    .build()?;

    let expected = json!({
        "rows": [
            {"id": "1", "metadata": null},
            {"id": "2", "metadata": null},
        ],
        "format": FORMAT,
        "data": [[0, 2], [9, 10]],
        "columns": [
            {"id": "a", "metadata": {"barcode": "aatt"}},
            {"id": "b", "metadata": {"barcode": "ttgg"}},
        ],
        "matrix_type": "dense",
        "shape": [2, 2],
        "format_url": FORMAT_URL,
        "type": "OTU table",
        "id": "TestTable1",
        "matrix_element_type": "int",
    });
    assert_eq!(biom_json(&with_sample_md), expected);

    let with_observation_md = Table::builder(
        DenseMatrix::from_rows(vec![vec![0_i64, 2], vec![9, 10]])?,
        ["a", "b"],
        ["1", "2"],
    )
    .observation_metadata(observation_metadata())
    .table_id("TestTable2")
    .table_type(TableType::Otu)
    .build()?;

    let expected = json!({
        "rows": [
            {"id": "1", "metadata": {"taxonomy": ["k__a", "p__b"]}},
            {"id": "2", "metadata": {"taxonomy": ["k__a", "p__c"]}},
        ],
        "format": FORMAT,
        "data": [[0, 2], [9, 10]],
        "columns": [
            {"id": "a", "metadata": null},
            {"id": "b", "metadata": null},
        ],
        "matrix_type": "dense",
        "shape": [2, 2],
        "format_url": FORMAT_URL,
        "type": "OTU table",
        "id": "TestTable2",
        "matrix_element_type": "int",
    });
    assert_eq!(biom_json(&with_observation_md), expected);
    Ok(())
}

#[test]
fn dense_float_table() -> TestResult {
    let table = Table::builder(
        DenseMatrix::from_rows(vec![vec![0.0, 2.5, 3.4], vec![9.3, 10.23, 2.2]])?,
        ["a", "b", "c"],
        ["1", "2"],
    )
    .table_type(TableType::Otu)
    .build()?;

    let expected = json!({
        "rows": [
            {"id": "1", "metadata": null},
            {"id": "2", "metadata": null},
        ],
        "format": FORMAT,
        "data": [[0.0, 2.5, 3.4], [9.3, 10.23, 2.2]],
        "columns": [
            {"id": "a", "metadata": null},
            {"id": "b", "metadata": null},
            {"id": "c", "metadata": null},
        ],
        "matrix_type": "dense",
        "shape": [2, 3],
        "format_url": FORMAT_URL,
        "type": "OTU table",
        "id": null,
        "matrix_element_type": "float",
    });
    assert_eq!(biom_json(&table), expected);
    Ok(())
}

#[test]
fn dense_string_table() -> TestResult {
    let table = Table::builder(
        DenseMatrix::from_rows(vec![
            vec!["val1".to_string(), "val2".to_string()],
            vec!["val3".to_string(), "val4".to_string()],
        ])?,
        ["Samp1", "Samp2"],
        ["Obs1", "Obs2"],
    )
    .table_type(TableType::Otu)
    .build()?;

    let expected = json!({
        "rows": [
            {"id": "Obs1", "metadata": null},
            {"id": "Obs2", "metadata": null},
        ],
        "format": FORMAT,
        "data": [["val1", "val2"], ["val3", "val4"]],
        "columns": [
            {"id": "Samp1", "metadata": null},
            {"id": "Samp2", "metadata": null},
        ],
        "matrix_type": "dense",
        "shape": [2, 2],
        "format_url": FORMAT_URL,
        "type": "OTU table",
        "id": null,
        "matrix_element_type": "str",
    });
    assert_eq!(biom_json(&table), expected);
    Ok(())
}

// =============================================================================
// Sparse tables
// =============================================================================

#[test]
fn sparse_minimal_table() -> TestResult {
    let table = Table::builder(
        CooMatrix::from_coords(
            vec![((0, 0), 5.0), ((1, 0), 7.0), ((1, 1), 8.0)],
            None,
            false,
        ),
        ["a", "b"],
        ["1", "2"],
    )
    .table_type(TableType::Otu)
    .build()?;

    let expected = json!({
        "rows": [
            {"id": "1", "metadata": null},
            {"id": "2", "metadata": null},
        ],
        "format": FORMAT,
        "data": [[0, 0, 5.0], [1, 0, 7.0], [1, 1, 8.0]],
        "columns": [
            {"id": "a", "metadata": null},
            {"id": "b", "metadata": null},
        ],
        "matrix_type": "sparse",
        "shape": [2, 2],
        "format_url": FORMAT_URL,
        "type": "OTU table",
        "id": null,
        "matrix_element_type": "float",
    });
    assert_eq!(biom_json(&table), expected);
    Ok(())
}

#[test]
fn sparse_rich_table() -> TestResult {
    let table = Table::builder(
        CooMatrix::from_coords(
            vec![((0, 0), 5.0), ((1, 0), 7.0), ((1, 1), 8.0)],
            None,
            false,
        ),
        ["a", "b"],
        ["1", "2"],
    )
    .sample_metadata(sample_metadata())
    .observation_metadata(observation_metadata())
    .table_type(TableType::Otu)
    .build()?;

    let expected = json!({
        "rows": [
            {"id": "1", "metadata": {"taxonomy": ["k__a", "p__b"]}},
            {"id": "2", "metadata": {"taxonomy": ["k__a", "p__c"]}},
        ],
        "format": FORMAT,
        "data": [[0, 0, 5.0], [1, 0, 7.0], [1, 1, 8.0]],
        "columns": [
            {"id": "a", "metadata": {"barcode": "aatt"}},
            {"id": "b", "metadata": {"barcode": "ttgg"}},
        ],
        "matrix_type": "sparse",
        "shape": [2, 2],
        "format_url": FORMAT_URL,
        "type": "OTU table",
        "id": null,
        "matrix_element_type": "float",
    });
    assert_eq!(biom_json(&table), expected);
    Ok(())
}

#[test]
fn sparse_float_table() -> TestResult {
    let table = Table::builder(
        CooMatrix::from_coords(
            vec![
                ((0, 1), 2.5),
                ((0, 2), 3.4),
                ((1, 0), 9.3),
                ((1, 1), 10.23),
                ((1, 2), 2.2),
            ],
            None,
            false,
        ),
        ["a", "b", "c"],
        ["1", "2"],
    )
    .table_type(TableType::Otu)
    .build()?;

    let expected = json!({
        "rows": [
            {"id": "1", "metadata": null},
            {"id": "2", "metadata": null},
        ],
        "format": FORMAT,
        "data": [
            [0, 1, 2.5],
            [0, 2, 3.4],
            [1, 0, 9.3],
            [1, 1, 10.23],
            [1, 2, 2.2],
        ],
        "columns": [
            {"id": "a", "metadata": null},
            {"id": "b", "metadata": null},
            {"id": "c", "metadata": null},
        ],
        "matrix_type": "sparse",
        "shape": [2, 3],
        "format_url": FORMAT_URL,
        "type": "OTU table",
        "id": null,
        "matrix_element_type": "float",
    });
    assert_eq!(biom_json(&table), expected);
    Ok(())
}

#[test]
fn sparse_empty_table() -> TestResult {
    let table = Table::builder(CooMatrix::new(0, 0), Vec::<&str>::new(), Vec::<&str>::new())
        .table_type(TableType::Otu)
        .build()?;
    let value = biom_json(&table);
    assert_eq!(value["shape"], json!([0, 0]));
    assert_eq!(value["rows"], json!([]));
    assert_eq!(value["columns"], json!([]));
    assert_eq!(value["data"], json!([]));
    assert_eq!(value["matrix_type"], json!("sparse"));
    Ok(())
}

// =============================================================================
// Parity between backends
// =============================================================================

#[test]
fn dense_and_sparse_share_rows_columns_and_shape() -> TestResult {
    let dense = Table::builder(
        DenseMatrix::from_rows(vec![vec![5.0, 6.0], vec![7.0, 8.0]])?,
        ["a", "b"],
        ["1", "2"],
    )
    .sample_metadata(sample_metadata())
    .observation_metadata(observation_metadata())
    .table_type(TableType::Otu)
    .build()?;

    let sparse = Table::builder(
        CooMatrix::from_coords(
            vec![((0, 0), 5.0), ((0, 1), 6.0), ((1, 0), 7.0), ((1, 1), 8.0)],
            None,
            false,
        ),
        ["a", "b"],
        ["1", "2"],
    )
    .sample_metadata(sample_metadata())
    .observation_metadata(observation_metadata())
    .table_type(TableType::Otu)
    .build()?;

    let dense_value = biom_json(&dense);
    let sparse_value = biom_json(&sparse);
    for key in ["rows", "columns", "shape", "type", "format", "format_url", "id"] {
        assert_eq!(dense_value[key], sparse_value[key], "mismatch on {key}");
    }
    assert_eq!(dense_value["matrix_type"], json!("dense"));
    assert_eq!(sparse_value["matrix_type"], json!("sparse"));
    assert_eq!(dense_value["data"], json!([[5.0, 6.0], [7.0, 8.0]]));
    assert_eq!(
        sparse_value["data"],
        json!([[0, 0, 5.0], [0, 1, 6.0], [1, 0, 7.0], [1, 1, 8.0]])
    );
    Ok(())
}
