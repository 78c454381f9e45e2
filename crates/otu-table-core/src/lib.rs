//! Core engine for dense- and sparse-backed abundance (OTU) tables.
//!
//! This crate provides the foundational pieces for `otu-table-format`:
//!
//! - A generic [`table::Table`] over interchangeable storage backends,
//!   carrying per-observation and per-sample ids and optional metadata.
//! - Two storage engines implementing one contract: a row-major dense
//!   matrix (`dense`) and a coordinate-map sparse matrix (`sparse`).
//! - Metadata maps with `None`-on-absent-key lookup semantics (`metadata`).
//! - Filtering, transformation, and metadata-driven binning expressed once
//!   against the backend hooks (`table`, `table::bin`).
//! - BIOM v0.9 exchange-format serialization (`biom`).
//!
//! Higher-level integration crates are expected to depend on this core crate
//! rather than re-implementing the table and serialization logic.
#![deny(missing_docs)]
pub mod backend;
pub mod biom;
pub mod dense;
pub mod error;
pub mod metadata;
pub mod sparse;
pub mod table;
