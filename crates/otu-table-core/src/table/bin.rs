//! Metadata-driven grouping ("binning") of samples or observations.
//!
//! One shared engine serves both axes and both backends: walk the axis
//! through the iteration contract, derive a key from each member's metadata,
//! group members under the first occurrence of their key, and cut one
//! sub-table per group on that axis (the other axis is untouched).
//!
//! Key order is first-seen order; member order within a bin follows the
//! declared axis order. Members whose axis carries no metadata are handed
//! `None`, so a key type of `Option<_>` gives them their own distinguished
//! group.

use crate::backend::Backend;
use crate::error::TableResult;
use crate::metadata::MetadataMap;
use crate::table::Table;

impl<B: Backend> Table<B> {
    /// Group samples by `key_fn(sample_metadata)`, yielding
    /// `(key, sub_table)` pairs in first-seen key order.
    pub fn bin_samples_by_metadata<F, K>(&self, mut key_fn: F) -> TableResult<Vec<(K, Self)>>
    where
        F: FnMut(Option<&MetadataMap>) -> K,
        K: PartialEq,
    {
        let mut bins: Vec<(K, Vec<usize>)> = Vec::new();
        for (index, triple) in self.iter_samples().enumerate() {
            let (_, _, metadata) = triple?;
            insert_into_bin(&mut bins, key_fn(metadata), index);
        }
        bins.into_iter()
            .map(|(key, members)| Ok((key, self.subset_samples(&members)?)))
            .collect()
    }

    /// Group observations by `key_fn(observation_metadata)`, yielding
    /// `(key, sub_table)` pairs in first-seen key order.
    pub fn bin_observations_by_metadata<F, K>(&self, mut key_fn: F) -> TableResult<Vec<(K, Self)>>
    where
        F: FnMut(Option<&MetadataMap>) -> K,
        K: PartialEq,
    {
        let mut bins: Vec<(K, Vec<usize>)> = Vec::new();
        for (index, triple) in self.iter_observations().enumerate() {
            let (_, _, metadata) = triple?;
            insert_into_bin(&mut bins, key_fn(metadata), index);
        }
        bins.into_iter()
            .map(|(key, members)| Ok((key, self.subset_observations(&members)?)))
            .collect()
    }
}

fn insert_into_bin<K: PartialEq>(bins: &mut Vec<(K, Vec<usize>)>, key: K, index: usize) {
    match bins.iter_mut().find(|(existing, _)| *existing == key) {
        Some((_, members)) => members.push(index),
        None => bins.push((key, vec![index])),
    }
}
