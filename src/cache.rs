use {
    crate::row::{reconstruct, row_key, RowReconstruction},
    ndarray::ArrayView1,
    rayon::prelude::*,
    rustc_hash::{FxHashMap, FxHashSet},
    std::{collections::hash_map::Entry, sync::Arc},
};

/// Reconstructions keyed by row content, living for one solve.
#[derive(Default)]
pub struct RowCache {
    rows: FxHashMap<(usize, u64), Arc<RowReconstruction>>,
    hits: usize,
}

impl RowCache {
    pub fn get(&mut self, row: ArrayView1<bool>) -> Arc<RowReconstruction> {
        match self.rows.entry(row_key(row)) {
            Entry::Occupied(entry) => {
                self.hits += 1;
                entry.get().clone()
            }
            Entry::Vacant(entry) => {
                entry.insert(Arc::new(reconstruct(row))).clone()
            }
        }
    }

    /// Reconstructs every distinct row not yet cached, in parallel.
    pub fn precompute<'a>(&mut self, rows: impl IntoIterator<Item = ArrayView1<'a, bool>>) {
        let mut seen = FxHashSet::default();
        let missing: Vec<_> = rows
            .into_iter()
            .map(|row| (row_key(row), row))
            .filter(|(key, _)| !self.rows.contains_key(key) && seen.insert(*key))
            .collect();

        let computed: Vec<_> = missing
            .into_par_iter()
            .map(|(key, row)| (key, Arc::new(reconstruct(row))))
            .collect();

        self.rows.extend(computed);
    }

    /// Number of distinct rows reconstructed.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Requests served without reconstructing.
    pub fn hits(&self) -> usize {
        self.hits
    }
}
