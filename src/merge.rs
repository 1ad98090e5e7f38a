//! Folding per-row reconstructions into a count of whole previous grids.
//!
//! Two adjacent rows agree when the lower boundary of one strip is the upper
//! boundary of the next, so the fold is a relational composition with
//! multiplicities over the shared boundary ids.

use {
    crate::row::{BoundaryId, RowReconstruction},
    num_bigint::BigUint,
    rustc_hash::FxHashMap,
};

/// Number of ways to reach each lower boundary, over every row folded so far.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunningAggregate {
    counts: FxHashMap<BoundaryId, BigUint>,
}

impl RunningAggregate {
    pub fn initial(row: &RowReconstruction) -> Self {
        Self {
            counts: row
                .by_lower()
                .map(|(lower, uppers)| (lower, BigUint::from(uppers.len())))
                .collect(),
        }
    }

    /// Extends every counted grid by one strip whose upper boundary matches.
    /// Lower boundaries with no matching strip drop out.
    pub fn merge(&mut self, row: &RowReconstruction) {
        let mut next: FxHashMap<BoundaryId, BigUint> = FxHashMap::default();

        for (&id, count) in &self.counts {
            if let Some(lowers) = row.lowers_of(id) {
                for &lower in lowers {
                    *next.entry(lower).or_default() += count;
                }
            }
        }

        self.counts = next;
    }

    pub fn count(&self) -> BigUint {
        self.counts.values().sum()
    }

    #[cfg(test)]
    fn get(&self, id: BoundaryId) -> Option<&BigUint> {
        self.counts.get(&id)
    }

    #[cfg(test)]
    fn ids(&self) -> impl Iterator<Item = BoundaryId> + '_ {
        self.counts.keys().copied()
    }

    /// No lower boundary is reachable, so nothing folded later can make the count nonzero.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Full upper-to-lower relation of a run of consecutive rows.
///
/// Unlike [`RunningAggregate`] this keeps the upper boundary, so runs can be
/// composed in any grouping. Only the tests fold this way.
#[cfg(test)]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct Composite {
    relation: FxHashMap<BoundaryId, FxHashMap<BoundaryId, BigUint>>,
}

#[cfg(test)]
impl Composite {
    fn from_row(row: &RowReconstruction) -> Self {
        let mut relation: FxHashMap<BoundaryId, FxHashMap<BoundaryId, BigUint>> =
            FxHashMap::default();

        for (upper, lowers) in row.by_upper() {
            let entry = relation.entry(upper).or_default();
            for &lower in lowers {
                *entry.entry(lower).or_default() += 1u32;
            }
        }

        Self { relation }
    }

    /// The run of `self` followed by the run of `next`.
    fn compose(&self, next: &Self) -> Self {
        let mut relation: FxHashMap<BoundaryId, FxHashMap<BoundaryId, BigUint>> =
            FxHashMap::default();

        for (&upper, middles) in &self.relation {
            for (middle, count) in middles {
                let Some(lowers) = next.relation.get(middle) else {
                    continue;
                };

                let entry = relation.entry(upper).or_default();
                for (&lower, next_count) in lowers {
                    *entry.entry(lower).or_default() += count * next_count;
                }
            }
        }

        Self { relation }
    }

    fn count(&self) -> BigUint {
        self.relation.values().flat_map(|lowers| lowers.values()).sum()
    }
}
