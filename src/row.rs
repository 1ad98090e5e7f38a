use {
    crate::rule::{Bit, RULE},
    ndarray::ArrayView1,
    rustc_hash::FxHashMap,
};

/// Big-endian encoding of a full strip boundary, first column in the most significant bit.
pub type BoundaryId = u64;

/// Longest row that still leaves room for its `len + 1` boundary in a [`BoundaryId`].
pub const MAX_ROW_LEN: usize = BoundaryId::BITS as usize - 1;

/// Every 2-row previous strip that evolves into one observed row, as a
/// multi-relation between upper and lower boundary ids.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RowReconstruction {
    by_upper: FxHashMap<BoundaryId, Vec<BoundaryId>>,
    by_lower: FxHashMap<BoundaryId, Vec<BoundaryId>>,
    len: usize,
}

impl RowReconstruction {
    fn insert(&mut self, upper: BoundaryId, lower: BoundaryId) {
        self.by_upper.entry(upper).or_default().push(lower);
        self.by_lower.entry(lower).or_default().push(upper);
        self.len += 1;
    }

    /// Number of strips.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn lowers_of(&self, upper: BoundaryId) -> Option<&[BoundaryId]> {
        self.by_upper.get(&upper).map(Vec::as_slice)
    }

    #[cfg(test)]
    pub(crate) fn uppers_of(&self, lower: BoundaryId) -> Option<&[BoundaryId]> {
        self.by_lower.get(&lower).map(Vec::as_slice)
    }

    #[cfg(test)]
    fn upper_ids(&self) -> impl Iterator<Item = BoundaryId> + '_ {
        self.by_upper.keys().copied()
    }

    #[cfg(test)]
    fn lower_ids(&self) -> impl Iterator<Item = BoundaryId> + '_ {
        self.by_lower.keys().copied()
    }

    pub fn by_upper(&self) -> impl Iterator<Item = (BoundaryId, &[BoundaryId])> + '_ {
        self.by_upper.iter().map(|(&id, ids)| (id, ids.as_slice()))
    }

    pub fn by_lower(&self) -> impl Iterator<Item = (BoundaryId, &[BoundaryId])> + '_ {
        self.by_lower.iter().map(|(&id, ids)| (id, ids.as_slice()))
    }
}

// a strip under construction; both boundaries are kept as their id prefix so
// branching never copies cells
#[derive(Clone, Copy)]
struct Partial {
    upper: BoundaryId,
    lower: BoundaryId,
    column: usize,
    carry: Bit,
}

impl Partial {
    fn extend(self, [upper, lower]: [Bit; 2]) -> Self {
        Self {
            upper: self.upper << 1 | BoundaryId::from(upper),
            lower: self.lower << 1 | BoundaryId::from(lower),
            column: self.column + 1,
            carry: upper + lower,
        }
    }
}

/// Enumerates every strip of length `row.len() + 1` that evolves into `row`.
///
/// Panics if `row` is empty or longer than [`MAX_ROW_LEN`].
pub fn reconstruct(row: ArrayView1<bool>) -> RowReconstruction {
    let w = row.len();
    assert!(
        (1..=MAX_ROW_LEN).contains(&w),
        "row length {w} outside 1..={MAX_ROW_LEN}"
    );

    let mut out = RowReconstruction::default();

    let mut stack: Vec<Partial> = RULE
        .seed(row[0])
        .iter()
        .map(|&[a, b, c, d]| Partial {
            upper: BoundaryId::from(a) << 1 | BoundaryId::from(b),
            lower: BoundaryId::from(c) << 1 | BoundaryId::from(d),
            column: 1,
            carry: b + d,
        })
        .collect();

    while let Some(partial) = stack.pop() {
        if partial.column == w {
            out.insert(partial.upper, partial.lower);
            continue;
        }

        // an empty step prunes this branch
        stack.extend(
            RULE.step(row[partial.column], partial.carry)
                .iter()
                .map(|&column| partial.extend(column)),
        );
    }

    out
}

/// Cache key for a row: its length and big-endian encoding.
pub fn row_key(row: ArrayView1<bool>) -> (usize, u64) {
    let bits = row
        .iter()
        .fold(0, |acc: u64, &b| acc << 1 | u64::from(b));
    (row.len(), bits)
}
