//! The fixed local rule: a cell is on in the next generation iff exactly one
//! cell of the 2x2 block above-left of it was on.

use ndarray::{Array2, ArrayView2};

pub type Bit = u8;

/// A 2x2 block of previous cells, `[top left, top right, bottom left, bottom right]`.
pub type Window = [Bit; 4];

/// One column of a 2-row strip, `[upper, lower]`.
pub type Column = [Bit; 2];

/// Precomputed continuation tables for the rule.
///
/// `seed` lists the windows that produce a target bit. `step` lists the columns
/// that can follow a column whose cells sum to `carry`, indexed `[target][carry]`.
pub struct TransitionRule {
    seeds: [&'static [Window]; 2],
    steps: [[&'static [Column]; 3]; 2],
}

pub const RULE: TransitionRule = TransitionRule {
    seeds: [
        &[
            [0, 0, 0, 0],
            [1, 1, 0, 0],
            [1, 0, 1, 0],
            [1, 0, 0, 1],
            [0, 1, 1, 0],
            [0, 1, 0, 1],
            [0, 0, 1, 1],
            [0, 1, 1, 1],
            [1, 0, 1, 1],
            [1, 1, 0, 1],
            [1, 1, 1, 0],
            [1, 1, 1, 1],
        ],
        &[[1, 0, 0, 0], [0, 1, 0, 0], [0, 0, 1, 0], [0, 0, 0, 1]],
    ],
    steps: [
        [
            &[[0, 0], [1, 1]],
            &[[1, 0], [0, 1], [1, 1]],
            &[[0, 0], [1, 0], [0, 1], [1, 1]],
        ],
        [&[[1, 0], [0, 1]], &[[0, 0]], &[]],
    ],
};

impl TransitionRule {
    pub fn seed(&self, target: bool) -> &'static [Window] {
        self.seeds[usize::from(target)]
    }

    /// Panics if `carry` is not a column sum, i.e. outside `0..=2`.
    pub fn step(&self, target: bool, carry: Bit) -> &'static [Column] {
        assert!(carry <= 2, "carry out of range: {carry}");
        self.steps[usize::from(target)][usize::from(carry)]
    }

    pub fn produces(&self, window: Window) -> bool {
        window.iter().sum::<Bit>() == 1
    }
}

/// Advances `previous` by one generation. The result is one cell smaller on each axis.
pub fn evolve(previous: ArrayView2<bool>) -> Array2<bool> {
    let (h, w) = previous.dim();
    let bit = |i: usize, j: usize| Bit::from(previous[(i, j)]);

    Array2::from_shape_fn((h.saturating_sub(1), w.saturating_sub(1)), |(i, j)| {
        RULE.produces([bit(i, j), bit(i, j + 1), bit(i + 1, j), bit(i + 1, j + 1)])
    })
}
