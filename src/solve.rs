use {
    crate::{
        cache::RowCache,
        error::{Error, MalformedGridError},
        merge::RunningAggregate,
        row::{reconstruct, MAX_ROW_LEN},
    },
    ndarray::{Array2, ArrayView1, ArrayView2},
    num_bigint::BigUint,
    std::sync::Arc,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SolveOptions {
    /// Reconstruct each distinct row once. Off, every row is reconstructed again.
    pub memoize: bool,
    /// Reconstruct all distinct rows in parallel before folding. Only used with `memoize`.
    pub precompute: bool,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            memoize: true,
            precompute: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Solution {
    pub count: BigUint,
    /// Rows folded, after orientation.
    pub rows: usize,
    /// Length of each reconstructed row, the narrow side of the grid.
    pub row_len: usize,
    pub reconstructions: usize,
    pub transposed: bool,
}

/// Counts the previous generations that evolve into `grid`.
pub fn count_previous_states<R: AsRef<[bool]>>(grid: &[R]) -> Result<BigUint, Error> {
    let grid = from_rows(grid)?;
    Ok(solve(grid.view(), SolveOptions::default(), |_, _| {})?.count)
}

/// Builds a grid from rows of cells, rejecting empty and ragged input.
pub fn from_rows<R: AsRef<[bool]>>(rows: &[R]) -> Result<Array2<bool>, MalformedGridError> {
    let expected = rows.first().map_or(0, |row| row.as_ref().len());
    if expected == 0 {
        return Err(MalformedGridError::Empty);
    }

    for (i, row) in rows.iter().enumerate() {
        let len = row.as_ref().len();
        if len != expected {
            return Err(MalformedGridError::Ragged {
                row: i,
                len,
                expected,
            });
        }
    }

    Ok(Array2::from_shape_fn((rows.len(), expected), |(i, j)| {
        rows[i].as_ref()[j]
    }))
}

/// Counts previous generations of `grid`, calling `progress(folded, total)` after each row.
///
/// Once no boundary can be continued the fold stops and the count is zero; `progress`
/// still ends on `(total, total)`.
pub fn solve(
    grid: ArrayView2<bool>,
    options: SolveOptions,
    mut progress: impl FnMut(usize, usize),
) -> Result<Solution, Error> {
    if grid.is_empty() {
        return Err(MalformedGridError::Empty.into());
    }

    // reconstruction cost grows exponentially with row length, so rows run along the narrow side
    let transposed = grid.ncols() > grid.nrows();
    let grid = if transposed {
        grid.reversed_axes()
    } else {
        grid
    };

    let (rows, row_len) = grid.dim();
    if row_len > MAX_ROW_LEN {
        return Err(Error::TooWide {
            len: row_len,
            max: MAX_ROW_LEN,
        });
    }

    let mut cache = RowCache::default();
    if options.memoize && options.precompute {
        cache.precompute(grid.rows());
    }

    let mut uncached = 0;
    let mut fetch = |row: ArrayView1<bool>| {
        if options.memoize {
            cache.get(row)
        } else {
            uncached += 1;
            Arc::new(reconstruct(row))
        }
    };

    let mut aggregate = RunningAggregate::initial(&fetch(grid.row(0)));
    progress(1, rows);

    for (i, row) in grid.rows().into_iter().enumerate().skip(1) {
        if aggregate.is_empty() {
            progress(rows, rows);
            break;
        }

        aggregate.merge(&fetch(row));
        progress(i + 1, rows);
    }

    Ok(Solution {
        count: aggregate.count(),
        rows,
        row_len,
        reconstructions: if options.memoize { cache.len() } else { uncached },
        transposed,
    })
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::rule::evolve,
        ndarray::array,
        rand::Rng,
    };

    const T: bool = true;
    const F: bool = false;

    fn count(grid: ArrayView2<bool>) -> BigUint {
        solve(grid, SolveOptions::default(), |_, _| {}).unwrap().count
    }

    fn brute_force(grid: ArrayView2<bool>) -> BigUint {
        let (h, w) = grid.dim();
        let cells = (h + 1) * (w + 1);

        let n = (0..1u64 << cells)
            .filter(|n| {
                let previous =
                    Array2::from_shape_fn((h + 1, w + 1), |(i, j)| n >> (i * (w + 1) + j) & 1 == 1);
                evolve(previous.view()) == grid
            })
            .count();

        BigUint::from(n)
    }

    fn random_grid(rng: &mut rand::rngs::ThreadRng, max_h: usize, max_w: usize) -> Array2<bool> {
        let h = rng.gen_range(1..=max_h);
        let w = rng.gen_range(1..=max_w);
        Array2::from_shape_fn((h, w), |_| rng.gen())
    }

    #[test]
    fn test_known_grids() {
        let cases: Vec<(Vec<Vec<bool>>, &str)> = vec![
            (vec![vec![T, T], vec![T, T]], "8"),
            (vec![vec![T, F, T], vec![F, T, F], vec![T, F, T]], "4"),
            (vec![vec![F]], "12"),
            (vec![vec![T]], "4"),
            (vec![vec![T, F], vec![F, F]], "38"),
            (vec![vec![T, F, F, T]], "28"),
            (vec![vec![T], vec![F], vec![F], vec![T]], "28"),
            (
                vec![
                    vec![T, T, F, T, F, T, F, T, T, F],
                    vec![T, T, F, F, F, F, T, T, T, F],
                    vec![T, T, F, F, F, F, F, F, F, T],
                    vec![F, T, F, F, F, F, T, T, F, F],
                ],
                "11567",
            ),
            (
                vec![
                    vec![T, F, T, F, F, T, T, T],
                    vec![T, F, T, F, F, F, T, F],
                    vec![T, T, T, F, F, F, T, F],
                    vec![T, F, T, F, F, F, T, F],
                    vec![T, F, T, F, F, T, T, T],
                ],
                "254",
            ),
        ];

        for (grid, expected) in cases {
            let result = count_previous_states(grid.as_slice()).unwrap();
            assert_eq!(result.to_string(), expected, "grid {grid:?}");
        }
    }

    #[test]
    fn test_counts_beyond_fixed_width() {
        assert_eq!(
            count(Array2::from_elem((3, 4), false).view()),
            BigUint::from(93028u32)
        );

        let expected: BigUint = "11120769169858419133753537548036248985483291543832"
            .parse()
            .unwrap();
        assert!(expected > BigUint::from(u128::MAX));
        assert_eq!(count(Array2::from_elem((4, 40), false).view()), expected);
    }

    #[test]
    fn test_malformed() {
        assert_eq!(
            count_previous_states(&[vec![T, F], vec![T]]),
            Err(Error::Malformed(MalformedGridError::Ragged {
                row: 1,
                len: 1,
                expected: 2
            }))
        );
        assert_eq!(
            count_previous_states::<Vec<bool>>(&[]),
            Err(Error::Malformed(MalformedGridError::Empty))
        );
        assert_eq!(
            count_previous_states(&[Vec::<bool>::new(), Vec::new()]),
            Err(Error::Malformed(MalformedGridError::Empty))
        );
        assert_eq!(
            solve(Array2::<bool>::from_elem((3, 0), false).view(), SolveOptions::default(), |_, _| {}),
            Err(Error::Malformed(MalformedGridError::Empty))
        );
    }

    #[test]
    fn test_too_wide() {
        let grid = Array2::from_elem((64, 70), true);
        assert_eq!(
            solve(grid.view(), SolveOptions::default(), |_, _| {}),
            Err(Error::TooWide { len: 64, max: 63 })
        );
    }

    #[test]
    fn test_orientation() {
        let wide = Array2::from_elem((2, 5), false);
        let solution = solve(wide.view(), SolveOptions::default(), |_, _| {}).unwrap();
        assert!(solution.transposed);
        assert_eq!((solution.rows, solution.row_len), (5, 2));
        assert_eq!(solution.reconstructions, 1);

        let tall = array![[T, F], [F, F], [T, F], [F, F]];
        let solution = solve(tall.view(), SolveOptions::default(), |_, _| {}).unwrap();
        assert!(!solution.transposed);
        assert_eq!((solution.rows, solution.row_len), (4, 2));
        assert_eq!(solution.reconstructions, 2);
    }

    #[test]
    fn test_progress() {
        let grid = array![[T, F, T], [F, F, T], [T, T, F], [F, T, F]];
        let mut seen = Vec::new();
        solve(grid.view(), SolveOptions::default(), |i, n| seen.push((i, n))).unwrap();
        assert_eq!(seen, [(1, 4), (2, 4), (3, 4), (4, 4)]);
    }

    #[test]
    fn test_matches_brute_force() {
        let mut rng = rand::thread_rng();

        for _ in 0..20 {
            let grid = random_grid(&mut rng, 3, 3);
            assert_eq!(count(grid.view()), brute_force(grid.view()), "grid {grid:?}");
        }
    }

    #[test]
    fn test_transpose_invariance() {
        let mut rng = rand::thread_rng();

        for _ in 0..50 {
            let grid = random_grid(&mut rng, 6, 8);
            assert_eq!(count(grid.view()), count(grid.t()), "grid {grid:?}");
        }
    }

    #[test]
    fn test_cache_is_transparent() {
        let mut rng = rand::thread_rng();

        let variants = [
            SolveOptions::default(),
            SolveOptions {
                memoize: true,
                precompute: false,
            },
            SolveOptions {
                memoize: false,
                precompute: false,
            },
        ];

        for _ in 0..30 {
            let mut grid = random_grid(&mut rng, 8, 5);
            // force repeated rows
            if grid.nrows() > 2 {
                let first = grid.row(0).to_owned();
                grid.row_mut(grid.nrows() - 1).assign(&first);
            }

            let results: Vec<_> = variants
                .iter()
                .map(|&options| solve(grid.view(), options, |_, _| {}).unwrap().count)
                .collect();

            assert_eq!(results[0], results[1], "grid {grid:?}");
            assert_eq!(results[0], results[2], "grid {grid:?}");
        }
    }

    #[test]
    fn test_deterministic() {
        let grid = array![[T, F, F, T, F], [F, T, F, F, F], [T, T, F, T, T]];
        let first = count(grid.view());
        for _ in 0..5 {
            assert_eq!(count(grid.view()), first);
        }
    }

    #[test]
    fn test_all_on() {
        let grid = Array2::from_elem((3, 3), true);
        assert_eq!(count(grid.view()), BigUint::from(12u32));
        assert_eq!(count(grid.view()), brute_force(grid.view()));
    }

    #[test]
    fn test_unreachable_grid_stops_early() {
        let grid = array![
            [F, T, F, T, F, T, T, T],
            [F, F, T, T, F, T, F, F],
            [T, T, F, T, T, T, T, T],
            [F, F, T, F, T, T, F, F],
            [F, F, T, T, F, F, T, T],
            [F, T, F, T, F, F, F, F],
        ];
        let options = SolveOptions {
            memoize: false,
            precompute: false,
        };

        let mut seen = Vec::new();
        let solution = solve(grid.view(), options, |i, n| seen.push((i, n))).unwrap();

        // no previous generation survives the first seven columns
        assert_eq!(solution.count, BigUint::default());
        assert_eq!(solution.reconstructions, 7);
        assert_eq!(seen.last(), Some(&(8, 8)));
        assert_eq!(seen.len(), 8);
        assert_eq!(count(grid.slice(ndarray::s![.., ..7])), BigUint::default());
        assert_eq!(
            count(grid.slice(ndarray::s![.., ..6])),
            BigUint::from(18u32)
        );
    }
}
