//! Counts the previous generations of a grid under the "exactly one of four"
//! rule, where a cell is on iff exactly one cell of the 2x2 block covering it
//! in an (h + 1) x (w + 1) previous grid was on.
//!
//! Each row of the observed grid is reconstructed on its own as the set of
//! 2-row strips that evolve into it ([`row`]), repeated rows are reconstructed
//! once ([`cache`]), and the strips are glued row by row along their shared
//! boundaries ([`merge`]) while counting multiplicities.
//!
//! ```
//! let count = nebula::count_previous_states(&[[true, false], [false, false]]).unwrap();
//! assert_eq!(count.to_string(), "38");
//! ```

pub mod cache;
pub mod error;
pub mod merge;
pub mod row;
pub mod rule;
pub mod serialization;
pub mod solve;

pub use {
    error::{Error, MalformedGridError},
    solve::{count_previous_states, solve, Solution, SolveOptions},
};

/// Rewrites the current terminal line in place.
#[derive(Default)]
pub struct Overwriter {
    last_len: usize,
}

impl Overwriter {
    pub fn print(&mut self, line: &str) -> std::io::Result<()> {
        self.print_to(&mut std::io::stdout().lock(), line)
    }

    pub fn print_to(&mut self, out: &mut impl std::io::Write, line: &str) -> std::io::Result<()> {
        use std::io::Write;

        // blank out whatever is left of a longer previous line
        let pad = self.last_len.saturating_sub(line.len());
        write!(out, "\r{line}{:pad$}", "")?;
        out.flush()?;
        self.last_len = line.len();
        Ok(())
    }
}

#[test]
fn test_overwriter() {
    let mut out = Vec::new();
    let mut overwriter = Overwriter::default();

    overwriter.print_to(&mut out, "folding row 10/12").unwrap();
    overwriter.print_to(&mut out, "done").unwrap();

    assert_eq!(
        String::from_utf8(out).unwrap(),
        "\rfolding row 10/12\rdone             "
    );
}
