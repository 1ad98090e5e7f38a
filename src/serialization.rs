use nanoserde::{DeJson, SerJson};

pub mod text {
    // format: one row per line, `O` `#` `1` on, `.` `0` off; lines starting with `!` are comments

    use {
        crate::{error::Error, solve::from_rows},
        ndarray::{Array2, ArrayView2},
    };

    pub fn parse(input: &str) -> Result<Array2<bool>, Error> {
        let mut rows = Vec::new();

        for (n, line) in input.lines().enumerate() {
            let line = line.trim_end();
            if line.is_empty() || line.starts_with('!') {
                continue;
            }

            let row = line
                .chars()
                .enumerate()
                .map(|(column, c)| match c {
                    'O' | 'o' | '#' | '1' => Ok(true),
                    '.' | '0' => Ok(false),
                    found => Err(Error::InvalidCell {
                        line: n + 1,
                        column: column + 1,
                        found,
                    }),
                })
                .collect::<Result<Vec<bool>, Error>>()?;

            rows.push(row);
        }

        Ok(from_rows(rows.as_slice())?)
    }

    pub fn format(grid: ArrayView2<bool>) -> String {
        let mut out = String::with_capacity(grid.len() + grid.nrows());

        for row in grid.rows() {
            out.extend(row.iter().map(|&b| if b { 'O' } else { '.' }));
            out.push('\n');
        }

        out
    }

    #[test]
    fn test_parse() {
        use ndarray::array;

        let input = "! glider\n.O.\n..O\nOOO\n\n";
        assert_eq!(
            parse(input).unwrap(),
            array![[false, true, false], [false, false, true], [true, true, true]]
        );

        assert_eq!(parse("#.\n01\n").unwrap(), array![[true, false], [false, true]]);
        assert_eq!(format(array![[true, false], [false, true]].view()), "O.\n.O\n");
    }

    #[test]
    fn test_parse_errors() {
        use crate::error::MalformedGridError;

        assert_eq!(
            parse("O.\nOx\n"),
            Err(Error::InvalidCell {
                line: 2,
                column: 2,
                found: 'x'
            })
        );
        assert_eq!(
            parse("O.\nO\n"),
            Err(Error::Malformed(MalformedGridError::Ragged {
                row: 1,
                len: 1,
                expected: 2
            }))
        );
        assert_eq!(
            parse("! nothing here\n"),
            Err(Error::Malformed(MalformedGridError::Empty))
        );
    }
}

pub mod json {
    // format: array of rows of booleans, `[[true, false], [false, true]]`

    use {
        crate::{error::Error, solve::from_rows},
        nanoserde::DeJson,
        ndarray::Array2,
    };

    #[cfg(test)]
    use {nanoserde::SerJson, ndarray::ArrayView2};

    pub fn parse(input: &str) -> Result<Array2<bool>, Error> {
        let rows = Vec::<Vec<bool>>::deserialize_json(input)
            .map_err(|err| Error::Json(format!("{err:?}")))?;
        Ok(from_rows(rows.as_slice())?)
    }

    #[cfg(test)]
    fn format(grid: ArrayView2<bool>) -> String {
        grid.rows()
            .into_iter()
            .map(|row| row.to_vec())
            .collect::<Vec<_>>()
            .serialize_json()
    }

    #[test]
    fn test_parse() {
        use ndarray::array;

        let grid = array![[true, false, true], [false, true, false]];
        assert_eq!(parse("[[true, false, true], [false, true, false]]").unwrap(), grid);
        assert_eq!(parse(&format(grid.view())).unwrap(), grid);

        assert!(matches!(parse("[[true, 1]]"), Err(Error::Json(_))));
        assert!(matches!(
            parse("[[true, false], [true]]"),
            Err(Error::Malformed(_))
        ));
    }
}

// summary of one solve, as printed by `--report`
#[derive(SerJson, DeJson, Debug, PartialEq)]
pub struct Report {
    pub rows: usize,
    pub cols: usize,
    // decimal, counts overflow every fixed-width integer
    pub count: String,
    pub reconstructions: usize,
    pub transposed: bool,
    pub millis: u64,
}

impl Report {
    pub fn new(
        grid: ndarray::ArrayView2<bool>,
        solution: &crate::solve::Solution,
        elapsed: std::time::Duration,
    ) -> Self {
        Self {
            rows: grid.nrows(),
            cols: grid.ncols(),
            count: solution.count.to_string(),
            reconstructions: solution.reconstructions,
            transposed: solution.transposed,
            millis: elapsed.as_millis().try_into().unwrap_or(u64::MAX),
        }
    }
}

#[test]
fn test_report() {
    use crate::solve::{solve, SolveOptions};

    let grid = ndarray::array![[true, true, false], [true, true, false]];
    let solution = solve(grid.view(), SolveOptions::default(), |_, _| {}).unwrap();
    let report = Report::new(
        grid.view(),
        &solution,
        std::time::Duration::from_millis(1500),
    );

    assert_eq!((report.rows, report.cols), (2, 3));
    assert!(report.transposed);
    assert_eq!(report.millis, 1500);
    assert_eq!(report.count, solution.count.to_string());

    let json = report.serialize_json();
    assert_eq!(Report::deserialize_json(&json).unwrap(), report);
}
