//! The solver's line-oriented input format.
//!
//! ```text
//! d t n
//! k a_1 … a_k      (seed set A of pair 1)
//! k b_1 … b_k      (seed set B of pair 1)
//! …                (n pairs total)
//! ```
//!
//! Whitespace between tokens and trailing whitespace are tolerated;
//! blank lines are skipped. Elements must lie in `1..=d` and each seed
//! line must describe a set (no duplicates); order within a line does
//! not matter.

use std::io::BufRead;

use crate::error::Error;
use crate::search::sumset::{Sumset, MAX_ELEMENT};

/// A parsed problem: dimensions plus the seed pairs to solve.
#[derive(Debug, Clone)]
pub struct InputData {
    /// Largest element value considered.
    pub d: u32,
    /// Worker thread count.
    pub threads: usize,
    /// Seed pairs, one solve each.
    pub pairs: Vec<(Sumset, Sumset)>,
}

impl InputData {
    /// Parses the full input format from a buffered reader.
    pub fn read_from<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut lines = NumberedLines::new(reader);

        let (line_no, header) = lines.next_content_line()?.ok_or_else(|| Error::Parse {
            line: 1,
            reason: "missing header line".into(),
        })?;
        let fields = parse_numbers(line_no, &header)?;
        let &[d, threads, count] = fields.as_slice() else {
            return Err(Error::Parse {
                line: line_no,
                reason: format!("expected `d t n`, found {} numbers", fields.len()),
            });
        };
        if d == 0 || d > u64::from(MAX_ELEMENT) {
            return Err(Error::Parse {
                line: line_no,
                reason: format!("d must be in 1..={MAX_ELEMENT}, got {d}"),
            });
        }
        if threads == 0 {
            return Err(Error::Parse {
                line: line_no,
                reason: "thread count must be at least 1".into(),
            });
        }
        let d = d as u32;

        // Sized by the actual seed lines, not the announced count, so a
        // hostile header cannot force a huge allocation up front.
        let mut pairs = Vec::new();
        for _ in 0..count {
            let a = read_seed(&mut lines, d)?;
            let b = read_seed(&mut lines, d)?;
            pairs.push((a, b));
        }

        Ok(Self {
            d,
            threads: threads as usize,
            pairs,
        })
    }
}

fn read_seed<R: BufRead>(lines: &mut NumberedLines<R>, d: u32) -> Result<Sumset, Error> {
    let Some((line_no, text)) = lines.next_content_line()? else {
        return Err(Error::Parse {
            line: lines.line + 1,
            reason: "missing seed line".into(),
        });
    };
    let numbers = parse_numbers(line_no, &text)?;
    let [count, elements @ ..] = &numbers[..] else {
        return Err(Error::Parse {
            line: line_no,
            reason: "empty seed line".into(),
        });
    };
    if *count as usize != elements.len() {
        return Err(Error::Parse {
            line: line_no,
            reason: format!("seed announces {count} elements, lists {}", elements.len()),
        });
    }

    let mut sorted: Vec<u64> = elements.to_vec();
    sorted.sort_unstable();
    let mut seed = Sumset::empty();
    for value in sorted {
        if value < 1 || value > u64::from(d) {
            return Err(Error::Parse {
                line: line_no,
                reason: format!("element {value} outside 1..={d}"),
            });
        }
        let value = value as u32;
        if value <= seed.last() {
            return Err(Error::Parse {
                line: line_no,
                reason: format!("duplicate element {value}"),
            });
        }
        seed = seed.extend(value);
    }
    Ok(seed)
}

fn parse_numbers(line: usize, text: &str) -> Result<Vec<u64>, Error> {
    text.split_whitespace()
        .map(|token| {
            token.parse().map_err(|_| Error::Parse {
                line,
                reason: format!("not an unsigned integer: {token:?}"),
            })
        })
        .collect()
}

struct NumberedLines<R> {
    reader: R,
    line: usize,
}

impl<R: BufRead> NumberedLines<R> {
    fn new(reader: R) -> Self {
        Self { reader, line: 0 }
    }

    /// Next non-blank line with its 1-based number, or `None` at EOF.
    fn next_content_line(&mut self) -> Result<Option<(usize, String)>, Error> {
        loop {
            let mut buffer = String::new();
            if self.reader.read_line(&mut buffer)? == 0 {
                return Ok(None);
            }
            self.line += 1;
            if !buffer.trim().is_empty() {
                return Ok(Some((self.line, buffer)));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_header_and_pairs() {
        let input = "5 2 2\n0\n0\n1 1\n2 2 3\n";
        let data = InputData::read_from(input.as_bytes()).unwrap();
        assert_eq!(data.d, 5);
        assert_eq!(data.threads, 2);
        assert_eq!(data.pairs.len(), 2);
        assert!(data.pairs[0].0.is_empty());
        assert_eq!(data.pairs[1].0.sum(), 1);
        assert_eq!(data.pairs[1].1.sum(), 5);
    }

    #[test]
    fn tolerates_blank_lines_and_trailing_whitespace() {
        let input = "6 1 1  \n\n  2 4 1 \n0\n";
        let data = InputData::read_from(input.as_bytes()).unwrap();
        assert_eq!(data.pairs[0].0.sum(), 5);
        assert_eq!(
            data.pairs[0].0.elements().collect::<Vec<_>>(),
            vec![1, 4]
        );
    }

    #[test]
    fn rejects_bad_headers() {
        for input in ["", "5 2\n", "0 1 0\n", "99 1 0\n", "5 0 0\n", "x 1 0\n"] {
            assert!(
                InputData::read_from(input.as_bytes()).is_err(),
                "accepted {input:?}"
            );
        }
    }

    #[test]
    fn rejects_bad_seeds() {
        for input in [
            "5 1 1\n2 1\n0\n",       // count mismatch
            "5 1 1\n1 9\n0\n",       // out of range
            "5 1 1\n2 3 3\n0\n",     // duplicate
            "5 1 1\n1 1\n",          // missing second seed
            "5 1 1\n1 0\n0\n",       // zero element
        ] {
            assert!(
                InputData::read_from(input.as_bytes()).is_err(),
                "accepted {input:?}"
            );
        }
    }
}
