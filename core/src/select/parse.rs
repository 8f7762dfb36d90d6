//! Fail-soft parsing of user-entered selection text.
//!
//! Selection fields hold a bracketed, comma-separated integer list like
//! `[0, 16, 3]`. The grammar is strict (no arbitrary expressions), but
//! failure is never surfaced: malformed text, negative values, or a length
//! that doesn't match the variable's rank all substitute the default vector
//! so the caller always has a usable selection.

use winnow::{
    ascii::{digit1, space0},
    multi::separated0,
    sequence::delimited,
    IResult, Parser,
};

use super::{Selection, StepRange};

fn index(i: &str) -> IResult<&str, usize> {
    digit1
        .try_map(str::parse::<usize>)
        .context("index")
        .parse_next(i)
}

fn index_list(i: &str) -> IResult<&str, Vec<usize>> {
    delimited(
        ('[', space0),
        separated0(index, (space0, ',', space0)),
        (space0, ']'),
    )
    .context("index_list")
    .parse_next(i)
}

/// Strict parse of a bracketed integer list; `None` on any syntax error or
/// trailing garbage.
fn parse_strict(text: &str) -> Option<Vec<usize>> {
    let (rest, values) = index_list(text.trim()).ok()?;
    if !rest.is_empty() {
        return None;
    }
    Some(values)
}

/// Parses a bracketed integer list of exactly `rank` elements, substituting
/// `vec![default_fill; rank]` on any failure (including a length mismatch,
/// e.g. stale text left over after switching variables).
pub fn parse_vector(text: &str, rank: usize, default_fill: usize) -> Vec<usize> {
    match parse_strict(text) {
        Some(values) if values.len() == rank => values,
        _ => vec![default_fill; rank],
    }
}

/// Start vector: defaults to the origin.
pub fn parse_start(text: &str, rank: usize) -> Vec<usize> {
    parse_vector(text, rank, 0)
}

/// Count vector: defaults to all-ones. A zero count is structurally invalid
/// (every axis selects at least one element) and also falls back.
pub fn parse_count(text: &str, rank: usize) -> Vec<usize> {
    match parse_strict(text) {
        Some(values) if values.len() == rank && values.iter().all(|&c| c >= 1) => values,
        _ => vec![1; rank],
    }
}

/// Scalar step field, same fail-soft contract as the vectors.
pub fn parse_step(text: &str, default: usize) -> usize {
    text.trim().parse().unwrap_or(default)
}

pub fn parse_selection(start_text: &str, count_text: &str, rank: usize) -> Selection {
    Selection::new(parse_start(start_text, rank), parse_count(count_text, rank))
}

pub fn parse_step_range(start_text: &str, count_text: &str) -> StepRange {
    let start = parse_step(start_text, 0);
    let count = parse_step(count_text, 1).max(1);
    StepRange::new(start, count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_list() {
        assert_eq!(parse_start("[0, 2, 4]", 3), [0, 2, 4]);
        assert_eq!(parse_count("[1,5]", 2), [1, 5]);
    }

    #[test]
    fn whitespace_tolerant() {
        assert_eq!(parse_start("  [ 1 ,2,  3 ]  ", 3), [1, 2, 3]);
    }

    #[test]
    fn malformed_text_falls_back() {
        assert_eq!(parse_count("abc", 3), [1, 1, 1]);
        assert_eq!(parse_start("[1, 2", 2), [0, 0]);
        assert_eq!(parse_start("[one, two]", 2), [0, 0]);
        assert_eq!(parse_start("", 2), [0, 0]);
    }

    #[test]
    fn trailing_garbage_falls_back() {
        assert_eq!(parse_start("[1, 2] oops", 2), [0, 0]);
    }

    #[test]
    fn negative_falls_back() {
        assert_eq!(parse_start("[-1, 0]", 2), [0, 0]);
    }

    #[test]
    fn wrong_length_falls_back() {
        // Stale text from a variable of a different rank.
        assert_eq!(parse_start("[1, 2, 3]", 2), [0, 0]);
        assert_eq!(parse_count("[4]", 3), [1, 1, 1]);
    }

    #[test]
    fn zero_count_falls_back() {
        assert_eq!(parse_count("[0, 5]", 2), [1, 1]);
    }

    #[test]
    fn step_fields() {
        assert_eq!(parse_step("7", 0), 7);
        assert_eq!(parse_step("x", 0), 0);
        assert_eq!(parse_step_range("2", "3"), StepRange::new(2, 3));
        assert_eq!(parse_step_range("", ""), StepRange::default());
        // A zero step count is clamped, a range always covers one step.
        assert_eq!(parse_step_range("0", "0"), StepRange::new(0, 1));
    }
}
