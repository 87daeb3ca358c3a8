//! Listing pagination.
//!
//! Responsibility:
//! - `(start, num)` cursor validation against the store's window
//! - advancing the cursor for full listing walks
//! - the "full chunk" rule that decides whether another chunk is worth fetching

use super::constants::pagination::{DEFAULT_NUM, MAX_NUM, MAX_START};
use crate::error::{ScraperError, ScraperResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationCursor {
    start: u32,
    num: u32,
}

impl Default for PaginationCursor {
    fn default() -> Self {
        Self {
            start: 0,
            num: DEFAULT_NUM,
        }
    }
}

impl PaginationCursor {
    /// Build a cursor, rejecting values outside `start ∈ [0,180]`, `num ∈ [0,120]`.
    pub fn new(start: i64, num: i64) -> ScraperResult<Self> {
        let start = bounded("start", start, MAX_START)?;
        let num = bounded("num", num, MAX_NUM)?;
        Ok(Self { start, num })
    }

    /// Build a cursor from raw caller input such as command-line arguments.
    ///
    /// Non-integer input is an `InvalidArgument`; integers outside the window
    /// are a `Range` error.
    pub fn parse(start: &str, num: &str) -> ScraperResult<Self> {
        let start = parse_integer("start", start)?;
        let num = parse_integer("num", num)?;
        Self::new(start, num)
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn num(&self) -> u32 {
        self.num
    }

    /// A chunk is full iff it holds exactly `num` records.
    pub fn is_full(&self, chunk_len: usize) -> bool {
        chunk_len == self.num as usize
    }

    /// Cursor for the following chunk, or `None` once `start` would leave the window.
    pub fn next(&self) -> Option<Self> {
        if self.num == 0 {
            return None;
        }
        let start = self.start.checked_add(self.num)?;
        (start <= MAX_START).then_some(Self {
            start,
            num: self.num,
        })
    }
}

fn bounded(name: &str, value: i64, max: u32) -> ScraperResult<u32> {
    u32::try_from(value)
        .ok()
        .filter(|v| *v <= max)
        .ok_or_else(|| {
            ScraperError::Range(format!("\"{name}\" must be a number between 0 and {max}"))
        })
}

fn parse_integer(name: &str, raw: &str) -> ScraperResult<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ScraperError::InvalidArgument(format!("\"{name}\" must be an integer")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(-1, 60)]
    #[case(181, 60)]
    #[case(0, -1)]
    #[case(0, 121)]
    #[case(i64::MAX, 0)]
    fn test_out_of_window_values_are_range_errors(#[case] start: i64, #[case] num: i64) {
        let err = PaginationCursor::new(start, num).unwrap_err();
        assert!(matches!(err, ScraperError::Range(_)), "got {err:?}");
    }

    #[rstest]
    #[case("zero", "60")]
    #[case("0", "ten")]
    #[case("1.5", "60")]
    #[case("", "60")]
    fn test_non_integer_input_is_invalid_argument(#[case] start: &str, #[case] num: &str) {
        let err = PaginationCursor::parse(start, num).unwrap_err();
        assert!(matches!(err, ScraperError::InvalidArgument(_)), "got {err:?}");
    }

    #[test]
    fn test_window_edges_are_accepted() {
        assert!(PaginationCursor::new(0, 0).is_ok());
        assert!(PaginationCursor::new(180, 120).is_ok());
        assert_eq!(PaginationCursor::parse(" 60 ", "2").unwrap().start(), 60);
    }

    #[test]
    fn test_walk_visits_four_chunks_at_most() {
        let mut cursor = Some(PaginationCursor::default());
        let mut starts = Vec::new();
        while let Some(current) = cursor {
            starts.push(current.start());
            cursor = current.next();
        }
        assert_eq!(starts, vec![0, 60, 120, 180]);
    }

    #[test]
    fn test_full_chunk_rule() {
        let cursor = PaginationCursor::new(0, 2).unwrap();
        assert!(cursor.is_full(2));
        assert!(!cursor.is_full(1));
    }
}
