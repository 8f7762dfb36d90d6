pub mod axes;
pub mod parse;

use serde::{Deserialize, Serialize};

/// Rectangular sub-region of a variable's index space: per-axis start
/// offset and count.
///
/// The engine only guarantees structural validity (matching lengths,
/// non-negative starts, counts of at least one); whether the region fits
/// inside the variable's extents is checked by the container at fetch time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub start: Vec<usize>,
    pub count: Vec<usize>,
}

impl Selection {
    pub fn new(start: Vec<usize>, count: Vec<usize>) -> Self {
        debug_assert_eq!(start.len(), count.len());
        Self { start, count }
    }

    /// The default selection for a variable of the given rank: a single
    /// element at the origin.
    pub fn origin(rank: usize) -> Self {
        Self {
            start: vec![0; rank],
            count: vec![1; rank],
        }
    }

    /// Selects the entire index space of the given shape.
    pub fn whole(shape: &[usize]) -> Self {
        Self {
            start: vec![0; shape.len()],
            count: shape.to_vec(),
        }
    }

    pub fn rank(&self) -> usize {
        self.start.len()
    }

    /// Exclusive end offset along `axis`.
    pub fn end(&self, axis: usize) -> usize {
        self.start[axis] + self.count[axis]
    }
}

/// A contiguous range of steps, `count >= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRange {
    pub start: usize,
    pub count: usize,
}

impl StepRange {
    pub fn new(start: usize, count: usize) -> Self {
        debug_assert!(count >= 1);
        Self { start, count }
    }

    pub fn single(step: usize) -> Self {
        Self {
            start: step,
            count: 1,
        }
    }

    /// Last step covered by the range (inclusive).
    pub fn last(&self) -> usize {
        self.start + self.count - 1
    }

    pub fn is_series(&self) -> bool {
        self.count != 1
    }
}

impl Default for StepRange {
    fn default() -> Self {
        Self { start: 0, count: 1 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let sel = Selection::origin(3);
        assert_eq!(sel.start, [0, 0, 0]);
        assert_eq!(sel.count, [1, 1, 1]);
        assert_eq!(StepRange::default(), StepRange::new(0, 1));
    }

    #[test]
    fn whole_shape() {
        let sel = Selection::whole(&[4, 6]);
        assert_eq!(sel.start, [0, 0]);
        assert_eq!(sel.count, [4, 6]);
        assert_eq!(sel.end(1), 6);
    }

    #[test]
    fn step_range_last() {
        assert_eq!(StepRange::new(2, 3).last(), 4);
        assert!(!StepRange::single(7).is_series());
    }
}
