use std::ops::Sub;

use derive_more::Constructor;
use serde::{Deserialize, Serialize};

/// Half-open interval `[min, max)` along one axis.
#[derive(Constructor, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range<N> {
    pub min: N,
    pub max: N,
}

impl<N: Default> Default for Range<N> {
    fn default() -> Self {
        Self {
            min: N::default(),
            max: N::default(),
        }
    }
}

impl<N: Sub<Output = N> + Copy> Range<N> {
    pub fn width(&self) -> N {
        self.max - self.min
    }
}

impl<N: PartialOrd + Copy> Range<N> {
    pub fn contains(&self, value: N) -> bool {
        self.min <= value && value < self.max
    }
}

impl<N> Range<N> {
    pub fn into_range(self) -> std::ops::Range<N> {
        self.min..self.max
    }
}

impl<N> From<Range<N>> for std::ops::Range<N> {
    fn from(range: Range<N>) -> Self {
        range.into_range()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_and_contains() {
        let r = Range::new(2usize, 7);
        assert_eq!(r.width(), 5);
        assert!(r.contains(2));
        assert!(r.contains(6));
        assert!(!r.contains(7));
    }

    #[test]
    fn into_std_range() {
        let r: std::ops::Range<usize> = Range::new(0usize, 4).into();
        assert_eq!(r.collect::<Vec<_>>(), [0, 1, 2, 3]);
    }
}
