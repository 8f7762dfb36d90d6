use serde::{Deserialize, Serialize};

/// Single-pass summary of a value sequence, used for variable listings and
/// for scaling heatmap colors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArrayStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

impl ArrayStats {
    pub fn from_iter(mut data: impl Iterator<Item = f64>) -> Option<Self> {
        let first = data.next()?;
        let mut min = first;
        let mut max = first;
        let mut sum = first;
        let mut count = 1usize;
        for value in data {
            if value < min {
                min = value;
            }
            if value > max {
                max = value;
            }
            sum += value;
            count += 1;
        }
        Some(Self {
            min,
            max,
            mean: sum / count as f64,
        })
    }

    /// Maps `value` to `[0, 1]` within `[min, max]`. Degenerate ranges map
    /// everything to 0 so callers don't have to special-case constant data.
    pub fn normalize(&self, value: f64) -> f64 {
        let width = self.max - self.min;
        if width == 0.0 {
            0.0
        } else {
            (value - self.min) / width
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic() {
        let stats = ArrayStats::from_iter([1.0, 3.0, 2.0].into_iter()).unwrap();
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 3.0);
        assert_eq!(stats.mean, 2.0);
    }

    #[test]
    fn empty() {
        assert_eq!(ArrayStats::from_iter(std::iter::empty::<f64>()), None);
    }

    #[test]
    fn normalize_constant_data() {
        let stats = ArrayStats::from_iter([5.0, 5.0].into_iter()).unwrap();
        assert_eq!(stats.normalize(5.0), 0.0);
    }
}
