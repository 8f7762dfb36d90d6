use serde::{Deserialize, Serialize};

/// Visualization mode for a resolved selection. Derived entirely from the
/// free-axis count, the step count and the dual-selection flag; never
/// stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViewMode {
    /// One free axis, one step: a single line plot.
    Line1d,
    /// Two free axes, one step: a single heatmap.
    Image2d,
    /// One free axis, several steps: line plot paged by a step cursor.
    Line1dSeries,
    /// Two free axes, several steps: heatmap paged by a step cursor.
    Image2dSeries,
    /// Two line-like selections plotted value-against-value.
    Scatter1dVs1d,
    /// Free rank outside {1, 2}; reported as a diagnostic, never a crash.
    Unsupported,
}

impl ViewMode {
    /// The decision table: dual mode always wins (it is an explicit user
    /// request regardless of shape), the step count separates a snapshot
    /// from a navigable series, and the free rank picks the plot
    /// dimensionality.
    pub fn resolve(free_rank: usize, step_count: usize, dual_active: bool) -> Self {
        if dual_active {
            return ViewMode::Scatter1dVs1d;
        }
        match (free_rank, step_count) {
            (1, 1) => ViewMode::Line1d,
            (2, 1) => ViewMode::Image2d,
            (1, _) => ViewMode::Line1dSeries,
            (2, _) => ViewMode::Image2dSeries,
            _ => ViewMode::Unsupported,
        }
    }

    pub fn is_series(&self) -> bool {
        matches!(self, ViewMode::Line1dSeries | ViewMode::Image2dSeries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_modes() {
        assert_eq!(ViewMode::resolve(1, 1, false), ViewMode::Line1d);
        assert_eq!(ViewMode::resolve(2, 1, false), ViewMode::Image2d);
    }

    #[test]
    fn series_modes() {
        assert_eq!(ViewMode::resolve(1, 5, false), ViewMode::Line1dSeries);
        assert_eq!(ViewMode::resolve(2, 5, false), ViewMode::Image2dSeries);
        assert!(ViewMode::resolve(1, 2, false).is_series());
    }

    #[test]
    fn dual_wins_regardless_of_shape() {
        assert_eq!(ViewMode::resolve(0, 1, true), ViewMode::Scatter1dVs1d);
        assert_eq!(ViewMode::resolve(1, 1, true), ViewMode::Scatter1dVs1d);
        assert_eq!(ViewMode::resolve(3, 9, true), ViewMode::Scatter1dVs1d);
    }

    #[test]
    fn unsupported_ranks() {
        assert_eq!(ViewMode::resolve(0, 1, false), ViewMode::Unsupported);
        assert_eq!(ViewMode::resolve(3, 1, false), ViewMode::Unsupported);
        assert_eq!(ViewMode::resolve(0, 5, false), ViewMode::Unsupported);
        assert_eq!(ViewMode::resolve(4, 5, false), ViewMode::Unsupported);
    }
}
