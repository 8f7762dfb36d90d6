use serde::{Deserialize, Serialize};

/// Partition of a selection's axes by whether they contribute to the plot.
///
/// An axis is *free* when its count differs from one, *degenerate* when the
/// selection collapses it to a single index. Order within `free` is the
/// original axis order; for 2D modes `free[0]` maps to the plot's vertical
/// axis and `free[1]` to the horizontal axis, for 1D modes `free[0]` is the
/// sole plotted axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisPartition {
    pub free: Vec<usize>,
    pub degenerate: Vec<usize>,
}

impl AxisPartition {
    pub fn classify(count: &[usize]) -> Self {
        let mut free = Vec::new();
        let mut degenerate = Vec::new();
        for (axis, &c) in count.iter().enumerate() {
            if c != 1 {
                free.push(axis);
            } else {
                degenerate.push(axis);
            }
        }
        Self { free, degenerate }
    }

    pub fn free_rank(&self) -> usize {
        self.free.len()
    }

    pub fn rank(&self) -> usize {
        self.free.len() + self.degenerate.len()
    }
}
