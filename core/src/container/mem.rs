use ndarray::{ArrayD, Axis, Slice};

use crate::common::stats::ArrayStats;
use crate::select::Selection;

use super::{ContainerRead, DataType, FetchError, VariableMeta};

/// Fully decoded in-memory container. Backing store for the binary file
/// format and for tests; per-variable data is kept with the step axis
/// first, so data shape is `[step_count, shape...]`.
#[derive(Debug, Default)]
pub struct MemContainer {
    metas: Vec<VariableMeta>,
    data: Vec<ArrayD<f64>>,
}

impl MemContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a variable. `data` must carry the step axis first; the declared
    /// variable shape is everything after it.
    pub fn push(&mut self, name: impl Into<String>, dtype: DataType, data: ArrayD<f64>) {
        assert!(data.ndim() >= 1, "data must have a leading step axis");
        let shape = data.shape()[1..].to_vec();
        self.metas.push(VariableMeta {
            name: name.into(),
            dtype,
            shape,
            step_count: data.len_of(Axis(0)),
            stats: ArrayStats::from_iter(data.iter().copied()),
        });
        self.data.push(data);
    }

    /// Variables paired with their backing arrays (step axis first), in
    /// declaration order. Used by the container writer.
    pub fn iter(&self) -> impl Iterator<Item = (&VariableMeta, &ArrayD<f64>)> {
        self.metas.iter().zip(self.data.iter())
    }

    fn index_of(&self, name: &str) -> Result<usize, FetchError> {
        self.metas
            .iter()
            .position(|v| v.name == name)
            .ok_or_else(|| FetchError::UnknownVariable(name.to_string()))
    }
}

impl ContainerRead for MemContainer {
    fn variables(&self) -> &[VariableMeta] {
        &self.metas
    }

    fn fetch(
        &self,
        name: &str,
        step: usize,
        selection: &Selection,
    ) -> Result<ArrayD<f64>, FetchError> {
        let idx = self.index_of(name)?;
        let meta = &self.metas[idx];

        if selection.rank() != meta.rank() {
            return Err(FetchError::RankMismatch {
                expected: meta.rank(),
                got: selection.rank(),
            });
        }
        if step >= meta.step_count {
            return Err(FetchError::StepOutOfRange {
                step,
                available: meta.step_count,
            });
        }
        for (axis, (&start, &count)) in selection.start.iter().zip(&selection.count).enumerate() {
            let extent = meta.shape[axis];
            // checked_add: a huge parsed count must surface as OutOfBounds,
            // not wrap past the extent check.
            if start.checked_add(count).map_or(true, |end| end > extent) {
                return Err(FetchError::OutOfBounds {
                    axis,
                    start,
                    count,
                    extent,
                });
            }
        }

        let mut view = self.data[idx].view();
        view.slice_axis_inplace(Axis(0), Slice::from(step..step + 1));
        for (axis, (&start, &count)) in selection.start.iter().zip(&selection.count).enumerate() {
            view.slice_axis_inplace(Axis(axis + 1), Slice::from(start..start + count));
        }
        Ok(view.index_axis(Axis(0), 0).to_owned())
    }
}

#[cfg(test)]
mod tests {
    use ndarray::Array;

    use super::*;

    fn sample() -> MemContainer {
        // 2 steps of a 3x4 grid, value = step * 100 + row * 10 + col
        let data = Array::from_shape_fn((2, 3, 4), |(s, r, c)| {
            (s * 100 + r * 10 + c) as f64
        })
        .into_dyn();
        let mut container = MemContainer::new();
        container.push("grid", DataType::Float64, data);
        container
    }

    #[test]
    fn describes_shape_and_steps() {
        let container = sample();
        let meta = container.describe("grid").unwrap();
        assert_eq!(meta.shape, [3, 4]);
        assert_eq!(meta.step_count, 2);
        assert_eq!(meta.stats.unwrap().min, 0.0);
        assert_eq!(meta.stats.unwrap().max, 123.0);
    }

    #[test]
    fn fetch_subregion() {
        let container = sample();
        let sel = Selection::new(vec![1, 2], vec![2, 2]);
        let out = container.fetch("grid", 1, &sel).unwrap();
        assert_eq!(out.shape(), [2, 2]);
        assert_eq!(out[[0, 0]], 112.0);
        assert_eq!(out[[1, 1]], 123.0);
    }

    #[test]
    fn fetch_degenerate_axes() {
        let container = sample();
        let sel = Selection::new(vec![2, 0], vec![1, 4]);
        let out = container.fetch("grid", 0, &sel).unwrap();
        assert_eq!(out.shape(), [1, 4]);
        assert_eq!(out.iter().copied().collect::<Vec<_>>(), [20.0, 21.0, 22.0, 23.0]);
    }

    #[test]
    fn unknown_variable() {
        let container = sample();
        let err = container
            .fetch("nope", 0, &Selection::origin(2))
            .unwrap_err();
        assert!(matches!(err, FetchError::UnknownVariable(_)));
    }

    #[test]
    fn out_of_bounds_surfaces() {
        let container = sample();
        let sel = Selection::new(vec![2, 0], vec![2, 4]);
        let err = container.fetch("grid", 0, &sel).unwrap_err();
        assert!(matches!(err, FetchError::OutOfBounds { axis: 0, .. }));
    }

    #[test]
    fn huge_count_is_out_of_bounds() {
        let container = sample();
        let sel = Selection::new(vec![1, 0], vec![usize::MAX, 4]);
        let err = container.fetch("grid", 0, &sel).unwrap_err();
        assert!(matches!(err, FetchError::OutOfBounds { axis: 0, .. }));
    }

    #[test]
    fn rank_mismatch() {
        let container = sample();
        let err = container
            .fetch("grid", 0, &Selection::origin(3))
            .unwrap_err();
        assert!(matches!(
            err,
            FetchError::RankMismatch {
                expected: 2,
                got: 3
            }
        ));
    }

    #[test]
    fn step_out_of_range() {
        let container = sample();
        let err = container
            .fetch("grid", 2, &Selection::origin(2))
            .unwrap_err();
        assert!(matches!(err, FetchError::StepOutOfRange { step: 2, .. }));
    }
}
