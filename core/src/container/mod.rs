pub mod bin;
pub mod mem;

use ndarray::ArrayD;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::common::stats::ArrayStats;
use crate::select::Selection;

/// Element type a variable declares in the container header. Fetched data
/// is always widened to f64 for plotting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    Float32,
    Float64,
    Int32,
    Int64,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Float32 => "float32",
            DataType::Float64 => "float64",
            DataType::Int32 => "int32",
            DataType::Int64 => "int64",
        }
    }
}

/// Declared shape of one variable: rank, per-axis extents and number of
/// available steps. Immutable for the lifetime of an open container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableMeta {
    pub name: String,
    pub dtype: DataType,
    pub shape: Vec<usize>,
    pub step_count: usize,
    /// Summary over all steps, for listings. `None` for empty variables.
    pub stats: Option<ArrayStats>,
}

impl VariableMeta {
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    pub fn extent(&self, axis: usize) -> Option<usize> {
        self.shape.get(axis).copied()
    }
}

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("No variable named '{0}' in this container")]
    UnknownVariable(String),
    #[error("Selection rank {got} does not match variable rank {expected}")]
    RankMismatch { expected: usize, got: usize },
    #[error("Selection [{start}, +{count}) exceeds extent {extent} on axis {axis}")]
    OutOfBounds {
        axis: usize,
        start: usize,
        count: usize,
        extent: usize,
    },
    #[error("Step {step} out of range, variable has {available} steps")]
    StepOutOfRange { step: usize, available: usize },
}

/// Read side of an open container. Every fetch is an independent
/// synchronous read; there is no write path.
pub trait ContainerRead {
    /// All variables, in declaration order.
    fn variables(&self) -> &[VariableMeta];

    fn describe(&self, name: &str) -> Option<&VariableMeta> {
        self.variables().iter().find(|v| v.name == name)
    }

    /// Reads the selected sub-region at one step. The returned array has
    /// exactly the shape implied by `selection.count`; anything else is a
    /// fetch failure, never silently reshaped.
    fn fetch(
        &self,
        name: &str,
        step: usize,
        selection: &Selection,
    ) -> Result<ArrayD<f64>, FetchError>;
}
