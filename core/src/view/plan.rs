//! One plot action, end to end: parse the raw field text, classify the
//! selection's axes, resolve the visualization mode, and build the frames
//! the renderer consumes. Everything runs synchronously in the triggering
//! turn; a failed fetch aborts only this action.

use ndarray::{Array1, Array2};
use thiserror::Error;
use tracing::debug;

use crate::common::range::Range;
use crate::container::{ContainerRead, FetchError, VariableMeta};
use crate::select::axes::AxisPartition;
use crate::select::{parse, Selection, StepRange};

use super::cursor::StepCursor;
use super::dual::{self, DualError};
use super::mode::ViewMode;

/// Raw field text as entered on the input surface.
#[derive(Debug, Clone, Copy)]
pub struct PlotInput<'a> {
    pub start_text: &'a str,
    pub count_text: &'a str,
    pub step_start_text: &'a str,
    pub step_count_text: &'a str,
}

/// What will be fetched: a variable, a sub-region, a step range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlotRequest {
    pub variable: String,
    pub selection: Selection,
    pub steps: StepRange,
}

/// A request together with its derived axis partition and mode.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPlot {
    pub request: PlotRequest,
    pub partition: AxisPartition,
    pub mode: ViewMode,
}

#[derive(Error, Debug)]
pub enum FrameError {
    #[error("No supported plot for {free_rank} free axes; give 1 or 2 axes a count above 1")]
    Unsupported { free_rank: usize },
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Dual(#[from] DualError),
    #[error("Fetched data has an unexpected shape: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

/// Values along one free axis at one step.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame1d {
    /// Index of the plotted axis in the variable's index space.
    pub axis: usize,
    /// Coordinate range covered along that axis.
    pub x: Range<usize>,
    pub values: Array1<f64>,
    pub title: String,
}

/// A 2D block at one step. `free[0]` is the vertical axis, `free[1]` the
/// horizontal one; `values` is indexed `[row, col]` accordingly.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame2d {
    pub vertical_axis: usize,
    pub horizontal_axis: usize,
    pub rows: Range<usize>,
    pub cols: Range<usize>,
    pub values: Array2<f64>,
    pub title: String,
}

/// Two value sequences plotted against each other, element by position.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterFrame {
    pub x_label: String,
    pub y_label: String,
    pub x: Array1<f64>,
    pub y: Array1<f64>,
    pub title: String,
}

/// Normalizes the raw input against a variable's declared shape and picks
/// the visualization mode. Never fails: malformed text already collapsed to
/// defaults in the parser, and an unplottable shape resolves to
/// [`ViewMode::Unsupported`].
pub fn resolve_plot(meta: &VariableMeta, input: &PlotInput, dual_active: bool) -> ResolvedPlot {
    let selection = parse::parse_selection(input.start_text, input.count_text, meta.rank());
    let steps = parse::parse_step_range(input.step_start_text, input.step_count_text);
    let partition = AxisPartition::classify(&selection.count);
    let mode = ViewMode::resolve(partition.free_rank(), steps.count, dual_active);
    debug!(
        variable = %meta.name,
        ?selection,
        ?steps,
        free_rank = partition.free_rank(),
        ?mode,
        "resolved plot"
    );
    ResolvedPlot {
        request: PlotRequest {
            variable: meta.name.clone(),
            selection,
            steps,
        },
        partition,
        mode,
    }
}

impl ResolvedPlot {
    /// A fresh cursor over the requested step range, owned by the series
    /// view that pages this plot.
    pub fn cursor(&self) -> StepCursor {
        StepCursor::new(self.request.steps)
    }

    pub fn title(&self, step: usize) -> String {
        format!(
            "Data from variable {} with start {:?} and count {:?}, step {}",
            self.request.variable, self.request.selection.start, self.request.selection.count, step
        )
    }

    /// Textual dump of the selection: a title line, then one array block
    /// per step. Unlike the plot frames this works for any free rank.
    pub fn display_text(&self, container: &impl ContainerRead) -> Result<String, FrameError> {
        let mut out = format!(
            "Data from variable {} with start {:?} and count {:?}, step {} with step count {}\n\n",
            self.request.variable,
            self.request.selection.start,
            self.request.selection.count,
            self.request.steps.start,
            self.request.steps.count,
        );
        for step in self.cursor().steps() {
            let data = container.fetch(&self.request.variable, step, &self.request.selection)?;
            out.push_str(&format!("{data:.5}\n"));
        }
        Ok(out)
    }

    fn free_axis(&self) -> Result<usize, FrameError> {
        match self.partition.free[..] {
            [axis] => Ok(axis),
            _ => Err(FrameError::Unsupported {
                free_rank: self.partition.free_rank(),
            }),
        }
    }

    fn free_axes_2d(&self) -> Result<(usize, usize), FrameError> {
        match self.partition.free[..] {
            [vertical, horizontal] => Ok((vertical, horizontal)),
            _ => Err(FrameError::Unsupported {
                free_rank: self.partition.free_rank(),
            }),
        }
    }

    /// Fetches the selection at `step` flattened along its single free axis.
    pub fn line_frame(
        &self,
        container: &impl ContainerRead,
        step: usize,
    ) -> Result<Frame1d, FrameError> {
        let axis = self.free_axis()?;
        let data = container.fetch(&self.request.variable, step, &self.request.selection)?;
        // All other axes are degenerate, so iteration order is the free axis.
        let values = Array1::from_iter(data.iter().copied());
        Ok(Frame1d {
            axis,
            x: Range::new(self.request.selection.start[axis], self.request.selection.end(axis)),
            values,
            title: self.title(step),
        })
    }

    /// Fetches the selection at `step` as a `[rows, cols]` block over its
    /// two free axes.
    pub fn image_frame(
        &self,
        container: &impl ContainerRead,
        step: usize,
    ) -> Result<Frame2d, FrameError> {
        let (vertical_axis, horizontal_axis) = self.free_axes_2d()?;
        let data = container.fetch(&self.request.variable, step, &self.request.selection)?;
        let sel = &self.request.selection;
        let values = Array1::from_iter(data.iter().copied())
            .into_shape((sel.count[vertical_axis], sel.count[horizontal_axis]))?;
        Ok(Frame2d {
            vertical_axis,
            horizontal_axis,
            rows: Range::new(sel.start[vertical_axis], sel.end(vertical_axis)),
            cols: Range::new(sel.start[horizontal_axis], sel.end(horizontal_axis)),
            values,
            title: self.title(step),
        })
    }
}

/// Builds one comparison frame: the primary's values on Y against the
/// secondary's on X, paired by position. A length mismatch truncates to the
/// shorter sequence.
pub fn scatter_frame(
    container: &impl ContainerRead,
    primary: &ResolvedPlot,
    secondary: &ResolvedPlot,
    primary_step: usize,
    secondary_step: usize,
) -> Result<ScatterFrame, FrameError> {
    let (x_label, y_label) = dual::align(&primary.partition, &secondary.partition)?;

    let y = container.fetch(
        &primary.request.variable,
        primary_step,
        &primary.request.selection,
    )?;
    let x = container.fetch(
        &secondary.request.variable,
        secondary_step,
        &secondary.request.selection,
    )?;

    let len = x.len().min(y.len());
    let x = Array1::from_iter(x.iter().copied().take(len));
    let y = Array1::from_iter(y.iter().copied().take(len));

    let title = format!(
        "Data from variables {} and {} with starts {:?} and {:?}, counts {:?} and {:?}, steps {} and {}",
        primary.request.variable,
        secondary.request.variable,
        primary.request.selection.start,
        secondary.request.selection.start,
        primary.request.selection.count,
        secondary.request.selection.count,
        primary_step,
        secondary_step,
    );

    Ok(ScatterFrame {
        x_label,
        y_label,
        x,
        y,
        title,
    })
}
