//! Plotters renderers for the engine's frame types. One PNG per frame;
//! series modes call these once per cursor position.

use std::path::{Path, PathBuf};

use color_eyre::eyre::eyre;
use plotters::prelude::*;

use stepview_core::common::stats::ArrayStats;
use stepview_core::view::plan::{Frame1d, Frame2d, ScatterFrame};

const SIZE: (u32, u32) = (800, 800);

/// `plot.png` -> `plot-003.png` for the frame at step 3.
pub fn step_path(out: &Path, step: usize) -> PathBuf {
    let stem = out.file_stem().and_then(|s| s.to_str()).unwrap_or("plot");
    let ext = out.extension().and_then(|s| s.to_str()).unwrap_or("png");
    out.with_file_name(format!("{stem}-{step:03}.{ext}"))
}

fn value_bounds(values: impl Iterator<Item = f64>) -> std::ops::Range<f64> {
    match ArrayStats::from_iter(values) {
        Some(stats) if stats.min < stats.max => stats.min..stats.max,
        // Constant or empty data still needs a non-degenerate axis.
        Some(stats) => stats.min - 1.0..stats.max + 1.0,
        None => 0.0..1.0,
    }
}

pub fn line_png(path: &Path, frame: &Frame1d) -> color_eyre::Result<()> {
    let root = BitMapBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(|e| eyre!("drawing failed: {e}"))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(&frame.title, ("sans-serif", 14))
        .x_label_area_size(30)
        .y_label_area_size(40)
        .margin(20)
        .build_cartesian_2d(
            frame.x.min as f64..frame.x.max as f64,
            value_bounds(frame.values.iter().copied()),
        )
        .map_err(|e| eyre!("failed to build chart: {e}"))?;

    chart
        .configure_mesh()
        .x_desc(format!("axis-{}", frame.axis))
        .draw()
        .map_err(|e| eyre!("failed to draw mesh: {e}"))?;

    chart
        .draw_series(LineSeries::new(
            frame
                .values
                .iter()
                .enumerate()
                .map(|(i, &v)| ((frame.x.min + i) as f64, v)),
            &BLUE,
        ))
        .map_err(|e| eyre!("failed to draw series: {e}"))?;

    root.present().map_err(|e| eyre!("failed to write {}: {e}", path.display()))?;
    Ok(())
}

pub fn image_png(path: &Path, frame: &Frame2d) -> color_eyre::Result<()> {
    let root = BitMapBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(|e| eyre!("drawing failed: {e}"))?;

    let stats = ArrayStats::from_iter(frame.values.iter().copied())
        .unwrap_or(ArrayStats {
            min: 0.0,
            max: 1.0,
            mean: 0.0,
        });

    let mut chart = ChartBuilder::on(&root)
        .caption(&frame.title, ("sans-serif", 14))
        .x_label_area_size(30)
        .y_label_area_size(40)
        .margin(20)
        .build_cartesian_2d(
            frame.cols.min as f64..frame.cols.max as f64,
            frame.rows.min as f64..frame.rows.max as f64,
        )
        .map_err(|e| eyre!("failed to build chart: {e}"))?;

    chart
        .configure_mesh()
        .x_desc(format!("axis-{}", frame.horizontal_axis))
        .y_desc(format!("axis-{}", frame.vertical_axis))
        .draw()
        .map_err(|e| eyre!("failed to draw mesh: {e}"))?;

    let rows = frame.values.nrows();
    let cols = frame.values.ncols();
    chart
        .draw_series(iter_2d(0..rows, 0..cols).map(|(r, c)| {
            let t = stats.normalize(frame.values[[r, c]]);
            let x = (frame.cols.min + c) as f64;
            let y = (frame.rows.min + r) as f64;
            Rectangle::new(
                [(x, y), (x + 1.0, y + 1.0)],
                HSLColor(240.0 / 360.0 * (1.0 - t), 0.7, 0.1 + 0.7 * t).filled(),
            )
        }))
        .map_err(|e| eyre!("failed to draw series: {e}"))?;

    root.present().map_err(|e| eyre!("failed to write {}: {e}", path.display()))?;
    Ok(())
}

pub fn scatter_png(path: &Path, frame: &ScatterFrame) -> color_eyre::Result<()> {
    let root = BitMapBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(|e| eyre!("drawing failed: {e}"))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(&frame.title, ("sans-serif", 12))
        .x_label_area_size(30)
        .y_label_area_size(40)
        .margin(20)
        .build_cartesian_2d(
            value_bounds(frame.x.iter().copied()),
            value_bounds(frame.y.iter().copied()),
        )
        .map_err(|e| eyre!("failed to build chart: {e}"))?;

    chart
        .configure_mesh()
        .x_desc(frame.x_label.clone())
        .y_desc(frame.y_label.clone())
        .draw()
        .map_err(|e| eyre!("failed to draw mesh: {e}"))?;

    chart
        .draw_series(LineSeries::new(
            frame.x.iter().zip(frame.y.iter()).map(|(&x, &y)| (x, y)),
            &BLUE,
        ))
        .map_err(|e| eyre!("failed to draw series: {e}"))?;

    root.present().map_err(|e| eyre!("failed to write {}: {e}", path.display()))?;
    Ok(())
}

fn iter_2d<X: Copy, Y>(
    x: impl IntoIterator<Item = X>,
    y: impl IntoIterator<Item = Y> + Clone,
) -> impl Iterator<Item = (X, Y)> {
    x.into_iter()
        .flat_map(move |x| y.clone().into_iter().map(move |y| (x, y)))
}
