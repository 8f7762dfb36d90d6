use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{self, WrapErr};
use tracing::info;

use stepview_core::container::bin::{read_container, write_container};
use stepview_core::container::mem::MemContainer;
use stepview_core::container::{ContainerRead, DataType, VariableMeta};
use stepview_core::view::dual::DualCursor;
use stepview_core::view::mode::ViewMode;
use stepview_core::view::plan::{resolve_plot, scatter_frame, PlotInput, ResolvedPlot};

mod render;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the container file
    #[arg(value_name = "FILE")]
    container: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, clap::Args)]
struct SelectionArgs {
    /// Variable to plot
    #[arg(long)]
    variable: String,
    /// Selection start, e.g. "[0, 0]" (defaults to the origin)
    #[arg(long, default_value = "")]
    start: String,
    /// Selection count, e.g. "[1, 5]" (defaults to a single element)
    #[arg(long, default_value = "")]
    count: String,
    /// First step to plot
    #[arg(long, default_value = "0")]
    step_start: String,
    /// Number of steps; above 1 pages through a series
    #[arg(long, default_value = "1")]
    step_count: String,
}

impl SelectionArgs {
    fn input(&self) -> PlotInput<'_> {
        PlotInput {
            start_text: &self.start,
            count_text: &self.count,
            step_start_text: &self.step_start,
            step_count_text: &self.step_count,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// List variables: name, type, steps, shape, min, max
    List,
    /// Print a selection's values at each step as text
    Display {
        #[command(flatten)]
        selection: SelectionArgs,
    },
    /// Plot a selection of one variable
    Plot {
        #[command(flatten)]
        selection: SelectionArgs,
        /// Output PNG; series modes write one file per step
        #[arg(short, long, default_value = "plot.png")]
        out: PathBuf,
    },
    /// Plot one selection's values against a second one's, by position
    Compare {
        #[command(flatten)]
        primary: SelectionArgs,
        /// Second variable
        #[arg(long)]
        secondary_variable: String,
        /// Second selection start
        #[arg(long, default_value = "")]
        secondary_start: String,
        /// Second selection count
        #[arg(long, default_value = "")]
        secondary_count: String,
        /// Second selection's first step (step count is shared)
        #[arg(long, default_value = "0")]
        secondary_step_start: String,
        #[arg(short, long, default_value = "compare.png")]
        out: PathBuf,
    },
    /// Write a small demo container to FILE
    Gen,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt::init();

    let args = Cli::parse();

    match args.command {
        Command::List => {
            let container = open(&args.container)?;
            for meta in container.variables() {
                println!("{}", describe_line(meta));
            }
        }
        Command::Display { selection } => {
            let container = open(&args.container)?;
            let meta = lookup(&container, &selection.variable)?.clone();
            let plot = resolve_plot(&meta, &selection.input(), false);
            print!("{}", plot.display_text(&container)?);
        }
        Command::Plot { selection, out } => {
            let container = open(&args.container)?;
            let meta = lookup(&container, &selection.variable)?.clone();
            let plot = resolve_plot(&meta, &selection.input(), false);
            run_plot(&container, &plot, &out)?;
        }
        Command::Compare {
            primary,
            secondary_variable,
            secondary_start,
            secondary_count,
            secondary_step_start,
            out,
        } => {
            let container = open(&args.container)?;
            let primary_meta = lookup(&container, &primary.variable)?.clone();
            let secondary_meta = lookup(&container, &secondary_variable)?.clone();

            let primary_plot = resolve_plot(&primary_meta, &primary.input(), true);
            // The secondary shares the primary's step count; only its start
            // is independent.
            let secondary_plot = resolve_plot(
                &secondary_meta,
                &PlotInput {
                    start_text: &secondary_start,
                    count_text: &secondary_count,
                    step_start_text: &secondary_step_start,
                    step_count_text: &primary.step_count,
                },
                true,
            );
            run_compare(&container, &primary_plot, &secondary_plot, &out)?;
        }
        Command::Gen => {
            let file = File::create(&args.container)
                .wrap_err_with(|| format!("cannot create {}", args.container.display()))?;
            write_container(BufWriter::new(file), &demo_container())?;
            info!(path = %args.container.display(), "wrote demo container");
        }
    }

    Ok(())
}

fn open(path: &Path) -> color_eyre::Result<MemContainer> {
    let file =
        File::open(path).wrap_err_with(|| format!("cannot open {}", path.display()))?;
    Ok(read_container(BufReader::new(file))?)
}

fn lookup<'a>(container: &'a MemContainer, name: &str) -> color_eyre::Result<&'a VariableMeta> {
    container
        .describe(name)
        .ok_or_else(|| eyre::eyre!("no variable named '{name}' in this container"))
}

fn describe_line(meta: &VariableMeta) -> String {
    let (min, max) = match meta.stats {
        Some(stats) => (format!("{}", stats.min), format!("{}", stats.max)),
        None => ("-".to_string(), "-".to_string()),
    };
    format!(
        "{},   {},   {},   {{{:?}}},   {},   {}",
        meta.name,
        meta.dtype.as_str(),
        meta.step_count,
        meta.shape,
        min,
        max
    )
}

fn run_plot(container: &MemContainer, plot: &ResolvedPlot, out: &Path) -> color_eyre::Result<()> {
    match plot.mode {
        ViewMode::Line1d => {
            let frame = plot.line_frame(container, plot.request.steps.start)?;
            render::line_png(out, &frame)?;
            info!(path = %out.display(), "wrote line plot");
        }
        ViewMode::Image2d => {
            let frame = plot.image_frame(container, plot.request.steps.start)?;
            render::image_png(out, &frame)?;
            info!(path = %out.display(), "wrote image plot");
        }
        ViewMode::Line1dSeries => {
            for step in plot.cursor().steps() {
                let frame = plot.line_frame(container, step)?;
                render::line_png(&render::step_path(out, step), &frame)?;
            }
            info!(path = %out.display(), steps = plot.request.steps.count, "wrote line series");
        }
        ViewMode::Image2dSeries => {
            for step in plot.cursor().steps() {
                let frame = plot.image_frame(container, step)?;
                render::image_png(&render::step_path(out, step), &frame)?;
            }
            info!(path = %out.display(), steps = plot.request.steps.count, "wrote image series");
        }
        ViewMode::Scatter1dVs1d => {
            eyre::bail!("use the compare subcommand for 1D vs 1D plots")
        }
        ViewMode::Unsupported => eyre::bail!(
            "{} free axes selected; plots need 1 or 2 axes with a count above 1",
            plot.partition.free_rank()
        ),
    }
    Ok(())
}

fn run_compare(
    container: &MemContainer,
    primary: &ResolvedPlot,
    secondary: &ResolvedPlot,
    out: &Path,
) -> color_eyre::Result<()> {
    if !primary.request.steps.is_series() {
        let frame = scatter_frame(
            container,
            primary,
            secondary,
            primary.request.steps.start,
            secondary.request.steps.start,
        )?;
        render::scatter_png(out, &frame)?;
        info!(path = %out.display(), "wrote comparison plot");
        return Ok(());
    }

    // Both sides page in lock-step under one shared control.
    let mut cursor = DualCursor::new(primary.request.steps, secondary.request.steps.start);
    loop {
        let (primary_step, secondary_step) = cursor.current();
        let frame = scatter_frame(container, primary, secondary, primary_step, secondary_step)?;
        render::scatter_png(&render::step_path(out, primary_step), &frame)?;
        if !cursor.advance() {
            break;
        }
    }
    info!(path = %out.display(), steps = primary.request.steps.count, "wrote comparison series");
    Ok(())
}

fn demo_container() -> MemContainer {
    use ndarray::Array;

    let mut container = MemContainer::new();

    // 8 steps of a 32x32 travelling wave.
    container.push(
        "temperature",
        DataType::Float64,
        Array::from_shape_fn((8, 32, 32), |(s, r, c)| {
            let t = s as f64 * 0.4;
            ((r as f64 * 0.3 + t).sin() + (c as f64 * 0.2 - t).cos()) * 10.0 + 20.0
        })
        .into_dyn(),
    );

    // 8 steps of a decaying 1-D profile.
    container.push(
        "pressure_profile",
        DataType::Float64,
        Array::from_shape_fn((8, 64), |(s, i)| {
            (-(i as f64) / 16.0).exp() * 101.3 * (1.0 - s as f64 * 0.05)
        })
        .into_dyn(),
    );

    // A single-step reference curve.
    container.push(
        "baseline",
        DataType::Float64,
        Array::from_shape_fn((1, 64), |(_, i)| (i as f64 / 8.0).sin()).into_dyn(),
    );

    container
}
