//! Side-by-side comparison chart for two labeled runs.
//!
//! Panels are a declarative list of `(category, column, title)` entries
//! iterated into a fixed 4x2 grid, one curve per run overlaid on shared
//! axes. Series are plotted as-is: runs with different sample counts or
//! time spans simply end at different points.

use std::path::Path;

use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use thiserror::Error;

use crate::metrics::{Category, MetricsError, RunMetrics};

/// One panel of the comparison grid.
#[derive(Clone, Copy, Debug)]
pub struct PanelSpec {
    pub category: Category,
    pub column: &'static str,
    pub title: &'static str,
    pub y_label: &'static str,
}

/// The fixed panel layout, row-major. The bottom row holds the latency
/// percentile panels; `dt` is loaded for contract validation but has no
/// fixed panel.
pub const PANELS: [PanelSpec; 8] = [
    PanelSpec {
        category: Category::BufferManager,
        column: "consumed_pages",
        title: "Consumed pages over time",
        y_label: "pages",
    },
    PanelSpec {
        category: Category::Cpu,
        column: "CPU",
        title: "CPU usage over time",
        y_label: "CPU",
    },
    PanelSpec {
        category: Category::CommitRate,
        column: "tx_abort",
        title: "Abort rate over time",
        y_label: "aborts/s",
    },
    PanelSpec {
        category: Category::Cpu,
        column: "GHz",
        title: "Clock speed over time",
        y_label: "GHz",
    },
    PanelSpec {
        category: Category::BufferManager,
        column: "w_mib",
        title: "Write MiB over time",
        y_label: "MiB",
    },
    PanelSpec {
        category: Category::BufferManager,
        column: "r_mib",
        title: "Read MiB over time",
        y_label: "MiB",
    },
    PanelSpec {
        category: Category::Latency,
        column: "50p",
        title: "Transaction latency p50 over time",
        y_label: "us",
    },
    PanelSpec {
        category: Category::Latency,
        column: "99p",
        title: "Transaction latency p99 over time",
        y_label: "us",
    },
];

#[derive(Debug, Error)]
pub enum CompareError {
    #[error(transparent)]
    Metrics(#[from] MetricsError),
    #[error("label `{label}` has no numeric `{column}` column in category `{category}`")]
    MissingColumn {
        label: String,
        category: Category,
        column: &'static str,
    },
    #[error("failed to render comparison chart: {0}")]
    Render(String),
}

fn panel_points(
    metrics: &RunMetrics,
    spec: &PanelSpec,
) -> Result<Vec<(f64, f64)>, CompareError> {
    metrics
        .series(spec.category)
        .points(spec.column)
        .ok_or_else(|| CompareError::MissingColumn {
            label: metrics.label.clone(),
            category: spec.category,
            column: spec.column,
        })
}

/// Axis range spanning both curves, padded so flat or empty series still
/// produce a drawable chart.
fn axis_range(values: impl Iterator<Item = f64>) -> std::ops::Range<f64> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values {
        min = min.min(v);
        max = max.max(v);
    }
    if !min.is_finite() || !max.is_finite() {
        return 0.0..1.0;
    }
    let pad = ((max - min) * 0.05).max(1e-9);
    (min - pad)..(max + pad)
}

fn draw_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, plotters::coord::Shift>,
    spec: &PanelSpec,
    a: &[(f64, f64)],
    b: &[(f64, f64)],
    label_a: &str,
    label_b: &str,
) -> Result<(), CompareError> {
    let render = |e: DrawingAreaErrorKind<DB::ErrorType>| CompareError::Render(e.to_string());

    let x_range = axis_range(a.iter().chain(b.iter()).map(|p| p.0));
    let y_range = axis_range(a.iter().chain(b.iter()).map(|p| p.1));

    let mut chart = ChartBuilder::on(area)
        .caption(spec.title, ("sans-serif", 18))
        .margin(8)
        .x_label_area_size(28)
        .y_label_area_size(52)
        .build_cartesian_2d(x_range, y_range)
        .map_err(render)?;

    chart
        .configure_mesh()
        .x_desc("Time")
        .y_desc(spec.y_label)
        .draw()
        .map_err(render)?;

    chart
        .draw_series(LineSeries::new(a.iter().copied(), &BLUE))
        .map_err(render)?
        .label(label_a)
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 18, y)], BLUE));
    chart
        .draw_series(LineSeries::new(b.iter().copied(), &RED))
        .map_err(render)?
        .label(label_b)
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 18, y)], RED));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(render)?;

    Ok(())
}

/// Load both labeled metric sets from `data_dir` and render the comparison
/// grid to `out` as a single PNG.
///
/// Fails without producing a partial image when any of the ten metric files
/// is missing or malformed, or when a panel's column is absent.
pub fn render_comparison(
    data_dir: &Path,
    label_a: &str,
    label_b: &str,
    out: &Path,
) -> Result<(), CompareError> {
    let run_a = RunMetrics::load(data_dir, label_a)?;
    let run_b = RunMetrics::load(data_dir, label_b)?;

    // Resolve every panel before touching the backend so a contract
    // violation never leaves a half-drawn image behind.
    let mut panels = Vec::with_capacity(PANELS.len());
    for spec in &PANELS {
        panels.push((spec, panel_points(&run_a, spec)?, panel_points(&run_b, spec)?));
    }

    let render = |e: DrawingAreaErrorKind<_>| CompareError::Render(e.to_string());

    let root = BitMapBackend::new(out, (1400, 1600)).into_drawing_area();
    root.fill(&WHITE).map_err(render)?;

    let title = format!("TPC-C comparison: {label_a} vs {label_b}");
    let titled = root.titled(&title, ("sans-serif", 30)).map_err(render)?;

    let areas = titled.split_evenly((4, 2));
    for ((spec, a, b), area) in panels.iter().zip(areas.iter()) {
        draw_panel(area, spec, a, b, label_a, label_b)?;
    }

    root.present().map_err(render)?;
    log::info!("comparison chart written to {}", out.display());
    Ok(())
}
