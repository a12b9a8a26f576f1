//! PNG chart rendering on top of the plotters bitmap backend.
//!
//! Each render call owns its drawing area: the backend is created, drawn,
//! presented, and dropped within the call, so successive charts never share
//! plot state.

use crate::model::{Marker, RenderOptions, ReportSpec, SeriesSpec};
use crate::table::ResultTable;
use anyhow::{bail, Context, Result};
use plotters::chart::ChartContext;
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use std::path::Path;

/// Series colors in spec order: throughput, waiting, turnaround, response.
const PALETTE: [RGBColor; 4] = [BLUE, RED, GREEN, MAGENTA];

/// Combined charts mark every Nth data point so dense sweeps stay readable.
const MARKER_EVERY: usize = 20;

const GRID_OPACITY: f64 = 0.3;

/// Render the 2x2 metric panel chart for one report.
pub fn render_panels(
    table: &ResultTable,
    spec: &ReportSpec,
    out_path: &Path,
    opts: &RenderOptions,
) -> Result<()> {
    let (x, series) = resolve_series(table, spec)?;

    let root = BitMapBackend::new(out_path, opts.panel_size()).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.titled(
        spec.panel_title,
        ("sans-serif", opts.pt(16.0)).into_font().style(FontStyle::Bold),
    )?;

    let panels = root.split_evenly((2, 2));
    for (panel, (s, values)) in panels.iter().zip(&series) {
        let color = PALETTE[palette_index(spec, s)];
        let points = series_points(x, values, 1.0);
        let (x_lo, x_hi) = padded_range(points.iter().map(|&(x, _)| x));
        let (y_lo, y_hi) = padded_range(points.iter().map(|&(_, y)| y));

        let mut chart = ChartBuilder::on(panel)
            .caption(
                s.panel_title,
                ("sans-serif", opts.pt(12.0)).into_font().style(FontStyle::Bold),
            )
            .margin(opts.pt(8.0))
            .x_label_area_size(opts.pt(28.0))
            .y_label_area_size(opts.pt(36.0))
            .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)?;

        chart
            .configure_mesh()
            .x_desc(spec.control_label)
            .y_desc(s.axis_label)
            .axis_desc_style(("sans-serif", opts.pt(11.0)))
            .label_style(("sans-serif", opts.pt(9.0)))
            .bold_line_style(&BLACK.mix(GRID_OPACITY))
            .light_line_style(&TRANSPARENT)
            .draw()?;

        let dash = opts.pt(6.0);
        let width = opts.line_width();
        chart
            .draw_series(LineSeries::new(points, color.stroke_width(width)))?
            .label(s.label)
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + dash, y)], color.stroke_width(width))
            });

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK.mix(0.5))
            .label_font(("sans-serif", opts.pt(10.0)))
            .draw()?;
    }

    root.present()
        .with_context(|| format!("failed to write {}", out_path.display()))?;
    Ok(())
}

/// Render the shared-axis combined chart: all four metrics against the
/// control column, each scaled by its configured display factor and marked
/// every 20th point.
pub fn render_combined(
    table: &ResultTable,
    spec: &ReportSpec,
    out_path: &Path,
    opts: &RenderOptions,
) -> Result<()> {
    let (x, series) = resolve_series(table, spec)?;

    let scaled: Vec<(&SeriesSpec, Vec<(f64, f64)>)> = series
        .iter()
        .map(|(s, values)| (*s, series_points(x, values, s.combined_scale)))
        .collect();

    let (x_lo, x_hi) = padded_range(x.iter().copied());
    let (y_lo, y_hi) = padded_range(
        scaled
            .iter()
            .flat_map(|(_, points)| points.iter().map(|&(_, y)| y)),
    );

    let root = BitMapBackend::new(out_path, opts.combined_size()).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            spec.combined_title,
            ("sans-serif", opts.pt(14.0)).into_font().style(FontStyle::Bold),
        )
        .margin(opts.pt(10.0))
        .x_label_area_size(opts.pt(32.0))
        .y_label_area_size(opts.pt(40.0))
        .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)?;

    chart
        .configure_mesh()
        .x_desc(spec.control_label)
        .y_desc("Metric Value")
        .axis_desc_style(("sans-serif", opts.pt(12.0)))
        .label_style(("sans-serif", opts.pt(10.0)))
        .bold_line_style(&BLACK.mix(GRID_OPACITY))
        .light_line_style(&TRANSPARENT)
        .draw()?;

    let dash = opts.pt(6.0);
    let width = opts.line_width();
    for (s, points) in &scaled {
        let color = PALETTE[palette_index(spec, s)];
        chart
            .draw_series(LineSeries::new(points.clone(), color.stroke_width(width)))?
            .label(s.combined_label)
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + dash, y)], color.stroke_width(width))
            });
        draw_markers(&mut chart, points, s.marker, color, opts)?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK.mix(0.5))
        .label_font(("sans-serif", opts.pt(10.0)))
        .draw()?;

    root.present()
        .with_context(|| format!("failed to write {}", out_path.display()))?;
    Ok(())
}

/// Resolve the control column and all metric columns up front so a schema
/// error aborts before any drawing surface (and thus any output file) exists.
fn resolve_series<'a>(
    table: &'a ResultTable,
    spec: &'a ReportSpec,
) -> Result<(&'a [f64], Vec<(&'a SeriesSpec, &'a [f64])>)> {
    let x = table.column(spec.control_column)?;
    let series = spec
        .series
        .iter()
        .map(|s| table.column(s.column).map(|values| (s, values)))
        .collect::<Result<Vec<_>>>()?;
    if x.is_empty() {
        bail!("{}: table has no data rows", spec.csv_file);
    }
    Ok((x, series))
}

fn palette_index(spec: &ReportSpec, s: &SeriesSpec) -> usize {
    spec.series
        .iter()
        .position(|other| other.column == s.column)
        .unwrap_or(0)
}

/// Pair x values with y values, applying a display-only scale to y.
fn series_points(x: &[f64], y: &[f64], scale: f64) -> Vec<(f64, f64)> {
    x.iter().zip(y).map(|(&x, &y)| (x, y * scale)).collect()
}

/// Axis range with 10% padding; degenerate or non-finite input falls back to
/// a unit-ish window so the chart still builds.
fn padded_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for v in values {
        if v.is_finite() {
            lo = lo.min(v);
            hi = hi.max(v);
        }
    }
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    let range = hi - lo;
    let pad = if range > 1e-9 {
        0.1 * range
    } else {
        0.1 * hi.abs().max(1.0)
    };
    (lo - pad, hi + pad)
}

fn draw_markers<DB>(
    chart: &mut ChartContext<'_, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    points: &[(f64, f64)],
    marker: Marker,
    color: RGBColor,
    opts: &RenderOptions,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let r = opts.marker_radius();
    let marked = points.iter().copied().step_by(MARKER_EVERY);
    match marker {
        Marker::Circle => {
            chart.draw_series(marked.map(|p| Circle::new(p, r, color.filled())))?;
        }
        Marker::Square => {
            chart.draw_series(marked.map(|p| {
                EmptyElement::at(p) + Rectangle::new([(-r, -r), (r, r)], color.filled())
            }))?;
        }
        Marker::Triangle => {
            chart.draw_series(marked.map(|p| TriangleMarker::new(p, r, color.filled())))?;
        }
        Marker::Diamond => {
            chart.draw_series(marked.map(|p| {
                EmptyElement::at(p)
                    + Polygon::new(vec![(0, -r), (r, 0), (0, r), (-r, 0)], color.filled())
            }))?;
        }
    }
    Ok(())
}
