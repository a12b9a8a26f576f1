use clap::ValueEnum;
use serde::Serialize;
use std::path::PathBuf;

/// Marker shape drawn on combined-chart series every few data points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Circle,
    Square,
    Triangle,
    Diamond,
}

/// One plotted metric: where its values come from and how each chart labels
/// them. `combined_scale` is a display-only factor applied on the shared-axis
/// chart so series of different magnitudes stay visually comparable.
#[derive(Debug, Clone)]
pub struct SeriesSpec {
    pub column: &'static str,
    pub label: &'static str,
    pub panel_title: &'static str,
    pub axis_label: &'static str,
    pub combined_label: &'static str,
    pub combined_scale: f64,
    pub marker: Marker,
}

/// Full configuration for one discipline's pair of charts: input CSV, control
/// column, output files, titles, and the four metric series.
#[derive(Debug, Clone)]
pub struct ReportSpec {
    pub name: &'static str,
    pub csv_file: &'static str,
    pub control_column: &'static str,
    pub control_label: &'static str,
    pub panel_file: &'static str,
    pub panel_title: &'static str,
    pub panel_tag: &'static str,
    pub combined_file: &'static str,
    pub combined_title: &'static str,
    pub combined_tag: &'static str,
    pub series: [SeriesSpec; 4],
}

/// Raster output settings. Figure geometry mirrors the simulator's original
/// reporting: 14x10 in metric panels, 12x7 in combined charts, rendered at a
/// configurable DPI with fonts, line widths, and markers scaled to match.
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub dpi: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { dpi: 300 }
    }
}

impl RenderOptions {
    pub fn panel_size(&self) -> (u32, u32) {
        (self.inches(14.0), self.inches(10.0))
    }

    pub fn combined_size(&self) -> (u32, u32) {
        (self.inches(12.0), self.inches(7.0))
    }

    /// Convert a point size (1/72 in) to device pixels at the configured DPI.
    pub fn pt(&self, pts: f64) -> i32 {
        (pts * self.dpi as f64 / 72.0).round() as i32
    }

    pub fn line_width(&self) -> u32 {
        (self.pt(2.0).max(1)) as u32
    }

    pub fn marker_radius(&self) -> i32 {
        self.pt(3.0).max(2)
    }

    fn inches(&self, inches: f64) -> u32 {
        (inches * self.dpi as f64).round() as u32
    }
}

/// Scheduling discipline selector for `--only`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Discipline {
    Fcfs,
    #[value(name = "rr")]
    RoundRobin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Panels,
    Combined,
}

/// Record of one chart written to disk, reported in the `--json` summary.
#[derive(Debug, Clone, Serialize)]
pub struct ChartSummary {
    pub report: &'static str,
    pub kind: ChartKind,
    pub rows: usize,
    pub output: PathBuf,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub generated_at: String,
    pub charts: Vec<ChartSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_geometry_tracks_dpi() {
        let opts = RenderOptions { dpi: 300 };
        assert_eq!(opts.panel_size(), (4200, 3000));
        assert_eq!(opts.combined_size(), (3600, 2100));
        // 2 pt line at 300 dpi is ~8 px
        assert_eq!(opts.line_width(), 8);
    }

    #[test]
    fn low_dpi_keeps_strokes_visible() {
        let opts = RenderOptions { dpi: 36 };
        assert!(opts.line_width() >= 1);
        assert!(opts.marker_radius() >= 2);
    }
}
