//! Batch orchestration: the two discipline reports and the fixed-order run
//! that renders all four charts.

use crate::chart;
use crate::model::{
    BatchSummary, ChartKind, ChartSummary, Discipline, Marker, RenderOptions, ReportSpec,
    SeriesSpec,
};
use crate::table::ResultTable;
use anyhow::Result;
use std::path::{Path, PathBuf};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// Chart configuration for the FCFS sweep: metrics against scheduler latency.
pub fn fcfs_report() -> ReportSpec {
    ReportSpec {
        name: "FCFS",
        csv_file: "fcfs_results.csv",
        control_column: "Scheduler_Latency",
        control_label: "Scheduler/Dispatcher Latency (time units)",
        panel_file: "fcfs_plot.png",
        panel_title: "FCFS Scheduling: Impact of Scheduler/Dispatcher Latency",
        panel_tag: "FCFS",
        combined_file: "fcfs_combined_plot.png",
        combined_title: "FCFS Scheduling: All Metrics vs Scheduler/Dispatcher Latency",
        combined_tag: "FCFS combined",
        series: [
            SeriesSpec {
                column: "Throughput",
                label: "Throughput",
                panel_title: "Throughput vs Latency",
                axis_label: "Throughput (processes/time unit)",
                combined_label: "Throughput (×10000)",
                combined_scale: 10000.0,
                marker: Marker::Circle,
            },
            SeriesSpec {
                column: "Avg_Waiting_Time",
                label: "Avg Waiting Time",
                panel_title: "Average Waiting Time vs Latency",
                axis_label: "Average Waiting Time (time units)",
                combined_label: "Avg Waiting Time",
                combined_scale: 1.0,
                marker: Marker::Square,
            },
            SeriesSpec {
                column: "Avg_Turnaround_Time",
                label: "Avg Turnaround Time",
                panel_title: "Average Turnaround Time vs Latency",
                axis_label: "Average Turnaround Time (time units)",
                combined_label: "Avg Turnaround Time",
                combined_scale: 1.0,
                marker: Marker::Triangle,
            },
            SeriesSpec {
                column: "Avg_Response_Time",
                label: "Avg Response Time",
                panel_title: "Average Response Time vs Latency",
                axis_label: "Average Response Time (time units)",
                combined_label: "Avg Response Time",
                combined_scale: 1.0,
                marker: Marker::Diamond,
            },
        ],
    }
}

/// Chart configuration for the Round Robin sweep: metrics against quantum size.
pub fn rr_report() -> ReportSpec {
    ReportSpec {
        name: "Round Robin",
        csv_file: "rr_results.csv",
        control_column: "Quantum_Size",
        control_label: "Quantum Size (time units)",
        panel_file: "rr_plot.png",
        panel_title: "Round Robin Scheduling: Impact of Quantum Size",
        panel_tag: "Round Robin",
        combined_file: "rr_combined_plot.png",
        combined_title: "Round Robin Scheduling: All Metrics vs Quantum Size",
        combined_tag: "RR combined",
        series: [
            SeriesSpec {
                column: "Throughput",
                label: "Throughput",
                panel_title: "Throughput vs Quantum Size",
                axis_label: "Throughput (processes/time unit)",
                combined_label: "Throughput (×10000)",
                combined_scale: 10000.0,
                marker: Marker::Circle,
            },
            SeriesSpec {
                column: "Avg_Waiting_Time",
                label: "Avg Waiting Time",
                panel_title: "Average Waiting Time vs Quantum Size",
                axis_label: "Average Waiting Time (time units)",
                combined_label: "Avg Waiting Time",
                combined_scale: 1.0,
                marker: Marker::Square,
            },
            SeriesSpec {
                column: "Avg_Turnaround_Time",
                label: "Avg Turnaround Time",
                panel_title: "Average Turnaround Time vs Quantum Size",
                axis_label: "Average Turnaround Time (time units)",
                combined_label: "Avg Turnaround Time",
                combined_scale: 1.0,
                marker: Marker::Triangle,
            },
            SeriesSpec {
                column: "Avg_Response_Time",
                label: "Avg Response Time",
                panel_title: "Average Response Time vs Quantum Size",
                axis_label: "Average Response Time (time units)",
                combined_label: "Avg Response Time",
                combined_scale: 1.0,
                marker: Marker::Diamond,
            },
        ],
    }
}

/// Render both charts for one report. The CSV is loaded once and the same
/// in-memory table feeds the panel chart and the combined chart.
pub fn run_report(
    spec: &ReportSpec,
    data_dir: &Path,
    out_dir: &Path,
    opts: &RenderOptions,
) -> Result<Vec<ChartSummary>> {
    let table = ResultTable::load(&join_dir(data_dir, spec.csv_file))?;
    let rows = table.rows();

    let panel_out = join_dir(out_dir, spec.panel_file);
    chart::render_panels(&table, spec, &panel_out, opts)?;
    println!("{} plot saved as {}", spec.panel_tag, panel_out.display());

    let combined_out = join_dir(out_dir, spec.combined_file);
    chart::render_combined(&table, spec, &combined_out, opts)?;
    println!("{} plot saved as {}", spec.combined_tag, combined_out.display());

    Ok(vec![
        ChartSummary {
            report: spec.name,
            kind: ChartKind::Panels,
            rows,
            output: panel_out,
        },
        ChartSummary {
            report: spec.name,
            kind: ChartKind::Combined,
            rows,
            output: combined_out,
        },
    ])
}

/// Run the reports in fixed order (FCFS first, then Round Robin), printing
/// the batch progress lines. A failure aborts the remaining reports and
/// leaves earlier outputs in place.
pub fn run_batch(
    data_dir: &Path,
    out_dir: &Path,
    opts: &RenderOptions,
    only: Option<Discipline>,
) -> Result<BatchSummary> {
    println!("Generating plots...");

    let reports: Vec<ReportSpec> = [
        (Discipline::Fcfs, fcfs_report()),
        (Discipline::RoundRobin, rr_report()),
    ]
    .into_iter()
    .filter(|(discipline, _)| only.map_or(true, |o| o == *discipline))
    .map(|(_, spec)| spec)
    .collect();

    let mut charts = Vec::new();
    for (idx, spec) in reports.iter().enumerate() {
        println!("\n{}. {} Plots", idx + 1, spec.name);
        charts.extend(run_report(spec, data_dir, out_dir, opts)?);
    }

    println!("\nAll plots generated successfully!");

    Ok(BatchSummary {
        generated_at: utc_timestamp(),
        charts,
    })
}

/// Join a file onto a directory, keeping bare file names when the directory
/// is the default `.` so the saved-as lines match the original tool's output.
fn join_dir(dir: &Path, file: &str) -> PathBuf {
    if dir == Path::new(".") {
        PathBuf::from(file)
    } else {
        dir.join(file)
    }
}

fn utc_timestamp() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_sweep(path: &Path, control: &str, rows: usize) {
        let mut csv = format!(
            "{control},Throughput,Avg_Waiting_Time,Avg_Turnaround_Time,Avg_Response_Time\n"
        );
        for i in 0..rows {
            let x = i as f64;
            csv.push_str(&format!(
                "{},{},{},{},{}\n",
                x,
                0.05 - 0.0001 * x,
                2.0 + 0.5 * x,
                5.0 + 0.5 * x,
                1.0 + 0.25 * x,
            ));
        }
        fs::write(path, csv).unwrap();
    }

    fn test_opts() -> RenderOptions {
        RenderOptions { dpi: 36 }
    }

    #[test]
    fn batch_renders_all_four_charts() {
        let dir = tempfile::tempdir().unwrap();
        write_sweep(&dir.path().join("fcfs_results.csv"), "Scheduler_Latency", 60);
        write_sweep(&dir.path().join("rr_results.csv"), "Quantum_Size", 45);

        let summary = run_batch(dir.path(), dir.path(), &test_opts(), None).unwrap();

        for file in [
            "fcfs_plot.png",
            "fcfs_combined_plot.png",
            "rr_plot.png",
            "rr_combined_plot.png",
        ] {
            let meta = fs::metadata(dir.path().join(file)).unwrap();
            assert!(meta.len() > 0, "{file} should be non-empty");
        }

        assert_eq!(summary.charts.len(), 4);
        assert!(summary.charts[..2].iter().all(|c| c.rows == 60));
        assert!(summary.charts[2..].iter().all(|c| c.rows == 45));
    }

    #[test]
    fn only_filter_renders_a_single_discipline() {
        let dir = tempfile::tempdir().unwrap();
        write_sweep(&dir.path().join("rr_results.csv"), "Quantum_Size", 30);

        let summary =
            run_batch(dir.path(), dir.path(), &test_opts(), Some(Discipline::RoundRobin)).unwrap();

        assert_eq!(summary.charts.len(), 2);
        assert!(dir.path().join("rr_plot.png").exists());
        assert!(dir.path().join("rr_combined_plot.png").exists());
        assert!(!dir.path().join("fcfs_plot.png").exists());
    }

    #[test]
    fn missing_input_halts_the_batch_but_keeps_earlier_outputs() {
        let dir = tempfile::tempdir().unwrap();
        write_sweep(&dir.path().join("fcfs_results.csv"), "Scheduler_Latency", 30);
        // no rr_results.csv

        let err = run_batch(dir.path(), dir.path(), &test_opts(), None).unwrap_err();
        assert!(format!("{err:#}").contains("rr_results.csv"));

        assert!(dir.path().join("fcfs_plot.png").exists());
        assert!(dir.path().join("fcfs_combined_plot.png").exists());
        assert!(!dir.path().join("rr_plot.png").exists());
        assert!(!dir.path().join("rr_combined_plot.png").exists());
    }

    #[test]
    fn wrong_control_column_fails_without_output() {
        let dir = tempfile::tempdir().unwrap();
        // FCFS data accidentally carrying the RR control column.
        write_sweep(&dir.path().join("fcfs_results.csv"), "Quantum_Size", 30);

        let err =
            run_batch(dir.path(), dir.path(), &test_opts(), Some(Discipline::Fcfs)).unwrap_err();
        assert!(format!("{err:#}").contains("Scheduler_Latency"));
        assert!(!dir.path().join("fcfs_plot.png").exists());
    }

    #[test]
    fn default_dirs_use_bare_file_names() {
        assert_eq!(
            join_dir(Path::new("."), "fcfs_plot.png"),
            PathBuf::from("fcfs_plot.png")
        );
        assert_eq!(
            join_dir(Path::new("out"), "fcfs_plot.png"),
            PathBuf::from("out/fcfs_plot.png")
        );
    }
}
