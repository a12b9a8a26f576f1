use crate::model::{Discipline, RenderOptions};
use crate::report;
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser, Clone)]
#[command(
    name = "sched-plot",
    version,
    about = "Render scheduling sweep metrics from CSV into PNG charts"
)]
pub struct Cli {
    /// Directory containing fcfs_results.csv / rr_results.csv
    #[arg(long, default_value = ".")]
    pub data_dir: PathBuf,

    /// Directory the PNG charts are written to
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Raster resolution in dots per inch
    #[arg(long, default_value_t = 300)]
    pub dpi: u32,

    /// Render charts for a single discipline only
    #[arg(long, value_enum)]
    pub only: Option<Discipline>,

    /// Print a JSON summary of the generated charts
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: Cli) -> Result<()> {
    if args.dpi == 0 {
        return Err(anyhow::anyhow!("--dpi must be positive"));
    }

    let opts = RenderOptions { dpi: args.dpi };
    let summary = report::run_batch(&args.data_dir, &args.out_dir, &opts, args.only)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_match_the_batch_contract() {
        let args = Cli::parse_from(["sched-plot"]);
        assert_eq!(args.data_dir, PathBuf::from("."));
        assert_eq!(args.out_dir, PathBuf::from("."));
        assert_eq!(args.dpi, 300);
        assert_eq!(args.only, None);
        assert!(!args.json);
    }

    #[test]
    fn only_accepts_discipline_names() {
        let args = Cli::parse_from(["sched-plot", "--only", "rr"]);
        assert_eq!(args.only, Some(Discipline::RoundRobin));
        let args = Cli::parse_from(["sched-plot", "--only", "fcfs"]);
        assert_eq!(args.only, Some(Discipline::Fcfs));
    }

    #[test]
    fn zero_dpi_is_rejected() {
        let args = Cli::parse_from(["sched-plot", "--dpi", "0"]);
        assert!(run(args).is_err());
    }
}
