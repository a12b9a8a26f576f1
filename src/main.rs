mod chart;
mod cli;
mod model;
mod report;
mod table;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let args = cli::Cli::parse();
    cli::run(args)
}
