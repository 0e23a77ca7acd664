//! rf-rtp-sim - estimate RTP and hit frequencies by simulation

use anyhow::{Context, Result};
use clap::Parser;

use rf_rtp_sim::{BatchRunner, CensusReport, Cli};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let tables = cli.load_tables().context("Failed to load game tables")?;

    if cli.verify {
        tables.validate().context("Game tables are inconsistent")?;
        let census = CensusReport::new(&tables);
        if cli.json {
            println!("{}", census.to_json()?);
        } else {
            census.log();
        }
        return Ok(());
    }

    let mut runner = BatchRunner::new(tables, cli.options());
    if let Some(threads) = cli.threads {
        runner = runner.with_threads(threads);
    }

    let report = runner.run().context("Simulation aborted")?;
    if cli.json {
        println!("{}", report.to_json()?);
    } else {
        report.log();
    }
    Ok(())
}
