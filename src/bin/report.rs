use std::env;
use std::process::ExitCode;

use log::{error, info};
use tailstat::config::{Command, ReportConfig, USAGE};
use tailstat::report::ConvergenceReport;

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = match ReportConfig::from_args(env::args().skip(1))? {
        Command::Help => {
            println!("{USAGE}");
            return Ok(());
        }
        Command::Run(config) => config,
    };
    info!(
        "building report: n={}, seed={}, tolerance={}",
        config.sample_size, config.seed, config.tolerance
    );

    let report = ConvergenceReport::build(&config)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("{e}\n{USAGE}");
            ExitCode::FAILURE
        }
    }
}
