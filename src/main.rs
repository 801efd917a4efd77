use clap::Parser;
use panelcam::cli::{self, Cli, RunStatus};
use panelcam::init_logging;
use std::process::ExitCode;

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_json)?;

    let status = cli::run(cli, &mut std::io::stdout().lock())?;
    Ok(match status {
        RunStatus::Success => ExitCode::SUCCESS,
        RunStatus::AllFailed => ExitCode::FAILURE,
    })
}
