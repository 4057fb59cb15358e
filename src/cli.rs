use crate::commands::{run_assess, run_dmf, run_history, AssessArgs, DmfArgs, HistoryArgs};
use clap::{Parser, Subcommand};
use pretrial_psa::config::AppConfig;
use pretrial_psa::error::AppError;
use pretrial_psa::telemetry;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "pretrial-psa",
    about = "Release-conditions recommendations and case history review for pretrial assessments",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Look up a recommendation from NCA/FTA scales and escalation flags
    Dmf(DmfArgs),
    /// Score an assessment document and produce its recommendation
    Assess(AssessArgs),
    /// Split a case history export into pending and other charges
    History(HistoryArgs),
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    info!(environment = ?config.environment, "pretrial assessment tool starting");

    match cli.command {
        Command::Dmf(args) => run_dmf(args, &config),
        Command::Assess(args) => run_assess(args, &config),
        Command::History(args) => run_history(args),
    }
}
