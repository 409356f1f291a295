use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use folio::cli::Report;
use folio::core::log::init_logging;
use std::path::PathBuf;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    /// Print reports as JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for folio::AppCommand {
    fn from(cmd: Commands) -> folio::AppCommand {
        match cmd {
            Commands::Import { file } => folio::AppCommand::Import(file),
            Commands::Summary => folio::AppCommand::Report(Report::Summary),
            Commands::Allocation => folio::AppCommand::Report(Report::Allocation),
            Commands::Holdings => folio::AppCommand::Report(Report::Holdings),
            Commands::Liquidity => folio::AppCommand::Report(Report::Liquidity),
            Commands::Risk => folio::AppCommand::Report(Report::Risk),
            Commands::Performance => folio::AppCommand::Report(Report::Performance),
            Commands::Macro => folio::AppCommand::Report(Report::Macro),
            Commands::Dashboard => folio::AppCommand::Report(Report::Dashboard),
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Seed the local store from a YAML or JSON snapshot file
    Import { file: PathBuf },
    /// Display net worth, debt and YTD return
    Summary,
    /// Display allocation by asset class
    Allocation,
    /// Display holdings with their returns
    Holdings,
    /// Display liquidity profile and debt
    Liquidity,
    /// Display concentration, liquidity and leverage risk
    Risk,
    /// Display monthly returns and top performers
    Performance,
    /// Display macro economic indicators
    Macro,
    /// Display every panel
    Dashboard,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => match cli.config_path.as_deref() {
            Some(path) => folio::cli::setup::setup_at_path(path),
            None => folio::cli::setup::setup(),
        },
        Some(cmd) => folio::run_command(cmd.into(), cli.config_path.as_deref(), cli.json).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
