use std::io;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::{Level, error, info};
use tracing_subscriber::{EnvFilter, fmt};

use dca_pl::config::Config;
use dca_pl::domain::parse_decimal;
use dca_pl::report::{self, PlOptions, ReportError};
use dca_pl::threecommas::Client;

const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Calculate total P/L and fees from DCA bot deals.
///
/// Covers every bot of the account unless a bot id is given.
#[derive(Debug, Parser)]
#[command(name = "dca-pl", version, args_conflicts_with_subcommands = true)]
struct Cli {
    /// Alternate config file.
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    /// Log level: trace, debug, info, warn, error.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(flatten)]
    pl: PlArgs,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Maximum capital a bot can deploy and its share of the account.
    Allocation(AllocationArgs),
}

#[derive(Debug, Args)]
struct PlArgs {
    /// Target bot id (the number in the bot's URL).
    #[arg(short, long)]
    bot: Option<u64>,

    /// Print nothing but errors.
    #[arg(short, long)]
    quiet: bool,

    /// Do not write the deal log.
    #[arg(short = 's', long = "no-log")]
    no_log: bool,

    /// Capital size in USD; total P/L is also shown as a percentage of it.
    #[arg(short, long, value_parser = parse_allocation)]
    allocation: Option<Decimal>,

    /// Print only the totals block.
    #[arg(short, long)]
    totals_only: bool,
}

#[derive(Debug, Args)]
struct AllocationArgs {
    /// Target bot id.
    #[arg(short, long)]
    bot: u64,
}

fn parse_allocation(s: &str) -> Result<Decimal, String> {
    match parse_decimal(s) {
        Some(v) if v > Decimal::ZERO => Ok(v),
        Some(_) => Err("allocation must be positive".to_string()),
        None => Err(format!("invalid amount: {}", s)),
    }
}

fn init_tracing(log_level: Option<&str>, quiet: bool) {
    let level = match log_level {
        Some("debug") => Level::DEBUG,
        Some("info") => Level::INFO,
        Some("warn") | Some("warning") => Level::WARN,
        Some("error") => Level::ERROR,
        Some("trace") => Level::TRACE,
        _ if quiet => Level::WARN,
        _ => Level::INFO,
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::load(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let log_level = cli.log_level.as_deref().or(config.app.log_level.as_deref());
    init_tracing(log_level, cli.pl.quiet);

    let client = match Client::from_config(&config.api) {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "Failed to create API client");
            return ExitCode::FAILURE;
        }
    };

    info!(app = %config.app.name, config = %cli.config, "Config loaded");

    let mut stdout = io::stdout();
    let result: Result<(), ReportError> = match cli.command {
        Some(Command::Allocation(args)) => report::run_allocation(&client, args.bot, &mut stdout)
            .await
            .map(|_| ()),
        None => {
            let opts = PlOptions {
                bot_id: cli.pl.bot,
                quiet: cli.pl.quiet,
                no_log: cli.pl.no_log,
                totals_only: cli.pl.totals_only,
                allocation: cli.pl.allocation,
            };
            report::run_pl(&client, &config.report, &cli.config, &opts, &mut stdout)
                .await
                .map(|_| ())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Report failed");
            ExitCode::FAILURE
        }
    }
}
