use chrono::NaiveDate;
use clap::error::ErrorKind;
use clap::{Arg, Command};
use stockmovers::commands::snapshot_service;
use stockmovers::config::AppConfig;
use stockmovers::error::AppError;
use stockmovers::utils::init_tracing;
use std::ffi::OsString;
use tracing::{error, info, warn};

const USAGE: &str = "Usage: ingest_historical YYYY/MM/DD";

/// Why the command line was rejected
#[derive(Debug)]
enum ArgsError {
    /// `--help`, printed by clap itself
    Help(clap::Error),
    /// Missing or extra arguments
    Usage,
    /// A date that is not `YYYY/MM/DD`
    Malformed,
}

impl ArgsError {
    /// Text for stderr; always ends with the usage line
    fn message(&self) -> String {
        match self {
            ArgsError::Help(e) => e.to_string(),
            ArgsError::Usage => USAGE.to_string(),
            ArgsError::Malformed => format!("Invalid date format. Please use YYYY/MM/DD.\n{}", USAGE),
        }
    }
}

fn command() -> Command {
    Command::new("ingest_historical")
        .about("Store the gainers and losers the provider reports for a past date")
        .arg(
            Arg::new("date")
                .value_name("YYYY/MM/DD")
                .help("Trading date to ingest")
                .required(true),
        )
}

/// Parse the command-line date, `YYYY/MM/DD`
fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y/%m/%d").ok()
}

/// The date requested on the command line
fn requested_date<I, T>(args: I) -> Result<NaiveDate, ArgsError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = command().try_get_matches_from(args).map_err(|e| match e.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ArgsError::Help(e),
        _ => ArgsError::Usage,
    })?;

    matches
        .get_one::<String>("date")
        .and_then(|raw| parse_date(raw))
        .ok_or(ArgsError::Malformed)
}

#[tokio::main]
async fn main() {
    init_tracing();

    let date = match requested_date(std::env::args_os()) {
        Ok(date) => date,
        Err(ArgsError::Help(e)) => e.exit(),
        Err(e) => {
            eprintln!("{}", e.message());
            std::process::exit(1);
        }
    };

    let config = AppConfig::from_env();
    let service = match snapshot_service(&config).await {
        Ok(service) => service,
        Err(e) => {
            error!(error = %e, "Failed to set up ingestion");
            std::process::exit(1);
        }
    };

    info!(%date, "Ingesting historical movers");
    let result = service.ingest_for_date(date).await;
    service.store().close().await;

    match result {
        Ok(rows) => {
            info!(%date, rows, "Historical ingestion complete");
            println!("✅ Stored {} records for {}", rows, date);
        }
        Err(AppError::Integrity(reason)) => {
            warn!(%date, %reason, "Snapshot for this date is already stored, rolled back");
            println!("⏭️  Data for {} is already stored", date);
        }
        Err(e) => {
            error!(%date, error = %e, "Historical ingestion failed");
            eprintln!("❌ Ingestion failed: {}", e);
            std::process::exit(1);
        }
    }
}
