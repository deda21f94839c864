use clap::{Parser, Subcommand};

use crate::commands;

#[derive(Parser)]
#[command(name = "stockmovers")]
#[command(about = "Daily stock market gainers and losers dashboard", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web dashboard
    Serve {
        /// Interface to bind
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Port to listen on
        #[arg(short, long, default_value_t = 5000)]
        port: u16,
    },
    /// Take today's snapshot if it is due
    Snapshot {
        /// Fetch and store even if the daily gate says no
        #[arg(short, long)]
        force: bool,
    },
    /// Show stored snapshots and gate state
    Status,
}

pub async fn run() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { host, port } => {
            commands::serve::run(host, port).await;
        }
        Commands::Snapshot { force } => {
            commands::snapshot::run(force).await;
        }
        Commands::Status => {
            commands::status::run().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_defaults() {
        let cli = Cli::try_parse_from(["stockmovers", "serve"]).unwrap();
        match cli.command {
            Commands::Serve { host, port } => {
                assert_eq!(host, "0.0.0.0");
                assert_eq!(port, 5000);
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_snapshot_force_flag() {
        let cli = Cli::try_parse_from(["stockmovers", "snapshot", "--force"]).unwrap();
        assert!(matches!(cli.command, Commands::Snapshot { force: true }));
    }
}
