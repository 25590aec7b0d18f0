use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Export transactions from Plaid in hledger journal format.
#[derive(Parser, Debug)]
pub struct Args {
    /// Config file to use instead of ~/.hledger-exporter/config.yaml or ./config.yaml
    #[clap(long, global = true)]
    pub config: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print all transactions from START_DATE until today as hledger journal entries
    Export {
        /// First day to export, e.g. 2021-03-04 or "March 4, 2021"
        start_date: String,
    },

    /// Log in to the bank again when Plaid reports that the access token needs an update
    Update,
}

pub fn parse() -> Args {
    Args::parse()
}
