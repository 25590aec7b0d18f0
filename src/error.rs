use std::path::PathBuf;

use thiserror::Error;

use crate::dates::DateParseError;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No config file found, looked in: {}", format_paths(.searched))]
    NotFound { searched: Vec<PathBuf> },
    #[error("Failed to read config file {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file")]
    Parse(#[from] serde_yaml::Error),
    #[error("Missing config value {key}, set it in the config file or in the environment")]
    Missing { key: &'static str },
    #[error("Rule #{index} has an invalid pattern {pattern:?}")]
    InvalidRulePattern {
        index: usize,
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("Account id {account_id:?} is mapped more than once (account ids are case insensitive)")]
    DuplicateAccount { account_id: String },
}

fn format_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Failed to load transactions at offset {offset}")]
    Request {
        offset: usize,
        #[source]
        source: BoxError,
    },
    #[error("Provider returned an empty page at offset {offset} but reported {total_count} transactions in total")]
    EmptyPage { offset: usize, total_count: usize },
    #[error("Gave up after {requests} page requests with {fetched} of {total_count} transactions fetched")]
    TooManyPages {
        requests: usize,
        fetched: usize,
        total_count: usize,
    },
    #[error("Failed to create a link token")]
    LinkToken(#[source] BoxError),
}

#[derive(Error, Debug)]
pub enum DataError {
    #[error("Provider returned an invalid date {value:?} for transaction {transaction_id}")]
    InvalidDate {
        transaction_id: String,
        value: String,
        #[source]
        source: DateParseError,
    },
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    Data(#[from] DataError),
    #[error("Failed to write ledger")]
    Write(#[from] std::io::Error),
}
