pub mod args;
pub mod cli;
pub mod config;
pub mod dates;
pub mod error;
pub mod export;
pub mod fetch;
pub mod ledger;
pub mod link_http_server;
pub mod plaid_api;
pub mod rules;
