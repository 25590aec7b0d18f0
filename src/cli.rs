use anyhow::{bail, Context as _, Result};
use chrono::{Local, NaiveDate};
use std::io::stdout;

use crate::args::{Args, Command};
use crate::config::Config;
use crate::dates::parse_date_strict;
use crate::export::export_ledger;
use crate::link_http_server;
use crate::plaid_api::{self, Plaid};
use crate::rules::Rules;

pub async fn main(args: Args) -> Result<()> {
    // Validate arguments before touching the config or the network
    let command = ValidatedCommand::new(args.command, Local::now().date_naive())?;
    let config = Config::load(args.config.as_deref()).context("Failed to load config")?;
    let cli = Cli::new(config)?;
    match command {
        ValidatedCommand::Export {
            start_date,
            end_date,
        } => cli.main_export(start_date, end_date).await,
        ValidatedCommand::Update => cli.main_update().await,
    }
}

#[derive(Debug, PartialEq, Eq)]
enum ValidatedCommand {
    Export {
        start_date: NaiveDate,
        end_date: NaiveDate,
    },
    Update,
}

impl ValidatedCommand {
    fn new(command: Command, today: NaiveDate) -> Result<Self> {
        match command {
            Command::Export { start_date } => {
                let start_date = parse_date_strict(&start_date)
                    .with_context(|| format!("Invalid start date {start_date:?}"))?;
                if start_date > today {
                    bail!("Start date {start_date} is in the future");
                }
                Ok(Self::Export {
                    start_date,
                    end_date: today,
                })
            }
            Command::Update => Ok(Self::Update),
        }
    }
}

pub struct Cli {
    config: Config,
    rules: Rules,
    plaid_api: Plaid,
}

impl Cli {
    pub fn new(config: Config) -> Result<Self> {
        let rules = Rules::compile(&config.rules).context("Invalid rule in config")?;
        log::info!(
            "Loaded {} account mappings and {} rules",
            config.accounts.len(),
            rules.len(),
        );
        let plaid_api = Plaid::new(&config.plaid);
        Ok(Self {
            config,
            rules,
            plaid_api,
        })
    }

    pub async fn main_export(&self, start_date: NaiveDate, end_date: NaiveDate) -> Result<()> {
        export_ledger(
            &self.plaid_api,
            &self.config.plaid.access_token,
            &self.config.accounts,
            &self.rules,
            start_date,
            end_date,
            &mut stdout(),
        )
        .await
        .context("Export failed")?;
        Ok(())
    }

    pub async fn main_update(&self) -> Result<()> {
        let link_token =
            plaid_api::create_update_link_token(&self.plaid_api, &self.config.plaid.access_token)
                .await?;
        link_http_server::update_in_browser(link_token).await?;
        eprintln!("Access token updated");
        Ok(())
    }
}
