use std::fmt::Display;

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use plaid::model::TransactionsGetRequestOptions;
use rust_decimal::{prelude::FromPrimitive as _, Decimal};

use crate::fetch::{ProviderTransaction, TransactionProvider, TransactionsPage};

use super::{client::Plaid, AccessToken};

impl TransactionProvider for Plaid {
    async fn get_transactions(
        &self,
        access_token: &AccessToken,
        start_date: NaiveDate,
        end_date: NaiveDate,
        offset: usize,
        count: usize,
    ) -> Result<TransactionsPage> {
        let response = self
            .client()
            .transactions_get(access_token.get(), end_date, start_date)
            .options(TransactionsGetRequestOptions {
                count: Some(count.try_into()?),
                offset: Some(offset.try_into()?),
                ..Default::default()
            })
            .await?;

        let total_count = total_count(response.total_transactions)?;
        let transactions = response
            .transactions
            .into_iter()
            .map(to_provider_transaction)
            .collect::<Result<_>>()?;
        Ok(TransactionsPage {
            total_count,
            transactions,
        })
    }
}

fn total_count(total_transactions: i64) -> Result<usize> {
    usize::try_from(total_transactions).map_err(|_| {
        anyhow!("Plaid reported a negative transaction count: {total_transactions}")
    })
}

fn to_provider_transaction(transaction: plaid::model::Transaction) -> Result<ProviderTransaction> {
    let transaction = transaction.transaction_base;
    provider_transaction(
        transaction.transaction_id,
        transaction.account_id,
        transaction.date,
        transaction.name,
        transaction.amount,
        transaction.pending,
    )
}

fn provider_transaction(
    id: String,
    account_id: String,
    date: impl Display,
    name: Option<String>,
    amount: f64,
    pending: bool,
) -> Result<ProviderTransaction> {
    let amount = Decimal::from_f64(amount)
        .ok_or_else(|| anyhow!("Plaid returned an invalid amount {amount} for transaction {id}"))?;
    Ok(ProviderTransaction {
        id,
        account_id,
        date: date.to_string(),
        description: name.unwrap_or_default(),
        amount,
        pending,
    })
}
