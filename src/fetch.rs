use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::ProviderError;
use crate::plaid_api::AccessToken;

pub const PAGE_SIZE: usize = 100;

/// Upper bound on page requests for a single fetch, in case the provider misreports its total.
pub const MAX_PAGE_REQUESTS: usize = 10_000;

/// A transaction as the provider reports it, before any classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderTransaction {
    pub id: String,
    pub account_id: String,
    pub date: String,
    pub description: String,
    pub amount: Decimal,
    pub pending: bool,
}

#[derive(Debug, Clone)]
pub struct TransactionsPage {
    pub total_count: usize,
    pub transactions: Vec<ProviderTransaction>,
}

/// Paginated access to the transactions of one item.
#[allow(async_fn_in_trait)]
pub trait TransactionProvider {
    async fn get_transactions(
        &self,
        access_token: &AccessToken,
        start_date: NaiveDate,
        end_date: NaiveDate,
        offset: usize,
        count: usize,
    ) -> Result<TransactionsPage>;
}

/// Request pages until the provider-reported total is reached.
pub async fn fetch_all(
    provider: &impl TransactionProvider,
    access_token: &AccessToken,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<Vec<ProviderTransaction>, ProviderError> {
    log::info!("Requesting transactions from {start_date} to {end_date}...");

    let mut result = Vec::new();
    let mut reported_total = None;
    let mut requests = 0;

    loop {
        let offset = result.len();
        if requests >= MAX_PAGE_REQUESTS {
            return Err(ProviderError::TooManyPages {
                requests,
                fetched: offset,
                total_count: reported_total.unwrap_or_default(),
            });
        }
        requests += 1;
        log::info!("Requesting transactions...page {requests}...");

        let page = provider
            .get_transactions(access_token, start_date, end_date, offset, PAGE_SIZE)
            .await
            .map_err(|source| ProviderError::Request {
                offset,
                source: source.into(),
            })?;
        let total_count = *reported_total.get_or_insert(page.total_count);

        if page.transactions.is_empty() && offset < total_count {
            return Err(ProviderError::EmptyPage {
                offset,
                total_count,
            });
        }
        result.extend(page.transactions);

        if result.len() >= total_count {
            break;
        }
    }

    log::info!(
        "Requesting transactions...done, got {} transactions in {requests} pages",
        result.len()
    );

    Ok(result)
}

#[cfg(test)]
pub(crate) mod testutils {
    use std::cell::RefCell;

    use anyhow::anyhow;

    use super::*;

    pub fn transaction(id: &str) -> ProviderTransaction {
        ProviderTransaction {
            id: id.to_string(),
            account_id: "acc1".to_string(),
            date: "2021-03-04".to_string(),
            description: format!("Transaction {id}"),
            amount: Decimal::new(1250, 2),
            pending: false,
        }
    }

    pub fn transactions(prefix: &str, count: usize) -> Vec<ProviderTransaction> {
        (0..count)
            .map(|i| transaction(&format!("{prefix}-{i}")))
            .collect()
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Request {
        pub offset: usize,
        pub count: usize,
    }

    /// Serves a fixed sequence of responses and records the requests it got.
    pub struct FakeProvider {
        responses: RefCell<Vec<Result<TransactionsPage, String>>>,
        requests: RefCell<Vec<Request>>,
    }

    impl FakeProvider {
        pub fn new(responses: Vec<Result<TransactionsPage, String>>) -> Self {
            Self {
                responses: RefCell::new(responses.into_iter().rev().collect()),
                requests: RefCell::new(vec![]),
            }
        }

        pub fn with_pages(total_count: usize, pages: Vec<Vec<ProviderTransaction>>) -> Self {
            Self::new(
                pages
                    .into_iter()
                    .map(|transactions| {
                        Ok(TransactionsPage {
                            total_count,
                            transactions,
                        })
                    })
                    .collect(),
            )
        }

        pub fn requests(&self) -> Vec<Request> {
            self.requests.borrow().clone()
        }
    }

    impl TransactionProvider for FakeProvider {
        async fn get_transactions(
            &self,
            _access_token: &AccessToken,
            _start_date: NaiveDate,
            _end_date: NaiveDate,
            offset: usize,
            count: usize,
        ) -> Result<TransactionsPage> {
            self.requests.borrow_mut().push(Request { offset, count });
            match self.responses.borrow_mut().pop() {
                Some(Ok(page)) => Ok(page),
                Some(Err(message)) => Err(anyhow!(message)),
                None => Err(anyhow!("No more scripted responses")),
            }
        }
    }
}
