use chrono::NaiveDate;
use std::io::Write;

use crate::config::AccountMap;
use crate::error::{DataError, ExportError};
use crate::fetch::{fetch_all, ProviderTransaction, TransactionProvider};
use crate::ledger::{render_ledger, sort_by_date, EntryBuilder, LedgerEntry, SkipCounts};
use crate::plaid_api::AccessToken;
use crate::rules::Rules;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportSummary {
    pub fetched: usize,
    pub exported: usize,
    pub skipped: SkipCounts,
}

/// Fetch all transactions between `start_date` and `end_date` and write them to `out` as a ledger.
///
/// Nothing is written unless every step succeeded.
pub async fn export_ledger(
    provider: &impl TransactionProvider,
    access_token: &AccessToken,
    accounts: &AccountMap,
    rules: &Rules,
    start_date: NaiveDate,
    end_date: NaiveDate,
    out: &mut impl Write,
) -> Result<ExportSummary, ExportError> {
    let transactions = fetch_all(provider, access_token, start_date, end_date).await?;
    let (mut entries, skipped) = build_entries(&transactions, accounts, rules)?;
    sort_by_date(&mut entries);

    let mut rendered = Vec::new();
    render_ledger(&mut rendered, &entries)?;
    out.write_all(&rendered)?;
    out.flush()?;

    let summary = ExportSummary {
        fetched: transactions.len(),
        exported: entries.len(),
        skipped,
    };
    log::info!(
        "Exported {} of {} transactions ({} pending, {} on unmapped accounts)",
        summary.exported,
        summary.fetched,
        summary.skipped.pending,
        summary.skipped.unmapped,
    );
    Ok(summary)
}

pub fn build_entries(
    transactions: &[ProviderTransaction],
    accounts: &AccountMap,
    rules: &Rules,
) -> Result<(Vec<LedgerEntry>, SkipCounts), DataError> {
    let mut builder = EntryBuilder::new(accounts, rules);
    let entries = transactions
        .iter()
        .filter_map(|transaction| builder.build(transaction).transpose())
        .collect::<Result<Vec<_>, _>>()?;
    Ok((entries, builder.skipped()))
}
