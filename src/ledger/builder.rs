use crate::config::AccountMap;
use crate::dates::parse_date_strict;
use crate::error::DataError;
use crate::fetch::ProviderTransaction;
use crate::rules::Rules;

use super::LedgerEntry;

/// Number of transactions that didn't make it into the ledger, by reason.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SkipCounts {
    pub pending: usize,
    pub unmapped: usize,
}

pub struct EntryBuilder<'a> {
    accounts: &'a AccountMap,
    rules: &'a Rules,
    skipped: SkipCounts,
}

impl<'a> EntryBuilder<'a> {
    pub fn new(accounts: &'a AccountMap, rules: &'a Rules) -> Self {
        Self {
            accounts,
            rules,
            skipped: SkipCounts::default(),
        }
    }

    /// Returns Ok(None) for transactions that don't belong in the ledger, i.e. pending
    /// transactions and transactions on accounts that aren't mapped to a ledger account.
    pub fn build(
        &mut self,
        transaction: &ProviderTransaction,
    ) -> Result<Option<LedgerEntry>, DataError> {
        if transaction.pending {
            log::debug!(
                "Skipping pending transaction {} ({:?})",
                transaction.id,
                transaction.description,
            );
            self.skipped.pending += 1;
            return Ok(None);
        }

        let Some(source_account) = self.accounts.lookup(&transaction.account_id) else {
            log::warn!(
                "Skipping transaction {} ({:?}) because account {} isn't mapped to a ledger account",
                transaction.id,
                transaction.description,
                transaction.account_id,
            );
            self.skipped.unmapped += 1;
            return Ok(None);
        };

        let date =
            parse_date_strict(&transaction.date).map_err(|source| DataError::InvalidDate {
                transaction_id: transaction.id.clone(),
                value: transaction.date.clone(),
                source,
            })?;

        let destination_account = self.rules.classify(&transaction.description);

        Ok(Some(LedgerEntry::transfer(
            date,
            transaction.description.clone(),
            source_account.to_string(),
            destination_account.to_string(),
            transaction.amount,
        )))
    }

    pub fn skipped(&self) -> SkipCounts {
        self.skipped
    }
}
