use chrono::NaiveDate;
use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Posting {
    pub account: String,
    pub amount: Decimal,
}

/// A journal entry moving `amount` from one account into another.
///
/// It always has exactly two postings and they always sum to zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    date: NaiveDate,
    description: String,
    postings: [Posting; 2],
}

impl LedgerEntry {
    /// The source account gets `-amount`, the destination account gets `amount`.
    pub fn transfer(
        date: NaiveDate,
        description: String,
        source_account: String,
        destination_account: String,
        amount: Decimal,
    ) -> Self {
        Self {
            date,
            description,
            postings: [
                Posting {
                    account: source_account,
                    amount: -amount,
                },
                Posting {
                    account: destination_account,
                    amount,
                },
            ],
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn postings(&self) -> &[Posting; 2] {
        &self.postings
    }

    pub fn is_balanced(&self) -> bool {
        self.postings
            .iter()
            .map(|posting| posting.amount)
            .sum::<Decimal>()
            .is_zero()
    }
}

/// Stable sort, entries on the same date keep their relative order.
pub fn sort_by_date(entries: &mut [LedgerEntry]) {
    entries.sort_by_key(|entry| entry.date);
}
