use std::fmt::{self, Display};
use std::io::Write;

use rust_decimal::RoundingStrategy;

use super::LedgerEntry;

const POSTING_INDENT: &str = "    ";
const AMOUNT_GAP: &str = "    ";
const DATE_FORMAT: &str = "%Y-%m-%d";

impl Display for LedgerEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Amounts line up within one entry, not across the whole file
        let width = self
            .postings()
            .iter()
            .map(|posting| posting.account.chars().count())
            .max()
            .unwrap_or(0);

        write!(f, "{} {}", self.date().format(DATE_FORMAT), self.description())?;
        for posting in self.postings() {
            write!(
                f,
                "\n{POSTING_INDENT}{:<width$}{AMOUNT_GAP}{:.2}",
                posting.account,
                posting.amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
            )?;
        }
        Ok(())
    }
}

/// Writes all entries, each followed by an empty line.
pub fn render_ledger<'a>(
    out: &mut impl Write,
    entries: impl IntoIterator<Item = &'a LedgerEntry>,
) -> std::io::Result<()> {
    for entry in entries {
        write!(out, "{entry}\n\n")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use super::*;

    fn entry(
        date: (i32, u32, u32),
        description: &str,
        source: &str,
        destination: &str,
        amount: Decimal,
    ) -> LedgerEntry {
        LedgerEntry::transfer(
            NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            description.to_string(),
            source.to_string(),
            destination.to_string(),
            amount,
        )
    }

    #[test]
    fn render_equal_length_accounts() {
        let entry = entry(
            (2021, 3, 4),
            "Starbucks",
            "assets:checking",
            "expenses:coffee",
            Decimal::new(1250, 2),
        );
        assert_eq!(
            "2021-03-04 Starbucks\n    assets:checking    -12.50\n    expenses:coffee    12.50",
            entry.to_string(),
        );
    }

    #[test]
    fn render_pads_shorter_account_name() {
        let entry = entry(
            (2020, 1, 9),
            "PAYROLL ACME CORP",
            "assets:bank",
            "income:salary:acme",
            Decimal::new(-250000, 2),
        );
        assert_eq!(
            "2020-01-09 PAYROLL ACME CORP\n    assets:bank           2500.00\n    income:salary:acme    -2500.00",
            entry.to_string(),
        );
    }

    #[test]
    fn render_rounds_to_two_decimal_places() {
        let whole = entry((2021, 12, 31), "Fee", "a", "b", Decimal::new(3, 0));
        assert_eq!(
            "2021-12-31 Fee\n    a    -3.00\n    b    3.00",
            whole.to_string()
        );

        let one_decimal = entry((2021, 12, 31), "Fee", "a", "b", Decimal::new(1234, 1));
        assert_eq!(
            "2021-12-31 Fee\n    a    -123.40\n    b    123.40",
            one_decimal.to_string()
        );
    }

    #[test]
    fn render_rounds_half_cents_away_from_zero() {
        let half_cent = entry((2021, 12, 31), "Fee", "a", "b", Decimal::new(-5, 3));
        assert_eq!(
            "2021-12-31 Fee\n    a    0.01\n    b    -0.01",
            half_cent.to_string()
        );

        let above_half = entry((2021, 12, 31), "Fee", "a", "b", Decimal::new(1015, 3));
        assert_eq!(
            "2021-12-31 Fee\n    a    -1.02\n    b    1.02",
            above_half.to_string()
        );
    }

    #[test]
    fn render_has_no_thousands_separator() {
        let entry = entry(
            (2021, 6, 1),
            "Rent",
            "assets:checking",
            "expenses:rent",
            Decimal::new(123456789, 2),
        );
        assert!(entry.to_string().ends_with("expenses:rent      1234567.89"));
    }

    #[test]
    fn alignment_only_depends_on_the_entry() {
        let short = entry((2021, 3, 4), "A", "assets:checking", "expenses:coffee", Decimal::ONE);
        let long = entry(
            (2021, 3, 5),
            "B",
            "assets:checking",
            "expenses:a:very:long:account:name",
            Decimal::ONE,
        );

        let mut out = Vec::new();
        render_ledger(&mut out, [&short, &long]).unwrap();
        let out = String::from_utf8(out).unwrap();

        assert_eq!(
            "2021-03-04 A\n    assets:checking    -1.00\n    expenses:coffee    1.00\n\n\
             2021-03-05 B\n    assets:checking                      -1.00\n    expenses:a:very:long:account:name    1.00\n\n",
            out
        );
    }

    #[test]
    fn render_nothing() {
        let mut out = Vec::new();
        render_ledger(&mut out, &[]).unwrap();
        assert!(out.is_empty());
    }
}
