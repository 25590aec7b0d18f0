use chrono::{DateTime, NaiveDate, NaiveDateTime};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateParseError {
    #[error("'{0}' is ambiguous, it could be read as month/day or as day/month")]
    Ambiguous(String),
    #[error("'{0}' is not a valid calendar date")]
    OutOfRange(String),
    #[error("'{0}' is not in a recognized date format")]
    Unrecognized(String),
}

const TEXTUAL_FORMATS: &[&str] = &["%B %d, %Y", "%b %d, %Y", "%d %B %Y", "%d %b %Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// Parses a date written in one of the common formats.
///
/// Numeric dates with the year last are read month-first, unless the first
/// component can only be a day. Inputs where both readings produce a
/// different valid date are rejected instead of guessed.
pub fn parse_date_strict(input: &str) -> Result<NaiveDate, DateParseError> {
    let trimmed = input.trim();
    if let Some(result) = parse_numeric(trimmed) {
        return result;
    }
    if let Some(date) = TEXTUAL_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
    {
        return Ok(date);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(timestamp.date_naive());
    }
    if let Some(timestamp) = DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
    {
        return Ok(timestamp.date());
    }
    Err(DateParseError::Unrecognized(input.to_string()))
}

/// Returns None if the input isn't made of digits and separators, so the
/// caller can try the other formats.
fn parse_numeric(input: &str) -> Option<Result<NaiveDate, DateParseError>> {
    if input.len() == 8 && input.bytes().all(|b| b.is_ascii_digit()) {
        let (year, month, day) = (&input[0..4], &input[4..6], &input[6..8]);
        return Some(ymd(input, year.parse().ok()?, month.parse().ok()?, day.parse().ok()?));
    }

    let separator = input.chars().find(|c| matches!(c, '-' | '/' | '.'))?;
    let parts: Vec<&str> = input.split(separator).collect();
    if parts.len() != 3
        || parts
            .iter()
            .any(|part| part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()))
    {
        return None;
    }

    let unrecognized = || Some(Err(DateParseError::Unrecognized(input.to_string())));
    match (parts[0].len(), parts[1].len(), parts[2].len()) {
        (4, 1..=2, 1..=2) => Some(ymd(
            input,
            parts[0].parse().ok()?,
            parts[1].parse().ok()?,
            parts[2].parse().ok()?,
        )),
        (1..=2, 1..=2, 4) => {
            let first: u32 = parts[0].parse().ok()?;
            let second: u32 = parts[1].parse().ok()?;
            let year: i32 = parts[2].parse().ok()?;
            if first <= 12 && second <= 12 && first != second {
                return Some(Err(DateParseError::Ambiguous(input.to_string())));
            }
            if first > 12 {
                Some(ymd(input, year, second, first))
            } else {
                Some(ymd(input, year, first, second))
            }
        }
        _ => unrecognized(),
    }
}

fn ymd(input: &str, year: i32, month: u32, day: u32) -> Result<NaiveDate, DateParseError> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| DateParseError::OutOfRange(input.to_string()))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[rstest]
    #[case("2021-03-04", date(2021, 3, 4))]
    #[case("2021/03/04", date(2021, 3, 4))]
    #[case("2021.3.4", date(2021, 3, 4))]
    #[case("20210304", date(2021, 3, 4))]
    #[case("  2021-03-04\n", date(2021, 3, 4))]
    #[case("March 4, 2021", date(2021, 3, 4))]
    #[case("Mar 4, 2021", date(2021, 3, 4))]
    #[case("4 March 2021", date(2021, 3, 4))]
    #[case("04 Mar 2021", date(2021, 3, 4))]
    #[case("2021-03-04T10:11:12Z", date(2021, 3, 4))]
    #[case("2021-03-04T23:30:00-05:00", date(2021, 3, 4))]
    #[case("2021-03-04 10:11:12", date(2021, 3, 4))]
    #[case("13/04/2021", date(2021, 4, 13))]
    #[case("04/13/2021", date(2021, 4, 13))]
    #[case("4/4/2021", date(2021, 4, 4))]
    #[case("12-25-2020", date(2020, 12, 25))]
    fn parses_common_formats(#[case] input: &str, #[case] expected: NaiveDate) {
        assert_eq!(Ok(expected), parse_date_strict(input));
    }

    #[rstest]
    #[case("03/04/2021")]
    #[case("1/2/2021")]
    #[case("12.11.2021")]
    fn rejects_ambiguous_day_month_order(#[case] input: &str) {
        assert_eq!(
            Err(DateParseError::Ambiguous(input.to_string())),
            parse_date_strict(input)
        );
    }

    #[rstest]
    #[case("2021-02-29")]
    #[case("2021-13-01")]
    #[case("2021-00-10")]
    #[case("20211332")]
    #[case("31/31/2021")]
    fn rejects_invalid_calendar_dates(#[case] input: &str) {
        assert_eq!(
            Err(DateParseError::OutOfRange(input.to_string())),
            parse_date_strict(input)
        );
    }

    #[rstest]
    #[case("")]
    #[case("yesterday")]
    #[case("21-03-04")]
    #[case("2021-03")]
    #[case("2021-03-04-05")]
    #[case("2021-03-04abc")]
    fn rejects_unrecognized_input(#[case] input: &str) {
        assert_eq!(
            Err(DateParseError::Unrecognized(input.to_string())),
            parse_date_strict(input)
        );
    }
}
