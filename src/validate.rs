//! Field validators for the extracted instruction fields.
//!
//! Every validator is a pure function, total over arbitrary string input.
//! The engine runs them in a fixed order so each failure maps to exactly one
//! status code.

use std::cmp::Ordering;
use std::str::FromStr;

use chrono::NaiveDate;

/// Currencies the engine can settle.
pub const SUPPORTED_CURRENCIES: [&str; 4] = ["NGN", "USD", "GBP", "GHS"];

/// Parse an amount token into a positive integer of minor units.
///
/// Valid amounts are non-empty, all ASCII digits (no sign, no decimal point,
/// no separators) and strictly greater than zero. Digit runs too large for
/// `i64` are rejected like any other malformed token.
pub fn parse_amount(raw: &str) -> Option<i64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse::<i64>().ok().filter(|amount| *amount > 0)
}

/// An account id is non-empty and limited to ASCII alphanumerics plus
/// `-`, `.` and `@`.
pub fn is_valid_account_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'@'))
}

/// Whether the instruction currency is one the engine settles.
///
/// Case matters: the parser has already upper-cased the instruction currency,
/// account currencies are compared verbatim by the engine.
pub fn is_supported_currency(currency: &str) -> bool {
    SUPPORTED_CURRENCIES.contains(&currency)
}

/// Parse an execute-by date in strict `YYYY-MM-DD` form.
///
/// The text must be exactly ten bytes with `-` at positions 4 and 7 and
/// digits everywhere else, the month in `1..=12`, the day in `1..=31` and the
/// year at least 1000. `NaiveDate` then rejects combinations that name no
/// real calendar day, such as February 30th.
pub fn parse_execute_date(raw: &str) -> Option<NaiveDate> {
    let bytes = raw.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }
    let year: i32 = parse_digits(&raw[0..4])?;
    let month: u32 = parse_digits(&raw[5..7])?;
    let day: u32 = parse_digits(&raw[8..10])?;
    if year < 1000 || !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

fn parse_digits<T: FromStr>(segment: &str) -> Option<T> {
    if segment.bytes().all(|b| b.is_ascii_digit()) {
        segment.parse().ok()
    } else {
        None
    }
}

/// Where a date falls relative to the engine's reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRelation {
    Past,
    Today,
    Future,
}

/// Classify `date` against the reference date. Whole days only, there is no
/// time-of-day component anywhere in the system.
pub fn classify_date(date: NaiveDate, today: NaiveDate) -> DateRelation {
    match date.cmp(&today) {
        Ordering::Less => DateRelation::Past,
        Ordering::Equal => DateRelation::Today,
        Ordering::Greater => DateRelation::Future,
    }
}
