//! Normalization of caller-supplied calendar dates.
//!
//! Two textual formats are accepted: day-first (`DD-MM-YYYY`) and ISO
//! (`YYYY-MM-DD`). Day-first is tried first, so an input valid under both
//! readings resolves day-first. The precedence is part of the public
//! contract and must not change.

use chrono::NaiveDate;

use crate::LedgerError;

const DAY_FIRST_FORMAT: &str = "%d-%m-%Y";
const ISO_FORMAT: &str = "%Y-%m-%d";

/// Parses a date string into a canonical calendar date.
///
/// Returns [`LedgerError::InvalidDate`] carrying the offending input when
/// neither format matches.
pub fn parse_date(input: &str) -> Result<NaiveDate, LedgerError> {
    NaiveDate::parse_from_str(input, DAY_FIRST_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(input, ISO_FORMAT))
        .map_err(|_| LedgerError::InvalidDate(input.to_string()))
}

/// Parses both ends of an inclusive date range.
///
/// Fails on the first end that does not parse; no partial result is
/// produced.
pub fn parse_range(start: &str, end: &str) -> Result<(NaiveDate, NaiveDate), LedgerError> {
    Ok((parse_date(start)?, parse_date(end)?))
}
