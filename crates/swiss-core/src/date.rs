//! Date and datetime parsing for roster entries, tournament dates and
//! round time windows.

use crate::InputError;
use chrono::{NaiveDate, NaiveDateTime};

const DATE_FORMATS: [&str; 2] = ["%Y/%m/%d", "%Y-%m-%d"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// Parses a date written as `yyyy/mm/dd` or `yyyy-mm-dd`.
pub fn parse_date(input: &str) -> Result<NaiveDate, InputError> {
    let trimmed = input.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| InputError::InvalidDate(input.to_string()))
}

/// Parses an ISO datetime. Both `T` and space separators are accepted.
pub fn parse_datetime(input: &str) -> Result<NaiveDateTime, InputError> {
    let trimmed = input.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| InputError::InvalidDateTime(input.to_string()))
}

/// Formats a datetime as ISO 8601 with second precision.
pub fn format_datetime(value: NaiveDateTime) -> String {
    value.format(DATETIME_FORMATS[0]).to_string()
}
