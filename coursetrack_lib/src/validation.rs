//! User-input parsing for the update and search actions.
//!
//! The UI layer collects raw strings from prompts; everything here turns
//! them into typed parameters or a validation error whose message is
//! safe to show as-is.

use chrono::NaiveDate;

use crate::error::Error;
use crate::stats::ReportQuery;

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y.%m.%d", "%Y/%m/%d"];

/// Parses an optional course-year filter. Empty input means "all years".
pub fn parse_year(input: &str) -> Result<Option<String>, Error> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let year: i32 = trimmed.parse().map_err(|_| {
        Error::Validation(format!("year must be a 4-digit number, got '{}'", trimmed))
    })?;
    if !(2000..=2100).contains(&year) {
        return Err(Error::Validation(format!(
            "year {} is outside the supported range 2000-2100",
            year
        )));
    }
    Ok(Some(year.to_string()))
}

/// Parses one boundary date, accepting the separators users actually
/// type.
pub fn parse_date(input: &str) -> Result<NaiveDate, Error> {
    let trimmed = input.trim();
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Ok(date);
        }
    }
    Err(Error::Validation(format!(
        "'{}' is not a date; expected YYYY-MM-DD",
        trimmed
    )))
}

/// Builds a report query from raw prompt inputs. Dates must be given
/// both-or-neither, and the range must not be inverted.
pub fn parse_report_query(keyword: &str, start: &str, end: &str) -> Result<ReportQuery, Error> {
    let keyword = {
        let trimmed = keyword.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    };

    let (start_date, end_date) = match (start.trim().is_empty(), end.trim().is_empty()) {
        (true, true) => (None, None),
        (false, false) => {
            let start_date = parse_date(start)?;
            let end_date = parse_date(end)?;
            if start_date > end_date {
                return Err(Error::Validation(format!(
                    "start date {} is after end date {}",
                    start_date, end_date
                )));
            }
            (Some(start_date), Some(end_date))
        }
        _ => {
            return Err(Error::Validation(
                "start and end dates must be given together".to_string(),
            ))
        }
    };

    Ok(ReportQuery {
        keyword,
        start_date,
        end_date,
    })
}
