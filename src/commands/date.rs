use chrono::NaiveDate;

use crate::utils::PipelineError;

/// Earliest selectable reference date
pub fn earliest_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Parse a `YYYY-MM-DD` reference date bounded to [2000-01-01, today]
pub fn parse_reference_date(input: &str, today: NaiveDate) -> Result<NaiveDate, PipelineError> {
    let input = input.trim();
    let date = if input.eq_ignore_ascii_case("today") {
        today
    } else {
        NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|_| PipelineError::InvalidDate(input.to_string()))?
    };

    let earliest = earliest_date();
    if date < earliest || date > today {
        return Err(PipelineError::DateOutOfRange(date, earliest, today));
    }

    Ok(date)
}
