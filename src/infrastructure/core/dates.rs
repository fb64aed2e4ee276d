use crate::domain::errors::FetchError;
use chrono::{DateTime, NaiveDate, Utc};

/// Parses a `YYYY-MM-DD` date as typed at the prompt.
pub fn parse_iso_date(input: &str) -> Result<NaiveDate, FetchError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|_| FetchError::InvalidDate {
        input: input.to_string(),
    })
}

/// UTC midnights of `start` and `end`, the half-open range `[start, end)`.
pub fn day_bounds(start: &str, end: &str) -> Result<(DateTime<Utc>, DateTime<Utc>), FetchError> {
    let start = parse_iso_date(start)?;
    let end = parse_iso_date(end)?;
    Ok((
        start.and_time(chrono::NaiveTime::MIN).and_utc(),
        end.and_time(chrono::NaiveTime::MIN).and_utc(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(
            parse_iso_date(" 2024-02-29 ").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert!(matches!(
            parse_iso_date("2024/02/29"),
            Err(FetchError::InvalidDate { .. })
        ));
        assert!(parse_iso_date("2023-02-29").is_err());
    }

    #[test]
    fn test_day_bounds_are_midnights() {
        let (start, end) = day_bounds("2024-01-02", "2024-01-05").unwrap();
        assert_eq!(start.timestamp(), 1_704_153_600);
        assert_eq!((end - start).num_days(), 3);
    }
}
