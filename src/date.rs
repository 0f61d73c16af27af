use chrono::{Duration, Local, NaiveDate, NaiveDateTime, NaiveTime};
use std::num::ParseIntError;
use thiserror::Error;

pub static USER_FORMAT: &str = "%d.%m.%Y";
static ISO_FORMAT: &str = "%Y-%m-%d";
static TIME_FORMAT: &str = "%H:%M";
static TIME_WITH_SECONDS_FORMAT: &str = "%H:%M:%S";
pub static TODAY: &str = "today";

#[derive(Debug, PartialEq, Error)]
pub enum ParseError {
    #[error("{0}")]
    ChronoError(#[from] chrono::format::ParseError),
    #[error("{0}")]
    InvalidDays(String),
    #[error("{0}")]
    ParseIntError(#[from] ParseIntError),
}

pub fn parse_date_from_str(date: &str) -> Result<NaiveDate, ParseError> {
    if date == TODAY {
        return Ok(Local::now().date_naive());
    }
    Ok(NaiveDate::parse_from_str(date, USER_FORMAT)?)
}

pub fn parse_days_from_str(days: &str) -> Result<u32, ParseError> {
    let days = days.parse::<u32>()?;
    if days == 0 {
        return Err(ParseError::InvalidDays(
            "Number of days must be greater than 0!".to_string(),
        ));
    }
    Ok(days)
}

/// Every calendar date from `start`, `days` long, in order.
pub fn get_query_dates(start: NaiveDate, days: u32) -> Vec<NaiveDate> {
    (0..days)
        .map(|offset| start + Duration::days(offset as i64))
        .collect()
}

/// Joins a listing date (`DD.MM.YYYY`, or ISO as a fallback) with an
/// `HH:MM[:SS]` clock time.
pub fn combine_date_time(date: &str, time: &str) -> Option<NaiveDateTime> {
    let date = date.trim();
    let day = NaiveDate::parse_from_str(date, USER_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(date, ISO_FORMAT))
        .ok()?;
    let time = time.trim();
    let time = NaiveTime::parse_from_str(time, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(time, TIME_WITH_SECONDS_FORMAT))
        .ok()?;
    Some(NaiveDateTime::new(day, time))
}

/// Parses `HH:MM`, `HH:MM:SS` (seconds ignored) or a bare number of minutes.
pub fn parse_travel_time(raw: &str) -> Option<Duration> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let minutes = if raw.contains(':') {
        let parts: Vec<&str> = raw.split(':').collect();
        if parts.len() != 2 && parts.len() != 3 {
            return None;
        }
        let hours = parts[0].trim().parse::<i64>().ok()?;
        let minutes = parts[1].trim().parse::<i64>().ok()?;
        hours.checked_mul(60)?.checked_add(minutes)?
    } else {
        raw.parse::<i64>().ok()?
    };
    travel_minutes(minutes)
}

/// `None` for negative or out of range minute counts.
pub fn travel_minutes(minutes: i64) -> Option<Duration> {
    if minutes < 0 {
        return None;
    }
    Duration::try_minutes(minutes)
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(USER_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use crate::date::{
        combine_date_time, format_date, get_query_dates, parse_date_from_str,
        parse_days_from_str, parse_travel_time, ParseError, TODAY,
    };
    use chrono::{Duration, Local, NaiveDate};

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_parse_date_from_str_today() {
        assert_eq!(
            parse_date_from_str(TODAY).unwrap(),
            Local::now().date_naive()
        );
    }

    #[test]
    fn test_parse_date_from_str() {
        assert_eq!(parse_date_from_str("05.10.2026").unwrap(), ymd(2026, 10, 5));
    }

    #[test]
    fn test_parse_date_from_str_rejects_iso() -> Result<(), String> {
        match parse_date_from_str("2026-10-05") {
            Err(ParseError::ChronoError(_)) => Ok(()),
            _ => Err("Should fail with ParseError::ChronoError".to_string()),
        }
    }

    #[test]
    fn test_parse_days_from_str() {
        assert_eq!(parse_days_from_str("7").unwrap(), 7);
    }

    #[test]
    fn test_parse_days_from_str_zero() {
        assert_eq!(
            parse_days_from_str("0").unwrap_err(),
            ParseError::InvalidDays("Number of days must be greater than 0!".to_string()),
        )
    }

    #[test]
    fn test_parse_days_from_str_invalid_number() -> Result<(), String> {
        match parse_days_from_str("foo") {
            Err(ParseError::ParseIntError(_)) => Ok(()),
            _ => Err("Should raise ParseIntError".to_string()),
        }
    }

    #[test]
    fn test_get_query_dates() {
        assert_eq!(
            get_query_dates(ymd(2026, 12, 30), 3),
            vec![ymd(2026, 12, 30), ymd(2026, 12, 31), ymd(2027, 1, 1)]
        );
        assert!(get_query_dates(ymd(2026, 12, 30), 0).is_empty());
    }

    #[test]
    fn test_combine_date_time() {
        let expected = ymd(2026, 10, 5).and_hms_opt(5, 30, 0).unwrap();
        assert_eq!(combine_date_time("05.10.2026", "05:30"), Some(expected));
        assert_eq!(combine_date_time("2026-10-05", "05:30"), Some(expected));
        assert_eq!(combine_date_time("05.10.2026", "05:30:00"), Some(expected));
    }

    #[test]
    fn test_combine_date_time_invalid() {
        assert_eq!(combine_date_time("10/05/2026", "05:30"), None);
        assert_eq!(combine_date_time("05.10.2026", "noon"), None);
        assert_eq!(combine_date_time("05.10.2026", "25:00"), None);
    }

    #[test]
    fn test_parse_travel_time() {
        let cases = vec![
            ("03:55", Some(Duration::minutes(235))),
            ("04:30:00", Some(Duration::minutes(270))),
            ("225", Some(Duration::minutes(225))),
            (" 4:05 ", Some(Duration::minutes(245))),
            ("", None),
            ("1:2:3:4", None),
            ("four hours", None),
            ("-10", None),
            ("999999999999999999:00", None),
            ("9223372036854775807", None),
        ];

        for (raw, expected) in cases.iter() {
            assert_eq!(&parse_travel_time(raw), expected, "parsing {:?}", raw)
        }
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(ymd(2026, 1, 9)), "09.01.2026");
    }
}
