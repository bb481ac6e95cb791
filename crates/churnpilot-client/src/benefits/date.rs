use chrono::{Datelike, NaiveDate};

use crate::{ClientError, ClientResult};

pub fn format_iso_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if !looks_like_iso_date(trimmed) {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok()
}

pub fn parse_iso_date_strict(value: &str, field_name: &str, command: &str) -> ClientResult<NaiveDate> {
    if !looks_like_iso_date(value) {
        return Err(ClientError::invalid_argument_for_command(
            &format!("`{field_name}` must use YYYY-MM-DD format with a real calendar date."),
            Some(command),
        ));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        ClientError::invalid_argument_for_command(
            &format!("`{field_name}` must use YYYY-MM-DD format with valid calendar values."),
            Some(command),
        )
    })
}

/// Shifts by whole months, clamping the day to the target month's length.
pub fn add_months_clamped(date: NaiveDate, months: i32) -> NaiveDate {
    let (year, month) = shift_month(date.year(), date.month(), months);
    let day = date.day().min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(date)
}

/// First day of the month that follows `date` shifted by `months`.
///
/// The day of month is discarded: 2024-01-15 and 2024-01-31 both map to
/// 2026-02-01 for `months = 24`.
pub fn first_of_month_after(date: NaiveDate, months: i32) -> NaiveDate {
    let (year, month) = shift_month(date.year(), date.month(), months + 1);
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(date)
}

pub fn first_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

pub fn last_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, days_in_month(year, month))
}

pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

fn shift_month(year: i32, month: u32, months: i32) -> (i32, u32) {
    let zero_based = i64::from(year) * 12 + i64::from(month) - 1 + i64::from(months);
    let shifted_year = i32::try_from(zero_based.div_euclid(12)).unwrap_or(year);
    let shifted_month = u32::try_from(zero_based.rem_euclid(12) + 1).unwrap_or(month);
    (shifted_year, shifted_month)
}

fn looks_like_iso_date(value: &str) -> bool {
    let bytes = value.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return false;
    }

    [0usize, 1, 2, 3, 5, 6, 8, 9]
        .iter()
        .all(|index| bytes[*index].is_ascii_digit())
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 31,
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{
        add_months_clamped, first_of_month_after, format_iso_date, last_of_month, parse_iso_date,
        parse_iso_date_strict,
    };

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
    }

    #[test]
    fn month_clamping_handles_leap_day() {
        let next_year = add_months_clamped(date(2024, 2, 29), 12);
        assert_eq!(format_iso_date(&next_year), "2025-02-28");
    }

    #[test]
    fn first_of_month_after_rolls_december_into_next_year() {
        assert_eq!(first_of_month_after(date(2024, 1, 15), 24), date(2026, 2, 1));
        assert_eq!(first_of_month_after(date(2024, 12, 31), 24), date(2027, 1, 1));
        assert_eq!(first_of_month_after(date(2024, 11, 30), 24), date(2026, 12, 1));
    }

    #[test]
    fn loose_parser_rejects_non_iso_shapes() {
        assert_eq!(parse_iso_date(" 2026-01-31 "), Some(date(2026, 1, 31)));
        assert_eq!(parse_iso_date("01/31/2026"), None);
        assert_eq!(parse_iso_date("2026-02-30"), None);
    }

    #[test]
    fn strict_parser_reports_calendar_errors() {
        let result = parse_iso_date_strict("2026-02-31", "today", "benefits");
        assert!(result.is_err());
        if let Err(error) = result {
            assert_eq!(error.code, "invalid_argument");
            assert!(error.message.contains("calendar"));
        }
    }

    #[test]
    fn last_of_month_respects_leap_years() {
        assert_eq!(last_of_month(2028, 2), Some(date(2028, 2, 29)));
        assert_eq!(last_of_month(2026, 2), Some(date(2026, 2, 28)));
    }
}
