use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Weekday};

pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Last representable instant before `next_start`.
pub fn end_before(next_start: NaiveDate) -> NaiveDateTime {
    start_of_day(next_start) - TimeDelta::nanoseconds(1)
}

pub fn start_of_week(date: NaiveDate, week_start: Weekday) -> NaiveDate {
    let offset = (7 + date.weekday().num_days_from_monday()
        - week_start.num_days_from_monday())
        % 7;
    date.checked_sub_days(Days::new(offset as u64))
        .unwrap_or(date)
}

pub fn start_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Returns the 1-based quarter (1..=4) a calendar month belongs to.
pub fn quarter_of_month(month: u32) -> u32 {
    (month - 1) / 3 + 1
}

pub fn start_of_quarter(date: NaiveDate) -> NaiveDate {
    let first_month = (quarter_of_month(date.month()) - 1) * 3 + 1;
    NaiveDate::from_ymd_opt(date.year(), first_month, 1).unwrap_or(date)
}

pub fn start_of_year(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date)
}

/// Shifts a date by a signed number of months, clamping the day to the end
/// of the target month (Mar 31 - 1 month = Feb 28/29).
pub fn shift_months(date: NaiveDate, months: i32) -> NaiveDate {
    let shifted = if months >= 0 {
        date.checked_add_months(Months::new(months as u32))
    } else {
        date.checked_sub_months(Months::new(months.unsigned_abs()))
    };
    shifted.unwrap_or(date)
}

pub fn shift_days(date: NaiveDate, days: i64) -> NaiveDate {
    let shifted = if days >= 0 {
        date.checked_add_days(Days::new(days as u64))
    } else {
        date.checked_sub_days(Days::new(days.unsigned_abs()))
    };
    shifted.unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_start_of_week_monday_first() {
        // 2024-05-15 is a Wednesday
        assert_eq!(start_of_week(date(2024, 5, 15), Weekday::Mon), date(2024, 5, 13));
        assert_eq!(start_of_week(date(2024, 5, 13), Weekday::Mon), date(2024, 5, 13));
        assert_eq!(start_of_week(date(2024, 5, 19), Weekday::Mon), date(2024, 5, 13));
    }

    #[test]
    fn test_start_of_week_sunday_first() {
        assert_eq!(start_of_week(date(2024, 5, 15), Weekday::Sun), date(2024, 5, 12));
        assert_eq!(start_of_week(date(2024, 5, 12), Weekday::Sun), date(2024, 5, 12));
        assert_eq!(start_of_week(date(2024, 5, 18), Weekday::Sun), date(2024, 5, 12));
    }

    #[test]
    fn test_start_of_quarter() {
        assert_eq!(start_of_quarter(date(2024, 1, 31)), date(2024, 1, 1));
        assert_eq!(start_of_quarter(date(2024, 6, 30)), date(2024, 4, 1));
        assert_eq!(start_of_quarter(date(2024, 9, 1)), date(2024, 7, 1));
        assert_eq!(start_of_quarter(date(2024, 12, 25)), date(2024, 10, 1));
    }

    #[test]
    fn test_shift_months_clamps_day() {
        assert_eq!(shift_months(date(2024, 3, 31), -1), date(2024, 2, 29));
        assert_eq!(shift_months(date(2023, 3, 31), -1), date(2023, 2, 28));
        assert_eq!(shift_months(date(2024, 1, 15), -1), date(2023, 12, 15));
        assert_eq!(shift_months(date(2024, 11, 1), 3), date(2025, 2, 1));
    }

    #[test]
    fn test_end_before_is_last_nanosecond() {
        let end = end_before(date(2024, 6, 1));
        assert_eq!(
            end,
            date(2024, 5, 31).and_hms_nano_opt(23, 59, 59, 999_999_999).unwrap()
        );
    }
}
