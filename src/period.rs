use crate::schema::{CustomRange, PeriodKind};
use crate::utils::{
    end_before, shift_days, shift_months, start_of_day, start_of_month, start_of_quarter,
    start_of_week, start_of_year,
};
use chrono::{NaiveDate, NaiveDateTime, TimeDelta, Weekday};
use log::warn;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// An inclusive `[start, end]` span of instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct DateRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DateRange {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        instant >= self.start && instant <= self.end
    }

    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }
}

/// The current reporting window and the window it is compared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct PeriodWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub prior_start: NaiveDateTime,
    pub prior_end: NaiveDateTime,
}

impl PeriodWindow {
    pub fn current(&self) -> DateRange {
        DateRange::new(self.start, self.end)
    }

    pub fn prior(&self) -> DateRange {
        DateRange::new(self.prior_start, self.prior_end)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CalendarUnit {
    Week,
    Month,
    Quarter,
    Year,
}

impl CalendarUnit {
    fn bucket(self, anchor: NaiveDate, week_start: Weekday) -> (NaiveDate, NaiveDate) {
        match self {
            CalendarUnit::Week => {
                let start = start_of_week(anchor, week_start);
                (start, shift_days(start, 7))
            }
            CalendarUnit::Month => {
                let start = start_of_month(anchor);
                (start, shift_months(start, 1))
            }
            CalendarUnit::Quarter => {
                let start = start_of_quarter(anchor);
                (start, shift_months(start, 3))
            }
            CalendarUnit::Year => {
                let start = start_of_year(anchor);
                (start, shift_months(start, 12))
            }
        }
    }

    fn step_back(self, anchor: NaiveDate) -> NaiveDate {
        match self {
            CalendarUnit::Week => shift_days(anchor, -7),
            CalendarUnit::Month => shift_months(anchor, -1),
            CalendarUnit::Quarter => shift_months(anchor, -3),
            CalendarUnit::Year => shift_months(anchor, -12),
        }
    }

    fn range(self, anchor: NaiveDate, week_start: Weekday) -> DateRange {
        let (start, next) = self.bucket(anchor, week_start);
        DateRange::new(start_of_day(start), end_before(next))
    }
}

/// Resolves a period selection into concrete windows with Monday as the first
/// day of the week.
pub fn resolve(
    kind: PeriodKind,
    custom_range: Option<&CustomRange>,
    now: NaiveDateTime,
) -> PeriodWindow {
    resolve_with_week_start(kind, custom_range, now, Weekday::Mon)
}

/// Resolves a period selection into the current window and its comparison
/// window.
///
/// Calendar kinds use the bucket containing `now` and the same bucket one unit
/// earlier. `Custom` uses the given range and the equally long span ending at
/// its start; an incomplete range falls back to `Month`.
pub fn resolve_with_week_start(
    kind: PeriodKind,
    custom_range: Option<&CustomRange>,
    now: NaiveDateTime,
    week_start: Weekday,
) -> PeriodWindow {
    let unit = match kind {
        PeriodKind::Week => CalendarUnit::Week,
        PeriodKind::Month => CalendarUnit::Month,
        PeriodKind::Quarter => CalendarUnit::Quarter,
        PeriodKind::Year => CalendarUnit::Year,
        PeriodKind::Custom => match custom_range.and_then(CustomRange::bounds) {
            Some((from, to)) => return custom_window(from, to),
            None => {
                warn!("Custom period requested without a complete range, using month");
                CalendarUnit::Month
            }
        },
    };

    let anchor = now.date();
    let current = unit.range(anchor, week_start);
    let prior = unit.range(unit.step_back(anchor), week_start);

    PeriodWindow {
        start: current.start,
        end: current.end,
        prior_start: prior.start,
        prior_end: prior.end,
    }
}

fn custom_window(from: NaiveDateTime, to: NaiveDateTime) -> PeriodWindow {
    let length = to - from;
    let prior_start = from.checked_sub_signed(length).unwrap_or(NaiveDateTime::MIN);

    PeriodWindow {
        start: from,
        end: to,
        prior_start,
        prior_end: from,
    }
}
