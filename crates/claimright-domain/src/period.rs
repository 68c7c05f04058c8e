//! Calendar period splitting for amortization schedules.

use std::{fmt, str::FromStr};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::common::PeriodError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
/// Controls the granularity of the periods in an amortization schedule.
pub enum Frequency {
    #[default]
    Monthly,
    Quarterly,
    Yearly,
}

impl Frequency {
    /// Number of calendar months spanned by one full period.
    pub fn months(self) -> u32 {
        match self {
            Frequency::Monthly => 1,
            Frequency::Quarterly => 3,
            Frequency::Yearly => 12,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Frequency::Monthly => "monthly",
            Frequency::Quarterly => "quarterly",
            Frequency::Yearly => "yearly",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = PeriodError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "monthly" | "month" => Ok(Frequency::Monthly),
            "quarterly" | "quarter" => Ok(Frequency::Quarterly),
            "yearly" | "year" | "annual" | "annually" => Ok(Frequency::Yearly),
            _ => Err(PeriodError::InvalidFrequency(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
/// Inclusive calendar range `[start, end]`.
pub struct PeriodRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl PeriodRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Number of days covered, counting both bounds.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// Splits the inclusive range `[start, end]` into contiguous periods of the given
/// frequency.
///
/// Period boundaries are computed from `start` (not chained from the previous
/// boundary) so month-end anchors survive short months. The final period is cut
/// at `end` and absorbs whatever does not fill a whole period.
pub fn split_periods(
    start: NaiveDate,
    end: NaiveDate,
    frequency: Frequency,
) -> Result<Vec<PeriodRange>, PeriodError> {
    if start >= end {
        return Err(PeriodError::InvalidRange { start, end });
    }
    let step = frequency.months() as i32;
    let mut periods = Vec::new();
    let mut cursor = start;
    let mut index = 1;
    loop {
        // A boundary past the last representable date lies beyond `end` too.
        let next = shift_month(start, step * index)
            .and_then(|next_start| next_start.pred_opt().map(|period_end| (next_start, period_end)))
            .filter(|(_, period_end)| *period_end < end);
        let Some((next_start, period_end)) = next else {
            periods.push(PeriodRange { start: cursor, end });
            break;
        };
        periods.push(PeriodRange {
            start: cursor,
            end: period_end,
        });
        cursor = next_start;
        index += 1;
    }
    Ok(periods)
}

/// Parses a frequency label and splits the range in one step.
pub fn split_periods_str(
    start: NaiveDate,
    end: NaiveDate,
    frequency: &str,
) -> Result<Vec<PeriodRange>, PeriodError> {
    let frequency = frequency.parse::<Frequency>()?;
    split_periods(start, end, frequency)
}

/// Returns the inclusive end date one full year after `start`, or `None` when
/// that falls outside the calendar chrono can represent.
pub fn one_year_from(start: NaiveDate) -> Option<NaiveDate> {
    shift_month(start, 12)?.pred_opt()
}

/// Moves `date` by `months`, clamping the day to the target month's length.
/// Returns `None` when the target month is out of range.
pub fn shift_month(date: NaiveDate, months: i32) -> Option<NaiveDate> {
    let index = date
        .year()
        .checked_mul(12)?
        .checked_add(date.month0() as i32)?
        .checked_add(months)?;
    let year = index.div_euclid(12);
    let month = index.rem_euclid(12) as u32 + 1;
    let day = date.day().min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day)
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    if month == 12 {
        return 31;
    }
    NaiveDate::from_ymd_opt(year, month + 1, 1)
        .and_then(|first_next| first_next.pred_opt())
        .map(|last| last.day())
        .unwrap_or(28)
}
