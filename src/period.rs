// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Reporting windows: turning a (range type, year, month/week) selection into
//! concrete day boundaries, and labelling ISO weeks in month terms.
//!
//! Weeks follow ISO 8601 throughout: they start on Monday and week 1 of a
//! year is the week containing January 4th.

use crate::error::{JournalError, Result};
use chrono::{Datelike, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeType {
    Week,
    Month,
    Year,
}

impl RangeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RangeType::Week => "week",
            RangeType::Month => "month",
            RangeType::Year => "year",
        }
    }
}

impl fmt::Display for RangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RangeType {
    type Err = JournalError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "week" => Ok(RangeType::Week),
            "month" => Ok(RangeType::Month),
            "year" => Ok(RangeType::Year),
            other => Err(JournalError::invalid_period(format!(
                "unknown range '{}' (use week|month|year)",
                other
            ))),
        }
    }
}

/// Source of "today". Only used to pick a default period.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// A user's chosen reporting window. `month` is read for monthly ranges,
/// `week` (ISO week number) for weekly ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedPeriod {
    pub year: i32,
    #[serde(default)]
    pub month: Option<u32>,
    #[serde(default)]
    pub week: Option<u32>,
}

impl SelectedPeriod {
    pub fn for_year(year: i32) -> Self {
        SelectedPeriod {
            year,
            month: None,
            week: None,
        }
    }

    pub fn for_month(year: i32, month: u32) -> Self {
        SelectedPeriod {
            year,
            month: Some(month),
            week: None,
        }
    }

    pub fn for_week(year: i32, week: u32) -> Self {
        SelectedPeriod {
            year,
            month: None,
            week: Some(week),
        }
    }

    /// The period of the given range type that contains today. Weekly
    /// periods carry the ISO week-year, so the last days of December may
    /// select week 1 of the following year.
    pub fn current(range: RangeType, clock: &dyn Clock) -> Self {
        let today = clock.today();
        let iso = today.iso_week();
        let year = match range {
            RangeType::Week => iso.year(),
            RangeType::Month | RangeType::Year => today.year(),
        };
        SelectedPeriod {
            year,
            month: Some(today.month()),
            week: Some(iso.week()),
        }
    }

    fn validate(&self) -> Result<()> {
        if let Some(month) = self.month.filter(|m| !(1..=12).contains(m)) {
            return Err(JournalError::invalid_period(format!(
                "month {} is outside 1-12",
                month
            )));
        }
        if let Some(week) = self.week {
            check_week(week)?;
        }
        Ok(())
    }
}

/// Inclusive bounds: `start` is midnight of the first day, `end` is 23:59:59
/// of the last day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DateRange {
    pub fn from_days(first: NaiveDate, last: NaiveDate) -> Self {
        DateRange {
            start: first.and_time(NaiveTime::MIN),
            end: last.and_time(end_of_day()),
        }
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start.date()
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end.date()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        let at = date.and_time(NaiveTime::MIN);
        self.start <= at && at <= self.end
    }
}

fn end_of_day() -> NaiveTime {
    NaiveTime::MIN + Duration::seconds(86_399)
}

/// Month and 1-based week-of-month label for an ISO week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthWeek {
    pub month: u32,
    pub week_of_month: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeeklyRange {
    pub week: u32,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub label: String,
}

pub fn resolve_range(range: RangeType, period: &SelectedPeriod) -> Result<DateRange> {
    period.validate()?;
    match range {
        RangeType::Week => {
            let week = period
                .week
                .ok_or_else(|| JournalError::invalid_period("week is required for a weekly range"))?;
            let monday = iso_week_monday(period.year, week)?;
            Ok(DateRange::from_days(monday, monday + Duration::days(6)))
        }
        RangeType::Month => {
            let month = period.month.ok_or_else(|| {
                JournalError::invalid_period("month is required for a monthly range")
            })?;
            let (first, last) = month_bounds(period.year, month)?;
            Ok(DateRange::from_days(first, last))
        }
        RangeType::Year => {
            let (first, last) = year_bounds(period.year)?;
            Ok(DateRange::from_days(first, last))
        }
    }
}

/// ISO week number of December 28th, which always sits in the last week.
pub fn weeks_in_year(year: i32) -> Result<u32> {
    let dec28 = NaiveDate::from_ymd_opt(year, 12, 28)
        .ok_or_else(|| JournalError::invalid_period(format!("year {} is out of range", year)))?;
    Ok(dec28.iso_week().week())
}

/// Number of Monday-aligned weeks touched by the month (4 to 6).
pub fn weeks_in_month(year: i32, month: u32) -> Result<u32> {
    let (first, last) = month_bounds(year, month)?;
    let span = monday_of(last) - monday_of(first);
    Ok(span.num_weeks() as u32 + 1)
}

/// Labels an ISO week with the month its Monday falls in and the ordinal of
/// that week within the month. A Monday outside `year` (week 1 starting in
/// late December, or a week 53 rolling into January) is pinned to January
/// or December of `year`, and the ordinal is clamped to that month's weeks.
pub fn iso_week_to_month_week(year: i32, week: u32) -> Result<MonthWeek> {
    let monday = iso_week_monday(year, week)?;
    let (jan1, dec31) = year_bounds(year)?;
    let month = monday.clamp(jan1, dec31).month();

    let (first_of_month, _) = month_bounds(year, month)?;
    let first_week_start = monday_of(first_of_month);
    let max_weeks = i64::from(weeks_in_month(year, month)?);
    let ordinal = (monday - first_week_start).num_weeks() + 1;

    Ok(MonthWeek {
        month,
        week_of_month: ordinal.clamp(1, max_weeks) as u32,
    })
}

pub fn weekly_ranges(year: i32) -> Result<Vec<WeeklyRange>> {
    let total = weeks_in_year(year)?;
    let mut out = Vec::with_capacity(total as usize);
    for week in 1..=total {
        let start = iso_week_monday(year, week)?;
        let end = start + Duration::days(6);
        out.push(WeeklyRange {
            week,
            start,
            end,
            label: format!("W{} ({}~{})", week, short_date(start), short_date(end)),
        });
    }
    Ok(out)
}

/// Human label for a period, e.g. `2025`, `2025-02` or `2025 W07 (2/10~2/16)`.
pub fn describe_period(range: RangeType, period: &SelectedPeriod) -> Result<String> {
    let resolved = resolve_range(range, period)?;
    Ok(match range {
        RangeType::Year => period.year.to_string(),
        RangeType::Month => format!("{}-{:02}", period.year, resolved.start_date().month()),
        RangeType::Week => format!(
            "{} W{:02} ({}~{})",
            period.year,
            period.week.unwrap_or_default(),
            short_date(resolved.start_date()),
            short_date(resolved.end_date())
        ),
    })
}

/// `M/D` without zero padding.
pub fn short_date(d: NaiveDate) -> String {
    format!("{}/{}", d.month(), d.day())
}

pub fn month_abbrev(month: u32) -> &'static str {
    const NAMES: [&str; 12] = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];
    month
        .checked_sub(1)
        .and_then(|i| NAMES.get(i as usize))
        .copied()
        .unwrap_or("???")
}

fn check_week(week: u32) -> Result<()> {
    if (1..=53).contains(&week) {
        Ok(())
    } else {
        Err(JournalError::invalid_period(format!(
            "week {} is outside 1-53",
            week
        )))
    }
}

/// Monday of ISO week `week` of ISO year `year`. Week 53 of a 52-week year
/// rolls over into week 1 of the next year.
fn iso_week_monday(year: i32, week: u32) -> Result<NaiveDate> {
    check_week(week)?;
    NaiveDate::from_isoywd_opt(year, 1, Weekday::Mon)
        .and_then(|first| first.checked_add_signed(Duration::weeks(i64::from(week - 1))))
        .ok_or_else(|| JournalError::invalid_period(format!("year {} is out of range", year)))
}

fn monday_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

fn month_bounds(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate)> {
    if !(1..=12).contains(&month) {
        return Err(JournalError::invalid_period(format!(
            "month {} is outside 1-12",
            month
        )));
    }
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let first = NaiveDate::from_ymd_opt(year, month, 1);
    let last = NaiveDate::from_ymd_opt(next_year, next_month, 1).and_then(|d| d.pred_opt());
    first.zip(last).ok_or_else(|| {
        JournalError::invalid_period(format!("{}-{:02} is out of range", year, month))
    })
}

fn year_bounds(year: i32) -> Result<(NaiveDate, NaiveDate)> {
    NaiveDate::from_ymd_opt(year, 1, 1)
        .zip(NaiveDate::from_ymd_opt(year, 12, 31))
        .ok_or_else(|| JournalError::invalid_period(format!("year {} is out of range", year)))
}
