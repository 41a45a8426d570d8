// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Periodic AI reports published by the journal backend: the per-year index
//! of available reports and the report bodies themselves.

use crate::error::{JournalError, Result};
use crate::period::{iso_week_to_month_week, month_abbrev};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportMode {
    Weekly,
    Monthly,
}

impl ReportMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportMode::Weekly => "weekly",
            ReportMode::Monthly => "monthly",
        }
    }
}

impl fmt::Display for ReportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportMode {
    type Err = JournalError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weekly" | "week" => Ok(ReportMode::Weekly),
            "monthly" | "month" => Ok(ReportMode::Monthly),
            other => Err(JournalError::invalid_period(format!(
                "unknown report mode '{}' (use weekly|monthly)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortOrder {
    type Err = JournalError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(JournalError::invalid_period(format!(
                "unknown sort order '{}' (use asc|desc)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportOrder {
    pub id: i64,
    /// ISO week (1-53) for weekly reports, month (1-12) for monthly ones.
    pub order: u32,
}

/// Year -> reports available in that year.
pub type YearlyReportList = BTreeMap<i32, Vec<ReportOrder>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodOption {
    pub id: i64,
    pub key: String,
    pub label: String,
}

/// Flattens the yearly index into selectable options, years ascending and
/// orders within a year sorted per `sort`.
pub fn to_period_options(
    list: &YearlyReportList,
    mode: ReportMode,
    sort: SortOrder,
) -> Result<Vec<PeriodOption>> {
    let mut options = Vec::new();
    for (&year, orders) in list {
        let mut sorted = orders.clone();
        sorted.sort_by_key(|o| o.order);
        if sort == SortOrder::Desc {
            sorted.reverse();
        }
        for o in sorted {
            let option = match mode {
                ReportMode::Weekly => {
                    let mw = iso_week_to_month_week(year, o.order)?;
                    PeriodOption {
                        id: o.id,
                        key: format!("w-{}-{}", year, o.order),
                        label: format!(
                            "{} {} week {}",
                            year,
                            month_abbrev(mw.month),
                            mw.week_of_month
                        ),
                    }
                }
                ReportMode::Monthly => {
                    if !(1..=12).contains(&o.order) {
                        return Err(JournalError::invalid_period(format!(
                            "report month {} is outside 1-12",
                            o.order
                        )));
                    }
                    PeriodOption {
                        id: o.id,
                        key: format!("m-{}-{}", year, o.order),
                        label: format!("{} {}", year, month_abbrev(o.order)),
                    }
                }
            };
            options.push(option);
        }
    }
    Ok(options)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisItem {
    pub id: i64,
    pub date: String,
    pub time: String,
    pub stock_name: String,
    pub trade_type: String,
    #[serde(default)]
    pub memo: Option<String>,
    #[serde(default)]
    pub suggestion: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub report_id: i64,
    pub period: String,
    pub summary: String,
    #[serde(default, alias = "analyses")]
    pub analysis: Vec<AnalysisItem>,
}

impl Report {
    /// Analysis items by date then time of day.
    pub fn sorted_analysis(&self) -> Vec<&AnalysisItem> {
        let mut items: Vec<&AnalysisItem> = self.analysis.iter().collect();
        items.sort_by(|a, b| {
            (a.date.as_str(), a.time.as_str()).cmp(&(b.date.as_str(), b.time.as_str()))
        });
        items
    }
}
