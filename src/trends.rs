// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Chart series: sparse per-day trade counts and a dense twelve-month series
//! with running realized profit.

use crate::error::{JournalError, Result};
use crate::models::Trade;
use crate::stats::accumulate;
use crate::period::{month_abbrev, short_date};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyTrend {
    pub date: NaiveDate,
    pub count: usize,
}

impl DailyTrend {
    pub fn label(&self) -> String {
        short_date(self.date)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTrend {
    /// 1 = January.
    pub month: u32,
    pub count: usize,
    #[serde(with = "rust_decimal::serde::float")]
    pub cumulative_profit: Decimal,
}

impl MonthlyTrend {
    pub fn label(&self) -> &'static str {
        month_abbrev(self.month)
    }
}

/// One entry per calendar date that has trades, ascending.
pub fn daily_trend(trades: &[Trade]) -> Vec<DailyTrend> {
    let mut counts: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for t in trades {
        *counts.entry(t.date).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(date, count)| DailyTrend { date, count })
        .collect()
}

/// Always twelve entries, January to December. Trades are bucketed by
/// month-of-year only, so the same month of different years shares a bucket.
/// A SELL without an average buy price counts as break-even.
pub fn monthly_trend(trades: &[Trade]) -> Result<Vec<MonthlyTrend>> {
    let mut counts = [0usize; 12];
    let mut profits = [Decimal::ZERO; 12];

    for t in trades {
        let idx = t.date.month0() as usize;
        counts[idx] += 1;
        if t.is_sell() {
            let amount = t.amount()?;
            let cost = t.cost_basis()?.unwrap_or(amount);
            let profit = amount
                .checked_sub(cost)
                .ok_or_else(|| JournalError::overflow(format!("profit of {}", t.symbol)))?;
            profits[idx] = accumulate(profits[idx], profit, month_abbrev(idx as u32 + 1))?;
        }
    }

    let mut running = Decimal::ZERO;
    let mut out = Vec::with_capacity(12);
    for (i, (count, profit)) in counts.into_iter().zip(profits).enumerate() {
        running = accumulate(running, profit, "cumulative profit")?;
        out.push(MonthlyTrend {
            month: i as u32 + 1,
            count,
            cumulative_profit: running,
        });
    }
    Ok(out)
}
