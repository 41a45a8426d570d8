// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{JournalError, Result};
use crate::models::{Trade, TradeType};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSummary {
    #[serde(with = "rust_decimal::serde::float")]
    pub total_buy: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_sell: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub realized_profit: Decimal,
    /// Percentage of the sold cost basis.
    #[serde(with = "rust_decimal::serde::float")]
    pub return_rate: Decimal,
    pub transaction_count: usize,
}

/// `total + v`, failing with `Overflow` naming `what` instead of panicking.
pub(crate) fn accumulate(total: Decimal, v: Decimal, what: &str) -> Result<Decimal> {
    total
        .checked_add(v)
        .ok_or_else(|| JournalError::overflow(format!("{} exceeds the decimal range", what)))
}

fn difference(a: Decimal, b: Decimal, what: &str) -> Result<Decimal> {
    a.checked_sub(b)
        .ok_or_else(|| JournalError::overflow(format!("{} exceeds the decimal range", what)))
}

/// Totals over a trade set. Realized profit is measured against the recorded
/// average buy price of the units sold; a SELL without one adds its proceeds
/// but no cost basis.
pub fn summarize(trades: &[Trade]) -> Result<StatsSummary> {
    let mut total_buy = Decimal::ZERO;
    let mut total_sell = Decimal::ZERO;
    let mut cost_of_sold = Decimal::ZERO;

    for t in trades {
        match t.side {
            TradeType::Buy => total_buy = accumulate(total_buy, t.amount()?, "total buy")?,
            TradeType::Sell => {
                total_sell = accumulate(total_sell, t.amount()?, "total sell")?;
                if let Some(cost) = t.cost_basis()? {
                    cost_of_sold = accumulate(cost_of_sold, cost, "cost of sold units")?;
                }
            }
        }
    }

    let realized_profit = difference(total_sell, cost_of_sold, "realized profit")?;
    let return_rate = if cost_of_sold > Decimal::ZERO {
        realized_profit
            .checked_div(cost_of_sold)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .ok_or_else(|| JournalError::overflow("return rate exceeds the decimal range"))?
    } else {
        Decimal::ZERO
    };

    Ok(StatsSummary {
        total_buy,
        total_sell,
        realized_profit,
        return_rate,
        transaction_count: trades.len(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymbolSummary {
    pub name: String,
    /// Sell proceeds minus buy spend.
    #[serde(with = "rust_decimal::serde::float")]
    pub profit: Decimal,
    pub count: usize,
}

/// The `limit` most traded instruments (by trade count, first seen wins
/// ties), ordered by cash profit descending.
pub fn top_symbols(trades: &[Trade], limit: usize) -> Result<Vec<SymbolSummary>> {
    struct Acc {
        name: String,
        buy: Decimal,
        sell: Decimal,
        count: usize,
    }

    let mut accs: Vec<Acc> = Vec::new();
    let mut index_by_name: HashMap<&str, usize> = HashMap::new();
    for t in trades {
        let name = t.name.trim();
        if name.is_empty() {
            continue;
        }
        let idx = *index_by_name.entry(name).or_insert_with(|| {
            accs.push(Acc {
                name: name.to_string(),
                buy: Decimal::ZERO,
                sell: Decimal::ZERO,
                count: 0,
            });
            accs.len() - 1
        });
        let acc = &mut accs[idx];
        match t.side {
            TradeType::Buy => acc.buy = accumulate(acc.buy, t.amount()?, name)?,
            TradeType::Sell => acc.sell = accumulate(acc.sell, t.amount()?, name)?,
        }
        acc.count += 1;
    }

    accs.sort_by(|a, b| b.count.cmp(&a.count));
    accs.truncate(limit);

    let mut out = Vec::with_capacity(accs.len());
    for a in accs {
        out.push(SymbolSummary {
            profit: difference(a.sell, a.buy, &a.name)?,
            name: a.name,
            count: a.count,
        });
    }
    out.sort_by(|a, b| b.profit.cmp(&a.profit));
    Ok(out)
}
