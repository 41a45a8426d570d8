// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::JournalStore;
use crate::filter::filter_by_range;
use crate::models::{Trade, TradeSource};
use crate::period::{
    Clock, RangeType, SelectedPeriod, SystemClock, describe_period, resolve_range,
};
use crate::stats::{summarize, top_symbols};
use crate::trends::{daily_trend, monthly_trend};
use crate::utils::{fmt_amount, maybe_print_json, pretty_table};
use anyhow::Result;
use tracing::debug;

pub fn handle(store: &JournalStore, m: &clap::ArgMatches) -> Result<()> {
    handle_with_clock(store, m, &SystemClock)
}

pub fn handle_with_clock(
    store: &JournalStore,
    m: &clap::ArgMatches,
    clock: &dyn Clock,
) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => summary(store, sub, clock)?,
        Some(("daily", sub)) => daily(store, sub, clock)?,
        Some(("monthly", sub)) => monthly(store, sub, clock)?,
        Some(("symbols", sub)) => symbols(store, sub, clock)?,
        _ => {}
    }
    Ok(())
}

/// Range and period from the command flags; anything not given comes from
/// the period containing today.
pub fn selected_period(
    sub: &clap::ArgMatches,
    clock: &dyn Clock,
) -> Result<(RangeType, SelectedPeriod)> {
    let range: RangeType = sub
        .get_one::<String>("range")
        .map(|s| s.as_str())
        .unwrap_or("month")
        .parse()?;
    let current = SelectedPeriod::current(range, clock);
    let period = SelectedPeriod {
        year: sub.get_one::<i32>("year").copied().unwrap_or(current.year),
        month: sub.get_one::<u32>("month").copied().or(current.month),
        week: sub.get_one::<u32>("week").copied().or(current.week),
    };
    Ok((range, period))
}

/// Loads the full trade set from `source` and keeps the selected period.
pub fn period_trades(
    source: &dyn TradeSource,
    range: RangeType,
    period: &SelectedPeriod,
) -> Result<Vec<Trade>> {
    let bounds = resolve_range(range, period)?;
    let all = source.load_trades()?;
    let trades = filter_by_range(&all, &bounds);
    debug!(
        range = %range,
        start = %bounds.start,
        end = %bounds.end,
        kept = trades.len(),
        "filtered trades"
    );
    Ok(trades)
}

/// Trades of the period selected by the flags, plus the period's label.
pub fn selected_trades(
    store: &JournalStore,
    sub: &clap::ArgMatches,
    clock: &dyn Clock,
) -> Result<(String, Vec<Trade>)> {
    let (range, period) = selected_period(sub, clock)?;
    let label = describe_period(range, &period)?;
    let trades = if sub.get_flag("remote") {
        let client = super::api_client(store)?;
        period_trades(&client, range, &period)?
    } else {
        period_trades(store, range, &period)?
    };
    Ok((label, trades))
}

fn summary(store: &JournalStore, sub: &clap::ArgMatches, clock: &dyn Clock) -> Result<()> {
    let (label, trades) = selected_trades(store, sub, clock)?;
    let s = summarize(&trades)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &s)? {
        let rows = vec![
            vec!["Period".into(), label],
            vec!["Trades".into(), s.transaction_count.to_string()],
            vec!["Total buy".into(), fmt_amount(&s.total_buy)],
            vec!["Total sell".into(), fmt_amount(&s.total_sell)],
            vec!["Realized profit".into(), fmt_amount(&s.realized_profit)],
            vec!["Return".into(), format!("{}%", fmt_amount(&s.return_rate))],
        ];
        println!("{}", pretty_table(&["Metric", "Value"], rows));
    }
    Ok(())
}

fn daily(store: &JournalStore, sub: &clap::ArgMatches, clock: &dyn Clock) -> Result<()> {
    let (_, trades) = selected_trades(store, sub, clock)?;
    let trend = daily_trend(&trades);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &trend)? {
        let rows = trend
            .iter()
            .map(|d| vec![d.label(), d.date.to_string(), d.count.to_string()])
            .collect();
        println!("{}", pretty_table(&["Day", "Date", "Trades"], rows));
    }
    Ok(())
}

fn monthly(store: &JournalStore, sub: &clap::ArgMatches, clock: &dyn Clock) -> Result<()> {
    let (_, trades) = selected_trades(store, sub, clock)?;
    let trend = monthly_trend(&trades)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &trend)? {
        let rows = trend
            .iter()
            .map(|m| {
                vec![
                    m.label().to_string(),
                    m.count.to_string(),
                    fmt_amount(&m.cumulative_profit),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Month", "Trades", "Cumulative Profit"], rows)
        );
    }
    Ok(())
}

fn symbols(store: &JournalStore, sub: &clap::ArgMatches, clock: &dyn Clock) -> Result<()> {
    let (_, trades) = selected_trades(store, sub, clock)?;
    let top = *sub.get_one::<usize>("top").unwrap_or(&3);
    let summary = top_symbols(&trades, top)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &summary)? {
        let rows = summary
            .iter()
            .map(|s| vec![s.name.clone(), s.count.to_string(), fmt_amount(&s.profit)])
            .collect();
        println!("{}", pretty_table(&["Name", "Trades", "Profit"], rows));
    }
    Ok(())
}
