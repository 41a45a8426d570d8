// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Trade, TradesByDate};
use crate::period::DateRange;
use chrono::NaiveDate;
use tracing::debug;

/// Trades whose date key falls inside `range`, in ascending date order.
/// Trades sharing a date keep their stored order. Keys that do not parse as
/// `YYYY-MM-DD` never match.
pub fn filter_by_range(trades_by_date: &TradesByDate, range: &DateRange) -> Vec<Trade> {
    let mut days: Vec<(NaiveDate, &Vec<Trade>)> = Vec::with_capacity(trades_by_date.len());
    for (key, trades) in trades_by_date {
        match NaiveDate::parse_from_str(key.trim(), "%Y-%m-%d") {
            Ok(date) if range.contains(date) => days.push((date, trades)),
            Ok(_) => {}
            Err(_) => debug!(key = %key, "skipping malformed date key"),
        }
    }
    days.sort_by_key(|(date, _)| *date);
    days.into_iter()
        .flat_map(|(_, trades)| trades.iter().cloned())
        .collect()
}

/// Regroups a flat trade list into the date-keyed storage shape.
pub fn group_by_date(trades: impl IntoIterator<Item = Trade>) -> TradesByDate {
    let mut out = TradesByDate::new();
    for t in trades {
        out.entry(t.date.to_string()).or_default().push(t);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TradeType;
    use crate::period::{RangeType, SelectedPeriod, resolve_range};
    use chrono::NaiveTime;
    use rust_decimal::Decimal;

    fn trade(id: i64, date: &str, name: &str) -> Trade {
        Trade {
            id,
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            name: name.into(),
            symbol: name.to_uppercase(),
            side: TradeType::Buy,
            quantity: Decimal::ONE,
            price: Decimal::TEN,
            avg_buy_price: None,
            memo: None,
        }
    }

    fn sample() -> TradesByDate {
        let mut m = TradesByDate::new();
        m.insert("2025-03-10".into(), vec![trade(3, "2025-03-10", "b")]);
        m.insert(
            "2025-03-02".into(),
            vec![trade(2, "2025-03-02", "z"), trade(1, "2025-03-02", "a")],
        );
        m.insert("2025-04-01".into(), vec![trade(4, "2025-04-01", "c")]);
        m.insert("2025-02-28".into(), vec![trade(5, "2025-02-28", "d")]);
        m.insert("not-a-date".into(), vec![trade(6, "2025-03-05", "e")]);
        m
    }

    #[test]
    fn keeps_only_dates_in_range_in_ascending_order() {
        let range = resolve_range(RangeType::Month, &SelectedPeriod::for_month(2025, 3)).unwrap();
        let ids: Vec<i64> = filter_by_range(&sample(), &range)
            .iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn unpadded_keys_sort_by_date_not_text() {
        let mut m = TradesByDate::new();
        m.insert("2025-3-9".into(), vec![trade(1, "2025-03-09", "a")]);
        m.insert("2025-03-10".into(), vec![trade(2, "2025-03-10", "b")]);
        let range = resolve_range(RangeType::Month, &SelectedPeriod::for_month(2025, 3)).unwrap();
        let ids: Vec<i64> = filter_by_range(&m, &range).iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn filtering_twice_is_idempotent() {
        let range = resolve_range(RangeType::Month, &SelectedPeriod::for_month(2025, 3)).unwrap();
        let once = filter_by_range(&sample(), &range);
        let twice = filter_by_range(&group_by_date(once.clone()), &range);
        assert_eq!(once, twice);
    }

    #[test]
    fn empty_input_gives_empty_output() {
        let range = resolve_range(RangeType::Year, &SelectedPeriod::for_year(2025)).unwrap();
        assert!(filter_by_range(&TradesByDate::new(), &range).is_empty());
    }
}
