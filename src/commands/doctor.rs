// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::parse_time;
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;

pub fn handle(conn: &Connection) -> Result<()> {
    let rows = find_issues(conn)?;
    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}

/// `[issue, detail]` pairs for every stored trade that the aggregations
/// would read incorrectly or skip.
pub fn find_issues(conn: &Connection) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::new();

    // 1) Sells without cost basis count as zero-cost in summaries
    let mut stmt = conn.prepare(
        "SELECT id, date, symbol FROM trades
         WHERE side='sell' AND (avg_buy_price IS NULL OR trim(avg_buy_price)='')
         ORDER BY date, id",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let (id, date, symbol): (i64, String, String) = (r.get(0)?, r.get(1)?, r.get(2)?);
        rows.push(vec![
            "sell_missing_avg_cost".into(),
            format!("#{} {} {}", id, date, symbol),
        ]);
    }

    // 2) Buys never carry a cost basis
    let mut stmt = conn.prepare(
        "SELECT id, date, symbol FROM trades
         WHERE side='buy' AND avg_buy_price IS NOT NULL
         ORDER BY date, id",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let (id, date, symbol): (i64, String, String) = (r.get(0)?, r.get(1)?, r.get(2)?);
        rows.push(vec![
            "buy_with_avg_cost".into(),
            format!("#{} {} {}", id, date, symbol),
        ]);
    }

    // 3) Values that no longer parse
    let mut stmt = conn.prepare(
        "SELECT id, date, time, quantity, price, avg_buy_price FROM trades ORDER BY date, id",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        let date: String = r.get(1)?;
        let time: String = r.get(2)?;
        if chrono::NaiveDate::parse_from_str(&date, "%Y-%m-%d").is_err() {
            rows.push(vec!["bad_date".into(), format!("#{} '{}'", id, date)]);
        }
        if parse_time(&time).is_err() {
            rows.push(vec!["bad_time".into(), format!("#{} '{}'", id, time)]);
        }
        let numbers = [
            ("quantity", r.get::<_, Option<String>>(3)?),
            ("price", r.get::<_, Option<String>>(4)?),
            ("avg_buy_price", r.get::<_, Option<String>>(5)?),
        ];
        for (field, raw) in numbers {
            let Some(raw) = raw else { continue };
            match Decimal::from_str_exact(raw.trim()) {
                Ok(v) if v < Decimal::ZERO => rows.push(vec![
                    "negative_value".into(),
                    format!("#{} {}={}", id, field, raw),
                ]),
                Ok(_) => {}
                Err(_) => rows.push(vec![
                    "bad_number".into(),
                    format!("#{} {}='{}'", id, field, raw),
                ]),
            }
        }
    }

    Ok(rows)
}
