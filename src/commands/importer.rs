// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::{JournalStore, insert_trade};
use crate::models::{NewTrade, TradeType, parse_time};
use crate::utils::{parse_date, parse_decimal, parse_optional_decimal};
use anyhow::{Context, Result, anyhow};
use csv::ReaderBuilder;
use std::collections::BTreeMap;
use tracing::info;

pub fn handle(store: &mut JournalStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("trades", sub)) => {
            let path = sub.get_one::<String>("path").unwrap().trim();
            let format = sub.get_one::<String>("format").unwrap();
            let trades = match format.as_str() {
                "csv" => read_csv(path)?,
                "json" => read_json(path)?,
                other => return Err(anyhow!("Unknown format: {} (use csv|json)", other)),
            };
            let count = import_trades(store, trades)?;
            println!("Imported {} trades from {}", count, path);
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Inserts all trades in one SQL transaction; the first invalid trade
/// rolls the whole batch back.
pub fn import_trades(store: &mut JournalStore, trades: Vec<NewTrade>) -> Result<usize> {
    let tx = store.conn_mut().transaction()?;
    let mut count = 0;
    for (i, trade) in trades.into_iter().enumerate() {
        let symbol = trade.symbol.clone();
        insert_trade(&tx, trade).with_context(|| format!("Trade #{} ({})", i + 1, symbol))?;
        count += 1;
    }
    tx.commit()?;
    info!(count, "import committed");
    Ok(count)
}

/// Columns: date,time,name,symbol,type,quantity,price,avg_buy_price,memo.
pub fn read_csv(path: &str) -> Result<Vec<NewTrade>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Open CSV {}", path))?;

    let mut out = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let rec = result?;
        let line = i + 2;
        let field = |idx: usize, name: &str| -> Result<String> {
            rec.get(idx)
                .map(|s| s.trim().to_string())
                .with_context(|| format!("Line {}: {} missing", line, name))
        };

        let date_raw = field(0, "date")?;
        let time_raw = field(1, "time")?;
        let symbol = field(3, "symbol")?;
        let side_raw = field(4, "type")?;
        let qty_raw = field(5, "quantity")?;
        let price_raw = field(6, "price")?;

        let date = parse_date(&date_raw)
            .with_context(|| format!("Line {}: invalid date '{}'", line, date_raw))?;
        let time = parse_time(&time_raw)
            .with_context(|| format!("Line {}: invalid time '{}'", line, time_raw))?;
        let side: TradeType = side_raw
            .parse()
            .with_context(|| format!("Line {}: invalid type '{}'", line, side_raw))?;
        let quantity = parse_decimal(&qty_raw)
            .with_context(|| format!("Line {}: invalid quantity '{}' for {}", line, qty_raw, symbol))?;
        let price = parse_decimal(&price_raw)
            .with_context(|| format!("Line {}: invalid price '{}' for {}", line, price_raw, symbol))?;
        let avg_buy_price = parse_optional_decimal(rec.get(7))
            .with_context(|| format!("Line {}: invalid avg_buy_price for {}", line, symbol))?;
        let memo = rec
            .get(8)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string());

        out.push(NewTrade {
            date,
            time,
            name: field(2, "name")?,
            symbol,
            side,
            quantity,
            price,
            avg_buy_price,
            memo,
        });
    }
    Ok(out)
}

/// Reads the date-keyed shape produced by `export trades --format json`.
/// Each trade's own `date` is authoritative; ids are ignored.
pub fn read_json(path: &str) -> Result<Vec<NewTrade>> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("Open JSON {}", path))?;
    let by_date: BTreeMap<String, Vec<NewTrade>> =
        serde_json::from_str(&raw).with_context(|| format!("Parse trades JSON {}", path))?;
    Ok(by_date.into_values().flatten().collect())
}
