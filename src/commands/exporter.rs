// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::JournalStore;
use anyhow::{Result, anyhow};

pub fn handle(store: &JournalStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("trades", sub)) => export_trades(store, sub),
        _ => Ok(()),
    }
}

fn export_trades(store: &JournalStore, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();

    if fmt != "csv" && fmt != "json" {
        return Err(anyhow!("Unknown format: {} (use csv|json)", fmt));
    }
    let by_date = store.trades_by_date()?;

    if fmt == "csv" {
        let mut wtr = csv::Writer::from_path(out)?;
        wtr.write_record([
            "date",
            "time",
            "name",
            "symbol",
            "type",
            "quantity",
            "price",
            "avg_buy_price",
            "memo",
        ])?;
        for t in by_date.values().flatten() {
            wtr.write_record([
                t.date.to_string(),
                t.time.format("%H:%M").to_string(),
                t.name.clone(),
                t.symbol.clone(),
                t.side.as_str().to_string(),
                t.quantity.to_string(),
                t.price.to_string(),
                t.avg_buy_price.map(|d| d.to_string()).unwrap_or_default(),
                t.memo.clone().unwrap_or_default(),
            ])?;
        }
        wtr.flush()?;
    } else {
        std::fs::write(out, serde_json::to_string_pretty(&by_date)?)?;
    }
    let count: usize = by_date.values().map(Vec::len).sum();
    println!("Exported {} trades to {}", count, out);
    Ok(())
}
