// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::JournalStore;
use crate::models::{NewTrade, TradeType, parse_time};
use crate::utils::{
    maybe_print_json, parse_date, parse_decimal, parse_month, parse_optional_decimal,
    pretty_table,
};
use anyhow::{Context, Result, anyhow};
use rusqlite::ToSql;
use serde::Serialize;
use tracing::warn;

pub fn handle(store: &JournalStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, sub)?,
        Some(("list", sub)) => list(store, sub)?,
        Some(("edit", sub)) => edit(store, sub)?,
        Some(("rm", sub)) => remove(store, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(store: &JournalStore, sub: &clap::ArgMatches) -> Result<()> {
    let side: TradeType = sub.get_one::<String>("type").unwrap().parse()?;
    let trade = NewTrade {
        date: parse_date(sub.get_one::<String>("date").unwrap())?,
        time: parse_time(sub.get_one::<String>("time").unwrap())?,
        name: sub.get_one::<String>("name").unwrap().to_string(),
        symbol: sub.get_one::<String>("symbol").unwrap().to_string(),
        side,
        quantity: parse_decimal(sub.get_one::<String>("quantity").unwrap())?,
        price: parse_decimal(sub.get_one::<String>("price").unwrap())?,
        avg_buy_price: parse_optional_decimal(
            sub.get_one::<String>("avg_buy_price").map(|s| s.as_str()),
        )?,
        memo: sub.get_one::<String>("memo").cloned(),
    };
    if side == TradeType::Sell && trade.avg_buy_price.is_none() {
        warn!(
            symbol = %trade.symbol,
            date = %trade.date,
            "sell recorded without an average buy price; its profit cannot be measured"
        );
    }
    let saved = store.add_trade(trade)?;
    println!(
        "Recorded #{} {} {} x {} @ {} on {}",
        saved.id, saved.side, saved.quantity, saved.symbol, saved.price, saved.date
    );
    Ok(())
}

fn edit(store: &JournalStore, sub: &clap::ArgMatches) -> Result<()> {
    let id = parse_id(sub.get_one::<String>("id").unwrap())?;
    let mut trade = store
        .get_trade(id)?
        .ok_or_else(|| anyhow!("Trade {} not found", id))?;

    if let Some(v) = sub.get_one::<String>("date") {
        trade.date = parse_date(v)?;
    }
    if let Some(v) = sub.get_one::<String>("time") {
        trade.time = parse_time(v)?;
    }
    if let Some(v) = sub.get_one::<String>("name") {
        trade.name = v.to_string();
    }
    if let Some(v) = sub.get_one::<String>("symbol") {
        trade.symbol = v.to_string();
    }
    if let Some(v) = sub.get_one::<String>("type") {
        trade.side = v.parse()?;
    }
    if let Some(v) = sub.get_one::<String>("quantity") {
        trade.quantity = parse_decimal(v)?;
    }
    if let Some(v) = sub.get_one::<String>("price") {
        trade.price = parse_decimal(v)?;
    }
    if let Some(v) = sub.get_one::<String>("avg_buy_price") {
        trade.avg_buy_price = parse_optional_decimal(Some(v))?;
    }
    if sub.get_flag("clear_avg") {
        trade.avg_buy_price = None;
    }
    if let Some(v) = sub.get_one::<String>("memo") {
        trade.memo = Some(v.to_string());
    }

    store.update_trade(&trade)?;
    println!("Updated trade #{}", id);
    Ok(())
}

fn remove(store: &JournalStore, sub: &clap::ArgMatches) -> Result<()> {
    let id = parse_id(sub.get_one::<String>("id").unwrap())?;
    if store.delete_trade(id)? {
        println!("Removed trade #{}", id);
        Ok(())
    } else {
        Err(anyhow!("Trade {} not found", id))
    }
}

fn parse_id(raw: &str) -> Result<i64> {
    raw.trim()
        .parse::<i64>()
        .with_context(|| format!("Invalid trade id '{}'", raw))
}

fn list(store: &JournalStore, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(store, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.date.clone(),
                    r.time.clone(),
                    r.symbol.clone(),
                    r.name.clone(),
                    r.side.clone(),
                    r.quantity.clone(),
                    r.price.clone(),
                    r.avg_buy_price.clone(),
                    r.memo.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &[
                    "ID", "Date", "Time", "Symbol", "Name", "Side", "Qty", "Price", "Avg Cost",
                    "Memo"
                ],
                rows,
            )
        );
    }
    Ok(())
}

#[derive(Serialize)]
pub struct TradeRow {
    pub id: i64,
    pub date: String,
    pub time: String,
    pub symbol: String,
    pub name: String,
    pub side: String,
    pub quantity: String,
    pub price: String,
    pub avg_buy_price: String,
    pub memo: String,
}

pub fn query_rows(store: &JournalStore, sub: &clap::ArgMatches) -> Result<Vec<TradeRow>> {
    let mut sql = String::from(
        "SELECT id, date, time, symbol, name, side, quantity, price, avg_buy_price, memo FROM trades WHERE 1=1",
    );
    let mut params_vec: Vec<Box<dyn ToSql>> = Vec::new();

    if let Some(date) = sub.get_one::<String>("date") {
        sql.push_str(" AND date=?");
        params_vec.push(Box::new(parse_date(date)?.to_string()));
    }
    if let Some(month) = sub.get_one::<String>("month") {
        sql.push_str(" AND substr(date,1,7)=?");
        params_vec.push(Box::new(parse_month(month)?));
    }
    if let Some(symbol) = sub.get_one::<String>("symbol") {
        sql.push_str(" AND symbol=? COLLATE NOCASE");
        params_vec.push(Box::new(symbol.trim().to_string()));
    }
    sql.push_str(" ORDER BY date DESC, time DESC, id DESC");
    if let Some(limit) = sub.get_one::<usize>("limit") {
        sql.push_str(" LIMIT ?");
        params_vec.push(Box::new(*limit as i64));
    }

    let mut stmt = store.conn().prepare(&sql)?;
    let mut rows = stmt.query(rusqlite::params_from_iter(params_vec.iter()))?;

    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        let avg: Option<String> = r.get(8)?;
        let memo: Option<String> = r.get(9)?;
        data.push(TradeRow {
            id: r.get(0)?,
            date: r.get(1)?,
            time: r.get(2)?,
            symbol: r.get(3)?,
            name: r.get(4)?,
            side: r.get(5)?,
            quantity: r.get(6)?,
            price: r.get(7)?,
            avg_buy_price: avg.unwrap_or_default(),
            memo: memo.unwrap_or_default(),
        });
    }
    Ok(data)
}
