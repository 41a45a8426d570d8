// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::filter::group_by_date;
use crate::models::{NewTrade, Trade, TradeSource, TradeType, TradesByDate, parse_time};
use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Tradelog", "tradelog"));

pub const DB_ENV: &str = "TRADELOG_DB";
pub const API_URL_ENV: &str = "TRADELOG_API_URL";
const API_URL_KEY: &str = "api_url";

pub fn db_path() -> Result<PathBuf> {
    if let Some(p) = std::env::var_os(DB_ENV).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(p));
    }
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("tradelog.sqlite"))
}

/// The local trade journal. Owns its connection; open one per process and
/// pass it down.
pub struct JournalStore {
    conn: Connection,
}

impl JournalStore {
    pub fn open_default() -> Result<Self> {
        Self::open(&db_path()?)
    }

    pub fn open(path: &Path) -> Result<Self> {
        let conn =
            Connection::open(path).with_context(|| format!("Open DB at {}", path.display()))?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    pub fn from_connection(mut conn: Connection) -> Result<Self> {
        init_schema(&mut conn)?;
        Ok(JournalStore { conn })
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    pub fn conn_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }

    pub fn add_trade(&self, trade: NewTrade) -> Result<Trade> {
        insert_trade(&self.conn, trade)
    }

    pub fn get_trade(&self, id: i64) -> Result<Option<Trade>> {
        let mut stmt = self.conn.prepare_cached(&format!("{} WHERE id=?1", SELECT_TRADES))?;
        let raw = stmt.query_row(params![id], RawTrade::from_row).optional()?;
        raw.map(RawTrade::into_trade).transpose()
    }

    /// Replaces the stored trade with the same id. Returns false when no such
    /// trade exists.
    pub fn update_trade(&self, trade: &Trade) -> Result<bool> {
        let t = NewTrade::from(trade.clone()).normalized();
        t.validate()?;
        let n = self.conn.execute(
            "UPDATE trades SET date=?1, time=?2, name=?3, symbol=?4, side=?5, quantity=?6,
             price=?7, avg_buy_price=?8, memo=?9 WHERE id=?10",
            params![
                t.date.to_string(),
                t.time.format("%H:%M").to_string(),
                t.name,
                t.symbol,
                t.side.as_str(),
                t.quantity.to_string(),
                t.price.to_string(),
                t.avg_buy_price.map(|d| d.to_string()),
                t.memo,
                trade.id
            ],
        )?;
        debug!(id = trade.id, updated = n, "update trade");
        Ok(n > 0)
    }

    pub fn delete_trade(&self, id: i64) -> Result<bool> {
        let n = self
            .conn
            .execute("DELETE FROM trades WHERE id=?1", params![id])?;
        debug!(id, deleted = n, "delete trade");
        Ok(n > 0)
    }

    /// Every stored trade keyed by date; within a date trades are ordered by
    /// instrument name, then id.
    pub fn trades_by_date(&self) -> Result<TradesByDate> {
        let mut stmt = self
            .conn
            .prepare_cached(&format!("{} ORDER BY date, name, id", SELECT_TRADES))?;
        let rows = stmt.query_map([], RawTrade::from_row)?;
        let mut trades = Vec::new();
        for row in rows {
            trades.push(row?.into_trade()?);
        }
        Ok(group_by_date(trades))
    }

    pub fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let v = self
            .conn
            .query_row(
                "SELECT value FROM settings WHERE key=?1",
                params![key],
                |r| r.get(0),
            )
            .optional()?;
        Ok(v)
    }

    pub fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO settings(key, value) VALUES(?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value=excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    /// Backend base URL: `TRADELOG_API_URL` wins over the stored setting.
    pub fn api_url(&self) -> Result<Option<String>> {
        self.api_url_with_override(std::env::var(API_URL_ENV).ok().as_deref())
    }

    /// Backend base URL with `env_value` standing in for the environment.
    /// A blank override falls through to the stored setting.
    pub fn api_url_with_override(&self, env_value: Option<&str>) -> Result<Option<String>> {
        if let Some(v) = env_value.map(str::trim).filter(|v| !v.is_empty()) {
            return Ok(Some(v.to_string()));
        }
        self.get_setting(API_URL_KEY)
    }

    pub fn set_api_url(&self, url: &str) -> Result<()> {
        self.set_setting(API_URL_KEY, url.trim().trim_end_matches('/'))
    }
}

impl TradeSource for JournalStore {
    fn load_trades(&self) -> Result<TradesByDate> {
        self.trades_by_date()
    }
}

/// Inserts through any connection, including an open SQL transaction.
pub fn insert_trade(conn: &Connection, trade: NewTrade) -> Result<Trade> {
    let t = trade.normalized();
    t.validate()?;
    conn.execute(
        "INSERT INTO trades(date, time, name, symbol, side, quantity, price, avg_buy_price, memo)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            t.date.to_string(),
            t.time.format("%H:%M").to_string(),
            t.name,
            t.symbol,
            t.side.as_str(),
            t.quantity.to_string(),
            t.price.to_string(),
            t.avg_buy_price.map(|d| d.to_string()),
            t.memo
        ],
    )?;
    let id = conn.last_insert_rowid();
    debug!(id, symbol = %t.symbol, side = %t.side, "insert trade");
    Ok(t.with_id(id))
}

const SELECT_TRADES: &str =
    "SELECT id, date, time, name, symbol, side, quantity, price, avg_buy_price, memo FROM trades";

struct RawTrade {
    id: i64,
    date: String,
    time: String,
    name: String,
    symbol: String,
    side: String,
    quantity: String,
    price: String,
    avg_buy_price: Option<String>,
    memo: Option<String>,
}

impl RawTrade {
    fn from_row(r: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(RawTrade {
            id: r.get(0)?,
            date: r.get(1)?,
            time: r.get(2)?,
            name: r.get(3)?,
            symbol: r.get(4)?,
            side: r.get(5)?,
            quantity: r.get(6)?,
            price: r.get(7)?,
            avg_buy_price: r.get(8)?,
            memo: r.get(9)?,
        })
    }

    fn into_trade(self) -> Result<Trade> {
        let id = self.id;
        let date = crate::utils::parse_date(&self.date)
            .with_context(|| format!("Invalid stored date for trade {}", id))?;
        let time =
            parse_time(&self.time).with_context(|| format!("Invalid stored time for trade {}", id))?;
        let side: TradeType = self
            .side
            .parse()
            .map_err(|e| anyhow!("Trade {}: {}", id, e))?;
        let decimal = |field: &str, raw: &str| -> Result<Decimal> {
            Decimal::from_str_exact(raw)
                .with_context(|| format!("Invalid stored {} '{}' for trade {}", field, raw, id))
        };
        Ok(Trade {
            id,
            date,
            time,
            quantity: decimal("quantity", &self.quantity)?,
            price: decimal("price", &self.price)?,
            avg_buy_price: self
                .avg_buy_price
                .as_deref()
                .map(|raw| decimal("avg_buy_price", raw))
                .transpose()?,
            name: self.name,
            symbol: self.symbol,
            side,
            memo: self.memo,
        })
    }
}

fn init_schema(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS trades(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date TEXT NOT NULL,
        time TEXT NOT NULL,
        name TEXT NOT NULL,
        symbol TEXT NOT NULL,
        side TEXT NOT NULL CHECK(side IN ('buy','sell')),
        quantity TEXT NOT NULL,
        price TEXT NOT NULL,
        avg_buy_price TEXT, -- SELL only: average cost of the units sold
        memo TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    CREATE INDEX IF NOT EXISTS idx_trades_date ON trades(date);
    "#,
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn new_trade(date: &str, name: &str, side: TradeType) -> NewTrade {
        NewTrade {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            time: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
            name: name.into(),
            symbol: name.to_uppercase(),
            side,
            quantity: Decimal::from(3),
            price: Decimal::new(1050, 1),
            avg_buy_price: Some(Decimal::from(100)),
            memo: Some("note".into()),
        }
    }

    #[test]
    fn add_and_reload_round_trips_values() {
        let store = JournalStore::open_in_memory().unwrap();
        let added = store
            .add_trade(new_trade("2025-02-03", "acme", TradeType::Sell))
            .unwrap();
        let loaded = store.get_trade(added.id).unwrap().unwrap();
        assert_eq!(loaded, added);
        assert_eq!(loaded.price, Decimal::new(1050, 1));
        assert_eq!(loaded.avg_buy_price, Some(Decimal::from(100)));
    }

    #[test]
    fn buy_trades_lose_avg_price_on_insert() {
        let store = JournalStore::open_in_memory().unwrap();
        let added = store
            .add_trade(new_trade("2025-02-03", "acme", TradeType::Buy))
            .unwrap();
        assert_eq!(added.avg_buy_price, None);
        assert_eq!(store.get_trade(added.id).unwrap().unwrap().avg_buy_price, None);
    }

    #[test]
    fn trades_by_date_orders_by_name_within_date() {
        let store = JournalStore::open_in_memory().unwrap();
        store
            .add_trade(new_trade("2025-02-03", "zeta", TradeType::Buy))
            .unwrap();
        store
            .add_trade(new_trade("2025-02-03", "alpha", TradeType::Buy))
            .unwrap();
        store
            .add_trade(new_trade("2025-01-15", "mid", TradeType::Sell))
            .unwrap();
        let by_date = store.load_trades().unwrap();
        let keys: Vec<&str> = by_date.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["2025-01-15", "2025-02-03"]);
        let names: Vec<&str> = by_date["2025-02-03"].iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }

    #[test]
    fn update_and_delete_report_missing_ids() {
        let store = JournalStore::open_in_memory().unwrap();
        let mut t = store
            .add_trade(new_trade("2025-02-03", "acme", TradeType::Sell))
            .unwrap();
        t.price = Decimal::from(120);
        t.date = NaiveDate::from_ymd_opt(2025, 2, 4).unwrap();
        assert!(store.update_trade(&t).unwrap());
        let reloaded = store.get_trade(t.id).unwrap().unwrap();
        assert_eq!(reloaded.price, Decimal::from(120));
        assert_eq!(reloaded.date, NaiveDate::from_ymd_opt(2025, 2, 4).unwrap());

        assert!(store.delete_trade(t.id).unwrap());
        assert!(!store.delete_trade(t.id).unwrap());
        let mut ghost = t.clone();
        ghost.id = 999;
        assert!(!store.update_trade(&ghost).unwrap());
        assert!(store.trades_by_date().unwrap().is_empty());
    }

    #[test]
    fn rejects_invalid_trades() {
        let store = JournalStore::open_in_memory().unwrap();
        let mut t = new_trade("2025-02-03", "acme", TradeType::Buy);
        t.price = Decimal::from(-1);
        let err = store.add_trade(t).unwrap_err();
        assert!(err.to_string().contains("price -1 for ACME is negative"));
    }

    #[test]
    fn api_url_is_stored_without_trailing_slash() {
        let store = JournalStore::open_in_memory().unwrap();
        store.set_api_url(" https://journal.example.com/api/ ").unwrap();
        assert_eq!(
            store.get_setting("api_url").unwrap().as_deref(),
            Some("https://journal.example.com/api")
        );
    }
}
