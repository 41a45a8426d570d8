// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::JournalError;
use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradeType {
    #[serde(rename = "BUY", alias = "buy")]
    Buy,
    #[serde(rename = "SELL", alias = "sell")]
    Sell,
}

impl TradeType {
    /// Lowercase form used in the database and CSV files.
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeType::Buy => "buy",
            TradeType::Sell => "sell",
        }
    }
}

impl fmt::Display for TradeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TradeType {
    type Err = JournalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "buy" => Ok(TradeType::Buy),
            "sell" => Ok(TradeType::Sell),
            other => Err(JournalError::invalid_trade(format!(
                "unknown trade type '{}' (use buy|sell)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    pub id: i64,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    pub name: String,
    pub symbol: String,
    #[serde(rename = "type")]
    pub side: TradeType,
    pub quantity: Decimal,
    pub price: Decimal,
    #[serde(default)]
    pub avg_buy_price: Option<Decimal>,
    #[serde(default)]
    pub memo: Option<String>,
}

impl Trade {
    /// `quantity * price`; fails instead of wrapping when the product does
    /// not fit a `Decimal`.
    pub fn amount(&self) -> Result<Decimal, JournalError> {
        self.quantity.checked_mul(self.price).ok_or_else(|| {
            JournalError::overflow(format!(
                "{} x {} for {} on {}",
                self.quantity, self.price, self.symbol, self.date
            ))
        })
    }

    /// Cost basis of the units sold, when an average buy price is recorded.
    pub fn cost_basis(&self) -> Result<Option<Decimal>, JournalError> {
        self.avg_buy_price
            .map(|avg| {
                self.quantity.checked_mul(avg).ok_or_else(|| {
                    JournalError::overflow(format!(
                        "{} x {} for {} on {}",
                        self.quantity, avg, self.symbol, self.date
                    ))
                })
            })
            .transpose()
    }

    pub fn is_sell(&self) -> bool {
        self.side == TradeType::Sell
    }
}

/// A trade that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTrade {
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    pub name: String,
    pub symbol: String,
    #[serde(rename = "type")]
    pub side: TradeType,
    pub quantity: Decimal,
    pub price: Decimal,
    #[serde(default)]
    pub avg_buy_price: Option<Decimal>,
    #[serde(default)]
    pub memo: Option<String>,
}

impl NewTrade {
    pub fn validate(&self) -> Result<(), JournalError> {
        if self.name.trim().is_empty() {
            return Err(JournalError::invalid_trade("name must not be empty"));
        }
        if self.symbol.trim().is_empty() {
            return Err(JournalError::invalid_trade("symbol must not be empty"));
        }
        if self.quantity < Decimal::ZERO {
            return Err(JournalError::invalid_trade(format!(
                "quantity {} for {} is negative",
                self.quantity, self.symbol
            )));
        }
        if self.price < Decimal::ZERO {
            return Err(JournalError::invalid_trade(format!(
                "price {} for {} is negative",
                self.price, self.symbol
            )));
        }
        if let Some(avg) = self.avg_buy_price.filter(|avg| *avg < Decimal::ZERO) {
            return Err(JournalError::invalid_trade(format!(
                "average buy price {} for {} is negative",
                avg, self.symbol
            )));
        }
        Ok(())
    }

    /// Trims text fields and drops an average buy price recorded on a BUY.
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.symbol = self.symbol.trim().to_string();
        self.memo = self
            .memo
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty());
        if self.side == TradeType::Buy {
            self.avg_buy_price = None;
        }
        self
    }

    pub fn with_id(self, id: i64) -> Trade {
        Trade {
            id,
            date: self.date,
            time: self.time,
            name: self.name,
            symbol: self.symbol,
            side: self.side,
            quantity: self.quantity,
            price: self.price,
            avg_buy_price: self.avg_buy_price,
            memo: self.memo,
        }
    }
}

impl From<Trade> for NewTrade {
    fn from(t: Trade) -> Self {
        NewTrade {
            date: t.date,
            time: t.time,
            name: t.name,
            symbol: t.symbol,
            side: t.side,
            quantity: t.quantity,
            price: t.price,
            avg_buy_price: t.avg_buy_price,
            memo: t.memo,
        }
    }
}

/// Trades keyed by their `YYYY-MM-DD` date string, the shape both the
/// backend and the local store hand out.
pub type TradesByDate = BTreeMap<String, Vec<Trade>>;

/// Anything that can hand over the full trade set in one call.
pub trait TradeSource {
    fn load_trades(&self) -> anyhow::Result<TradesByDate>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockItem {
    pub id: i64,
    pub name: String,
    pub symbol: String,
}

pub(crate) mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(t: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&t.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_time(&raw).map_err(serde::de::Error::custom)
    }
}

/// Accepts `HH:MM` and `HH:MM:SS`.
pub fn parse_time(s: &str) -> Result<NaiveTime, JournalError> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .map_err(|_| JournalError::invalid_trade(format!("invalid time '{}', expected HH:MM", s)))
}
