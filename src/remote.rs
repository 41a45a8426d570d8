// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Blocking client for the journal backend. Every endpoint answers with the
//! same envelope, `{ success, message, data }`, decoded in one place.

use crate::error::{JournalError, Result};
use crate::models::{StockItem, TradeSource, TradesByDate};
use crate::report_list::{Report, ReportMode, YearlyReportList};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

const MAX_SEARCH_RESULTS: usize = 50;

#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn into_data(self, endpoint: &str) -> Result<T> {
        if self.success == Some(false) {
            return Err(JournalError::Api {
                endpoint: endpoint.to_string(),
                message: self.message.unwrap_or_else(|| "request unsuccessful".into()),
            });
        }
        self.data.ok_or_else(|| JournalError::Api {
            endpoint: endpoint.to_string(),
            message: self.message.unwrap_or_else(|| "response carried no data".into()),
        })
    }
}

/// Decodes a response body into `T` through the shared envelope.
pub fn decode_body<T: DeserializeOwned>(endpoint: &str, body: &str) -> Result<T> {
    let envelope: ApiResponse<T> =
        serde_json::from_str(body).map_err(|source| JournalError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })?;
    envelope.into_data(endpoint)
}

#[derive(Debug)]
pub struct ApiClient {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        Ok(ApiClient {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            client: crate::utils::http_client()?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        info!(%url, "GET");
        let body = self.client.get(&url).send()?.error_for_status()?.text()?;
        debug!(bytes = body.len(), "response received");
        decode_body(path, &body)
    }

    pub fn fetch_trades(&self) -> Result<TradesByDate> {
        let trades: TradesByDate = self.get("/trades")?;
        for (key, list) in &trades {
            let mismatched = list.iter().filter(|t| t.date.to_string() != *key).count();
            if mismatched > 0 {
                warn!(key = %key, mismatched, "trades filed under a different date key");
            }
        }
        Ok(trades)
    }

    pub fn fetch_stock_items(&self) -> Result<Vec<StockItem>> {
        self.get("/stock-items")
    }

    pub fn fetch_report_list(&self, mode: ReportMode) -> Result<YearlyReportList> {
        self.get(&format!("/reports/{}/list", mode))
    }

    pub fn fetch_latest_report(&self, mode: ReportMode) -> Result<Report> {
        self.get(&format!("/reports/{}", mode))
    }

    pub fn fetch_report(&self, mode: ReportMode, id: i64) -> Result<Report> {
        self.get(&format!("/reports/{}/{}", mode, id))
    }
}

impl TradeSource for ApiClient {
    fn load_trades(&self) -> anyhow::Result<TradesByDate> {
        Ok(self.fetch_trades()?)
    }
}

/// Case-insensitive substring match on name or symbol; a blank query
/// matches nothing.
pub fn search_stock_items<'a>(items: &'a [StockItem], query: &str) -> Vec<&'a StockItem> {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return Vec::new();
    }
    items
        .iter()
        .filter(|s| s.name.to_lowercase().contains(&q) || s.symbol.to_lowercase().contains(&q))
        .take(MAX_SEARCH_RESULTS)
        .collect()
}
