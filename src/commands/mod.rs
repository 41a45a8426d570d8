// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod trades;
pub mod stats;
pub mod periods;
pub mod reports;
pub mod symbols;
pub mod importer;
pub mod exporter;
pub mod config;
pub mod doctor;

use crate::db::JournalStore;
use crate::remote::ApiClient;
use anyhow::{Result, anyhow};

/// Client for the configured journal backend.
pub fn api_client(store: &JournalStore) -> Result<ApiClient> {
    client_for(store.api_url()?)
}

pub fn client_for(url: Option<String>) -> Result<ApiClient> {
    let url = url.ok_or_else(|| {
        anyhow!("No backend URL configured; run `tradelog config set-api --url <URL>`")
    })?;
    ApiClient::new(&url)
}
