// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Typed errors raised by the journal core and the backend boundary.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, JournalError>;

#[derive(Error, Debug)]
pub enum JournalError {
    #[error("Invalid period: {0}")]
    InvalidPeriod(String),

    #[error("Invalid trade: {0}")]
    InvalidTrade(String),

    #[error("Amount too large: {0}")]
    Overflow(String),

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Could not decode response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Backend rejected {endpoint}: {message}")]
    Api { endpoint: String, message: String },
}

impl JournalError {
    pub fn invalid_period(msg: impl Into<String>) -> Self {
        JournalError::InvalidPeriod(msg.into())
    }

    pub fn invalid_trade(msg: impl Into<String>) -> Self {
        JournalError::InvalidTrade(msg.into())
    }

    pub fn overflow(msg: impl Into<String>) -> Self {
        JournalError::Overflow(msg.into())
    }
}
