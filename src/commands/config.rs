// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::{self, JournalStore};
use crate::utils::pretty_table;
use anyhow::Result;

pub fn handle(store: &JournalStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set-api", sub)) => {
            let url = sub.get_one::<String>("url").unwrap();
            store.set_api_url(url)?;
            println!("Backend URL set to {}", store.api_url()?.unwrap_or_default());
        }
        Some(("show", _)) => {
            let rows = vec![
                vec!["database".into(), db::db_path()?.display().to_string()],
                vec![
                    "api_url".into(),
                    store.api_url()?.unwrap_or_else(|| "(not set)".into()),
                ],
            ];
            println!("{}", pretty_table(&["Setting", "Value"], rows));
        }
        _ => {}
    }
    Ok(())
}
