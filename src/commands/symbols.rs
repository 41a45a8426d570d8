// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::JournalStore;
use crate::remote::search_stock_items;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;

pub fn handle(store: &JournalStore, m: &clap::ArgMatches) -> Result<()> {
    if let Some(("search", sub)) = m.subcommand() {
        let query = sub.get_one::<String>("query").unwrap();
        let items = super::api_client(store)?.fetch_stock_items()?;
        let hits = search_stock_items(&items, query);
        if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &hits)? {
            let rows = hits
                .iter()
                .map(|s| vec![s.symbol.clone(), s.name.clone(), s.id.to_string()])
                .collect();
            println!("{}", pretty_table(&["Symbol", "Name", "Id"], rows));
        }
    }
    Ok(())
}
