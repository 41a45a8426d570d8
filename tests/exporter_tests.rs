// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fs;
use tempfile::tempdir;
use tradelog::{
    cli,
    commands::{exporter, importer},
    db::JournalStore,
    models::{NewTrade, TradeType, parse_time},
};

fn seeded() -> JournalStore {
    let store = JournalStore::open_in_memory().unwrap();
    store
        .add_trade(NewTrade {
            date: "2025-04-01".parse().unwrap(),
            time: parse_time("09:30").unwrap(),
            name: "Nvidia, Corp".into(),
            symbol: "NVDA".into(),
            side: TradeType::Sell,
            quantity: "3".parse().unwrap(),
            price: "110.25".parse().unwrap(),
            avg_buy_price: Some("95".parse().unwrap()),
            memo: Some("take profit".into()),
        })
        .unwrap();
    store
}

fn export(store: &JournalStore, format: &str, out: &str) -> anyhow::Result<()> {
    let matches = cli::build_cli().get_matches_from([
        "tradelog", "export", "trades", "--format", format, "--out", out,
    ]);
    if let Some(("export", export_m)) = matches.subcommand() {
        exporter::handle(store, export_m)
    } else {
        panic!("no export subcommand");
    }
}

#[test]
fn csv_export_quotes_and_orders_columns() {
    let store = seeded();
    let dir = tempdir().unwrap();
    let out = dir.path().join("trades.csv");
    export(&store, "csv", out.to_str().unwrap()).unwrap();

    let text = fs::read_to_string(&out).unwrap();
    let mut lines = text.lines();
    assert_eq!(
        lines.next().unwrap(),
        "date,time,name,symbol,type,quantity,price,avg_buy_price,memo"
    );
    assert_eq!(
        lines.next().unwrap(),
        "2025-04-01,09:30,\"Nvidia, Corp\",NVDA,sell,3,110.25,95,take profit"
    );
}

#[test]
fn json_export_imports_back() {
    let store = seeded();
    let dir = tempdir().unwrap();
    let out = dir.path().join("trades.json");
    export(&store, "JSON", out.to_str().unwrap()).unwrap();

    let trades = importer::read_json(out.to_str().unwrap()).unwrap();
    let mut fresh = JournalStore::open_in_memory().unwrap();
    assert_eq!(importer::import_trades(&mut fresh, trades).unwrap(), 1);
    assert_eq!(fresh.trades_by_date().unwrap(), store.trades_by_date().unwrap());
}

#[test]
fn unknown_format_writes_nothing() {
    let store = seeded();
    let dir = tempdir().unwrap();
    let out = dir.path().join("trades.xml");
    assert!(export(&store, "xml", out.to_str().unwrap()).is_err());
    assert!(!out.exists());
}
