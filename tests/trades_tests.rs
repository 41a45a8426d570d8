// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tradelog::{cli, commands::trades, db::JournalStore};

fn run(store: &JournalStore, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["tradelog", "trade"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("trade", trade_m)) = matches.subcommand() {
        trades::handle(store, trade_m)
    } else {
        panic!("no trade subcommand");
    }
}

fn seeded() -> JournalStore {
    let store = JournalStore::open_in_memory().unwrap();
    for (date, time, symbol) in [
        ("2025-01-02", "09:10", "AAPL"),
        ("2025-01-03", "10:00", "MSFT"),
        ("2025-01-03", "14:30", "AAPL"),
    ] {
        run(
            &store,
            &[
                "add", "--date", date, "--time", time, "--name", symbol, "--symbol", symbol,
                "--type", "buy", "--quantity", "10", "--price", "100",
            ],
        )
        .unwrap();
    }
    store
}

#[test]
fn list_limit_respected_newest_first() {
    let store = seeded();
    let matches = cli::build_cli().get_matches_from(["tradelog", "trade", "list", "--limit", "2"]);
    if let Some(("trade", trade_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = trade_m.subcommand() {
            let rows = trades::query_rows(&store, list_m).unwrap();
            assert_eq!(rows.len(), 2);
            assert_eq!(rows[0].date, "2025-01-03");
            assert_eq!(rows[0].time, "14:30");
            assert_eq!(rows[1].symbol, "MSFT");
        } else {
            panic!("no list subcommand");
        }
    } else {
        panic!("no trade subcommand");
    }
}

#[test]
fn list_filters_by_symbol_case_insensitively() {
    let store = seeded();
    let matches = cli::build_cli().get_matches_from(["tradelog", "trade", "list", "--symbol", "aapl"]);
    let (_, trade_m) = matches.subcommand().unwrap();
    let (_, list_m) = trade_m.subcommand().unwrap();
    let rows = trades::query_rows(&store, list_m).unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.symbol == "AAPL"));
}

#[test]
fn edit_sets_and_clears_avg_cost() {
    let store = seeded();
    run(
        &store,
        &["edit", "--id", " 1 ", "--type", "sell", "--avg-buy-price", "90", "--memo", "trim"],
    )
    .unwrap();
    let t = store.get_trade(1).unwrap().unwrap();
    assert!(t.is_sell());
    assert_eq!(t.avg_buy_price.unwrap().to_string(), "90");
    assert_eq!(t.memo.as_deref(), Some("trim"));

    run(&store, &["edit", "--id", "1", "--clear-avg-buy-price"]).unwrap();
    let t = store.get_trade(1).unwrap().unwrap();
    assert_eq!(t.avg_buy_price, None);
}

#[test]
fn add_rejects_blank_symbol() {
    let store = JournalStore::open_in_memory().unwrap();
    let err = run(
        &store,
        &[
            "add", "--date", "2025-01-02", "--time", "09:00", "--name", "X", "--symbol", "  ",
            "--type", "buy", "--quantity", "1", "--price", "1",
        ],
    )
    .unwrap_err();
    assert!(err.to_string().contains("symbol"));
    assert!(store.trades_by_date().unwrap().is_empty());
}

#[test]
fn rm_missing_trade_is_an_error() {
    let store = seeded();
    run(&store, &["rm", "--id", "2"]).unwrap();
    assert!(store.get_trade(2).unwrap().is_none());
    assert!(run(&store, &["rm", "--id", "2"]).is_err());
}

struct WarnCounter(Arc<AtomicUsize>);

impl<S: Subscriber> Layer<S> for WarnCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == Level::WARN {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}

#[test]
fn sell_without_avg_cost_logs_a_warning() {
    let store = JournalStore::open_in_memory().unwrap();
    let warnings = Arc::new(AtomicUsize::new(0));
    let subscriber = tracing_subscriber::registry().with(WarnCounter(warnings.clone()));

    tracing::subscriber::with_default(subscriber, || {
        for (side, avg) in [("buy", None), ("sell", Some("95")), ("sell", None)] {
            let mut args = vec![
                "add", "--date", "2025-01-06", "--time", "09:00", "--name", "AAPL", "--symbol",
                "AAPL", "--type", side, "--quantity", "1", "--price", "100",
            ];
            if let Some(avg) = avg {
                args.extend(["--avg-buy-price", avg]);
            }
            run(&store, &args).unwrap();
        }
    });

    assert_eq!(warnings.load(Ordering::SeqCst), 1);
    assert_eq!(store.trades_by_date().unwrap()["2025-01-06"].len(), 3);
}
