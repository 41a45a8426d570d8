// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use tradelog::{commands::doctor, db::JournalStore};

#[test]
fn doctor_reports_cost_basis_and_parse_problems() {
    let store = JournalStore::open_in_memory().unwrap();
    store
        .conn()
        .execute_batch(
            r#"
        INSERT INTO trades(date,time,name,symbol,side,quantity,price,avg_buy_price)
            VALUES ('2025-01-02','09:00','A','A','sell','1','10',NULL);
        INSERT INTO trades(date,time,name,symbol,side,quantity,price,avg_buy_price)
            VALUES ('2025-01-03','09:00','B','B','buy','1','10','9');
        INSERT INTO trades(date,time,name,symbol,side,quantity,price,avg_buy_price)
            VALUES ('2025-13-01','9am','C','C','buy','-2','abc',NULL);
        "#,
        )
        .unwrap();

    let issues = doctor::find_issues(store.conn()).unwrap();
    let kinds: Vec<&str> = issues.iter().map(|r| r[0].as_str()).collect();
    assert_eq!(
        kinds,
        vec![
            "sell_missing_avg_cost",
            "buy_with_avg_cost",
            "bad_date",
            "bad_time",
            "negative_value",
            "bad_number"
        ]
    );
    assert_eq!(issues[0][1], "#1 2025-01-02 A");
}

#[test]
fn clean_journal_has_no_issues() {
    let store = JournalStore::open_in_memory().unwrap();
    store
        .conn()
        .execute(
            "INSERT INTO trades(date,time,name,symbol,side,quantity,price,avg_buy_price)
             VALUES ('2025-01-02','09:00','A','A','sell','1','10','8')",
            [],
        )
        .unwrap();
    assert!(doctor::find_issues(store.conn()).unwrap().is_empty());
    doctor::handle(store.conn()).unwrap();
}
