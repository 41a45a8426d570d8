// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use std::io::Write;
use tempfile::NamedTempFile;
use tradelog::{
    cli,
    commands::{periods, reports},
    db::JournalStore,
    period::{FixedClock, RangeType, SelectedPeriod, iso_week_to_month_week, resolve_range},
};

#[test]
fn february_bounds_follow_leap_years() {
    let r = resolve_range(RangeType::Month, &SelectedPeriod::for_month(2025, 2)).unwrap();
    assert_eq!(r.start.to_string(), "2025-02-01 00:00:00");
    assert_eq!(r.end.to_string(), "2025-02-28 23:59:59");

    let r = resolve_range(RangeType::Month, &SelectedPeriod::for_month(2024, 2)).unwrap();
    assert_eq!(r.end_date(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
}

#[test]
fn first_iso_week_of_2025_is_labelled_january() {
    let mw = iso_week_to_month_week(2025, 1).unwrap();
    assert_eq!((mw.month, mw.week_of_month), (1, 1));
}

#[test]
fn period_commands_run_and_validate() {
    let clock = FixedClock(NaiveDate::from_ymd_opt(2025, 6, 18).unwrap());
    let run = |args: &[&str]| {
        let mut argv = vec!["tradelog", "period"];
        argv.extend_from_slice(args);
        let matches = cli::build_cli().get_matches_from(argv);
        let (_, period_m) = matches.subcommand().unwrap();
        periods::handle_with_clock(period_m, &clock)
    };
    run(&["resolve", "--range", "week", "--json"]).unwrap();
    run(&["weeks", "--year", "2026"]).unwrap();
    run(&["month-week", "--year", "2025", "--week", "1", "--json"]).unwrap();
    assert!(run(&["resolve", "--range", "week", "--year", "2025", "--week", "54"]).is_err());
    assert!(run(&["month-week", "--year", "2025", "--week", "0"]).is_err());
}

#[test]
fn report_list_reads_yearly_index_from_file() {
    let store = JournalStore::open_in_memory().unwrap();
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"{{"2025": [{{"id": 7, "order": 6}}, {{"id": 3, "order": 1}}], "2024": [{{"id": 1, "order": 52}}]}}"#
    )
    .unwrap();
    file.flush().unwrap();

    let path = file.path().to_str().unwrap().to_string();
    let matches = cli::build_cli().get_matches_from([
        "tradelog", "report", "list", "--order", "desc", "--file", &path,
    ]);
    let (_, report_m) = matches.subcommand().unwrap();
    let (_, list_m) = report_m.subcommand().unwrap();
    let options = reports::list_options(&store, list_m).unwrap();

    let keys: Vec<_> = options.iter().map(|o| o.key.as_str()).collect();
    assert_eq!(keys, vec!["w-2024-52", "w-2025-6", "w-2025-1"]);
    assert_eq!(options[1].id, 7);
    assert_eq!(options[1].label, "2025 Feb week 2");
    assert_eq!(options[2].label, "2025 Jan week 1");
}

#[test]
fn monthly_report_list_rejects_bad_month() {
    let store = JournalStore::open_in_memory().unwrap();
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, r#"{{"2025": [{{"id": 1, "order": 13}}]}}"#).unwrap();
    file.flush().unwrap();

    let path = file.path().to_str().unwrap().to_string();
    let matches = cli::build_cli().get_matches_from([
        "tradelog", "report", "list", "--mode", "monthly", "--file", &path,
    ]);
    let (_, report_m) = matches.subcommand().unwrap();
    let (_, list_m) = report_m.subcommand().unwrap();
    assert!(reports::list_options(&store, list_m).is_err());
}
