// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::JournalStore;
use crate::report_list::{
    PeriodOption, Report, ReportMode, SortOrder, YearlyReportList, to_period_options,
};
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::{Context, Result};

pub fn handle(store: &JournalStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => {
            let options = list_options(store, sub)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &options)? {
                let rows = options
                    .iter()
                    .map(|o| vec![o.key.clone(), o.label.clone(), o.id.to_string()])
                    .collect();
                println!("{}", pretty_table(&["Key", "Period", "Report"], rows));
            }
        }
        Some(("show", sub)) => {
            let mode: ReportMode = sub.get_one::<String>("mode").unwrap().parse()?;
            let client = super::api_client(store)?;
            let report = match sub.get_one::<i64>("id") {
                Some(&id) => client.fetch_report(mode, id)?,
                None => client.fetch_latest_report(mode)?,
            };
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
                print_report(&report);
            }
        }
        _ => {}
    }
    Ok(())
}

/// Options from `--file` when given, otherwise from the backend.
pub fn list_options(store: &JournalStore, sub: &clap::ArgMatches) -> Result<Vec<PeriodOption>> {
    let mode: ReportMode = sub.get_one::<String>("mode").unwrap().parse()?;
    let order: SortOrder = sub.get_one::<String>("order").unwrap().parse()?;
    let list = match sub.get_one::<String>("file") {
        Some(path) => read_list_file(path.trim())?,
        None => super::api_client(store)?.fetch_report_list(mode)?,
    };
    Ok(to_period_options(&list, mode, order)?)
}

fn read_list_file(path: &str) -> Result<YearlyReportList> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("Open {}", path))?;
    serde_json::from_str(&raw).with_context(|| format!("Parse report list {}", path))
}

fn print_report(report: &Report) {
    println!("Report #{} ({})", report.report_id, report.period);
    println!();
    println!("{}", report.summary);
    let items = report.sorted_analysis();
    if items.is_empty() {
        return;
    }
    let rows = items
        .iter()
        .map(|a| {
            vec![
                format!("{} {}", a.date, a.time),
                a.stock_name.clone(),
                a.trade_type.clone(),
                a.memo.clone().unwrap_or_default(),
                a.suggestion.clone().unwrap_or_default(),
            ]
        })
        .collect();
    println!();
    println!(
        "{}",
        pretty_table(&["When", "Stock", "Type", "Memo", "Suggestion"], rows)
    );
}
