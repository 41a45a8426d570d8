// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::period::{
    Clock, RangeType, SelectedPeriod, SystemClock, iso_week_to_month_week, month_abbrev,
    resolve_range, weekly_ranges,
};
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;

pub fn handle(m: &clap::ArgMatches) -> Result<()> {
    handle_with_clock(m, &SystemClock)
}

pub fn handle_with_clock(m: &clap::ArgMatches, clock: &dyn Clock) -> Result<()> {
    match m.subcommand() {
        Some(("resolve", sub)) => {
            let range: RangeType = sub.get_one::<String>("range").unwrap().parse()?;
            let current = SelectedPeriod::current(range, clock);
            let period = SelectedPeriod {
                year: sub.get_one::<i32>("year").copied().unwrap_or(current.year),
                month: sub.get_one::<u32>("month").copied().or(current.month),
                week: sub.get_one::<u32>("week").copied().or(current.week),
            };
            let bounds = resolve_range(range, &period)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &bounds)? {
                let rows = vec![vec![
                    range.to_string(),
                    bounds.start.format("%Y-%m-%d %H:%M:%S").to_string(),
                    bounds.end.format("%Y-%m-%d %H:%M:%S").to_string(),
                ]];
                println!("{}", pretty_table(&["Range", "Start", "End"], rows));
            }
        }
        Some(("weeks", sub)) => {
            let year = sub
                .get_one::<i32>("year")
                .copied()
                .unwrap_or_else(|| SelectedPeriod::current(RangeType::Week, clock).year);
            let weeks = weekly_ranges(year)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &weeks)? {
                let rows = weeks
                    .iter()
                    .map(|w| {
                        vec![
                            w.week.to_string(),
                            w.start.to_string(),
                            w.end.to_string(),
                            w.label.clone(),
                        ]
                    })
                    .collect();
                println!("{}", pretty_table(&["Week", "Start", "End", "Label"], rows));
            }
        }
        Some(("month-week", sub)) => {
            let year = *sub.get_one::<i32>("year").unwrap();
            let week = *sub.get_one::<u32>("week").unwrap();
            let mw = iso_week_to_month_week(year, week)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &mw)? {
                println!(
                    "{} W{:02} = {} week {}",
                    year,
                    week,
                    month_abbrev(mw.month),
                    mw.week_of_month
                );
            }
        }
        _ => {}
    }
    Ok(())
}
