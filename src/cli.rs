// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, arg, value_parser};

fn json_flags() -> [Arg; 2] {
    [
        arg!(--json "Print as pretty JSON"),
        arg!(--jsonl "Print as JSON lines"),
    ]
}

fn period_args() -> [Arg; 5] {
    [
        arg!(--range <RANGE> "week | month | year")
            .default_value("month")
            .value_parser(["week", "month", "year"]),
        arg!(--year <YEAR> "Calendar year (ISO week-year for weekly ranges)")
            .value_parser(value_parser!(i32)),
        arg!(--month <MONTH> "Month 1-12").value_parser(value_parser!(u32)),
        arg!(--week <WEEK> "ISO week 1-53").value_parser(value_parser!(u32)),
        arg!(--remote "Read trades from the journal backend instead of the local store"),
    ]
}

fn trade_fields(required: bool) -> [Arg; 9] {
    [
        arg!(--date <DATE> "YYYY-MM-DD").required(required),
        arg!(--time <TIME> "HH:MM").required(required),
        arg!(--name <NAME> "Instrument name").required(required),
        arg!(--symbol <SYMBOL> "Ticker or code").required(required),
        Arg::new("type")
            .long("type")
            .value_name("TYPE")
            .help("buy | sell")
            .required(required),
        arg!(--quantity <QTY>).required(required),
        arg!(--price <PRICE>).required(required),
        Arg::new("avg_buy_price")
            .long("avg-buy-price")
            .value_name("PRICE")
            .help("Average cost of the units sold (sell only)"),
        arg!(--memo <MEMO>),
    ]
}

pub fn build_cli() -> Command {
    Command::new("tradelog")
        .about("Personal stock trade journal")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand(Command::new("init").about("Create the journal database"))
        .subcommand(
            Command::new("trade")
                .about("Record and browse trades")
                .subcommand(
                    Command::new("add")
                        .about("Record a trade")
                        .args(trade_fields(true)),
                )
                .subcommand(
                    Command::new("list")
                        .about("List trades, newest first")
                        .arg(arg!(--date <DATE> "Only this day (YYYY-MM-DD)"))
                        .arg(arg!(--month <MONTH> "Only this month (YYYY-MM)"))
                        .arg(arg!(--symbol <SYMBOL>))
                        .arg(arg!(--limit <N>).value_parser(value_parser!(usize)))
                        .args(json_flags()),
                )
                .subcommand(
                    Command::new("edit")
                        .about("Change fields of a stored trade")
                        .arg(arg!(--id <ID>).required(true))
                        .args(trade_fields(false))
                        .arg(
                            Arg::new("clear_avg")
                                .long("clear-avg-buy-price")
                                .action(ArgAction::SetTrue),
                        ),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Delete a trade")
                        .arg(arg!(--id <ID>).required(true)),
                ),
        )
        .subcommand(
            Command::new("stats")
                .about("Statistics over a period")
                .subcommand(
                    Command::new("summary")
                        .about("Buy/sell totals, realized profit and return")
                        .args(period_args())
                        .args(json_flags()),
                )
                .subcommand(
                    Command::new("daily")
                        .about("Trade count per day")
                        .args(period_args())
                        .args(json_flags()),
                )
                .subcommand(
                    Command::new("monthly")
                        .about("Trade count and cumulative profit per month")
                        .args(period_args())
                        .args(json_flags()),
                )
                .subcommand(
                    Command::new("symbols")
                        .about("Most traded instruments")
                        .args(period_args())
                        .arg(
                            arg!(--top <N>)
                                .default_value("3")
                                .value_parser(value_parser!(usize)),
                        )
                        .args(json_flags()),
                ),
        )
        .subcommand(
            Command::new("period")
                .about("Calendar helpers")
                .subcommand(
                    Command::new("resolve")
                        .about("Show the date bounds of a period")
                        .arg(
                            arg!(--range <RANGE>)
                                .required(true)
                                .value_parser(["week", "month", "year"]),
                        )
                        .arg(arg!(--year <YEAR>).value_parser(value_parser!(i32)))
                        .arg(arg!(--month <MONTH>).value_parser(value_parser!(u32)))
                        .arg(arg!(--week <WEEK>).value_parser(value_parser!(u32)))
                        .args(json_flags()),
                )
                .subcommand(
                    Command::new("weeks")
                        .about("List the ISO weeks of a year")
                        .arg(arg!(--year <YEAR>).value_parser(value_parser!(i32)))
                        .args(json_flags()),
                )
                .subcommand(
                    Command::new("month-week")
                        .about("Label an ISO week by month and week-of-month")
                        .arg(
                            arg!(--year <YEAR>)
                                .required(true)
                                .value_parser(value_parser!(i32)),
                        )
                        .arg(
                            arg!(--week <WEEK>)
                                .required(true)
                                .value_parser(value_parser!(u32)),
                        )
                        .args(json_flags()),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("AI reports from the journal backend")
                .subcommand(
                    Command::new("list")
                        .about("List available report periods")
                        .arg(
                            arg!(--mode <MODE>)
                                .default_value("weekly")
                                .value_parser(["weekly", "monthly"]),
                        )
                        .arg(
                            arg!(--order <ORDER>)
                                .default_value("asc")
                                .value_parser(["asc", "desc"]),
                        )
                        .arg(arg!(--file <PATH> "Read the yearly list from a JSON file"))
                        .args(json_flags()),
                )
                .subcommand(
                    Command::new("show")
                        .about("Show a report (latest when no id is given)")
                        .arg(
                            arg!(--mode <MODE>)
                                .default_value("weekly")
                                .value_parser(["weekly", "monthly"]),
                        )
                        .arg(arg!(--id <ID>).value_parser(value_parser!(i64)))
                        .args(json_flags()),
                ),
        )
        .subcommand(
            Command::new("symbols")
                .about("Instrument lookup")
                .subcommand(
                    Command::new("search")
                        .about("Search backend stock items by name or symbol")
                        .arg(arg!(--query <QUERY>).required(true))
                        .args(json_flags()),
                ),
        )
        .subcommand(
            Command::new("import")
                .about("Import trades")
                .subcommand(
                    Command::new("trades")
                        .arg(arg!(--path <PATH>).required(true))
                        .arg(
                            arg!(--format <FORMAT>)
                                .default_value("csv")
                                .value_parser(["csv", "json"]),
                        ),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Export trades")
                .subcommand(
                    Command::new("trades")
                        .arg(arg!(--format <FORMAT> "csv | json").required(true))
                        .arg(arg!(--out <PATH>).required(true)),
                ),
        )
        .subcommand(
            Command::new("config")
                .about("Settings")
                .subcommand(
                    Command::new("set-api")
                        .about("Store the journal backend base URL")
                        .arg(arg!(--url <URL>).required(true)),
                )
                .subcommand(Command::new("show").about("Show settings")),
        )
        .subcommand(Command::new("doctor").about("Check stored trades for data problems"))
}
