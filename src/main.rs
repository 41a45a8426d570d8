// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use tradelog::{cli, commands, db};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let mut store = db::JournalStore::open_default()?;

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", db::db_path()?.display());
        }
        Some(("trade", sub)) => commands::trades::handle(&store, sub)?,
        Some(("stats", sub)) => commands::stats::handle(&store, sub)?,
        Some(("period", sub)) => commands::periods::handle(sub)?,
        Some(("report", sub)) => commands::reports::handle(&store, sub)?,
        Some(("symbols", sub)) => commands::symbols::handle(&store, sub)?,
        Some(("import", sub)) => commands::importer::handle(&mut store, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&store, sub)?,
        Some(("config", sub)) => commands::config::handle(&store, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(store.conn())?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
