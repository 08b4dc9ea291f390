// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use valuebatch::{cli, commands, config::Settings};

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let settings = Settings::resolve(matches.get_one::<String>("store").map(String::as_str))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&settings.log_filter))
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(store = %settings.store_path.display(), "settings resolved");

    match matches.subcommand() {
        Some(("preview", sub)) => commands::preview::handle(&settings, sub)?,
        Some(("facets", sub)) => commands::preview::handle_facets(&settings, sub)?,
        Some((name @ ("update" | "delete" | "copy"), sub)) => {
            commands::batch::handle(&settings, name, sub)?
        }
        Some(("forecast", sub)) => commands::forecast::handle(&settings, sub)?,
        Some(("stats", sub)) => commands::stats::handle(&settings, sub)?,
        Some(("list", sub)) => commands::list::handle(&settings, sub)?,
        Some(("import", sub)) => commands::importer::handle(&settings, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&settings, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
