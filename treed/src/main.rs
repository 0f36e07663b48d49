/*
 * This file is part of dirtree.
 *
 * dirtree is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU Affero General Public License for more details.
*/

//! Interactive shell front-end for `dirtree-core`.
//!
//! Reads an optional YAML config, initializes logging, then drops into a
//! `rustyline` REPL that maps one line to one `Tree` operation.

mod config;
mod repl;

use dirtree_core::Tree;
use env_logger::Builder;

const HISTORY_FILE: &str = ".dirtree_history";

fn main() {
    Builder::new()
        .parse_filters(&std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_owned()))
        .init();

    let cfg = config::TreedConfig::resolve();
    log::info!(
        "dirtreed starting (max folder name length = {})",
        cfg.max_folder_name_length
    );

    let tree = Tree::new();
    if let Some(script) = cfg.seed_script.as_deref() {
        match std::fs::read_to_string(script) {
            Ok(contents) => {
                log::info!("replaying seed script {script:?}");
                for line in contents.lines() {
                    repl::run_line(&tree, line);
                }
            }
            Err(e) => log::warn!("could not read seed script {script:?}: {e}"),
        }
    }

    if let Err(e) = repl::start(&tree) {
        log::error!("fatal REPL error: {e}");
        std::process::exit(1);
    }
}
