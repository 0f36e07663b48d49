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

//! `TreedConfig` resolution: hardcoded defaults, overridden by an optional
//! YAML file, overridden in turn by `DIRTREE_*` environment variables.

use serde::Deserialize;

const DEFAULT_MAX_FOLDER_NAME_LENGTH: usize = dirtree_core::MAX_FOLDER_NAME_LENGTH;
const DEFAULT_CONFIG_FILE: &str = "dirtreed.yml";

#[derive(Debug, Clone, Deserialize, Default)]
struct FileConfig {
    max_folder_name_length: Option<usize>,
    seed_script: Option<String>,
}

/// `max_folder_name_length` is informational only: `treecore`'s path
/// validation compiles in its own limit, so a mismatching value here just
/// gets logged and surfaced to the operator, not enforced.
#[derive(Debug, Clone)]
pub struct TreedConfig {
    pub max_folder_name_length: usize,
    pub seed_script: Option<String>,
}

impl TreedConfig {
    /// Resolve a config from, in increasing priority: hardcoded defaults,
    /// an optional YAML file (`DIRTREE_CONFIG_FILE`, defaulting to
    /// `dirtreed.yml` in the working directory), then `DIRTREE_*`
    /// environment variables.
    pub fn resolve() -> Self {
        let mut cfg = Self {
            max_folder_name_length: DEFAULT_MAX_FOLDER_NAME_LENGTH,
            seed_script: None,
        };

        let file_path =
            std::env::var("DIRTREE_CONFIG_FILE").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_owned());
        if let Ok(contents) = std::fs::read_to_string(&file_path) {
            match serde_yaml::from_str::<FileConfig>(&contents) {
                Ok(file) => {
                    if let Some(v) = file.max_folder_name_length {
                        cfg.max_folder_name_length = v;
                    }
                    if let Some(v) = file.seed_script {
                        cfg.seed_script = Some(v);
                    }
                    log::info!("loaded configuration from {file_path:?}");
                }
                Err(e) => log::warn!("ignoring malformed config file {file_path:?}: {e}"),
            }
        } else {
            log::warn!("no configuration file at {file_path:?}; using defaults");
        }

        if let Ok(v) = std::env::var("DIRTREE_MAX_FOLDER_NAME_LENGTH") {
            match v.parse() {
                Ok(n) => cfg.max_folder_name_length = n,
                Err(_) => log::warn!("ignoring unparseable DIRTREE_MAX_FOLDER_NAME_LENGTH={v:?}"),
            }
        }
        if let Ok(v) = std::env::var("DIRTREE_SEED_SCRIPT") {
            cfg.seed_script = Some(v);
        }

        cfg
    }
}
