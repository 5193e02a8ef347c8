// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use std::path::PathBuf;

use clap::{CommandFactory, FromArgMatches, Parser};

#[derive(Parser)]
#[command(
    name = "latticed",
    version,
    about = "Web console for batch network-analysis jobs",
    long_about = None,
    after_help = "latticed server\n\
\n\
Configuration precedence: defaults < config file < command-line flags.\n\
Config path precedence: defaults < LATTICE_CONFIG_PATH < command-line flags.\n\
If --config is omitted, latticed tries LATTICE_CONFIG_PATH, then the default config file location; a missing default config is OK.\n\
Paths in the config file are resolved relative to the config file directory; paths passed as flags are resolved relative to the current working directory."
)]
pub struct Opts {
    #[arg(
        short,
        long,
        value_name = "PATH",
        help = "Path to a TOML config file. When omitted, latticed uses LATTICE_CONFIG_PATH if set, otherwise the default config file location if available."
    )]
    pub config: Option<PathBuf>,
    #[arg(
        long,
        value_name = "PATH",
        help = "Directory staged uploads and results live under. Overrides `upload_dir` from the config file."
    )]
    pub upload_dir: Option<PathBuf>,
    #[arg(
        long,
        value_name = "PATH",
        help = "Path to the external scheduler executable. Overrides `scheduler_path` from the config file."
    )]
    pub scheduler_path: Option<PathBuf>,
    #[arg(
        long,
        value_name = "PORT",
        help = "Port to bind the console on. Overrides `port` from the config file."
    )]
    pub port: Option<u16>,
    #[arg(
        short,
        long,
        action = clap::ArgAction::SetTrue,
        help = "Enable debug logging and include logs from dependencies. Overrides `verbose` from the config file."
    )]
    pub verbose: bool,
}

pub struct ParsedOpts {
    pub opts: Opts,
    pub verbose_override: Option<bool>,
}

pub fn parse_opts() -> ParsedOpts {
    let mut cmd = Opts::command();
    let matches = cmd.get_matches_mut();
    // A bare `false` must not override `verbose = true` from the config
    // file, so only a flag the user actually passed becomes an override.
    let verbose_override = if matches.get_flag("verbose") {
        Some(true)
    } else {
        None
    };
    let opts = Opts::from_arg_matches(&matches).unwrap_or_else(|err| err.exit());
    ParsedOpts {
        opts,
        verbose_override,
    }
}
