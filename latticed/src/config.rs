// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

const APP_DIR_NAME: &str = "lattice";
const CONFIG_FILE_NAME: &str = "lattice.toml";
const CONFIG_ENV_VAR: &str = "LATTICE_CONFIG_PATH";
const UPLOAD_DIR_NAME: &str = "upload";
const DEFAULT_SCHEDULER_PROGRAM: &str = "scheduler";
const DEFAULT_PORT: u16 = 8668;

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    upload_dir: Option<String>,
    scheduler_path: Option<String>,
    port: Option<u16>,
    verbose: Option<bool>,
}

#[derive(Debug)]
pub struct Config {
    pub upload_dir: PathBuf,
    pub scheduler_path: PathBuf,
    pub port: u16,
    pub verbose: bool,
    pub config_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    Override,
    Env,
    ConfigFile,
    Default,
}

impl ConfigSource {
    pub fn as_str(self) -> &'static str {
        match self {
            ConfigSource::Override => "override",
            ConfigSource::Env => "env",
            ConfigSource::ConfigFile => "config",
            ConfigSource::Default => "default",
        }
    }
}

#[derive(Debug)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

#[derive(Debug)]
pub struct ConfigReport {
    pub config_path: Option<PathBuf>,
    pub config_path_source: Option<ConfigSource>,
    pub config_file_present: bool,
    pub upload_dir: ConfigValue<PathBuf>,
    pub scheduler_path: ConfigValue<PathBuf>,
    pub port: ConfigValue<u16>,
    pub verbose: ConfigValue<bool>,
}

#[derive(Debug)]
pub struct LoadResult {
    pub config: Config,
    pub report: ConfigReport,
}

#[derive(Debug, Default)]
pub struct Overrides {
    pub upload_dir: Option<PathBuf>,
    pub scheduler_path: Option<PathBuf>,
    pub port: Option<u16>,
    pub verbose: Option<bool>,
}

#[allow(dead_code)]
pub fn load(config_path_override: Option<PathBuf>, overrides: Overrides) -> Result<Config> {
    Ok(load_with_report(config_path_override, overrides)?.config)
}

pub fn load_with_report(
    config_path_override: Option<PathBuf>,
    overrides: Overrides,
) -> Result<LoadResult> {
    let (config_path, config_path_source, required) = match config_path_override {
        Some(path) => (Some(expand_path(path)), Some(ConfigSource::Override), true),
        None => match config_path_from_env()? {
            Some(path) => (Some(expand_path(path)), Some(ConfigSource::Env), true),
            None => match default_config_path().ok() {
                Some(path) => (Some(path), Some(ConfigSource::Default), false),
                None => (None, None, false),
            },
        },
    };
    let config_file_present = config_path
        .as_deref()
        .map(|path| path.exists())
        .unwrap_or(false);

    let file_config = match config_path.as_deref() {
        Some(path) => read_config_file(path, required)?,
        None => FileConfig::default(),
    };
    let config_dir = config_path.as_deref().and_then(|path| path.parent());

    let (upload_dir, upload_source) = match overrides.upload_dir {
        Some(path) => (expand_path(path), ConfigSource::Override),
        None => match file_config.upload_dir {
            Some(raw) => (resolve_path(&raw, config_dir), ConfigSource::ConfigFile),
            None => (
                default_upload_dir().with_context(|| {
                    "failed to resolve default upload directory; specify --upload-dir or set upload_dir in the config file"
                })?,
                ConfigSource::Default,
            ),
        },
    };

    let (scheduler_path, scheduler_source) = match overrides.scheduler_path {
        Some(path) => (expand_path(path), ConfigSource::Override),
        None => match file_config.scheduler_path {
            Some(raw) => (resolve_path(&raw, config_dir), ConfigSource::ConfigFile),
            None => (
                PathBuf::from(DEFAULT_SCHEDULER_PROGRAM),
                ConfigSource::Default,
            ),
        },
    };

    let (port, port_source) = match overrides.port {
        Some(port) => (port, ConfigSource::Override),
        None => match file_config.port {
            Some(port) => (port, ConfigSource::ConfigFile),
            None => (DEFAULT_PORT, ConfigSource::Default),
        },
    };
    if port == 0 {
        anyhow::bail!("port must be between 1 and 65535");
    }

    let (verbose, verbose_source) = match overrides.verbose {
        Some(verbose) => (verbose, ConfigSource::Override),
        None => match file_config.verbose {
            Some(verbose) => (verbose, ConfigSource::ConfigFile),
            None => (false, ConfigSource::Default),
        },
    };

    let config = Config {
        upload_dir,
        scheduler_path,
        port,
        verbose,
        config_path: config_path.clone(),
    };

    let report = ConfigReport {
        config_path,
        config_path_source,
        config_file_present,
        upload_dir: ConfigValue {
            value: config.upload_dir.clone(),
            source: upload_source,
        },
        scheduler_path: ConfigValue {
            value: config.scheduler_path.clone(),
            source: scheduler_source,
        },
        port: ConfigValue {
            value: config.port,
            source: port_source,
        },
        verbose: ConfigValue {
            value: config.verbose,
            source: verbose_source,
        },
    };

    Ok(LoadResult { config, report })
}

pub fn ensure_upload_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .with_context(|| format!("failed to create upload directory {}", path.display()))
}

fn read_config_file(path: &Path, required: bool) -> Result<FileConfig> {
    if !path.exists() {
        if required {
            anyhow::bail!("config file not found at {}", path.display());
        }
        return Ok(FileConfig::default());
    }

    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    toml::from_str(&contents)
        .with_context(|| format!("failed to parse config file {}", path.display()))
}

fn resolve_path(raw: &str, base_dir: Option<&Path>) -> PathBuf {
    let expanded = shellexpand::tilde(raw);
    let path = PathBuf::from(expanded.as_ref());
    if path.is_absolute() {
        return path;
    }
    match base_dir {
        Some(dir) => dir.join(path),
        None => path,
    }
}

fn expand_path(path: PathBuf) -> PathBuf {
    let path_string = path.to_string_lossy().to_string();
    let expanded = shellexpand::tilde(&path_string);
    PathBuf::from(expanded.as_ref())
}

fn config_path_from_env() -> Result<Option<PathBuf>> {
    match std::env::var_os(CONFIG_ENV_VAR) {
        Some(value) => {
            if value.is_empty() {
                anyhow::bail!("{CONFIG_ENV_VAR} is set but empty");
            }
            Ok(Some(PathBuf::from(value)))
        }
        None => Ok(None),
    }
}

fn default_config_path() -> Result<PathBuf> {
    let base = dirs::config_dir().context("failed to resolve config directory")?;
    Ok(base.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}

fn default_upload_dir() -> Result<PathBuf> {
    let base = dirs::data_dir().context("failed to resolve data directory")?;
    Ok(base.join(APP_DIR_NAME).join(UPLOAD_DIR_NAME))
}
