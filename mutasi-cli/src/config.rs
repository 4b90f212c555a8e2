use anyhow::{Context, Result};
use mutasi_ingest::{ParseOptions, StatementFormat};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::state::ensure_mutasi_home;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub parse: ParseSection,
    #[serde(default)]
    pub output: OutputSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseSection {
    /// Statement year when a Format A period label cannot be read.
    /// Unset means the current calendar year.
    pub fallback_year: Option<i32>,
    /// `a` (sequential) or `b` (tabular)
    pub default_format: StatementFormat,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSection {
    /// Default tracing filter when RUST_LOG is not set
    pub log_level: String,
}

impl Default for ParseSection {
    fn default() -> Self {
        Self {
            fallback_year: None,
            default_format: StatementFormat::Tabular,
        }
    }
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Parser options, with a `--year` flag taking precedence over the file.
    pub fn parse_options(&self, year_override: Option<i32>) -> ParseOptions {
        let mut opts = ParseOptions::default();
        if let Some(year) = year_override.or(self.parse.fallback_year) {
            opts.fallback_year = year;
        }
        opts
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_mutasi_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).context("parse config.toml")
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}
