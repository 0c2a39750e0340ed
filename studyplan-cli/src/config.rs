//! Layered configuration: defaults, then `~/.studyplan/config.toml` (or
//! `--config`), then environment variables.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use studyplan_core::{today_in, PlannerConfig, MAX_PLANNING_HORIZON_DAYS};

use crate::state::{ensure_studyplan_home, studyplan_home};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// IANA timezone for "today" (e.g. "America/Chicago"). Local clock when unset.
    pub timezone: Option<String>,
    pub planner: PlannerConfig,
    pub storage: StorageSection,
    pub server: ServerSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSection {
    pub db_path: PathBuf,
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("tasks.db"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(studyplan_home()?.join("config.toml"))
}

/// Load the effective config. An explicit `path` must exist; the default path is optional.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let mut cfg = match path {
        Some(p) => read_config(p)?,
        None => {
            let p = config_path()?;
            if p.exists() { read_config(&p)? } else { Config::default() }
        }
    };

    apply_env(&mut cfg, |key| std::env::var(key).ok())?;
    validate(&cfg)?;
    Ok(cfg)
}

fn read_config(p: &Path) -> Result<Config> {
    let s = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

/// Environment overrides, named as in the original deployment.
pub fn apply_env(cfg: &mut Config, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
    if let Some(v) = lookup("MAX_HOURS_PER_DAY") {
        cfg.planner.max_hours_per_day = v
            .trim()
            .parse()
            .with_context(|| format!("MAX_HOURS_PER_DAY: '{v}' is not a non-negative integer"))?;
    }
    if let Some(v) = lookup("PLANNING_HORIZON_DAYS") {
        cfg.planner.planning_horizon_days = v
            .trim()
            .parse()
            .with_context(|| format!("PLANNING_HORIZON_DAYS: '{v}' is not a positive integer"))?;
    }
    if let Some(v) = lookup("DB_PATH") {
        cfg.storage.db_path = PathBuf::from(v);
    }
    if let Some(v) = lookup("STUDYPLAN_TZ") {
        cfg.timezone = Some(v);
    }
    Ok(())
}

pub fn validate(cfg: &Config) -> Result<()> {
    if cfg.planner.planning_horizon_days == 0 {
        bail!("planning_horizon_days must be at least 1");
    }
    if cfg.planner.planning_horizon_days > MAX_PLANNING_HORIZON_DAYS {
        bail!(
            "planning_horizon_days must be at most {MAX_PLANNING_HORIZON_DAYS}, got {}",
            cfg.planner.planning_horizon_days
        );
    }
    if let Some(tz) = cfg.timezone.as_deref() {
        today_in(Some(tz))?;
    }
    Ok(())
}

pub fn save_config(cfg: &Config, p: &Path) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

/// Write a default config file unless one is already there. Returns the path.
pub fn init_config(path: Option<&Path>) -> Result<PathBuf> {
    let p = match path {
        Some(p) => p.to_path_buf(),
        None => ensure_studyplan_home()?.join("config.toml"),
    };
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(p);
    }
    save_config(&Config::default(), &p)?;
    println!("Wrote {}", p.display());
    Ok(p)
}
