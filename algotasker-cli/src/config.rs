use algotasker_core::{Algorithm, DEFAULT_TIME_QUANTUM, SchedulingOptions, WorkingHours};
use anyhow::{Context, Result};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::state::ensure_algotasker_home;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub working_hours: WorkingHoursSection,
    #[serde(default)]
    pub scheduler: SchedulerSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkingHoursSection {
    /// "HH:MM"
    pub start: String,
    /// "HH:MM"
    pub end: String,
    /// IANA name, e.g. "America/Chicago".
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerSection {
    /// Round-Robin slice in minutes.
    pub time_quantum: i32,
    pub default_algorithm: String,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

impl Default for WorkingHoursSection {
    fn default() -> Self {
        Self {
            start: "09:00".to_string(),
            end: "17:00".to_string(),
            timezone: default_timezone(),
        }
    }
}

impl Default for SchedulerSection {
    fn default() -> Self {
        Self {
            time_quantum: DEFAULT_TIME_QUANTUM,
            default_algorithm: Algorithm::Sjf.to_string(),
        }
    }
}

impl Config {
    pub fn timezone(&self) -> Result<Tz> {
        let tz = &self.working_hours.timezone;
        tz.parse()
            .map_err(|_| anyhow::anyhow!("invalid timezone: {tz}"))
    }

    pub fn working_hours(&self) -> Result<WorkingHours> {
        let hours = WorkingHours::parse(&self.working_hours.start, &self.working_hours.end)
            .context("config [working_hours]")?;
        Ok(hours.in_timezone(self.timezone()?))
    }

    pub fn default_algorithm(&self) -> Result<Algorithm> {
        self.scheduler
            .default_algorithm
            .parse()
            .context("config [scheduler].default_algorithm")
    }

    /// Options for one request; `quantum` overrides the configured value.
    pub fn scheduling_options(&self, quantum: Option<i32>) -> Result<SchedulingOptions> {
        Ok(SchedulingOptions {
            working_hours: self.working_hours()?,
            time_quantum: quantum.unwrap_or(self.scheduler.time_quantum),
        })
    }
}

/// `config.toml` under the algotasker home (`$ALGOTASKER_HOME` or `~/.algotasker`).
pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_algotasker_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
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
