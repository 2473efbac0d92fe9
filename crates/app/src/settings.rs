//! Settings of the studio service, read from an optional `settings.toml` and
//! from `STUDIO__SECTION__KEY` environment variables.
//!
//! See `settings.example.toml` for every key.

use std::collections::HashMap;

use config::{Config, ConfigError, Environment, File};
use engine::{LoyaltyPolicy, TaxTable};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct App {
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
    pub database: Database,
}

/// Loyalty bump thresholds.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Commission {
    pub min_prior_sessions: i64,
    pub min_sessions_granted: i64,
}

impl Default for Commission {
    fn default() -> Self {
        let policy = LoyaltyPolicy::default();
        Self {
            min_prior_sessions: policy.min_prior_sessions,
            min_sessions_granted: policy.min_sessions_granted,
        }
    }
}

impl Commission {
    pub fn policy(&self) -> LoyaltyPolicy {
        LoyaltyPolicy {
            min_prior_sessions: self.min_prior_sessions,
            min_sessions_granted: self.min_sessions_granted,
        }
    }
}

/// Jurisdiction code to rate in basis points (`CA = 725`).
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Tax {
    pub rates: HashMap<String, i64>,
}

impl Tax {
    pub fn table(&self) -> TaxTable {
        let mut table = TaxTable::new();
        for (jurisdiction, rate_bps) in &self.rates {
            table.insert(jurisdiction, *rate_bps);
        }
        table
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Deductions {
    /// Seconds between two deduction passes, `0` disables the task.
    pub interval_secs: u64,
}

impl Default for Deductions {
    fn default() -> Self {
        Self { interval_secs: 3600 }
    }
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: App,
    pub server: Option<Server>,
    #[serde(default)]
    pub commission: Commission,
    #[serde(default)]
    pub tax: Tax,
    #[serde(default)]
    pub deductions: Deductions,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("settings").required(false))
            .add_source(Environment::with_prefix("STUDIO").separator("__"))
            .build()?;

        settings.try_deserialize()
    }
}
