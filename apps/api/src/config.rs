//! Runtime configuration
//!
//! Everything is read from environment variables (a `.env` file is loaded
//! first by `main`). Unset variables fall back to defaults; set but
//! malformed variables are rejected.
//!
//! | Variable | Default |
//! |---|---|
//! | `DATABASE_URL` | unset: in-memory storage |
//! | `BIND_ADDR` | `0.0.0.0:3000` |
//! | `DB_MAX_CONNECTIONS` | `5` |
//! | `TRANSFER_RETRIES` | `3` |
//! | `ACTIVE_CONTRACT_REQUIRES_DATE_RANGE` | `false` |
//! | `SCORE_BONUS_JUNIOR` / `_SENIOR` / `_EXPERT` | `5` / `10` / `15` |
//! | `SCORE_TECHNOLOGY_WEIGHT` | `2` |
//! | `SCORE_PROJECT_BONUS` | `5` |

use std::fmt::Display;
use std::net::SocketAddr;
use std::str::FromStr;

use thiserror::Error;

use crate::domain::student::ContractActivity;
use crate::services::{EngineSettings, ScoringWeights};

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: &'static str, message: String },

    #[error("Invalid scoring weights: {0}")]
    InvalidWeights(String),
}

/// Application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// PostgreSQL URL; `None` selects the in-memory stores
    pub database_url: Option<String>,
    pub bind_addr: SocketAddr,
    pub max_connections: u32,
    pub engine: EngineSettings,
}

impl AppConfig {
    /// Reads the configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable name
    /// to its value
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());
        let bind_addr = parse_or(&lookup, "BIND_ADDR", SocketAddr::from(([0, 0, 0, 0], 3000)))?;
        let max_connections = parse_or(&lookup, "DB_MAX_CONNECTIONS", 5u32)?;
        let transfer_retries = parse_or(&lookup, "TRANSFER_RETRIES", 3u32)?;

        let contract_activity = if parse_flag(&lookup, "ACTIVE_CONTRACT_REQUIRES_DATE_RANGE")? {
            ContractActivity::NonArchivedInRange
        } else {
            ContractActivity::NonArchived
        };

        let defaults = ScoringWeights::default();
        let weights = ScoringWeights {
            junior_bonus: parse_or(&lookup, "SCORE_BONUS_JUNIOR", defaults.junior_bonus)?,
            senior_bonus: parse_or(&lookup, "SCORE_BONUS_SENIOR", defaults.senior_bonus)?,
            expert_bonus: parse_or(&lookup, "SCORE_BONUS_EXPERT", defaults.expert_bonus)?,
            technology_weight: parse_or(
                &lookup,
                "SCORE_TECHNOLOGY_WEIGHT",
                defaults.technology_weight,
            )?,
            project_bonus: parse_or(&lookup, "SCORE_PROJECT_BONUS", defaults.project_bonus)?,
        };
        weights.validate().map_err(ConfigError::InvalidWeights)?;

        Ok(Self {
            database_url,
            bind_addr,
            max_connections,
            engine: EngineSettings {
                weights,
                contract_activity,
                transfer_retries,
            },
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidValue {
                key,
                message: format!("{:?}: {}", raw, e),
            }),
        None => Ok(default),
    }
}

fn parse_flag<F>(lookup: &F, key: &'static str) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).as_deref().map(str::trim) {
        None | Some("") => Ok(false),
        Some(raw) => match raw.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::InvalidValue {
                key,
                message: format!("{:?} is not a boolean", raw),
            }),
        },
    }
}
