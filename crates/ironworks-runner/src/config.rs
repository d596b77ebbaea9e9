//! Configuration for the economy runner.
//!
//! All configuration is loaded from environment variables; every variable
//! has a default, so the runner starts with no environment at all.

use std::time::Duration;

use crate::error::RunnerError;

/// Complete runner configuration loaded from the environment.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Number of extractors (kinds assigned round-robin over the raw kinds).
    pub extractors: usize,
    /// Number of factories (kinds assigned round-robin over the recipes).
    pub factories: usize,
    /// Number of wholesalers, each stocking every kind.
    pub wholesalers: usize,
    /// Starting balance of each extractor.
    pub extractor_funds: i64,
    /// Starting balance of each factory.
    pub factory_funds: i64,
    /// Starting balance of each wholesaler.
    pub wholesaler_funds: i64,
    /// Wholesaler restock threshold per kind.
    pub low_water: u32,
    /// How long the economy runs before the cooperative stop.
    pub run_duration: Duration,
}

impl RunnerConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional variables (with defaults):
    /// - `IRONWORKS_EXTRACTORS` -- extractor count (default 3)
    /// - `IRONWORKS_FACTORIES` -- factory count (default 3)
    /// - `IRONWORKS_WHOLESALERS` -- wholesaler count (default 2)
    /// - `IRONWORKS_EXTRACTOR_FUNDS` -- per-extractor starting balance (default 2000)
    /// - `IRONWORKS_FACTORY_FUNDS` -- per-factory starting balance (default 4000)
    /// - `IRONWORKS_WHOLESALER_FUNDS` -- per-wholesaler starting balance (default 10000)
    /// - `IRONWORKS_LOW_WATER` -- wholesaler restock threshold (default 3)
    /// - `IRONWORKS_RUN_SECS` -- run duration in seconds (default 30)
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Config`] when a set variable fails to parse
    /// or a count is zero.
    pub fn from_env() -> Result<Self, RunnerError> {
        let config = Self {
            extractors: env_or("IRONWORKS_EXTRACTORS", 3)?,
            factories: env_or("IRONWORKS_FACTORIES", 3)?,
            wholesalers: env_or("IRONWORKS_WHOLESALERS", 2)?,
            extractor_funds: env_or("IRONWORKS_EXTRACTOR_FUNDS", 2_000)?,
            factory_funds: env_or("IRONWORKS_FACTORY_FUNDS", 4_000)?,
            wholesaler_funds: env_or("IRONWORKS_WHOLESALER_FUNDS", 10_000)?,
            low_water: env_or("IRONWORKS_LOW_WATER", 3)?,
            run_duration: Duration::from_secs(env_or("IRONWORKS_RUN_SECS", 30)?),
        };

        if config.extractors == 0 || config.factories == 0 || config.wholesalers == 0 {
            return Err(RunnerError::Config(String::from(
                "agent counts must all be at least 1",
            )));
        }
        Ok(config)
    }
}

/// Read an optional environment variable, falling back to a default.
fn env_or<T>(name: &str, default: T) -> Result<T, RunnerError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| RunnerError::Config(format!("invalid {name}: {e}"))),
        Err(_) => Ok(default),
    }
}
