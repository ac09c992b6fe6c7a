use std::time::Duration;

use thiserror::Error;

use crate::settings::{self, InvalidSetting};

pub const DEFAULT_BATCH_SIZE: usize = 10_000;
pub const DEFAULT_PERIOD: Duration = Duration::from_millis(500);
/// Largest batch generated in one cycle
pub const MAX_BATCH_SIZE: usize = 1_000_000;

#[derive(Debug, Error)]
pub enum WorkloadError {
    #[error(transparent)]
    Setting(#[from] InvalidSetting),
}

/// How much fictional data to generate and how often
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkloadConfig {
    pub batch_size: usize,
    pub period: Duration,
    /// Stop after this many batches; run until interrupted when unset
    pub max_batches: Option<u64>,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            period: DEFAULT_PERIOD,
            max_batches: None,
        }
    }
}

impl WorkloadConfig {
    /// Read `WORKLOAD_BATCH_SIZE`, `WORKLOAD_PERIOD_MS` and `WORKLOAD_MAX_BATCHES`
    pub fn from_env() -> Result<Self, WorkloadError> {
        Self::from_lookup(settings::env_lookup)
    }

    pub fn from_lookup<L>(lookup: L) -> Result<Self, WorkloadError>
    where
        L: Fn(&str) -> Option<String>,
    {
        let config = Self {
            batch_size: settings::parsed(&lookup, "WORKLOAD_BATCH_SIZE")?
                .unwrap_or(DEFAULT_BATCH_SIZE),
            period: settings::millis(&lookup, "WORKLOAD_PERIOD_MS")?.unwrap_or(DEFAULT_PERIOD),
            max_batches: settings::parsed(&lookup, "WORKLOAD_MAX_BATCHES")?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), InvalidSetting> {
        if self.batch_size == 0 {
            return Err(InvalidSetting::new(
                "WORKLOAD_BATCH_SIZE",
                "0",
                "batch size must be positive",
            ));
        }
        if self.batch_size > MAX_BATCH_SIZE {
            return Err(InvalidSetting::new(
                "WORKLOAD_BATCH_SIZE",
                self.batch_size.to_string(),
                format!("batch size must not exceed {MAX_BATCH_SIZE}"),
            ));
        }
        if self.period.is_zero() {
            return Err(InvalidSetting::new(
                "WORKLOAD_PERIOD_MS",
                "0",
                "period must be positive",
            ));
        }
        Ok(())
    }
}
