//! Runtime configuration for jobs and the admin console.
//!
//! Values come from the process environment after `.env` has been loaded
//! with `dotenvy`. Command-line flags override individual values per
//! invocation.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{Error, Result};

pub const DEFAULT_DAYS_AHEAD: i64 = 3;
pub const DEFAULT_LEAD_TIME_DAYS: i64 = 7;
pub const DEFAULT_JOB_LOCK_STALE_SECS: u64 = 3600;
/// Upper bound for day counts read from configuration or flags.
pub const MAX_DAYS_AHEAD: i64 = 3650;
pub const MAX_LEAD_TIME_DAYS: i64 = 3650;

#[derive(Debug, Clone)]
pub struct CmmsConfig {
    pub database_url: String,
    /// Assignee for generated work orders whose task has nobody assigned.
    /// When unset those tasks are reported as failures instead.
    pub system_user_id: Option<i32>,
    pub days_ahead: i64,
    pub default_lead_time_days: i64,
    /// Locks older than this are considered abandoned by a crashed run.
    pub job_lock_stale_after: Duration,
    /// Upper bound on a single job run; `None` lets a run finish naturally.
    pub job_max_runtime: Option<Duration>,
}

impl Default for CmmsConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            system_user_id: None,
            days_ahead: DEFAULT_DAYS_AHEAD,
            default_lead_time_days: DEFAULT_LEAD_TIME_DAYS,
            job_lock_stale_after: Duration::from_secs(DEFAULT_JOB_LOCK_STALE_SECS),
            job_max_runtime: None,
        }
    }
}

impl CmmsConfig {
    /// Loads `.env` (if present) and reads the configuration from the
    /// environment. `DATABASE_URL` is required.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| Error::Config("DATABASE_URL must be set".to_string()))?;

        let defaults = Self::default();
        Ok(Self {
            database_url,
            system_user_id: optional_var("CMMS_SYSTEM_USER_ID")?,
            days_ahead: optional_var("CMMS_DAYS_AHEAD")?.unwrap_or(defaults.days_ahead),
            default_lead_time_days: optional_var("CMMS_DEFAULT_LEAD_TIME_DAYS")?
                .unwrap_or(defaults.default_lead_time_days),
            job_lock_stale_after: optional_var("CMMS_JOB_LOCK_STALE_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.job_lock_stale_after),
            job_max_runtime: optional_var("CMMS_JOB_MAX_RUNTIME_SECS")?.map(Duration::from_secs),
        })
        .and_then(Self::validated)
    }

    fn validated(self) -> Result<Self> {
        if !(0..=MAX_DAYS_AHEAD).contains(&self.days_ahead) {
            return Err(Error::Config(format!(
                "CMMS_DAYS_AHEAD must be between 0 and {} (got {})",
                MAX_DAYS_AHEAD, self.days_ahead
            )));
        }
        if !(0..=MAX_LEAD_TIME_DAYS).contains(&self.default_lead_time_days) {
            return Err(Error::Config(format!(
                "CMMS_DEFAULT_LEAD_TIME_DAYS must be between 0 and {} (got {})",
                MAX_LEAD_TIME_DAYS, self.default_lead_time_days
            )));
        }
        Ok(self)
    }
}

fn optional_var<T: FromStr>(name: &str) -> Result<Option<T>> {
    match env::var(name) {
        Ok(raw) if raw.trim().is_empty() => Ok(None),
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| Error::Config(format!("{} has an invalid value: '{}'", name, raw))),
        Err(_) => Ok(None),
    }
}
