//! Recurring batch jobs run by the external scheduler through `cmms-admin`.
//!
//! Every job is idempotent on its own (open-record guards plus unique
//! indexes). [`with_job_lock`] additionally keeps two invocations of the
//! same job from overlapping, and [`JobControl`] lets a run stop early on a
//! signal or deadline.

pub mod low_stock;
pub mod notify;
pub mod overdue;
pub mod preventive;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use diesel::sqlite::SqliteConnection;
use tracing::{info, warn};

use crate::clock::Clock;
use crate::error::{Error, Result};
use crate::orm::job_lock::{LockAttempt, release_lock, try_acquire_lock};

pub use low_stock::{LowStockOptions, LowStockSummary, generate_low_stock_purchase_orders};
pub use notify::{DatabaseNotifier, NotificationRequest, Notifier};
pub use overdue::{OverdueSummary, notify_overdue_tasks};
pub use preventive::{PreventiveOptions, PreventiveSummary, generate_preventive_work_orders};

pub const PREVENTIVE_JOB: &str = "generate-preventive";
pub const LOW_STOCK_JOB: &str = "generate-low-stock";
pub const OVERDUE_JOB: &str = "notify-overdue";

/// Cooperative stop signal for a running job: a shared cancel flag (set by
/// the CLI's signal handlers) and an optional wall-clock deadline.
#[derive(Debug, Clone)]
pub struct JobControl {
    cancel: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl Default for JobControl {
    fn default() -> Self {
        Self::new(Arc::new(AtomicBool::new(false)), None)
    }
}

impl JobControl {
    pub fn new(cancel: Arc<AtomicBool>, max_runtime: Option<Duration>) -> Self {
        Self {
            cancel,
            deadline: max_runtime.map(|limit| Instant::now() + limit),
        }
    }

    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    pub fn should_stop(&self) -> bool {
        if self.cancel.load(Ordering::Relaxed) {
            return true;
        }
        self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }
}

/// Identifies this process in `job_locks.owner`.
pub fn lock_owner(clock: &impl Clock) -> String {
    format!("pid-{}@{}", std::process::id(), clock.now().format("%Y-%m-%dT%H:%M:%S"))
}

/// Runs `job` while holding the named job lock. Fails with
/// [`Error::JobLocked`] when another live run holds it. The lock is
/// released whether or not the job succeeds.
pub fn with_job_lock<T, F>(
    conn: &mut SqliteConnection,
    clock: &impl Clock,
    job_name: &str,
    stale_after: Duration,
    job: F,
) -> Result<T>
where
    F: FnOnce(&mut SqliteConnection) -> Result<T>,
{
    let now = clock.now();
    let stale_after = chrono::Duration::from_std(stale_after)
        .map_err(|e| Error::Config(format!("invalid lock staleness: {}", e)))?;
    let owner = lock_owner(clock);

    match try_acquire_lock(conn, job_name, &owner, now, now - stale_after)? {
        LockAttempt::Acquired => info!(job = job_name, owner = %owner, "Acquired job lock"),
        LockAttempt::HeldBy(holder) => {
            warn!(
                job = job_name,
                holder = %holder.owner,
                since = %holder.acquired_at,
                "Job is already running"
            );
            return Err(Error::JobLocked {
                job: job_name.to_string(),
                owner: holder.owner,
            });
        }
    }

    let result = job(conn);

    match release_lock(conn, job_name, &owner) {
        Ok(true) => info!(job = job_name, "Released job lock"),
        Ok(false) => warn!(job = job_name, "Job lock was taken over before release"),
        Err(e) => warn!(job = job_name, error = %e, "Failed to release job lock"),
    }

    result
}
