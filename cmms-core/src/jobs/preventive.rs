//! Turns preventive tasks that fall due into open work orders.

use chrono::Duration;
use diesel::prelude::*;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use super::JobControl;
use crate::clock::Clock;
use crate::config::{CmmsConfig, MAX_DAYS_AHEAD};
use crate::error::{Error, Result};
use crate::models::{NewWorkOrder, PreventiveTask, WorkOrder, WorkOrderStatus, WorkOrderType};
use crate::orm::entity_activity::log_activity;
use crate::orm::preventive_task::get_due_tasks;
use crate::orm::work_order::{has_unresolved_work_order, insert_work_order};

#[derive(Debug, Clone)]
pub struct PreventiveOptions {
    /// Look-ahead window. A task due within this many days is generated now.
    pub days_ahead: i64,
    pub company_id: Option<i32>,
    /// Assignee (and recorded creator) for tasks without an assignee.
    pub system_user_id: Option<i32>,
}

impl PreventiveOptions {
    pub fn from_config(config: &CmmsConfig) -> Self {
        Self {
            days_ahead: config.days_ahead,
            company_id: None,
            system_user_id: config.system_user_id,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PreventiveSummary {
    pub generated: usize,
    pub skipped: usize,
    pub failed: usize,
}

enum Outcome {
    Generated(WorkOrder),
    Skipped,
    Failed,
}

/// Generates one open preventive work order for every active task due on or
/// before `today + days_ahead`, unless the task already has an unresolved
/// one.
///
/// The batch is a single transaction. A database error or a stop request
/// rolls back every work order created in this run and is returned as the
/// run's error. A task with no assignee and no configured system user is
/// counted as `failed` and does not abort the batch.
pub fn generate_preventive_work_orders(
    conn: &mut SqliteConnection,
    clock: &impl Clock,
    options: &PreventiveOptions,
    control: &JobControl,
) -> Result<PreventiveSummary> {
    if !(0..=MAX_DAYS_AHEAD).contains(&options.days_ahead) {
        return Err(Error::Validation(format!(
            "days ahead must be between 0 and {} (got {})",
            MAX_DAYS_AHEAD, options.days_ahead
        )));
    }

    let now = clock.now();
    let due_date = Duration::try_days(options.days_ahead)
        .and_then(|window| now.checked_add_signed(window))
        .map(|due| due.date())
        .ok_or_else(|| {
            Error::Validation(format!("{} days after {} is out of range", options.days_ahead, now))
        })?;
    info!(
        due_date = %due_date,
        company_id = ?options.company_id,
        "Generating preventive work orders"
    );

    let summary = conn.transaction::<_, Error, _>(|conn| {
        let tasks = get_due_tasks(conn, due_date, options.company_id)?;
        debug!(count = tasks.len(), "Found due preventive tasks");

        let mut summary = PreventiveSummary::default();
        for task in &tasks {
            if control.should_stop() {
                warn!(
                    processed = summary.generated + summary.skipped + summary.failed,
                    "Preventive generation interrupted, rolling back"
                );
                return Err(Error::Cancelled);
            }

            match generate_for_task(conn, task, options, now)? {
                Outcome::Generated(work_order) => {
                    info!(
                        task_id = task.id,
                        work_order_id = work_order.id,
                        company_id = task.company_id,
                        "Created preventive work order"
                    );
                    summary.generated += 1;
                }
                Outcome::Skipped => {
                    debug!(task_id = task.id, "Task already has an unresolved work order");
                    summary.skipped += 1;
                }
                Outcome::Failed => summary.failed += 1,
            }
        }
        Ok(summary)
    });

    let summary = match summary {
        Ok(summary) => summary,
        Err(e) => {
            error!(error = %e, "Preventive generation failed, no work orders were kept");
            return Err(e);
        }
    };

    info!(
        generated = summary.generated,
        skipped = summary.skipped,
        failed = summary.failed,
        "Preventive generation finished"
    );
    Ok(summary)
}

fn generate_for_task(
    conn: &mut SqliteConnection,
    task: &PreventiveTask,
    options: &PreventiveOptions,
    now: chrono::NaiveDateTime,
) -> Result<Outcome> {
    if has_unresolved_work_order(conn, task.id)? {
        return Ok(Outcome::Skipped);
    }

    let Some(assignee) = task.assigned_to.or(options.system_user_id) else {
        error!(
            task_id = task.id,
            company_id = task.company_id,
            "Task has no assignee and no system user is configured"
        );
        return Ok(Outcome::Failed);
    };

    let new_work_order = NewWorkOrder {
        company_id: task.company_id,
        machine_id: task.machine_id,
        preventive_task_id: Some(task.id),
        work_order_type: WorkOrderType::Preventive.as_str().to_string(),
        status: WorkOrderStatus::Open.as_str().to_string(),
        title: task.name.clone(),
        description: Some(format!(
            "Generated from preventive task #{} (due {})",
            task.id, task.next_due_date
        )),
        created_by: options.system_user_id,
        assigned_to: Some(assignee),
        created_at: now,
    };

    let work_order = match insert_work_order(conn, new_work_order) {
        Ok(work_order) => work_order,
        // another run committed one between our check and insert
        Err(e) => {
            let e = Error::from(e);
            if e.is_unique_violation() {
                return Ok(Outcome::Skipped);
            }
            return Err(e);
        }
    };

    log_activity(
        conn,
        Some(work_order.company_id),
        "work_orders",
        work_order.id,
        "create",
        options.system_user_id,
        now,
    )?;

    Ok(Outcome::Generated(work_order))
}
