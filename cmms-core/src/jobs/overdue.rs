//! Daily reminders for preventive tasks that are past due.

use diesel::prelude::*;
use serde::Serialize;
use serde_json::json;
use tracing::{error, info, warn};

use super::JobControl;
use super::notify::{NotificationRequest, Notifier};
use crate::clock::Clock;
use crate::error::Result;
use crate::models::{NotificationKind, PreventiveTask};
use crate::orm::preventive_task::get_overdue_tasks;
use crate::orm::user::get_users_by_company_and_role;
use crate::policy::Role;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OverdueSummary {
    pub sent: usize,
    /// Reminders that had already gone out today.
    pub already_sent: usize,
    pub failed: usize,
    pub interrupted: bool,
}

fn recipients(conn: &mut SqliteConnection, task: &PreventiveTask) -> Result<Vec<i32>> {
    if let Some(assignee) = task.assigned_to {
        return Ok(vec![assignee]);
    }
    Ok(get_users_by_company_and_role(conn, task.company_id, Role::Manager)?
        .into_iter()
        .map(|u| u.id)
        .collect())
}

/// Reminds the assignee of every active task whose due date has passed, or
/// the company's managers when nobody is assigned. At most one reminder per
/// task and recipient is recorded per day, so reruns are harmless.
pub fn notify_overdue_tasks(
    conn: &mut SqliteConnection,
    clock: &impl Clock,
    company_id: Option<i32>,
    notifier: &mut dyn Notifier,
    control: &JobControl,
) -> Result<OverdueSummary> {
    let now = clock.now();
    let today = clock.today();
    let tasks = get_overdue_tasks(conn, today, company_id)?;
    info!(count = tasks.len(), today = %today, "Sending overdue preventive task reminders");

    let mut summary = OverdueSummary::default();
    for task in &tasks {
        if control.should_stop() {
            warn!("Overdue reminders interrupted");
            summary.interrupted = true;
            break;
        }

        let recipients = recipients(conn, task)?;
        if recipients.is_empty() {
            warn!(task_id = task.id, company_id = task.company_id, "Overdue task has nobody to notify");
            continue;
        }

        for recipient_id in recipients {
            let request = NotificationRequest {
                company_id: task.company_id,
                recipient_id,
                kind: NotificationKind::PreventiveTaskOverdue,
                subject_id: task.id,
                payload: json!({
                    "preventive_task_id": task.id,
                    "machine_id": task.machine_id,
                    "name": task.name,
                    "next_due_date": task.next_due_date,
                    "days_overdue": (today - task.next_due_date).num_days(),
                }),
                at: now,
            };
            match notifier.notify(conn, &request) {
                Ok(true) => summary.sent += 1,
                Ok(false) => summary.already_sent += 1,
                Err(e) => {
                    error!(task_id = task.id, recipient_id, error = %e, "Failed to send overdue reminder");
                    summary.failed += 1;
                }
            }
        }
    }

    info!(
        sent = summary.sent,
        already_sent = summary.already_sent,
        failed = summary.failed,
        "Overdue reminders finished"
    );
    Ok(summary)
}
