use diesel::prelude::*;
use tracing::info;

use super::record;
use crate::clock::Clock;
use crate::error::{Error, Result};
use crate::models::PreventiveTask;
use crate::orm::preventive_task::{get_preventive_task, set_active};
use crate::policy::{Actor, PREVENTIVE_TASK, authorize};
use crate::tenant::require;

/// Stops a task from generating further work orders. The task and its
/// history are kept; deactivating an inactive task is a no-op.
pub fn deactivate_preventive_task(
    conn: &mut SqliteConnection,
    clock: &impl Clock,
    actor: &Actor,
    task_id: i32,
) -> Result<PreventiveTask> {
    let task = require(get_preventive_task(conn, task_id)?, "preventive_task", task_id)?;
    authorize(PREVENTIVE_TASK.update(actor, &task))?;

    if !task.is_active {
        return Ok(task);
    }

    conn.transaction::<_, Error, _>(|conn| {
        let updated = set_active(conn, task.id, false)?;
        record(conn, clock, actor, updated.company_id, "preventive_tasks", updated.id, "update")?;
        info!(task_id = updated.id, actor_id = actor.id, "Preventive task deactivated");
        Ok(updated)
    })
}
