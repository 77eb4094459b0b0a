//! Actor-aware operations on individual records.
//!
//! Every operation authorizes first and only then touches the database, so
//! a denied call has no side effects. Mutations are recorded in the audit
//! log inside the same transaction.

pub mod availability;
pub mod preventive_task;
pub mod purchase_order;
pub mod work_order;

pub use availability::*;
pub use preventive_task::*;
pub use purchase_order::*;
pub use work_order::*;

use diesel::sqlite::SqliteConnection;

use crate::clock::Clock;
use crate::error::Result;
use crate::models::EntityActivity;
use crate::orm::entity_activity::{get_company_activity, log_activity};
use crate::policy::{AUDIT_LOG, Actor, authorize};

fn record(
    conn: &mut SqliteConnection,
    clock: &impl Clock,
    actor: &Actor,
    company_id: i32,
    table: &str,
    entity_id: i32,
    operation: &str,
) -> Result<()> {
    log_activity(
        conn,
        Some(company_id),
        table,
        entity_id,
        operation,
        Some(actor.id),
        clock.now(),
    )?;
    Ok(())
}

/// Most recent audit entries visible to the actor.
pub fn list_activity_for(
    conn: &mut SqliteConnection,
    actor: &Actor,
    limit: i64,
) -> Result<Vec<EntityActivity>> {
    authorize(AUDIT_LOG.view_any(actor))?;
    let entries = get_company_activity(conn, actor.tenant_filter(), limit)?;
    Ok(entries.into_iter().filter(|e| AUDIT_LOG.view(actor, e)).collect())
}
