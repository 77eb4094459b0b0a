use chrono::Duration;
use diesel::prelude::*;
use tracing::info;

use super::record;
use crate::clock::Clock;
use crate::error::{Error, Result};
use crate::models::{Machine, NewWorkOrder, WorkOrder, WorkOrderInput, WorkOrderStatus};
use crate::orm::machine::{get_machine, list_machines};
use crate::orm::preventive_task::{get_preventive_task, set_next_due_date};
use crate::orm::user::get_user;
use crate::orm::work_order::{get_work_order, insert_work_order, list_work_orders, set_assignee, update_status};
use crate::policy::{Ability, Actor, MACHINE, WORK_ORDER, authorize, can_create_work_order_of_type};
use crate::tenant::require;

/// Assignees must belong to the work order's company.
fn check_assignee(conn: &mut SqliteConnection, company_id: i32, assignee: i32) -> Result<()> {
    match get_user(conn, assignee)? {
        Some(user) if user.company_id == company_id => Ok(()),
        _ => Err(Error::Validation(format!(
            "user {} cannot be assigned to work in this company",
            assignee
        ))),
    }
}

fn current_status(work_order: &WorkOrder) -> Result<WorkOrderStatus> {
    work_order.status().map_err(Error::Validation)
}

/// Opens a work order on one of the actor's machines. Operators may only
/// report breakdowns; pre-assigning requires the assign ability.
pub fn create_work_order(
    conn: &mut SqliteConnection,
    clock: &impl Clock,
    actor: &Actor,
    input: WorkOrderInput,
) -> Result<WorkOrder> {
    authorize(WORK_ORDER.create(actor))?;
    authorize(can_create_work_order_of_type(actor, input.work_order_type))?;

    let machine = require(get_machine(conn, input.machine_id)?, "machine", input.machine_id)?;
    authorize(MACHINE.view(actor, &machine))?;

    if input.assigned_to.is_some() {
        authorize(WORK_ORDER.perform(actor, Ability::Assign, None))?;
    }

    let title = input.title.trim().to_string();
    if title.is_empty() {
        return Err(Error::Validation("title must not be empty".to_string()));
    }

    conn.transaction::<_, Error, _>(|conn| {
        if let Some(assignee) = input.assigned_to {
            check_assignee(conn, machine.company_id, assignee)?;
        }

        let work_order = insert_work_order(
            conn,
            NewWorkOrder {
                company_id: machine.company_id,
                machine_id: machine.id,
                preventive_task_id: None,
                work_order_type: input.work_order_type.as_str().to_string(),
                status: WorkOrderStatus::Open.as_str().to_string(),
                title,
                description: input.description,
                created_by: Some(actor.id),
                assigned_to: input.assigned_to,
                created_at: clock.now(),
            },
        )?;
        record(conn, clock, actor, work_order.company_id, "work_orders", work_order.id, "create")?;

        info!(
            work_order_id = work_order.id,
            machine_id = machine.id,
            work_order_type = %work_order.work_order_type,
            actor_id = actor.id,
            "Work order created"
        );
        Ok(work_order)
    })
}

pub fn assign_work_order(
    conn: &mut SqliteConnection,
    clock: &impl Clock,
    actor: &Actor,
    work_order_id: i32,
    assignee: Option<i32>,
) -> Result<WorkOrder> {
    let work_order = require(get_work_order(conn, work_order_id)?, "work_order", work_order_id)?;
    authorize(WORK_ORDER.perform(actor, Ability::Assign, Some(&work_order)))?;

    if current_status(&work_order)?.is_terminal() {
        return Err(Error::Validation(format!(
            "work order {} is {} and cannot be reassigned",
            work_order.id, work_order.status
        )));
    }

    conn.transaction::<_, Error, _>(|conn| {
        if let Some(user_id) = assignee {
            check_assignee(conn, work_order.company_id, user_id)?;
        }
        let updated = set_assignee(conn, work_order.id, assignee)?;
        record(conn, clock, actor, updated.company_id, "work_orders", updated.id, "update")?;
        info!(work_order_id = updated.id, assignee = ?assignee, "Work order assigned");
        Ok(updated)
    })
}

fn transition(
    conn: &mut SqliteConnection,
    clock: &impl Clock,
    actor: &Actor,
    work_order_id: i32,
    ability: Ability,
    target: WorkOrderStatus,
) -> Result<WorkOrder> {
    let work_order = require(get_work_order(conn, work_order_id)?, "work_order", work_order_id)?;
    authorize(WORK_ORDER.perform(actor, ability, Some(&work_order)))?;

    let from = current_status(&work_order)?;
    if !from.can_transition_to(target) {
        return Err(Error::InvalidTransition {
            entity: "work_order",
            from: from.as_str().to_string(),
            to: target.as_str().to_string(),
        });
    }

    let now = clock.now();
    conn.transaction::<_, Error, _>(|conn| {
        let completed_at = (target == WorkOrderStatus::Completed).then_some(now);
        let updated = update_status(conn, work_order.id, target, completed_at)?;
        record(conn, clock, actor, updated.company_id, "work_orders", updated.id, "update")?;

        if target == WorkOrderStatus::Completed {
            if let Some(task_id) = updated.preventive_task_id {
                advance_task(conn, clock, actor, task_id, now.date())?;
            }
        }

        info!(
            work_order_id = updated.id,
            from = from.as_str(),
            to = target.as_str(),
            actor_id = actor.id,
            "Work order status changed"
        );
        Ok(updated)
    })
}

/// Schedules the task's next occurrence one interval after the completion
/// date.
fn advance_task(
    conn: &mut SqliteConnection,
    clock: &impl Clock,
    actor: &Actor,
    task_id: i32,
    completed_on: chrono::NaiveDate,
) -> Result<()> {
    let task = require(get_preventive_task(conn, task_id)?, "preventive_task", task_id)?;
    let next = Duration::try_days(i64::from(task.interval_days))
        .and_then(|interval| completed_on.checked_add_signed(interval))
        .ok_or_else(|| {
            Error::Validation(format!(
                "task {} interval of {} days runs past the calendar",
                task.id, task.interval_days
            ))
        })?;
    set_next_due_date(conn, task.id, next)?;
    record(conn, clock, actor, task.company_id, "preventive_tasks", task.id, "update")?;
    info!(task_id = task.id, next_due_date = %next, "Preventive task rescheduled");
    Ok(())
}

pub fn start_work_order(
    conn: &mut SqliteConnection,
    clock: &impl Clock,
    actor: &Actor,
    work_order_id: i32,
) -> Result<WorkOrder> {
    transition(conn, clock, actor, work_order_id, Ability::Complete, WorkOrderStatus::InProgress)
}

/// Completes the work order. For a preventive work order the source task's
/// `next_due_date` moves to the completion date plus its interval.
pub fn complete_work_order(
    conn: &mut SqliteConnection,
    clock: &impl Clock,
    actor: &Actor,
    work_order_id: i32,
) -> Result<WorkOrder> {
    transition(conn, clock, actor, work_order_id, Ability::Complete, WorkOrderStatus::Completed)
}

/// Operators may cancel breakdowns they reported themselves.
pub fn cancel_work_order(
    conn: &mut SqliteConnection,
    clock: &impl Clock,
    actor: &Actor,
    work_order_id: i32,
) -> Result<WorkOrder> {
    transition(conn, clock, actor, work_order_id, Ability::Update, WorkOrderStatus::Cancelled)
}

/// Work orders the actor may see: the whole tenant from technician up,
/// only their own reports for operators, everything for a super admin.
pub fn list_work_orders_for(conn: &mut SqliteConnection, actor: &Actor) -> Result<Vec<WorkOrder>> {
    authorize(WORK_ORDER.view_any(actor))?;
    let creator = actor.role.is_operator().then_some(actor.id);
    let work_orders = list_work_orders(conn, actor.tenant_filter(), creator)?;
    Ok(work_orders
        .into_iter()
        .filter(|wo| WORK_ORDER.view(actor, wo))
        .collect())
}

pub fn list_machines_for(conn: &mut SqliteConnection, actor: &Actor) -> Result<Vec<Machine>> {
    authorize(MACHINE.view_any(actor))?;
    let machines = list_machines(conn, actor.tenant_filter())?;
    Ok(machines.into_iter().filter(|m| MACHINE.view(actor, m)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::models::WorkOrderType;
    use crate::orm::entity_activity::get_entity_activity_history;
    use crate::orm::testing::*;
    use crate::policy::Role;

    fn breakdown(machine_id: i32) -> WorkOrderInput {
        WorkOrderInput {
            machine_id,
            work_order_type: WorkOrderType::Breakdown,
            title: "Belt snapped".to_string(),
            description: None,
            assigned_to: None,
        }
    }

    #[test]
    fn test_create_records_creator_and_audit() {
        let mut conn = setup_test_db();
        let company = create_company(&mut conn, "Acme");
        let operator = create_actor(&mut conn, company.id, Role::Operator, "op@acme.test");
        let machine = create_machine(&mut conn, company.id, "Conveyor");
        let clock = FixedClock(at(2025, 3, 1, 8));

        let wo = create_work_order(&mut conn, &clock, &operator, breakdown(machine.id)).unwrap();
        assert_eq!(wo.created_by, Some(operator.id));
        assert_eq!(wo.company_id, company.id);
        assert_eq!(wo.created_at, at(2025, 3, 1, 8));

        let history = get_entity_activity_history(&mut conn, "work_orders", wo.id).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].user_id, Some(operator.id));
    }

    #[test]
    fn test_foreign_machine_is_forbidden() {
        let mut conn = setup_test_db();
        let acme = create_company(&mut conn, "Acme");
        let other = create_company(&mut conn, "Other");
        let tech = create_actor(&mut conn, acme.id, Role::Technician, "t@acme.test");
        let foreign = create_machine(&mut conn, other.id, "Mill");
        let clock = FixedClock(at(2025, 3, 1, 8));

        let result = create_work_order(&mut conn, &clock, &tech, breakdown(foreign.id));
        assert!(matches!(result, Err(Error::Forbidden)));
        assert!(list_work_orders(&mut conn, None, None).unwrap().is_empty());
    }

    #[test]
    fn test_terminal_work_order_rejects_changes() {
        let mut conn = setup_test_db();
        let company = create_company(&mut conn, "Acme");
        let tech = create_actor(&mut conn, company.id, Role::Technician, "t@acme.test");
        let manager = create_actor(&mut conn, company.id, Role::Manager, "m@acme.test");
        let machine = create_machine(&mut conn, company.id, "Conveyor");
        let clock = FixedClock(at(2025, 3, 1, 8));

        let wo = create_work_order(&mut conn, &clock, &tech, breakdown(machine.id)).unwrap();
        cancel_work_order(&mut conn, &clock, &tech, wo.id).unwrap();

        assert!(matches!(
            start_work_order(&mut conn, &clock, &tech, wo.id),
            Err(Error::InvalidTransition { .. })
        ));
        assert!(matches!(
            assign_work_order(&mut conn, &clock, &manager, wo.id, Some(tech.id)),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_assignee_must_share_company() {
        let mut conn = setup_test_db();
        let acme = create_company(&mut conn, "Acme");
        let other = create_company(&mut conn, "Other");
        let manager = create_actor(&mut conn, acme.id, Role::Manager, "m@acme.test");
        let outsider = create_user(&mut conn, other.id, Role::Technician, "t@other.test");
        let machine = create_machine(&mut conn, acme.id, "Conveyor");
        let clock = FixedClock(at(2025, 3, 1, 8));

        let wo = create_work_order(&mut conn, &clock, &manager, breakdown(machine.id)).unwrap();
        let result = assign_work_order(&mut conn, &clock, &manager, wo.id, Some(outsider.id));
        assert!(matches!(result, Err(Error::Validation(_))));
        assert_eq!(get_work_order(&mut conn, wo.id).unwrap().unwrap().assigned_to, None);
    }

    #[test]
    fn test_unrepresentable_next_due_date_rolls_back_completion() {
        let mut conn = setup_test_db();
        let company = create_company(&mut conn, "Acme");
        let tech = create_actor(&mut conn, company.id, Role::Technician, "t@acme.test");
        let machine = create_machine(&mut conn, company.id, "Conveyor");
        let task = create_task(&mut conn, &machine, date(2025, 3, 1), Some(tech.id));
        diesel::update(crate::schema::preventive_tasks::table.find(task.id))
            .set(crate::schema::preventive_tasks::interval_days.eq(i32::MAX))
            .execute(&mut conn)
            .unwrap();
        let clock = FixedClock(at(2025, 3, 1, 8));

        let wo = insert_work_order(
            &mut conn,
            NewWorkOrder {
                company_id: company.id,
                machine_id: machine.id,
                preventive_task_id: Some(task.id),
                work_order_type: WorkOrderType::Preventive.as_str().to_string(),
                status: WorkOrderStatus::InProgress.as_str().to_string(),
                title: task.name.clone(),
                description: None,
                created_by: None,
                assigned_to: Some(tech.id),
                created_at: at(2025, 3, 1, 6),
            },
        )
        .unwrap();

        let result = complete_work_order(&mut conn, &clock, &tech, wo.id);
        assert!(matches!(result, Err(Error::Validation(_))));

        let reloaded = get_work_order(&mut conn, wo.id).unwrap().unwrap();
        assert_eq!(reloaded.status, "in_progress");
        assert!(reloaded.completed_at.is_none());
        let task = get_preventive_task(&mut conn, task.id).unwrap().unwrap();
        assert_eq!(task.next_due_date, date(2025, 3, 1));
    }

    #[test]
    fn test_super_admin_lists_every_company() {
        let mut conn = setup_test_db();
        let acme = create_company(&mut conn, "Acme");
        let other = create_company(&mut conn, "Other");
        let root = create_actor(&mut conn, acme.id, Role::SuperAdmin, "root@acme.test");
        let tech = create_actor(&mut conn, acme.id, Role::Technician, "t@acme.test");
        create_machine(&mut conn, acme.id, "Conveyor");
        create_machine(&mut conn, other.id, "Mill");

        assert_eq!(list_machines_for(&mut conn, &root).unwrap().len(), 2);
        assert_eq!(list_machines_for(&mut conn, &tech).unwrap().len(), 1);
    }
}
