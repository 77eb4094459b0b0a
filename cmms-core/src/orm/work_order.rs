use chrono::NaiveDateTime;
use diesel::dsl::exists;
use diesel::prelude::*;

use super::db::last_insert_id;
use crate::models::{NewWorkOrder, WorkOrder, WorkOrderStatus};

pub fn insert_work_order(
    conn: &mut SqliteConnection,
    new_work_order: NewWorkOrder,
) -> Result<WorkOrder, diesel::result::Error> {
    use crate::schema::work_orders::dsl::*;

    diesel::insert_into(work_orders).values(&new_work_order).execute(conn)?;

    let last_id = last_insert_id(conn)?;
    work_orders.filter(id.eq(last_id)).first::<WorkOrder>(conn)
}

pub fn get_work_order(
    conn: &mut SqliteConnection,
    work_order_id: i32,
) -> Result<Option<WorkOrder>, diesel::result::Error> {
    use crate::schema::work_orders::dsl::*;
    work_orders
        .filter(id.eq(work_order_id))
        .first::<WorkOrder>(conn)
        .optional()
}

/// True when the task already has an open or in-progress work order.
pub fn has_unresolved_work_order(
    conn: &mut SqliteConnection,
    task_id: i32,
) -> Result<bool, diesel::result::Error> {
    use crate::schema::work_orders::dsl::*;

    let unresolved: Vec<&str> = WorkOrderStatus::UNRESOLVED.iter().map(|s| s.as_str()).collect();
    diesel::select(exists(
        work_orders
            .filter(preventive_task_id.eq(task_id))
            .filter(status.eq_any(unresolved)),
    ))
    .get_result(conn)
}

/// Work orders generated from one preventive task, oldest first.
pub fn get_work_orders_for_task(
    conn: &mut SqliteConnection,
    task_id: i32,
) -> Result<Vec<WorkOrder>, diesel::result::Error> {
    use crate::schema::work_orders::dsl::*;
    work_orders
        .filter(preventive_task_id.eq(task_id))
        .order(id.asc())
        .load::<WorkOrder>(conn)
}

/// Lists work orders under a tenant filter, optionally narrowed to those a
/// given user created.
pub fn list_work_orders(
    conn: &mut SqliteConnection,
    tenant: Option<i32>,
    creator: Option<i32>,
) -> Result<Vec<WorkOrder>, diesel::result::Error> {
    use crate::schema::work_orders::dsl::*;

    let mut query = work_orders.into_boxed();
    if let Some(target_company_id) = tenant {
        query = query.filter(company_id.eq(target_company_id));
    }
    if let Some(user_id) = creator {
        query = query.filter(created_by.eq(user_id));
    }
    query.order(id.asc()).load::<WorkOrder>(conn)
}

pub fn update_status(
    conn: &mut SqliteConnection,
    work_order_id: i32,
    new_status: WorkOrderStatus,
    completed: Option<NaiveDateTime>,
) -> Result<WorkOrder, diesel::result::Error> {
    use crate::schema::work_orders::dsl::*;

    diesel::update(work_orders.filter(id.eq(work_order_id)))
        .set((status.eq(new_status.as_str()), completed_at.eq(completed)))
        .execute(conn)?;
    work_orders.filter(id.eq(work_order_id)).first::<WorkOrder>(conn)
}

pub fn set_assignee(
    conn: &mut SqliteConnection,
    work_order_id: i32,
    assignee: Option<i32>,
) -> Result<WorkOrder, diesel::result::Error> {
    use crate::schema::work_orders::dsl::*;

    diesel::update(work_orders.filter(id.eq(work_order_id)))
        .set(assigned_to.eq(assignee))
        .execute(conn)?;
    work_orders.filter(id.eq(work_order_id)).first::<WorkOrder>(conn)
}
