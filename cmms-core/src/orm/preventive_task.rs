use chrono::NaiveDate;
use diesel::prelude::*;

use super::db::last_insert_id;
use crate::models::{NewPreventiveTask, PreventiveTask};

pub fn insert_preventive_task(
    conn: &mut SqliteConnection,
    new_task: NewPreventiveTask,
) -> Result<PreventiveTask, diesel::result::Error> {
    use crate::schema::preventive_tasks::dsl::*;

    diesel::insert_into(preventive_tasks).values(&new_task).execute(conn)?;

    let last_id = last_insert_id(conn)?;
    preventive_tasks
        .filter(id.eq(last_id))
        .first::<PreventiveTask>(conn)
}

pub fn get_preventive_task(
    conn: &mut SqliteConnection,
    task_id: i32,
) -> Result<Option<PreventiveTask>, diesel::result::Error> {
    use crate::schema::preventive_tasks::dsl::*;
    preventive_tasks
        .filter(id.eq(task_id))
        .first::<PreventiveTask>(conn)
        .optional()
}

/// Active tasks with `next_due_date <= due_by`, optionally for one company,
/// lowest id first.
pub fn get_due_tasks(
    conn: &mut SqliteConnection,
    due_by: NaiveDate,
    tenant: Option<i32>,
) -> Result<Vec<PreventiveTask>, diesel::result::Error> {
    use crate::schema::preventive_tasks::dsl::*;

    let mut query = preventive_tasks
        .filter(is_active.eq(true))
        .filter(next_due_date.le(due_by))
        .into_boxed();
    if let Some(target_company_id) = tenant {
        query = query.filter(company_id.eq(target_company_id));
    }
    query.order(id.asc()).load::<PreventiveTask>(conn)
}

/// Active tasks whose due date is strictly before `today`.
pub fn get_overdue_tasks(
    conn: &mut SqliteConnection,
    today: NaiveDate,
    tenant: Option<i32>,
) -> Result<Vec<PreventiveTask>, diesel::result::Error> {
    use crate::schema::preventive_tasks::dsl::*;

    let mut query = preventive_tasks
        .filter(is_active.eq(true))
        .filter(next_due_date.lt(today))
        .into_boxed();
    if let Some(target_company_id) = tenant {
        query = query.filter(company_id.eq(target_company_id));
    }
    query.order(id.asc()).load::<PreventiveTask>(conn)
}

pub fn set_next_due_date(
    conn: &mut SqliteConnection,
    task_id: i32,
    due: NaiveDate,
) -> Result<PreventiveTask, diesel::result::Error> {
    use crate::schema::preventive_tasks::dsl::*;

    diesel::update(preventive_tasks.filter(id.eq(task_id)))
        .set(next_due_date.eq(due))
        .execute(conn)?;
    preventive_tasks
        .filter(id.eq(task_id))
        .first::<PreventiveTask>(conn)
}

pub fn set_active(
    conn: &mut SqliteConnection,
    task_id: i32,
    active: bool,
) -> Result<PreventiveTask, diesel::result::Error> {
    use crate::schema::preventive_tasks::dsl::*;

    diesel::update(preventive_tasks.filter(id.eq(task_id)))
        .set(is_active.eq(active))
        .execute(conn)?;
    preventive_tasks
        .filter(id.eq(task_id))
        .first::<PreventiveTask>(conn)
}
