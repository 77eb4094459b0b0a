use chrono::NaiveDate;
use diesel::{Associations, Identifiable, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};

use crate::schema::preventive_tasks;

/// A recurring maintenance definition. `next_due_date` advances by
/// `interval_days` whenever a linked preventive work order completes;
/// deactivating the task stops generation without deleting history.
#[derive(Queryable, Selectable, Identifiable, Associations, Debug, Clone, Serialize, Deserialize)]
#[diesel(belongs_to(crate::models::machine::Machine))]
#[diesel(table_name = preventive_tasks)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PreventiveTask {
    pub id: i32,
    pub company_id: i32,
    pub machine_id: i32,
    pub name: String,
    pub interval_days: i32,
    pub next_due_date: NaiveDate,
    pub assigned_to: Option<i32>,
    pub is_active: bool,
    pub created_by: Option<i32>,
}

#[derive(Insertable, Debug, Deserialize)]
#[diesel(table_name = preventive_tasks)]
pub struct NewPreventiveTask {
    pub company_id: i32,
    pub machine_id: i32,
    pub name: String,
    pub interval_days: i32,
    pub next_due_date: NaiveDate,
    pub assigned_to: Option<i32>,
    pub is_active: bool,
    pub created_by: Option<i32>,
}
