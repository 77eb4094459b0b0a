use chrono::NaiveDateTime;
use diesel::{Identifiable, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};

use crate::schema::entity_activity;

/// One audit-log entry: who did what to which row, and when.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone, Serialize, Deserialize)]
#[diesel(table_name = entity_activity)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct EntityActivity {
    pub id: i32,
    pub company_id: Option<i32>,
    pub table_name: String,
    pub entity_id: i32,
    pub operation_type: String,
    pub timestamp: NaiveDateTime,
    pub user_id: Option<i32>,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = entity_activity)]
pub struct NewEntityActivity {
    pub company_id: Option<i32>,
    pub table_name: String,
    pub entity_id: i32,
    pub operation_type: String,
    pub timestamp: NaiveDateTime,
    pub user_id: Option<i32>,
}
