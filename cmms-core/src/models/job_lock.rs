use chrono::NaiveDateTime;
use diesel::{Insertable, Queryable, Selectable};
use serde::Serialize;

use crate::schema::job_locks;

#[derive(Queryable, Selectable, Insertable, Debug, Clone, Serialize)]
#[diesel(table_name = job_locks)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct JobLock {
    pub job_name: String,
    pub owner: String,
    pub acquired_at: NaiveDateTime,
}
