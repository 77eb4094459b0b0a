use chrono::NaiveDateTime;
use diesel::{AsChangeset, Identifiable, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};

use crate::schema::technician_availabilities;

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, Serialize, Deserialize)]
#[diesel(table_name = technician_availabilities)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TechnicianAvailability {
    pub id: i32,
    pub company_id: i32,
    pub technician_id: i32,
    pub starts_at: NaiveDateTime,
    pub ends_at: NaiveDateTime,
    pub note: Option<String>,
}

#[derive(Insertable, Debug, Deserialize)]
#[diesel(table_name = technician_availabilities)]
pub struct NewTechnicianAvailability {
    pub company_id: i32,
    pub technician_id: i32,
    pub starts_at: NaiveDateTime,
    pub ends_at: NaiveDateTime,
    pub note: Option<String>,
}

/// Partial update; `None` leaves a column untouched.
#[derive(AsChangeset, Debug, Default, Deserialize)]
#[diesel(table_name = technician_availabilities)]
pub struct UpdateTechnicianAvailability {
    pub starts_at: Option<NaiveDateTime>,
    pub ends_at: Option<NaiveDateTime>,
    pub note: Option<Option<String>>,
}
