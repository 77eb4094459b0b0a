use diesel::{Identifiable, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};

use crate::schema::machines;

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, Serialize, Deserialize)]
#[diesel(table_name = machines)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Machine {
    pub id: i32,
    pub company_id: i32,
    pub name: String,
    pub code: Option<String>,
    pub is_active: bool,
}

#[derive(Insertable, Debug, Deserialize)]
#[diesel(table_name = machines)]
pub struct NewMachine {
    pub company_id: i32,
    pub name: String,
    pub code: Option<String>,
    pub is_active: bool,
}
