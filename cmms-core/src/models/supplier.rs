use diesel::{Identifiable, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};

use crate::schema::suppliers;

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, Serialize, Deserialize)]
#[diesel(table_name = suppliers)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Supplier {
    pub id: i32,
    pub company_id: i32,
    pub name: String,
    pub email: Option<String>,
    pub is_active: bool,
}

#[derive(Insertable, Debug, Deserialize)]
#[diesel(table_name = suppliers)]
pub struct NewSupplier {
    pub company_id: i32,
    pub name: String,
    pub email: Option<String>,
    pub is_active: bool,
}
