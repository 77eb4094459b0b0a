use diesel::{Identifiable, Insertable, Queryable, QueryableByName, Selectable};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Queryable, Selectable, Identifiable, QueryableByName, Debug, Clone, Serialize)]
#[diesel(table_name = crate::schema::companies)]
pub struct Company {
    pub id: i32,
    pub name: String,
}

#[derive(Insertable, Debug, Deserialize)]
#[diesel(table_name = crate::schema::companies)]
pub struct NewCompany {
    pub name: String,
}
