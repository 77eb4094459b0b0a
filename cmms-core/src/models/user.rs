use diesel::{Identifiable, Insertable, Queryable, QueryableByName, Selectable};
use serde::{Deserialize, Serialize};

use crate::policy::{Actor, Role};
use crate::schema::users;

#[derive(Deserialize, Queryable, Selectable, Identifiable, QueryableByName, Debug, Clone, Serialize)]
#[diesel(table_name = users)]
pub struct User {
    pub id: i32,
    pub email: String, // Will be unique
    pub password_hash: String,
    pub company_id: i32,
    pub role: String,
}

impl User {
    /// Parses the stored role. The column carries a CHECK constraint, so an
    /// unknown value means the row was written outside this crate.
    pub fn role(&self) -> Result<Role, String> {
        self.role.parse()
    }

    pub fn to_actor(&self) -> Result<Actor, String> {
        Ok(Actor {
            id: self.id,
            company_id: self.company_id,
            role: self.role()?,
        })
    }
}

#[derive(Insertable, Deserialize)]
#[diesel(table_name = users)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub company_id: i32,
    pub role: String,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct UserInput {
    pub email: String,
    pub password_hash: String,
    pub company_id: i32,
    pub role: Role,
}
