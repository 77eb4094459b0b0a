use diesel::prelude::*;

use super::db::last_insert_id;
use crate::models::{Machine, NewMachine};

pub fn insert_machine(
    conn: &mut SqliteConnection,
    new_machine: NewMachine,
) -> Result<Machine, diesel::result::Error> {
    use crate::schema::machines::dsl::*;

    diesel::insert_into(machines).values(&new_machine).execute(conn)?;

    let last_id = last_insert_id(conn)?;
    machines.filter(id.eq(last_id)).first::<Machine>(conn)
}

pub fn get_machine(
    conn: &mut SqliteConnection,
    machine_id: i32,
) -> Result<Option<Machine>, diesel::result::Error> {
    use crate::schema::machines::dsl::*;
    machines.filter(id.eq(machine_id)).first::<Machine>(conn).optional()
}

/// Machines visible under a tenant filter; `None` lists every company's.
pub fn list_machines(
    conn: &mut SqliteConnection,
    tenant: Option<i32>,
) -> Result<Vec<Machine>, diesel::result::Error> {
    use crate::schema::machines::dsl::*;

    let mut query = machines.into_boxed();
    if let Some(target_company_id) = tenant {
        query = query.filter(company_id.eq(target_company_id));
    }
    query.order(id.asc()).load::<Machine>(conn)
}
