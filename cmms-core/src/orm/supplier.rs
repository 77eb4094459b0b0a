use diesel::prelude::*;

use super::db::last_insert_id;
use crate::models::{NewSupplier, Supplier};

pub fn insert_supplier(
    conn: &mut SqliteConnection,
    new_supplier: NewSupplier,
) -> Result<Supplier, diesel::result::Error> {
    use crate::schema::suppliers::dsl::*;

    diesel::insert_into(suppliers).values(&new_supplier).execute(conn)?;

    let last_id = last_insert_id(conn)?;
    suppliers.filter(id.eq(last_id)).first::<Supplier>(conn)
}

pub fn get_supplier(
    conn: &mut SqliteConnection,
    supplier_id: i32,
) -> Result<Option<Supplier>, diesel::result::Error> {
    use crate::schema::suppliers::dsl::*;
    suppliers.filter(id.eq(supplier_id)).first::<Supplier>(conn).optional()
}
