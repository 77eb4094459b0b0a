use diesel::prelude::*;

use super::db::last_insert_id;
use crate::models::{Company, NewCompany};

/// Insert a new company and return it.
pub fn insert_company(
    conn: &mut SqliteConnection,
    comp_name: String,
) -> Result<Company, diesel::result::Error> {
    use crate::schema::companies::dsl::*;

    diesel::insert_into(companies)
        .values(&NewCompany { name: comp_name })
        .execute(conn)?;

    let last_id = last_insert_id(conn)?;
    companies.filter(id.eq(last_id)).first::<Company>(conn)
}

pub fn get_company_by_id(
    conn: &mut SqliteConnection,
    company_id: i32,
) -> Result<Option<Company>, diesel::result::Error> {
    use crate::schema::companies::dsl::*;
    companies
        .filter(id.eq(company_id))
        .first::<Company>(conn)
        .optional()
}

/// Try to find a company by name (case-insensitive).
/// Returns Ok(Some(Company)) if found, Ok(None) if not, Err on DB error.
pub fn get_company_by_name_case_insensitive(
    conn: &mut SqliteConnection,
    company_name: &str,
) -> Result<Option<Company>, diesel::result::Error> {
    diesel::sql_query("SELECT * FROM companies WHERE LOWER(name) = LOWER(?)")
        .bind::<diesel::sql_types::Text, _>(company_name)
        .get_result::<Company>(conn)
        .optional()
}

/// All companies ordered by id. Jobs iterate tenants in this order.
pub fn get_all_companies(conn: &mut SqliteConnection) -> Result<Vec<Company>, diesel::result::Error> {
    use crate::schema::companies::dsl::*;
    companies.order(id.asc()).load::<Company>(conn)
}
