use chrono::NaiveDateTime;
use diesel::prelude::*;

use super::db::last_insert_id;
use crate::models::{EntityActivity, NewEntityActivity};

/// Log an activity for an entity.
pub fn log_activity(
    conn: &mut SqliteConnection,
    company_id_val: Option<i32>,
    table_name_val: &str,
    entity_id_val: i32,
    operation_type_val: &str,
    user_id_val: Option<i32>,
    at: NaiveDateTime,
) -> Result<EntityActivity, diesel::result::Error> {
    use crate::schema::entity_activity::dsl::*;

    let new_activity = NewEntityActivity {
        company_id: company_id_val,
        table_name: table_name_val.to_string(),
        entity_id: entity_id_val,
        operation_type: operation_type_val.to_string(),
        timestamp: at,
        user_id: user_id_val,
    };

    diesel::insert_into(entity_activity)
        .values(&new_activity)
        .execute(conn)?;

    let last_id = last_insert_id(conn)?;
    entity_activity
        .filter(id.eq(last_id))
        .first::<EntityActivity>(conn)
}

/// Get all activity for a specific entity, oldest first.
pub fn get_entity_activity_history(
    conn: &mut SqliteConnection,
    table_name_val: &str,
    entity_id_val: i32,
) -> Result<Vec<EntityActivity>, diesel::result::Error> {
    use crate::schema::entity_activity::dsl::*;

    entity_activity
        .filter(table_name.eq(table_name_val))
        .filter(entity_id.eq(entity_id_val))
        .order(id.asc())
        .load::<EntityActivity>(conn)
}

/// Activity of one company (or every company for `None`), newest first.
pub fn get_company_activity(
    conn: &mut SqliteConnection,
    tenant: Option<i32>,
    limit_val: i64,
) -> Result<Vec<EntityActivity>, diesel::result::Error> {
    use crate::schema::entity_activity::dsl::*;

    let mut query = entity_activity.into_boxed();
    if let Some(target_company_id) = tenant {
        query = query.filter(company_id.eq(target_company_id));
    }
    query
        .order(id.desc())
        .limit(limit_val)
        .load::<EntityActivity>(conn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orm::testing::*;

    #[test]
    fn test_history_is_per_entity_and_ordered() {
        let mut conn = setup_test_db();
        let company = create_company(&mut conn, "Acme");
        let when = at(2025, 3, 1, 6);

        log_activity(&mut conn, Some(company.id), "work_orders", 1, "create", None, when).unwrap();
        log_activity(&mut conn, Some(company.id), "work_orders", 2, "create", None, when).unwrap();
        log_activity(&mut conn, Some(company.id), "work_orders", 1, "update", None, when).unwrap();

        let history = get_entity_activity_history(&mut conn, "work_orders", 1).unwrap();
        let ops: Vec<&str> = history.iter().map(|a| a.operation_type.as_str()).collect();
        assert_eq!(ops, vec!["create", "update"]);

        let recent = get_company_activity(&mut conn, Some(company.id), 2).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].operation_type, "update");
    }

    #[test]
    fn test_unknown_operation_rejected() {
        let mut conn = setup_test_db();
        let result = log_activity(&mut conn, None, "machines", 1, "purge", None, at(2025, 1, 1, 0));
        assert!(result.is_err());
    }
}
