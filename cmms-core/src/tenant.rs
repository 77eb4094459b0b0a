//! Resolves the acting user for a request or console command.

use diesel::sqlite::SqliteConnection;

use crate::error::{Error, Result};
use crate::orm::user::get_user;
use crate::policy::Actor;

/// Loads the user with `user_id` as an [`Actor`]. Role and company come
/// from the database, never from the caller.
pub fn load_actor(conn: &mut SqliteConnection, user_id: i32) -> Result<Actor> {
    let user = get_user(conn, user_id)?.ok_or_else(|| Error::not_found("user", user_id))?;
    user.to_actor().map_err(Error::Validation)
}

/// Turns a lookup result into the resource, `NotFound` when absent.
pub(crate) fn require<T>(found: Option<T>, entity: &'static str, id: i32) -> Result<T> {
    found.ok_or_else(|| Error::not_found(entity, id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orm::testing::{create_company, create_user, setup_test_db};
    use crate::policy::Role;

    #[test]
    fn test_actor_carries_stored_role_and_company() {
        let mut conn = setup_test_db();
        let company = create_company(&mut conn, "Acme");
        let user = create_user(&mut conn, company.id, Role::Technician, "t@acme.test");

        let actor = load_actor(&mut conn, user.id).unwrap();
        assert_eq!(actor, Actor::new(user.id, company.id, Role::Technician));
        assert!(matches!(load_actor(&mut conn, 999), Err(Error::NotFound { .. })));
    }
}
