use diesel::prelude::*;

use super::db::last_insert_id;
use crate::models::{NewUser, User, UserInput};
use crate::policy::Role;

/// Insert a new user and return it.
pub fn insert_user(
    conn: &mut SqliteConnection,
    new_user: UserInput,
) -> Result<User, diesel::result::Error> {
    use crate::schema::users::dsl::*;

    let row = NewUser {
        email: new_user.email,
        password_hash: new_user.password_hash,
        company_id: new_user.company_id,
        role: new_user.role.as_str().to_string(),
    };

    diesel::insert_into(users).values(&row).execute(conn)?;

    let last_id = last_insert_id(conn)?;
    users.filter(id.eq(last_id)).first::<User>(conn)
}

pub fn get_user(
    conn: &mut SqliteConnection,
    user_id: i32,
) -> Result<Option<User>, diesel::result::Error> {
    use crate::schema::users::dsl::*;
    users.filter(id.eq(user_id)).first::<User>(conn).optional()
}

pub fn get_user_by_email(
    conn: &mut SqliteConnection,
    email_val: &str,
) -> Result<Option<User>, diesel::result::Error> {
    use crate::schema::users::dsl::*;
    users.filter(email.eq(email_val)).first::<User>(conn).optional()
}

/// Users of one company, lowest id first.
pub fn get_users_by_company(
    conn: &mut SqliteConnection,
    target_company_id: i32,
) -> Result<Vec<User>, diesel::result::Error> {
    use crate::schema::users::dsl::*;
    users
        .filter(company_id.eq(target_company_id))
        .order(id.asc())
        .load::<User>(conn)
}

/// Users of one company holding exactly `target_role`, lowest id first.
pub fn get_users_by_company_and_role(
    conn: &mut SqliteConnection,
    target_company_id: i32,
    target_role: Role,
) -> Result<Vec<User>, diesel::result::Error> {
    use crate::schema::users::dsl::*;
    users
        .filter(company_id.eq(target_company_id))
        .filter(role.eq(target_role.as_str()))
        .order(id.asc())
        .load::<User>(conn)
}

pub fn list_all_users(conn: &mut SqliteConnection) -> Result<Vec<User>, diesel::result::Error> {
    use crate::schema::users::dsl::*;
    users.order(id.asc()).load::<User>(conn)
}
