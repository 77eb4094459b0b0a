use std::io::{self, Write};

use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Argon2, PasswordHasher};
use clap::Subcommand;
use diesel::sqlite::SqliteConnection;
use rpassword::read_password;

use cmms_core::clock::{Clock, SystemClock};
use cmms_core::models::UserInput;
use cmms_core::orm::company::get_company_by_id;
use cmms_core::orm::entity_activity::log_activity;
use cmms_core::orm::user::{get_user_by_email, insert_user, list_all_users};
use cmms_core::policy::Role;

use super::utils::{filter_by_term, resolve_company_id};

#[derive(Subcommand)]
pub enum UserAction {
    #[command(about = "Add a new user", alias = "create")]
    Add {
        #[arg(short, long, help = "Email address")]
        email: String,
        #[arg(short, long, help = "Password (will be prompted securely if not provided)")]
        password: Option<String>,
        #[arg(short, long, help = "Company ID or name")]
        company: String,
        #[arg(
            short,
            long,
            default_value = "operator",
            help = "Role: operator, technician, manager or super_admin"
        )]
        role: String,
    },
    #[command(about = "List users, optionally filtered by search term")]
    Ls {
        #[arg(help = "Search term (regex by default, use -F for fixed string)")]
        search_term: Option<String>,
        #[arg(
            short = 'F',
            long = "fixed-string",
            help = "Treat search term as fixed string instead of regex"
        )]
        fixed_string: bool,
    },
}

pub fn handle_user_command_with_conn(
    conn: &mut SqliteConnection,
    action: UserAction,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        UserAction::Add {
            email,
            password,
            company,
            role,
        } => {
            let password = match password {
                Some(p) => p,
                None => prompt_for_password()?,
            };
            add_user_impl(conn, &email, &password, &company, &role)?;
        }
        UserAction::Ls { search_term, fixed_string } => {
            list_users_impl(conn, search_term, fixed_string)?;
        }
    }
    Ok(())
}

pub fn add_user_impl(
    conn: &mut SqliteConnection,
    email: &str,
    password: &str,
    company: &str,
    role: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let role: Role = role.parse()?;
    let company_id = resolve_company_id(conn, company)?;

    if password.is_empty() {
        return Err("Password cannot be empty".into());
    }
    if get_user_by_email(conn, email)?.is_some() {
        return Err(format!("User with email '{}' already exists", email).into());
    }

    let password_hash =
        hash_password(password).map_err(|e| format!("Failed to hash password: {}", e))?;

    let user = insert_user(
        conn,
        UserInput {
            email: email.to_string(),
            password_hash,
            company_id,
            role,
        },
    )?;
    log_activity(conn, Some(company_id), "users", user.id, "create", None, SystemClock.now())?;

    println!("User created successfully!");
    println!("ID: {}", user.id);
    println!("Email: {}", user.email);
    println!("Company ID: {}", user.company_id);
    println!("Role: {}", user.role);

    Ok(())
}

pub fn list_users_impl(
    conn: &mut SqliteConnection,
    search_term: Option<String>,
    fixed_string: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let users = list_all_users(conn)?;
    let filtered_users = filter_by_term(users, search_term, fixed_string, |u| u.email.as_str())?;

    if filtered_users.is_empty() {
        println!("No users found.");
        return Ok(());
    }

    println!("Users:");
    for user in filtered_users {
        let company_name = get_company_by_id(conn, user.company_id)?
            .map(|c| c.name)
            .unwrap_or_else(|| "Unknown".to_string());
        println!(
            "  ID: {}, Email: {}, Company: {}, Role: {}",
            user.id, user.email, company_name, user.role
        );
    }

    Ok(())
}

pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(password_hash.to_string())
}

pub fn prompt_for_password() -> Result<String, Box<dyn std::error::Error>> {
    print!("Enter new password: ");
    io::stdout().flush()?;
    let password = read_password()?;

    if password.is_empty() {
        return Err("Password cannot be empty".into());
    }

    print!("Confirm new password: ");
    io::stdout().flush()?;
    let confirm_password = read_password()?;

    if password != confirm_password {
        return Err("Passwords do not match".into());
    }

    Ok(password)
}

#[cfg(test)]
mod tests {
    use super::*;
    use argon2::{PasswordHash, PasswordVerifier};
    use cmms_core::orm::company::insert_company;
    use cmms_core::orm::establish_connection;

    #[test]
    fn test_add_user_by_company_name() {
        let mut conn = establish_connection(":memory:").unwrap();
        let company = insert_company(&mut conn, "Acme".to_string()).unwrap();

        add_user_impl(&mut conn, "tech@acme.test", "s3cret", "ACME", "technician").unwrap();

        let user = get_user_by_email(&mut conn, "tech@acme.test").unwrap().unwrap();
        assert_eq!(user.company_id, company.id);
        assert_eq!(user.role().unwrap(), Role::Technician);
        let parsed = PasswordHash::new(&user.password_hash).unwrap();
        assert!(Argon2::default().verify_password(b"s3cret", &parsed).is_ok());
    }

    #[test]
    fn test_add_user_rejects_bad_input() {
        let mut conn = establish_connection(":memory:").unwrap();
        insert_company(&mut conn, "Acme".to_string()).unwrap();

        assert!(add_user_impl(&mut conn, "a@acme.test", "pw", "Acme", "admin").is_err());
        assert!(add_user_impl(&mut conn, "a@acme.test", "pw", "Globex", "manager").is_err());
        assert!(add_user_impl(&mut conn, "a@acme.test", "", "Acme", "manager").is_err());

        add_user_impl(&mut conn, "a@acme.test", "pw", "Acme", "manager").unwrap();
        assert!(add_user_impl(&mut conn, "a@acme.test", "pw", "Acme", "manager").is_err());
        assert_eq!(list_all_users(&mut conn).unwrap().len(), 1);
    }
}
