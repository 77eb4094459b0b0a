use clap::Subcommand;
use diesel::sqlite::SqliteConnection;

use cmms_core::clock::{Clock, SystemClock};
use cmms_core::orm::company::{get_all_companies, get_company_by_name_case_insensitive, insert_company};
use cmms_core::orm::entity_activity::log_activity;
use cmms_core::orm::user::get_users_by_company;

use super::utils::filter_by_term;

#[derive(Subcommand)]
pub enum CompanyAction {
    #[command(about = "List companies, optionally filtered by search term")]
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
    #[command(about = "Add a new company", alias = "create")]
    Add {
        #[arg(short, long, help = "Company name")]
        name: String,
    },
}

pub fn handle_company_command_with_conn(
    conn: &mut SqliteConnection,
    action: CompanyAction,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        CompanyAction::Ls { search_term, fixed_string } => {
            company_ls_impl(conn, search_term, fixed_string)?;
        }
        CompanyAction::Add { name } => {
            company_add_impl(conn, name)?;
        }
    }
    Ok(())
}

pub fn company_ls_impl(
    conn: &mut SqliteConnection,
    search_term: Option<String>,
    fixed_string: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let companies = get_all_companies(conn)?;
    let filtered_companies = filter_by_term(companies, search_term, fixed_string, |c| c.name.as_str())?;

    if filtered_companies.is_empty() {
        println!("No companies found.");
    } else {
        println!("Companies:");
        for company in filtered_companies {
            let users = get_users_by_company(conn, company.id)?;
            println!("  ID: {}, Name: {}, Users: {}", company.id, company.name, users.len());
        }
    }

    Ok(())
}

pub fn company_add_impl(
    conn: &mut SqliteConnection,
    name: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err("Company name cannot be empty".into());
    }

    if let Some(existing_company) = get_company_by_name_case_insensitive(conn, &name)? {
        println!("Company already exists!");
        println!("ID: {}", existing_company.id);
        println!("Name: {}", existing_company.name);
        return Ok(());
    }

    let created_company = insert_company(conn, name)?;
    log_activity(
        conn,
        Some(created_company.id),
        "companies",
        created_company.id,
        "create",
        None,
        SystemClock.now(),
    )?;

    println!("Company created successfully!");
    println!("ID: {}", created_company.id);
    println!("Name: {}", created_company.name);

    Ok(())
}
