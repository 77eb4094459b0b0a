use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use chrono::{NaiveDate, NaiveDateTime};
use diesel::sqlite::SqliteConnection;
use regex::Regex;
use signal_hook::consts::{SIGINT, SIGTERM};

use cmms_core::clock::{Clock, FixedClock, SystemClock};
use cmms_core::orm::company::{get_company_by_id, get_company_by_name_case_insensitive};

/// Resolve a company identifier (either ID as string/number or name) to a
/// company ID. If the input is a valid number, treat it as an ID and verify it
/// exists. If it's not a number, treat it as a name and look it up
/// (case-insensitive).
pub fn resolve_company_id(
    conn: &mut SqliteConnection,
    company_identifier: &str,
) -> Result<i32, Box<dyn std::error::Error>> {
    if let Ok(id) = company_identifier.parse::<i32>() {
        match get_company_by_id(conn, id)? {
            Some(_company) => Ok(id),
            None => Err(format!("Company with ID {} does not exist", id).into()),
        }
    } else {
        match get_company_by_name_case_insensitive(conn, company_identifier)? {
            Some(company) => Ok(company.id),
            None => {
                Err(format!("Company with name '{}' does not exist", company_identifier).into())
            }
        }
    }
}

pub fn resolve_optional_company(
    conn: &mut SqliteConnection,
    company_identifier: Option<&str>,
) -> Result<Option<i32>, Box<dyn std::error::Error>> {
    company_identifier
        .map(|identifier| resolve_company_id(conn, identifier))
        .transpose()
}

/// Parses `--as-of`: a date (`2025-03-01`, midnight UTC) or a timestamp
/// (`2025-03-01T06:00:00` or with a space).
pub fn parse_as_of(value: &str) -> Result<NaiveDateTime, String> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(FixedClock::at_midnight(date).now());
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(at) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(at);
        }
    }
    Err(format!(
        "Invalid --as-of value '{}', expected YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS",
        value
    ))
}

/// The clock a job run uses: frozen at `--as-of` when given, otherwise at
/// the moment the command started so every row of one run shares a
/// timestamp.
pub fn job_clock(as_of: Option<&str>) -> Result<FixedClock, Box<dyn std::error::Error>> {
    match as_of {
        Some(value) => Ok(FixedClock(parse_as_of(value)?)),
        None => Ok(FixedClock(SystemClock.now())),
    }
}

/// SIGINT and SIGTERM set the returned flag; running jobs poll it between
/// items.
pub fn install_signal_handlers() -> Result<Arc<AtomicBool>, std::io::Error> {
    let cancel = Arc::new(AtomicBool::new(false));
    signal_hook::flag::register(SIGINT, Arc::clone(&cancel))?;
    signal_hook::flag::register(SIGTERM, Arc::clone(&cancel))?;
    Ok(cancel)
}

/// Keeps the items whose key matches `search_term`, a regex unless
/// `fixed_string` is set.
pub fn filter_by_term<T>(
    items: Vec<T>,
    search_term: Option<String>,
    fixed_string: bool,
    key: impl Fn(&T) -> &str,
) -> Result<Vec<T>, Box<dyn std::error::Error>> {
    let Some(term) = search_term else {
        return Ok(items);
    };
    if fixed_string {
        return Ok(items.into_iter().filter(|item| key(item).contains(&term)).collect());
    }
    let regex =
        Regex::new(&term).map_err(|e| format!("Invalid regex pattern '{}': {}", term, e))?;
    Ok(items.into_iter().filter(|item| regex.is_match(key(item))).collect())
}
