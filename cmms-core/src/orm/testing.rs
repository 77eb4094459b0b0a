//! In-memory database and fixtures for unit tests.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::sqlite::SqliteConnection;

use super::db::{run_pending_migrations, set_connection_pragmas};
use crate::models::*;
use crate::policy::{Actor, Role};

/// Creates a synchronous in-memory SQLite database connection for unit tests.
///
/// Runs all embedded migrations and enables foreign key support. Each call
/// returns a new, independent database.
pub fn setup_test_db() -> SqliteConnection {
    use diesel::Connection;

    let mut conn = SqliteConnection::establish(":memory:")
        .expect("Failed to create in-memory SQLite database");
    set_connection_pragmas(&mut conn).expect("Failed to set pragmas");
    run_pending_migrations(&mut conn).expect("Failed to run migrations");
    conn
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    date(y, m, d).and_hms_opt(h, 0, 0).expect("valid time")
}

pub fn create_company(conn: &mut SqliteConnection, name: &str) -> Company {
    super::company::insert_company(conn, name.to_string()).expect("Failed to insert company")
}

pub fn create_user(conn: &mut SqliteConnection, company_id: i32, role: Role, email: &str) -> User {
    super::user::insert_user(
        conn,
        UserInput {
            email: email.to_string(),
            password_hash: "not-a-real-hash".to_string(),
            company_id,
            role,
        },
    )
    .expect("Failed to insert user")
}

pub fn create_actor(conn: &mut SqliteConnection, company_id: i32, role: Role, email: &str) -> Actor {
    let user = create_user(conn, company_id, role, email);
    user.to_actor().expect("valid role")
}

pub fn create_machine(conn: &mut SqliteConnection, company_id: i32, name: &str) -> Machine {
    super::machine::insert_machine(
        conn,
        NewMachine {
            company_id,
            name: name.to_string(),
            code: None,
            is_active: true,
        },
    )
    .expect("Failed to insert machine")
}

pub fn create_task(
    conn: &mut SqliteConnection,
    machine: &Machine,
    next_due_date: NaiveDate,
    assigned_to: Option<i32>,
) -> PreventiveTask {
    super::preventive_task::insert_preventive_task(
        conn,
        NewPreventiveTask {
            company_id: machine.company_id,
            machine_id: machine.id,
            name: format!("Inspect {}", machine.name),
            interval_days: 30,
            next_due_date,
            assigned_to,
            is_active: true,
            created_by: None,
        },
    )
    .expect("Failed to insert preventive task")
}

pub fn create_supplier(conn: &mut SqliteConnection, company_id: i32, name: &str) -> Supplier {
    super::supplier::insert_supplier(
        conn,
        NewSupplier {
            company_id,
            name: name.to_string(),
            email: None,
            is_active: true,
        },
    )
    .expect("Failed to insert supplier")
}

#[allow(clippy::too_many_arguments)]
pub fn create_part(
    conn: &mut SqliteConnection,
    company_id: i32,
    supplier_id: Option<i32>,
    part_number: &str,
    reorder_point: i32,
    reorder_quantity: i32,
    unit_cost_cents: i64,
    lead_time_days: Option<i32>,
) -> SparePart {
    super::spare_part::insert_spare_part(
        conn,
        NewSparePart {
            company_id,
            supplier_id,
            part_number: part_number.to_string(),
            name: format!("Part {}", part_number),
            reorder_point,
            reorder_quantity,
            unit_cost_cents,
            lead_time_days,
            is_active: true,
        },
    )
    .expect("Failed to insert spare part")
}

pub fn add_stock(conn: &mut SqliteConnection, part_id: i32, on_hand: i32, reserved: i32) {
    super::spare_part::insert_stock_level(
        conn,
        NewStockLevel {
            spare_part_id: part_id,
            location: None,
            quantity_on_hand: on_hand,
            quantity_reserved: reserved,
        },
    )
    .expect("Failed to insert stock level");
}
