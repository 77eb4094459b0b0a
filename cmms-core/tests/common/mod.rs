//! Shared setup for the integration tests.
#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use diesel_migrations::MigrationHarness;

use cmms_core::MIGRATIONS;
use cmms_core::models::*;
use cmms_core::orm::{company, machine, preventive_task, set_connection_pragmas, spare_part, supplier, user};
use cmms_core::policy::{Actor, Role};

/// In-memory database with foreign keys on and all migrations applied.
pub fn setup_test_db() -> SqliteConnection {
    let mut conn = SqliteConnection::establish(":memory:").expect("Failed to create in-memory db");
    set_connection_pragmas(&mut conn).expect("Failed to set pragmas");
    conn.run_pending_migrations(MIGRATIONS)
        .expect("Failed to run migrations");
    conn
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    date(y, m, d).and_hms_opt(h, 0, 0).unwrap()
}

/// A company with one user per role.
pub struct Tenant {
    pub company: Company,
    pub operator: Actor,
    pub technician: Actor,
    pub manager: Actor,
}

impl Tenant {
    pub fn id(&self) -> i32 {
        self.company.id
    }
}

pub fn seed_tenant(conn: &mut SqliteConnection, name: &str) -> Tenant {
    let company = company::insert_company(conn, name.to_string()).unwrap();
    let slug = name.to_lowercase().replace(' ', "-");
    let mut actor = |role: Role| {
        let u = user::insert_user(
            conn,
            UserInput {
                email: format!("{}@{}.test", role.as_str(), slug),
                password_hash: "hash".to_string(),
                company_id: company.id,
                role,
            },
        )
        .unwrap();
        u.to_actor().unwrap()
    };
    let operator = actor(Role::Operator);
    let technician = actor(Role::Technician);
    let manager = actor(Role::Manager);
    Tenant {
        company,
        operator,
        technician,
        manager,
    }
}

pub fn seed_user(conn: &mut SqliteConnection, company_id: i32, role: Role, email: &str) -> User {
    user::insert_user(
        conn,
        UserInput {
            email: email.to_string(),
            password_hash: "hash".to_string(),
            company_id,
            role,
        },
    )
    .unwrap()
}

pub fn seed_machine(conn: &mut SqliteConnection, company_id: i32, name: &str) -> Machine {
    machine::insert_machine(
        conn,
        NewMachine {
            company_id,
            name: name.to_string(),
            code: None,
            is_active: true,
        },
    )
    .unwrap()
}

pub fn seed_task(
    conn: &mut SqliteConnection,
    machine: &Machine,
    next_due_date: NaiveDate,
    assigned_to: Option<i32>,
) -> PreventiveTask {
    preventive_task::insert_preventive_task(
        conn,
        NewPreventiveTask {
            company_id: machine.company_id,
            machine_id: machine.id,
            name: format!("Service {}", machine.name),
            interval_days: 14,
            next_due_date,
            assigned_to,
            is_active: true,
            created_by: None,
        },
    )
    .unwrap()
}

pub fn seed_supplier(conn: &mut SqliteConnection, company_id: i32, name: &str) -> Supplier {
    supplier::insert_supplier(
        conn,
        NewSupplier {
            company_id,
            name: name.to_string(),
            email: Some(format!("orders@{}.test", name.to_lowercase())),
            is_active: true,
        },
    )
    .unwrap()
}

pub struct PartFixture<'a> {
    pub part_number: &'a str,
    pub reorder_point: i32,
    pub reorder_quantity: i32,
    pub unit_cost_cents: i64,
    pub lead_time_days: Option<i32>,
}

impl Default for PartFixture<'_> {
    fn default() -> Self {
        Self {
            part_number: "P-1",
            reorder_point: 10,
            reorder_quantity: 20,
            unit_cost_cents: 100,
            lead_time_days: None,
        }
    }
}

pub fn seed_part(
    conn: &mut SqliteConnection,
    company_id: i32,
    supplier_id: Option<i32>,
    fixture: PartFixture<'_>,
) -> SparePart {
    spare_part::insert_spare_part(
        conn,
        NewSparePart {
            company_id,
            supplier_id,
            part_number: fixture.part_number.to_string(),
            name: format!("Part {}", fixture.part_number),
            reorder_point: fixture.reorder_point,
            reorder_quantity: fixture.reorder_quantity,
            unit_cost_cents: fixture.unit_cost_cents,
            lead_time_days: fixture.lead_time_days,
            is_active: true,
        },
    )
    .unwrap()
}

pub fn seed_stock(conn: &mut SqliteConnection, part_id: i32, on_hand: i32, reserved: i32) {
    spare_part::insert_stock_level(
        conn,
        NewStockLevel {
            spare_part_id: part_id,
            location: Some("main".to_string()),
            quantity_on_hand: on_hand,
            quantity_reserved: reserved,
        },
    )
    .unwrap();
}

/// Installs a trigger that aborts the INSERT of a work order for `task_id`.
pub fn fail_work_order_inserts_for_task(conn: &mut SqliteConnection, task_id: i32) {
    diesel::sql_query(format!(
        "CREATE TRIGGER fail_work_order_{id} BEFORE INSERT ON work_orders \
         WHEN NEW.preventive_task_id = {id} \
         BEGIN SELECT RAISE(ABORT, 'injected failure'); END;",
        id = task_id
    ))
    .execute(conn)
    .unwrap();
}

/// Installs a trigger that aborts every purchase order line for `part_id`.
pub fn fail_order_lines_for_part(conn: &mut SqliteConnection, part_id: i32) {
    diesel::sql_query(format!(
        "CREATE TRIGGER fail_po_line_{id} BEFORE INSERT ON purchase_order_items \
         WHEN NEW.spare_part_id = {id} \
         BEGIN SELECT RAISE(ABORT, 'injected failure'); END;",
        id = part_id
    ))
    .execute(conn)
    .unwrap();
}

/// Moves the stock table aside so every stock read fails.
pub fn hide_stock_levels(conn: &mut SqliteConnection) {
    diesel::sql_query("ALTER TABLE stock_levels RENAME TO stock_levels_hidden")
        .execute(conn)
        .unwrap();
}

pub fn count_work_orders(conn: &mut SqliteConnection) -> i64 {
    use cmms_core::schema::work_orders;
    work_orders::table.count().get_result(conn).unwrap()
}

pub fn count_purchase_orders(conn: &mut SqliteConnection) -> i64 {
    use cmms_core::schema::purchase_orders;
    purchase_orders::table.count().get_result(conn).unwrap()
}
