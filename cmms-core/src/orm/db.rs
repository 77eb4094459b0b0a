use diesel::QueryableByName;
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::sql_types::BigInt;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

use crate::error::{Error, Result};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("../migrations");

#[derive(QueryableByName)]
struct LastInsertRowId {
    #[diesel(sql_type = BigInt)]
    last_insert_rowid: i64,
}

/// Opens a connection, enables foreign keys and brings the schema up to
/// date. Every console command goes through here.
pub fn establish_connection(database_url: &str) -> Result<SqliteConnection> {
    let mut conn = SqliteConnection::establish(database_url)?;
    set_connection_pragmas(&mut conn)?;
    run_pending_migrations(&mut conn)?;
    Ok(conn)
}

/// Enables foreign key support and a busy timeout for SQLite connections.
///
/// Foreign keys are disabled by default in SQLite for backwards
/// compatibility. The busy timeout lets two overlapping scheduler firings
/// wait on each other's write lock instead of failing immediately.
pub fn set_connection_pragmas(conn: &mut SqliteConnection) -> QueryResult<()> {
    conn.batch_execute(
        r#"
        PRAGMA foreign_keys = ON;
        PRAGMA busy_timeout = 5000;
        "#,
    )
}

/// Runs all pending database migrations on the provided connection.
pub fn run_pending_migrations(conn: &mut SqliteConnection) -> Result<()> {
    conn.run_pending_migrations(MIGRATIONS)
        .map(|_| ())
        .map_err(|e| Error::Migration(e.to_string()))
}

/// Row id of the last successful INSERT on this connection.
pub(crate) fn last_insert_id(conn: &mut SqliteConnection) -> QueryResult<i32> {
    let last_id = diesel::sql_query("SELECT last_insert_rowid() as last_insert_rowid")
        .get_result::<LastInsertRowId>(conn)?
        .last_insert_rowid;
    Ok(last_id as i32)
}
