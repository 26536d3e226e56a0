// 💾 Customer Store - SQLite-backed registration lookup
// Owns the customers table and the single existence query the pipeline needs

use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::Mutex;

use crate::pipeline::RegistrationLookup;

// ============================================================================
// SCHEMA
// ============================================================================

/// Create the customers table and supporting index
pub fn setup_database(conn: &Connection) -> Result<()> {
    // Enable WAL mode for crash recovery
    conn.pragma_update(None, "journal_mode", "WAL")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS customers (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            cpf TEXT UNIQUE NOT NULL,
            name TEXT,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_customers_cpf ON customers(cpf)",
        [],
    )?;

    Ok(())
}

// ============================================================================
// QUERIES
// ============================================================================

/// Insert a customer record. Idempotent: an existing CPF is left untouched.
/// Returns true if a new row was inserted.
pub fn insert_customer(conn: &Connection, cpf: &str, name: Option<&str>) -> Result<bool> {
    let inserted = conn.execute(
        "INSERT OR IGNORE INTO customers (cpf, name) VALUES (?1, ?2)",
        params![cpf, name],
    )?;
    Ok(inserted > 0)
}

/// The one capability the pipeline needs: does a record with this CPF exist?
pub fn customer_exists(conn: &Connection, cpf: &str) -> Result<bool> {
    let mut stmt = conn.prepare("SELECT 1 FROM customers WHERE cpf = ?1 LIMIT 1")?;
    let found = stmt.exists(params![cpf])?;
    Ok(found)
}

/// Total number of customer records (seeding verification)
pub fn customer_count(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM customers", [], |row| row.get(0))?;
    Ok(count)
}

// ============================================================================
// LOOKUP ADAPTER
// ============================================================================

/// RegistrationLookup over a SQLite connection.
///
/// The connection is behind a mutex; each lookup is one short query, so a
/// single connection per process is enough for the request-per-invocation
/// model.
pub struct SqliteLookup {
    conn: Mutex<Connection>,
}

impl SqliteLookup {
    /// Open (or create) the store at `path` and ensure the schema exists
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open customer store at {:?}", path))?;
        setup_database(&conn)?;
        Ok(SqliteLookup {
            conn: Mutex::new(conn),
        })
    }

    /// In-memory store, used by tests and demos
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        setup_database(&conn)?;
        Ok(SqliteLookup {
            conn: Mutex::new(conn),
        })
    }

    /// Seed a record through the adapter
    pub fn insert(&self, cpf: &str, name: Option<&str>) -> Result<bool> {
        let conn = self.lock()?;
        insert_customer(&conn, cpf, name)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow::anyhow!("Customer store mutex poisoned"))
    }
}

impl RegistrationLookup for SqliteLookup {
    fn exists(&self, cpf: &str) -> Result<bool> {
        let conn = self.lock()?;
        customer_exists(&conn, cpf).context("Customer existence query failed")
    }
}
