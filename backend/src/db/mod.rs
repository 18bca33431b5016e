pub mod models;
pub mod schema;

use std::fs;
use std::path::Path;

use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use diesel::sql_query;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

use parking_lot::Mutex;
use anyhow::{Context, Result, Error as AnyhowError};

use crate::db::models::NewLatinText;
use crate::db::schema::latin_text;
use crate::types::Record;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Rows per INSERT statement, keeps the bound parameters under SQLite's limit.
const INSERT_CHUNK_SIZE: usize = 500;

pub type SqlitePool = Pool<ConnectionManager<SqliteConnection>>;
pub type DbConn = PooledConnection<ConnectionManager<SqliteConnection>>;

#[derive(Debug)]
pub struct DatabaseHandle {
    pool: SqlitePool,
    pub write_lock: Mutex<()>,
}

impl DatabaseHandle {
    pub fn new(database_url: &str) -> Result<Self> {
        let manager = ConnectionManager::new(database_url);
        let pool = Pool::builder()
            .max_size(5)
            .build(manager)
            .with_context(|| format!("Failed to create pool for: {}", database_url))?;

        Ok(Self {
            pool,
            write_lock: Mutex::new(()),
        })
    }

    /// Opens a pool on an existing database file.
    pub fn open(db_path: &Path) -> Result<Self> {
        if !db_path.exists() {
            anyhow::bail!("Database file not found: {}. Run the bootstrap command first.", db_path.display());
        }
        let db_url = db_path.to_str()
            .ok_or_else(|| anyhow::anyhow!("Invalid database path"))?;
        Self::new(db_url)
    }

    pub fn get_conn(&self) -> Result<DbConn> {
        self.pool.get().map_err(AnyhowError::from)
    }

    /// Performs a write operation on the database, guarded by a Mutex write_lock.
    pub fn do_write<F, T>(&self, operation: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T>,
    {
        let _lock = self.write_lock.lock();
        let mut db_conn = self.pool.get()
            .context("Failed to get connection from pool for write")?;
        operation(&mut db_conn)
    }

    /// Performs a read operation on the database.
    pub fn do_read<F, T>(&self, operation: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T>,
    {
        let mut db_conn = self.pool.get()
            .context("Failed to get connection from pool for read")?;
        operation(&mut db_conn)
    }
}

pub fn create_database_connection(db_path: &Path) -> Result<SqliteConnection> {
    let db_url = db_path.to_str()
        .ok_or_else(|| anyhow::anyhow!("Invalid database path"))?;

    let conn = SqliteConnection::establish(db_url)
        .with_context(|| format!("Failed to connect to {}", db_url))?;
    Ok(conn)
}

pub fn run_migrations(conn: &mut SqliteConnection) -> Result<()> {
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| anyhow::anyhow!("Failed to execute pending database migrations: {}", e))?;
    Ok(())
}

/// Removes any existing database file, then creates the tables.
pub fn recreate_database(db_path: &Path) -> Result<SqliteConnection> {
    if db_path.exists() {
        fs::remove_file(db_path)
            .with_context(|| format!("Failed to remove old database: {}", db_path.display()))?;
    }
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut conn = create_database_connection(db_path)?;
    run_migrations(&mut conn)?;
    Ok(conn)
}

/// Inserts the records in parse order, all or nothing.
pub fn insert_records(conn: &mut SqliteConnection, records: &[Record]) -> Result<usize> {
    let inserted = conn.transaction::<_, diesel::result::Error, _>(|conn| {
        let mut total = 0;
        for chunk in records.chunks(INSERT_CHUNK_SIZE) {
            let rows: Vec<NewLatinText> = chunk.iter().map(NewLatinText::from).collect();
            total += diesel::insert_into(latin_text::table)
                .values(&rows)
                .execute(conn)?;
        }
        Ok(total)
    }).context("Failed to insert records")?;

    Ok(inserted)
}

/// Repopulates the full-text index from latin_text.
pub fn rebuild_fts_index(conn: &mut SqliteConnection) -> Result<usize> {
    let indexed = conn.transaction::<_, diesel::result::Error, _>(|conn| {
        sql_query("DELETE FROM latin_fts").execute(conn)?;
        sql_query(
            r#"
            INSERT INTO latin_fts (passage, link, title, book, chapter, verse)
            SELECT passage, link, title, book, chapter, verse
            FROM latin_text
            ORDER BY rowid
            "#
        ).execute(conn)
    }).context("Failed to rebuild the full-text index")?;

    Ok(indexed)
}

pub fn count_records(conn: &mut SqliteConnection) -> Result<i64> {
    let count = latin_text::table
        .count()
        .get_result::<i64>(conn)
        .context("Failed to count records")?;
    Ok(count)
}
