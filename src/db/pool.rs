use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::OpenFlags;
use std::path::Path;

use crate::error::DashError;

pub type DbPool = Pool<SqliteConnectionManager>;

/// Create a read-write SQLite connection pool for the given database file,
/// creating the file (and its parent directory) if needed.
pub fn open_pool(path: &Path, max_size: u32) -> Result<DbPool, DashError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_NO_MUTEX
        | OpenFlags::SQLITE_OPEN_URI;
    let manager = SqliteConnectionManager::file(path).with_flags(flags);
    let pool = Pool::builder().max_size(max_size).build(manager)?;
    Ok(pool)
}
