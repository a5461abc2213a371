use chrono::NaiveDate;
use rusqlite::{params, Connection};
use serde::Serialize;
use std::collections::HashSet;

use crate::error::DashError;

// ── Types ────────────────────────────────────────────────────────────────

/// One daily OHLCV row per (symbol, trade_date). Rows are immutable once
/// written; there are no update or delete paths.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockRecord {
    pub symbol: String,
    pub trade_date: NaiveDate,
    pub open_price: f64,
    pub close_price: f64,
    pub high_price: f64,
    pub low_price: f64,
    pub volume: i64,
}

/// Close-price summary for the stat boxes: max, min, and latest close.
#[derive(Debug, Clone, Serialize)]
pub struct SymbolStats {
    pub high: f64,
    pub low: f64,
    pub current: f64,
}

impl SymbolStats {
    /// Compute stats from records already ordered ascending by trade_date.
    pub fn from_records(records: &[StockRecord]) -> Option<Self> {
        let last = records.last()?;
        let high = records.iter().map(|r| r.close_price).fold(f64::MIN, f64::max);
        let low = records.iter().map(|r| r.close_price).fold(f64::MAX, f64::min);
        Some(Self {
            high,
            low,
            current: last.close_price,
        })
    }
}

// ── Schema ───────────────────────────────────────────────────────────────

/// Create the stocks table if it does not exist. The unique index on
/// (symbol, trade_date) backs the one-row-per-day invariant even if two
/// callers race the existence check.
pub fn init_schema(conn: &Connection) -> Result<(), DashError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS stocks (
             id          INTEGER PRIMARY KEY AUTOINCREMENT,
             symbol      TEXT NOT NULL,
             trade_date  TEXT NOT NULL,
             open_price  REAL NOT NULL,
             close_price REAL NOT NULL,
             high_price  REAL NOT NULL,
             low_price   REAL NOT NULL,
             volume      INTEGER NOT NULL,
             UNIQUE (symbol, trade_date)
         );",
    )?;
    Ok(())
}

// ── Queries ──────────────────────────────────────────────────────────────

fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<StockRecord> {
    Ok(StockRecord {
        symbol: row.get(0)?,
        trade_date: row.get(1)?,
        open_price: row.get(2)?,
        close_price: row.get(3)?,
        high_price: row.get(4)?,
        low_price: row.get(5)?,
        volume: row.get(6)?,
    })
}

/// All records for a symbol, ascending by trade_date.
pub fn stocks_for_symbol(conn: &Connection, symbol: &str) -> Result<Vec<StockRecord>, DashError> {
    let mut stmt = conn.prepare(
        "SELECT symbol, trade_date, open_price, close_price, high_price, low_price, volume
         FROM stocks
         WHERE symbol = ?
         ORDER BY trade_date ASC",
    )?;
    let rows = stmt
        .query_map(params![symbol], row_to_record)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Records for a symbol within an inclusive date window, ascending.
pub fn stocks_in_range(
    conn: &Connection,
    symbol: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<StockRecord>, DashError> {
    let mut stmt = conn.prepare(
        "SELECT symbol, trade_date, open_price, close_price, high_price, low_price, volume
         FROM stocks
         WHERE symbol = ? AND trade_date BETWEEN ? AND ?
         ORDER BY trade_date ASC",
    )?;
    let rows = stmt
        .query_map(params![symbol, start, end], row_to_record)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Dates already stored for a symbol within an inclusive window. Feeds the
/// backfill generator's skip check.
pub fn existing_dates(
    conn: &Connection,
    symbol: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<HashSet<NaiveDate>, DashError> {
    let mut stmt = conn.prepare(
        "SELECT trade_date FROM stocks WHERE symbol = ? AND trade_date BETWEEN ? AND ?",
    )?;
    let dates = stmt
        .query_map(params![symbol, start, end], |row| row.get(0))?
        .collect::<Result<HashSet<_>, _>>()?;
    Ok(dates)
}

/// Insert a batch of new records in one transaction. A failure rolls the
/// whole batch back; there is no partial write.
pub fn insert_batch(conn: &mut Connection, records: &[StockRecord]) -> Result<(), DashError> {
    let tx = conn.transaction()?;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO stocks
                 (symbol, trade_date, open_price, close_price, high_price, low_price, volume)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )?;
        for r in records {
            stmt.execute(params![
                r.symbol,
                r.trade_date,
                r.open_price,
                r.close_price,
                r.high_price,
                r.low_price,
                r.volume,
            ])?;
        }
    }
    tx.commit()?;
    Ok(())
}

// ── Tests ────────────────────────────────────────────────────────────────
