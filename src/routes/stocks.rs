use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{Local, NaiveDate};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::db::stocks::{self, SymbolStats};
use crate::error::DashError;
use crate::generator::{self, BACKFILL_DAYS};
use crate::state::AppState;

// ── Request bodies ──────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AnalyzeBody {
    pub symbol: String,
}

#[derive(Debug, Deserialize)]
pub struct StocksQuery {
    symbol: String,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
}

// ── Routes ──────────────────────────────────────────────────────────

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/stocks", get(api_stocks))
        .route("/api/analyze", post(api_analyze))
}

/// Symbols are short tickers; anything longer is rejected at the boundary.
const MAX_SYMBOL_LEN: usize = 10;

/// Validate at the entity boundary; the generator itself does not.
fn require_symbol(raw: &str) -> Result<String, DashError> {
    let symbol = generator::normalize_symbol(raw);
    if symbol.is_empty() {
        return Err(DashError::BadRequest("symbol must not be blank".to_string()));
    }
    if symbol.len() > MAX_SYMBOL_LEN {
        return Err(DashError::BadRequest(format!(
            "symbol must be at most {MAX_SYMBOL_LEN} characters"
        )));
    }
    Ok(symbol)
}

/// A date window needs both bounds; a lone bound is an error rather than a
/// silently dropped filter.
fn resolve_window(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<Option<(NaiveDate, NaiveDate)>, DashError> {
    match (start, end) {
        (Some(start), Some(end)) => Ok(Some((start, end))),
        (None, None) => Ok(None),
        _ => Err(DashError::BadRequest(
            "start and end must be supplied together".to_string(),
        )),
    }
}

// ── Handlers ────────────────────────────────────────────────────────

/// Backfill the trailing 30-day window for a symbol, persist whatever was
/// missing, and return the full history plus summary stats.
async fn api_analyze(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AnalyzeBody>,
) -> Result<Json<Value>, DashError> {
    let symbol = require_symbol(&body.symbol)?;

    let as_of = Local::now().date_naive();
    let window_start = as_of - chrono::Duration::days(i64::from(BACKFILL_DAYS));
    let window_end = as_of - chrono::Duration::days(1);

    let mut conn = state.pool.get()?;
    let existing = stocks::existing_dates(&conn, &symbol, window_start, window_end)?;

    let mut rng = ChaCha8Rng::from_entropy();
    let new_records = generator::backfill(&symbol, as_of, &existing, &mut rng);

    if new_records.is_empty() {
        tracing::debug!("Data already up to date for {symbol}");
    } else {
        stocks::insert_batch(&mut conn, &new_records)?;
        tracing::info!("Saved {} records for {symbol}", new_records.len());
    }

    let records = stocks::stocks_for_symbol(&conn, &symbol)?;
    let stats = SymbolStats::from_records(&records);

    Ok(Json(json!({
        "symbol": symbol,
        "inserted": new_records.len(),
        "records": records,
        "stats": stats,
    })))
}

/// Stored history for a symbol, ascending by date, optionally windowed.
async fn api_stocks(
    State(state): State<Arc<AppState>>,
    Query(q): Query<StocksQuery>,
) -> Result<Json<Value>, DashError> {
    let symbol = require_symbol(&q.symbol)?;

    let window = resolve_window(q.start, q.end)?;

    let conn = state.pool.get()?;
    let records = match window {
        Some((start, end)) => stocks::stocks_in_range(&conn, &symbol, start, end)?,
        None => stocks::stocks_for_symbol(&conn, &symbol)?,
    };
    let stats = SymbolStats::from_records(&records);

    Ok(Json(json!({
        "symbol": symbol,
        "records": records,
        "stats": stats,
    })))
}
