use chrono::{Duration, NaiveDate};
use rand::Rng;
use std::collections::HashSet;

use crate::db::stocks::StockRecord;

/// Number of prior calendar days a backfill covers.
pub const BACKFILL_DAYS: u32 = 30;

/// Trim and uppercase a raw ticker string.
pub fn normalize_symbol(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Generate synthetic daily records for the 30 calendar days ending at
/// `as_of` (exclusive), i.e. the window `[as_of-30, as_of-1]`.
///
/// Days present in `existing` are skipped entirely: no record, no RNG draw,
/// no walk advance. The walk state lives for this call only, so re-running
/// over a partially filled history walks a shorter path than one run over an
/// empty span would have. That is observable behavior and tests depend on it.
///
/// Prices follow a random walk seeded at `100 + U(0,100)`, perturbed by
/// `(U(0,1) - 0.5) * 10` per day and floored at 10 if the walk goes
/// non-positive. The caller persists the returned batch; this function has
/// no side effects.
pub fn backfill<R: Rng>(
    symbol: &str,
    as_of: NaiveDate,
    existing: &HashSet<NaiveDate>,
    rng: &mut R,
) -> Vec<StockRecord> {
    let symbol = normalize_symbol(symbol);
    let mut records = Vec::new();
    let mut current_price = 100.0 + rng.gen_range(0.0..100.0);

    for i in 0..BACKFILL_DAYS {
        let trade_date = as_of - Duration::days(i64::from(BACKFILL_DAYS - i));
        if existing.contains(&trade_date) {
            continue;
        }

        let change = (rng.gen_range(0.0..1.0) - 0.5) * 10.0;
        current_price += change;
        if current_price <= 0.0 {
            current_price = 10.0;
        }

        records.push(StockRecord {
            symbol: symbol.clone(),
            trade_date,
            open_price: current_price,
            close_price: current_price + rng.gen_range(0.0..2.0),
            high_price: current_price + 5.0,
            low_price: current_price - 5.0,
            volume: 1_000_000 + rng.gen_range(0..500_000),
        });
    }

    records
}
