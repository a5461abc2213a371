//! Backfill generator property tests.
//!
//! These validate the observable contract of the synthetic backfill: window
//! coverage, price-band invariants, seed determinism, and idempotence when
//! run against persisted state.

use chrono::{Duration, NaiveDate};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rusqlite::Connection;
use std::collections::HashSet;

use stocksense::db::stocks;
use stocksense::generator::{backfill, normalize_symbol};

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, 29).unwrap()
}

#[test]
fn thirty_unique_dates_covering_prior_window() {
    for seed in [0u64, 42, 1234, 98765] {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let records = backfill("TSLA", as_of(), &HashSet::new(), &mut rng);

        assert_eq!(records.len(), 30, "seed {seed}: expected a full window");

        let dates: HashSet<NaiveDate> = records.iter().map(|r| r.trade_date).collect();
        assert_eq!(dates.len(), 30, "seed {seed}: dates must be unique");
        for offset in 1..=30 {
            let day = as_of() - Duration::days(offset);
            assert!(dates.contains(&day), "seed {seed}: missing {day}");
        }
    }
}

#[test]
fn price_band_and_volume_invariants() {
    for seed in [0u64, 7, 42, 555, 31337] {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let records = backfill("TSLA", as_of(), &HashSet::new(), &mut rng);

        for r in &records {
            assert_eq!(r.high_price, r.open_price + 5.0, "seed {seed}");
            assert_eq!(r.low_price, r.open_price - 5.0, "seed {seed}");
            assert!(r.close_price >= r.open_price, "seed {seed}");
            assert!(r.close_price < r.open_price + 2.0, "seed {seed}");
            assert!(
                (1_000_000..1_500_000).contains(&r.volume),
                "seed {seed}: volume {} out of band",
                r.volume
            );
            assert!(
                r.open_price >= 10.0,
                "seed {seed}: floor clamp violated at {}",
                r.open_price
            );
        }
    }
}

#[test]
fn same_seed_reproduces_identical_records() {
    let mut rng1 = ChaCha8Rng::seed_from_u64(42);
    let mut rng2 = ChaCha8Rng::seed_from_u64(42);

    let a = backfill("MSFT", as_of(), &HashSet::new(), &mut rng1);
    let b = backfill("MSFT", as_of(), &HashSet::new(), &mut rng2);
    assert_eq!(a, b);
}

#[test]
fn different_seeds_diverge() {
    let mut rng1 = ChaCha8Rng::seed_from_u64(1);
    let mut rng2 = ChaCha8Rng::seed_from_u64(2);

    let a = backfill("MSFT", as_of(), &HashSet::new(), &mut rng1);
    let b = backfill("MSFT", as_of(), &HashSet::new(), &mut rng2);
    assert!(
        a.iter().zip(&b).any(|(x, y)| x.open_price != y.open_price),
        "independent seeds should not produce the same walk"
    );
}

#[test]
fn first_day_open_equals_seed_plus_first_perturbation() {
    // Pin down exact floating-point behavior: replay the draws the generator
    // makes and check the first day's open against them.
    let mut probe = ChaCha8Rng::seed_from_u64(42);
    let seed_price = 100.0 + rand::Rng::gen_range(&mut probe, 0.0..100.0);
    let delta1 = (rand::Rng::gen_range(&mut probe, 0.0..1.0) - 0.5) * 10.0;

    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let records = backfill("MSFT", as_of(), &HashSet::new(), &mut rng);
    assert_eq!(records[0].open_price, seed_price + delta1);
}

#[test]
fn symbol_is_trimmed_and_uppercased() {
    assert_eq!(normalize_symbol("  aapl "), "AAPL");

    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let records = backfill(" msft ", as_of(), &HashSet::new(), &mut rng);
    assert!(records.iter().all(|r| r.symbol == "MSFT"));
}

#[test]
fn persisted_backfill_is_idempotent() {
    let mut conn = Connection::open_in_memory().unwrap();
    stocks::init_schema(&conn).unwrap();

    let start = as_of() - Duration::days(30);
    let end = as_of() - Duration::days(1);

    // First run over empty state fills the whole window.
    let existing = stocks::existing_dates(&conn, "AAPL", start, end).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let first = backfill("AAPL", as_of(), &existing, &mut rng);
    assert_eq!(first.len(), 30);
    stocks::insert_batch(&mut conn, &first).unwrap();

    // Second run sees every date and produces nothing.
    let existing = stocks::existing_dates(&conn, "AAPL", start, end).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(43);
    let second = backfill("AAPL", as_of(), &existing, &mut rng);
    assert!(second.is_empty());

    let stored = stocks::stocks_for_symbol(&conn, "AAPL").unwrap();
    assert_eq!(stored.len(), 30);
}

#[test]
fn gap_fill_only_creates_missing_days() {
    let mut conn = Connection::open_in_memory().unwrap();
    stocks::init_schema(&conn).unwrap();

    let start = as_of() - Duration::days(30);
    let end = as_of() - Duration::days(1);

    // Persist a partial history: every other day of the window.
    let mut rng = ChaCha8Rng::seed_from_u64(9);
    let full = backfill("NVDA", as_of(), &HashSet::new(), &mut rng);
    let partial: Vec<_> = full.iter().step_by(2).cloned().collect();
    stocks::insert_batch(&mut conn, &partial).unwrap();

    let existing = stocks::existing_dates(&conn, "NVDA", start, end).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(10);
    let fill = backfill("NVDA", as_of(), &existing, &mut rng);

    assert_eq!(fill.len(), 30 - partial.len());
    for r in &fill {
        assert!(!existing.contains(&r.trade_date));
    }

    stocks::insert_batch(&mut conn, &fill).unwrap();
    let stored = stocks::stocks_for_symbol(&conn, "NVDA").unwrap();
    assert_eq!(stored.len(), 30);
}
