use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use prop::collection::btree_map;
use proptest::prelude::*;
use serde_json::Value;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::collections::BTreeMap;

use models::TimeWindow;

// This magic library called `ctor` somehow runs before any other step in the test binary
// we use it to install color_eyre for prettier panic messages (we can't do this in each test
// because they run in parallel)
#[ctor::ctor]
fn init() {
    color_eyre::install();
}

// will only be used when using sqlx in tests.
static TEST_POOL: Lazy<PgPool> = Lazy::new(|| {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let max_connections = std::env::var("MAX_CONNECTIONS")
        .unwrap_or_else(|_| "10".to_string())
        .parse::<u32>()
        .expect("env var MAX_CONNECTIONS must be a number");

    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect_lazy(&url)
        .expect("Failed to create pool")
});

pub fn test_pool() -> PgPool {
    TEST_POOL.clone()
}

/// Generates a random [`DateTime<Utc>`] within a reasonable range.
pub fn datetime_utc_strategy() -> impl Strategy<Value = DateTime<Utc>> {
    (0i64..=4102444800i64) // timestamps from 1970-01-01 to 2100-01-01
        .prop_map(|timestamp| DateTime::from_timestamp(timestamp, 0).unwrap())
}

/// Generates a well-formed [`TimeWindow`]: start at or before end.
pub fn time_window_strategy() -> impl Strategy<Value = TimeWindow> {
    (datetime_utc_strategy(), datetime_utc_strategy())
        .prop_map(|(a, b)| TimeWindow::new(a.min(b), a.max(b)))
}

/// Generates a flat map of extra capability key/value pairs, the shape the
/// network-segment CLI forwards to the service.
pub fn extras_strategy() -> impl Strategy<Value = BTreeMap<String, Value>> {
    btree_map(
        "[a-z][a-z0-9_]{0,15}",
        "[^\\x00-\\x1F\\\\]{0,20}".prop_map(Value::String),
        0..6,
    )
}
