//! Host-availability gate for lease requests: how many hosts of a given type
//! are free across a candidate time window.

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use thiserror::Error;

use models::TimeWindow;

#[derive(Debug, Error)]
pub enum AvailabilityError {
    /// The allocation source could not be consulted. Always surfaced to the
    /// caller; never reported as zero or unlimited availability.
    #[error("availability backend unreachable: {0}")]
    Backend(String),
}

impl From<sqlx::Error> for AvailabilityError {
    fn from(e: sqlx::Error) -> Self {
        AvailabilityError::Backend(e.to_string())
    }
}

/// Counts free hosts for a candidate window. A host is free when none of its
/// allocations intersect the window under half-open `[start, end)` semantics.
#[async_trait]
pub trait AvailabilityChecker: Send + Sync {
    /// `node_type = None` counts across all host types.
    async fn available_count(
        &self,
        node_type: Option<&str>,
        window: TimeWindow,
    ) -> Result<u64, AvailabilityError>;
}

/// Availability straight from the reservation database: total matching hosts
/// minus those with an allocation whose lease window intersects the
/// candidate window.
pub struct DbAvailability {
    pool: PgPool,
}

impl DbAvailability {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const AVAILABLE_COUNT_SQL: &str = r#"
SELECT count(*) AS available
  FROM compute_hosts ch
 WHERE ($1::text IS NULL OR ch.node_type = $1)
   AND ch.id NOT IN (
       SELECT ca.compute_host_id
         FROM computehost_allocations ca
         JOIN reservations r ON ca.reservation_id = r.id
         JOIN leases l ON r.lease_id = l.id
        WHERE l.start_date < $3
          AND l.end_date > $2
   )
"#;

#[async_trait]
impl AvailabilityChecker for DbAvailability {
    async fn available_count(
        &self,
        node_type: Option<&str>,
        window: TimeWindow,
    ) -> Result<u64, AvailabilityError> {
        let row = sqlx::query(AVAILABLE_COUNT_SQL)
            .bind(node_type)
            .bind(window.start)
            .bind(window.end)
            .fetch_one(&self.pool)
            .await?;

        let available: i64 = row.try_get("available")?;
        Ok(available.max(0) as u64)
    }
}

/// The same semantics over a static allocation table. Used by tests; also
/// handy for local development without a reservation database.
pub struct InMemoryAvailability {
    /// `(host id, node type)` inventory.
    hosts: Vec<(String, String)>,
    /// `(host id, allocated window)`, half-open.
    allocations: Vec<(String, TimeWindow)>,
}

impl InMemoryAvailability {
    pub fn new(hosts: Vec<(String, String)>, allocations: Vec<(String, TimeWindow)>) -> Self {
        Self { hosts, allocations }
    }
}

#[async_trait]
impl AvailabilityChecker for InMemoryAvailability {
    async fn available_count(
        &self,
        node_type: Option<&str>,
        window: TimeWindow,
    ) -> Result<u64, AvailabilityError> {
        let free = self
            .hosts
            .iter()
            .filter(|(_, ty)| node_type.is_none() || node_type == Some(ty.as_str()))
            .filter(|(id, _)| {
                !self
                    .allocations
                    .iter()
                    .any(|(host, allocated)| host == id && allocated.overlaps(&window))
            })
            .count();

        Ok(free as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 1, 1, hour, 0, 0).unwrap()
    }

    fn fixture() -> InMemoryAvailability {
        InMemoryAvailability::new(
            vec![
                ("host-1".to_string(), "compute".to_string()),
                ("host-2".to_string(), "compute".to_string()),
                ("host-3".to_string(), "storage".to_string()),
            ],
            vec![(
                "host-1".to_string(),
                TimeWindow::new(at(9), at(13)),
            )],
        )
    }

    #[tokio::test]
    async fn booked_host_is_excluded_inside_its_window() {
        let checker = fixture();
        let count = checker
            .available_count(Some("compute"), TimeWindow::new(at(10), at(11)))
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn touching_windows_do_not_block() {
        let checker = fixture();
        let count = checker
            .available_count(Some("compute"), TimeWindow::new(at(13), at(14)))
            .await
            .unwrap();
        assert_eq!(count, 2);
    }

    proptest::proptest! {
        #[test]
        fn an_allocation_blocks_exactly_when_nonempty(
            window in testing_utils::time_window_strategy(),
        ) {
            let checker = InMemoryAvailability::new(
                vec![("host-1".to_string(), "compute".to_string())],
                vec![("host-1".to_string(), window)],
            );

            let rt = tokio::runtime::Builder::new_current_thread()
                .build()
                .unwrap();
            let count = rt.block_on(checker.available_count(None, window)).unwrap();

            // An empty window intersects nothing, not even itself.
            let expected = if window.start < window.end { 0 } else { 1 };
            proptest::prop_assert_eq!(count, expected);
        }
    }

    #[tokio::test]
    async fn node_type_filter_narrows_the_inventory() {
        let checker = fixture();

        let storage = checker
            .available_count(Some("storage"), TimeWindow::new(at(10), at(11)))
            .await
            .unwrap();
        assert_eq!(storage, 1);

        let any = checker
            .available_count(None, TimeWindow::new(at(10), at(11)))
            .await
            .unwrap();
        assert_eq!(any, 2);
    }
}
