//! Queries backing the calendar view, straight from the reservation
//! database.

use sqlx::{PgPool, Row};

use super::api::{CalendarData, CalendarEntry, CalendarHost};
use crate::availability::AvailabilityError;

const HOSTS_SQL: &str = r#"
SELECT id, hostname, node_type
  FROM compute_hosts
 ORDER BY hostname
"#;

const ENTRIES_SQL: &str = r#"
SELECT ca.compute_host_id,
       l.name AS lease_name,
       l.project_id,
       l.start_date,
       l.end_date
  FROM computehost_allocations ca
  JOIN reservations r ON ca.reservation_id = r.id
  JOIN leases l ON r.lease_id = l.id
 ORDER BY l.start_date, l.project_id
"#;

pub async fn calendar_data(pool: &PgPool) -> Result<CalendarData, AvailabilityError> {
    let host_rows = sqlx::query(HOSTS_SQL).fetch_all(pool).await?;
    let compute_hosts = host_rows
        .iter()
        .map(|row| {
            Ok(CalendarHost {
                id: row.try_get("id")?,
                hostname: row.try_get("hostname")?,
                node_type: row.try_get("node_type")?,
            })
        })
        .collect::<Result<Vec<_>, sqlx::Error>>()?;

    let entry_rows = sqlx::query(ENTRIES_SQL).fetch_all(pool).await?;
    let reservations = entry_rows
        .iter()
        .map(|row| {
            Ok(CalendarEntry {
                compute_host_id: row.try_get("compute_host_id")?,
                lease_name: row.try_get("lease_name")?,
                project_id: row.try_get("project_id")?,
                start_date: row.try_get("start_date")?,
                end_date: row.try_get("end_date")?,
            })
        })
        .collect::<Result<Vec<_>, sqlx::Error>>()?;

    Ok(CalendarData {
        compute_hosts,
        reservations,
    })
}
