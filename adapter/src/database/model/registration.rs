use kernel::model::id::EventId;
use sqlx::types::chrono::{DateTime, Utc};

// The event row as seen while held under FOR UPDATE; only the columns the
// workflow checks are selected
#[derive(sqlx::FromRow)]
pub struct LockedEventRow {
    pub id: EventId,
    pub datetime: DateTime<Utc>,
    pub capacity: i32,
}
