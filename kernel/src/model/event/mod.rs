pub mod event;

use crate::model::{id::EventId, user::EventRegistrant};
use chrono::{DateTime, Utc};

#[derive(Debug)]
pub struct Event {
    pub id: EventId,
    pub title: String,
    pub datetime: DateTime<Utc>,
    pub location: String,
    pub capacity: i32,
}

/// An upcoming event together with its current registration count.
#[derive(Debug)]
pub struct EventWithCount {
    pub event: Event,
    pub registrations_count: i64,
}

/// An event joined with its registrants, first-registered first.
#[derive(Debug)]
pub struct EventDetails {
    pub event: Event,
    pub registrations: Vec<EventRegistrant>,
}

/// Capacity usage snapshot. All values are derived at read time and are
/// never stored.
#[derive(Debug)]
pub struct EventStats {
    pub event_id: EventId,
    pub capacity: i32,
    pub total_registrations: i64,
}

impl EventStats {
    // May go negative when rows were inserted outside the workflow;
    // surfaced as-is rather than clamped.
    pub fn remaining_capacity(&self) -> i64 {
        i64::from(self.capacity) - self.total_registrations
    }

    /// Percentage of capacity in use, rounded to two decimal places.
    /// A capacity of zero yields zero.
    pub fn percentage_capacity_used(&self) -> f64 {
        if self.capacity == 0 {
            return 0.0;
        }
        let ratio = self.total_registrations as f64 / f64::from(self.capacity);
        (ratio * 10000.0).round() / 100.0
    }
}
