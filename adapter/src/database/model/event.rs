use kernel::model::{
    event::{Event, EventWithCount},
    id::{EventId, UserId},
    user::EventRegistrant,
};
use sqlx::types::chrono::{DateTime, Utc};

#[derive(sqlx::FromRow)]
pub struct EventRow {
    pub id: EventId,
    pub title: String,
    pub datetime: DateTime<Utc>,
    pub location: String,
    pub capacity: i32,
}

impl From<EventRow> for Event {
    fn from(value: EventRow) -> Self {
        let EventRow {
            id,
            title,
            datetime,
            location,
            capacity,
        } = value;
        Event {
            id,
            title,
            datetime,
            location,
            capacity,
        }
    }
}

// Used by the upcoming-events listing, which carries the registration
// count computed in the same query
#[derive(sqlx::FromRow)]
pub struct EventWithCountRow {
    pub id: EventId,
    pub title: String,
    pub datetime: DateTime<Utc>,
    pub location: String,
    pub capacity: i32,
    pub registrations_count: i64,
}

impl From<EventWithCountRow> for EventWithCount {
    fn from(value: EventWithCountRow) -> Self {
        let EventWithCountRow {
            id,
            title,
            datetime,
            location,
            capacity,
            registrations_count,
        } = value;
        EventWithCount {
            event: Event {
                id,
                title,
                datetime,
                location,
                capacity,
            },
            registrations_count,
        }
    }
}

#[derive(sqlx::FromRow)]
pub struct EventRegistrantRow {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub registered_at: DateTime<Utc>,
}

impl From<EventRegistrantRow> for EventRegistrant {
    fn from(value: EventRegistrantRow) -> Self {
        let EventRegistrantRow {
            id,
            name,
            email,
            registered_at,
        } = value;
        EventRegistrant {
            id,
            name,
            email,
            registered_at,
        }
    }
}

#[derive(sqlx::FromRow)]
pub struct EventStatsRow {
    pub capacity: i32,
    pub total_registrations: i64,
}
