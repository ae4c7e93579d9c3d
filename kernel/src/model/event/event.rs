use chrono::{DateTime, Utc};

#[derive(Debug)]
pub struct CreateEvent {
    pub title: String,
    pub datetime: DateTime<Utc>,
    pub location: String,
    pub capacity: i32,
}
