use crate::model::id::UserId;
use chrono::{DateTime, Utc};

#[derive(Debug, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

/// A user as they appear on an event's attendee list.
#[derive(Debug)]
pub struct EventRegistrant {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub registered_at: DateTime<Utc>,
}
