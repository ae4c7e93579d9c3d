use chrono::{DateTime, Utc};
use garde::Validate;
use kernel::model::{
    event::{event::CreateEvent, Event, EventDetails, EventStats, EventWithCount},
    id::{EventId, UserId},
    user::EventRegistrant,
};
use serde::{Deserialize, Serialize};
use shared::error::AppError;

/// Fields default when absent so that a sparse body still deserializes
/// and every missing field is reported by validation, instead of the
/// first one aborting deserialization.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    #[serde(default)]
    #[garde(custom(required_title))]
    pub title: String,
    #[serde(default)]
    #[garde(custom(valid_datetime))]
    pub datetime: String,
    #[serde(default)]
    #[garde(custom(required_location))]
    pub location: String,
    #[serde(default)]
    #[garde(custom(valid_capacity))]
    pub capacity: i32,
}

fn required_title(value: &str, _context: &()) -> garde::Result {
    if value.trim().is_empty() {
        return Err(garde::Error::new("title is required and must be a string"));
    }
    Ok(())
}

fn required_location(value: &str, _context: &()) -> garde::Result {
    if value.trim().is_empty() {
        return Err(garde::Error::new(
            "location is required and must be a string",
        ));
    }
    Ok(())
}

fn valid_datetime(value: &str, _context: &()) -> garde::Result {
    if value.parse::<DateTime<Utc>>().is_err() {
        return Err(garde::Error::new(
            "datetime is required and must be in ISO format",
        ));
    }
    Ok(())
}

fn valid_capacity(value: &i32, _context: &()) -> garde::Result {
    if *value <= 0 {
        return Err(garde::Error::new("capacity must be a positive integer"));
    }
    if *value > 1000 {
        return Err(garde::Error::new("capacity must be <= 1000"));
    }
    Ok(())
}

impl TryFrom<CreateEventRequest> for CreateEvent {
    type Error = AppError;

    fn try_from(value: CreateEventRequest) -> Result<Self, Self::Error> {
        let CreateEventRequest {
            title,
            datetime,
            location,
            capacity,
        } = value;
        // Validation has already checked the format; this branch only
        // guards a conversion done without prior validation.
        let datetime = datetime.parse::<DateTime<Utc>>().map_err(|_| {
            AppError::UnprocessableEntity("datetime is required and must be in ISO format".into())
        })?;
        Ok(CreateEvent {
            title,
            datetime,
            location,
            capacity,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventResponse {
    pub event_id: EventId,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub id: EventId,
    pub title: String,
    pub datetime: DateTime<Utc>,
    pub location: String,
    pub capacity: i32,
}

impl From<Event> for EventResponse {
    fn from(value: Event) -> Self {
        let Event {
            id,
            title,
            datetime,
            location,
            capacity,
        } = value;
        Self {
            id,
            title,
            datetime,
            location,
            capacity,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingEventResponse {
    pub id: EventId,
    pub title: String,
    pub datetime: DateTime<Utc>,
    pub location: String,
    pub capacity: i32,
    pub registrations_count: i64,
}

impl From<EventWithCount> for UpcomingEventResponse {
    fn from(value: EventWithCount) -> Self {
        let EventWithCount {
            event,
            registrations_count,
        } = value;
        Self {
            id: event.id,
            title: event.title,
            datetime: event.datetime,
            location: event.location,
            capacity: event.capacity,
            registrations_count,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventListResponse {
    pub events: Vec<UpcomingEventResponse>,
}

impl From<Vec<EventWithCount>> for EventListResponse {
    fn from(value: Vec<EventWithCount>) -> Self {
        Self {
            events: value.into_iter().map(UpcomingEventResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrantResponse {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub registered_at: DateTime<Utc>,
}

impl From<EventRegistrant> for RegistrantResponse {
    fn from(value: EventRegistrant) -> Self {
        let EventRegistrant {
            id,
            name,
            email,
            registered_at,
        } = value;
        Self {
            id,
            name,
            email,
            registered_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetailsResponse {
    pub event: EventResponse,
    pub registrations: Vec<RegistrantResponse>,
}

impl From<EventDetails> for EventDetailsResponse {
    fn from(value: EventDetails) -> Self {
        let EventDetails {
            event,
            registrations,
        } = value;
        Self {
            event: event.into(),
            registrations: registrations
                .into_iter()
                .map(RegistrantResponse::from)
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventStatsResponse {
    pub event_id: EventId,
    pub total_registrations: i64,
    pub remaining_capacity: i64,
    pub percentage_capacity_used: f64,
}

impl From<EventStats> for EventStatsResponse {
    fn from(value: EventStats) -> Self {
        Self {
            event_id: value.event_id,
            total_registrations: value.total_registrations,
            remaining_capacity: value.remaining_capacity(),
            percentage_capacity_used: value.percentage_capacity_used(),
        }
    }
}
