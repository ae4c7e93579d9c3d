use crate::model::{
    event::{event::CreateEvent, EventDetails, EventStats, EventWithCount},
    id::EventId,
};
use async_trait::async_trait;
use shared::error::AppResult;

#[async_trait]
pub trait EventRepository: Send + Sync {
    // Persist a new event and return its id
    async fn create(&self, event: CreateEvent) -> AppResult<EventId>;
    // All strictly-future events, ordered by datetime then location
    async fn find_upcoming(&self) -> AppResult<Vec<EventWithCount>>;
    // Event plus its attendee list, ordered by registration time
    async fn find_details(&self, event_id: EventId) -> AppResult<Option<EventDetails>>;
    // Capacity usage for a single event
    async fn find_stats(&self, event_id: EventId) -> AppResult<Option<EventStats>>;
}
