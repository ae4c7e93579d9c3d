use crate::extractor::Json;
use crate::model::event::{
    CreateEventRequest, CreateEventResponse, EventDetailsResponse, EventListResponse,
    EventStatsResponse,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use garde::Validate;
use kernel::model::id::EventId;
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

pub async fn create_event(
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateEventRequest>,
) -> AppResult<(StatusCode, Json<CreateEventResponse>)> {
    req.validate()?;

    let event_id = registry.event_repository().create(req.try_into()?).await?;
    Ok((StatusCode::CREATED, Json(CreateEventResponse { event_id })))
}

pub async fn show_upcoming_events(
    State(registry): State<AppRegistry>,
) -> AppResult<Json<EventListResponse>> {
    registry
        .event_repository()
        .find_upcoming()
        .await
        .map(EventListResponse::from)
        .map(Json)
}

pub async fn show_event(
    Path(event_id): Path<EventId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<EventDetailsResponse>> {
    registry
        .event_repository()
        .find_details(event_id)
        .await
        .and_then(|details| match details {
            Some(details) => Ok(Json(details.into())),
            None => Err(AppError::EntityNotFound("Event not found".into())),
        })
}

pub async fn show_event_stats(
    Path(event_id): Path<EventId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<EventStatsResponse>> {
    registry
        .event_repository()
        .find_stats(event_id)
        .await
        .and_then(|stats| match stats {
            Some(stats) => Ok(Json(stats.into())),
            None => Err(AppError::EntityNotFound("Event not found".into())),
        })
}
