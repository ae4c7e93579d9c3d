use axum::{
    routing::{delete, get, post},
    Router,
};
use registry::AppRegistry;

use crate::handler::{
    event::{create_event, show_event, show_event_stats, show_upcoming_events},
    registration::{cancel_registration, register_for_event},
};

pub fn build_event_routers() -> Router<AppRegistry> {
    let events_routers = Router::new()
        .route("/", post(create_event))
        .route("/", get(show_upcoming_events))
        .route("/:event_id", get(show_event))
        .route("/:event_id/register", post(register_for_event))
        .route("/:event_id/register", delete(cancel_registration))
        .route("/:event_id/stats", get(show_event_stats));

    Router::new().nest("/events", events_routers)
}
