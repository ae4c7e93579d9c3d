use crate::extractor::Json;
use crate::model::registration::{
    CancelRegistrationRequest, CancelRegistrationResponse, RegisterForEventRequest,
    RegisterForEventResponse,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use kernel::model::{
    id::EventId,
    registration::event::{CancelRegistration, RegisterUser},
};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

pub async fn register_for_event(
    Path(event_id): Path<EventId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<RegisterForEventRequest>,
) -> AppResult<(StatusCode, Json<RegisterForEventResponse>)> {
    let register = RegisterUser::new(event_id, req.into());

    let user_id = registry
        .registration_repository()
        .register(register)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterForEventResponse {
            message: "Registration successful".into(),
            user_id,
            event_id,
        }),
    ))
}

pub async fn cancel_registration(
    Path(event_id): Path<EventId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<CancelRegistrationRequest>,
) -> AppResult<Json<CancelRegistrationResponse>> {
    let Some(user_id) = req.user_id else {
        return Err(AppError::UnprocessableEntity("userId is required".into()));
    };

    registry
        .registration_repository()
        .cancel(CancelRegistration::new(event_id, user_id))
        .await?;

    Ok(Json(CancelRegistrationResponse {
        message: "Registration cancelled".into(),
    }))
}
