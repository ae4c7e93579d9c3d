use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use shared::error::AppError;

/// `axum::Json` with the rejection routed through the shared error
/// taxonomy, so a malformed or mistyped request body surfaces as a
/// 400 JSON `{error}` body instead of the default plain-text rejection.
#[derive(Debug)]
pub struct Json<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for Json<T>
where
    axum::Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let axum::Json(value) = axum::Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::UnprocessableEntity(rejection.body_text()))?;
        Ok(Self(value))
    }
}

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::event::CreateEventRequest;
    use axum::body::Body;
    use axum::http::{header, Request as HttpRequest};

    fn json_request(body: &'static str) -> Request {
        HttpRequest::builder()
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn malformed_body_maps_to_the_error_taxonomy() {
        let err = Json::<CreateEventRequest>::from_request(json_request("{not json"), &())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UnprocessableEntity(_)));
    }

    #[tokio::test]
    async fn mistyped_field_maps_to_the_error_taxonomy() {
        let err = Json::<CreateEventRequest>::from_request(
            json_request(r#"{"title": 5, "location": "HQ", "capacity": 10}"#),
            &(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::UnprocessableEntity(_)));
    }

    #[tokio::test]
    async fn well_formed_body_is_extracted() {
        let Json(req) = Json::<CreateEventRequest>::from_request(
            json_request(
                r#"{"title": "Launch", "datetime": "2030-01-01T00:00:00Z", "location": "HQ", "capacity": 10}"#,
            ),
            &(),
        )
        .await
        .unwrap();
        assert_eq!(req.title, "Launch");
    }
}
