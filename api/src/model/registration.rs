use kernel::model::{
    id::{EventId, UserId},
    registration::event::{NewUser, Registrant},
};
use serde::{Deserialize, Serialize};

/// Body of `POST /events/:id/register`: either `{userId}` or
/// `{name, email}`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterForEventRequest {
    pub user_id: Option<UserId>,
    pub name: Option<String>,
    pub email: Option<String>,
}

impl From<RegisterForEventRequest> for Registrant {
    fn from(value: RegisterForEventRequest) -> Self {
        match value.user_id {
            Some(user_id) => Registrant::Existing(user_id),
            // Missing name/email fall through to workflow validation,
            // which reports each absent field.
            None => Registrant::New(NewUser {
                name: value.name.unwrap_or_default(),
                email: value.email.unwrap_or_default(),
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelRegistrationRequest {
    pub user_id: Option<UserId>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterForEventResponse {
    pub message: String,
    pub user_id: UserId,
    pub event_id: EventId,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelRegistrationResponse {
    pub message: String,
}
