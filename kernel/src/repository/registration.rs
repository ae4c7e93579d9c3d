use crate::model::{
    id::UserId,
    registration::event::{CancelRegistration, RegisterUser},
};
use async_trait::async_trait;
use shared::error::AppResult;

/// The registration workflow. Both operations run as a single transaction
/// serialized per event via an exclusive lock on the event row; operations
/// on different events proceed in parallel.
#[async_trait]
pub trait RegistrationRepository: Send + Sync {
    // Register a user for an event, creating the user on the fly when
    // referenced by a not-yet-known email. Returns the resolved user id.
    async fn register(&self, event: RegisterUser) -> AppResult<UserId>;
    // Remove the registration for the given (event, user) pair
    async fn cancel(&self, event: CancelRegistration) -> AppResult<()>;
}
