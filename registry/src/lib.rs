use std::sync::Arc;

use adapter::database::ConnectionPool;
use adapter::repository::{event::EventRepositoryImpl, registration::RegistrationRepositoryImpl};
use kernel::repository::{event::EventRepository, registration::RegistrationRepository};

#[derive(Clone)]
pub struct AppRegistry {
    event_repository: Arc<dyn EventRepository>,
    registration_repository: Arc<dyn RegistrationRepository>,
}

impl AppRegistry {
    pub fn new(pool: ConnectionPool) -> Self {
        let event_repository = Arc::new(EventRepositoryImpl::new(pool.clone()));
        let registration_repository = Arc::new(RegistrationRepositoryImpl::new(pool.clone()));
        Self {
            event_repository,
            registration_repository,
        }
    }

    pub fn event_repository(&self) -> Arc<dyn EventRepository> {
        self.event_repository.clone()
    }

    pub fn registration_repository(&self) -> Arc<dyn RegistrationRepository> {
        self.registration_repository.clone()
    }
}
