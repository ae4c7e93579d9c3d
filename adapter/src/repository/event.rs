use crate::database::{
    model::event::{EventRegistrantRow, EventRow, EventStatsRow, EventWithCountRow},
    ConnectionPool,
};
use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    event::{event::CreateEvent, EventDetails, EventStats, EventWithCount},
    id::EventId,
    user::EventRegistrant,
};
use kernel::repository::event::EventRepository;
use shared::error::{AppError, AppResult};

#[derive(new)]
pub struct EventRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl EventRepository for EventRepositoryImpl {
    async fn create(&self, event: CreateEvent) -> AppResult<EventId> {
        sqlx::query_scalar::<_, EventId>(
            r#"
                INSERT INTO events (title, datetime, location, capacity)
                VALUES ($1, $2, $3, $4)
                RETURNING id
            "#,
        )
        .bind(&event.title)
        .bind(event.datetime)
        .bind(&event.location)
        .bind(event.capacity)
        .fetch_one(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)
    }

    // Strictly-future events only; ties on datetime are broken by location
    async fn find_upcoming(&self) -> AppResult<Vec<EventWithCount>> {
        sqlx::query_as::<_, EventWithCountRow>(
            r#"
                SELECT
                    e.id,
                    e.title,
                    e.datetime,
                    e.location,
                    e.capacity,
                    (
                        SELECT COUNT(*) FROM registrations AS r
                        WHERE r.event_id = e.id
                    ) AS registrations_count
                FROM events AS e
                WHERE e.datetime > now()
                ORDER BY e.datetime ASC, e.location ASC
            "#,
        )
        .fetch_all(self.db.inner_ref())
        .await
        .map(|rows| rows.into_iter().map(EventWithCount::from).collect())
        .map_err(AppError::SpecificOperationError)
    }

    async fn find_details(&self, event_id: EventId) -> AppResult<Option<EventDetails>> {
        let event = sqlx::query_as::<_, EventRow>(
            r#"
                SELECT id, title, datetime, location, capacity
                FROM events
                WHERE id = $1
            "#,
        )
        .bind(event_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        let Some(event) = event else {
            return Ok(None);
        };

        // first-registered first
        let registrations: Vec<EventRegistrant> = sqlx::query_as::<_, EventRegistrantRow>(
            r#"
                SELECT u.id, u.name, u.email, r.registered_at
                FROM registrations AS r
                INNER JOIN users AS u ON r.user_id = u.id
                WHERE r.event_id = $1
                ORDER BY r.registered_at ASC
            "#,
        )
        .bind(event_id)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .into_iter()
        .map(EventRegistrant::from)
        .collect();

        Ok(Some(EventDetails {
            event: event.into(),
            registrations,
        }))
    }

    async fn find_stats(&self, event_id: EventId) -> AppResult<Option<EventStats>> {
        let row = sqlx::query_as::<_, EventStatsRow>(
            r#"
                SELECT
                    e.capacity,
                    (
                        SELECT COUNT(*) FROM registrations AS r
                        WHERE r.event_id = e.id
                    ) AS total_registrations
                FROM events AS e
                WHERE e.id = $1
            "#,
        )
        .bind(event_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(row.map(|row| EventStats {
            event_id,
            capacity: row.capacity,
            total_registrations: row.total_registrations,
        }))
    }
}
