use crate::database::{model::registration::LockedEventRow, ConnectionPool};
use async_trait::async_trait;
use chrono::Utc;
use derive_new::new;
use garde::Validate;
use kernel::model::{
    id::{EventId, UserId},
    registration::event::{CancelRegistration, RegisterUser, Registrant},
};
use kernel::repository::registration::RegistrationRepository;
use shared::error::{AppError, AppResult};

#[derive(new)]
pub struct RegistrationRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl RegistrationRepository for RegistrationRepositoryImpl {
    async fn register(&self, event: RegisterUser) -> AppResult<UserId> {
        let mut tx = self.db.begin().await?;
        self.set_lock_timeout(&mut tx).await?;

        // Take an exclusive lock on the event row for the rest of the
        // transaction. Every check below and the final insert are observed
        // as one atomic unit by competing registrations and cancellations
        // on this event; other events are not blocked.
        let locked = sqlx::query_as::<_, LockedEventRow>(
            r#"
                SELECT id, datetime, capacity
                FROM events
                WHERE id = $1
                FOR UPDATE
            "#,
        )
        .bind(event.event_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        // Early returns drop the transaction, which rolls it back.
        let Some(locked) = locked else {
            return Err(AppError::EntityNotFound(format!(
                "Event ({}) not found",
                event.event_id
            )));
        };

        if locked.datetime <= Utc::now() {
            return Err(AppError::UnprocessableEntity(
                "Cannot register for past events".into(),
            ));
        }

        let user_id = self.resolve_registrant(&mut tx, event.registrant).await?;

        let already_registered = sqlx::query_scalar::<_, i64>(
            r#"
                SELECT COUNT(*)
                FROM registrations
                WHERE event_id = $1 AND user_id = $2
            "#,
        )
        .bind(event.event_id)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if already_registered > 0 {
            return Err(AppError::ResourceConflict(
                "User already registered for this event".into(),
            ));
        }

        let current_count = sqlx::query_scalar::<_, i64>(
            r#"
                SELECT COUNT(*)
                FROM registrations
                WHERE event_id = $1
            "#,
        )
        .bind(event.event_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if current_count >= i64::from(locked.capacity) {
            return Err(AppError::UnprocessableEntity("Event is full".into()));
        }

        let res = sqlx::query(
            r#"
                INSERT INTO registrations (event_id, user_id, registered_at)
                VALUES ($1, $2, $3)
            "#,
        )
        .bind(event.event_id)
        .bind(user_id)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No registration record has been created".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(user_id)
    }

    async fn cancel(&self, event: CancelRegistration) -> AppResult<()> {
        let mut tx = self.db.begin().await?;
        self.set_lock_timeout(&mut tx).await?;

        // Same lock as register, so a cancellation never interleaves with
        // a capacity check on the same event.
        let locked = sqlx::query_scalar::<_, EventId>(
            r#"
                SELECT id
                FROM events
                WHERE id = $1
                FOR UPDATE
            "#,
        )
        .bind(event.event_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if locked.is_none() {
            return Err(AppError::EntityNotFound(format!(
                "Event ({}) not found",
                event.event_id
            )));
        }

        let res = sqlx::query(
            r#"
                DELETE FROM registrations
                WHERE event_id = $1 AND user_id = $2
            "#,
        )
        .bind(event.event_id)
        .bind(event.user_id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound(
                "Registration not found for this user and event".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(())
    }
}

impl RegistrationRepositoryImpl {
    // A stalled peer holding the event lock must not block this request
    // forever; the timeout turns into a storage error the caller can retry.
    async fn set_lock_timeout(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> AppResult<()> {
        sqlx::query("SET LOCAL lock_timeout = '5s'")
            .execute(&mut **tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
        Ok(())
    }

    async fn resolve_registrant(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        registrant: Registrant,
    ) -> AppResult<UserId> {
        match registrant {
            Registrant::Existing(user_id) => {
                let found = sqlx::query_scalar::<_, UserId>(
                    r#"
                        SELECT id
                        FROM users
                        WHERE id = $1
                    "#,
                )
                .bind(user_id)
                .fetch_optional(&mut **tx)
                .await
                .map_err(AppError::SpecificOperationError)?;

                found.ok_or_else(|| AppError::EntityNotFound(format!("User ({user_id}) not found")))
            }
            Registrant::New(new_user) => {
                new_user.validate()?;

                if let Some(user_id) = sqlx::query_scalar::<_, UserId>(
                    r#"
                        SELECT id
                        FROM users
                        WHERE email = $1
                    "#,
                )
                .bind(&new_user.email)
                .fetch_optional(&mut **tx)
                .await
                .map_err(AppError::SpecificOperationError)?
                {
                    return Ok(user_id);
                }

                // A registration for a different event may insert the same
                // email between the lookup and this insert; on conflict we
                // re-fetch and proceed with the existing row.
                let inserted = sqlx::query_scalar::<_, UserId>(
                    r#"
                        INSERT INTO users (name, email)
                        VALUES ($1, $2)
                        ON CONFLICT (email) DO NOTHING
                        RETURNING id
                    "#,
                )
                .bind(&new_user.name)
                .bind(&new_user.email)
                .fetch_optional(&mut **tx)
                .await
                .map_err(AppError::SpecificOperationError)?;

                match inserted {
                    Some(user_id) => Ok(user_id),
                    None => sqlx::query_scalar::<_, UserId>(
                        r#"
                            SELECT id
                            FROM users
                            WHERE email = $1
                        "#,
                    )
                    .bind(&new_user.email)
                    .fetch_one(&mut **tx)
                    .await
                    .map_err(AppError::SpecificOperationError),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::event::EventRepositoryImpl;
    use chrono::Duration;
    use kernel::model::{event::event::CreateEvent, registration::event::NewUser};
    use kernel::repository::event::EventRepository;
    use std::sync::Arc;
    use tokio::task::JoinSet;

    async fn seed_event(pool: &sqlx::PgPool, offset: Duration, capacity: i32) -> EventId {
        let repo = EventRepositoryImpl::new(ConnectionPool::new(pool.clone()));
        repo.create(CreateEvent {
            title: "Launch".into(),
            datetime: Utc::now() + offset,
            location: "HQ".into(),
            capacity,
        })
        .await
        .unwrap()
    }

    async fn seed_user(pool: &sqlx::PgPool, name: &str, email: &str) -> UserId {
        sqlx::query_scalar::<_, UserId>(
            "INSERT INTO users (name, email) VALUES ($1, $2) RETURNING id",
        )
        .bind(name)
        .bind(email)
        .fetch_one(pool)
        .await
        .unwrap()
    }

    fn register_existing(event_id: EventId, user_id: UserId) -> RegisterUser {
        RegisterUser::new(event_id, Registrant::Existing(user_id))
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn test_capacity_one_scenario(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = RegistrationRepositoryImpl::new(ConnectionPool::new(pool.clone()));
        let event_id = seed_event(&pool, Duration::days(1), 1).await;
        let user_a = seed_user(&pool, "User A", "a@example.com").await;
        let user_b = seed_user(&pool, "User B", "b@example.com").await;

        repo.register(register_existing(event_id, user_a)).await?;

        let err = repo
            .register(register_existing(event_id, user_b))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UnprocessableEntity(msg) if msg == "Event is full"));

        repo.cancel(CancelRegistration::new(event_id, user_a))
            .await?;

        repo.register(register_existing(event_id, user_b)).await?;

        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn test_duplicate_registration_is_a_conflict(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = RegistrationRepositoryImpl::new(ConnectionPool::new(pool.clone()));
        let event_id = seed_event(&pool, Duration::days(1), 10).await;
        let user_id = seed_user(&pool, "Dup", "dup@example.com").await;

        repo.register(register_existing(event_id, user_id)).await?;
        let err = repo
            .register(register_existing(event_id, user_id))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ResourceConflict(_)));

        let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM registrations")
            .fetch_one(&pool)
            .await?;
        assert_eq!(rows, 1);

        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn test_past_event_rejected_regardless_of_capacity(
        pool: sqlx::PgPool,
    ) -> anyhow::Result<()> {
        let repo = RegistrationRepositoryImpl::new(ConnectionPool::new(pool.clone()));
        let event_id = seed_event(&pool, -Duration::hours(1), 100).await;
        let user_id = seed_user(&pool, "Late", "late@example.com").await;

        let err = repo
            .register(register_existing(event_id, user_id))
            .await
            .unwrap_err();
        assert!(
            matches!(err, AppError::UnprocessableEntity(msg) if msg == "Cannot register for past events")
        );

        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn test_unknown_event_and_user_are_not_found(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = RegistrationRepositoryImpl::new(ConnectionPool::new(pool.clone()));

        let err = repo
            .register(register_existing(EventId::new(999), UserId::new(1)))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::EntityNotFound(_)));

        let event_id = seed_event(&pool, Duration::days(1), 10).await;
        let err = repo
            .register(register_existing(event_id, UserId::new(999)))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::EntityNotFound(_)));

        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn test_cancel_missing_registration_is_not_found_twice(
        pool: sqlx::PgPool,
    ) -> anyhow::Result<()> {
        let repo = RegistrationRepositoryImpl::new(ConnectionPool::new(pool.clone()));
        let event_id = seed_event(&pool, Duration::days(1), 10).await;
        let user_id = seed_user(&pool, "Ghost", "ghost@example.com").await;

        for _ in 0..2 {
            let err = repo
                .cancel(CancelRegistration::new(event_id, user_id))
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::EntityNotFound(_)));
        }

        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn test_lazy_user_creation_reuses_existing_email(
        pool: sqlx::PgPool,
    ) -> anyhow::Result<()> {
        let repo = RegistrationRepositoryImpl::new(ConnectionPool::new(pool.clone()));
        let first = seed_event(&pool, Duration::days(1), 10).await;
        let second = seed_event(&pool, Duration::days(2), 10).await;

        let new_user = |name: &str| {
            Registrant::New(NewUser {
                name: name.into(),
                email: "carol@example.com".into(),
            })
        };

        let created = repo
            .register(RegisterUser::new(first, new_user("Carol")))
            .await?;
        let reused = repo
            .register(RegisterUser::new(second, new_user("Carol again")))
            .await?;
        assert_eq!(created, reused);

        let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&pool)
            .await?;
        assert_eq!(users, 1);

        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn test_malformed_new_user_is_a_validation_error(
        pool: sqlx::PgPool,
    ) -> anyhow::Result<()> {
        let repo = RegistrationRepositoryImpl::new(ConnectionPool::new(pool.clone()));
        let event_id = seed_event(&pool, Duration::days(1), 10).await;

        let err = repo
            .register(RegisterUser::new(
                event_id,
                Registrant::New(NewUser {
                    name: "No At Sign".into(),
                    email: "nowhere".into(),
                }),
            ))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));

        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn test_concurrent_registrations_never_exceed_capacity(
        pool: sqlx::PgPool,
    ) -> anyhow::Result<()> {
        const CAPACITY: i32 = 3;
        const CONTENDERS: i64 = 6;

        let repo = Arc::new(RegistrationRepositoryImpl::new(ConnectionPool::new(
            pool.clone(),
        )));
        let event_id = seed_event(&pool, Duration::days(1), CAPACITY).await;

        let mut user_ids = Vec::new();
        for i in 0..CONTENDERS {
            user_ids.push(seed_user(&pool, &format!("User {i}"), &format!("u{i}@example.com")).await);
        }

        let mut tasks = JoinSet::new();
        for user_id in user_ids {
            let repo = Arc::clone(&repo);
            tasks.spawn(async move { repo.register(register_existing(event_id, user_id)).await });
        }

        let mut succeeded = 0;
        let mut rejected_full = 0;
        while let Some(result) = tasks.join_next().await {
            match result? {
                Ok(_) => succeeded += 1,
                Err(AppError::UnprocessableEntity(msg)) if msg == "Event is full" => {
                    rejected_full += 1
                }
                Err(other) => return Err(other.into()),
            }
        }
        assert_eq!(succeeded, i64::from(CAPACITY));
        assert_eq!(rejected_full, CONTENDERS - i64::from(CAPACITY));

        let committed: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM registrations WHERE event_id = $1")
                .bind(event_id)
                .fetch_one(&pool)
                .await?;
        assert_eq!(committed, i64::from(CAPACITY));

        Ok(())
    }
}
