use color_eyre::eyre::eyre;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{SalonService, ServiceId, ServiceStore, ServiceStoreError};

pub struct PostgresServiceStore {
    pool: PgPool,
}

impl PostgresServiceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ServiceStore for PostgresServiceStore {
    #[tracing::instrument(name = "Adding service to PostgreSQL", skip_all)]
    async fn add_service(
        &mut self,
        service: SalonService,
    ) -> Result<(), ServiceStoreError> {
        sqlx::query(
            r#"
            INSERT INTO salon_services (id, name, duration_minutes, is_active)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(*service.id.as_ref())
        .bind(&service.name)
        .bind(service.duration_minutes)
        .bind(service.is_active)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                ServiceStoreError::ServiceAlreadyExists
            }
            err => ServiceStoreError::UnexpectedError(eyre!(err)),
        })?;
        Ok(())
    }

    #[tracing::instrument(name = "Retrieving service from PostgreSQL", skip_all)]
    async fn get_service(
        &self,
        id: &ServiceId,
    ) -> Result<SalonService, ServiceStoreError> {
        let (id, name, duration_minutes, is_active): (Uuid, String, i32, bool) =
            sqlx::query_as(
                r#"
                SELECT id, name, duration_minutes, is_active
                FROM salon_services
                WHERE id = $1
                "#,
            )
            .bind(*id.as_ref())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::RowNotFound => ServiceStoreError::ServiceNotFound,
                err => ServiceStoreError::UnexpectedError(eyre!(err)),
            })?;

        Ok(SalonService {
            id: ServiceId::new(id),
            name,
            duration_minutes,
            is_active,
        })
    }
}
