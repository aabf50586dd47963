use color_eyre::eyre::eyre;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{Role, Worker, WorkerId, WorkerName, WorkerStore, WorkerStoreError};

pub struct PostgresWorkerStore {
    pool: PgPool,
}

impl PostgresWorkerStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct WorkerRow {
    id: Uuid,
    name: String,
    role: String,
    is_active: bool,
}

#[async_trait::async_trait]
impl WorkerStore for PostgresWorkerStore {
    #[tracing::instrument(name = "Adding worker to PostgreSQL", skip_all)]
    async fn add_worker(&mut self, worker: Worker) -> Result<(), WorkerStoreError> {
        sqlx::query(
            r#"
            INSERT INTO workers (id, name, role, is_active) VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(*worker.id.as_ref())
        .bind(worker.name.as_ref())
        .bind(worker.role.as_str())
        .bind(worker.is_active)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                WorkerStoreError::WorkerAlreadyExists
            }
            err => WorkerStoreError::UnexpectedError(eyre!(err)),
        })?;
        Ok(())
    }

    #[tracing::instrument(name = "Retrieving worker from PostgreSQL", skip_all)]
    async fn get_worker(&self, id: &WorkerId) -> Result<Worker, WorkerStoreError> {
        let row = sqlx::query_as::<_, WorkerRow>(
            r#"
            SELECT id, name, role, is_active FROM workers WHERE id = $1
            "#,
        )
        .bind(*id.as_ref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => WorkerStoreError::WorkerNotFound,
            err => WorkerStoreError::UnexpectedError(eyre!(err)),
        })?;

        Ok(Worker {
            id: WorkerId::new(row.id),
            name: WorkerName::parse(row.name)
                .map_err(|e| WorkerStoreError::UnexpectedError(eyre!(e)))?,
            role: row
                .role
                .parse::<Role>()
                .map_err(|e| WorkerStoreError::UnexpectedError(eyre!(e)))?,
            is_active: row.is_active,
        })
    }
}
