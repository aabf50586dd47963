use chrono::{DateTime, NaiveDate, Utc};
use color_eyre::eyre::{eyre, Report};
use sqlx::postgres::PgExecutor;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::domain::{
    has_conflict, BreakWindow, ClockEvent, ClockTime, ConflictQuery, ServiceId,
    Shift, ShiftFilter, ShiftId, ShiftStateError, ShiftStatus, ShiftStore,
    ShiftStoreError, TimeWindow, WorkerId,
};

const SHIFT_COLUMNS: &str = "id, employee_id, shift_date, start_minute, \
    end_minute, break_start_minute, break_end_minute, break_minutes, status, \
    shift_type, notes, clock_in_time, clock_in_location, clock_out_time, \
    clock_out_location, assigned_by, service_ids, created_at, updated_at";

/// Check-and-write happens inside one transaction. Placement checks hold a
/// transaction-scoped advisory lock on (employee, date); clock events and
/// deletes are single conditional statements.
pub struct PostgresShiftStore {
    pool: PgPool,
}

impl PostgresShiftStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Works out why a conditional write touched no row by replaying the
    /// domain guard on the current record.
    async fn explain_rejection<F>(&self, id: &ShiftId, guard: F) -> ShiftStoreError
    where
        F: FnOnce(&mut Shift) -> Result<(), ShiftStateError> + Send,
    {
        let mut shift = match self.get_shift(id).await {
            Ok(shift) => shift,
            Err(e) => return e,
        };
        match guard(&mut shift) {
            Err(e) => ShiftStoreError::InvalidState(e),
            Ok(()) => ShiftStoreError::StatusChanged,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ShiftRow {
    id: Uuid,
    employee_id: Uuid,
    shift_date: NaiveDate,
    start_minute: i32,
    end_minute: i32,
    break_start_minute: Option<i32>,
    break_end_minute: Option<i32>,
    break_minutes: Option<i32>,
    status: String,
    shift_type: String,
    notes: Option<String>,
    clock_in_time: Option<DateTime<Utc>>,
    clock_in_location: Option<String>,
    clock_out_time: Option<DateTime<Utc>>,
    clock_out_location: Option<String>,
    assigned_by: Uuid,
    service_ids: Vec<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ShiftRow> for Shift {
    type Error = Report;

    fn try_from(row: ShiftRow) -> Result<Self, Self::Error> {
        let window = TimeWindow::new(
            ClockTime::from_minutes(row.start_minute)?,
            ClockTime::from_minutes(row.end_minute)?,
        )?;
        let break_window = match row.break_minutes {
            Some(minutes) => Some(BreakWindow::new(
                row.break_start_minute
                    .map(ClockTime::from_minutes)
                    .transpose()?,
                row.break_end_minute.map(ClockTime::from_minutes).transpose()?,
                minutes,
            )?),
            None => None,
        };

        Ok(Shift {
            id: ShiftId::new(row.id),
            employee_id: WorkerId::new(row.employee_id),
            date: row.shift_date,
            window,
            break_window,
            status: row.status.parse()?,
            shift_type: row.shift_type.parse()?,
            notes: row.notes,
            clock_in: row
                .clock_in_time
                .map(|time| ClockEvent::new(time, row.clock_in_location)),
            clock_out: row
                .clock_out_time
                .map(|time| ClockEvent::new(time, row.clock_out_location)),
            assigned_by: WorkerId::new(row.assigned_by),
            services: row.service_ids.into_iter().map(ServiceId::new).collect(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn unexpected(e: sqlx::Error) -> ShiftStoreError {
    ShiftStoreError::UnexpectedError(eyre!(e))
}

fn into_shifts(rows: Vec<ShiftRow>) -> Result<Vec<Shift>, ShiftStoreError> {
    rows.into_iter()
        .map(|row| Shift::try_from(row).map_err(ShiftStoreError::UnexpectedError))
        .collect()
}

fn service_ids(shift: &Shift) -> Vec<Uuid> {
    shift.services.iter().map(|id| *id.as_ref()).collect()
}

async fn lock_schedule(
    tx: &mut Transaction<'_, Postgres>,
    employee_id: &WorkerId,
    date: NaiveDate,
) -> Result<(), ShiftStoreError> {
    sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
        .bind(format!("{employee_id}:{date}"))
        .execute(&mut **tx)
        .await
        .map_err(unexpected)?;
    Ok(())
}

async fn fetch_active_shifts<'e, E>(
    executor: E,
    employee_id: &WorkerId,
    date: NaiveDate,
) -> Result<Vec<Shift>, ShiftStoreError>
where
    E: PgExecutor<'e>,
{
    let sql = format!(
        "SELECT {SHIFT_COLUMNS} FROM shifts \
         WHERE employee_id = $1 AND shift_date = $2 \
         AND status IN ('Scheduled', 'Completed')"
    );
    let rows = sqlx::query_as::<_, ShiftRow>(&sql)
        .bind(*employee_id.as_ref())
        .bind(date)
        .fetch_all(executor)
        .await
        .map_err(unexpected)?;
    into_shifts(rows)
}

/// Serializes placements for the shift's (employee, date) and rejects it if
/// it overlaps another active shift there.
async fn ensure_no_conflict(
    tx: &mut Transaction<'_, Postgres>,
    shift: &Shift,
) -> Result<(), ShiftStoreError> {
    if !shift.status.occupies_schedule() {
        return Ok(());
    }
    lock_schedule(tx, &shift.employee_id, shift.date).await?;
    let existing = fetch_active_shifts(&mut **tx, &shift.employee_id, shift.date).await?;
    if has_conflict(&ConflictQuery::for_shift(shift), &existing) {
        return Err(ShiftStoreError::ShiftConflict);
    }
    Ok(())
}

#[async_trait::async_trait]
impl ShiftStore for PostgresShiftStore {
    #[tracing::instrument(name = "Adding shift to PostgreSQL", skip_all)]
    async fn add_shift(&mut self, shift: &Shift) -> Result<(), ShiftStoreError> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;
        ensure_no_conflict(&mut tx, shift).await?;

        sqlx::query(
            r#"
            INSERT INTO shifts (
                id, employee_id, shift_date, start_minute, end_minute,
                break_start_minute, break_end_minute, break_minutes, status,
                shift_type, notes, clock_in_time, clock_in_location,
                clock_out_time, clock_out_location, assigned_by, service_ids,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                    $14, $15, $16, $17, $18, $19)
            "#,
        )
        .bind(*shift.id.as_ref())
        .bind(*shift.employee_id.as_ref())
        .bind(shift.date)
        .bind(shift.window.start().value_of())
        .bind(shift.window.end().value_of())
        .bind(
            shift
                .break_window
                .as_ref()
                .and_then(|b| b.start())
                .map(|t| t.value_of()),
        )
        .bind(
            shift
                .break_window
                .as_ref()
                .and_then(|b| b.end())
                .map(|t| t.value_of()),
        )
        .bind(shift.break_window.as_ref().map(|b| b.duration_minutes()))
        .bind(shift.status.as_str())
        .bind(shift.shift_type.as_str())
        .bind(shift.notes.clone())
        .bind(shift.clock_in.as_ref().map(|e| e.time))
        .bind(shift.clock_in.as_ref().and_then(|e| e.location.clone()))
        .bind(shift.clock_out.as_ref().map(|e| e.time))
        .bind(shift.clock_out.as_ref().and_then(|e| e.location.clone()))
        .bind(*shift.assigned_by.as_ref())
        .bind(service_ids(shift))
        .bind(shift.created_at)
        .bind(shift.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                ShiftStoreError::ShiftIdExists
            }
            e => unexpected(e),
        })?;

        tx.commit().await.map_err(unexpected)?;
        Ok(())
    }

    #[tracing::instrument(name = "Retrieving shift from PostgreSQL", skip_all)]
    async fn get_shift(&self, id: &ShiftId) -> Result<Shift, ShiftStoreError> {
        let sql = format!("SELECT {SHIFT_COLUMNS} FROM shifts WHERE id = $1");
        let row = sqlx::query_as::<_, ShiftRow>(&sql)
            .bind(*id.as_ref())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::RowNotFound => ShiftStoreError::ShiftNotFound,
                e => unexpected(e),
            })?;
        Shift::try_from(row).map_err(ShiftStoreError::UnexpectedError)
    }

    #[tracing::instrument(name = "Listing shifts from PostgreSQL", skip_all)]
    async fn get_shifts(
        &self,
        filter: &ShiftFilter,
    ) -> Result<Vec<Shift>, ShiftStoreError> {
        let sql = format!(
            "SELECT {SHIFT_COLUMNS} FROM shifts \
             WHERE ($1::date IS NULL OR shift_date >= $1) \
             AND ($2::date IS NULL OR shift_date <= $2) \
             AND ($3::uuid IS NULL OR employee_id = $3) \
             AND ($4::text IS NULL OR status = $4) \
             ORDER BY shift_date, start_minute"
        );
        let rows = sqlx::query_as::<_, ShiftRow>(&sql)
            .bind(filter.start_date)
            .bind(filter.end_date)
            .bind(filter.employee_id.map(|id| *id.as_ref()))
            .bind(filter.status.map(|status| status.as_str()))
            .fetch_all(&self.pool)
            .await
            .map_err(unexpected)?;
        into_shifts(rows)
    }

    #[tracing::instrument(name = "Retrieving active shifts from PostgreSQL", skip_all)]
    async fn get_active_shifts(
        &self,
        employee_id: &WorkerId,
        date: NaiveDate,
    ) -> Result<Vec<Shift>, ShiftStoreError> {
        fetch_active_shifts(&self.pool, employee_id, date).await
    }

    #[tracing::instrument(name = "Updating shift in PostgreSQL", skip_all)]
    async fn update_shift(
        &mut self,
        shift: &Shift,
        expected_status: ShiftStatus,
    ) -> Result<(), ShiftStoreError> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;

        let current: Option<(String, bool)> = sqlx::query_as(
            "SELECT status, clock_in_time IS NOT NULL FROM shifts \
             WHERE id = $1 FOR UPDATE",
        )
        .bind(*shift.id.as_ref())
        .fetch_optional(&mut *tx)
        .await
        .map_err(unexpected)?;
        match current {
            None => return Err(ShiftStoreError::ShiftNotFound),
            Some((status, clocked_in))
                if status != expected_status.as_str()
                    || clocked_in != shift.clock_in.is_some() =>
            {
                return Err(ShiftStoreError::StatusChanged)
            }
            Some(_) => {}
        }
        ensure_no_conflict(&mut tx, shift).await?;

        sqlx::query(
            r#"
            UPDATE shifts SET
                employee_id = $2, shift_date = $3, start_minute = $4,
                end_minute = $5, break_start_minute = $6, break_end_minute = $7,
                break_minutes = $8, status = $9, shift_type = $10, notes = $11,
                service_ids = $12, updated_at = $13
            WHERE id = $1
            "#,
        )
        .bind(*shift.id.as_ref())
        .bind(*shift.employee_id.as_ref())
        .bind(shift.date)
        .bind(shift.window.start().value_of())
        .bind(shift.window.end().value_of())
        .bind(
            shift
                .break_window
                .as_ref()
                .and_then(|b| b.start())
                .map(|t| t.value_of()),
        )
        .bind(
            shift
                .break_window
                .as_ref()
                .and_then(|b| b.end())
                .map(|t| t.value_of()),
        )
        .bind(shift.break_window.as_ref().map(|b| b.duration_minutes()))
        .bind(shift.status.as_str())
        .bind(shift.shift_type.as_str())
        .bind(shift.notes.clone())
        .bind(service_ids(shift))
        .bind(shift.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(unexpected)?;

        tx.commit().await.map_err(unexpected)?;
        Ok(())
    }

    #[tracing::instrument(name = "Clocking in shift in PostgreSQL", skip_all)]
    async fn clock_in(
        &mut self,
        id: &ShiftId,
        employee_id: &WorkerId,
        event: ClockEvent,
    ) -> Result<Shift, ShiftStoreError> {
        let sql = format!(
            "UPDATE shifts SET clock_in_time = $3, clock_in_location = $4, \
             updated_at = $3 \
             WHERE id = $1 AND employee_id = $2 AND status = 'Scheduled' \
             AND clock_in_time IS NULL \
             RETURNING {SHIFT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, ShiftRow>(&sql)
            .bind(*id.as_ref())
            .bind(*employee_id.as_ref())
            .bind(event.time)
            .bind(event.location.clone())
            .fetch_optional(&self.pool)
            .await
            .map_err(unexpected)?;

        match row {
            Some(row) => Shift::try_from(row).map_err(ShiftStoreError::UnexpectedError),
            None => Err(self
                .explain_rejection(id, |shift| shift.clock_in(employee_id, event))
                .await),
        }
    }

    #[tracing::instrument(name = "Clocking out shift in PostgreSQL", skip_all)]
    async fn clock_out(
        &mut self,
        id: &ShiftId,
        employee_id: &WorkerId,
        event: ClockEvent,
    ) -> Result<Shift, ShiftStoreError> {
        let sql = format!(
            "UPDATE shifts SET clock_out_time = $3, clock_out_location = $4, \
             status = 'Completed', updated_at = $3 \
             WHERE id = $1 AND employee_id = $2 AND status = 'Scheduled' \
             AND clock_in_time IS NOT NULL AND clock_out_time IS NULL \
             AND clock_in_time < $3 \
             RETURNING {SHIFT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, ShiftRow>(&sql)
            .bind(*id.as_ref())
            .bind(*employee_id.as_ref())
            .bind(event.time)
            .bind(event.location.clone())
            .fetch_optional(&self.pool)
            .await
            .map_err(unexpected)?;

        match row {
            Some(row) => Shift::try_from(row).map_err(ShiftStoreError::UnexpectedError),
            None => Err(self
                .explain_rejection(id, |shift| shift.clock_out(employee_id, event))
                .await),
        }
    }

    #[tracing::instrument(name = "Deleting shift from PostgreSQL", skip_all)]
    async fn delete_shift(&mut self, id: &ShiftId) -> Result<(), ShiftStoreError> {
        let result =
            sqlx::query("DELETE FROM shifts WHERE id = $1 AND status <> 'Completed'")
                .bind(*id.as_ref())
                .execute(&self.pool)
                .await
                .map_err(unexpected)?;

        if result.rows_affected() == 0 {
            return Err(self
                .explain_rejection(id, |shift| shift.ensure_deletable())
                .await);
        }
        Ok(())
    }
}
