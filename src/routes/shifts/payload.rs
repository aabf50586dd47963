use chrono::{DateTime, NaiveDate, Utc};
use color_eyre::eyre::eyre;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::{
    app_state::ServiceStoreType,
    domain::{
        shift_duration_hours, BreakWindow, ClockEvent, ClockTime, ServiceId,
        ServiceStoreError, Shift, ShiftAPIError, ShiftStatus, ShiftType,
        TimeWindowError,
    },
};

#[derive(Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakTimeRequest {
    pub start: Option<String>,
    pub end: Option<String>,
    pub duration_minutes: i32,
}

impl TryFrom<BreakTimeRequest> for BreakWindow {
    type Error = TimeWindowError;

    fn try_from(request: BreakTimeRequest) -> Result<Self, Self::Error> {
        BreakWindow::new(
            request.start.as_deref().map(ClockTime::parse).transpose()?,
            request.end.as_deref().map(ClockTime::parse).transpose()?,
            request.duration_minutes,
        )
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSummary {
    pub service_id: Uuid,
    pub name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftResponse {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub date: NaiveDate,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
    pub break_time: Option<BreakWindow>,
    pub status: ShiftStatus,
    pub shift_type: ShiftType,
    pub notes: Option<String>,
    pub clock_in: Option<ClockEvent>,
    pub clock_out: Option<ClockEvent>,
    pub assigned_by: Uuid,
    pub services: Vec<ServiceSummary>,
    pub duration_hours: f64,
    pub is_overnight: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ShiftResponse {
    pub fn new(shift: Shift, services: Vec<ServiceSummary>) -> Self {
        Self {
            id: *shift.id.as_ref(),
            employee_id: *shift.employee_id.as_ref(),
            date: shift.date,
            start_time: shift.window.start(),
            end_time: shift.window.end(),
            duration_hours: shift_duration_hours(&shift),
            is_overnight: shift.window.is_overnight(),
            break_time: shift.break_window,
            status: shift.status,
            shift_type: shift.shift_type,
            notes: shift.notes,
            clock_in: shift.clock_in,
            clock_out: shift.clock_out,
            assigned_by: *shift.assigned_by.as_ref(),
            services,
            created_at: shift.created_at,
            updated_at: shift.updated_at,
        }
    }
}

/// Looks up every referenced service, failing on the first unknown id.
#[tracing::instrument(name = "Resolving shift services", skip_all)]
pub async fn resolve_services(
    service_store: &ServiceStoreType,
    ids: &[ServiceId],
) -> Result<Vec<ServiceSummary>, ShiftAPIError> {
    let services = service_store.read().await;
    let mut summaries = Vec::with_capacity(ids.len());
    for id in ids {
        let service = services.get_service(id).await.map_err(|e| match e {
            ServiceStoreError::ServiceNotFound => {
                ShiftAPIError::NotFound(*id.as_ref())
            }
            e => ShiftAPIError::UnexpectedError(eyre!(e)),
        })?;
        summaries.push(ServiceSummary {
            service_id: *id.as_ref(),
            name: service.name,
        });
    }
    Ok(summaries)
}

/// Renders stored shifts. Services that have since left the catalog are
/// omitted rather than failing the read.
#[tracing::instrument(name = "Describing shifts", skip_all)]
pub async fn describe_shifts(
    service_store: &ServiceStoreType,
    shifts: Vec<Shift>,
) -> Result<Vec<ShiftResponse>, ShiftAPIError> {
    let services = service_store.read().await;
    let mut names: HashMap<ServiceId, Option<String>> = HashMap::new();
    let mut responses = Vec::with_capacity(shifts.len());

    for shift in shifts {
        let mut summaries = Vec::with_capacity(shift.services.len());
        for id in &shift.services {
            if !names.contains_key(id) {
                let name = match services.get_service(id).await {
                    Ok(service) => Some(service.name),
                    Err(ServiceStoreError::ServiceNotFound) => None,
                    Err(e) => return Err(ShiftAPIError::UnexpectedError(eyre!(e))),
                };
                names.insert(*id, name);
            }
            if let Some(Some(name)) = names.get(id) {
                summaries.push(ServiceSummary {
                    service_id: *id.as_ref(),
                    name: name.clone(),
                });
            }
        }
        responses.push(ShiftResponse::new(shift, summaries));
    }

    Ok(responses)
}

pub async fn describe_shift(
    service_store: &ServiceStoreType,
    shift: Shift,
) -> Result<ShiftResponse, ShiftAPIError> {
    describe_shifts(service_store, vec![shift])
        .await?
        .pop()
        .ok_or_else(|| ShiftAPIError::UnexpectedError(eyre!("shift was not rendered")))
}
