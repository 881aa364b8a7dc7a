// src/routes/appointment_routes.rs

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::post,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::{
    doctors,
    error::ApiError,
    middleware::auth_context::AuthContext,
    models::AppState,
    report::ReportDoc,
    store::paths,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/appointments", post(book_appointment).get(list_appointments))
        .route("/appointments/{appointment_id}/cancel", post(cancel_appointment))
}

#[derive(Debug, Serialize)]
pub struct ApiOk<T> {
    pub data: T,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Booked,
    Completed,
    Cancelled,
}

/// State machine step applied on every listing: a booked appointment
/// whose time has passed reads as completed. Completed and cancelled are
/// terminal.
pub fn effective_status(
    status: AppointmentStatus,
    date: DateTime<Utc>,
    now: DateTime<Utc>,
) -> AppointmentStatus {
    if status == AppointmentStatus::Booked && date < now {
        AppointmentStatus::Completed
    } else {
        status
    }
}

/// Snapshot of a report attached to an appointment at booking time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedReport {
    pub id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub report: String,
}

/// An appointment as persisted at `user/{uid}/appointments/{id}`.
/// The provider is referenced by stable id; name and fee are denormalized
/// from the roster at booking time for presentation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentDoc {
    pub provider_id: u32,
    pub doctor: String,
    pub date: DateTime<Utc>,
    pub price: u32,
    pub requested_reports: u32,
    pub submitted_reports: Vec<SubmittedReport>,
    pub status: AppointmentStatus,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentDto {
    pub id: Uuid,
    #[serde(flatten)]
    pub doc: AppointmentDoc,
}

#[derive(Debug, Deserialize)]
pub struct BookAppointmentRequest {
    pub provider_id: u32,
    pub date: DateTime<Utc>,
    /// How many of the latest reports to hand over to the doctor.
    pub requested_reports: Option<u32>,
}

pub async fn book_appointment(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(req): Json<BookAppointmentRequest>,
) -> Result<Json<ApiOk<AppointmentDto>>, ApiError> {
    let provider = doctors::find_provider(req.provider_id).ok_or_else(|| {
        ApiError::BadRequest(
            "UNKNOWN_PROVIDER",
            format!("no provider with id {}", req.provider_id),
        )
    })?;

    let requested_reports = req.requested_reports.unwrap_or(0);

    // Snapshot the latest N reports (by window end date) into the booking.
    let submitted_reports = if requested_reports > 0 {
        latest_reports(&state, auth.user_id, requested_reports as usize).await?
    } else {
        Vec::new()
    };

    let doc = AppointmentDoc {
        provider_id: provider.id,
        doctor: provider.name.to_string(),
        date: req.date,
        price: provider.price,
        requested_reports,
        submitted_reports,
        status: AppointmentStatus::Booked,
    };

    let appointment_id = Uuid::new_v4();
    let doc_json = serde_json::to_value(&doc)
        .map_err(|e| ApiError::Internal(format!("appointment encode error: {e}")))?;
    state
        .store
        .create(&paths::appointment(auth.user_id, appointment_id), &doc_json)
        .await?;

    Ok(Json(ApiOk {
        data: AppointmentDto {
            id: appointment_id,
            doc,
        },
    }))
}

pub async fn list_appointments(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<ApiOk<Vec<AppointmentDto>>>, ApiError> {
    let docs = state
        .store
        .list(&paths::appointments_prefix(auth.user_id))
        .await?;
    let now = Utc::now();

    let mut appointments = Vec::with_capacity(docs.len());
    for stored in docs {
        let id: Uuid = stored.id().parse().map_err(|_| {
            ApiError::Internal(format!("invalid appointment document id: {}", stored.path))
        })?;
        let mut doc: AppointmentDoc = stored.decode()?;

        // booked -> completed is system-evaluated at listing time and
        // written back before the record is returned.
        let status = effective_status(doc.status, doc.date, now);
        if status != doc.status {
            state
                .store
                .update_fields(&stored.path, &json!({ "status": status }))
                .await?;
            doc.status = status;
        }

        appointments.push(AppointmentDto { id, doc });
    }

    appointments.sort_by(|a, b| b.doc.date.cmp(&a.doc.date));
    Ok(Json(ApiOk { data: appointments }))
}

pub async fn cancel_appointment(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<ApiOk<AppointmentDto>>, ApiError> {
    let path = paths::appointment(auth.user_id, appointment_id);
    let data = state
        .store
        .get(&path)
        .await?
        .ok_or_else(|| ApiError::NotFound("NOT_FOUND", "appointment not found".into()))?;

    let mut doc: AppointmentDoc = serde_json::from_value(data)
        .map_err(|e| ApiError::Internal(format!("appointment decode error: {e}")))?;

    // Cancellation is only defined out of `booked`; a past-dated booked
    // appointment already reads as completed, which is terminal.
    if effective_status(doc.status, doc.date, Utc::now()) != AppointmentStatus::Booked {
        return Err(ApiError::BadRequest(
            "INVALID_STATUS",
            "Only booked appointments can be cancelled".into(),
        ));
    }

    state
        .store
        .update_fields(&path, &json!({ "status": AppointmentStatus::Cancelled }))
        .await?;
    doc.status = AppointmentStatus::Cancelled;

    Ok(Json(ApiOk {
        data: AppointmentDto {
            id: appointment_id,
            doc,
        },
    }))
}

/// The user's most recent `count` reports, newest window first.
async fn latest_reports(
    state: &AppState,
    uid: Uuid,
    count: usize,
) -> Result<Vec<SubmittedReport>, ApiError> {
    let docs = state.store.list(&paths::reports_prefix(uid)).await?;

    let mut reports = Vec::with_capacity(docs.len());
    for doc in docs {
        let id = doc.id().to_string();
        let stored: ReportDoc = doc.decode()?;
        reports.push(SubmittedReport {
            id,
            start_date: stored.start_date,
            end_date: stored.end_date,
            report: stored.report,
        });
    }

    reports.sort_by(|a, b| b.end_date.cmp(&a.end_date));
    reports.truncate(count);
    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn past_booked_reads_as_completed() {
        let now = Utc::now();
        let status = effective_status(AppointmentStatus::Booked, now - Duration::hours(1), now);
        assert_eq!(status, AppointmentStatus::Completed);
    }

    #[test]
    fn future_booked_stays_booked() {
        let now = Utc::now();
        let status = effective_status(AppointmentStatus::Booked, now + Duration::hours(1), now);
        assert_eq!(status, AppointmentStatus::Booked);
    }

    #[test]
    fn terminal_states_ignore_the_clock() {
        let now = Utc::now();
        let past = now - Duration::days(30);
        assert_eq!(
            effective_status(AppointmentStatus::Cancelled, past, now),
            AppointmentStatus::Cancelled
        );
        assert_eq!(
            effective_status(AppointmentStatus::Completed, past, now),
            AppointmentStatus::Completed
        );
    }

    #[test]
    fn appointment_date_exactly_now_is_not_completed() {
        // Strictly-earlier comparison: an appointment happening right now
        // is still booked.
        let now = Utc::now();
        assert_eq!(
            effective_status(AppointmentStatus::Booked, now, now),
            AppointmentStatus::Booked
        );
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(AppointmentStatus::Booked).unwrap(),
            serde_json::json!("booked")
        );
        assert_eq!(
            serde_json::to_value(AppointmentStatus::Cancelled).unwrap(),
            serde_json::json!("cancelled")
        );
    }

    #[test]
    fn appointment_doc_wire_shape() {
        let doc = AppointmentDoc {
            provider_id: 3,
            doctor: "Dr. Vikram Patel".into(),
            date: Utc::now(),
            price: 600,
            requested_reports: 1,
            submitted_reports: vec![],
            status: AppointmentStatus::Booked,
        };
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["providerId"], 3);
        assert_eq!(json["status"], "booked");
        assert!(json["submittedReports"].as_array().unwrap().is_empty());
    }
}
