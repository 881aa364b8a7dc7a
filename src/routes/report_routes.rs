// src/routes/report_routes.rs

use std::collections::HashMap;

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use chrono::{Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::ApiError,
    journal::{self, JournalEntry},
    middleware::auth_context::AuthContext,
    models::AppState,
    report::{ReportDoc, ReportSection, parse_report, report_key},
    store::paths,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/reports/generate", post(generate_report))
        .route("/reports", get(list_reports))
}

#[derive(Debug, Serialize)]
pub struct ApiOk<T> {
    pub data: T,
}

#[derive(Debug, Deserialize)]
pub struct GenerateReportRequest {
    /// Window length in days, ending today. The UI offers 1-7; the
    /// contract accepts any positive count.
    pub days: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDto {
    pub id: String,
    pub report: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub sections: Vec<SectionDto>,
}

#[derive(Debug, Serialize)]
pub struct SectionDto {
    pub heading: &'static str,
    pub content: String,
}

fn sections_of(report_text: &str) -> Vec<SectionDto> {
    let parsed = parse_report(report_text);
    ReportSection::ALL
        .into_iter()
        .filter_map(|section| {
            parsed.get(&section).map(|content| SectionDto {
                heading: section.heading(),
                content: content.clone(),
            })
        })
        .collect()
}

pub async fn generate_report(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(req): Json<GenerateReportRequest>,
) -> Result<Json<ApiOk<ReportDto>>, ApiError> {
    if req.days < 1 {
        return Err(ApiError::BadRequest(
            "VALIDATION_ERROR",
            "days must be a positive number".into(),
        ));
    }

    let today = Utc::now().date_naive();

    // Per-day lookups, sequential and fail-fast: a store failure on any
    // single day aborts the whole aggregation (no partial report).
    let mut entries: HashMap<NaiveDate, String> = HashMap::new();
    for i in 0..req.days {
        let date = today - Days::new(i as u64);
        if let Some(data) = state.store.get(&paths::journal(auth.user_id, date)).await? {
            let entry: JournalEntry = serde_json::from_value(data)
                .map_err(|e| ApiError::Internal(format!("journal decode error: {e}")))?;
            entries.insert(date, entry.feeling);
        }
    }

    let window = journal::build_window(today, req.days, &entries);
    if window.text.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "NO_JOURNAL_ENTRIES",
            "No journal entries found for the selected period".into(),
        ));
    }

    let report_text = state.generator.generate(&window.text).await.map_err(|e| {
        tracing::error!("report generation failed: {e}");
        ApiError::from(e)
    })?;

    let doc = ReportDoc {
        report: report_text,
        start_date: window.start_date,
        end_date: window.end_date,
    };
    let key = report_key(window.start_date, window.end_date);
    let doc_json = serde_json::to_value(&doc)
        .map_err(|e| ApiError::Internal(format!("report encode error: {e}")))?;

    // Deterministic window key: regenerating the same window replaces the
    // stored report wholesale.
    state.store.put(&paths::report(auth.user_id, &key), &doc_json).await?;

    Ok(Json(ApiOk {
        data: ReportDto {
            id: key,
            sections: sections_of(&doc.report),
            report: doc.report,
            start_date: doc.start_date,
            end_date: doc.end_date,
        },
    }))
}

pub async fn list_reports(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<ApiOk<Vec<ReportDto>>>, ApiError> {
    let reports = fetch_reports(&state, auth.user_id).await?;
    Ok(Json(ApiOk { data: reports }))
}

/// All reports for a user, newest window first, with parsed sections
/// attached. Shared with the combined home fetch and with appointment
/// booking (report snapshots).
pub async fn fetch_reports(state: &AppState, uid: Uuid) -> Result<Vec<ReportDto>, ApiError> {
    let docs = state.store.list(&paths::reports_prefix(uid)).await?;

    let mut reports = Vec::with_capacity(docs.len());
    for doc in docs {
        let id = doc.id().to_string();
        let stored: ReportDoc = doc.decode()?;
        reports.push(ReportDto {
            id,
            sections: sections_of(&stored.report),
            report: stored.report,
            start_date: stored.start_date,
            end_date: stored.end_date,
        });
    }

    reports.sort_by(|a, b| b.end_date.cmp(&a.end_date));
    Ok(reports)
}
