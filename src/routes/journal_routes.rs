// src/routes/journal_routes.rs

use axum::{
    Json, Router,
    extract::State,
    routing::post,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::{
    error::ApiError,
    journal::JournalEntry,
    middleware::auth_context::AuthContext,
    models::AppState,
    store::paths,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/journals", post(save_journal).get(list_journals))
}

#[derive(Debug, Serialize)]
pub struct ApiOk<T> {
    pub data: T,
}

#[derive(Debug, Deserialize)]
pub struct SaveJournalRequest {
    pub feeling: String,
    /// Defaults to today. One entry per day; saving again overwrites.
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct JournalDto {
    pub date: NaiveDate,
    pub feeling: String,
}

pub async fn save_journal(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(req): Json<SaveJournalRequest>,
) -> Result<Json<ApiOk<JournalDto>>, ApiError> {
    let feeling = req.feeling.trim();
    if feeling.is_empty() {
        return Err(ApiError::BadRequest(
            "VALIDATION_ERROR",
            "feeling is required".into(),
        ));
    }

    let date = req.date.unwrap_or_else(|| Utc::now().date_naive());

    // Merge write: only the feeling field is overwritten (last write wins).
    state
        .store
        .set_merge(&paths::journal(auth.user_id, date), &json!({ "feeling": feeling }))
        .await?;

    Ok(Json(ApiOk {
        data: JournalDto {
            date,
            feeling: feeling.to_string(),
        },
    }))
}

pub async fn list_journals(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<ApiOk<Vec<JournalDto>>>, ApiError> {
    let journals = fetch_journals(&state, auth.user_id).await?;
    Ok(Json(ApiOk { data: journals }))
}

/// All journal entries for a user, newest date first. Shared with the
/// combined home fetch.
pub async fn fetch_journals(state: &AppState, uid: Uuid) -> Result<Vec<JournalDto>, ApiError> {
    let docs = state.store.list(&paths::journals_prefix(uid)).await?;

    let mut journals = Vec::with_capacity(docs.len());
    for doc in docs {
        let date: NaiveDate = doc.id().parse().map_err(|_| {
            ApiError::Internal(format!("invalid journal document id: {}", doc.path))
        })?;
        let entry: JournalEntry = doc.decode()?;
        journals.push(JournalDto {
            date,
            feeling: entry.feeling,
        });
    }

    // Listing is path-ascending (= date ascending); the app shows newest first.
    journals.sort_by(|a, b| b.date.cmp(&a.date));
    Ok(journals)
}
