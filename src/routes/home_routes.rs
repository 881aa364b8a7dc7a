// src/routes/home_routes.rs

use axum::{Json, Router, extract::State, routing::get};

use crate::error::ApiError;
use crate::middleware::auth_context::AuthContext;
use crate::models::AppState;
use crate::routes::journal_routes::{JournalDto, fetch_journals};
use crate::routes::report_routes::{ReportDto, fetch_reports};

#[derive(serde::Serialize)]
pub struct HomeResponse {
    pub data: HomeData,
}

#[derive(serde::Serialize)]
pub struct HomeData {
    pub journals: Vec<JournalDto>,
    pub reports: Vec<ReportDto>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/home", get(home))
}

/// Combined payload for the health screen. Journals and reports are
/// fetched concurrently; if either fetch fails the whole request fails.
pub async fn home(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<HomeResponse>, ApiError> {
    let (journals, reports) = tokio::try_join!(
        fetch_journals(&state, auth.user_id),
        fetch_reports(&state, auth.user_id),
    )?;

    Ok(Json(HomeResponse {
        data: HomeData { journals, reports },
    }))
}
