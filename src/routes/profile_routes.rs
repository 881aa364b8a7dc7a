// src/routes/profile_routes.rs

use axum::{
    Json, Router,
    extract::State,
    routing::get,
};
use serde::Serialize;
use serde_json::{Value as JsonValue, json};

use crate::{
    error::ApiError,
    middleware::auth_context::AuthContext,
    models::AppState,
    store::paths,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/profile", get(get_profile).put(put_profile))
}

#[derive(Debug, Serialize)]
pub struct ApiOk<T> {
    pub data: T,
}

pub async fn get_profile(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<ApiOk<JsonValue>>, ApiError> {
    let details = state
        .store
        .get(&paths::profile(auth.user_id))
        .await?
        .unwrap_or_else(|| json!({}));
    Ok(Json(ApiOk { data: details }))
}

/// Merge write: named fields are overwritten, the rest of the profile
/// document is preserved.
pub async fn put_profile(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(fields): Json<JsonValue>,
) -> Result<Json<ApiOk<JsonValue>>, ApiError> {
    if !fields.is_object() {
        return Err(ApiError::BadRequest(
            "VALIDATION_ERROR",
            "profile body must be a JSON object".into(),
        ));
    }

    let path = paths::profile(auth.user_id);
    state.store.set_merge(&path, &fields).await?;

    let details = state.store.get(&path).await?.unwrap_or_else(|| json!({}));
    Ok(Json(ApiOk { data: details }))
}
