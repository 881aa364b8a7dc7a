use crate::models::AppState;
use axum::Router;

pub mod appointment_routes;
pub mod auth_routes;
pub mod doctor_routes;
pub mod home_routes;
pub mod journal_routes;
pub mod medreport_routes;
pub mod profile_routes;
pub mod report_routes;
pub mod sos_routes;

pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1/auth", auth_routes::router())
        .nest("/api/v1", journal_routes::router())
        .nest("/api/v1", report_routes::router())
        .nest("/api/v1", doctor_routes::router())
        .nest("/api/v1", appointment_routes::router())
        .nest("/api/v1", profile_routes::router())
        .nest("/api/v1", sos_routes::router())
        .merge(home_routes::router())
        .merge(medreport_routes::router())
        .with_state(state)
}
