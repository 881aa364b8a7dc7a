// src/routes/medreport_routes.rs
//
// Standalone generation endpoint with its own wire contract:
//   200 {"report": ...} | 400/500 {"error": ...}
// Unauthenticated, mirroring the original medreport API route.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::post,
};
use serde::{Deserialize, Serialize};

use crate::models::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/medreport", post(medreport))
}

// Error strings the front-end matches on verbatim.
const MISSING_DESCRIPTION: &str = "Missing journalDescription";
const GENERATION_FAILED: &str = "Failed to generate report";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedreportRequest {
    pub journal_description: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum MedreportResponse {
    Report { report: String },
    Error { error: String },
}

pub async fn medreport(
    State(state): State<AppState>,
    Json(req): Json<MedreportRequest>,
) -> (StatusCode, Json<MedreportResponse>) {
    let journal_description = match req.journal_description.filter(|d| !d.is_empty()) {
        Some(d) => d,
        None => {
            return (
                StatusCode::BAD_REQUEST,
                Json(MedreportResponse::Error {
                    error: MISSING_DESCRIPTION.to_string(),
                }),
            );
        }
    };

    match state.generator.generate(&journal_description).await {
        Ok(report) => (StatusCode::OK, Json(MedreportResponse::Report { report })),
        Err(e) => {
            tracing::error!("medreport generation failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(MedreportResponse::Error {
                    error: GENERATION_FAILED.to_string(),
                }),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_responses_use_flat_error_envelope() {
        let missing = serde_json::to_value(MedreportResponse::Error {
            error: MISSING_DESCRIPTION.to_string(),
        })
        .unwrap();
        assert_eq!(
            missing,
            serde_json::json!({ "error": "Missing journalDescription" })
        );

        let failed = serde_json::to_value(MedreportResponse::Error {
            error: GENERATION_FAILED.to_string(),
        })
        .unwrap();
        assert_eq!(
            failed,
            serde_json::json!({ "error": "Failed to generate report" })
        );
    }

    #[test]
    fn report_response_carries_only_the_report_field() {
        let ok = serde_json::to_value(MedreportResponse::Report {
            report: "Patient Report Symptoms Summary: stable".to_string(),
        })
        .unwrap();
        assert_eq!(
            ok,
            serde_json::json!({ "report": "Patient Report Symptoms Summary: stable" })
        );
    }

    #[test]
    fn request_reads_camel_case_description() {
        let req: MedreportRequest =
            serde_json::from_str(r#"{"journalDescription":"headache for 3 days"}"#).unwrap();
        assert_eq!(req.journal_description.as_deref(), Some("headache for 3 days"));

        let empty: MedreportRequest = serde_json::from_str("{}").unwrap();
        assert!(empty.journal_description.is_none());
    }
}
