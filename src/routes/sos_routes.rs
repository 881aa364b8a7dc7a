// src/routes/sos_routes.rs

use axum::{Json, Router, extract::State, routing::post};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    doctors::DEFAULT_LOCATION,
    error::ApiError,
    middleware::auth_context::AuthContext,
    models::AppState,
    sos::{self, NEAREST_HOSPITAL},
    store::paths,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/sos", post(send_sos))
}

#[derive(Debug, Serialize)]
pub struct ApiOk<T> {
    pub data: T,
}

#[derive(Debug, Default, Deserialize)]
pub struct SosRequest {
    /// Caller coordinates; the default location stands in when the
    /// client could not resolve a position.
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SosAlertDto {
    pub id: Uuid,
    pub hospital: HospitalDto,
    pub distance_km: f64,
    pub location: LocationDto,
    pub sent_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct HospitalDto {
    pub name: &'static str,
    pub address: &'static str,
    pub rating: f64,
}

#[derive(Debug, Serialize)]
pub struct LocationDto {
    pub latitude: f64,
    pub longitude: f64,
    pub is_default: bool,
}

pub async fn send_sos(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(req): Json<SosRequest>,
) -> Result<Json<ApiOk<SosAlertDto>>, ApiError> {
    let (lat, lon, is_default) = match (req.lat, req.lon) {
        (Some(lat), Some(lon)) => (lat, lon, false),
        _ => (DEFAULT_LOCATION.0, DEFAULT_LOCATION.1, true),
    };

    let alert = SosAlertDto {
        id: Uuid::new_v4(),
        hospital: HospitalDto {
            name: NEAREST_HOSPITAL.name,
            address: NEAREST_HOSPITAL.address,
            rating: NEAREST_HOSPITAL.rating,
        },
        distance_km: sos::hospital_distance(lat, lon),
        location: LocationDto {
            latitude: lat,
            longitude: lon,
            is_default,
        },
        sent_at: Utc::now(),
    };

    // Alerts are a permanent record; create-once, never merged over.
    let doc = serde_json::to_value(&alert)
        .map_err(|e| ApiError::Internal(format!("sos alert encode error: {e}")))?;
    state
        .store
        .create(&paths::sos_alert(auth.user_id, alert.id), &doc)
        .await?;

    tracing::warn!(
        user = %auth.user_id,
        distance_km = alert.distance_km,
        "SOS alert recorded"
    );

    Ok(Json(ApiOk { data: alert }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sos_alert_wire_shape() {
        let alert = SosAlertDto {
            id: Uuid::nil(),
            hospital: HospitalDto {
                name: NEAREST_HOSPITAL.name,
                address: NEAREST_HOSPITAL.address,
                rating: NEAREST_HOSPITAL.rating,
            },
            distance_km: 0.02,
            location: LocationDto {
                latitude: DEFAULT_LOCATION.0,
                longitude: DEFAULT_LOCATION.1,
                is_default: true,
            },
            sent_at: Utc::now(),
        };
        let json = serde_json::to_value(&alert).unwrap();
        assert_eq!(json["distanceKm"], 0.02);
        assert_eq!(
            json["hospital"]["name"],
            "Christian Medical College Vellore (CMC Vellore)"
        );
        assert_eq!(json["hospital"]["rating"], 4.8);
        assert_eq!(json["location"]["is_default"], true);
    }

    #[test]
    fn missing_coordinates_deserialize_to_none() {
        let req: SosRequest = serde_json::from_str("{}").unwrap();
        assert!(req.lat.is_none() && req.lon.is_none());

        let req: SosRequest = serde_json::from_str(r#"{"lat":12.9,"lon":79.1}"#).unwrap();
        assert_eq!(req.lat, Some(12.9));
        assert_eq!(req.lon, Some(79.1));
    }
}
