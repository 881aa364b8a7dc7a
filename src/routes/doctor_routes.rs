// src/routes/doctor_routes.rs

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use serde::{Deserialize, Serialize};

use crate::{
    doctors::{self, DEFAULT_LOCATION, ROSTER},
    error::ApiError,
    middleware::auth_context::AuthContext,
    models::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/doctors/nearby", get(nearby_doctors))
}

#[derive(Debug, Serialize)]
pub struct ApiOk<T> {
    pub data: T,
}

#[derive(Debug, Deserialize)]
pub struct NearbyQuery {
    /// Caller coordinates from the client's geolocation. When absent or
    /// denied, ranking falls back to the default location instead of
    /// failing.
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    /// Presentation cap; the full ranked list is returned when omitted.
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct NearbyResponse {
    pub location: LocationDto,
    pub doctors: Vec<NearbyDoctorDto>,
}

#[derive(Debug, Serialize)]
pub struct LocationDto {
    pub latitude: f64,
    pub longitude: f64,
    pub is_default: bool,
}

#[derive(Debug, Serialize)]
pub struct NearbyDoctorDto {
    pub id: u32,
    pub name: &'static str,
    pub district: &'static str,
    pub address: &'static str,
    pub years_of_experience: u32,
    pub waiting_list: u32,
    pub price: u32,
    pub distance_km: f64,
    pub rating: f64,
    pub estimated_wait: String,
}

pub async fn nearby_doctors(
    State(_state): State<AppState>,
    _auth: AuthContext,
    Query(q): Query<NearbyQuery>,
) -> Result<Json<ApiOk<NearbyResponse>>, ApiError> {
    let (lat, lon, is_default) = match (q.lat, q.lon) {
        (Some(lat), Some(lon)) => (lat, lon, false),
        _ => (DEFAULT_LOCATION.0, DEFAULT_LOCATION.1, true),
    };

    if let Some(limit) = q.limit {
        if limit == 0 {
            return Err(ApiError::BadRequest(
                "VALIDATION_ERROR",
                "limit must be greater than 0".into(),
            ));
        }
    }

    let mut rng = rand::thread_rng();
    let mut ranked = doctors::rank_providers(ROSTER, lat, lon, &mut rng);
    if let Some(limit) = q.limit {
        ranked.truncate(limit);
    }

    let doctors = ranked
        .into_iter()
        .map(|r| NearbyDoctorDto {
            id: r.provider.id,
            name: r.provider.name,
            district: r.provider.district,
            address: r.provider.address,
            years_of_experience: r.provider.years_of_experience,
            waiting_list: r.provider.waiting_list,
            price: r.provider.price,
            distance_km: r.distance_km,
            rating: r.rating,
            estimated_wait: doctors::wait_estimate(r.provider.waiting_list),
        })
        .collect();

    Ok(Json(ApiOk {
        data: NearbyResponse {
            location: LocationDto {
                latitude: lat,
                longitude: lon,
                is_default,
            },
            doctors,
        },
    }))
}
