// src/sos.rs
//
// Emergency SOS: measure the caller's distance to the nearest hospital
// and hand back its details for the alert.

use crate::geo;

/// Reported distance when the caller stands exactly at the hospital;
/// a raw 0.0 km would read as a broken lookup.
pub const MIN_DISTANCE_KM: f64 = 0.02;

#[derive(Debug, Clone, Copy)]
pub struct Hospital {
    pub name: &'static str,
    pub address: &'static str,
    pub latitude: f64,
    pub longitude: f64,
    pub rating: f64,
}

/// The emergency destination. One tertiary hospital covers the served
/// region; no per-caller hospital search.
pub const NEAREST_HOSPITAL: Hospital = Hospital {
    name: "Christian Medical College Vellore (CMC Vellore)",
    address: "IDA Scudder Road, Vellore, Tamil Nadu 632004, India",
    latitude: 12.9294,
    longitude: 79.1325,
    rating: 4.8,
};

/// Distance from the caller to the hospital in km, rounded to two
/// decimal places. A zero raw distance becomes `MIN_DISTANCE_KM`.
pub fn hospital_distance(lat: f64, lon: f64) -> f64 {
    let d = geo::haversine(
        lat,
        lon,
        NEAREST_HOSPITAL.latitude,
        NEAREST_HOSPITAL.longitude,
    );
    if d == 0.0 {
        MIN_DISTANCE_KM
    } else {
        round2(d)
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn at_hospital_reports_minimum_distance() {
        let d = hospital_distance(NEAREST_HOSPITAL.latitude, NEAREST_HOSPITAL.longitude);
        assert_eq!(d, MIN_DISTANCE_KM);
    }

    #[test]
    fn distance_from_chennai_is_plausible() {
        let d = hospital_distance(13.0827, 80.2707);
        assert!((110.0..135.0).contains(&d), "got {d}");
    }

    #[test]
    fn distance_is_rounded_to_two_decimals() {
        let d = hospital_distance(13.0827, 80.2707);
        assert!((d * 100.0 - (d * 100.0).round()).abs() < 1e-9);
    }
}
