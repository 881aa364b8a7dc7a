// src/geo.rs

/// Mean Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two (lat, lon) pairs in degrees, in km.
///
/// Total over all inputs: the intermediate term is clamped into [0, 1] so
/// out-of-range coordinates still produce a finite number instead of a
/// domain error.
pub fn haversine(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (lat1, lon1, lat2, lon2) = (
        lat1.to_radians(),
        lon1.to_radians(),
        lat2.to_radians(),
        lon2.to_radians(),
    );

    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;
    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHENNAI: (f64, f64) = (13.0827, 80.2707);
    const VELLORE: (f64, f64) = (12.9165, 79.1325);

    #[test]
    fn distance_to_self_is_zero() {
        let d = haversine(CHENNAI.0, CHENNAI.1, CHENNAI.0, CHENNAI.1);
        assert!(d.abs() < 1e-9);
    }

    #[test]
    fn distance_is_symmetric() {
        let ab = haversine(CHENNAI.0, CHENNAI.1, VELLORE.0, VELLORE.1);
        let ba = haversine(VELLORE.0, VELLORE.1, CHENNAI.0, CHENNAI.1);
        assert!((ab - ba).abs() < 1e-9);
    }

    #[test]
    fn chennai_to_vellore_is_about_124_km() {
        let d = haversine(CHENNAI.0, CHENNAI.1, VELLORE.0, VELLORE.1);
        assert!((120.0..130.0).contains(&d), "got {d}");
    }

    #[test]
    fn out_of_range_inputs_stay_finite() {
        let d = haversine(200.0, -400.0, -95.0, 720.0);
        assert!(d.is_finite());
        assert!(d >= 0.0);
    }

    #[test]
    fn antipodal_points_near_half_circumference() {
        let d = haversine(0.0, 0.0, 0.0, 180.0);
        let half = std::f64::consts::PI * EARTH_RADIUS_KM;
        assert!((d - half).abs() < 1.0);
    }
}
