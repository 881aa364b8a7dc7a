// src/doctors.rs
//
// Static provider roster, distance ranking and wait estimation.

use std::cmp::Ordering;

use rand::Rng;
use serde::Serialize;

use crate::geo::haversine;

/// Fallback coordinates (Chennai) when the caller's location is unknown.
pub const DEFAULT_LOCATION: (f64, f64) = (13.0827, 80.2707);

/// Consultation slot assumed per patient ahead in the waiting list.
pub const SLOT_MINUTES: u32 = 15;

pub const RATING_MIN: f64 = 3.0;
pub const RATING_MAX: f64 = 4.8;

/// A doctor in the static roster. Reference data only; never mutated at
/// runtime and never persisted with derived fields.
#[derive(Debug, Clone, Serialize)]
pub struct Provider {
    pub id: u32,
    pub name: &'static str,
    pub district: &'static str,
    pub latitude: f64,
    pub longitude: f64,
    pub address: &'static str,
    pub years_of_experience: u32,
    pub waiting_list: u32,
    pub price: u32,
}

/// Provider annotated at query time. The rating is drawn fresh on every
/// ranking pass; it is not a stable attribute of the provider.
#[derive(Debug, Clone, Serialize)]
pub struct RankedProvider {
    #[serde(flatten)]
    pub provider: &'static Provider,
    pub distance_km: f64,
    pub rating: f64,
}

pub static ROSTER: &[Provider] = &[
    Provider { id: 1, name: "Dr. Aditi Sharma", district: "Chennai", latitude: 13.0827, longitude: 80.2707, address: "Apollo Hospitals, Greams Road, Chennai", years_of_experience: 15, waiting_list: 3, price: 500 },
    Provider { id: 2, name: "Dr. Rajesh Kumar", district: "Chennai", latitude: 13.0569, longitude: 80.2425, address: "Fortis Malar Hospital, Adyar, Chennai", years_of_experience: 12, waiting_list: 5, price: 450 },
    Provider { id: 3, name: "Dr. Vikram Patel", district: "Vellore", latitude: 12.9165, longitude: 79.1325, address: "Christian Medical College, Vellore", years_of_experience: 20, waiting_list: 7, price: 600 },
    Provider { id: 4, name: "Dr. Ananya Bose", district: "Coimbatore", latitude: 11.0168, longitude: 76.9558, address: "PSG Hospitals, Peelamedu, Coimbatore", years_of_experience: 8, waiting_list: 2, price: 400 },
    Provider { id: 5, name: "Dr. Sunil Nair", district: "Madurai", latitude: 9.9252, longitude: 78.1198, address: "Meenakshi Mission Hospital, Madurai", years_of_experience: 18, waiting_list: 4, price: 550 },
    Provider { id: 6, name: "Dr. Priya Rajan", district: "Trichy", latitude: 10.7905, longitude: 78.7047, address: "Apollo Speciality Hospital, Trichy", years_of_experience: 10, waiting_list: 6, price: 425 },
    Provider { id: 7, name: "Dr. Karthik Subramanian", district: "Salem", latitude: 11.6643, longitude: 78.1460, address: "Salem GH, Salem", years_of_experience: 14, waiting_list: 3, price: 475 },
    Provider { id: 8, name: "Dr. Meera Krishnan", district: "Tirunelveli", latitude: 8.7139, longitude: 77.7567, address: "Tirunelveli Medical College, Tirunelveli", years_of_experience: 22, waiting_list: 8, price: 575 },
    Provider { id: 9, name: "Dr. Arjun Menon", district: "Erode", latitude: 11.3410, longitude: 77.7172, address: "Erode Medical Center, Erode", years_of_experience: 9, waiting_list: 1, price: 350 },
    Provider { id: 10, name: "Dr. Lakshmi Narayan", district: "Thanjavur", latitude: 10.7870, longitude: 79.1378, address: "Thanjavur Medical College, Thanjavur", years_of_experience: 25, waiting_list: 9, price: 625 },
    Provider { id: 11, name: "Dr. Sanjay Gupta", district: "Chennai", latitude: 13.0827, longitude: 80.2707, address: "Kauvery Hospital, Alwarpet, Chennai", years_of_experience: 17, waiting_list: 5, price: 525 },
    Provider { id: 12, name: "Dr. Deepa Mahesh", district: "Coimbatore", latitude: 11.0168, longitude: 76.9558, address: "Kovai Medical Center, Coimbatore", years_of_experience: 13, waiting_list: 4, price: 475 },
    Provider { id: 13, name: "Dr. Rahul Sharma", district: "Madurai", latitude: 9.9252, longitude: 78.1198, address: "Apollo Speciality Hospital, Madurai", years_of_experience: 11, waiting_list: 3, price: 450 },
    Provider { id: 14, name: "Dr. Nithya Ramamurthy", district: "Salem", latitude: 11.6643, longitude: 78.1460, address: "SKS Hospital, Salem", years_of_experience: 16, waiting_list: 6, price: 500 },
    Provider { id: 15, name: "Dr. Vijay Kumar", district: "Vellore", latitude: 12.9165, longitude: 79.1325, address: "Naruvi Hospitals, Vellore", years_of_experience: 19, waiting_list: 7, price: 550 },
    Provider { id: 16, name: "Dr. Sarita Patel", district: "Trichy", latitude: 10.7905, longitude: 78.7047, address: "MIOT Hospitals, Trichy", years_of_experience: 7, waiting_list: 2, price: 375 },
    Provider { id: 17, name: "Dr. Arun Prasad", district: "Tirunelveli", latitude: 8.7139, longitude: 77.7567, address: "Galaxy Hospital, Tirunelveli", years_of_experience: 23, waiting_list: 8, price: 600 },
    Provider { id: 18, name: "Dr. Kavita Rao", district: "Coimbatore", latitude: 11.0168, longitude: 76.9558, address: "Sri Ramakrishna Hospital, Coimbatore", years_of_experience: 21, waiting_list: 5, price: 575 },
    Provider { id: 19, name: "Dr. Mohan Rao", district: "Chennai", latitude: 13.0827, longitude: 80.2707, address: "Gleneagles Global Health City, Chennai", years_of_experience: 30, waiting_list: 10, price: 700 },
    Provider { id: 20, name: "Dr. Priyanka Reddy", district: "Madurai", latitude: 9.9252, longitude: 78.1198, address: "Vadamalayan Hospitals, Madurai", years_of_experience: 6, waiting_list: 1, price: 350 },
];

pub fn find_provider(id: u32) -> Option<&'static Provider> {
    ROSTER.iter().find(|p| p.id == id)
}

/// Rank the roster by distance from the caller's location.
///
/// Returns the full ranked sequence (callers may truncate). The sort is
/// stable, so equidistant providers keep their roster order. Ratings are
/// drawn uniformly from [RATING_MIN, RATING_MAX] and rounded to one
/// decimal; repeated calls differ in rating even for the same location.
pub fn rank_providers<R: Rng>(
    roster: &'static [Provider],
    lat: f64,
    lon: f64,
    rng: &mut R,
) -> Vec<RankedProvider> {
    let mut ranked: Vec<RankedProvider> = roster
        .iter()
        .map(|p| RankedProvider {
            provider: p,
            distance_km: round2(haversine(lat, lon, p.latitude, p.longitude)),
            rating: round1(rng.gen_range(RATING_MIN..=RATING_MAX)),
        })
        .collect();

    ranked.sort_by(|a, b| {
        a.distance_km
            .partial_cmp(&b.distance_km)
            .unwrap_or(Ordering::Equal)
    });
    ranked
}

/// Human-readable wait estimate for a waiting-list length.
pub fn wait_estimate(waiting_list: u32) -> String {
    let total = waiting_list * SLOT_MINUTES;
    let hours = total / 60;
    let minutes = total % 60;
    if hours > 0 {
        format!("{hours} hrs {minutes} mins")
    } else {
        format!("{minutes} mins")
    }
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn ranking_is_sorted_by_distance() {
        let mut rng = StdRng::seed_from_u64(7);
        let ranked = rank_providers(ROSTER, DEFAULT_LOCATION.0, DEFAULT_LOCATION.1, &mut rng);
        assert_eq!(ranked.len(), ROSTER.len());
        for pair in ranked.windows(2) {
            assert!(pair[0].distance_km <= pair[1].distance_km);
        }
    }

    #[test]
    fn ratings_stay_in_range_and_one_decimal() {
        let mut rng = StdRng::seed_from_u64(42);
        for ranked in rank_providers(ROSTER, 11.0, 78.0, &mut rng) {
            assert!((RATING_MIN..=RATING_MAX).contains(&ranked.rating), "rating {}", ranked.rating);
            assert!((ranked.rating * 10.0 - (ranked.rating * 10.0).round()).abs() < 1e-9);
        }
    }

    #[test]
    fn equidistant_providers_keep_roster_order() {
        // Several Chennai providers share identical coordinates.
        let mut rng = StdRng::seed_from_u64(1);
        let ranked = rank_providers(ROSTER, DEFAULT_LOCATION.0, DEFAULT_LOCATION.1, &mut rng);
        let chennai_center: Vec<u32> = ranked
            .iter()
            .filter(|r| r.distance_km == 0.0)
            .map(|r| r.provider.id)
            .collect();
        assert_eq!(chennai_center, vec![1, 11, 19]);
    }

    #[test]
    fn nearest_from_chennai_is_a_chennai_provider() {
        let mut rng = StdRng::seed_from_u64(3);
        let ranked = rank_providers(ROSTER, DEFAULT_LOCATION.0, DEFAULT_LOCATION.1, &mut rng);
        assert_eq!(ranked[0].provider.district, "Chennai");
        assert_eq!(ranked[0].distance_km, 0.0);
    }

    #[test]
    fn wait_estimate_shapes() {
        assert_eq!(wait_estimate(0), "0 mins");
        assert_eq!(wait_estimate(3), "45 mins");
        assert_eq!(wait_estimate(4), "1 hrs 0 mins");
        assert_eq!(wait_estimate(10), "2 hrs 30 mins");
    }

    #[test]
    fn provider_lookup_by_stable_id() {
        assert_eq!(find_provider(3).unwrap().name, "Dr. Vikram Patel");
        assert!(find_provider(999).is_none());
    }
}
