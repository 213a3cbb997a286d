//! Great-circle distance between coordinates.
//!
//! A coordinate may be unknown (no GPS fix recorded). Unknown is never
//! treated as (0, 0); callers pick a penalty distance instead.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::traits::CostMatrixProvider;

/// Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Distance charged by the assignment objective when either side has no
/// coordinates. Bounded so the optimization stays numerically well-posed.
pub const MISSING_PENALTY_KM: f64 = 999.0;

/// A latitude/longitude pair where either half may be missing.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl GeoPoint {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self {
            lat: Some(lat),
            lng: Some(lng),
        }
    }

    /// The "unknown position" sentinel.
    pub const fn unknown() -> Self {
        Self { lat: None, lng: None }
    }

    /// Returns `(lat, lng)` when both halves are present.
    pub fn coords(&self) -> Option<(f64, f64)> {
        Some((self.lat?, self.lng?))
    }

    pub fn is_known(&self) -> bool {
        self.coords().is_some()
    }

    /// Returns `self` when known, otherwise `fallback`.
    pub fn or(self, fallback: GeoPoint) -> GeoPoint {
        if self.is_known() { self } else { fallback }
    }
}

impl From<(f64, f64)> for GeoPoint {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self::new(lat, lng)
    }
}

/// Haversine distance in kilometers, `None` if either point is unknown.
pub fn haversine_km(from: GeoPoint, to: GeoPoint) -> Option<f64> {
    let (lat1, lng1) = from.coords()?;
    let (lat2, lng2) = to.coords()?;

    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lng = (lng2 - lng1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().min(1.0).asin();

    Some(EARTH_RADIUS_KM * c)
}

/// Haversine distance, or `missing` when either point is unknown.
pub fn distance_or(from: GeoPoint, to: GeoPoint, missing: f64) -> f64 {
    haversine_km(from, to).unwrap_or(missing)
}

/// Haversine distance with the bounded [`MISSING_PENALTY_KM`] sentinel.
pub fn distance_km(from: GeoPoint, to: GeoPoint) -> f64 {
    distance_or(from, to, MISSING_PENALTY_KM)
}

/// Arithmetic mean of the known points, `None` if there are none.
///
/// Plain averaging of degrees; fine for the city-scale clusters this is fed.
pub fn centroid<I>(points: I) -> Option<GeoPoint>
where
    I: IntoIterator<Item = GeoPoint>,
{
    let (sum_lat, sum_lng, count) = points
        .into_iter()
        .filter_map(|point| point.coords())
        .fold((0.0, 0.0, 0usize), |(lat, lng, n), (plat, plng)| {
            (lat + plat, lng + plng, n + 1)
        });

    if count == 0 {
        return None;
    }
    Some(GeoPoint::new(sum_lat / count as f64, sum_lng / count as f64))
}

/// Haversine-based cost matrix provider used by the assignment solver.
#[derive(Debug, Clone)]
pub struct HaversineCost {
    /// Cost charged when either endpoint has no coordinates.
    pub missing_penalty_km: f64,
}

impl Default for HaversineCost {
    fn default() -> Self {
        Self {
            missing_penalty_km: MISSING_PENALTY_KM,
        }
    }
}

impl HaversineCost {
    pub fn new(missing_penalty_km: f64) -> Self {
        Self { missing_penalty_km }
    }
}

impl CostMatrixProvider for HaversineCost {
    fn cost_matrix(&self, from: &[GeoPoint], to: &[GeoPoint]) -> Vec<Vec<f64>> {
        from.par_iter()
            .map(|origin| {
                to.iter()
                    .map(|target| distance_or(*origin, *target, self.missing_penalty_km))
                    .collect::<Vec<f64>>()
            })
            .collect()
    }
}
