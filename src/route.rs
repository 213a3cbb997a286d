//! Daily visit sequencing for a single agent.
//!
//! Greedy nearest-neighbor: not a TSP solver, no lookahead and no 2-opt.
//! Quadratic in stop count, which is fine for a day's worth of stops.

use tracing::debug;

use crate::geo::{self, GeoPoint};
use crate::traits::Stop;

/// Distance summary for a sequenced route.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteLength {
    /// Sum of the legs that could be measured.
    pub km: f64,
    /// Legs skipped because an endpoint had no coordinates.
    pub unmeasured_legs: usize,
}

/// Orders `stops` by repeatedly visiting the nearest remaining stop.
///
/// Stops without coordinates are infinitely far, so any located stop is
/// picked first. Once only unreachable stops remain they are appended in
/// their input order. Ties go to the earlier stop. The result is always a
/// permutation of `stops`.
pub fn sequence<'a, S>(start: GeoPoint, stops: &'a [S]) -> Vec<&'a S>
where
    S: Stop,
{
    let mut unvisited: Vec<&'a S> = stops.iter().collect();
    let mut ordered = Vec::with_capacity(stops.len());
    let mut current = start;

    while !unvisited.is_empty() {
        let mut nearest: Option<usize> = None;
        let mut nearest_km = f64::INFINITY;

        for (index, stop) in unvisited.iter().enumerate() {
            let km = geo::distance_or(current, stop.position(), f64::INFINITY);
            if km < nearest_km {
                nearest_km = km;
                nearest = Some(index);
            }
        }

        match nearest {
            Some(index) => {
                let stop = unvisited.remove(index);
                current = stop.position();
                ordered.push(stop);
            }
            None => {
                debug!(remaining = unvisited.len(), "no reachable stop left, appending in input order");
                ordered.append(&mut unvisited);
            }
        }
    }

    ordered
}

/// Total travel along `route` starting from `start`.
pub fn route_length_km<S>(start: GeoPoint, route: &[&S]) -> RouteLength
where
    S: Stop,
{
    let mut length = RouteLength {
        km: 0.0,
        unmeasured_legs: 0,
    };
    let mut previous = start;

    for stop in route {
        let next = stop.position();
        match geo::haversine_km(previous, next) {
            Some(km) => length.km += km,
            None => length.unmeasured_legs += 1,
        }
        // Keep measuring from the last known position.
        previous = next.or(previous);
    }

    length
}
