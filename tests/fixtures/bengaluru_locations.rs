//! Bengaluru locality centers for realistic test fixtures.
//!
//! Coordinates are approximate neighbourhood centers, good to a few hundred
//! meters. Enough for haversine-based assignment and sequencing tests.

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }

    pub fn coords(&self) -> (f64, f64) {
        (self.lat, self.lng)
    }
}

// ============================================================================
// Branch offices (agent home bases)
// ============================================================================

pub const BRANCHES: &[Location] = &[
    Location::new("MG Road Branch", 12.9756, 77.6066),
    Location::new("Jayanagar Branch", 12.9250, 77.5938),
    Location::new("Yelahanka Branch", 13.1007, 77.5963),
    Location::new("Whitefield Branch", 12.9698, 77.7500),
];

// ============================================================================
// South Bengaluru customers
// ============================================================================

pub const SOUTH: &[Location] = &[
    Location::new("Koramangala", 12.9352, 77.6245),
    Location::new("BTM Layout", 12.9166, 77.6101),
    Location::new("HSR Layout", 12.9121, 77.6446),
    Location::new("Basavanagudi", 12.9422, 77.5754),
    Location::new("Banashankari", 12.9255, 77.5468),
    Location::new("JP Nagar", 12.9063, 77.5857),
    Location::new("Electronic City", 12.8452, 77.6602),
];

// ============================================================================
// North Bengaluru customers
// ============================================================================

pub const NORTH: &[Location] = &[
    Location::new("Hebbal", 13.0358, 77.5970),
    Location::new("RT Nagar", 13.0210, 77.5950),
    Location::new("Yeshwanthpur", 13.0280, 77.5409),
    Location::new("Malleshwaram", 13.0035, 77.5710),
    Location::new("Sahakar Nagar", 13.0623, 77.5863),
    Location::new("Jakkur", 13.0784, 77.6068),
];

// ============================================================================
// East Bengaluru customers
// ============================================================================

pub const EAST: &[Location] = &[
    Location::new("Indiranagar", 12.9784, 77.6408),
    Location::new("Marathahalli", 12.9591, 77.6974),
    Location::new("KR Puram", 13.0075, 77.6959),
    Location::new("Banaswadi", 13.0104, 77.6482),
    Location::new("Brookefield", 12.9655, 77.7185),
];

/// Every customer location, south then north then east.
pub fn all_customers() -> Vec<&'static Location> {
    SOUTH.iter().chain(NORTH).chain(EAST).collect()
}
