//! Test fixtures for fieldops-engine.
//!
//! Provides:
//! - Approximate Bengaluru locality coordinates
//! - Builders for agents, stops and categories implementing the engine traits

#![allow(dead_code)]

pub mod bengaluru_locations;

pub use bengaluru_locations::*;

use fieldops_engine::assign::Assignment;
use fieldops_engine::geo::GeoPoint;
use fieldops_engine::traits::{Agent, Category, Stop};

#[derive(Clone, Debug, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub struct TestId(pub String);

impl TestId {
    pub fn new(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Builder for test agents. Defaults to an unknown position.
#[derive(Clone, Debug)]
pub struct TestAgent {
    pub id: TestId,
    pub position: GeoPoint,
}

impl TestAgent {
    pub fn new(id: &str) -> Self {
        Self {
            id: TestId::new(id),
            position: GeoPoint::unknown(),
        }
    }

    pub fn at(mut self, lat: f64, lng: f64) -> Self {
        self.position = GeoPoint::new(lat, lng);
        self
    }

    pub fn at_location(self, location: &Location) -> Self {
        self.at(location.lat, location.lng)
    }
}

impl Agent for TestAgent {
    type Id = TestId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn position(&self) -> GeoPoint {
        self.position
    }
}

/// Builder for test stops. Defaults to an unknown position.
#[derive(Clone, Debug)]
pub struct TestStop {
    pub id: TestId,
    pub position: GeoPoint,
}

impl TestStop {
    pub fn new(id: &str) -> Self {
        Self {
            id: TestId::new(id),
            position: GeoPoint::unknown(),
        }
    }

    pub fn at(mut self, lat: f64, lng: f64) -> Self {
        self.position = GeoPoint::new(lat, lng);
        self
    }

    pub fn at_location(self, location: &Location) -> Self {
        self.at(location.lat, location.lng)
    }
}

impl Stop for TestStop {
    type Id = TestId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn position(&self) -> GeoPoint {
        self.position
    }
}

/// Stops named after the fixture locations they sit on.
pub fn stops_at(locations: &[&Location]) -> Vec<TestStop> {
    locations
        .iter()
        .map(|location| TestStop::new(location.name).at(location.lat, location.lng))
        .collect()
}

#[derive(Clone, Debug)]
pub struct TestCategory {
    pub id: TestId,
    pub return_rate: f64,
    pub risk_weight: f64,
}

impl TestCategory {
    pub fn new(id: &str, return_rate: f64, risk_weight: f64) -> Self {
        Self {
            id: TestId::new(id),
            return_rate,
            risk_weight,
        }
    }
}

impl Category for TestCategory {
    type Id = TestId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn return_rate(&self) -> f64 {
        self.return_rate
    }

    fn risk_weight(&self) -> f64 {
        self.risk_weight
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

pub fn agent_stops<'a>(assignment: &'a Assignment<TestId, TestId>, agent_id: &str) -> Vec<&'a str> {
    assignment
        .stops_for(&TestId::new(agent_id))
        .map(|ids| ids.iter().map(|id| id.0.as_str()).collect())
        .unwrap_or_default()
}

/// Every stop id across all groups, sorted.
pub fn all_assigned(assignment: &Assignment<TestId, TestId>) -> Vec<String> {
    let mut ids: Vec<String> = assignment
        .groups
        .iter()
        .flat_map(|group| group.stop_ids.iter().map(|id| id.0.clone()))
        .collect();
    ids.sort();
    ids
}
