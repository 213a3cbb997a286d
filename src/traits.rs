//! Core domain traits for the field-operations engine.
//!
//! These are intentionally minimal. The surrounding service implements them
//! for its own records; `crate::ops` ships plain record types that do so.

use std::hash::Hash;

use crate::assign::AgentStops;
use crate::geo::GeoPoint;

/// Unique identifier for engine entities.
pub trait Id: Clone + Eq + Hash {}

impl<T> Id for T where T: Clone + Eq + Hash {}

/// A field collection agent that can be given stops.
pub trait Agent {
    type Id: Id;

    fn id(&self) -> &Self::Id;

    /// Effective working position (centroid of current stops, or a default).
    fn position(&self) -> GeoPoint;
}

/// A customer location to be assigned or sequenced.
pub trait Stop {
    type Id: Id;

    fn id(&self) -> &Self::Id;

    fn position(&self) -> GeoPoint;
}

/// A lending category competing for budget.
pub trait Category {
    type Id: Id;

    fn id(&self) -> &Self::Id;

    /// Expected return, in percent.
    fn return_rate(&self) -> f64;

    /// Risk weight in [0, 1].
    fn risk_weight(&self) -> f64;
}

/// Provides an agent x stop travel cost matrix in kilometers.
///
/// Row `i` belongs to `from[i]`, column `j` to `to[j]`.
pub trait CostMatrixProvider {
    fn cost_matrix(&self, from: &[GeoPoint], to: &[GeoPoint]) -> Vec<Vec<f64>>;
}

/// Persists a computed assignment.
///
/// Implementations must apply the whole slice in one atomic transaction so a
/// concurrent optimization run cannot interleave with it.
pub trait AssignmentStore<AgentId, StopId> {
    type Error: std::error::Error + Send + Sync + 'static;

    fn replace_assignments(&mut self, groups: &[AgentStops<AgentId, StopId>]) -> Result<(), Self::Error>;
}
