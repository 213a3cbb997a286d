//! Engine configuration.
//!
//! Every field has a default, so a partial document deserializes cleanly.

use serde::{Deserialize, Serialize};

use crate::assign::AssignOptions;
use crate::budget::BudgetOptions;
use crate::geo::GeoPoint;

/// Used when neither a request nor the data supplies a position.
pub const DEFAULT_POSITION: GeoPoint = GeoPoint::new(12.9716, 77.5946);

pub const DEFAULT_MAX_PER_WORKER: usize = 50;

pub const DEFAULT_FUND_LIMIT: f64 = 1_000_000.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub assign: AssignOptions,
    pub budget: BudgetOptions,
    /// Route start and last-resort agent position.
    pub default_position: GeoPoint,
    /// Capacity used when an assignment request names none.
    pub default_max_per_worker: usize,
    /// Fund used when a budget request names none.
    pub default_fund_limit: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            assign: AssignOptions::default(),
            budget: BudgetOptions::default(),
            default_position: DEFAULT_POSITION,
            default_max_per_worker: DEFAULT_MAX_PER_WORKER,
            default_fund_limit: DEFAULT_FUND_LIMIT,
        }
    }
}
