//! Service-facing operations over plain record snapshots.
//!
//! The HTTP layer authenticates, loads records from storage, and calls into
//! [`FieldOps`]. Nothing here touches storage except through the
//! [`AssignmentStore`] the caller passes in.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::assign::{self, AssignmentMethod};
use crate::budget;
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::geo::{self, GeoPoint};
use crate::route;
use crate::traits::{Agent, AssignmentStore, Category, Stop};

/// Risk weight for a category that does not state one.
pub const DEFAULT_RISK_WEIGHT: f64 = 0.2;

fn default_true() -> bool {
    true
}

/// A field agent as loaded from storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentRecord {
    pub id: i64,
    #[serde(default)]
    pub area: Option<String>,
    #[serde(default = "default_true")]
    pub active: bool,
    /// Positions of the customers currently assigned to this agent.
    #[serde(default)]
    pub assigned_customers: Vec<GeoPoint>,
}

/// A customer as loaded from storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub id: i64,
    #[serde(default)]
    pub area: Option<String>,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub position: GeoPoint,
}

impl Stop for CustomerRecord {
    type Id = i64;

    fn id(&self) -> &i64 {
        &self.id
    }

    fn position(&self) -> GeoPoint {
        self.position
    }
}

/// An agent with its working position resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldAgent {
    pub id: i64,
    pub position: GeoPoint,
}

impl Agent for FieldAgent {
    type Id = i64;

    fn id(&self) -> &i64 {
        &self.id
    }

    fn position(&self) -> GeoPoint {
        self.position
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRecord {
    pub id: String,
    pub return_rate: f64,
    #[serde(default)]
    pub risk_weight: Option<f64>,
}

impl Category for CategoryRecord {
    type Id = String;

    fn id(&self) -> &String {
        &self.id
    }

    fn return_rate(&self) -> f64 {
        self.return_rate
    }

    fn risk_weight(&self) -> f64 {
        self.risk_weight.unwrap_or(DEFAULT_RISK_WEIGHT)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssignWorkersRequest {
    #[serde(default)]
    pub area: Option<String>,
    #[serde(default)]
    pub max_per_worker: Option<usize>,
    #[serde(default)]
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentEntry {
    pub agent_id: i64,
    pub customer_ids: Vec<i64>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignWorkersResponse {
    pub assignments: Vec<AssignmentEntry>,
    pub dry_run: bool,
    pub method: AssignmentMethod,
    pub total_distance_km: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuggestBudgetRequest {
    #[serde(default)]
    pub fund_limit: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetSuggestion {
    pub fund_limit: f64,
    pub suggestions: BTreeMap<String, f64>,
    pub expected_return: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OptimizeRouteRequest {
    #[serde(default)]
    pub start_lat: Option<f64>,
    #[serde(default)]
    pub start_lon: Option<f64>,
}

/// Centroid of the agent's current customers, or `fallback`.
pub fn working_position(assigned_customers: &[GeoPoint], fallback: GeoPoint) -> GeoPoint {
    geo::centroid(assigned_customers.iter().copied()).unwrap_or(fallback)
}

/// One category per distinct non-empty area, on a rising return/risk ladder.
///
/// The i-th area (first-seen order) gets return `12 + 2i` and risk
/// `0.05 + 0.05i`.
pub fn area_ladder<S: AsRef<str>>(areas: &[S]) -> Vec<CategoryRecord> {
    let mut seen: Vec<&str> = Vec::new();
    for area in areas {
        let area = area.as_ref();
        if !area.is_empty() && !seen.contains(&area) {
            seen.push(area);
        }
    }

    seen.into_iter()
        .enumerate()
        .map(|(rank, area)| CategoryRecord {
            id: area.to_string(),
            return_rate: 12.0 + rank as f64 * 2.0,
            risk_weight: Some(0.05 + rank as f64 * 0.05),
        })
        .collect()
}

fn in_area(record_area: Option<&str>, filter: Option<&str>) -> bool {
    match filter {
        Some(filter) if !filter.is_empty() => record_area == Some(filter),
        _ => true,
    }
}

/// Entry point for the three field-operations calls.
#[derive(Debug, Clone, Default)]
pub struct FieldOps {
    config: EngineConfig,
}

impl FieldOps {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Reassigns active customers to active agents, optionally scoped to an area.
    ///
    /// Unless `dry_run` is set the result is handed to `store` in a single
    /// call; on error nothing has been written by this method.
    #[tracing::instrument(skip_all, fields(area = request.area.as_deref(), dry_run = request.dry_run))]
    pub fn assign_workers<T>(
        &self,
        request: &AssignWorkersRequest,
        agents: &[AgentRecord],
        customers: &[CustomerRecord],
        store: &mut T,
    ) -> Result<AssignWorkersResponse>
    where
        T: AssignmentStore<i64, i64>,
    {
        let area = request.area.as_deref();
        let agents: Vec<&AgentRecord> = agents
            .iter()
            .filter(|agent| agent.active && in_area(agent.area.as_deref(), area))
            .collect();
        let customers: Vec<&CustomerRecord> = customers
            .iter()
            .filter(|customer| customer.active && in_area(customer.area.as_deref(), area))
            .collect();

        debug!(agents = agents.len(), customers = customers.len(), "snapshot filtered");
        if agents.is_empty() {
            return Err(EngineError::empty("agents"));
        }
        if customers.is_empty() {
            return Err(EngineError::empty("stops"));
        }

        let area_center = geo::centroid(customers.iter().map(|customer| customer.position))
            .unwrap_or(self.config.default_position);

        let field_agents: Vec<FieldAgent> = agents
            .iter()
            .map(|agent| FieldAgent {
                id: agent.id,
                position: working_position(&agent.assigned_customers, area_center),
            })
            .collect();
        let stops: Vec<CustomerRecord> = customers
            .iter()
            .map(|customer| CustomerRecord {
                position: customer.position.or(area_center),
                ..(*customer).clone()
            })
            .collect();

        let capacity = request.max_per_worker.unwrap_or(self.config.default_max_per_worker);
        let assignment = assign::assign(&field_agents, &stops, capacity, &self.config.assign)?;

        if !request.dry_run {
            store
                .replace_assignments(&assignment.groups)
                .map_err(|err| EngineError::Persist(Box::new(err)))?;
            info!(agents = assignment.groups.len(), "assignment persisted");
        }

        Ok(AssignWorkersResponse {
            assignments: assignment
                .groups
                .into_iter()
                .map(|group| AssignmentEntry {
                    agent_id: group.agent_id,
                    count: group.stop_ids.len(),
                    customer_ids: group.stop_ids,
                })
                .collect(),
            dry_run: request.dry_run,
            method: assignment.method,
            total_distance_km: assignment.total_distance_km,
        })
    }

    #[tracing::instrument(skip_all, fields(categories = categories.len()))]
    pub fn suggest_budget(
        &self,
        request: &SuggestBudgetRequest,
        categories: &[CategoryRecord],
    ) -> Result<BudgetSuggestion> {
        let fund_limit = request.fund_limit.unwrap_or(self.config.default_fund_limit);
        let allocation = budget::allocate(fund_limit, categories, &self.config.budget)?;

        Ok(BudgetSuggestion {
            fund_limit,
            suggestions: allocation
                .amounts
                .into_iter()
                .map(|entry| (entry.category_id, entry.amount))
                .collect(),
            expected_return: allocation.expected_return,
        })
    }

    /// Budget suggestion with one category per distinct customer area.
    pub fn suggest_budget_for_areas<S: AsRef<str>>(
        &self,
        request: &SuggestBudgetRequest,
        areas: &[S],
    ) -> Result<BudgetSuggestion> {
        self.suggest_budget(request, &area_ladder(areas))
    }

    /// Orders an agent's customers for the day, nearest first.
    #[tracing::instrument(skip_all, fields(customers = customers.len()))]
    pub fn optimize_route(&self, request: &OptimizeRouteRequest, customers: &[CustomerRecord]) -> Vec<CustomerRecord> {
        let start = match (request.start_lat, request.start_lon) {
            (Some(lat), Some(lon)) => GeoPoint::new(lat, lon),
            _ => self.config.default_position,
        };

        route::sequence(start, customers).into_iter().cloned().collect()
    }
}
