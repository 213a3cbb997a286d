//! Agent-to-stop assignment minimizing total travel distance.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{EngineError, Result};
use crate::geo::{GeoPoint, HaversineCost, MISSING_PENALTY_KM};
use crate::optimize::transport::TransportProblem;
use crate::optimize::{SolveLimits, SolveStatus};
use crate::traits::{Agent, CostMatrixProvider, Stop};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssignOptions {
    /// Added to the even share when relaxing the requested capacity.
    pub capacity_slack: usize,
    /// Distance charged for a pair where either side has no coordinates.
    pub missing_penalty_km: f64,
    /// Work budget for the optimal solve; running out triggers round-robin.
    pub limits: SolveLimits,
}

impl Default for AssignOptions {
    fn default() -> Self {
        Self {
            capacity_slack: 5,
            missing_penalty_km: MISSING_PENALTY_KM,
            limits: SolveLimits::unlimited(),
        }
    }
}

/// How an assignment was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentMethod {
    Optimal,
    RoundRobin,
}

/// Stops handed to one agent. Order carries no meaning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentStops<AgentId, StopId> {
    pub agent_id: AgentId,
    pub stop_ids: Vec<StopId>,
}

impl<AgentId, StopId> AgentStops<AgentId, StopId> {
    pub fn count(&self) -> usize {
        self.stop_ids.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assignment<AgentId, StopId> {
    /// One entry per input agent, in input order, including agents left empty.
    pub groups: Vec<AgentStops<AgentId, StopId>>,
    pub method: AssignmentMethod,
    /// Status reported by the optimal solve (also when it was abandoned).
    pub status: SolveStatus,
    /// Per-agent limit after relaxation.
    pub capacity: usize,
    /// Objective value: sum of agent-to-stop distances, penalties included.
    pub total_distance_km: f64,
}

impl<AgentId, StopId> Assignment<AgentId, StopId>
where
    AgentId: PartialEq,
    StopId: PartialEq,
{
    pub fn stops_for(&self, agent_id: &AgentId) -> Option<&[StopId]> {
        self.groups
            .iter()
            .find(|group| &group.agent_id == agent_id)
            .map(|group| group.stop_ids.as_slice())
    }

    pub fn agent_for(&self, stop_id: &StopId) -> Option<&AgentId> {
        self.groups
            .iter()
            .find(|group| group.stop_ids.contains(stop_id))
            .map(|group| &group.agent_id)
    }

    pub fn assigned_count(&self) -> usize {
        self.groups.iter().map(AgentStops::count).sum()
    }
}

/// Requested capacity, raised to `stops / agents + slack` when that is larger.
///
/// `agents * (stops / agents + slack) > stops` for any positive slack, so the
/// relaxed limit always admits a feasible assignment.
pub fn effective_capacity(requested: usize, agents: usize, stops: usize, slack: usize) -> usize {
    if agents == 0 {
        return requested;
    }
    requested.max(stops / agents + slack)
}

/// Assigns every stop to exactly one agent using haversine distances.
pub fn assign<A, S>(
    agents: &[A],
    stops: &[S],
    capacity: usize,
    options: &AssignOptions,
) -> Result<Assignment<A::Id, S::Id>>
where
    A: Agent,
    S: Stop,
{
    let provider = HaversineCost::new(options.missing_penalty_km);
    assign_with(agents, stops, capacity, &provider, options)
}

/// Assigns every stop to exactly one agent using costs from `matrix_provider`.
///
/// Falls back to [`round_robin`] whenever the optimal solve ends with any
/// status other than optimal; only a malformed cost matrix is an error.
#[tracing::instrument(skip_all, fields(agents = agents.len(), stops = stops.len(), capacity = capacity))]
pub fn assign_with<A, S, M>(
    agents: &[A],
    stops: &[S],
    capacity: usize,
    matrix_provider: &M,
    options: &AssignOptions,
) -> Result<Assignment<A::Id, S::Id>>
where
    A: Agent,
    S: Stop,
    M: CostMatrixProvider,
{
    if agents.is_empty() {
        return Err(EngineError::empty("agents"));
    }
    if stops.is_empty() {
        return Err(EngineError::empty("stops"));
    }

    let limit = effective_capacity(capacity, agents.len(), stops.len(), options.capacity_slack);
    if limit != capacity {
        debug!(requested = capacity, effective = limit, "capacity relaxed");
    }

    let agent_positions: Vec<GeoPoint> = agents.iter().map(Agent::position).collect();
    let stop_positions: Vec<GeoPoint> = stops.iter().map(Stop::position).collect();
    let costs = matrix_provider.cost_matrix(&agent_positions, &stop_positions);

    if costs.len() != agents.len() || costs.iter().any(|row| row.len() != stops.len()) {
        return Err(EngineError::SolverError(format!(
            "cost matrix has {} rows, expected {} x {}",
            costs.len(),
            agents.len(),
            stops.len()
        )));
    }

    let solution = TransportProblem::new(&costs, stops.len(), limit).solve(&options.limits);

    match solution.status {
        SolveStatus::Optimal => {
            let mut groups = empty_groups(agents);
            for (stop, owner) in stops.iter().zip(&solution.assignment) {
                let row = owner.ok_or_else(|| {
                    EngineError::SolverError("optimal solution left a stop unassigned".to_string())
                })?;
                groups[row].stop_ids.push(stop.id().clone());
            }

            info!(
                total_km = solution.objective,
                iterations = solution.iterations,
                "optimal assignment found"
            );

            Ok(Assignment {
                groups,
                method: AssignmentMethod::Optimal,
                status: solution.status,
                capacity: limit,
                total_distance_km: solution.objective,
            })
        }
        SolveStatus::InvalidModel => Err(EngineError::SolverError(
            "cost matrix contains non-finite distances".to_string(),
        )),
        status => {
            warn!(%status, "optimal assignment unavailable, falling back to round-robin");

            let total_distance_km: f64 = (0..stops.len())
                .map(|stop| costs[stop % agents.len()][stop])
                .sum();

            Ok(Assignment {
                groups: round_robin(agents, stops)?,
                method: AssignmentMethod::RoundRobin,
                status,
                capacity: limit,
                total_distance_km,
            })
        }
    }
}

/// Deterministic fallback: stop `i` goes to `agents[i % agents.len()]`.
///
/// Public so a caller that abandons a solve on its own timeout can apply the
/// same fallback.
pub fn round_robin<A, S>(agents: &[A], stops: &[S]) -> Result<Vec<AgentStops<A::Id, S::Id>>>
where
    A: Agent,
    S: Stop,
{
    if agents.is_empty() {
        return Err(EngineError::empty("agents"));
    }

    let mut groups = empty_groups(agents);
    for (index, stop) in stops.iter().enumerate() {
        groups[index % agents.len()].stop_ids.push(stop.id().clone());
    }
    Ok(groups)
}

fn empty_groups<A, StopId>(agents: &[A]) -> Vec<AgentStops<A::Id, StopId>>
where
    A: Agent,
{
    agents
        .iter()
        .map(|agent| AgentStops {
            agent_id: agent.id().clone(),
            stop_ids: Vec::new(),
        })
        .collect()
}
