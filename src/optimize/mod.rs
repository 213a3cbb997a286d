//! Mathematical-programming layer.
//!
//! Two exact solvers for the two program shapes the engine needs:
//! - [`transport`]: capacitated binary assignment (min-cost flow);
//! - [`knapsack`]: bounded continuous allocation under one budget row.

pub mod knapsack;
pub mod transport;

use std::fmt;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Terminal status of a solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolveStatus {
    /// Proven optimal solution found.
    Optimal,
    /// No point satisfies the constraints.
    Infeasible,
    /// Objective can grow without bound.
    Unbounded,
    /// Iteration budget exhausted before optimality.
    IterationLimit,
    /// Time budget exhausted before optimality.
    TimeLimit,
    /// Solver gave up for numerical reasons.
    NotSolved,
    /// Model is malformed (shape mismatch, non-finite data).
    InvalidModel,
}

impl SolveStatus {
    pub fn is_optimal(self) -> bool {
        self == SolveStatus::Optimal
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SolveStatus::Optimal => "optimal",
            SolveStatus::Infeasible => "infeasible",
            SolveStatus::Unbounded => "unbounded",
            SolveStatus::IterationLimit => "iteration limit",
            SolveStatus::TimeLimit => "time limit",
            SolveStatus::NotSolved => "not solved",
            SolveStatus::InvalidModel => "invalid model",
        };
        f.write_str(label)
    }
}

/// Work budget for iterative solvers. Unlimited by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolveLimits {
    /// Maximum solver iterations (augmentations for the transport solver).
    pub max_iterations: Option<usize>,
    /// Wall-clock limit for one solve.
    pub time_limit: Option<Duration>,
}

impl SolveLimits {
    pub fn unlimited() -> Self {
        Self::default()
    }

    pub fn with_max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = Some(iterations);
        self
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    pub(crate) fn start(&self) -> Budget {
        Budget {
            limits: *self,
            started: Instant::now(),
            iterations: 0,
        }
    }
}

/// Running counter checked by a solver before each unit of work.
#[derive(Debug)]
pub(crate) struct Budget {
    limits: SolveLimits,
    started: Instant,
    iterations: usize,
}

impl Budget {
    /// Claims one iteration; returns the limit status if none are left.
    pub(crate) fn tick(&mut self) -> Option<SolveStatus> {
        if let Some(max) = self.limits.max_iterations {
            if self.iterations >= max {
                return Some(SolveStatus::IterationLimit);
            }
        }
        if let Some(limit) = self.limits.time_limit {
            if self.started.elapsed() >= limit {
                return Some(SolveStatus::TimeLimit);
            }
        }
        self.iterations += 1;
        None
    }

    pub(crate) fn iterations(&self) -> usize {
        self.iterations
    }
}
