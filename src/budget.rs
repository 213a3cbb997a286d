//! Capital allocation across lending categories.
//!
//! Maximizes `sum amount * return_rate * (1 - risk_weight)` with the total
//! capped at the fund limit and every category capped at a share of it.
//! There is no heuristic fallback: a failed solve is reported as such.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{EngineError, Result};
use crate::optimize::{SolveStatus, knapsack};
use crate::traits::{Category, Id};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetOptions {
    /// Largest fraction of the fund any one category may receive.
    pub max_category_share: f64,
}

impl Default for BudgetOptions {
    fn default() -> Self {
        Self {
            max_category_share: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryAmount<CategoryId> {
    pub category_id: CategoryId,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Allocation<CategoryId> {
    pub fund_limit: f64,
    /// One entry per input category, in input order.
    pub amounts: Vec<CategoryAmount<CategoryId>>,
    /// Objective value: risk-adjusted return of the allocation.
    pub expected_return: f64,
}

impl<CategoryId: Id> Allocation<CategoryId> {
    pub fn amount_for(&self, category_id: &CategoryId) -> Option<f64> {
        self.amounts
            .iter()
            .find(|entry| &entry.category_id == category_id)
            .map(|entry| entry.amount)
    }

    pub fn total(&self) -> f64 {
        self.amounts.iter().map(|entry| entry.amount).sum()
    }

    pub fn to_map(&self) -> HashMap<CategoryId, f64> {
        self.amounts
            .iter()
            .map(|entry| (entry.category_id.clone(), entry.amount))
            .collect()
    }
}

/// Objective coefficient of a category.
pub fn risk_adjusted_rate<C: Category>(category: &C) -> f64 {
    category.return_rate() * (1.0 - category.risk_weight())
}

#[tracing::instrument(skip_all, fields(fund_limit = fund_limit, categories = categories.len()))]
pub fn allocate<C>(fund_limit: f64, categories: &[C], options: &BudgetOptions) -> Result<Allocation<C::Id>>
where
    C: Category,
{
    if categories.is_empty() {
        return Err(EngineError::empty("categories"));
    }

    let coefficients: Vec<f64> = categories.iter().map(risk_adjusted_rate).collect();
    let cap = fund_limit.min(fund_limit * options.max_category_share);
    let upper = vec![cap; categories.len()];

    let solution = knapsack::solve(&coefficients, &upper, fund_limit);

    match solution.status {
        SolveStatus::Optimal => {
            let amounts = categories
                .iter()
                .zip(solution.values)
                .map(|(category, amount)| CategoryAmount {
                    category_id: category.id().clone(),
                    amount,
                })
                .collect();

            info!(expected_return = solution.objective, "budget allocated");

            Ok(Allocation {
                fund_limit,
                amounts,
                expected_return: solution.objective,
            })
        }
        SolveStatus::InvalidModel => Err(EngineError::SolverError(format!(
            "budget model is not finite (fund limit {fund_limit}, share {})",
            options.max_category_share
        ))),
        status => {
            warn!(%status, "budget allocation failed");
            Err(EngineError::SolverInfeasible { status })
        }
    }
}
