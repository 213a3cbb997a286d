//! Bounded continuous allocation under a single budget row.
//!
//! Program: maximize `sum c[i] * x[i]` subject to `sum x[i] <= budget` and
//! `0 <= x[i] <= upper[i]`. With one coupling row the LP optimum is reached
//! by filling variables in decreasing order of `c[i]` until the budget runs
//! out, stopping at the first non-positive coefficient.

use super::SolveStatus;

#[derive(Debug, Clone, PartialEq)]
pub struct KnapsackSolution {
    pub status: SolveStatus,
    /// Value of each variable. Empty unless optimal.
    pub values: Vec<f64>,
    pub objective: f64,
}

impl KnapsackSolution {
    fn unsolved(status: SolveStatus) -> Self {
        Self {
            status,
            values: Vec::new(),
            objective: 0.0,
        }
    }
}

pub fn solve(coefficients: &[f64], upper: &[f64], budget: f64) -> KnapsackSolution {
    if coefficients.len() != upper.len() {
        return KnapsackSolution::unsolved(SolveStatus::InvalidModel);
    }
    if budget.is_nan() || coefficients.iter().any(|c| !c.is_finite()) || upper.iter().any(|u| u.is_nan()) {
        return KnapsackSolution::unsolved(SolveStatus::InvalidModel);
    }
    if budget < 0.0 || upper.iter().any(|u| *u < 0.0) {
        return KnapsackSolution::unsolved(SolveStatus::Infeasible);
    }

    let unbounded = coefficients
        .iter()
        .zip(upper)
        .any(|(c, u)| *c > 0.0 && u.min(budget).is_infinite());
    if unbounded {
        return KnapsackSolution::unsolved(SolveStatus::Unbounded);
    }

    let mut order: Vec<usize> = (0..coefficients.len()).collect();
    // Stable: equal coefficients keep input order.
    order.sort_by(|a, b| coefficients[*b].total_cmp(&coefficients[*a]));

    let mut values = vec![0.0; coefficients.len()];
    let mut remaining = budget;
    for index in order {
        if coefficients[index] <= 0.0 || remaining <= 0.0 {
            break;
        }
        let value = upper[index].min(remaining);
        values[index] = value;
        remaining = (remaining - value).max(0.0);
    }

    let objective = coefficients.iter().zip(&values).map(|(c, x)| c * x).sum();

    KnapsackSolution {
        status: SolveStatus::Optimal,
        values,
        objective,
    }
}
