//! Capacitated binary assignment solved as a min-cost flow.
//!
//! Program: binary `x[r][c]`, minimize `sum cost[r][c] * x[r][c]` subject to
//! `sum_r x[r][c] == 1` for every column and `sum_c x[r][c] <= capacity` for
//! every row. The constraint matrix is totally unimodular, so the integral
//! flow found by successive shortest paths is optimal for the binary
//! program as well.

use tracing::{debug, trace};

use super::{SolveLimits, SolveStatus};

/// Minimum improvement treated as a real relaxation.
const EPSILON: f64 = 1e-9;

/// A rows x columns assignment program.
#[derive(Debug, Clone, Copy)]
pub struct TransportProblem<'a> {
    /// `costs[r][c]`; every row must have exactly `columns` entries.
    pub costs: &'a [Vec<f64>],
    pub columns: usize,
    /// Maximum columns any single row may take.
    pub row_capacity: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransportSolution {
    pub status: SolveStatus,
    /// Row owning each column. All `Some` when optimal.
    pub assignment: Vec<Option<usize>>,
    pub objective: f64,
    pub iterations: usize,
}

impl TransportSolution {
    fn unsolved(status: SolveStatus, columns: usize, iterations: usize) -> Self {
        Self {
            status,
            assignment: vec![None; columns],
            objective: 0.0,
            iterations,
        }
    }
}

/// Residual-graph state shared by the augmentation steps.
struct Flow {
    owner: Vec<Option<usize>>,
    load: Vec<usize>,
}

/// Shortest source-to-sink path through the residual graph.
struct AugmentingPath {
    end_column: usize,
    /// Row each column was reached from.
    column_pred: Vec<Option<usize>>,
    /// Column each row was reached from; `None` means straight from the source.
    row_pred: Vec<Option<usize>>,
}

impl<'a> TransportProblem<'a> {
    pub fn new(costs: &'a [Vec<f64>], columns: usize, row_capacity: usize) -> Self {
        Self {
            costs,
            columns,
            row_capacity,
        }
    }

    pub fn rows(&self) -> usize {
        self.costs.len()
    }

    fn validate(&self) -> Result<(), SolveStatus> {
        let well_formed = self
            .costs
            .iter()
            .all(|row| row.len() == self.columns && row.iter().all(|cost| cost.is_finite()));
        if !well_formed {
            return Err(SolveStatus::InvalidModel);
        }

        let supply = self.rows().saturating_mul(self.row_capacity);
        if self.columns > 0 && supply < self.columns {
            return Err(SolveStatus::Infeasible);
        }

        Ok(())
    }

    pub fn solve(&self, limits: &SolveLimits) -> TransportSolution {
        if let Err(status) = self.validate() {
            debug!(%status, rows = self.rows(), columns = self.columns, "transport model rejected");
            return TransportSolution::unsolved(status, self.columns, 0);
        }

        let mut flow = Flow {
            owner: vec![None; self.columns],
            load: vec![0; self.rows()],
        };
        let mut budget = limits.start();

        for _ in 0..self.columns {
            if let Some(status) = budget.tick() {
                debug!(%status, iterations = budget.iterations(), "transport solve stopped early");
                return TransportSolution::unsolved(status, self.columns, budget.iterations());
            }

            let path = match self.shortest_path(&flow) {
                Ok(path) => path,
                Err(status) => {
                    return TransportSolution::unsolved(status, self.columns, budget.iterations());
                }
            };

            if let Err(status) = self.augment(&mut flow, &path) {
                return TransportSolution::unsolved(status, self.columns, budget.iterations());
            }
            trace!(column = path.end_column, "augmented");
        }

        let objective = flow
            .owner
            .iter()
            .enumerate()
            .filter_map(|(column, row)| row.map(|row| self.costs[row][column]))
            .sum();

        TransportSolution {
            status: SolveStatus::Optimal,
            assignment: flow.owner,
            objective,
            iterations: budget.iterations(),
        }
    }

    /// Bellman-Ford over rows and columns. Forward arcs row -> column cost
    /// `+cost`, backward arcs column -> current owner cost `-cost`.
    fn shortest_path(&self, flow: &Flow) -> Result<AugmentingPath, SolveStatus> {
        let rows = self.rows();
        let mut row_dist: Vec<f64> = flow
            .load
            .iter()
            .map(|load| if *load < self.row_capacity { 0.0 } else { f64::INFINITY })
            .collect();
        let mut row_pred: Vec<Option<usize>> = vec![None; rows];
        let mut column_dist = vec![f64::INFINITY; self.columns];
        let mut column_pred: Vec<Option<usize>> = vec![None; self.columns];

        let mut settled = false;
        for _ in 0..=(rows + self.columns) {
            let mut changed = false;

            for (row, costs) in self.costs.iter().enumerate() {
                let base = row_dist[row];
                if !base.is_finite() {
                    continue;
                }
                for (column, cost) in costs.iter().enumerate() {
                    if flow.owner[column] == Some(row) {
                        continue;
                    }
                    let candidate = base + cost;
                    if candidate + EPSILON < column_dist[column] {
                        column_dist[column] = candidate;
                        column_pred[column] = Some(row);
                        changed = true;
                    }
                }
            }

            for (column, owner) in flow.owner.iter().enumerate() {
                let (Some(row), true) = (*owner, column_dist[column].is_finite()) else {
                    continue;
                };
                let candidate = column_dist[column] - self.costs[row][column];
                if candidate + EPSILON < row_dist[row] {
                    row_dist[row] = candidate;
                    row_pred[row] = Some(column);
                    changed = true;
                }
            }

            if !changed {
                settled = true;
                break;
            }
        }

        // Still relaxing after |V| rounds means a negative cycle crept in.
        if !settled {
            return Err(SolveStatus::NotSolved);
        }

        let end_column = flow
            .owner
            .iter()
            .enumerate()
            .filter(|(column, owner)| owner.is_none() && column_dist[*column].is_finite())
            .min_by(|(a, _), (b, _)| column_dist[*a].total_cmp(&column_dist[*b]))
            .map(|(column, _)| column)
            .ok_or(SolveStatus::Infeasible)?;

        Ok(AugmentingPath {
            end_column,
            column_pred,
            row_pred,
        })
    }

    fn augment(&self, flow: &mut Flow, path: &AugmentingPath) -> Result<(), SolveStatus> {
        let mut column = path.end_column;

        for _ in 0..=(self.rows() + self.columns) {
            let row = path.column_pred[column].ok_or(SolveStatus::NotSolved)?;
            flow.owner[column] = Some(row);

            match path.row_pred[row] {
                None => {
                    flow.load[row] += 1;
                    return Ok(());
                }
                // `row` hands `released` over to its predecessor and keeps its load.
                Some(released) => column = released,
            }
        }

        Err(SolveStatus::NotSolved)
    }
}
