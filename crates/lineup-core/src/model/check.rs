//! Evaluating a candidate valuation against the model.
//!
//! Backends use this to decide whether a limit-truncated incumbent can be
//! reported as feasible, and callers use it to solve variable-free models
//! without a backend.

use lineup_expr::ids::{ConstraintId, VariableId};

use crate::model::Model;

/// First reason a valuation fails to satisfy a model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Violation {
    /// Fewer values than variables.
    MissingValues { expected: usize, got: usize },
    /// A value outside its variable bounds.
    VariableBounds { var_id: VariableId, value: f64 },
    /// A fractional value on an integer variable.
    Integrality { var_id: VariableId, value: f64 },
    /// A row activity outside its constraint bounds.
    Row {
        constraint_id: ConstraintId,
        activity: f64,
    },
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Violation::MissingValues { expected, got } => {
                write!(f, "expected {expected} values, got {got}")
            }
            Violation::VariableBounds { var_id, value } => {
                write!(f, "variable {var_id} = {value} is out of bounds")
            }
            Violation::Integrality { var_id, value } => {
                write!(f, "integer variable {var_id} = {value} is fractional")
            }
            Violation::Row {
                constraint_id,
                activity,
            } => write!(
                f,
                "constraint {constraint_id} activity {activity} is out of bounds"
            ),
        }
    }
}

impl Model {
    /// Find the first bound, integrality or row violation of `values`.
    ///
    /// `values` is indexed by variable id. Returns `None` when every check
    /// passes within `tolerance`.
    pub fn find_violation(&self, values: &[f64], tolerance: f64) -> Option<Violation> {
        if values.len() < self.num_variables() {
            return Some(Violation::MissingValues {
                expected: self.num_variables(),
                got: values.len(),
            });
        }

        for (var_id, var) in self.variables() {
            let value = values[var_id.index()];
            if !var.bounds.contains(value, tolerance) {
                return Some(Violation::VariableBounds { var_id, value });
            }
            if var.is_integer && (value - value.round()).abs() > tolerance {
                return Some(Violation::Integrality { var_id, value });
            }
        }

        let mut activities = vec![0.0; self.num_constraints()];
        for (var_id, column) in self.columns() {
            let value = values[var_id.index()];
            for (constraint_id, coeff) in column {
                activities[constraint_id.index()] += coeff * value;
            }
        }

        self.constraints()
            .zip(activities)
            .find(|((_, constraint), activity)| !constraint.bounds.contains(*activity, tolerance))
            .map(|((constraint_id, _), activity)| Violation::Row {
                constraint_id,
                activity,
            })
    }

    /// Whether `values` satisfies every bound, integrality and row.
    pub fn is_satisfied_by(&self, values: &[f64], tolerance: f64) -> bool {
        self.find_violation(values, tolerance).is_none()
    }

    /// Objective value of `values`; missing entries count as zero.
    pub fn objective_value_of(&self, values: &[f64]) -> f64 {
        self.objective
            .terms
            .iter()
            .map(|(var_id, coeff)| coeff * values.get(var_id.index()).copied().unwrap_or(0.0))
            .sum()
    }
}
