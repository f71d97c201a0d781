//! Errors raised while assembling or querying a [`Model`](crate::Model).

use std::fmt;

use lineup_expr::ids::{ConstraintId, VariableId};

#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    InvalidVariableId(VariableId),
    /// Lower bound above upper bound on a column.
    InvalidVariableBounds { lower: f64, upper: f64 },
    InvalidConstraintId(ConstraintId),
    /// Lower bound above upper bound on a row.
    InvalidConstraintBounds { lower: f64, upper: f64 },
    /// NaN or infinite coefficient in a row or the objective.
    InvalidCoefficient { coefficient: f64 },
    NoObjective,
    MultipleObjectives,
}

impl ModelError {
    /// Stable code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidVariableId(_) => "VARIABLE_INVALID_ID",
            Self::InvalidVariableBounds { .. } => "VARIABLE_INVALID_BOUNDS",
            Self::InvalidConstraintId(_) => "CONSTRAINT_INVALID_ID",
            Self::InvalidConstraintBounds { .. } => "CONSTRAINT_INVALID_BOUNDS",
            Self::InvalidCoefficient { .. } => "COEFFICIENT_INVALID",
            Self::NoObjective => "OBJECTIVE_MISSING",
            Self::MultipleObjectives => "OBJECTIVE_ALREADY_SET",
        }
    }
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] ", self.code())?;
        match self {
            Self::InvalidVariableId(id) => write!(f, "no variable with id {id}"),
            Self::InvalidConstraintId(id) => write!(f, "no constraint with id {id}"),
            Self::InvalidVariableBounds { lower, upper } => {
                write!(f, "variable lower bound {lower} exceeds upper bound {upper}")
            }
            Self::InvalidConstraintBounds { lower, upper } => {
                write!(f, "row lower bound {lower} exceeds upper bound {upper}")
            }
            Self::InvalidCoefficient { coefficient } => {
                write!(f, "coefficient {coefficient} is not finite")
            }
            Self::NoObjective => f.write_str("model has no objective"),
            Self::MultipleObjectives => {
                f.write_str("objective already set; call set_objective to replace it")
            }
        }
    }
}

impl std::error::Error for ModelError {}
