//! The [`Solver`] seam and the backend-neutral types crossing it.

use crate::config::SolverConfig;
use crate::model::{Model, ModelError};
use lineup_expr::ids::VariableId;

/// Outcome of a solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolverStatus {
    /// Proven optimal solution.
    Optimal,
    /// Feasible incumbent, optimality not proven (e.g. time limit reached).
    Feasible,
    /// No assignment satisfies the constraints.
    Infeasible,
    /// The backend stopped without a usable answer.
    Unknown,
}

impl SolverStatus {
    pub fn is_optimal(self) -> bool {
        matches!(self, SolverStatus::Optimal)
    }

    /// Optimal or feasible: a valuation comes with it.
    pub fn has_solution(self) -> bool {
        matches!(self, SolverStatus::Optimal | SolverStatus::Feasible)
    }

    pub fn is_infeasible(self) -> bool {
        matches!(self, SolverStatus::Infeasible)
    }

    /// Lowercase name used in logs and reports.
    pub fn as_str(self) -> &'static str {
        match self {
            SolverStatus::Optimal => "optimal",
            SolverStatus::Feasible => "feasible",
            SolverStatus::Infeasible => "infeasible",
            SolverStatus::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for SolverStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a backend could not produce a [`Solution`].
#[derive(Debug, Clone, PartialEq)]
pub enum SolverError {
    EmptyModel,
    NoObjective,
    /// Raw id of a variable the backend could not resolve.
    InvalidVariableId(u32),
    /// Model rejected while being handed to the backend.
    Model(ModelError),
    /// A [`SolverConfig`] setting outside the range backends accept.
    InvalidConfig(String),
    /// Unknown backend name, or a backend missing from this build.
    SolverNotAvailable(String),
    /// Anything else the backend reports.
    SolverSpecific(String),
}

impl SolverError {
    /// Stable code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            SolverError::EmptyModel => "SOLVER_EMPTY_MODEL",
            SolverError::NoObjective => "SOLVER_NO_OBJECTIVE",
            SolverError::InvalidVariableId(_) => "SOLVER_INVALID_VARIABLE_ID",
            SolverError::Model(_) => "SOLVER_INVALID_MODEL",
            SolverError::InvalidConfig(_) => "SOLVER_INVALID_CONFIG",
            SolverError::SolverNotAvailable(_) => "SOLVER_NOT_AVAILABLE",
            SolverError::SolverSpecific(_) => "SOLVER_SPECIFIC",
        }
    }
}

impl std::fmt::Display for SolverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverError::EmptyModel => write!(f, "[{}] Model has no variables", self.code()),
            SolverError::NoObjective => write!(f, "[{}] Model has no objective", self.code()),
            SolverError::InvalidVariableId(id) => {
                write!(f, "[{}] Backend has no variable {}", self.code(), id)
            }
            SolverError::Model(err) => write!(f, "[{}] {}", self.code(), err),
            SolverError::InvalidConfig(msg) => {
                write!(f, "[{}] Invalid solver setting: {}", self.code(), msg)
            }
            SolverError::SolverNotAvailable(msg) => {
                write!(f, "[{}] Solver not available: {}", self.code(), msg)
            }
            SolverError::SolverSpecific(msg) => {
                write!(f, "[{}] Solver error: {}", self.code(), msg)
            }
        }
    }
}

impl std::error::Error for SolverError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SolverError::Model(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ModelError> for SolverError {
    fn from(err: ModelError) -> Self {
        SolverError::Model(err)
    }
}

/// What a backend hands back.
///
/// `values` is dense and indexed by [`VariableId::index`]; it is empty unless
/// the status carries a solution.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub status: SolverStatus,
    pub values: Vec<f64>,
    /// Objective value when a valuation is present.
    pub objective_value: Option<f64>,
    /// Wall-clock solve time in seconds.
    pub solve_time_seconds: f64,
}

impl Solution {
    /// Solution carrying a valuation.
    pub fn with_values(status: SolverStatus, values: Vec<f64>, objective_value: f64) -> Self {
        Self {
            status,
            values,
            objective_value: Some(objective_value),
            solve_time_seconds: 0.0,
        }
    }

    /// Solution without a valuation (infeasible or unknown).
    pub fn without_values(status: SolverStatus) -> Self {
        Self {
            status,
            values: Vec::new(),
            objective_value: None,
            solve_time_seconds: 0.0,
        }
    }

    /// Record how long the solve took.
    pub fn with_solve_time(mut self, seconds: f64) -> Self {
        self.solve_time_seconds = seconds;
        self
    }

    pub fn value(&self, var_id: VariableId) -> Option<f64> {
        self.values.get(var_id.index()).copied()
    }

    pub fn is_optimal(&self) -> bool {
        self.status.is_optimal()
    }

    pub fn has_solution(&self) -> bool {
        self.status.has_solution()
    }

    pub fn is_infeasible(&self) -> bool {
        self.status.is_infeasible()
    }
}

/// A MIP backend.
///
/// A backend receives a fully built model and must return within the
/// configured time limit. Infeasibility is reported through the returned
/// status, never as an error.
pub trait Solver {
    /// Short backend name used in logs and reports.
    fn name(&self) -> &str;

    fn solve(&mut self, model: &Model, config: &SolverConfig) -> Result<Solution, SolverError>;
}

impl<S: Solver + ?Sized> Solver for &mut S {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn solve(&mut self, model: &Model, config: &SolverConfig) -> Result<Solution, SolverError> {
        (**self).solve(model, config)
    }
}

impl<S: Solver + ?Sized> Solver for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn solve(&mut self, model: &Model, config: &SolverConfig) -> Result<Solution, SolverError> {
        (**self).solve(model, config)
    }
}
