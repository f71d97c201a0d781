//! Error types for building, solving and decoding assignments.

use std::path::PathBuf;

use lineup_core::{ModelError, SolverError};

/// Errors raised by the assignment pipeline.
///
/// Infeasible or undecided solves are not errors; they come back as
/// [`crate::AssignmentOutcome::NoSolution`].
#[derive(Debug, Clone, PartialEq)]
pub enum AssignError {
    /// A line declares a capacity below zero.
    NegativeCapacity { line_id: String, capacity: i64 },
    /// A container requires no items.
    EmptyContainer { container_id: String },
    /// Two containers share an id.
    DuplicateContainer { container_id: String },
    /// Two lines share an id.
    DuplicateLine { line_id: String },
    /// A container or line has an empty id.
    EmptyId { kind: &'static str, position: usize },
    /// The optimization model rejected a variable or row.
    Model(ModelError),
    /// The backend failed to run.
    Solver(SolverError),
    /// The backend valuation contradicts the model.
    InconsistentSolution { reason: String },
    /// Reading input or writing the model dump failed.
    Io { path: PathBuf, message: String },
    /// The input document is malformed.
    Input { reason: String },
}

impl AssignError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            AssignError::NegativeCapacity { .. } => "ASSIGN_NEGATIVE_CAPACITY",
            AssignError::EmptyContainer { .. } => "ASSIGN_EMPTY_CONTAINER",
            AssignError::DuplicateContainer { .. } => "ASSIGN_DUPLICATE_CONTAINER",
            AssignError::DuplicateLine { .. } => "ASSIGN_DUPLICATE_LINE",
            AssignError::EmptyId { .. } => "ASSIGN_EMPTY_ID",
            AssignError::Model(_) => "ASSIGN_INVALID_MODEL",
            AssignError::Solver(_) => "ASSIGN_SOLVER_FAILED",
            AssignError::InconsistentSolution { .. } => "ASSIGN_INCONSISTENT_SOLUTION",
            AssignError::Io { .. } => "ASSIGN_IO",
            AssignError::Input { .. } => "ASSIGN_INVALID_INPUT",
        }
    }

    /// Whether the error comes from validating containers and lines.
    pub fn is_construction_error(&self) -> bool {
        matches!(
            self,
            AssignError::NegativeCapacity { .. }
                | AssignError::EmptyContainer { .. }
                | AssignError::DuplicateContainer { .. }
                | AssignError::DuplicateLine { .. }
                | AssignError::EmptyId { .. }
                | AssignError::Model(_)
        )
    }

    pub(crate) fn io(path: impl Into<PathBuf>, err: &std::io::Error) -> Self {
        AssignError::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }

    pub(crate) fn inconsistent(reason: impl Into<String>) -> Self {
        AssignError::InconsistentSolution {
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for AssignError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssignError::NegativeCapacity { line_id, capacity } => write!(
                f,
                "[{}] Line '{}' has negative capacity {}",
                self.code(),
                line_id,
                capacity
            ),
            AssignError::EmptyContainer { container_id } => write!(
                f,
                "[{}] Container '{}' requires no items",
                self.code(),
                container_id
            ),
            AssignError::DuplicateContainer { container_id } => write!(
                f,
                "[{}] Container id '{}' appears more than once",
                self.code(),
                container_id
            ),
            AssignError::DuplicateLine { line_id } => write!(
                f,
                "[{}] Line id '{}' appears more than once",
                self.code(),
                line_id
            ),
            AssignError::EmptyId { kind, position } => write!(
                f,
                "[{}] {} at position {} has an empty id",
                self.code(),
                kind,
                position
            ),
            AssignError::Model(err) => write!(f, "[{}] {}", self.code(), err),
            AssignError::Solver(err) => write!(f, "[{}] {}", self.code(), err),
            AssignError::InconsistentSolution { reason } => write!(
                f,
                "[{}] Solver valuation is inconsistent: {}",
                self.code(),
                reason
            ),
            AssignError::Io { path, message } => write!(
                f,
                "[{}] {}: {}",
                self.code(),
                path.display(),
                message
            ),
            AssignError::Input { reason } => {
                write!(f, "[{}] Invalid input: {}", self.code(), reason)
            }
        }
    }
}

impl std::error::Error for AssignError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AssignError::Model(err) => Some(err),
            AssignError::Solver(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ModelError> for AssignError {
    fn from(err: ModelError) -> Self {
        AssignError::Model(err)
    }
}

impl From<SolverError> for AssignError {
    fn from(err: SolverError) -> Self {
        AssignError::Solver(err)
    }
}
