//! HiGHS backend for lineup models.
//!
//! [`HighsSolver`] implements [`lineup_core::Solver`]: it copies a
//! [`lineup_core::Model`] into a HiGHS row problem, solves it under the
//! configured limits and maps the outcome back to a solver-agnostic
//! [`lineup_core::Solution`].

pub mod problem;
pub mod solver;
mod status;

pub use problem::{
    ColumnKind, HighsModel, HighsModelError, HighsOption, HighsStatus, ObjectiveSense,
};
pub use solver::{HighsSolver, solver_by_name};
