//! Solver-agnostic model builder and solver adapter interface.
//!
//! A [`Model`] collects binary/integer/continuous variables, linear rows and a
//! single objective. Backends implement [`Solver`] to turn a model into a
//! [`Solution`] under a [`SolverConfig`].

pub mod config;
pub mod model;
pub mod solver;
pub mod types;

pub use config::SolverConfig;
pub use model::{Model, ModelError, Violation};
pub use solver::{Solution, Solver, SolverError, SolverStatus};
pub use types::{Bounds, Constraint, Objective, Sense, Variable};
