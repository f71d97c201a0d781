//! End-to-end pipeline: build, solve, decode.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use lineup_core::{Model, Solution, Solver, SolverConfig, SolverStatus};

use crate::builder::{AssignmentModel, BuildOptions};
use crate::decoder::{AssignmentOutcome, decode};
use crate::domain::{AssemblyLine, Container};
use crate::error::AssignError;

/// Default wall-clock budget for one solve.
pub const DEFAULT_TIME_LIMIT: Duration = Duration::from_secs(300);

const EMPTY_MODEL_TOLERANCE: f64 = 1e-9;

/// Everything [`assign`] can be tuned with.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignOptions {
    pub build: BuildOptions,
    pub solver: SolverConfig,
    /// Write the model in LP format here before solving.
    pub lp_dump: Option<PathBuf>,
}

impl Default for AssignOptions {
    fn default() -> Self {
        Self {
            build: BuildOptions::default(),
            solver: SolverConfig::new().with_time_limit(DEFAULT_TIME_LIMIT),
            lp_dump: None,
        }
    }
}

impl AssignOptions {
    pub fn with_build(mut self, build: BuildOptions) -> Self {
        self.build = build;
        self
    }

    pub fn with_solver(mut self, solver: SolverConfig) -> Self {
        self.solver = solver;
        self
    }

    pub fn with_lp_dump(mut self, path: impl Into<PathBuf>) -> Self {
        self.lp_dump = Some(path.into());
        self
    }
}

/// Place `containers` on `lines` with the given backend.
///
/// A model without variables (no containers, or no lines) is decided
/// without calling the backend.
///
/// # Errors
///
/// Construction errors for invalid inputs, [`AssignError::Solver`] when the
/// backend fails, [`AssignError::InconsistentSolution`] when its valuation
/// does not decode, and [`AssignError::Io`] when the LP dump cannot be written.
pub fn assign<S: Solver + ?Sized>(
    containers: &[Container],
    lines: &[AssemblyLine],
    solver: &mut S,
    options: &AssignOptions,
) -> Result<AssignmentOutcome, AssignError> {
    let started = Instant::now();
    let built = AssignmentModel::build(containers, lines, options.build)?;

    if let Some(path) = &options.lp_dump {
        write_lp_file(built.model(), path)?;
    }

    let solution = if built.model().num_variables() == 0 {
        solve_without_variables(built.model())
    } else {
        solver.solve(built.model(), &options.solver)?
    };

    let outcome = decode(&built, containers, lines, &solution)?;

    tracing::info!(
        component = "assign",
        operation = "assign",
        status = "success",
        solver = solver.name(),
        solver_status = outcome.status().as_str(),
        placed = outcome.assignment().map_or(0, |a| a.placed_count()),
        containers = containers.len(),
        solve_seconds = solution.solve_time_seconds,
        duration_ms = started.elapsed().as_secs_f64() * 1000.0,
        "Assignment finished"
    );

    Ok(outcome)
}

fn solve_without_variables(model: &Model) -> Solution {
    let status = if model.is_satisfied_by(&[], EMPTY_MODEL_TOLERANCE) {
        SolverStatus::Optimal
    } else {
        SolverStatus::Infeasible
    };
    tracing::debug!(
        component = "assign",
        operation = "solve",
        status = "success",
        solver_status = status.as_str(),
        constraints = model.num_constraints(),
        "Decided model without variables"
    );
    if status.has_solution() {
        Solution::with_values(status, Vec::new(), 0.0)
    } else {
        Solution::without_values(status)
    }
}

fn write_lp_file(model: &Model, path: &Path) -> Result<(), AssignError> {
    let file = File::create(path).map_err(|err| AssignError::io(path, &err))?;
    let mut writer = BufWriter::new(file);
    model
        .write_lp(&mut writer)
        .and_then(|()| writer.flush())
        .map_err(|err| AssignError::io(path, &err))?;
    tracing::debug!(
        component = "assign",
        operation = "write_lp",
        status = "success",
        path = %path.display(),
        "Wrote LP model"
    );
    Ok(())
}
