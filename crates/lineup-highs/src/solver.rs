//! HiGHS implementation of [`lineup_core::Solver`].

use crate::problem::{
    ColumnKind, HighsModel, HighsModelError, HighsOption, HighsStatus, ObjectiveSense,
};
use crate::status::{highs_may_have_incumbent, highs_status_string, highs_to_core_status};
use lineup_core::{Model, Sense, Solution, Solver, SolverConfig, SolverError, SolverStatus};
use std::time::Instant;
use tracing::{debug, trace, warn};

/// Tolerance for accepting a limit-truncated incumbent.
const INCUMBENT_TOLERANCE: f64 = 1e-6;

const BACKEND_NAME: &str = "highs";

fn highs_model_error_to_solver_error(err: HighsModelError) -> SolverError {
    SolverError::SolverSpecific(err.to_string())
}

/// Look up a backend by name.
///
/// Only `"highs"` is compiled in; any other name reports
/// [`SolverError::SolverNotAvailable`].
pub fn solver_by_name(name: &str) -> Result<HighsSolver, SolverError> {
    if name.eq_ignore_ascii_case(BACKEND_NAME) {
        Ok(HighsSolver::new())
    } else {
        Err(SolverError::SolverNotAvailable(format!(
            "unknown backend '{name}' (available: {BACKEND_NAME})"
        )))
    }
}

/// MIP backend backed by the HiGHS library.
///
/// Each call to [`Solver::solve`] copies the model into a fresh HiGHS
/// problem, so one instance can solve many models.
#[derive(Debug, Clone, Copy, Default)]
pub struct HighsSolver {
    _private: (),
}

impl HighsSolver {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Solver for HighsSolver {
    fn name(&self) -> &str {
        BACKEND_NAME
    }

    fn solve(&mut self, model: &Model, config: &SolverConfig) -> Result<Solution, SolverError> {
        solve_model(model, config)
    }
}

fn validate_model(model: &Model) -> Result<Sense, SolverError> {
    if model.num_variables() == 0 {
        return Err(SolverError::EmptyModel);
    }
    model.objective().sense.ok_or(SolverError::NoObjective)
}

fn apply_solver_config(
    highs_model: &mut HighsModel,
    config: &SolverConfig,
) -> Result<(), SolverError> {
    // `highs` panics on option values HiGHS rejects.
    config.validate()?;
    highs_model.set_log_to_console(config.log_to_console.unwrap_or(false));

    if let Some(limit) = config.time_limit_seconds() {
        highs_model.set_option("time_limit", HighsOption::Float(limit));
    }
    if let Some(gap) = config.mip_gap {
        highs_model.set_option("mip_rel_gap", HighsOption::Float(gap));
    }
    if let Some(presolve) = config.presolve {
        let presolve_str = if presolve { "on" } else { "off" };
        highs_model.set_option("presolve", HighsOption::Str(presolve_str.to_string()));
    }
    if let Some(threads) = config.threads {
        let threads = i32::try_from(threads).unwrap_or(i32::MAX);
        highs_model.set_option("threads", HighsOption::Int(threads));
    }
    Ok(())
}

fn add_variables_to_highs(model: &Model, highs_model: &mut HighsModel) -> Vec<usize> {
    let mut objective_coeffs = vec![0.0; model.num_variables()];
    for (var_id, coeff) in &model.objective().terms {
        objective_coeffs[var_id.index()] += *coeff;
    }

    let mut var_to_col = Vec::with_capacity(model.num_variables());
    for (var_id, var) in model.variables() {
        let obj_coeff = objective_coeffs[var_id.index()];
        let kind = if var.is_integer {
            ColumnKind::Integer
        } else {
            ColumnKind::Continuous
        };
        let col_idx = highs_model.add_column(kind, var.bounds.lower, var.bounds.upper, obj_coeff);
        var_to_col.push(col_idx);
    }

    debug!(
        component = "solver",
        operation = "add_variables",
        status = "success",
        num_vars = model.num_variables(),
        "Added all variables to HiGHS"
    );

    var_to_col
}

fn add_constraints_to_highs(
    model: &Model,
    highs_model: &mut HighsModel,
    var_to_col: &[usize],
) -> Result<(), SolverError> {
    let started = Instant::now();
    for ((constraint_id, constraint), row) in model.constraints().zip(model.rows()) {
        let mut col_indices = Vec::with_capacity(row.len());
        let mut coefficients = Vec::with_capacity(row.len());
        for (var_id, coeff) in row {
            let col_idx = *var_to_col
                .get(var_id.index())
                .ok_or(SolverError::InvalidVariableId(var_id.inner()))?;
            col_indices.push(col_idx);
            coefficients.push(coeff);
        }

        highs_model
            .add_row(
                constraint.bounds.lower,
                constraint.bounds.upper,
                &col_indices,
                &coefficients,
            )
            .map_err(highs_model_error_to_solver_error)?;

        trace!(
            component = "solver",
            operation = "add_constraint",
            status = "success",
            constraint_id = constraint_id.inner(),
            lower = constraint.bounds.lower,
            upper = constraint.bounds.upper,
            num_coeffs = col_indices.len(),
            "Added constraint to HiGHS"
        );
    }

    debug!(
        component = "solver",
        operation = "add_constraints",
        status = "success",
        num_constraints = model.num_constraints(),
        duration_ms = started.elapsed().as_secs_f64() * 1000.0,
        "Added all constraints to HiGHS"
    );

    Ok(())
}

fn all_columns_bounded(model: &Model) -> bool {
    model
        .variables()
        .all(|(_, var)| var.bounds.lower.is_finite() && var.bounds.upper.is_finite())
}

fn solve_model(model: &Model, config: &SolverConfig) -> Result<Solution, SolverError> {
    let sense = validate_model(model)?;
    let solve_started = Instant::now();

    debug!(
        component = "solver",
        operation = "solve",
        status = "start",
        solver = BACKEND_NAME,
        variables = model.num_variables(),
        constraints = model.num_constraints(),
        nnz = model.num_coefficients(),
        time_limit_secs = ?config.time_limit_seconds(),
        "Starting solve process"
    );

    let mut highs_model = HighsModel::new();
    apply_solver_config(&mut highs_model, config)?;
    highs_model.set_objective_sense(match sense {
        Sense::Minimize => ObjectiveSense::Minimize,
        Sense::Maximize => ObjectiveSense::Maximize,
    });

    let var_to_col = add_variables_to_highs(model, &mut highs_model);
    add_constraints_to_highs(model, &mut highs_model, &var_to_col)?;

    let highs_status = highs_model
        .solve()
        .map_err(highs_model_error_to_solver_error)?;
    let solve_seconds = solve_started.elapsed().as_secs_f64();

    debug!(
        component = "solver",
        operation = "solve",
        status = "success",
        solver = BACKEND_NAME,
        solver_status = highs_status_string(highs_status),
        duration_ms = solve_seconds * 1000.0,
        "HiGHS solve completed"
    );

    let solution = if highs_status == HighsStatus::Optimal {
        let values = read_values(&highs_model, &var_to_col)?;
        let objective = model.objective_value_of(&values);
        Solution::with_values(SolverStatus::Optimal, values, objective)
    } else if highs_may_have_incumbent(highs_status) {
        let values = read_values(&highs_model, &var_to_col)?;
        limit_stop_solution(model, values, highs_status)
    } else {
        let status = highs_to_core_status(highs_status, all_columns_bounded(model));
        if status == SolverStatus::Unknown {
            warn!(
                component = "solver",
                operation = "solve",
                status = "warn",
                solver = BACKEND_NAME,
                solver_status = highs_status_string(highs_status),
                "Solver stopped without a usable answer"
            );
        }
        Solution::without_values(status)
    };

    Ok(solution.with_solve_time(solve_seconds))
}

/// Keep a limit-truncated incumbent only if it actually satisfies the model.
fn limit_stop_solution(model: &Model, values: Vec<f64>, highs_status: HighsStatus) -> Solution {
    match model.find_violation(&values, INCUMBENT_TOLERANCE) {
        None => {
            let objective = model.objective_value_of(&values);
            warn!(
                component = "solver",
                operation = "solve",
                status = "warn",
                solver = BACKEND_NAME,
                solver_status = highs_status_string(highs_status),
                objective_value = objective,
                "Solver hit limit but returning best solution found"
            );
            Solution::with_values(SolverStatus::Feasible, values, objective)
        }
        Some(violation) => {
            warn!(
                component = "solver",
                operation = "solve",
                status = "warn",
                solver = BACKEND_NAME,
                solver_status = highs_status_string(highs_status),
                violation = %violation,
                "Solver hit limit without a feasible incumbent"
            );
            Solution::without_values(SolverStatus::Unknown)
        }
    }
}

fn read_values(highs_model: &HighsModel, var_to_col: &[usize]) -> Result<Vec<f64>, SolverError> {
    let columns = highs_model
        .col_values()
        .map_err(highs_model_error_to_solver_error)?;
    var_to_col
        .iter()
        .map(|&col_idx| {
            columns.get(col_idx).copied().ok_or_else(|| {
                SolverError::SolverSpecific(format!(
                    "HiGHS returned {} column values, expected at least {}",
                    columns.len(),
                    col_idx + 1
                ))
            })
        })
        .collect()
}
