//! Staging area for a single HiGHS solve.
//!
//! [`HighsModel`] accumulates columns, rows and options on a `highs`
//! [`RowProblem`], runs it once, and keeps the primal column values so the
//! caller can read them back by column position.

use std::fmt;

use highs::{Col, HighsModelStatus, RowProblem, Sense as HighsSense, SolvedModel};
use tracing::{debug, trace, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectiveSense {
    Minimize,
    Maximize,
}

/// Integrality of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Continuous,
    Integer,
}

/// Model status as reported by HiGHS, narrowed to what the backend acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighsStatus {
    Optimal,
    Infeasible,
    Unbounded,
    /// Presolve stopped before telling the two apart.
    UnboundedOrInfeasible,
    /// Stopped on the time budget; an incumbent may exist.
    ReachedTimeLimit,
    /// Stopped on an iteration cap; an incumbent may exist.
    ReachedIterationLimit,
    Unknown,
}

#[derive(Debug, Clone, PartialEq)]
pub enum HighsModelError {
    /// `add_row` got parallel slices of different length.
    ColumnCoefficientLengthMismatch { columns: usize, coefficients: usize },
    ColumnIndexOutOfBounds { column_index: usize, num_columns: usize },
    /// Results were requested before any solve ran.
    SolveRequired { operation: &'static str },
    /// HiGHS refused the problem without producing a model status.
    SolveAborted { reason: String },
}

impl fmt::Display for HighsModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ColumnCoefficientLengthMismatch {
                columns,
                coefficients,
            } => write!(
                f,
                "row has {columns} column indices but {coefficients} coefficients"
            ),
            Self::ColumnIndexOutOfBounds {
                column_index,
                num_columns,
            } => write!(
                f,
                "row references column {column_index}, only {num_columns} columns exist"
            ),
            Self::SolveRequired { operation } => write!(f, "{operation} needs a finished solve"),
            Self::SolveAborted { reason } => write!(f, "HiGHS aborted the solve: {reason}"),
        }
    }
}

impl std::error::Error for HighsModelError {}

/// Typed value for a named HiGHS option.
#[derive(Debug, Clone, PartialEq)]
pub enum HighsOption {
    Bool(bool),
    Int(i32),
    Float(f64),
    Str(String),
}

pub struct HighsModel {
    problem: RowProblem,
    columns: Vec<Col>,
    sense: ObjectiveSense,
    options: Vec<(String, HighsOption)>,
    verbose: bool,
    col_values: Option<Vec<f64>>,
}

impl HighsModel {
    pub fn new() -> Self {
        trace!(
            component = "solver",
            operation = "init_highs",
            status = "success",
            "Staging empty HiGHS problem"
        );
        Self {
            problem: RowProblem::default(),
            columns: Vec::new(),
            sense: ObjectiveSense::Minimize,
            options: Vec::new(),
            verbose: false,
            col_values: None,
        }
    }

    /// Append a column with bounds `[lower, upper]` and objective weight
    /// `cost`; returns its position.
    pub fn add_column(&mut self, kind: ColumnKind, lower: f64, upper: f64, cost: f64) -> usize {
        self.col_values = None;
        let col = match kind {
            ColumnKind::Continuous => self.problem.add_column(cost, lower..=upper),
            ColumnKind::Integer => self.problem.add_integer_column(cost, lower..=upper),
        };
        self.columns.push(col);
        self.columns.len() - 1
    }

    /// Append the row `lower <= sum(coefficients[i] * columns[i]) <= upper`.
    ///
    /// # Errors
    ///
    /// Slices of different length, or a column position that was never added.
    pub fn add_row(
        &mut self,
        lower: f64,
        upper: f64,
        columns: &[usize],
        coefficients: &[f64],
    ) -> Result<usize, HighsModelError> {
        if columns.len() != coefficients.len() {
            warn!(
                component = "solver",
                operation = "add_row",
                status = "error",
                columns = columns.len(),
                coefficients = coefficients.len(),
                "Row slices differ in length"
            );
            return Err(HighsModelError::ColumnCoefficientLengthMismatch {
                columns: columns.len(),
                coefficients: coefficients.len(),
            });
        }
        let factors = columns
            .iter()
            .zip(coefficients)
            .map(|(&position, &coeff)| {
                self.columns
                    .get(position)
                    .map(|&col| (col, coeff))
                    .ok_or(HighsModelError::ColumnIndexOutOfBounds {
                        column_index: position,
                        num_columns: self.columns.len(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.col_values = None;
        self.problem.add_row(lower..=upper, factors);
        Ok(self.problem.num_rows() - 1)
    }

    pub fn set_objective_sense(&mut self, sense: ObjectiveSense) {
        self.sense = sense;
    }

    /// Let HiGHS print its own log during the next solve.
    pub fn set_log_to_console(&mut self, enabled: bool) {
        self.verbose = enabled;
    }

    /// Queue an option for the next solve.
    pub fn set_option(&mut self, name: impl Into<String>, value: HighsOption) {
        self.options.push((name.into(), value));
    }

    /// Run HiGHS on everything staged so far.
    ///
    /// The staged problem is handed over to HiGHS; columns and rows must be
    /// added again before another solve.
    ///
    /// # Errors
    ///
    /// [`HighsModelError::SolveAborted`] when HiGHS rejects the problem
    /// instead of reporting a model status.
    pub fn solve(&mut self) -> Result<HighsStatus, HighsModelError> {
        debug!(
            component = "solver",
            operation = "solve",
            status = "start",
            num_cols = self.problem.num_cols(),
            num_rows = self.problem.num_rows(),
            sense = ?self.sense,
            "Handing problem to HiGHS"
        );

        let sense = match self.sense {
            ObjectiveSense::Minimize => HighsSense::Minimise,
            ObjectiveSense::Maximize => HighsSense::Maximise,
        };
        self.columns.clear();
        let mut model = std::mem::take(&mut self.problem).optimise(sense);
        if self.verbose {
            model.set_option("output_flag", true);
            model.set_option("log_to_console", true);
        } else {
            model.make_quiet();
        }
        for (name, value) in self.options.drain(..) {
            match value {
                HighsOption::Bool(v) => model.set_option(name.as_str(), v),
                HighsOption::Int(v) => model.set_option(name.as_str(), v),
                HighsOption::Float(v) => model.set_option(name.as_str(), v),
                HighsOption::Str(v) => model.set_option(name.as_str(), v.as_str()),
            }
        }

        let solved = model.try_solve().map_err(|status| {
            let reason = format!("HiGHS returned {status:?}");
            warn!(
                component = "solver",
                operation = "solve",
                status = "error",
                reason = %reason,
                "HiGHS rejected the problem"
            );
            HighsModelError::SolveAborted { reason }
        })?;

        let status = read_status(&solved);
        self.col_values = Some(solved.get_solution().columns().to_vec());
        trace!(
            component = "solver",
            operation = "solve",
            status = "success",
            highs_status = ?status,
            "HiGHS returned"
        );
        Ok(status)
    }

    /// Columns staged since the last solve.
    pub fn columns(&self) -> usize {
        self.columns.len()
    }

    /// Primal values from the last solve, by column position.
    ///
    /// # Errors
    ///
    /// [`HighsModelError::SolveRequired`] before the first solve.
    pub fn col_values(&self) -> Result<&[f64], HighsModelError> {
        self.col_values
            .as_deref()
            .ok_or(HighsModelError::SolveRequired {
                operation: "col_values",
            })
    }
}

impl Default for HighsModel {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for HighsModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HighsModel")
            .field("cols", &self.problem.num_cols())
            .field("rows", &self.problem.num_rows())
            .field("sense", &self.sense)
            .field("solved", &self.col_values.is_some())
            .finish_non_exhaustive()
    }
}

fn read_status(solved: &SolvedModel) -> HighsStatus {
    match solved.status() {
        HighsModelStatus::Optimal => HighsStatus::Optimal,
        HighsModelStatus::Infeasible => HighsStatus::Infeasible,
        HighsModelStatus::Unbounded => HighsStatus::Unbounded,
        HighsModelStatus::UnboundedOrInfeasible => HighsStatus::UnboundedOrInfeasible,
        HighsModelStatus::ReachedTimeLimit => HighsStatus::ReachedTimeLimit,
        HighsModelStatus::ReachedIterationLimit => HighsStatus::ReachedIterationLimit,
        _ => HighsStatus::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_model_has_nothing_to_read() {
        let model = HighsModel::new();
        assert_eq!(model.columns(), 0);
        assert_eq!(model.sense, ObjectiveSense::Minimize);
        assert!(matches!(
            model.col_values(),
            Err(HighsModelError::SolveRequired { .. })
        ));
    }

    #[test]
    fn rows_must_reference_known_columns() {
        let mut model = HighsModel::new();
        let col = model.add_column(ColumnKind::Integer, 0.0, 1.0, 1.0);
        assert_eq!(
            model.add_row(0.0, 1.0, &[col], &[1.0, 2.0]),
            Err(HighsModelError::ColumnCoefficientLengthMismatch {
                columns: 1,
                coefficients: 2,
            })
        );
        assert_eq!(
            model.add_row(0.0, 1.0, &[3], &[1.0]),
            Err(HighsModelError::ColumnIndexOutOfBounds {
                column_index: 3,
                num_columns: 1,
            })
        );
        assert_eq!(model.add_row(0.0, 1.0, &[col], &[1.0]), Ok(0));
    }

    #[test]
    fn solve_keeps_column_values() {
        let mut model = HighsModel::new();
        model.set_objective_sense(ObjectiveSense::Maximize);
        let a = model.add_column(ColumnKind::Integer, 0.0, 1.0, 1.0);
        let b = model.add_column(ColumnKind::Integer, 0.0, 1.0, 1.0);
        model
            .add_row(f64::NEG_INFINITY, 1.0, &[a, b], &[1.0, 1.0])
            .unwrap();

        assert_eq!(model.solve().unwrap(), HighsStatus::Optimal);
        let values = model.col_values().unwrap();
        assert_eq!(values.len(), 2);
        assert!((values[0] + values[1] - 1.0).abs() < 1e-6);
        assert_eq!(model.columns(), 0);
    }
}
