//! Growing a model: columns, rows, coefficients and the objective.

use crate::types::{Bounds, Constraint, Objective, Sense, Variable};
use lineup_expr::expr::{ComparisonSense, ConstraintExpr, Expr};
use lineup_expr::ids::{ConstraintId, VariableId};

use crate::model::Model;
use crate::model::error::ModelError;

impl Model {
    /// Append a column.
    ///
    /// # Errors
    ///
    /// Crossed bounds.
    pub fn add_variable(&mut self, variable: Variable) -> Result<VariableId, ModelError> {
        if !variable.bounds.is_valid() {
            return Err(ModelError::InvalidVariableBounds {
                lower: variable.bounds.lower,
                upper: variable.bounds.upper,
            });
        }

        let id = VariableId::new(self.variables.len() as u32);
        self.variables.push(variable);
        self.columns.push(Vec::new());

        Ok(id)
    }

    /// Append a named 0/1 column.
    pub fn add_binary(&mut self, name: impl Into<String>) -> VariableId {
        let id = VariableId::new(self.variables.len() as u32);
        self.variables.push(Variable::binary());
        self.columns.push(Vec::new());
        self.variable_names.insert(id, name.into());
        id
    }

    /// Append an empty row; fill it with [`Model::set_coefficient`].
    pub fn add_constraint(&mut self, constraint: Constraint) -> Result<ConstraintId, ModelError> {
        if !constraint.bounds.is_valid() {
            return Err(ModelError::InvalidConstraintBounds {
                lower: constraint.bounds.lower,
                upper: constraint.bounds.upper,
            });
        }

        let id = ConstraintId::new(self.constraints.len() as u32);
        self.constraints.push(constraint);

        Ok(id)
    }

    /// Install `objective`, replacing whatever was there.
    pub fn set_objective(&mut self, objective: Objective) -> Result<(), ModelError> {
        let sense = objective.sense.ok_or(ModelError::NoObjective)?;
        self.validate_terms(&objective.terms)?;

        let normalized = self.normalize_terms(objective.terms);
        self.objective = Objective {
            sense: Some(sense),
            terms: normalized,
        };
        self.objective_name = None;
        tracing::debug!(
            component = "model",
            operation = "set_objective",
            status = "success",
            sense = sense.as_str(),
            terms = self.objective.terms.len(),
            "Objective installed"
        );
        Ok(())
    }

    /// # Errors
    ///
    /// [`ModelError::MultipleObjectives`] once an objective is set.
    pub fn minimize(&mut self, expr: Expr) -> Result<(), ModelError> {
        self.set_fresh_objective(Sense::Minimize, expr)
    }

    /// # Errors
    ///
    /// [`ModelError::MultipleObjectives`] once an objective is set.
    pub fn maximize(&mut self, expr: Expr) -> Result<(), ModelError> {
        self.set_fresh_objective(Sense::Maximize, expr)
    }

    fn set_fresh_objective(&mut self, sense: Sense, expr: Expr) -> Result<(), ModelError> {
        if self.objective.sense.is_some() {
            return Err(ModelError::MultipleObjectives);
        }
        // constant offset dropped
        self.set_objective(Objective {
            sense: Some(sense),
            terms: expr.into_linear_terms(),
        })
    }

    /// Row `bounds.lower <= expr <= bounds.upper`.
    ///
    /// Terms are checked before the row exists; on error the model is
    /// untouched.
    pub fn add_expr_constraint(
        &mut self,
        expr: Expr,
        bounds: Bounds,
    ) -> Result<ConstraintId, ModelError> {
        let (terms, constant) = expr.into_parts();
        self.validate_terms(&terms)?;
        let bounds = Bounds::new(bounds.lower - constant, bounds.upper - constant);
        let constraint_id = self.add_constraint(Constraint { bounds })?;
        for (var_id, coeff) in self.normalize_terms(terms) {
            self.columns[var_id.index()].push((constraint_id, coeff));
        }
        Ok(constraint_id)
    }

    /// Row from a comparison such as `x + y <= 10`.
    pub fn add_constraint_expr(
        &mut self,
        constraint: ConstraintExpr,
    ) -> Result<ConstraintId, ModelError> {
        let (expr, sense, rhs) = constraint.into_parts();
        let bounds = match sense {
            ComparisonSense::LessEqual => Bounds::new(f64::NEG_INFINITY, rhs),
            ComparisonSense::GreaterEqual => Bounds::new(rhs, f64::INFINITY),
            ComparisonSense::Equal => Bounds::new(rhs, rhs),
        };
        self.add_expr_constraint(expr, bounds)
    }

    pub fn add_named_constraint(
        &mut self,
        name: impl Into<String>,
        constraint: ConstraintExpr,
    ) -> Result<ConstraintId, ModelError> {
        let id = self.add_constraint_expr(constraint)?;
        self.constraint_names.insert(id, name.into());
        Ok(id)
    }

    /// Write one matrix entry; a second write to the same cell overwrites.
    pub fn set_coefficient(
        &mut self,
        var_id: VariableId,
        constraint_id: ConstraintId,
        coefficient: f64,
    ) -> Result<(), ModelError> {
        if !coefficient.is_finite() {
            return Err(ModelError::InvalidCoefficient { coefficient });
        }
        self.ensure_variable_exists(var_id)?;
        self.ensure_constraint_exists(constraint_id)?;

        let column = &mut self.columns[var_id.index()];
        match column.iter_mut().find(|(id, _)| *id == constraint_id) {
            Some(entry) => entry.1 = coefficient,
            None => column.push((constraint_id, coefficient)),
        }

        Ok(())
    }

    fn validate_terms(&self, terms: &[(VariableId, f64)]) -> Result<(), ModelError> {
        for (var_id, coeff) in terms {
            self.ensure_variable_exists(*var_id)?;
            if !coeff.is_finite() {
                return Err(ModelError::InvalidCoefficient {
                    coefficient: *coeff,
                });
            }
        }
        Ok(())
    }
}
