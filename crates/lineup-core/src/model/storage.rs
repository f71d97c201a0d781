//! Read access to variables, rows and the sparse matrix.

use crate::types::{Constraint, Variable};
use lineup_expr::ids::{ConstraintId, VariableId};

use super::Model;
use super::error::ModelError;

impl Model {
    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Stored non-zero matrix entries.
    pub fn num_coefficients(&self) -> usize {
        self.columns.iter().map(Vec::len).sum()
    }

    pub fn get_variable(&self, id: VariableId) -> Result<&Variable, ModelError> {
        self.variables
            .get(id.index())
            .ok_or(ModelError::InvalidVariableId(id))
    }

    pub fn get_constraint(&self, id: ConstraintId) -> Result<&Constraint, ModelError> {
        self.constraints
            .get(id.index())
            .ok_or(ModelError::InvalidConstraintId(id))
    }

    /// Variables in id order.
    pub fn variables(&self) -> impl Iterator<Item = (VariableId, &Variable)> {
        self.variables
            .iter()
            .enumerate()
            .map(|(index, var)| (VariableId::new(index as u32), var))
    }

    /// Rows in id order.
    pub fn constraints(&self) -> impl Iterator<Item = (ConstraintId, &Constraint)> {
        self.constraints
            .iter()
            .enumerate()
            .map(|(index, con)| (ConstraintId::new(index as u32), con))
    }

    /// The matrix by column; entries keep insertion order.
    pub fn columns(&self) -> impl Iterator<Item = (VariableId, &[(ConstraintId, f64)])> {
        self.columns
            .iter()
            .enumerate()
            .map(|(index, coeffs)| (VariableId::new(index as u32), coeffs.as_slice()))
    }

    /// The matrix transposed into one entry list per row, each ordered by
    /// variable id.
    pub fn rows(&self) -> Vec<Vec<(VariableId, f64)>> {
        let mut rows = vec![Vec::new(); self.num_constraints()];
        for (var, entries) in self.columns() {
            for &(row, coeff) in entries {
                if let Some(target) = rows.get_mut(row.index()) {
                    target.push((var, coeff));
                }
            }
        }
        rows
    }

    pub fn get_column(&self, var_id: VariableId) -> Option<&[(ConstraintId, f64)]> {
        self.columns.get(var_id.index()).map(Vec::as_slice)
    }
}
