//! The [`Model`]: columns, rows, one objective, and names for all three.
//!
//! The `impl Model` blocks are split by concern: `builder` grows the model,
//! `storage` reads it back, `metadata` handles names, `check` scores a
//! valuation against it and `lp_format` prints it.

mod builder;
mod check;
mod error;
mod lp_format;
mod metadata;
mod storage;

use crate::types::{Constraint, Objective, Variable};
use std::collections::BTreeMap;

use lineup_expr::expr::Expr;
use lineup_expr::ids::{ConstraintId, VariableId};

pub use check::Violation;
pub use error::ModelError;

/// A mixed-integer linear program under construction.
///
/// Ids are dense and handed out in insertion order, so a valuation is a
/// plain vector indexed by [`VariableId::index`]. Coefficients live with
/// their column.
#[derive(Debug, Clone, Default)]
pub struct Model {
    pub(crate) variables: Vec<Variable>,
    pub(crate) constraints: Vec<Constraint>,
    pub(crate) objective: Objective,
    pub(crate) objective_name: Option<String>,
    // columns[v] lists (row, coefficient) for variable v
    pub(crate) columns: Vec<Vec<(ConstraintId, f64)>>,
    pub(crate) variable_names: BTreeMap<VariableId, String>,
    pub(crate) constraint_names: BTreeMap<ConstraintId, String>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn objective(&self) -> &Objective {
        &self.objective
    }

    pub(crate) fn ensure_variable_exists(&self, id: VariableId) -> Result<(), ModelError> {
        if id.index() < self.variables.len() {
            Ok(())
        } else {
            Err(ModelError::InvalidVariableId(id))
        }
    }

    pub(crate) fn ensure_constraint_exists(&self, id: ConstraintId) -> Result<(), ModelError> {
        if id.index() < self.constraints.len() {
            Ok(())
        } else {
            Err(ModelError::InvalidConstraintId(id))
        }
    }

    /// Fold repeated variables and drop zeros, ordered by variable id.
    pub(crate) fn normalize_terms(&self, terms: Vec<(VariableId, f64)>) -> Vec<(VariableId, f64)> {
        let terms_in = terms.len();
        let folded = Expr::from_linear(terms).normalized_terms();
        tracing::trace!(
            component = "model",
            operation = "lower_expr",
            status = "success",
            terms_in,
            terms_out = folded.len(),
            "Folded linear terms"
        );
        folded
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::types::{Bounds, Sense};
    use lineup_expr::expr::{ComparisonSense, ConstraintExpr, Expr};

    fn bounded_constraint(lower: f64, upper: f64) -> Constraint {
        Constraint {
            bounds: Bounds::new(lower, upper),
        }
    }

    #[test]
    fn new_model_is_empty() {
        let model = Model::new();
        assert_eq!(model.num_variables(), 0);
        assert_eq!(model.num_constraints(), 0);
        assert_eq!(model.num_coefficients(), 0);
    }

    #[test]
    fn add_binary_names_variable() {
        let mut model = Model::new();
        let id = model.add_binary("x_0_0");
        assert_eq!(model.num_variables(), 1);
        assert!(model.get_variable(id).unwrap().is_binary());
        assert_eq!(model.get_variable_name(id), Some("x_0_0"));
        assert_eq!(model.get_variable_by_name("x_0_0"), Some(id));
    }

    #[test]
    fn ids_are_dense() {
        let mut model = Model::new();
        let a = model.add_binary("a");
        let b = model.add_binary("b");
        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
    }

    #[test]
    fn add_constraint_stores_bounds() {
        let mut model = Model::new();
        let constraint = bounded_constraint(0.0, 100.0);

        let id = model.add_constraint(constraint).unwrap();
        assert_eq!(model.num_constraints(), 1);
        assert_eq!(model.get_constraint(id).unwrap(), &constraint);
    }

    #[test]
    fn set_objective_rejects_missing_sense() {
        let mut model = Model::new();
        let result = model.set_objective(Objective::new());
        assert_eq!(result, Err(ModelError::NoObjective));
    }

    #[test]
    fn multiple_objectives_rejected() {
        let mut model = Model::new();
        let var_id = model.add_binary("x");

        model.maximize(Expr::var(var_id)).unwrap();
        assert_eq!(model.objective().sense, Some(Sense::Maximize));

        let result = model.minimize(Expr::var(var_id));
        assert_eq!(result, Err(ModelError::MultipleObjectives));
    }

    #[test]
    fn objective_rejects_undeclared_variable() {
        let mut model = Model::new();
        let result = model.maximize(Expr::var(VariableId::new(3)));
        assert_eq!(
            result,
            Err(ModelError::InvalidVariableId(VariableId::new(3)))
        );
    }

    #[test]
    fn objective_terms_are_merged() {
        let mut model = Model::new();
        let x = model.add_binary("x");
        model
            .maximize(Expr::var(x) + Expr::term(x, 2.0))
            .unwrap();
        assert_eq!(model.objective().terms, vec![(x, 3.0)]);
    }

    #[test]
    fn set_coefficient_with_invalid_variable_fails() {
        let mut model = Model::new();
        let invalid_var_id = VariableId::new(999);
        let constraint_id = model.add_constraint(bounded_constraint(0.0, 100.0)).unwrap();

        let result = model.set_coefficient(invalid_var_id, constraint_id, 2.5);
        assert_eq!(result, Err(ModelError::InvalidVariableId(invalid_var_id)));
    }

    #[test]
    fn set_coefficient_with_invalid_constraint_fails() {
        let mut model = Model::new();
        let var_id = model.add_binary("x");
        let invalid_constraint_id = ConstraintId::new(999);

        let result = model.set_coefficient(var_id, invalid_constraint_id, 2.5);
        assert_eq!(
            result,
            Err(ModelError::InvalidConstraintId(invalid_constraint_id))
        );
    }

    #[test]
    fn set_coefficient_rejects_non_finite() {
        let mut model = Model::new();
        let var_id = model.add_binary("x");
        let con = model.add_constraint(bounded_constraint(0.0, 1.0)).unwrap();
        assert!(matches!(
            model.set_coefficient(var_id, con, f64::NAN),
            Err(ModelError::InvalidCoefficient { .. })
        ));
    }

    #[test]
    fn coefficients_persist_in_columns_and_rows() {
        let mut model = Model::new();
        let v1 = model.add_variable(Variable::continuous(Bounds::new(0.0, 10.0))).unwrap();
        let v2 = model.add_variable(Variable::integer(Bounds::new(-5.0, 5.0))).unwrap();

        let c1 = model.add_constraint(bounded_constraint(0.0, 15.0)).unwrap();
        let c2 = model.add_constraint(bounded_constraint(-10.0, 10.0)).unwrap();

        model.set_coefficient(v1, c1, 1.5).unwrap();
        model.set_coefficient(v1, c2, -2.0).unwrap();
        model.set_coefficient(v2, c2, 3.5).unwrap();
        model.set_coefficient(v2, c2, 4.0).unwrap();

        assert_eq!(model.get_column(v1).unwrap(), &[(c1, 1.5), (c2, -2.0)]);
        assert_eq!(model.get_column(v2).unwrap(), &[(c2, 4.0)]);
        assert_eq!(model.num_coefficients(), 3);
        assert_eq!(
            model.rows(),
            vec![vec![(v1, 1.5)], vec![(v1, -2.0), (v2, 4.0)]]
        );
    }

    #[test]
    fn add_constraint_expr_bounds() {
        let mut model = Model::new();
        let var = model.add_binary("x");

        let ge = model
            .add_constraint_expr(ConstraintExpr::new(
                Expr::var(var),
                ComparisonSense::GreaterEqual,
                2.0,
            ))
            .unwrap();
        let stored = model.get_constraint(ge).unwrap();
        assert_eq!(stored.bounds.lower, 2.0);
        assert!(stored.bounds.upper.is_infinite());

        let eq = model
            .add_named_constraint("assign", Expr::var(var).eq_scalar(1.0))
            .unwrap();
        assert_eq!(model.get_constraint(eq).unwrap().bounds, Bounds::new(1.0, 1.0));
        assert_eq!(model.get_constraint_by_name("assign"), Some(eq));
    }

    #[test]
    fn constraint_expr_with_undeclared_variable_fails() {
        let mut model = Model::new();
        let result = model.add_constraint_expr(Expr::var(VariableId::new(0)).le_scalar(1.0));
        assert_eq!(
            result,
            Err(ModelError::InvalidVariableId(VariableId::new(0)))
        );
        assert_eq!(model.num_constraints(), 0);
    }

    #[test]
    fn variable_bounds_validation() {
        let mut model = Model::new();
        let result = model.add_variable(Variable::continuous(Bounds::new(5.0, 1.0)));
        assert!(matches!(
            result,
            Err(ModelError::InvalidVariableBounds { .. })
        ));
    }

    #[test]
    fn constraint_bounds_validation() {
        let mut model = Model::new();
        let result = model.add_constraint(bounded_constraint(10.0, 0.0));
        assert!(matches!(
            result,
            Err(ModelError::InvalidConstraintBounds { .. })
        ));
    }

    #[test]
    fn labels_fall_back_to_ids() {
        let mut model = Model::new();
        let named = model.add_binary("x");
        let unnamed = model
            .add_variable(Variable::continuous(Bounds::new(0.0, 1.0)))
            .unwrap();
        let con = model.add_constraint(bounded_constraint(0.0, 1.0)).unwrap();
        assert_eq!(model.variable_label(named), "x");
        assert_eq!(model.variable_label(unnamed), "v1");
        assert_eq!(model.constraint_label(con), "c0");
    }
}
