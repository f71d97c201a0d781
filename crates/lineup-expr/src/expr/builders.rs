//! Builder functions for constructing linear expressions.

use crate::expr::core::Expr;
use crate::ids::VariableId;

/// Combines multiple expressions into a single expression by concatenating all their linear terms.
///
/// Duplicate variable terms are NOT merged; use `normalized_terms()` on the result
/// if term consolidation is needed.
pub fn linear_sum(exprs: impl IntoIterator<Item = Expr>) -> Expr {
    let mut terms = Vec::new();
    let mut constant = 0.0;
    for expr in exprs {
        let (linear, offset) = expr.into_parts();
        terms.extend(linear);
        constant += offset;
    }
    Expr::new(terms, constant)
}

impl Expr {
    /// Unit-coefficient sum of the given variables.
    pub fn sum_of(vars: impl IntoIterator<Item = VariableId>) -> Self {
        Expr::from_linear(vars.into_iter().map(|var| (var, 1.0)).collect())
    }
}

impl std::iter::Sum for Expr {
    fn sum<I: Iterator<Item = Expr>>(iter: I) -> Self {
        linear_sum(iter)
    }
}
