//! Affine expressions over model variables.
//!
//! An [`Expr`] keeps its terms in insertion order. Repeated variables are
//! only folded together by [`Expr::normalized_terms`], which is what the
//! model does when it stores a row.

use std::collections::BTreeMap;
use std::ops::{Add, Mul, Neg, Sub};

use crate::expr::constraint::{ComparisonSense, ConstraintExpr};
use crate::ids::VariableId;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Expr {
    terms: Vec<(VariableId, f64)>,
    offset: f64,
}

impl Expr {
    pub fn new(terms: Vec<(VariableId, f64)>, offset: f64) -> Self {
        Self { terms, offset }
    }

    /// The zero expression.
    pub fn new_empty() -> Self {
        Self::default()
    }

    pub fn from_constant(offset: f64) -> Self {
        Self::new(Vec::new(), offset)
    }

    pub fn from_linear(terms: Vec<(VariableId, f64)>) -> Self {
        Self::new(terms, 0.0)
    }

    /// `coeff * var`; a zero coefficient yields the zero expression.
    pub fn term(var: VariableId, coeff: f64) -> Self {
        if coeff == 0.0 {
            Self::default()
        } else {
            Self::from_linear(vec![(var, coeff)])
        }
    }

    pub fn var(var: VariableId) -> Self {
        Self::term(var, 1.0)
    }

    pub fn constant(&self) -> f64 {
        self.offset
    }

    pub fn linear_terms(&self) -> &[(VariableId, f64)] {
        &self.terms
    }

    pub fn is_constant(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn into_linear_terms(self) -> Vec<(VariableId, f64)> {
        self.terms
    }

    pub fn into_parts(self) -> (Vec<(VariableId, f64)>, f64) {
        (self.terms, self.offset)
    }

    /// Multiply every coefficient and the offset by `factor`.
    pub fn scale(&self, factor: f64) -> Self {
        let terms = self
            .terms
            .iter()
            .filter_map(|&(var, coeff)| {
                let scaled = coeff * factor;
                (scaled != 0.0).then_some((var, scaled))
            })
            .collect();
        Self::new(terms, self.offset * factor)
    }

    pub fn add(&self, other: &Expr) -> Self {
        let terms = self.terms.iter().chain(&other.terms).copied().collect();
        Self::new(terms, self.offset + other.offset)
    }

    pub fn without_constant(&self) -> Self {
        Self::from_linear(self.terms.clone())
    }

    /// Terms with repeated variables summed, sorted by variable, zeros dropped.
    pub fn normalized_terms(&self) -> Vec<(VariableId, f64)> {
        let mut folded = BTreeMap::<VariableId, f64>::new();
        for &(var, coeff) in &self.terms {
            *folded.entry(var).or_default() += coeff;
        }
        folded.into_iter().filter(|&(_, coeff)| coeff != 0.0).collect()
    }

    /// Value under a dense valuation indexed by variable id, or `None` when
    /// the valuation is too short.
    pub fn evaluate(&self, values: &[f64]) -> Option<f64> {
        let mut total = self.offset;
        for &(var, coeff) in &self.terms {
            total += coeff * values.get(var.index())?;
        }
        Some(total)
    }

    /// `self <sense> rhs`, with the offset folded into the right-hand side.
    pub fn compare_scalar(&self, rhs: f64, sense: ComparisonSense) -> ConstraintExpr {
        ConstraintExpr::new(self.without_constant(), sense, rhs - self.offset)
    }

    /// `self <sense> other`, rewritten as `self - other <sense> 0`.
    pub fn compare_expr(&self, other: &Expr, sense: ComparisonSense) -> ConstraintExpr {
        self.add(&other.scale(-1.0)).compare_scalar(0.0, sense)
    }

    pub fn le_scalar(&self, rhs: f64) -> ConstraintExpr {
        self.compare_scalar(rhs, ComparisonSense::LessEqual)
    }

    pub fn ge_scalar(&self, rhs: f64) -> ConstraintExpr {
        self.compare_scalar(rhs, ComparisonSense::GreaterEqual)
    }

    pub fn eq_scalar(&self, rhs: f64) -> ConstraintExpr {
        self.compare_scalar(rhs, ComparisonSense::Equal)
    }

    pub fn le_expr(&self, rhs: &Expr) -> ConstraintExpr {
        self.compare_expr(rhs, ComparisonSense::LessEqual)
    }

    pub fn ge_expr(&self, rhs: &Expr) -> ConstraintExpr {
        self.compare_expr(rhs, ComparisonSense::GreaterEqual)
    }

    pub fn eq_expr(&self, rhs: &Expr) -> ConstraintExpr {
        self.compare_expr(rhs, ComparisonSense::Equal)
    }
}

impl Add for Expr {
    type Output = Expr;

    fn add(self, rhs: Expr) -> Expr {
        Expr::add(&self, &rhs)
    }
}

impl Sub for Expr {
    type Output = Expr;

    fn sub(self, rhs: Expr) -> Expr {
        Expr::add(&self, &-rhs)
    }
}

impl Mul<f64> for Expr {
    type Output = Expr;

    fn mul(self, factor: f64) -> Expr {
        self.scale(factor)
    }
}

impl Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        self.scale(-1.0)
    }
}

impl From<VariableId> for Expr {
    fn from(var: VariableId) -> Self {
        Expr::var(var)
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use crate::VariableId;
    use crate::expr::{ComparisonSense, ConstraintExpr, Expr};

    const X: VariableId = VariableId::new(0);
    const Y: VariableId = VariableId::new(1);

    #[test]
    fn constant_expression_has_no_terms() {
        let e = Expr::from_constant(5.0);
        assert_eq!(e.constant(), 5.0);
        assert!(e.is_constant());
        assert!(Expr::term(X, 0.0).is_constant());
    }

    #[test]
    fn scaling_touches_offset_and_coefficients() {
        let scaled = Expr::new(vec![(X, 2.0)], 3.0).scale(2.0);
        assert_eq!(scaled.constant(), 6.0);
        assert_eq!(scaled.linear_terms(), &[(X, 4.0)]);
        assert!(Expr::var(X).scale(0.0).is_constant());
    }

    #[test]
    fn offset_moves_to_the_right_hand_side() {
        let c = Expr::new(vec![(X, 1.0)], 3.0).le_scalar(10.0);
        assert_eq!(c.sense(), ComparisonSense::LessEqual);
        assert_eq!(c.rhs(), 7.0);
        assert_eq!(c.expr().constant(), 0.0);
    }

    #[test]
    fn expression_comparison_subtracts_the_right_side() {
        let c = Expr::var(Y).ge_expr(&Expr::var(X));
        assert_eq!(c.sense(), ComparisonSense::GreaterEqual);
        assert_eq!(c.rhs(), 0.0);
        assert_eq!(c.expr().normalized_terms(), vec![(X, -1.0), (Y, 1.0)]);
    }

    #[test]
    fn every_sense_has_scalar_and_expression_forms() {
        let lower = Expr::new(vec![(X, 1.0)], 1.0).ge_scalar(3.0);
        assert_eq!(lower.sense(), ComparisonSense::GreaterEqual);
        assert_eq!(lower.rhs(), 2.0);

        let tie = Expr::term(X, 2.0).eq_expr(&(Expr::var(Y) + Expr::from_constant(4.0)));
        assert_eq!(tie.sense(), ComparisonSense::Equal);
        assert_eq!(tie.rhs(), 4.0);
        assert_eq!(tie.expr().normalized_terms(), vec![(X, 2.0), (Y, -1.0)]);
    }

    #[test]
    fn normalization_cancels_repeated_variables() {
        let expr = Expr::term(X, 2.0)
            .add(&Expr::term(X, -2.0))
            .add(&Expr::term(Y, 4.0));
        assert_eq!(expr.linear_terms().len(), 3);
        assert_eq!(expr.normalized_terms(), vec![(Y, 4.0)]);
    }

    #[test]
    fn evaluation_needs_every_referenced_value() {
        let expr = Expr::new(vec![(X, 2.0), (Y, -1.0)], 0.5);
        assert_eq!(expr.evaluate(&[1.0, 3.0]), Some(-0.5));
        assert_eq!(expr.evaluate(&[1.0]), None);
    }

    #[test]
    fn operators_build_the_same_expressions() {
        let expr = (Expr::var(X) + Expr::var(Y) * 2.0) - Expr::from_constant(1.0);
        assert_eq!(expr.evaluate(&[1.0, 1.0]), Some(2.0));
        assert_eq!((-Expr::from(X)).linear_terms(), &[(X, -1.0)]);
    }

    #[test]
    fn constraint_parts_round_out() {
        let (inner, sense, rhs) =
            ConstraintExpr::new(Expr::var(X), ComparisonSense::Equal, 1.0).into_parts();
        assert_eq!(sense.symbol(), "=");
        assert_eq!(rhs, 1.0);
        assert_eq!(inner.linear_terms().len(), 1);
    }
}
