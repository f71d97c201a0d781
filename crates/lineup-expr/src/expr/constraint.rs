//! A linear expression bound against a right-hand side.

use crate::expr::core::Expr;

/// Relation between the left-hand expression and the right-hand side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonSense {
    LessEqual,
    GreaterEqual,
    Equal,
}

impl ComparisonSense {
    /// Short tag used in log fields.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LessEqual => "le",
            Self::GreaterEqual => "ge",
            Self::Equal => "eq",
        }
    }

    /// Operator as written in LP files.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::LessEqual => "<=",
            Self::GreaterEqual => ">=",
            Self::Equal => "=",
        }
    }
}

/// `expr <sense> rhs`, where `expr` carries no constant of its own.
#[derive(Debug, Clone)]
pub struct ConstraintExpr {
    expr: Expr,
    sense: ComparisonSense,
    rhs: f64,
}

impl ConstraintExpr {
    pub fn new(expr: Expr, sense: ComparisonSense, rhs: f64) -> Self {
        Self { expr, sense, rhs }
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    pub fn sense(&self) -> ComparisonSense {
        self.sense
    }

    pub fn rhs(&self) -> f64 {
        self.rhs
    }

    pub fn into_parts(self) -> (Expr, ComparisonSense, f64) {
        let Self { expr, sense, rhs } = self;
        (expr, sense, rhs)
    }
}
