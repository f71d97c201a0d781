//! Typed ids and linear expressions for lineup optimization models.

pub mod expr;
pub mod ids;

pub use expr::{ComparisonSense, ConstraintExpr, Expr, linear_sum};
pub use ids::{ConstraintId, VariableId};
