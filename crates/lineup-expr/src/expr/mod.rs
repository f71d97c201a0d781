//! Expression types for optimization modeling.
//!
//! - `core`       — Expr: linear terms + constant
//! - `constraint` — ConstraintExpr: expression with comparison sense and RHS
//! - `builders`   — helpers for assembling sums

pub mod builders;
pub mod constraint;
pub mod core;

pub use builders::linear_sum;
pub use constraint::{ComparisonSense, ConstraintExpr};
pub use core::Expr;
