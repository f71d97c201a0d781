use lineup_expr::ids::VariableId;

/// Optimization sense
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    Minimize,
    Maximize,
}

impl Sense {
    pub fn as_str(self) -> &'static str {
        match self {
            Sense::Minimize => "minimize",
            Sense::Maximize => "maximize",
        }
    }
}

/// Bounds for a variable or constraint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub lower: f64,
    pub upper: f64,
}

impl Bounds {
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    /// NaN-free and `lower <= upper`.
    pub fn is_valid(&self) -> bool {
        !self.lower.is_nan() && !self.upper.is_nan() && self.lower <= self.upper
    }

    /// Whether `value` lies within the bounds, widened by `tolerance`.
    pub fn contains(&self, value: f64, tolerance: f64) -> bool {
        value >= self.lower - tolerance && value <= self.upper + tolerance
    }
}

/// A decision variable with bounds and integrality constraint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Variable {
    pub bounds: Bounds,
    pub is_integer: bool,
}

impl Variable {
    /// Create a binary variable with bounds [0, 1] and integer constraint.
    pub fn binary() -> Self {
        Self {
            bounds: Bounds::new(0.0, 1.0),
            is_integer: true,
        }
    }

    /// Create a continuous variable with specified bounds.
    pub fn continuous(bounds: Bounds) -> Self {
        Self {
            bounds,
            is_integer: false,
        }
    }

    /// Create an integer variable with specified bounds.
    pub fn integer(bounds: Bounds) -> Self {
        Self {
            bounds,
            is_integer: true,
        }
    }

    pub fn is_binary(&self) -> bool {
        self.is_integer && self.bounds.lower == 0.0 && self.bounds.upper == 1.0
    }
}

/// A constraint with lower and upper bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constraint {
    pub bounds: Bounds,
}

/// Objective function with a sense and linear terms
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Objective {
    pub sense: Option<Sense>,
    pub terms: Vec<(VariableId, f64)>,
}

impl Objective {
    /// Create a new empty objective
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn binary_variable_constructor() {
        let var = Variable::binary();
        assert_eq!(var.bounds.lower, 0.0);
        assert_eq!(var.bounds.upper, 1.0);
        assert!(var.is_integer);
        assert!(var.is_binary());
    }

    #[test]
    fn integer_variable_is_not_binary_when_wider() {
        let var = Variable::integer(Bounds::new(0.0, 100.0));
        assert!(var.is_integer);
        assert!(!var.is_binary());
        assert!(!Variable::continuous(Bounds::new(0.0, 1.0)).is_binary());
    }

    #[test]
    fn bounds_validity_and_containment() {
        assert!(Bounds::new(0.0, f64::INFINITY).is_valid());
        assert!(!Bounds::new(1.0, 0.0).is_valid());
        assert!(!Bounds::new(f64::NAN, 0.0).is_valid());

        let bounds = Bounds::new(f64::NEG_INFINITY, 3.0);
        assert!(bounds.contains(3.0000001, 1e-6));
        assert!(!bounds.contains(3.1, 1e-6));
    }
}
