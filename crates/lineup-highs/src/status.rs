//! Status conversions between HiGHS and the solver-agnostic layer.

use crate::problem::HighsStatus;
use lineup_core::SolverStatus;

/// Statuses after which HiGHS may hold an incumbent worth checking.
pub(crate) fn highs_may_have_incumbent(status: HighsStatus) -> bool {
    matches!(
        status,
        HighsStatus::ReachedTimeLimit | HighsStatus::ReachedIterationLimit
    )
}

/// Map a terminal HiGHS status that needs no valuation check.
///
/// `bounded` tells whether every column has finite bounds, in which case an
/// "unbounded or infeasible" verdict can only mean infeasible.
pub(crate) fn highs_to_core_status(status: HighsStatus, bounded: bool) -> SolverStatus {
    match status {
        HighsStatus::Optimal => SolverStatus::Optimal,
        HighsStatus::Infeasible => SolverStatus::Infeasible,
        HighsStatus::UnboundedOrInfeasible if bounded => SolverStatus::Infeasible,
        HighsStatus::UnboundedOrInfeasible
        | HighsStatus::Unbounded
        | HighsStatus::ReachedTimeLimit
        | HighsStatus::ReachedIterationLimit
        | HighsStatus::Unknown => SolverStatus::Unknown,
    }
}

pub(crate) fn highs_status_string(status: HighsStatus) -> &'static str {
    match status {
        HighsStatus::Optimal => "optimal",
        HighsStatus::Infeasible => "infeasible",
        HighsStatus::Unbounded => "unbounded",
        HighsStatus::UnboundedOrInfeasible => "unbounded_or_infeasible",
        HighsStatus::ReachedTimeLimit => "time_limit",
        HighsStatus::ReachedIterationLimit => "iteration_limit",
        HighsStatus::Unknown => "unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_status_mapping() {
        assert_eq!(
            highs_to_core_status(HighsStatus::Optimal, true),
            SolverStatus::Optimal
        );
        assert_eq!(
            highs_to_core_status(HighsStatus::Infeasible, false),
            SolverStatus::Infeasible
        );
        assert_eq!(
            highs_to_core_status(HighsStatus::Unbounded, true),
            SolverStatus::Unknown
        );
    }

    #[test]
    fn test_unbounded_or_infeasible_depends_on_bounds() {
        assert_eq!(
            highs_to_core_status(HighsStatus::UnboundedOrInfeasible, true),
            SolverStatus::Infeasible
        );
        assert_eq!(
            highs_to_core_status(HighsStatus::UnboundedOrInfeasible, false),
            SolverStatus::Unknown
        );
    }

    #[test]
    fn test_status_helpers() {
        assert!(highs_may_have_incumbent(HighsStatus::ReachedTimeLimit));
        assert!(highs_may_have_incumbent(HighsStatus::ReachedIterationLimit));
        assert!(!highs_may_have_incumbent(HighsStatus::Optimal));
        assert!(!highs_may_have_incumbent(HighsStatus::Infeasible));
        assert_eq!(
            highs_status_string(HighsStatus::UnboundedOrInfeasible),
            "unbounded_or_infeasible"
        );
        assert_eq!(highs_status_string(HighsStatus::Unknown), "unknown");
    }
}
