//! Backend-independent solve settings.

use std::time::Duration;

use crate::solver::SolverError;

/// Knobs a [`Solver`](crate::Solver) honours where it can.
///
/// Every field is optional; `None` leaves the backend default in place.
/// The time limit is a soft budget: a backend that runs out of time reports
/// its best incumbent instead of failing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolverConfig {
    /// Wall-clock budget for a single solve. `None` means no limit.
    pub time_limit: Option<Duration>,
    /// Stop once the relative gap falls below this.
    pub mip_gap: Option<f64>,
    pub presolve: Option<bool>,
    /// Number of threads the backend may use internally.
    pub threads: Option<u32>,
    /// Echo the backend's own log to the console.
    pub log_to_console: Option<bool>,
}

impl SolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    pub fn with_mip_gap(mut self, gap: f64) -> Self {
        self.mip_gap = Some(gap);
        self
    }

    pub fn with_presolve(mut self, enabled: bool) -> Self {
        self.presolve = Some(enabled);
        self
    }

    pub fn with_threads(mut self, count: u32) -> Self {
        self.threads = Some(count);
        self
    }

    pub fn with_log_to_console(mut self, enabled: bool) -> Self {
        self.log_to_console = Some(enabled);
        self
    }

    /// Time limit in seconds, as most backends take it.
    pub fn time_limit_seconds(&self) -> Option<f64> {
        self.time_limit.map(|limit| limit.as_secs_f64())
    }

    /// Reject settings no backend accepts.
    ///
    /// # Errors
    ///
    /// [`SolverError::InvalidConfig`] for a negative or non-finite MIP gap.
    pub fn validate(&self) -> Result<(), SolverError> {
        match self.mip_gap {
            Some(gap) if !gap.is_finite() || gap < 0.0 => Err(SolverError::InvalidConfig(
                format!("mip_gap must be a finite non-negative number, got {gap}"),
            )),
            _ => Ok(()),
        }
    }

    /// True when no setting overrides a backend default.
    pub fn is_empty(&self) -> bool {
        self.time_limit.is_none()
            && self.mip_gap.is_none()
            && self.presolve.is_none()
            && self.threads.is_none()
            && self.log_to_console.is_none()
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn fresh_config_overrides_nothing() {
        assert!(SolverConfig::new().is_empty());
    }

    #[test]
    fn builders_fill_every_field() {
        let config = SolverConfig::new()
            .with_time_limit(Duration::from_secs(300))
            .with_mip_gap(0.01)
            .with_presolve(true)
            .with_threads(4)
            .with_log_to_console(false);

        assert!(!config.is_empty());
        assert_eq!(config.time_limit, Some(Duration::from_secs(300)));
        assert_eq!(config.time_limit_seconds(), Some(300.0));
        assert_eq!(config.mip_gap, Some(0.01));
        assert_eq!(config.presolve, Some(true));
        assert_eq!(config.threads, Some(4));
        assert_eq!(config.log_to_console, Some(false));
    }

    #[test]
    fn mip_gap_must_be_finite_and_non_negative() {
        assert_eq!(SolverConfig::new().validate(), Ok(()));
        assert_eq!(SolverConfig::new().with_mip_gap(0.0).validate(), Ok(()));
        for gap in [-1.0, f64::NAN, f64::INFINITY] {
            let err = SolverConfig::new().with_mip_gap(gap).validate().unwrap_err();
            assert_eq!(err.code(), "SOLVER_INVALID_CONFIG");
        }
    }

    #[test]
    fn fractional_time_limit_in_seconds() {
        let config = SolverConfig::new().with_time_limit(Duration::from_millis(1500));
        assert!(!config.is_empty());
        assert_eq!(config.time_limit_seconds(), Some(1.5));
        assert_eq!(config.mip_gap, None);
    }
}
