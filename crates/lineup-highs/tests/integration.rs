#![allow(clippy::float_cmp)]

use std::time::Duration;

use lineup_core::types::Bounds;
use lineup_core::{Constraint, Model, Objective, Sense, Solver, SolverConfig, SolverStatus, Variable};
use lineup_expr::Expr;
use lineup_highs::HighsSolver;

/// Test: minimize 2x + 3y subject to x + y >= 5, x,y >= 0
#[test]
fn test_simple_lp() {
    let mut model = Model::new();
    let x = model
        .add_variable(Variable::continuous(Bounds::new(0.0, f64::INFINITY)))
        .unwrap();
    let y = model
        .add_variable(Variable::continuous(Bounds::new(0.0, f64::INFINITY)))
        .unwrap();

    let constraint = model
        .add_constraint(Constraint {
            bounds: Bounds::new(5.0, f64::INFINITY),
        })
        .unwrap();
    model.set_coefficient(x, constraint, 1.0).unwrap();
    model.set_coefficient(y, constraint, 1.0).unwrap();

    model
        .set_objective(Objective {
            sense: Some(Sense::Minimize),
            terms: vec![(x, 2.0), (y, 3.0)],
        })
        .unwrap();

    let solution = HighsSolver::new()
        .solve(&model, &SolverConfig::default())
        .expect("Failed to solve");

    assert_eq!(solution.status, SolverStatus::Optimal);
    let objective = solution.objective_value.unwrap();
    assert!(
        (objective - 10.0).abs() < 1e-6,
        "Expected objective value 10.0, got {objective}"
    );
    assert!((solution.value(x).unwrap() - 5.0).abs() < 1e-6);
}

/// Test: maximize integer x subject to x <= 1.5, x integer
#[test]
fn test_integer_variable_solution() {
    let mut model = Model::new();
    let x = model
        .add_variable(Variable::integer(Bounds::new(0.0, 10.0)))
        .unwrap();
    model
        .add_constraint_expr(Expr::var(x).le_scalar(1.5))
        .unwrap();
    model.maximize(Expr::var(x)).unwrap();

    let solution = HighsSolver::new()
        .solve(&model, &SolverConfig::default())
        .unwrap();

    assert_eq!(solution.status, SolverStatus::Optimal);
    assert!((solution.value(x).unwrap() - 1.0).abs() < 1e-6);
}

#[test]
fn test_infeasible_binary_model_reports_status() {
    let mut model = Model::new();
    let a = model.add_binary("a");
    let b = model.add_binary("b");
    model
        .add_named_constraint("both", (Expr::var(a) + Expr::var(b)).eq_scalar(2.0))
        .unwrap();
    model
        .add_named_constraint("at_most_one", (Expr::var(a) + Expr::var(b)).le_scalar(1.0))
        .unwrap();
    model.maximize(Expr::var(a) + Expr::var(b)).unwrap();

    let solution = HighsSolver::new()
        .solve(&model, &SolverConfig::default())
        .unwrap();

    assert_eq!(solution.status, SolverStatus::Infeasible);
    assert!(solution.values.is_empty());
    assert_eq!(solution.objective_value, None);
}

#[test]
fn test_config_options_are_accepted() {
    let mut model = Model::new();
    let vars: Vec<_> = (0..6).map(|i| model.add_binary(format!("x_{i}"))).collect();
    model
        .add_named_constraint(
            "budget",
            Expr::sum_of(vars.iter().copied()).le_scalar(3.0),
        )
        .unwrap();
    model.maximize(Expr::sum_of(vars.iter().copied())).unwrap();

    let config = SolverConfig::new()
        .with_time_limit(Duration::from_secs(30))
        .with_mip_gap(0.0)
        .with_presolve(false)
        .with_threads(1)
        .with_log_to_console(false);
    let solution = HighsSolver::new().solve(&model, &config).unwrap();

    assert!(solution.has_solution());
    assert!((solution.objective_value.unwrap() - 3.0).abs() < 1e-6);
    assert!(model.is_satisfied_by(&solution.values, 1e-6));
}

#[test]
fn test_solver_reuse_across_models() {
    let mut solver = HighsSolver::new();
    for capacity in [1.0, 2.0] {
        let mut model = Model::new();
        let a = model.add_binary("a");
        let b = model.add_binary("b");
        model
            .add_named_constraint("cap", (Expr::var(a) + Expr::var(b)).le_scalar(capacity))
            .unwrap();
        model.maximize(Expr::var(a) + Expr::var(b)).unwrap();

        let solution = solver.solve(&model, &SolverConfig::default()).unwrap();
        assert!((solution.objective_value.unwrap() - capacity).abs() < 1e-6);
    }
}

/// Multi-knapsack large enough that HiGHS cannot finish inside a zero budget.
fn crowded_knapsacks() -> Model {
    let mut model = Model::new();
    let items = 60u32;
    let sacks = 4u32;
    let mut placed = Vec::new();
    let mut load = vec![Expr::new_empty(); sacks as usize];
    for i in 0..items {
        let weight = f64::from(7 + (i * 13) % 23);
        let mut once = Expr::new_empty();
        for s in 0..sacks {
            let x = model.add_binary(format!("x_{i}_{s}"));
            once = once + Expr::var(x);
            load[s as usize] = load[s as usize].clone() + Expr::term(x, weight);
            placed.push(Expr::term(x, f64::from(3 + (i * 7) % 11)));
        }
        model
            .add_named_constraint(format!("once_{i}"), once.le_scalar(1.0))
            .unwrap();
    }
    for (s, expr) in load.into_iter().enumerate() {
        model
            .add_named_constraint(format!("weight_{s}"), expr.le_scalar(97.0))
            .unwrap();
    }
    model.maximize(placed.into_iter().sum()).unwrap();
    model
}

#[test]
fn test_zero_time_limit_stops_early() {
    let model = crowded_knapsacks();
    let config = SolverConfig::new()
        .with_time_limit(Duration::ZERO)
        .with_presolve(false)
        .with_threads(1);

    let solution = HighsSolver::new().solve(&model, &config).unwrap();

    match solution.status {
        SolverStatus::Feasible => {
            assert_eq!(solution.values.len(), model.num_variables());
            assert!(model.is_satisfied_by(&solution.values, 1e-6));
        }
        SolverStatus::Unknown => assert!(solution.values.is_empty()),
        other => panic!("expected a limit stop, got {other}"),
    }
}

#[test]
fn test_invalid_mip_gap_is_an_error() {
    let model = crowded_knapsacks();
    let config = SolverConfig::new().with_mip_gap(-1.0);
    let err = HighsSolver::new().solve(&model, &config).unwrap_err();
    assert_eq!(err.code(), "SOLVER_INVALID_CONFIG");
}
