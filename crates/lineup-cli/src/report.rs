//! Human-readable and JSON rendering of an assignment run.

use std::fmt::Write as _;

use lineup_assign::{AssignmentOutcome, LineAssignment, ProblemInput};
use serde::Serialize;

/// Problem size figures printed before the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProblemSummary {
    pub containers: usize,
    pub lines: usize,
    pub items: usize,
    pub total_capacity: i64,
}

impl ProblemSummary {
    pub fn of(input: &ProblemInput) -> Self {
        Self {
            containers: input.containers.len(),
            lines: input.lines.len(),
            items: input.num_items(),
            total_capacity: input.total_capacity(),
        }
    }
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    summary: ProblemSummary,
    solver: &'a str,
    #[serde(flatten)]
    outcome: &'a AssignmentOutcome,
}

/// One line per assembly line, as printed by the table report.
pub fn render_line(line: &LineAssignment) -> String {
    let items: Vec<&str> = line.items.iter().map(|item| item.as_str()).collect();
    format!(
        "Line - {}[{}/{}] Containers: [{}] Items: [{}]",
        line.line_id,
        line.remaining_capacity,
        line.capacity,
        line.containers.join(", "),
        items.join(", ")
    )
}

pub fn render_table(summary: &ProblemSummary, solver: &str, outcome: &AssignmentOutcome) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Containers: {}", summary.containers);
    let _ = writeln!(out, "Lines: {}", summary.lines);
    let _ = writeln!(out, "Items: {}", summary.items);
    let _ = writeln!(out, "Total size: {}", summary.total_capacity);
    let _ = writeln!(out);
    let _ = writeln!(out, "Solver: {solver}");
    let _ = writeln!(out, "Status: {}", outcome.status());

    match outcome.assignment() {
        Some(assignment) => {
            let _ = writeln!(
                out,
                "Placed: {}/{}",
                assignment.placed_count(),
                summary.containers
            );
            for line in &assignment.lines {
                let _ = writeln!(out, "{}", render_line(line));
            }
            if !assignment.unplaced.is_empty() {
                let _ = writeln!(out, "Unplaced: [{}]", assignment.unplaced.join(", "));
            }
        }
        None => {
            let _ = writeln!(out, "The problem doesn't have a feasible solution");
        }
    }
    out
}

pub fn render_json(
    summary: &ProblemSummary,
    solver: &str,
    outcome: &AssignmentOutcome,
) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonReport {
        summary: *summary,
        solver,
        outcome,
    })
}
