//! CPLEX LP text output.
//!
//! The dump is a debugging artifact: it mirrors the model row by row so it
//! can be fed to any LP-format reader for inspection.

use std::fmt::Write as _;
use std::io;

use lineup_expr::ids::VariableId;

use crate::model::Model;
use crate::types::{Bounds, Sense};

const LINE_TERMS: usize = 8;

impl Model {
    /// Render the model in CPLEX LP format.
    pub fn to_lp_string(&self) -> String {
        let mut out = String::new();
        let rows = self.rows();

        let sense = match self.objective.sense {
            Some(Sense::Minimize) | None => "Minimize",
            Some(Sense::Maximize) => "Maximize",
        };
        let _ = writeln!(out, "{sense}");
        let objective_name = self.get_objective_name().unwrap_or("obj");
        let _ = writeln!(
            out,
            " {objective_name}: {}",
            self.render_terms(&self.objective.terms)
        );

        let _ = writeln!(out, "Subject To");
        for ((constraint_id, constraint), row) in self.constraints().zip(&rows) {
            let label = self.constraint_label(constraint_id);
            if row.is_empty() {
                // LP format has no syntax for a row without columns.
                let verdict = if constraint.bounds.contains(0.0, 0.0) {
                    "always satisfied"
                } else {
                    tracing::warn!(
                        component = "model",
                        operation = "format_lp",
                        status = "warn",
                        constraint = %label,
                        lower = constraint.bounds.lower,
                        upper = constraint.bounds.upper,
                        "Empty row can never hold; model is infeasible"
                    );
                    "INFEASIBLE"
                };
                let _ = writeln!(
                    out,
                    "\\ {label}: empty row {} {verdict}",
                    render_bounds(constraint.bounds)
                );
                continue;
            }
            let lhs = self.render_terms(row);
            let Bounds { lower, upper } = constraint.bounds;
            match (lower.is_finite(), upper.is_finite()) {
                (true, true) if lower == upper => {
                    let _ = writeln!(out, " {label}: {lhs} = {}", number(upper));
                }
                (true, true) => {
                    let _ = writeln!(out, " {label}_lo: {lhs} >= {}", number(lower));
                    let _ = writeln!(out, " {label}_hi: {lhs} <= {}", number(upper));
                }
                (true, false) => {
                    let _ = writeln!(out, " {label}: {lhs} >= {}", number(lower));
                }
                (false, true) => {
                    let _ = writeln!(out, " {label}: {lhs} <= {}", number(upper));
                }
                (false, false) => {
                    let _ = writeln!(out, "\\ {label}: free row {lhs}");
                }
            }
        }

        let mut binaries = Vec::new();
        let mut generals = Vec::new();
        let mut bounds = Vec::new();
        for (var_id, var) in self.variables() {
            let label = self.variable_label(var_id);
            if var.is_binary() {
                binaries.push(label);
                continue;
            }
            if var.is_integer {
                generals.push(label.clone());
            }
            let Bounds { lower, upper } = var.bounds;
            match (lower.is_finite(), upper.is_finite()) {
                (false, false) => bounds.push(format!(" {label} free")),
                (true, true) => bounds.push(format!(
                    " {} <= {label} <= {}",
                    number(lower),
                    number(upper)
                )),
                (true, false) if lower != 0.0 => {
                    bounds.push(format!(" {label} >= {}", number(lower)));
                }
                (true, false) => {}
                (false, true) => bounds.push(format!(" -inf <= {label} <= {}", number(upper))),
            }
        }

        if !bounds.is_empty() {
            let _ = writeln!(out, "Bounds");
            for line in bounds {
                let _ = writeln!(out, "{line}");
            }
        }
        write_name_section(&mut out, "General", &generals);
        write_name_section(&mut out, "Binaries", &binaries);
        let _ = writeln!(out, "End");

        tracing::debug!(
            component = "model",
            operation = "format_lp",
            status = "success",
            variables = self.num_variables(),
            constraints = self.num_constraints(),
            bytes = out.len(),
            "Rendered LP text"
        );

        out
    }

    /// Write the model in CPLEX LP format.
    pub fn write_lp<W: io::Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(self.to_lp_string().as_bytes())
    }

    fn render_terms(&self, terms: &[(VariableId, f64)]) -> String {
        if terms.is_empty() {
            return "0".to_string();
        }
        let mut rendered = String::new();
        for (position, (var_id, coeff)) in terms.iter().enumerate() {
            if position > 0 && position % LINE_TERMS == 0 {
                rendered.push_str("\n  ");
            }
            let label = self.variable_label(*var_id);
            let magnitude = coeff.abs();
            let sign = match (position, *coeff < 0.0) {
                (0, false) => "",
                (0, true) => "- ",
                (_, false) => " + ",
                (_, true) => " - ",
            };
            rendered.push_str(sign);
            if magnitude != 1.0 {
                let _ = write!(rendered, "{} ", number(magnitude));
            }
            rendered.push_str(&label);
        }
        rendered
    }
}

fn write_name_section(out: &mut String, heading: &str, names: &[String]) {
    if names.is_empty() {
        return;
    }
    let _ = writeln!(out, "{heading}");
    for chunk in names.chunks(LINE_TERMS) {
        let _ = writeln!(out, " {}", chunk.join(" "));
    }
}

fn render_bounds(bounds: Bounds) -> String {
    format!("[{}, {}]", number(bounds.lower), number(bounds.upper))
}

fn number(value: f64) -> String {
    if value == f64::INFINITY {
        "inf".to_string()
    } else if value == f64::NEG_INFINITY {
        "-inf".to_string()
    } else if value == 0.0 {
        // Avoid rendering negative zero as "-0".
        "0".to_string()
    } else {
        format!("{value}")
    }
}
