//! Reading a solver valuation back into per-line assignments.

use lineup_core::{Solution, SolverStatus};
use lineup_expr::VariableId;
use serde::{Serialize, Serializer};

use crate::builder::{AssignmentModel, Placement};
use crate::domain::{AssemblyLine, Container, ContainerIndex, Item, LineIndex};
use crate::error::AssignError;

/// Values above this count as 1 for a binary.
pub const BINARY_THRESHOLD: f64 = 0.5;

/// What ended up on one line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineAssignment {
    pub line_id: String,
    pub capacity: i64,
    pub remaining_capacity: i64,
    /// Container ids in input order.
    pub containers: Vec<String>,
    /// Items counted against the capacity, in universe order.
    pub items: Vec<Item>,
}

impl LineAssignment {
    fn empty(line: &AssemblyLine) -> Self {
        Self {
            line_id: line.id().to_string(),
            capacity: line.capacity(),
            remaining_capacity: line.capacity(),
            containers: Vec::new(),
            items: Vec::new(),
        }
    }
}

/// Decoded placement of every container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assignment {
    /// One record per line, in input order.
    pub lines: Vec<LineAssignment>,
    /// Containers left off every line (only with optional placement).
    pub unplaced: Vec<String>,
}

impl Assignment {
    pub fn line(&self, line_id: &str) -> Option<&LineAssignment> {
        self.lines.iter().find(|line| line.line_id == line_id)
    }

    /// Id of the line hosting a container.
    pub fn line_of(&self, container_id: &str) -> Option<&str> {
        self.lines
            .iter()
            .find(|line| line.containers.iter().any(|c| c == container_id))
            .map(|line| line.line_id.as_str())
    }

    pub fn placed_count(&self) -> usize {
        self.lines.iter().map(|line| line.containers.len()).sum()
    }
}

/// Result of one assignment run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AssignmentOutcome {
    /// The backend produced a valuation and it decoded cleanly.
    Placed {
        #[serde(serialize_with = "serialize_status")]
        status: SolverStatus,
        assignment: Assignment,
    },
    /// Infeasible, or the backend gave up without an incumbent.
    NoSolution {
        #[serde(serialize_with = "serialize_status")]
        status: SolverStatus,
    },
}

impl AssignmentOutcome {
    pub fn status(&self) -> SolverStatus {
        match self {
            AssignmentOutcome::Placed { status, .. } | AssignmentOutcome::NoSolution { status } => {
                *status
            }
        }
    }

    pub fn assignment(&self) -> Option<&Assignment> {
        match self {
            AssignmentOutcome::Placed { assignment, .. } => Some(assignment),
            AssignmentOutcome::NoSolution { .. } => None,
        }
    }

    pub fn is_placed(&self) -> bool {
        matches!(self, AssignmentOutcome::Placed { .. })
    }
}

fn serialize_status<S: Serializer>(status: &SolverStatus, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(status.as_str())
}

/// Decode a solution of `built` into per-line records.
///
/// `containers` and `lines` must be the slices the model was built from.
///
/// # Errors
///
/// Returns [`AssignError::InconsistentSolution`] when the valuation breaks
/// a placement, capacity or item-coverage rule of the model.
pub fn decode(
    built: &AssignmentModel,
    containers: &[Container],
    lines: &[AssemblyLine],
    solution: &Solution,
) -> Result<AssignmentOutcome, AssignError> {
    if !solution.has_solution() {
        tracing::debug!(
            component = "assign",
            operation = "decode",
            status = "success",
            solver_status = solution.status.as_str(),
            "No valuation to decode"
        );
        return Ok(AssignmentOutcome::NoSolution {
            status: solution.status,
        });
    }

    if containers.len() != built.num_containers() || lines.len() != built.num_lines() {
        return Err(AssignError::inconsistent(format!(
            "model was built for {} containers and {} lines, got {} and {}",
            built.num_containers(),
            built.num_lines(),
            containers.len(),
            lines.len()
        )));
    }
    let expected = built.model().num_variables();
    if solution.values.len() < expected {
        return Err(AssignError::inconsistent(format!(
            "valuation has {} values for {} variables",
            solution.values.len(),
            expected
        )));
    }

    let is_set = |var: Option<VariableId>| -> Result<bool, AssignError> {
        let var = var.ok_or_else(|| AssignError::inconsistent("variable grid is incomplete"))?;
        Ok(solution.value(var).unwrap_or(0.0) > BINARY_THRESHOLD)
    };

    let mut records: Vec<LineAssignment> = lines.iter().map(LineAssignment::empty).collect();
    let mut host_of: Vec<Option<LineIndex>> = Vec::with_capacity(containers.len());
    let mut unplaced = Vec::new();

    for (c, container) in containers.iter().enumerate() {
        let container_index = ContainerIndex::new(c);
        let mut host: Option<LineIndex> = None;
        for l in 0..lines.len() {
            let line_index = LineIndex::new(l);
            if !is_set(built.placement_var(container_index, line_index))? {
                continue;
            }
            if let Some(previous) = host {
                return Err(AssignError::inconsistent(format!(
                    "container '{}' is on lines '{}' and '{}'",
                    container.id(),
                    lines[previous.index()].id(),
                    lines[l].id()
                )));
            }
            host = Some(line_index);
        }

        match host {
            Some(line_index) => records[line_index.index()]
                .containers
                .push(container.id().to_string()),
            None if built.options().placement == Placement::Exact => {
                return Err(AssignError::inconsistent(format!(
                    "container '{}' is not on any line",
                    container.id()
                )));
            }
            None => unplaced.push(container.id().to_string()),
        }
        host_of.push(host);
    }

    let mut used: Vec<Vec<bool>> = vec![vec![false; built.universe().len()]; lines.len()];
    for (l, record) in records.iter_mut().enumerate() {
        let line_index = LineIndex::new(l);
        for (item_index, item) in built.universe().iter() {
            if is_set(built.usage_var(line_index, item_index))? {
                used[l][item_index.index()] = true;
                record.items.push(item.clone());
                record.remaining_capacity -= 1;
            }
        }
        if record.remaining_capacity < 0 {
            return Err(AssignError::inconsistent(format!(
                "line '{}' uses {} items with capacity {}",
                record.line_id,
                record.items.len(),
                record.capacity
            )));
        }
    }

    for (c, host) in host_of.iter().enumerate() {
        let Some(line_index) = host else {
            continue;
        };
        let missing = built
            .container_items(ContainerIndex::new(c))
            .iter()
            .find(|k| !used[line_index.index()][k.index()]);
        if let Some(k) = missing {
            let item = built
                .universe()
                .get(*k)
                .map_or_else(|| k.to_string(), ToString::to_string);
            return Err(AssignError::inconsistent(format!(
                "container '{}' needs item '{}' which is not on line '{}'",
                containers[c].id(),
                item,
                lines[line_index.index()].id()
            )));
        }
    }

    let assignment = Assignment {
        lines: records,
        unplaced,
    };

    tracing::debug!(
        component = "assign",
        operation = "decode",
        status = "success",
        solver_status = solution.status.as_str(),
        placed = assignment.placed_count(),
        unplaced = assignment.unplaced.len(),
        "Decoded assignment"
    );

    Ok(AssignmentOutcome::Placed {
        status: solution.status,
        assignment,
    })
}
