//! Translating containers and lines into a binary assignment model.
//!
//! Two families of binaries are created:
//!
//! - `x[c, l]`: container `c` is placed on line `l`,
//! - `y[l, k]`: item `k` counts against the capacity of line `l`.
//!
//! Rows tie them together so that a line's footprint is the union of the
//! item sets of the containers placed on it.

use std::collections::HashSet;
use std::time::Instant;

use lineup_core::Model;
use lineup_expr::{Expr, VariableId};

use crate::domain::{AssemblyLine, Container, ContainerIndex, ItemIndex, ItemUniverse, LineIndex};
use crate::error::AssignError;

/// How many lines a container must occupy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Placement {
    /// Every container on exactly one line; otherwise the model is infeasible.
    #[default]
    Exact,
    /// Containers on at most one line; the objective maximizes how many fit.
    Optional,
}

/// How usage binaries are coupled to placements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UsageLinking {
    /// Placing a container forces its items on; nothing forces other items off.
    #[default]
    Loose,
    /// Additionally, an item may only count on a line that hosts a container
    /// requiring it.
    Tight,
}

/// Knobs for [`AssignmentModel::build`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildOptions {
    pub placement: Placement,
    pub usage: UsageLinking,
}

impl BuildOptions {
    pub fn with_placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    pub fn with_usage(mut self, usage: UsageLinking) -> Self {
        self.usage = usage;
        self
    }
}

/// Dense row-major table of variable ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableGrid {
    rows: usize,
    cols: usize,
    ids: Vec<VariableId>,
}

impl VariableGrid {
    fn build(
        rows: usize,
        cols: usize,
        mut declare: impl FnMut(usize, usize) -> VariableId,
    ) -> Self {
        let mut ids = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                ids.push(declare(row, col));
            }
        }
        Self { rows, cols, ids }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> Option<VariableId> {
        if row < self.rows && col < self.cols {
            self.ids.get(row * self.cols + col).copied()
        } else {
            None
        }
    }

    /// Ids of one row, in column order.
    pub fn row(&self, row: usize) -> &[VariableId] {
        if row < self.rows {
            &self.ids[row * self.cols..(row + 1) * self.cols]
        } else {
            &[]
        }
    }
}

/// A built model together with the grids needed to read a solution back.
#[derive(Debug, Clone)]
pub struct AssignmentModel {
    model: Model,
    universe: ItemUniverse,
    // containers x lines
    placement: VariableGrid,
    // lines x items
    usage: VariableGrid,
    container_items: Vec<Vec<ItemIndex>>,
    options: BuildOptions,
}

impl AssignmentModel {
    /// Validate the inputs and build the model.
    ///
    /// Inputs are not modified. Empty slices give an empty (but valid) model.
    ///
    /// # Errors
    ///
    /// Returns a construction error for empty ids, duplicate ids, negative
    /// capacities or containers without items.
    pub fn build(
        containers: &[Container],
        lines: &[AssemblyLine],
        options: BuildOptions,
    ) -> Result<Self, AssignError> {
        let started = Instant::now();
        validate_lines(lines)?;
        validate_containers(containers)?;

        let universe = ItemUniverse::from_containers(containers);
        let container_items: Vec<Vec<ItemIndex>> = containers
            .iter()
            .map(|container| {
                container
                    .items()
                    .iter()
                    .filter_map(|item| universe.index_of(item))
                    .collect()
            })
            .collect();

        let mut model = Model::new();
        let placement = VariableGrid::build(containers.len(), lines.len(), |c, l| {
            model.add_binary(format!("x_{c}_{l}"))
        });
        let usage = VariableGrid::build(lines.len(), universe.len(), |l, k| {
            model.add_binary(format!("y_{l}_{k}"))
        });

        for c in 0..containers.len() {
            let placed = Expr::sum_of(placement.row(c).iter().copied());
            let row = match options.placement {
                Placement::Exact => placed.eq_scalar(1.0),
                Placement::Optional => placed.le_scalar(1.0),
            };
            model.add_named_constraint(format!("assign_{c}"), row)?;
        }

        for (l, line) in lines.iter().enumerate() {
            let used = Expr::sum_of(usage.row(l).iter().copied());
            model.add_named_constraint(
                format!("capacity_{l}"),
                used.le_scalar(line.capacity() as f64),
            )?;
        }

        let mut links = 0usize;
        for (c, items) in container_items.iter().enumerate() {
            for l in 0..lines.len() {
                let x = grid_var(&placement, c, l)?;
                for k in items {
                    let y = grid_var(&usage, l, k.index())?;
                    model.add_named_constraint(
                        format!("link_{c}_{l}_{k}"),
                        Expr::var(y).ge_expr(&Expr::var(x)),
                    )?;
                    links += 1;
                }
            }
        }

        if options.usage == UsageLinking::Tight {
            let mut hosts: Vec<Vec<usize>> = vec![Vec::new(); universe.len()];
            for (c, items) in container_items.iter().enumerate() {
                for k in items {
                    hosts[k.index()].push(c);
                }
            }
            for l in 0..lines.len() {
                for (k, containers_with_item) in hosts.iter().enumerate() {
                    let y = grid_var(&usage, l, k)?;
                    let mut hosting = Vec::with_capacity(containers_with_item.len());
                    for &c in containers_with_item {
                        hosting.push(grid_var(&placement, c, l)?);
                    }
                    model.add_named_constraint(
                        format!("usage_{l}_{k}"),
                        Expr::var(y).le_expr(&Expr::sum_of(hosting)),
                    )?;
                }
            }
        }

        model.maximize(Expr::sum_of(placement.ids.iter().copied()))?;
        model.set_objective_name(Some("placed".to_string()));

        tracing::debug!(
            component = "assign",
            operation = "build_model",
            status = "success",
            containers = containers.len(),
            lines = lines.len(),
            items = universe.len(),
            variables = model.num_variables(),
            constraints = model.num_constraints(),
            link_rows = links,
            placement = ?options.placement,
            usage = ?options.usage,
            duration_ms = started.elapsed().as_secs_f64() * 1000.0,
            "Built assignment model"
        );

        Ok(Self {
            model,
            universe,
            placement,
            usage,
            container_items,
            options,
        })
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn universe(&self) -> &ItemUniverse {
        &self.universe
    }

    pub fn options(&self) -> BuildOptions {
        self.options
    }

    pub fn num_containers(&self) -> usize {
        self.placement.rows()
    }

    pub fn num_lines(&self) -> usize {
        self.placement.cols()
    }

    /// The `x` binary for a container/line pair.
    pub fn placement_var(&self, container: ContainerIndex, line: LineIndex) -> Option<VariableId> {
        self.placement.get(container.index(), line.index())
    }

    /// The `y` binary for a line/item pair.
    pub fn usage_var(&self, line: LineIndex, item: ItemIndex) -> Option<VariableId> {
        self.usage.get(line.index(), item.index())
    }

    /// Universe indices of the items a container requires.
    pub fn container_items(&self, container: ContainerIndex) -> &[ItemIndex] {
        self.container_items
            .get(container.index())
            .map_or(&[], Vec::as_slice)
    }
}

fn grid_var(grid: &VariableGrid, row: usize, col: usize) -> Result<VariableId, AssignError> {
    grid.get(row, col).ok_or_else(|| {
        AssignError::inconsistent(format!(
            "variable grid {}x{} has no cell ({row}, {col})",
            grid.rows(),
            grid.cols()
        ))
    })
}

fn validate_lines(lines: &[AssemblyLine]) -> Result<(), AssignError> {
    let mut seen = HashSet::with_capacity(lines.len());
    for (position, line) in lines.iter().enumerate() {
        if line.id().is_empty() {
            return Err(AssignError::EmptyId {
                kind: "line",
                position,
            });
        }
        if !seen.insert(line.id()) {
            return Err(AssignError::DuplicateLine {
                line_id: line.id().to_string(),
            });
        }
        if line.capacity() < 0 {
            return Err(AssignError::NegativeCapacity {
                line_id: line.id().to_string(),
                capacity: line.capacity(),
            });
        }
    }
    Ok(())
}

fn validate_containers(containers: &[Container]) -> Result<(), AssignError> {
    let mut seen = HashSet::with_capacity(containers.len());
    for (position, container) in containers.iter().enumerate() {
        if container.id().is_empty() {
            return Err(AssignError::EmptyId {
                kind: "container",
                position,
            });
        }
        if !seen.insert(container.id()) {
            return Err(AssignError::DuplicateContainer {
                container_id: container.id().to_string(),
            });
        }
        if container.items().is_empty() {
            return Err(AssignError::EmptyContainer {
                container_id: container.id().to_string(),
            });
        }
    }
    Ok(())
}
