//! Assigning containers to capacity-limited assembly lines.
//!
//! A line can host a bounded number of distinct items; containers placed on
//! the same line share the items they have in common. [`assign`] builds a
//! binary program for this, hands it to any [`lineup_core::Solver`] and
//! decodes the valuation into per-line [`LineAssignment`] records.
//!
//! ```ignore
//! let containers = vec![Container::new("C1", ["1", "2"])];
//! let lines = vec![AssemblyLine::new("A", 2)];
//! let outcome = assign(&containers, &lines, &mut HighsSolver::new(), &AssignOptions::default())?;
//! ```

pub mod assign;
pub mod builder;
pub mod decoder;
pub mod domain;
pub mod error;
pub mod input;

pub use assign::{AssignOptions, DEFAULT_TIME_LIMIT, assign};
pub use builder::{AssignmentModel, BuildOptions, Placement, UsageLinking, VariableGrid};
pub use decoder::{Assignment, AssignmentOutcome, LineAssignment, decode};
pub use domain::{AssemblyLine, Container, ContainerIndex, Item, ItemIndex, ItemUniverse, LineIndex};
pub use error::AssignError;
pub use input::ProblemInput;
