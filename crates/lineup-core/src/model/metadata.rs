//! Names for columns, rows and the objective, used in logs and LP output.

use std::collections::BTreeMap;

use lineup_expr::ids::{ConstraintId, VariableId};

use crate::model::Model;

impl Model {
    pub fn get_variable_name(&self, id: VariableId) -> Option<&str> {
        self.variable_names.get(&id).map(String::as_str)
    }

    /// Reverse lookup; linear in the number of named variables.
    pub fn get_variable_by_name(&self, name: &str) -> Option<VariableId> {
        find_by_name(&self.variable_names, name)
    }

    pub fn get_constraint_name(&self, id: ConstraintId) -> Option<&str> {
        self.constraint_names.get(&id).map(String::as_str)
    }

    pub fn get_constraint_by_name(&self, name: &str) -> Option<ConstraintId> {
        find_by_name(&self.constraint_names, name)
    }

    pub fn set_objective_name(&mut self, name: Option<String>) {
        self.objective_name = name;
    }

    pub fn get_objective_name(&self) -> Option<&str> {
        self.objective_name.as_deref()
    }

    /// Display label for a variable: its name, or `v<id>`.
    pub fn variable_label(&self, id: VariableId) -> String {
        self.get_variable_name(id)
            .map_or_else(|| format!("v{}", id.inner()), str::to_string)
    }

    /// Display label for a constraint: its name, or `c<id>`.
    pub fn constraint_label(&self, id: ConstraintId) -> String {
        self.get_constraint_name(id)
            .map_or_else(|| format!("c{}", id.inner()), str::to_string)
    }
}

fn find_by_name<K: Copy>(names: &BTreeMap<K, String>, name: &str) -> Option<K> {
    names
        .iter()
        .find_map(|(&id, candidate)| (candidate == name).then_some(id))
}
