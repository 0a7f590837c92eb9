use super::ConstraintId;
use crate::{
    registry::Variable,
    utils::BoundedArray,
};

/// Maps every variable to the constraints it occurs in.
#[derive(Debug, Default, Clone)]
pub struct OccurrenceMap {
    occurrences: BoundedArray<Variable, Vec<ConstraintId>>,
}

impl OccurrenceMap {
    /// Returns the number of registered variables.
    pub fn len_variables(&self) -> usize {
        self.occurrences.len()
    }

    /// Grows the map to cover the given total amount of variables.
    ///
    /// Never shrinks.
    pub fn register_variables(&mut self, total: usize) {
        if total > self.len_variables() {
            self.occurrences.resize_with(total, Default::default);
        }
    }

    /// Registers that the constraint contains the variable.
    ///
    /// # Panics
    ///
    /// If the variable has not been registered.
    pub fn register(&mut self, variable: Variable, constraint: ConstraintId) {
        self.occurrences[variable].push(constraint)
    }

    /// Returns the constraints containing the variable in insertion order.
    ///
    /// Unregistered variables occur in no constraint.
    pub fn get(&self, variable: Variable) -> &[ConstraintId] {
        self.occurrences
            .get(variable)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
