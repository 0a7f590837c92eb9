use crate::{
    registry::{
        Valuation,
        VarValue,
        Variable,
    },
    utils::BoundedArray,
};

/// The partial variable assignment of a running search.
#[derive(Debug, Default, Clone)]
pub struct PartialAssignment {
    values: BoundedArray<Variable, VarValue>,
    len_assigned: usize,
}

impl PartialAssignment {
    /// Creates an assignment with all of the variables unassigned.
    pub fn new(len_variables: usize) -> Self {
        Self {
            values: BoundedArray::with_len(len_variables, |_| VarValue::Unassigned),
            len_assigned: 0,
        }
    }

    /// Returns the number of variables.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if there are no variables.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the number of assigned variables.
    pub fn len_assigned(&self) -> usize {
        self.len_assigned
    }

    /// Returns `true` if the partial assignment is complete.
    pub fn is_complete(&self) -> bool {
        self.len_assigned() == self.len()
    }

    /// Returns the value of the variable.
    ///
    /// # Panics
    ///
    /// If the variable is out of bounds.
    #[inline]
    pub fn get(&self, variable: Variable) -> VarValue {
        self.values[variable]
    }

    /// Assigns the value to the variable.
    ///
    /// # Panics
    ///
    /// - If the variable is out of bounds.
    /// - If the variable has already been assigned.
    pub fn assign(&mut self, variable: Variable, value: bool) {
        let slot = &mut self.values[variable];
        assert!(slot.is_unassigned(), "encountered already assigned {}", variable);
        *slot = VarValue::from(value);
        self.len_assigned += 1;
    }

    /// Unassigns the variable and returns its former value.
    ///
    /// # Panics
    ///
    /// - If the variable is out of bounds.
    /// - If the variable has not been assigned.
    pub fn unassign(&mut self, variable: Variable) -> bool {
        let slot = &mut self.values[variable];
        let value = slot
            .to_bool()
            .unwrap_or_else(|| panic!("encountered unassigned {}", variable));
        *slot = VarValue::Unassigned;
        self.len_assigned -= 1;
        value
    }
}

impl Valuation for PartialAssignment {
    #[inline]
    fn value(&self, variable: Variable) -> VarValue {
        self.get(variable)
    }
}
