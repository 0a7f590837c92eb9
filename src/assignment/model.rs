use crate::{
    registry::{
        Valuation,
        VarValue,
        Variable,
    },
    utils::BoundedArray,
};

/// A complete and immutable assignment of every decision variable.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Assignment {
    values: BoundedArray<Variable, bool>,
}

impl Assignment {
    /// Creates a complete assignment from the value of every variable.
    pub(crate) fn from_values(values: BoundedArray<Variable, bool>) -> Self {
        Self { values }
    }

    /// Returns the number of variables.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if there are no variables.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns `true` if the variable is assigned to `true`.
    ///
    /// Out of bounds variables are reported as `false`.
    pub fn is_true(&self, variable: Variable) -> bool {
        self.values.get(variable).copied().unwrap_or(false)
    }

    /// Returns an iterator over the variables assigned to `true` in order.
    pub fn iter_true(&self) -> impl Iterator<Item = Variable> + '_ {
        self.values
            .iter()
            .filter(|&(_, &value)| value)
            .map(|(variable, _)| variable)
    }
}

impl Valuation for Assignment {
    fn value(&self, variable: Variable) -> VarValue {
        self.values
            .get(variable)
            .map(|&value| VarValue::from(value))
            .unwrap_or(VarValue::Unassigned)
    }
}
