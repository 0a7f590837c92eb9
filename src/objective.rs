use crate::{
    registry::{
        Valuation,
        Variable,
    },
    utils::{
        BoundedArray,
        Index,
    },
};

/// A weighted linear sum over decision variables that is maximized.
///
/// Variables without an explicit weight contribute nothing.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Objective {
    weights: BoundedArray<Variable, i64>,
}

impl Objective {
    /// Creates an objective without weighted variables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the weight of the variable, replacing its previous weight.
    pub fn set_weight(&mut self, variable: Variable, weight: i64) {
        if !self.weights.contains_key(variable) {
            self.weights.resize_with(variable.into_index() + 1, || 0);
        }
        self.weights[variable] = weight;
    }

    /// Returns the weight of the variable.
    #[inline]
    pub fn weight(&self, variable: Variable) -> i64 {
        self.weights.get(variable).copied().unwrap_or(0)
    }

    /// Returns the sum of the weights of all `true` variables of the assignment.
    pub fn evaluate<V>(&self, valuation: &V) -> i64
    where
        V: Valuation + ?Sized,
    {
        self.weights
            .iter()
            .filter(|&(variable, _)| valuation.value(variable).is_true())
            .map(|(_, &weight)| weight)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::VarValue;

    struct Values(Vec<VarValue>);

    impl Valuation for Values {
        fn value(&self, variable: Variable) -> VarValue {
            self.0[variable.into_index()]
        }
    }

    #[test]
    fn evaluate_sums_true_weights() {
        let mut objective = Objective::new();
        objective.set_weight(Variable::from_index(0), 3);
        objective.set_weight(Variable::from_index(2), -2);
        objective.set_weight(Variable::from_index(3), 5);
        assert_eq!(objective.weight(Variable::from_index(1)), 0);
        assert_eq!(objective.weight(Variable::from_index(9)), 0);
        let values = Values(vec![
            VarValue::True,
            VarValue::True,
            VarValue::True,
            VarValue::Unassigned,
        ]);
        assert_eq!(objective.evaluate(&values), 1);
    }
}
