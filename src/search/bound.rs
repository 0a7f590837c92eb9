use super::Component;
use crate::{
    constraint::{
        ConstraintKind,
        ConstraintStore,
    },
    objective::Objective,
    propagator::Propagator,
    registry::{
        VarValue,
        Variable,
    },
    utils::BoundedArray,
};

/// How a variable is covered by exactly-one constraints.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Cover {
    /// In no exactly-one constraint; may be `true` freely.
    Free,
    /// In exactly one exactly-one constraint.
    Single,
    /// In several exactly-one constraints.
    Shared,
}

/// Optimistic estimate of the best objective reachable from a partial assignment.
///
/// Sums the weights of the `true` variables, for every exactly-one constraint
/// still lacking a `true` variable the best undecided weight, and the positive
/// weights of undecided variables outside of any exactly-one constraint.
/// Variables shared by several exactly-one constraints are estimated with their
/// weight clamped at zero so that a single variable satisfying several of them
/// is never underestimated.
#[derive(Debug, Clone)]
pub struct UpperBound {
    cover: BoundedArray<Variable, Cover>,
}

impl UpperBound {
    pub fn new(store: &ConstraintStore, len_variables: usize) -> Self {
        let mut cover = BoundedArray::with_len(len_variables, |_| Cover::Free);
        for (_, constraint) in store {
            if constraint.kind() != ConstraintKind::ExactlyOne {
                continue
            }
            for &variable in constraint.group() {
                let slot = &mut cover[variable];
                *slot = match *slot {
                    Cover::Free => Cover::Single,
                    Cover::Single | Cover::Shared => Cover::Shared,
                };
            }
        }
        Self { cover }
    }

    /// Computes the bound of the component for the current assignment of the propagator.
    pub fn compute(
        &self,
        propagator: &Propagator,
        store: &ConstraintStore,
        objective: &Objective,
        component: &Component,
    ) -> i64 {
        let assignment = propagator.assignment();
        let mut bound = 0;
        for &variable in component.variables() {
            match assignment.get(variable) {
                VarValue::True => bound += objective.weight(variable),
                VarValue::Unassigned if self.cover[variable] == Cover::Free => {
                    bound += objective.weight(variable).max(0)
                }
                _ => (),
            }
        }
        for &id in component.constraints() {
            let constraint = &store[id];
            if constraint.kind() != ConstraintKind::ExactlyOne || propagator.true_count(id) > 0 {
                continue
            }
            let best = constraint
                .group()
                .iter()
                .copied()
                .filter(|&variable| assignment.get(variable).is_unassigned())
                .map(|variable| {
                    let weight = objective.weight(variable);
                    match self.cover[variable] {
                        Cover::Shared => weight.max(0),
                        Cover::Free | Cover::Single => weight,
                    }
                })
                .max();
            bound += best.unwrap_or(0);
        }
        bound
    }
}
