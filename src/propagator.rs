use crate::{
    assignment::{
        AssignmentError,
        DecisionLevel,
        PartialAssignment,
        Trail,
    },
    constraint::{
        ConstraintId,
        ConstraintKind,
        ConstraintStore,
    },
    registry::Variable,
    utils::BoundedArray,
};

/// The result of a propagation after an assignment has been made.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PropagationResult {
    /// Propagation reached a fixed point without violating any constraint.
    Consistent,
    /// The constraint can no longer be satisfied.
    Conflict(ConstraintId),
}

impl PropagationResult {
    /// Returns `true` if the propagation yielded a conflict.
    pub fn is_conflict(self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}

/// Per constraint counters maintained under assignment and backtracking.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
struct Counts {
    true_count: u32,
    undecided: u32,
}

/// Incrementally maintains feasibility of the cardinality constraints.
///
/// Owns the partial assignment and its trail. Assignments are counted per
/// constraint eagerly when they are enqueued and the constraints of each
/// enqueued variable are revised when it is propagated:
///
/// - A constraint with more than one `true` variable is in conflict.
/// - A constraint with exactly one `true` variable forces all its undecided
///   variables to `false`.
/// - An exactly-one constraint without `true` variable is in conflict if no
///   undecided variable is left and forces the last undecided variable to `true`.
#[derive(Debug, Clone)]
pub struct Propagator {
    counts: BoundedArray<ConstraintId, Counts>,
    assignment: PartialAssignment,
    trail: Trail,
    /// Number of exactly-one constraints that have no `true` variable.
    open_exactly_one: usize,
}

impl Propagator {
    /// Creates a propagator with every variable of the store unassigned.
    pub fn new(store: &ConstraintStore, len_variables: usize) -> Self {
        let counts = BoundedArray::with_len(store.len(), |id| {
            Counts {
                true_count: 0,
                undecided: store[id].group().len() as u32,
            }
        });
        Self {
            counts,
            assignment: PartialAssignment::new(len_variables),
            trail: Trail::with_capacity(len_variables),
            open_exactly_one: store.len_exactly_one(),
        }
    }

    /// Returns the current partial assignment.
    pub fn assignment(&self) -> &PartialAssignment {
        &self.assignment
    }

    /// Returns the number of `true` variables of the constraint.
    pub fn true_count(&self, id: ConstraintId) -> usize {
        self.counts[id].true_count as usize
    }

    /// Returns the number of undecided variables of the constraint.
    pub fn undecided_count(&self, id: ConstraintId) -> usize {
        self.counts[id].undecided as usize
    }

    /// Returns the number of exactly-one constraints without `true` variable.
    pub fn open_exactly_one(&self) -> usize {
        self.open_exactly_one
    }

    /// Enters a new decision level and returns it.
    pub fn bump_decision_level(&mut self) -> DecisionLevel {
        self.trail.bump_decision_level()
    }

    /// Undoes every assignment made at or above the given decision level.
    pub fn pop_decision_level(&mut self, level: DecisionLevel, store: &ConstraintStore) {
        let Self {
            counts,
            assignment,
            trail,
            open_exactly_one,
        } = self;
        trail.pop_to_level(level, assignment, |variable, value| {
            for &id in store.occurrences(variable) {
                let counts = &mut counts[id];
                counts.undecided += 1;
                if value {
                    counts.true_count -= 1;
                    if counts.true_count == 0 && store[id].kind() == ConstraintKind::ExactlyOne
                    {
                        *open_exactly_one += 1;
                    }
                }
            }
        });
    }

    /// Assigns the value to the undecided variable and propagates to a fixed point.
    ///
    /// # Panics
    ///
    /// If the variable has already been assigned.
    pub fn decide(
        &mut self,
        variable: Variable,
        value: bool,
        store: &ConstraintStore,
    ) -> PropagationResult {
        match self.enqueue(variable, value, store) {
            Ok(()) => (),
            Err(AssignmentError::AlreadyAssigned) => {
                panic!("decision heuristic unexpectedly proposed already assigned {}", variable)
            }
            Err(_) => panic!("decision heuristic unexpectedly proposed conflicting {}", variable),
        }
        self.propagate(store)
    }

    /// Revises every constraint once and propagates to a fixed point.
    ///
    /// Used before the first decision to apply constraints that are unit by construction.
    pub fn propagate_root(&mut self, store: &ConstraintStore) -> PropagationResult {
        for (id, _) in store {
            if let Err(conflict) = self.revise(id, store) {
                return PropagationResult::Conflict(conflict)
            }
        }
        self.propagate(store)
    }

    /// Propagates all enqueued assignments to a fixed point.
    pub fn propagate(&mut self, store: &ConstraintStore) -> PropagationResult {
        while let Some(variable) = self.trail.pop_enqueued() {
            for &id in store.occurrences(variable) {
                if let Err(conflict) = self.revise(id, store) {
                    return PropagationResult::Conflict(conflict)
                }
            }
        }
        PropagationResult::Consistent
    }

    /// Pushes the assignment to the trail and updates the counters of its constraints.
    fn enqueue(
        &mut self,
        variable: Variable,
        value: bool,
        store: &ConstraintStore,
    ) -> Result<(), AssignmentError> {
        self.trail.push(variable, value, &mut self.assignment)?;
        for &id in store.occurrences(variable) {
            let counts = &mut self.counts[id];
            counts.undecided -= 1;
            if value {
                if counts.true_count == 0 && store[id].kind() == ConstraintKind::ExactlyOne {
                    self.open_exactly_one -= 1;
                }
                counts.true_count += 1;
            }
        }
        Ok(())
    }

    /// Applies the cardinality rules of the constraint.
    ///
    /// # Errors
    ///
    /// If the constraint is in conflict with the current assignment.
    fn revise(&mut self, id: ConstraintId, store: &ConstraintStore) -> Result<(), ConstraintId> {
        let constraint = &store[id];
        let Counts {
            true_count,
            undecided,
        } = self.counts[id];
        match (true_count, constraint.kind()) {
            (0, ConstraintKind::AtMostOne) => Ok(()),
            (0, ConstraintKind::ExactlyOne) => {
                match undecided {
                    0 => Err(id),
                    1 => {
                        let last = constraint
                            .group()
                            .iter()
                            .copied()
                            .find(|&variable| self.assignment.get(variable).is_unassigned())
                            .expect("encountered missing expected undecided variable");
                        self.force(last, true, store);
                        Ok(())
                    }
                    _ => Ok(()),
                }
            }
            (1, _) => {
                if undecided > 0 {
                    for &variable in constraint.group() {
                        if self.assignment.get(variable).is_unassigned() {
                            self.force(variable, false, store);
                        }
                    }
                }
                Ok(())
            }
            _ => Err(id),
        }
    }

    /// Enqueues an implied assignment of an undecided variable.
    fn force(&mut self, variable: Variable, value: bool, store: &ConstraintStore) {
        self.enqueue(variable, value, store)
            .expect("encountered unexpected assigned variable during propagation")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        calendar::{
            Calendar,
            Day,
            Period,
        },
        registry::{
            CourseId,
            LevelId,
            Registry,
            VarKey,
            VarValue,
        },
        utils::Index,
    };

    /// Declares `len` variables for periods of a single day.
    fn setup(len: u8) -> (Registry, Vec<Variable>) {
        let mut registry = Registry::new(Calendar::new(1, len));
        let vars = (1..=len)
            .map(|period| {
                registry
                    .declare(VarKey::new(
                        LevelId::from_index(0),
                        CourseId::from_index(0),
                        Day::new(0),
                        Period::new(period),
                    ))
                    .unwrap()
            })
            .collect();
        (registry, vars)
    }

    #[test]
    fn at_most_one_forces_others_false() {
        let (registry, vars) = setup(3);
        let mut store = ConstraintStore::new();
        let amo = store.add_at_most_one(&registry, "amo", vars.clone()).unwrap();
        let mut propagator = Propagator::new(&store, registry.len());
        assert_eq!(propagator.propagate_root(&store), PropagationResult::Consistent);
        assert_eq!(propagator.undecided_count(amo), 3);
        let level = propagator.bump_decision_level();
        assert_eq!(
            propagator.decide(vars[1], true, &store),
            PropagationResult::Consistent
        );
        assert_eq!(propagator.assignment().get(vars[0]), VarValue::False);
        assert_eq!(propagator.assignment().get(vars[1]), VarValue::True);
        assert_eq!(propagator.assignment().get(vars[2]), VarValue::False);
        assert_eq!(propagator.true_count(amo), 1);
        assert_eq!(propagator.undecided_count(amo), 0);
        propagator.pop_decision_level(level, &store);
        assert_eq!(propagator.assignment().len_assigned(), 0);
        assert_eq!(propagator.true_count(amo), 0);
        assert_eq!(propagator.undecided_count(amo), 3);
    }

    #[test]
    fn exactly_one_forces_last_candidate() {
        let (registry, vars) = setup(3);
        let mut store = ConstraintStore::new();
        let eo = store.add_exactly_one(&registry, "eo", vars.clone()).unwrap();
        let mut propagator = Propagator::new(&store, registry.len());
        assert_eq!(propagator.open_exactly_one(), 1);
        propagator.bump_decision_level();
        assert!(!propagator.decide(vars[0], false, &store).is_conflict());
        propagator.bump_decision_level();
        assert!(!propagator.decide(vars[2], false, &store).is_conflict());
        assert_eq!(propagator.assignment().get(vars[1]), VarValue::True);
        assert_eq!(propagator.true_count(eo), 1);
        assert_eq!(propagator.open_exactly_one(), 0);
    }

    #[test]
    fn exactly_one_without_candidates_conflicts() {
        let (registry, vars) = setup(3);
        let mut store = ConstraintStore::new();
        let eo = store
            .add_exactly_one(&registry, "eo", vec![vars[0], vars[1]])
            .unwrap();
        let amo = store.add_at_most_one(&registry, "amo", vars.clone()).unwrap();
        let mut propagator = Propagator::new(&store, registry.len());
        let level = propagator.bump_decision_level();
        assert_eq!(
            propagator.decide(vars[2], true, &store),
            PropagationResult::Conflict(eo)
        );
        propagator.pop_decision_level(level, &store);
        assert_eq!(propagator.assignment().len_assigned(), 0);
        assert_eq!(propagator.open_exactly_one(), 1);
        assert_eq!(propagator.true_count(amo), 0);
        assert_eq!(propagator.undecided_count(amo), 3);
        assert_eq!(propagator.undecided_count(eo), 2);
    }

    #[test]
    fn two_forced_true_variables_conflict() {
        let (registry, vars) = setup(3);
        let mut store = ConstraintStore::new();
        store
            .add_exactly_one(&registry, "first", vec![vars[0], vars[1]])
            .unwrap();
        store
            .add_exactly_one(&registry, "second", vec![vars[0], vars[2]])
            .unwrap();
        let pair = store
            .add_at_most_one(&registry, "pair", vec![vars[1], vars[2]])
            .unwrap();
        let mut propagator = Propagator::new(&store, registry.len());
        let level = propagator.bump_decision_level();
        assert_eq!(
            propagator.decide(vars[0], false, &store),
            PropagationResult::Conflict(pair)
        );
        propagator.pop_decision_level(level, &store);
        propagator.bump_decision_level();
        assert_eq!(
            propagator.decide(vars[0], true, &store),
            PropagationResult::Consistent
        );
        assert_eq!(propagator.assignment().get(vars[1]), VarValue::False);
        assert_eq!(propagator.assignment().get(vars[2]), VarValue::False);
        assert_eq!(propagator.true_count(pair), 0);
        assert_eq!(propagator.open_exactly_one(), 0);
    }

    #[test]
    fn singleton_exactly_one_is_forced_at_root() {
        let (registry, vars) = setup(2);
        let mut store = ConstraintStore::new();
        store
            .add_exactly_one(&registry, "single", vec![vars[1]])
            .unwrap();
        store
            .add_exactly_one(&registry, "also", vec![vars[0], vars[1]])
            .unwrap();
        let mut propagator = Propagator::new(&store, registry.len());
        assert_eq!(propagator.propagate_root(&store), PropagationResult::Consistent);
        assert_eq!(propagator.assignment().get(vars[1]), VarValue::True);
        assert_eq!(propagator.assignment().get(vars[0]), VarValue::False);
        assert!(propagator.assignment().is_complete());
    }

    #[test]
    fn contradicting_singletons_conflict_at_root() {
        let (registry, vars) = setup(2);
        let mut store = ConstraintStore::new();
        store.add_exactly_one(&registry, "a", vec![vars[0]]).unwrap();
        store.add_exactly_one(&registry, "b", vec![vars[1]]).unwrap();
        let amo = store
            .add_at_most_one(&registry, "at most one", vec![vars[0], vars[1]])
            .unwrap();
        let mut propagator = Propagator::new(&store, registry.len());
        assert_eq!(
            propagator.propagate_root(&store),
            PropagationResult::Conflict(amo)
        );
    }
}
