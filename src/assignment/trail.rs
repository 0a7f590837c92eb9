use super::{
    AssignmentError,
    PartialAssignment,
};
use crate::registry::Variable;

/// The number of nested decisions on the trail.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
#[repr(transparent)]
pub struct DecisionLevel(u32);

impl DecisionLevel {
    fn from_len(len: usize) -> Self {
        Self(u32::try_from(len).expect("encountered too many decision levels"))
    }

    fn into_len(self) -> usize {
        self.0 as usize
    }
}

/// Records assignments in chronological order grouped by decision level.
///
/// The not yet propagated suffix of the trail doubles as propagation queue.
#[derive(Debug, Default, Clone)]
pub struct Trail {
    propagate_head: usize,
    decisions_and_implications: Vec<Variable>,
    /// Trail length at the time each decision level was entered.
    limits: Vec<usize>,
}

impl Trail {
    /// Creates a trail with capacity for the given amount of variables.
    pub fn with_capacity(len_variables: usize) -> Self {
        Self {
            propagate_head: 0,
            decisions_and_implications: Vec::with_capacity(len_variables),
            limits: Vec::new(),
        }
    }

    /// Returns the number of assignments on the trail.
    pub fn len(&self) -> usize {
        self.decisions_and_implications.len()
    }

    /// Returns `true` if the trail holds no assignment.
    pub fn is_empty(&self) -> bool {
        self.decisions_and_implications.is_empty()
    }

    /// Returns the current decision level.
    pub fn current_decision_level(&self) -> DecisionLevel {
        DecisionLevel::from_len(self.limits.len())
    }

    /// Enters a new decision level and returns it.
    pub fn bump_decision_level(&mut self) -> DecisionLevel {
        self.limits.push(self.decisions_and_implications.len());
        self.current_decision_level()
    }

    /// Returns the next variable from the propagation queue if any.
    pub fn pop_enqueued(&mut self) -> Option<Variable> {
        let popped = self
            .decisions_and_implications
            .get(self.propagate_head)
            .copied()?;
        self.propagate_head += 1;
        Some(popped)
    }

    /// Pushes a new assignment to the trail.
    ///
    /// This does not yet propagate the pushed assignment.
    ///
    /// # Errors
    ///
    /// - If the variable is assigned the opposite value.
    /// - If the variable has already been assigned the same value.
    pub fn push(
        &mut self,
        variable: Variable,
        value: bool,
        assignment: &mut PartialAssignment,
    ) -> Result<(), AssignmentError> {
        match assignment.get(variable).to_bool() {
            Some(assigned) if assigned == value => {
                return Err(AssignmentError::AlreadyAssigned)
            }
            Some(_) => return Err(AssignmentError::ConflictingAssignment),
            None => (),
        }
        self.decisions_and_implications.push(variable);
        assignment.assign(variable, value);
        Ok(())
    }

    /// Backtracks the trail so that the given decision level is left.
    ///
    /// Every assignment made at or above the level is undone and reported
    /// to `on_undo` in reverse chronological order.
    ///
    /// # Panics
    ///
    /// If the given level is not an active decision level.
    pub fn pop_to_level<F>(
        &mut self,
        level: DecisionLevel,
        assignment: &mut PartialAssignment,
        mut on_undo: F,
    ) where
        F: FnMut(Variable, bool),
    {
        assert!(level.into_len() >= 1);
        assert!(level <= self.current_decision_level());
        let limit = self.limits[level.into_len() - 1];
        self.limits.truncate(level.into_len() - 1);
        while self.decisions_and_implications.len() > limit {
            let variable = self
                .decisions_and_implications
                .pop()
                .expect("encountered unexpected empty trail");
            let value = assignment.unassign(variable);
            on_undo(variable, value);
        }
        self.propagate_head = self.propagate_head.min(limit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        registry::VarValue,
        utils::Index,
    };

    fn var(index: usize) -> Variable {
        Variable::from_index(index)
    }

    #[test]
    fn push_and_pop_enqueued() {
        let mut assignment = PartialAssignment::new(3);
        let mut trail = Trail::with_capacity(3);
        trail.push(var(0), true, &mut assignment).unwrap();
        trail.push(var(2), false, &mut assignment).unwrap();
        assert_eq!(
            trail.push(var(0), true, &mut assignment),
            Err(AssignmentError::AlreadyAssigned)
        );
        assert_eq!(
            trail.push(var(2), true, &mut assignment),
            Err(AssignmentError::ConflictingAssignment)
        );
        assert_eq!(trail.pop_enqueued(), Some(var(0)));
        assert_eq!(trail.pop_enqueued(), Some(var(2)));
        assert_eq!(trail.pop_enqueued(), None);
        assert_eq!(assignment.len_assigned(), 2);
    }

    #[test]
    fn pop_to_level_undoes_assignments() {
        let mut assignment = PartialAssignment::new(4);
        let mut trail = Trail::with_capacity(4);
        let first = trail.bump_decision_level();
        trail.push(var(0), true, &mut assignment).unwrap();
        trail.push(var(1), false, &mut assignment).unwrap();
        let second = trail.bump_decision_level();
        assert!(first < second);
        trail.push(var(2), true, &mut assignment).unwrap();
        trail.push(var(3), false, &mut assignment).unwrap();
        assert_eq!(trail.pop_enqueued(), Some(var(0)));
        let mut undone = Vec::new();
        trail.pop_to_level(second, &mut assignment, |variable, value| {
            undone.push((variable, value))
        });
        assert_eq!(undone, vec![(var(3), false), (var(2), true)]);
        assert_eq!(trail.current_decision_level(), first);
        assert_eq!(assignment.get(var(1)), VarValue::False);
        assert_eq!(assignment.get(var(2)), VarValue::Unassigned);
        // The propagation queue resumes where it stopped.
        assert_eq!(trail.pop_enqueued(), Some(var(1)));
        trail.pop_to_level(first, &mut assignment, |_, _| ());
        assert!(trail.is_empty());
        assert_eq!(assignment.len_assigned(), 0);
    }
}
