use crate::{
    assignment::PartialAssignment,
    registry::Variable,
};

/// Heuristic that chooses the next variable to branch on.
///
/// Variables are visited in the order given, which for a model is the
/// (level, course, day, period) declaration order.
#[derive(Debug, Default, Copy, Clone)]
pub struct Decider;

impl Decider {
    pub fn new() -> Self {
        Self
    }

    /// Returns the position of the first unassigned variable at or after `start`.
    ///
    /// Every variable before `start` must already be assigned for the result
    /// to be the first unassigned variable of the slice.
    pub fn next_unassigned(
        &self,
        assignment: &PartialAssignment,
        variables: &[Variable],
        start: usize,
    ) -> Option<usize> {
        variables
            .iter()
            .skip(start)
            .position(|&variable| assignment.get(variable).is_unassigned())
            .map(|offset| start + offset)
    }
}
