mod model;
mod partial;
mod trail;

pub use self::{
    model::Assignment,
    partial::PartialAssignment,
    trail::{
        DecisionLevel,
        Trail,
    },
};
use thiserror::Error;

/// Errors that may be encountered when operating on an assignment.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssignmentError {
    /// When trying to assign a variable that has already been assigned the same value.
    #[error("the variable has already been assigned")]
    AlreadyAssigned,
    /// When trying to assign a variable that has already been assigned the opposite value.
    #[error("the assignment is in conflict with existing assignment")]
    ConflictingAssignment,
}
