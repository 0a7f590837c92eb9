//! Weekly timetable construction by exhaustive branch-and-bound.
//!
//! Every course of every level is placed into exactly one (day, period) slot
//! of the week. A level gets at most one course per day and a course at most
//! one period per day. Among all feasible placements the one with the highest
//! sum of period weights is searched for within a wall-clock budget.
//!
//! ```
//! use weekly_timetable::{
//!     build_model,
//!     solve,
//!     Catalog,
//!     CourseDescriptor,
//!     SolveConfig,
//!     SolveStatus,
//!     Timetable,
//! };
//! use std::time::Duration;
//!
//! let catalog = Catalog::new().with_level(
//!     "L1",
//!     vec![CourseDescriptor::new("MAT101"), CourseDescriptor::new("PHY101")],
//! );
//! let model = build_model(&catalog, &SolveConfig::default()).unwrap();
//! let result = solve(&model, Duration::from_secs(10));
//! assert_eq!(result.status(), SolveStatus::Optimal);
//! assert_eq!(result.objective(), Some(6));
//!
//! let timetable = Timetable::extract(&model, &result).unwrap();
//! assert_eq!(timetable.assigned_shifts(), 2);
//! ```

#![forbid(unsafe_code)]

mod assignment;
mod calendar;
mod catalog;
mod config;
mod constraint;
mod decider;
mod model;
mod objective;
mod propagator;
mod registry;
mod search;
mod timetable;
mod utils;


pub use crate::{
    assignment::{
        Assignment,
        AssignmentError,
    },
    calendar::{
        Calendar,
        Day,
        Period,
        PeriodWeights,
    },
    catalog::{
        Catalog,
        CourseDescriptor,
        LevelEntry,
    },
    config::{
        ConfigError,
        SolveConfig,
        UNKNOWN_TEACHER,
    },
    constraint::{
        Constraint,
        ConstraintError,
        ConstraintId,
        ConstraintKind,
        ConstraintStore,
    },
    model::{
        Course,
        Level,
        Model,
        ModelError,
    },
    objective::Objective,
    registry::{
        CourseId,
        LevelId,
        Registry,
        RegistryError,
        Valuation,
        VarKey,
        VarValue,
        Variable,
    },
    search::{
        Improvement,
        SearchEngine,
        SearchState,
        SearchStats,
        SolveResult,
        SolveStatus,
    },
    timetable::{
        Entry,
        ExtractError,
        Slot,
        Timetable,
    },
};
use std::time::Duration;
use thiserror::Error;

/// Errors of the timetable solver.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to build the model: {0}")]
    Model(#[from] ModelError),
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to extract the timetable: {0}")]
    Extract(#[from] ExtractError),
}

/// Builds the model of the catalog under the configuration.
///
/// # Errors
///
/// If the configuration is invalid or the model cannot be built.
pub fn build_model(catalog: &Catalog, config: &SolveConfig) -> Result<Model, Error> {
    Ok(Model::build(catalog, config)?)
}

/// Searches the best timetable of the model within the time limit.
pub fn solve(model: &Model, time_limit: Duration) -> SolveResult {
    SearchEngine::new(model, time_limit).run()
}

/// Searches the best timetable of the model with the time limit and
/// deadline polling of the configuration.
pub fn solve_with_config(model: &Model, config: &SolveConfig) -> SolveResult {
    SearchEngine::with_check_interval(model, config.time_limit(), config.deadline_check_interval)
        .run()
}
