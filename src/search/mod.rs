//! Time bounded depth-first branch-and-bound.

mod bound;
mod components;
mod deadline;

pub use self::{
    bound::UpperBound,
    components::{
        partition,
        Component,
    },
    deadline::Deadline,
};
use crate::{
    assignment::Assignment,
    constraint::{
        ConstraintKind,
        ConstraintStore,
    },
    decider::Decider,
    propagator::{
        PropagationResult,
        Propagator,
    },
    registry::Variable,
    utils::BoundedArray,
    Model,
};
use core::fmt::{
    self,
    Display,
};
use std::time::Duration;
use tracing::{
    debug,
    info,
};

/// Default number of deadline polls between two reads of the clock.
pub const DEFAULT_CHECK_INTERVAL: u64 = 64;

/// The terminal status of a search.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SolveStatus {
    /// The search space has been exhausted and the solution is optimal.
    Optimal,
    /// The deadline was reached after at least one solution was found.
    ///
    /// The solution is possibly sub-optimal.
    Feasible,
    /// The search space has been exhausted without any solution.
    Infeasible,
    /// The deadline was reached before any solution was found.
    Unknown,
}

impl SolveStatus {
    /// Returns `true` if the search has produced a solution.
    pub fn has_solution(self) -> bool {
        matches!(self, Self::Optimal | Self::Feasible)
    }

    /// Returns `true` if the search has been stopped by its deadline.
    pub fn is_timed_out(self) -> bool {
        matches!(self, Self::Feasible | Self::Unknown)
    }
}

impl Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Optimal => write!(f, "optimal"),
            Self::Feasible => write!(f, "feasible (timed out)"),
            Self::Infeasible => write!(f, "infeasible"),
            Self::Unknown => write!(f, "unknown (timed out)"),
        }
    }
}

/// The state of the search engine.
///
/// A finished search reports the state it stopped in: `Done` once the
/// search space has been exhausted and `Branching` if the deadline
/// interrupted it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SearchState {
    Unexplored,
    Branching,
    Propagating,
    FeasibleLeaf,
    Conflict,
    BoundExceeded,
    Backtrack,
    Done,
}

/// Counters of a search run.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct SearchStats {
    /// Visited search nodes.
    pub nodes: u64,
    /// Decisions refuted by propagation.
    pub conflicts: u64,
    /// Nodes cut off because their bound could not beat the incumbent.
    pub prunes: u64,
    /// Feasible leaves reached.
    pub leaves: u64,
    /// Independent parts of the model searched one after another.
    pub components: u64,
}

/// A new incumbent found during a search.
///
/// The objective is the one of a complete assignment, so improvements are
/// only recorded once every component has a solution.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Improvement {
    pub objective: i64,
    pub node: u64,
    pub elapsed: Duration,
}

/// The outcome of a search.
#[derive(Debug, Clone)]
pub struct SolveResult {
    status: SolveStatus,
    state: SearchState,
    assignment: Option<Assignment>,
    objective: Option<i64>,
    wall_time: Duration,
    stats: SearchStats,
    improvements: Vec<Improvement>,
}

impl SolveResult {
    pub fn status(&self) -> SolveStatus {
        self.status
    }

    /// Returns the state the search stopped in.
    pub fn state(&self) -> SearchState {
        self.state
    }

    /// Returns the best assignment found if any.
    pub fn assignment(&self) -> Option<&Assignment> {
        self.assignment.as_ref()
    }

    /// Returns the objective value of the best assignment found if any.
    pub fn objective(&self) -> Option<i64> {
        self.objective
    }

    pub fn wall_time(&self) -> Duration {
        self.wall_time
    }

    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Returns every incumbent improvement in the order they were found.
    pub fn improvements(&self) -> &[Improvement] {
        &self.improvements
    }
}

#[cfg(test)]
impl SolveResult {
    /// Creates a finished result carrying the given assignment.
    pub(crate) fn with_assignment(assignment: Assignment, objective: i64) -> Self {
        Self {
            status: SolveStatus::Optimal,
            state: SearchState::Done,
            assignment: Some(assignment),
            objective: Some(objective),
            wall_time: Duration::ZERO,
            stats: SearchStats::default(),
            improvements: Vec::new(),
        }
    }
}

/// Returned by the recursive search to stop on an expired deadline.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Flow {
    Continue,
    Halt,
}

/// Best solution of the component under search.
#[derive(Debug, Clone)]
struct Incumbent {
    objective: i64,
    /// Values of the component variables in component order.
    values: Vec<bool>,
}

/// Branch-and-bound search over the variables of a model.
///
/// The model is split into components that share no constraint. They are
/// searched one after another and their best assignments are merged, so an
/// infeasible component is refuted without re-searching the others.
///
/// Within a component the first undecided variable is branched on, `true`
/// before `false`, and every decision is propagated to a fixed point. Nodes
/// whose optimistic bound does not exceed the incumbent are pruned, so among
/// equally good solutions the first one found is kept.
#[derive(Debug)]
pub struct SearchEngine<'a> {
    model: &'a Model,
    propagator: Propagator,
    decider: Decider,
    bound: UpperBound,
    deadline: Deadline,
    time_limit: Duration,
    /// Open exactly-one constraints outside of the component under search.
    open_elsewhere: usize,
    /// Objective of the components solved so far.
    solved_objective: i64,
    /// Set while the last component is searched.
    last_component: bool,
    incumbent: Option<Incumbent>,
    stats: SearchStats,
    improvements: Vec<Improvement>,
    state: SearchState,
}

impl<'a> SearchEngine<'a> {
    /// Creates a search over the model that stops after the time limit.
    ///
    /// The clock starts immediately.
    pub fn new(model: &'a Model, time_limit: Duration) -> Self {
        Self::with_check_interval(model, time_limit, DEFAULT_CHECK_INTERVAL)
    }

    /// Creates a search that reads the clock every `check_interval` nodes.
    pub fn with_check_interval(
        model: &'a Model,
        time_limit: Duration,
        check_interval: u64,
    ) -> Self {
        let len_variables = model.registry().len();
        let store = model.constraints();
        Self {
            model,
            propagator: Propagator::new(store, len_variables),
            decider: Decider::new(),
            bound: UpperBound::new(store, len_variables),
            deadline: Deadline::start(time_limit, check_interval),
            time_limit,
            open_elsewhere: 0,
            solved_objective: 0,
            last_component: false,
            incumbent: None,
            stats: SearchStats::default(),
            improvements: Vec::new(),
            state: SearchState::Unexplored,
        }
    }

    /// Runs the search to completion or until the deadline expires.
    pub fn run(mut self) -> SolveResult {
        let model = self.model;
        let store = model.constraints();
        let len_variables = model.registry().len();
        info!(
            event = "solve_start",
            variables = len_variables,
            constraints = store.len(),
            time_limit = ?self.time_limit
        );
        let mut values = BoundedArray::with_len(len_variables, |_| false);
        let status = match self.propagator.propagate_root(store) {
            PropagationResult::Conflict(id) => {
                debug!(constraint = store[id].name(), "conflict before the first decision");
                self.stats.conflicts += 1;
                self.state = SearchState::Done;
                SolveStatus::Infeasible
            }
            PropagationResult::Consistent => self.search_components(&mut values),
        };
        let wall_time = self.deadline.elapsed();
        let (objective, assignment) = match status.has_solution() {
            true => {
                (
                    Some(self.solved_objective),
                    Some(Assignment::from_values(values)),
                )
            }
            false => (None, None),
        };
        info!(
            event = "solve_end",
            status = %status,
            state = ?self.state,
            objective = ?objective,
            components = self.stats.components,
            nodes = self.stats.nodes,
            conflicts = self.stats.conflicts,
            prunes = self.stats.prunes,
            wall_time = ?wall_time
        );
        SolveResult {
            status,
            state: self.state,
            assignment,
            objective,
            wall_time,
            stats: self.stats,
            improvements: self.improvements,
        }
    }

    /// Searches every component and merges their best values.
    fn search_components(&mut self, values: &mut BoundedArray<Variable, bool>) -> SolveStatus {
        let store = self.model.constraints();
        let components = partition(store, values.len());
        let root_open = self.propagator.open_exactly_one();
        for (index, component) in components.iter().enumerate() {
            self.stats.components += 1;
            self.open_elsewhere = root_open - self.open_in(component, store);
            self.last_component = index + 1 == components.len();
            self.incumbent = None;
            let flow = self.explore(component, 0);
            let incumbent = self.incumbent.take();
            if let Some(incumbent) = &incumbent {
                self.solved_objective += incumbent.objective;
                for (&variable, &value) in component.variables().iter().zip(&incumbent.values) {
                    values[variable] = value;
                }
            }
            match (flow, incumbent) {
                (Flow::Continue, Some(_)) => (),
                (Flow::Continue, None) => {
                    debug!(
                        component = index,
                        variables = component.variables().len(),
                        "component is infeasible"
                    );
                    self.state = SearchState::Done;
                    return SolveStatus::Infeasible
                }
                (Flow::Halt, Some(_)) if self.last_component => return SolveStatus::Feasible,
                (Flow::Halt, _) => return SolveStatus::Unknown,
            }
        }
        self.state = SearchState::Done;
        SolveStatus::Optimal
    }

    /// Returns the number of exactly-one constraints of the component without `true` variable.
    fn open_in(&self, component: &Component, store: &ConstraintStore) -> usize {
        component
            .constraints()
            .iter()
            .filter(|&&id| {
                store[id].kind() == ConstraintKind::ExactlyOne
                    && self.propagator.true_count(id) == 0
            })
            .count()
    }

    fn incumbent_objective(&self) -> Option<i64> {
        self.incumbent.as_ref().map(|incumbent| incumbent.objective)
    }

    /// Explores the subtree of the component below the current assignment.
    ///
    /// All component variables before position `start` are assigned.
    fn explore(&mut self, component: &Component, start: usize) -> Flow {
        let model = self.model;
        let store = model.constraints();
        self.stats.nodes += 1;
        if let Some(best) = self.incumbent_objective() {
            let bound = self
                .bound
                .compute(&self.propagator, store, model.objective(), component);
            if bound <= best {
                self.state = SearchState::BoundExceeded;
                self.stats.prunes += 1;
                return Flow::Continue
            }
        }
        let variables = component.variables();
        let position =
            match self
                .decider
                .next_unassigned(self.propagator.assignment(), variables, start)
            {
                Some(position) => position,
                None => {
                    self.record_leaf(component);
                    return Flow::Continue
                }
            };
        let open = self.propagator.open_exactly_one() - self.open_elsewhere;
        if open == 0 && !self.has_undecided_gain(&variables[position..]) {
            self.record_leaf(component);
            return Flow::Continue
        }
        self.state = SearchState::Branching;
        if self.deadline.poll() {
            return Flow::Halt
        }
        let variable = variables[position];
        for value in [true, false] {
            let level = self.propagator.bump_decision_level();
            self.state = SearchState::Propagating;
            match self.propagator.decide(variable, value, store) {
                PropagationResult::Conflict(_) => {
                    self.state = SearchState::Conflict;
                    self.stats.conflicts += 1;
                }
                PropagationResult::Consistent => {
                    if self.explore(component, position + 1) == Flow::Halt {
                        return Flow::Halt
                    }
                }
            }
            self.state = SearchState::Backtrack;
            self.propagator.pop_decision_level(level, store);
        }
        Flow::Continue
    }

    /// Returns `true` if one of the undecided variables has positive weight.
    fn has_undecided_gain(&self, variables: &[Variable]) -> bool {
        let assignment = self.propagator.assignment();
        let objective = self.model.objective();
        variables.iter().any(|&variable| {
            assignment.get(variable).is_unassigned() && objective.weight(variable) > 0
        })
    }

    /// Records the current values of the component if they beat its incumbent.
    ///
    /// Undecided variables are treated as `false`.
    fn record_leaf(&mut self, component: &Component) {
        self.state = SearchState::FeasibleLeaf;
        self.stats.leaves += 1;
        let assignment = self.propagator.assignment();
        let objective = self.model.objective();
        let values = component
            .variables()
            .iter()
            .map(|&variable| assignment.get(variable).is_true())
            .collect::<Vec<_>>();
        let value = component
            .variables()
            .iter()
            .zip(&values)
            .filter(|&(_, &value)| value)
            .map(|(&variable, _)| objective.weight(variable))
            .sum::<i64>();
        if self
            .incumbent_objective()
            .map_or(false, |best| value <= best)
        {
            return
        }
        debug!(
            event = "component_incumbent",
            objective = value,
            node = self.stats.nodes
        );
        if self.last_component {
            let improvement = Improvement {
                objective: self.solved_objective + value,
                node: self.stats.nodes,
                elapsed: self.deadline.elapsed(),
            };
            debug!(
                event = "incumbent",
                objective = improvement.objective,
                node = improvement.node,
                elapsed = ?improvement.elapsed
            );
            self.improvements.push(improvement);
        }
        self.incumbent = Some(Incumbent {
            objective: value,
            values,
        });
    }
}
