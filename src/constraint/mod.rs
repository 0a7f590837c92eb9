mod occurrences;


pub use self::occurrences::OccurrenceMap;
use crate::{
    registry::{
        Registry,
        Variable,
    },
    utils::{
        BoundedArray,
        HashSet,
        Index,
    },
};
use core::{
    fmt::{
        self,
        Display,
    },
    slice,
};
use thiserror::Error;

/// Identifies a constraint of a [`ConstraintStore`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ConstraintId(u32);

impl Index for ConstraintId {
    #[inline]
    fn from_index(index: usize) -> Self {
        Self(u32::try_from(index).expect("encountered out of range constraint index"))
    }

    #[inline]
    fn into_index(self) -> usize {
        self.0 as usize
    }
}

impl Display for ConstraintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

/// The cardinality bound of a constraint.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ConstraintKind {
    /// At most one variable of the group may be `true`.
    AtMostOne,
    /// Exactly one variable of the group must be `true`.
    ExactlyOne,
}

impl Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AtMostOne => write!(f, "at-most-one"),
            Self::ExactlyOne => write!(f, "exactly-one"),
        }
    }
}

/// A cardinality constraint over a named group of variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    kind: ConstraintKind,
    name: String,
    group: Box<[Variable]>,
}

impl Constraint {
    pub fn kind(&self) -> ConstraintKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the variables of the group in insertion order.
    pub fn group(&self) -> &[Variable] {
        &self.group
    }

    /// Returns `true` if the number of `true` variables satisfies the bound.
    pub fn is_satisfied_by(&self, true_count: usize) -> bool {
        match self.kind {
            ConstraintKind::AtMostOne => true_count <= 1,
            ConstraintKind::ExactlyOne => true_count == 1,
        }
    }
}

/// Errors that may occur when adding constraints.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConstraintError {
    #[error("constraint `{name}` has an empty group")]
    EmptyGroup { name: String },
    #[error("constraint `{name}` refers to unknown variable {variable}")]
    UnknownVariable { name: String, variable: Variable },
    #[error("constraint `{name}` contains variable {variable} more than once")]
    DuplicateVariable { name: String, variable: Variable },
}

/// Holds the cardinality constraints of a model.
#[derive(Debug, Default, Clone)]
pub struct ConstraintStore {
    constraints: BoundedArray<ConstraintId, Constraint>,
    occurrences: OccurrenceMap,
    len_exactly_one: usize,
}

impl ConstraintStore {
    /// Creates an empty constraint store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of constraints.
    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    /// Returns `true` if the store holds no constraint.
    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Returns the number of exactly-one constraints.
    pub fn len_exactly_one(&self) -> usize {
        self.len_exactly_one
    }

    /// Adds an at-most-one constraint over the group.
    ///
    /// # Errors
    ///
    /// If the group is empty, contains a duplicate or a variable unknown to the registry.
    pub fn add_at_most_one<I>(
        &mut self,
        registry: &Registry,
        name: impl Into<String>,
        group: I,
    ) -> Result<ConstraintId, ConstraintError>
    where
        I: IntoIterator<Item = Variable>,
    {
        self.add(registry, ConstraintKind::AtMostOne, name.into(), group)
    }

    /// Adds an exactly-one constraint over the group.
    ///
    /// # Errors
    ///
    /// If the group is empty, contains a duplicate or a variable unknown to the registry.
    pub fn add_exactly_one<I>(
        &mut self,
        registry: &Registry,
        name: impl Into<String>,
        group: I,
    ) -> Result<ConstraintId, ConstraintError>
    where
        I: IntoIterator<Item = Variable>,
    {
        self.add(registry, ConstraintKind::ExactlyOne, name.into(), group)
    }

    fn add<I>(
        &mut self,
        registry: &Registry,
        kind: ConstraintKind,
        name: String,
        group: I,
    ) -> Result<ConstraintId, ConstraintError>
    where
        I: IntoIterator<Item = Variable>,
    {
        let group = group.into_iter().collect::<Box<[_]>>();
        if group.is_empty() {
            return Err(ConstraintError::EmptyGroup { name })
        }
        let mut seen = HashSet::default();
        for &variable in group.iter() {
            if !registry.contains(variable) {
                return Err(ConstraintError::UnknownVariable { name, variable })
            }
            if !seen.insert(variable) {
                return Err(ConstraintError::DuplicateVariable { name, variable })
            }
        }
        self.occurrences.register_variables(registry.len());
        let id = ConstraintId::from_index(self.len());
        for &variable in group.iter() {
            self.occurrences.register(variable, id);
        }
        if kind == ConstraintKind::ExactlyOne {
            self.len_exactly_one += 1;
        }
        self.constraints.push(Constraint { kind, name, group });
        Ok(id)
    }

    /// Returns the constraint if it exists.
    pub fn get(&self, id: ConstraintId) -> Option<&Constraint> {
        self.constraints.get(id)
    }

    /// Returns the constraints containing the variable.
    pub fn occurrences(&self, variable: Variable) -> &[ConstraintId] {
        self.occurrences.get(variable)
    }

    /// Returns an iterator over all constraints in insertion order.
    pub fn iter(&self) -> ConstraintIter {
        ConstraintIter {
            iter: self.constraints.as_slice().iter(),
            current: 0,
        }
    }
}

impl core::ops::Index<ConstraintId> for ConstraintStore {
    type Output = Constraint;

    fn index(&self, id: ConstraintId) -> &Self::Output {
        &self.constraints[id]
    }
}

impl<'a> IntoIterator for &'a ConstraintStore {
    type Item = (ConstraintId, &'a Constraint);
    type IntoIter = ConstraintIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the constraints of a store and their identifiers.
pub struct ConstraintIter<'a> {
    iter: slice::Iter<'a, Constraint>,
    current: usize,
}

impl<'a> Iterator for ConstraintIter<'a> {
    type Item = (ConstraintId, &'a Constraint);

    fn next(&mut self) -> Option<Self::Item> {
        let constraint = self.iter.next()?;
        let id = ConstraintId::from_index(self.current);
        self.current += 1;
        Some((id, constraint))
    }
}
