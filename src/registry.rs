use crate::{
    calendar::{
        Calendar,
        Day,
        Period,
    },
    utils::{
        BoundedArray,
        HashMap,
        Index,
    },
};
use core::fmt::{
    self,
    Display,
};
use thiserror::Error;

/// Generates a `u32` backed identifier usable as bounded array key.
macro_rules! define_id {
    ( $(#[$attr:meta])* $name:ident, $prefix:literal ) => {
        $(#[$attr])*
        #[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(transparent)]
        pub struct $name(u32);

        impl Index for $name {
            #[inline]
            fn from_index(index: usize) -> Self {
                Self(u32::try_from(index).expect("encountered out of range identifier"))
            }

            #[inline]
            fn into_index(self) -> usize {
                self.0 as usize
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

define_id!(
    /// A boolean decision variable.
    Variable,
    "x"
);
define_id!(
    /// Identifies a level of a model.
    LevelId,
    "level#"
);
define_id!(
    /// Identifies a course of a model, across all levels.
    CourseId,
    "course#"
);

impl Variable {
    /// The maximum supported number of unique variables.
    pub const MAX_LEN: usize = u32::MAX as usize;
}

/// The current value of a decision variable.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub enum VarValue {
    #[default]
    Unassigned,
    True,
    False,
}

impl VarValue {
    /// Returns `true` if the variable has not been assigned, yet.
    #[inline]
    pub fn is_unassigned(self) -> bool {
        matches!(self, Self::Unassigned)
    }

    /// Returns `true` if the variable is assigned to `true`.
    #[inline]
    pub fn is_true(self) -> bool {
        matches!(self, Self::True)
    }

    /// Returns the assigned boolean if any.
    #[inline]
    pub fn to_bool(self) -> Option<bool> {
        match self {
            Self::Unassigned => None,
            Self::True => Some(true),
            Self::False => Some(false),
        }
    }
}

impl From<bool> for VarValue {
    #[inline]
    fn from(value: bool) -> Self {
        match value {
            true => Self::True,
            false => Self::False,
        }
    }
}

/// Read access to variable values of an assignment.
pub trait Valuation {
    /// Returns the value of the variable under the assignment.
    ///
    /// # Panics
    ///
    /// Implementers may panic if the variable is out of bounds.
    fn value(&self, variable: Variable) -> VarValue;
}

/// The key of a decision variable: course `course` of `level` placed at `period` on `day`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VarKey {
    pub level: LevelId,
    pub course: CourseId,
    pub day: Day,
    pub period: Period,
}

impl VarKey {
    pub fn new(level: LevelId, course: CourseId, day: Day, period: Period) -> Self {
        Self {
            level,
            course,
            day,
            period,
        }
    }
}

/// Errors that may occur when declaring variables.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("day {day} is outside of the {days} day week")]
    DayOutOfRange { day: Day, days: usize },
    #[error("period {period} is outside of periods 1..={periods}")]
    PeriodOutOfRange { period: Period, periods: usize },
    #[error("{course} was declared for {declared} and cannot be declared for {requested}")]
    MismatchedDeclaration {
        course: CourseId,
        declared: LevelId,
        requested: LevelId,
    },
    #[error("variable {0} is not registered")]
    UnknownVariable(Variable),
    #[error("too many variables in use")]
    TooManyVariables,
}

/// Allocates and indexes one decision variable per [`VarKey`].
#[derive(Debug, Default, Clone)]
pub struct Registry {
    calendar: Calendar,
    keys: BoundedArray<Variable, VarKey>,
    variables: HashMap<VarKey, Variable>,
    course_levels: HashMap<CourseId, LevelId>,
}

impl Registry {
    /// Creates an empty registry for keys within the calendar.
    pub fn new(calendar: Calendar) -> Self {
        Self {
            calendar,
            ..Default::default()
        }
    }

    /// Returns the calendar bounding the keys of the registry.
    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    /// Returns the number of declared variables.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns `true` if no variable has been declared.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Returns `true` if the variable has been declared by this registry.
    pub fn contains(&self, variable: Variable) -> bool {
        self.keys.contains_key(variable)
    }

    /// Declares the variable for the key and returns it.
    ///
    /// Declaring an already declared key returns the same variable.
    ///
    /// # Errors
    ///
    /// - If day or period of the key are outside of the calendar.
    /// - If the course of the key has been declared for another level.
    pub fn declare(&mut self, key: VarKey) -> Result<Variable, RegistryError> {
        if let Some(&variable) = self.variables.get(&key) {
            return Ok(variable)
        }
        if !self.calendar.contains_day(key.day) {
            return Err(RegistryError::DayOutOfRange {
                day: key.day,
                days: self.calendar.len_days(),
            })
        }
        if !self.calendar.contains_period(key.period) {
            return Err(RegistryError::PeriodOutOfRange {
                period: key.period,
                periods: self.calendar.len_periods(),
            })
        }
        let declared = *self.course_levels.entry(key.course).or_insert(key.level);
        if declared != key.level {
            return Err(RegistryError::MismatchedDeclaration {
                course: key.course,
                declared,
                requested: key.level,
            })
        }
        if self.len() >= Variable::MAX_LEN {
            return Err(RegistryError::TooManyVariables)
        }
        let variable = self.keys.push(key);
        self.variables.insert(key, variable);
        Ok(variable)
    }

    /// Returns the variable declared for the key if any.
    pub fn lookup(&self, key: &VarKey) -> Option<Variable> {
        self.variables.get(key).copied()
    }

    /// Returns the key the variable has been declared with.
    pub fn key(&self, variable: Variable) -> Option<&VarKey> {
        self.keys.get(variable)
    }

    /// Returns the value of the variable under the given assignment.
    ///
    /// # Errors
    ///
    /// If the variable has not been declared by this registry.
    pub fn value<V>(&self, variable: Variable, valuation: &V) -> Result<VarValue, RegistryError>
    where
        V: Valuation + ?Sized,
    {
        if !self.contains(variable) {
            return Err(RegistryError::UnknownVariable(variable))
        }
        Ok(valuation.value(variable))
    }

    /// Returns an iterator over all variables and their keys in declaration order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (Variable, &VarKey)> {
        self.keys.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(level: usize, course: usize, day: u8, period: u8) -> VarKey {
        VarKey::new(
            LevelId::from_index(level),
            CourseId::from_index(course),
            Day::new(day),
            Period::new(period),
        )
    }

    #[test]
    fn declare_is_idempotent() {
        let mut registry = Registry::new(Calendar::default());
        let a = registry.declare(key(0, 0, 0, 1)).unwrap();
        let b = registry.declare(key(0, 0, 0, 2)).unwrap();
        assert_ne!(a, b);
        assert_eq!(registry.declare(key(0, 0, 0, 1)), Ok(a));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.lookup(&key(0, 0, 0, 2)), Some(b));
        assert_eq!(registry.lookup(&key(0, 0, 1, 2)), None);
        assert_eq!(registry.key(b), Some(&key(0, 0, 0, 2)));
    }

    #[test]
    fn course_bound_to_first_level() {
        let mut registry = Registry::new(Calendar::default());
        registry.declare(key(0, 7, 0, 1)).unwrap();
        assert_eq!(
            registry.declare(key(1, 7, 0, 1)),
            Err(RegistryError::MismatchedDeclaration {
                course: CourseId::from_index(7),
                declared: LevelId::from_index(0),
                requested: LevelId::from_index(1),
            })
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn keys_outside_of_calendar_are_rejected() {
        let mut registry = Registry::new(Calendar::new(2, 3));
        assert_eq!(
            registry.declare(key(0, 0, 2, 1)),
            Err(RegistryError::DayOutOfRange {
                day: Day::new(2),
                days: 2
            })
        );
        assert_eq!(
            registry.declare(key(0, 0, 1, 0)),
            Err(RegistryError::PeriodOutOfRange {
                period: Period::new(0),
                periods: 3
            })
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn value_of_unknown_variable_is_an_error() {
        struct AllTrue;
        impl Valuation for AllTrue {
            fn value(&self, _variable: Variable) -> VarValue {
                VarValue::True
            }
        }
        let mut registry = Registry::new(Calendar::default());
        let a = registry.declare(key(0, 0, 0, 1)).unwrap();
        assert_eq!(registry.value(a, &AllTrue), Ok(VarValue::True));
        let unknown = Variable::from_index(1);
        assert_eq!(
            registry.value(unknown, &AllTrue),
            Err(RegistryError::UnknownVariable(unknown))
        );
    }
}
