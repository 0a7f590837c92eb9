use crate::{
    calendar::{
        Calendar,
        Day,
        Period,
    },
    catalog::Catalog,
    config::{
        ConfigError,
        SolveConfig,
    },
    constraint::{
        ConstraintError,
        ConstraintStore,
    },
    objective::Objective,
    registry::{
        CourseId,
        LevelId,
        Registry,
        RegistryError,
        VarKey,
        Variable,
    },
    utils::{
        BoundedArray,
        HashSet,
        Index,
    },
};
use thiserror::Error;
use tracing::{
    debug,
    warn,
};

/// Errors that may occur while building a model.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Constraint(#[from] ConstraintError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// An academic level of the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Level {
    id: LevelId,
    name: String,
    courses: Vec<CourseId>,
}

impl Level {
    pub fn id(&self) -> LevelId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the courses of the level in catalog order.
    pub fn courses(&self) -> &[CourseId] {
        &self.courses
    }
}

/// A course of a level with its normalized teacher names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    id: CourseId,
    level: LevelId,
    code: String,
    teachers: Vec<String>,
}

impl Course {
    pub fn id(&self) -> CourseId {
        self.id
    }

    pub fn level(&self) -> LevelId {
        self.level
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    /// Returns the teacher names, never empty.
    pub fn teachers(&self) -> &[String] {
        &self.teachers
    }
}

/// A weekly timetabling problem ready to be solved.
///
/// Owns the variable registry, the constraint store and the objective.
///
/// - For every (level, day) at most one course may be placed over all periods.
/// - For every (level, course, day) at most one period may be used.
/// - Every course of a level is placed exactly once per week.
///
/// The objective sums the period weight of every placed course.
#[derive(Debug, Clone)]
pub struct Model {
    levels: BoundedArray<LevelId, Level>,
    courses: BoundedArray<CourseId, Course>,
    registry: Registry,
    constraints: ConstraintStore,
    objective: Objective,
}

impl Model {
    /// Builds the model for the catalog.
    ///
    /// Teacher lists are normalized: courses without teachers get the
    /// configured placeholder. Repeated course codes of a level are dropped
    /// after their first occurrence. Levels without courses are kept but
    /// contribute neither variables nor constraints.
    ///
    /// # Errors
    ///
    /// If the configuration is invalid.
    pub fn build(catalog: &Catalog, config: &SolveConfig) -> Result<Self, ModelError> {
        config.validate()?;
        let calendar = config.calendar();
        let weights = config.period_weights();
        let mut model = Self {
            levels: BoundedArray::default(),
            courses: BoundedArray::default(),
            registry: Registry::new(calendar),
            constraints: ConstraintStore::new(),
            objective: Objective::new(),
        };
        for entry in catalog {
            let level_id = model.levels.push(Level {
                id: LevelId::from_index(model.levels.len()),
                name: entry.name.clone(),
                courses: Vec::new(),
            });
            let mut seen = HashSet::default();
            for descriptor in &entry.courses {
                if !seen.insert(descriptor.code.as_str()) {
                    warn!(
                        level = %entry.name,
                        course = %descriptor.code,
                        "ignoring repeated course code"
                    );
                    continue
                }
                let teachers = match descriptor.teachers.is_empty() {
                    true => vec![config.unknown_teacher.clone()],
                    false => descriptor.teachers.clone(),
                };
                let course_id = model.courses.push(Course {
                    id: CourseId::from_index(model.courses.len()),
                    level: level_id,
                    code: descriptor.code.clone(),
                    teachers,
                });
                model.levels[level_id].courses.push(course_id);
            }
        }
        model.declare_variables(&calendar, |period| {
            weights.get(period).unwrap_or(0)
        })?;
        model.add_constraints(&calendar)?;
        debug!(
            levels = model.levels.len(),
            courses = model.courses.len(),
            variables = model.registry.len(),
            constraints = model.constraints.len(),
            "built timetable model"
        );
        Ok(model)
    }

    /// Declares the variables in (level, course, day, period) order.
    fn declare_variables<F>(&mut self, calendar: &Calendar, weight: F) -> Result<(), ModelError>
    where
        F: Fn(Period) -> i64,
    {
        for (level_id, level) in &self.levels {
            for &course in level.courses() {
                for (day, period) in calendar.slots() {
                    let variable = self
                        .registry
                        .declare(VarKey::new(level_id, course, day, period))?;
                    self.objective.set_weight(variable, weight(period));
                }
            }
        }
        Ok(())
    }

    fn add_constraints(&mut self, calendar: &Calendar) -> Result<(), ModelError> {
        let registry = &self.registry;
        let constraints = &mut self.constraints;
        let lookup = |level, course, day, period| -> Variable {
            registry
                .lookup(&VarKey::new(level, course, day, period))
                .expect("encountered unexpected undeclared variable")
        };
        for (level_id, level) in &self.levels {
            if level.courses().is_empty() {
                continue
            }
            for day in calendar.days() {
                let mut group = Vec::with_capacity(level.courses().len() * calendar.len_periods());
                for &course in level.courses() {
                    group.extend(
                        calendar
                            .periods()
                            .map(|period| lookup(level_id, course, day, period)),
                    );
                }
                constraints.add_at_most_one(
                    registry,
                    format!("one course per day: level {} day {}", level.name(), day),
                    group,
                )?;
            }
            for &course_id in level.courses() {
                let code = self.courses[course_id].code();
                for day in calendar.days() {
                    let group: Vec<_> = calendar
                        .periods()
                        .map(|period| lookup(level_id, course_id, day, period))
                        .collect();
                    constraints.add_at_most_one(
                        registry,
                        format!(
                            "one period per course and day: level {} course {} day {}",
                            level.name(),
                            code,
                            day
                        ),
                        group,
                    )?;
                }
                let group: Vec<_> = calendar
                    .slots()
                    .map(|(day, period)| lookup(level_id, course_id, day, period))
                    .collect();
                constraints.add_exactly_one(
                    registry,
                    format!("once per week: level {} course {}", level.name(), code),
                    group,
                )?;
            }
        }
        Ok(())
    }

    /// Returns the levels in catalog order.
    pub fn levels(&self) -> impl ExactSizeIterator<Item = &Level> {
        self.levels.iter().map(|(_, level)| level)
    }

    pub fn level(&self, id: LevelId) -> Option<&Level> {
        self.levels.get(id)
    }

    pub fn course(&self, id: CourseId) -> Option<&Course> {
        self.courses.get(id)
    }

    /// Returns the total number of courses over all levels.
    pub fn len_courses(&self) -> usize {
        self.courses.len()
    }

    pub fn calendar(&self) -> &Calendar {
        self.registry.calendar()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn constraints(&self) -> &ConstraintStore {
        &self.constraints
    }

    pub fn objective(&self) -> &Objective {
        &self.objective
    }

    /// Returns the variable of the course placed at the slot.
    pub fn variable(&self, course: CourseId, day: Day, period: Period) -> Option<Variable> {
        let level = self.course(course)?.level();
        self.registry
            .lookup(&VarKey::new(level, course, day, period))
    }
}
