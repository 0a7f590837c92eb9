use crate::{
    calendar::{
        Calendar,
        Day,
        Period,
    },
    registry::{
        CourseId,
        LevelId,
        Variable,
    },
    search::SolveResult,
    utils::HashSet,
    Model,
};
use core::fmt::{
    self,
    Display,
};
use thiserror::Error;

/// Errors that may occur when extracting a timetable from a search result.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("the search result carries no solution")]
    NoSolution,
    #[error("the solution has {found} variables but the model declares {expected}")]
    ModelMismatch { expected: usize, found: usize },
    #[error("variable {0} is not declared by the model")]
    UnknownVariable(Variable),
    #[error("level {level} has more than one course on day {day} in period {period}")]
    InvariantViolation {
        level: String,
        day: Day,
        period: Period,
    },
}

/// A course placed for a level in some slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    level_id: LevelId,
    course_id: CourseId,
    level: String,
    course: String,
    teachers: Vec<String>,
}

impl Entry {
    pub fn level_id(&self) -> LevelId {
        self.level_id
    }

    pub fn course_id(&self) -> CourseId {
        self.course_id
    }

    /// Returns the name of the level.
    pub fn level(&self) -> &str {
        &self.level
    }

    /// Returns the code of the course.
    pub fn course(&self) -> &str {
        &self.course
    }

    pub fn teachers(&self) -> &[String] {
        &self.teachers
    }
}

impl Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Level {} : Course {} ({})",
            self.level,
            self.course,
            self.teachers.join(", ")
        )
    }
}

/// The entries of a single (day, period) slot in level order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    day: Day,
    period: Period,
    entries: Vec<Entry>,
}

impl Slot {
    pub fn day(&self) -> Day {
        self.day
    }

    pub fn period(&self) -> Period {
        self.period
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }
}

/// A solved weekly timetable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timetable {
    calendar: Calendar,
    /// Stored in day major order.
    slots: Vec<Slot>,
}

impl Timetable {
    /// Extracts the timetable from the best assignment of the search result.
    ///
    /// # Errors
    ///
    /// - If the result has no solution.
    /// - If the result does not belong to the model.
    /// - If a level is given more than one course in the same slot.
    pub fn extract(model: &Model, result: &SolveResult) -> Result<Self, ExtractError> {
        let assignment = result.assignment().ok_or(ExtractError::NoSolution)?;
        let registry = model.registry();
        if assignment.len() != registry.len() {
            return Err(ExtractError::ModelMismatch {
                expected: registry.len(),
                found: assignment.len(),
            })
        }
        let calendar = *model.calendar();
        let mut slots = calendar
            .slots()
            .map(|(day, period)| {
                Slot {
                    day,
                    period,
                    entries: Vec::new(),
                }
            })
            .collect::<Vec<_>>();
        let mut occupied = HashSet::default();
        for variable in assignment.iter_true() {
            let key = registry
                .key(variable)
                .ok_or(ExtractError::UnknownVariable(variable))?;
            let level = model
                .level(key.level)
                .expect("encountered unexpected variable of an unknown level");
            if !occupied.insert((key.level, key.day, key.period)) {
                return Err(ExtractError::InvariantViolation {
                    level: level.name().to_string(),
                    day: key.day,
                    period: key.period,
                })
            }
            let course = model
                .course(key.course)
                .expect("encountered unexpected variable of an unknown course");
            let index = usize::from(key.day.get()) * calendar.len_periods()
                + usize::from(key.period.get() - 1);
            slots[index].entries.push(Entry {
                level_id: key.level,
                course_id: key.course,
                level: level.name().to_string(),
                course: course.code().to_string(),
                teachers: course.teachers().to_vec(),
            });
        }
        for slot in &mut slots {
            slot.entries.sort_by_key(|entry| entry.level_id);
        }
        Ok(Self { calendar, slots })
    }

    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    /// Returns the slot at the day and period if it is part of the week.
    pub fn slot(&self, day: Day, period: Period) -> Option<&Slot> {
        if !self.calendar.contains_day(day) || !self.calendar.contains_period(period) {
            return None
        }
        let index = usize::from(day.get()) * self.calendar.len_periods()
            + usize::from(period.get() - 1);
        self.slots.get(index)
    }

    /// Returns all slots in day major order.
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Returns the number of placed courses.
    pub fn assigned_shifts(&self) -> usize {
        self.slots.iter().map(|slot| slot.entries.len()).sum()
    }
}

impl Display for Timetable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (n, day) in self.calendar.days().enumerate() {
            if n > 0 {
                writeln!(f)?;
            }
            writeln!(f, "Day {}:", day)?;
            for slot in self.slots.iter().filter(|slot| slot.day == day) {
                for entry in &slot.entries {
                    writeln!(f, "{} (Period {})", entry, slot.period)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        assignment::Assignment,
        solve,
        utils::BoundedArray,
        Catalog,
        CourseDescriptor,
        SolveConfig,
    };
    use std::time::Duration;

    fn two_course_model() -> Model {
        let catalog = Catalog::new().with_level(
            "L1",
            vec![
                CourseDescriptor::new("MAT101").with_teachers(["Ada", "Alan"]),
                CourseDescriptor::new("PHY101"),
            ],
        );
        Model::build(&catalog, &SolveConfig::default()).unwrap()
    }

    #[test]
    fn extract_places_every_course_once() {
        let model = two_course_model();
        let result = solve(&model, Duration::from_secs(10));
        let timetable = Timetable::extract(&model, &result).unwrap();
        assert_eq!(timetable.assigned_shifts(), 2);
        let first = timetable.slot(Day::new(0), Period::new(1)).unwrap();
        assert_eq!(first.entries().len(), 1);
        assert_eq!(first.entries()[0].course(), "MAT101");
        assert_eq!(first.entries()[0].teachers(), ["Ada", "Alan"]);
        let second = timetable.slot(Day::new(1), Period::new(1)).unwrap();
        assert_eq!(second.entries()[0].course(), "PHY101");
        assert_eq!(second.entries()[0].teachers(), ["unknown"]);
        assert!(timetable.slot(Day::new(5), Period::new(1)).is_none());
        assert!(timetable.slot(Day::new(0), Period::new(0)).is_none());
    }

    #[test]
    fn display_lists_days_in_order() {
        let model = two_course_model();
        let result = solve(&model, Duration::from_secs(10));
        let rendered = Timetable::extract(&model, &result).unwrap().to_string();
        let expected = "\
Day 0:
Level L1 : Course MAT101 (Ada, Alan) (Period 1)

Day 1:
Level L1 : Course PHY101 (unknown) (Period 1)

Day 2:

Day 3:

Day 4:
";
        assert_eq!(rendered, expected);
    }

    #[test]
    fn extraction_is_idempotent() {
        let model = two_course_model();
        let result = solve(&model, Duration::from_secs(10));
        let first = Timetable::extract(&model, &result).unwrap();
        let second = Timetable::extract(&model, &result).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.to_string(), second.to_string());
    }

    #[test]
    fn two_courses_of_a_level_in_one_slot_are_rejected() {
        let model = two_course_model();
        let level = model.levels().next().unwrap();
        let (day, period) = (Day::new(2), Period::new(3));
        let clashing = level
            .courses()
            .iter()
            .map(|&course| model.variable(course, day, period).unwrap())
            .collect::<Vec<_>>();
        assert_eq!(clashing.len(), 2);
        let assignment = Assignment::from_values(BoundedArray::with_len(
            model.registry().len(),
            |variable| clashing.contains(&variable),
        ));
        let result = SolveResult::with_assignment(assignment, -2);
        assert_eq!(
            Timetable::extract(&model, &result),
            Err(ExtractError::InvariantViolation {
                level: "L1".to_string(),
                day,
                period,
            })
        );
    }

    #[test]
    fn result_without_solution_is_rejected() {
        let catalog = Catalog::new().with_level(
            "L1",
            (0..3).map(|n| CourseDescriptor::new(format!("C{}", n))),
        );
        let config = SolveConfig::default()
            .with_calendar(2, 1)
            .with_period_weights([1]);
        let model = Model::build(&catalog, &config).unwrap();
        let result = solve(&model, Duration::from_secs(10));
        assert_eq!(
            Timetable::extract(&model, &result),
            Err(ExtractError::NoSolution)
        );
    }

    #[test]
    fn result_of_another_model_is_rejected() {
        let model = two_course_model();
        let other = Model::build(&Catalog::new(), &SolveConfig::default()).unwrap();
        let result = solve(&other, Duration::from_secs(10));
        assert_eq!(
            Timetable::extract(&model, &result),
            Err(ExtractError::ModelMismatch {
                expected: 50,
                found: 0,
            })
        );
    }
}
