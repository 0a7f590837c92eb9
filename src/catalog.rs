//! Course catalog handed over by the input collaborator.
//!
//! The catalog is raw: teacher lists may be empty and course codes may repeat.
//! Both are normalized when the [`Model`](crate::Model) is built.

/// A course as described by the input, before normalization.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CourseDescriptor {
    /// The course code, unique within its level after normalization.
    pub code: String,
    /// The ordered teacher names, possibly empty.
    pub teachers: Vec<String>,
}

impl CourseDescriptor {
    /// Creates a course descriptor without teachers.
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            teachers: Vec::new(),
        }
    }

    /// Appends a teacher name.
    pub fn with_teacher(mut self, teacher: impl Into<String>) -> Self {
        self.teachers.push(teacher.into());
        self
    }

    /// Replaces the teacher names.
    pub fn with_teachers<I, T>(mut self, teachers: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.teachers = teachers.into_iter().map(Into::into).collect();
        self
    }
}

/// An academic level with the courses of both half-year terms.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LevelEntry {
    pub name: String,
    /// Courses of the first term followed by the courses of the second term.
    pub courses: Vec<CourseDescriptor>,
}

/// Ordered collection of levels and their courses.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Catalog {
    levels: Vec<LevelEntry>,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a level whose courses are given as a single ordered list.
    pub fn with_level<I>(mut self, name: impl Into<String>, courses: I) -> Self
    where
        I: IntoIterator<Item = CourseDescriptor>,
    {
        self.push_level(name, courses);
        self
    }

    /// Adds a level with the courses of its first and second term.
    pub fn add_level<I, J>(&mut self, name: impl Into<String>, first_term: I, second_term: J)
    where
        I: IntoIterator<Item = CourseDescriptor>,
        J: IntoIterator<Item = CourseDescriptor>,
    {
        self.push_level(name, first_term.into_iter().chain(second_term))
    }

    fn push_level<I>(&mut self, name: impl Into<String>, courses: I)
    where
        I: IntoIterator<Item = CourseDescriptor>,
    {
        self.levels.push(LevelEntry {
            name: name.into(),
            courses: courses.into_iter().collect(),
        });
    }

    /// Returns the number of levels.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Returns `true` if the catalog holds no level.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Returns the levels in insertion order.
    pub fn levels(&self) -> core::slice::Iter<LevelEntry> {
        self.levels.iter()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a LevelEntry;
    type IntoIter = core::slice::Iter<'a, LevelEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.levels()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terms_are_concatenated_in_order() {
        let mut catalog = Catalog::new();
        catalog.add_level(
            "L1",
            vec![CourseDescriptor::new("A"), CourseDescriptor::new("B")],
            vec![CourseDescriptor::new("C")],
        );
        let level = catalog.levels().next().unwrap();
        let codes = level
            .courses
            .iter()
            .map(|course| course.code.as_str())
            .collect::<Vec<_>>();
        assert_eq!(codes, vec!["A", "B", "C"]);
    }

    #[test]
    fn descriptor_builder() {
        let course = CourseDescriptor::new("MAT101")
            .with_teacher("Ada")
            .with_teacher("Alan");
        assert_eq!(course.teachers, vec!["Ada", "Alan"]);
        let course = course.with_teachers(Vec::<String>::new());
        assert!(course.teachers.is_empty());
    }
}
