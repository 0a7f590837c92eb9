//! Subjects file as produced by the course catalog export.

use indexmap::IndexMap;
use serde::Deserialize;
use timetable::{
    Catalog,
    CourseDescriptor,
};

/// Course code used for subjects without one.
const UNKNOWN_CODE: &str = "UNKNOWN";

#[derive(Debug, Deserialize)]
pub struct SubjectsFile {
    /// Levels in file order.
    pub niveau: IndexMap<String, LevelTerms>,
}

#[derive(Debug, Deserialize)]
pub struct LevelTerms {
    pub s1: Term,
    pub s2: Term,
}

#[derive(Debug, Default, Deserialize)]
pub struct Term {
    #[serde(default)]
    pub subjects: Vec<Subject>,
}

#[derive(Debug, Deserialize)]
pub struct Subject {
    #[serde(default = "unknown_code")]
    pub code: String,
    #[serde(rename = "Course Lecturer", default)]
    pub lecturers: Option<Lecturers>,
}

/// Either a single lecturer name or a list of them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Lecturers {
    One(String),
    Many(Vec<String>),
}

fn unknown_code() -> String {
    UNKNOWN_CODE.to_string()
}

impl Subject {
    fn into_descriptor(self) -> CourseDescriptor {
        let teachers = match self.lecturers {
            None => Vec::new(),
            Some(Lecturers::One(name)) if name.is_empty() => Vec::new(),
            Some(Lecturers::One(name)) => vec![name],
            Some(Lecturers::Many(names)) => names,
        };
        CourseDescriptor::new(self.code).with_teachers(teachers)
    }
}

impl SubjectsFile {
    /// Parses the subjects file from its JSON text.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Converts the file into a catalog, first term courses before second term courses.
    pub fn into_catalog(self) -> Catalog {
        let mut catalog = Catalog::new();
        for (name, terms) in self.niveau {
            catalog.add_level(
                name,
                terms.s1.subjects.into_iter().map(Subject::into_descriptor),
                terms.s2.subjects.into_iter().map(Subject::into_descriptor),
            );
        }
        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUBJECTS: &str = r#"{
        "niveau": {
            "L2": {
                "s1": { "subjects": [
                    { "code": "INF201", "Course Lecturer": ["Ada", "Alan"] },
                    { "Course Lecturer": "Grace" }
                ] },
                "s2": { "subjects": [
                    { "code": "INF202", "Course Lecturer": "" },
                    { "code": "INF203", "credits": 4 }
                ] }
            },
            "L1": {
                "s1": { "subjects": [] },
                "s2": {}
            }
        }
    }"#;

    #[test]
    fn subjects_file_keeps_level_and_term_order() {
        let catalog = SubjectsFile::from_json(SUBJECTS).unwrap().into_catalog();
        let levels = catalog.levels().collect::<Vec<_>>();
        assert_eq!(levels.len(), 2);
        assert_eq!(levels[0].name, "L2");
        assert_eq!(levels[1].name, "L1");
        assert!(levels[1].courses.is_empty());
        let codes = levels[0]
            .courses
            .iter()
            .map(|course| course.code.as_str())
            .collect::<Vec<_>>();
        assert_eq!(codes, ["INF201", "UNKNOWN", "INF202", "INF203"]);
    }

    #[test]
    fn lecturers_accept_string_or_list() {
        let catalog = SubjectsFile::from_json(SUBJECTS).unwrap().into_catalog();
        let courses = &catalog.levels().next().unwrap().courses;
        assert_eq!(courses[0].teachers, ["Ada", "Alan"]);
        assert_eq!(courses[1].teachers, ["Grace"]);
        assert!(courses[2].teachers.is_empty());
        assert!(courses[3].teachers.is_empty());
    }

    #[test]
    fn missing_levels_are_rejected() {
        assert!(SubjectsFile::from_json(r#"{ "levels": {} }"#).is_err());
    }
}
