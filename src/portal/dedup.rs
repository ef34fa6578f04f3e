//! Course identity for de-duplicating rows seen across scroll snapshots.

use super::cells::cell_text;
use super::columns;
use crate::browser::{Element, Result};
use std::collections::HashSet;
use std::fmt;

const SEPARATOR: char = '|';

/// Identity of a grid row: code, name, professor and lecture time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CourseKey(String);

impl CourseKey {
    pub fn new(code: &str, name: &str, professor: &str, lecture_time: &str) -> Self {
        let mut key = String::with_capacity(
            code.len() + name.len() + professor.len() + lecture_time.len() + 3,
        );
        for (i, part) in [code, name, professor, lecture_time].into_iter().enumerate() {
            if i > 0 {
                key.push(SEPARATOR);
            }
            key.push_str(part);
        }
        Self(key)
    }

    /// Read the identity columns of a row. The caller guarantees the row is
    /// wide enough.
    pub async fn from_cells<E: Element>(cells: &[E]) -> Result<Self> {
        let code = cell_text(&cells[columns::CODE]).await?;
        let name = cell_text(&cells[columns::NAME]).await?;
        let professor = cell_text(&cells[columns::PROFESSOR]).await?;
        let lecture_time = cell_text(&cells[columns::LECTURE_TIME]).await?;
        Ok(Self::new(&code, &name, &professor, &lecture_time))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CourseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Keys already seen during one extraction run.
#[derive(Debug, Default)]
pub struct SeenCourses {
    keys: HashSet<CourseKey>,
}

impl SeenCourses {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `key`; `true` the first time it is seen.
    pub fn insert(&mut self, key: CourseKey) -> bool {
        self.keys.insert(key)
    }

    pub fn contains(&self, key: &CourseKey) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_joins_parts_in_order() {
        let key = CourseKey::new("COMP0204", "자료구조", "김교수", "화 09:00");
        assert_eq!(key.as_str(), "COMP0204|자료구조|김교수|화 09:00");
    }

    #[test]
    fn lecture_time_distinguishes_sections() {
        let a = CourseKey::new("COMP0204", "자료구조", "김교수", "화 09:00");
        let b = CourseKey::new("COMP0204", "자료구조", "김교수", "수 09:00");
        assert_ne!(a, b);
    }

    #[test]
    fn second_insert_is_rejected() {
        let mut seen = SeenCourses::new();
        assert!(seen.insert(CourseKey::new("A", "B", "C", "D")));
        assert!(!seen.insert(CourseKey::new("A", "B", "C", "D")));
        assert_eq!(seen.len(), 1);
    }
}
