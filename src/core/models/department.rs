//! Department model

use super::{CourseId, DepartmentId, UserId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// An academic department
///
/// Member and course sets mirror the `department` field on faculty and
/// courses; the catalog keeps both sides in step and rebuilds the sets on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    department_id: DepartmentId,
    /// Department name
    pub name: String,
    #[serde(skip)]
    faculty: BTreeSet<UserId>,
    #[serde(skip)]
    courses: BTreeSet<CourseId>,
}

impl Department {
    /// Create an empty department
    #[must_use]
    pub const fn new(department_id: DepartmentId, name: String) -> Self {
        Self {
            department_id,
            name,
            faculty: BTreeSet::new(),
            courses: BTreeSet::new(),
        }
    }

    /// Department key
    #[must_use]
    pub fn id(&self) -> &str {
        &self.department_id
    }

    /// Member faculty ids (a copy)
    #[must_use]
    pub fn faculty(&self) -> Vec<UserId> {
        self.faculty.iter().cloned().collect()
    }

    /// Offered course ids (a copy)
    #[must_use]
    pub fn courses(&self) -> Vec<CourseId> {
        self.courses.iter().cloned().collect()
    }

    pub(crate) fn add_faculty(&mut self, user: UserId) -> bool {
        self.faculty.insert(user)
    }

    pub(crate) fn remove_faculty(&mut self, user: &str) -> bool {
        self.faculty.remove(user)
    }

    pub(crate) fn add_course(&mut self, course: CourseId) -> bool {
        self.courses.insert(course)
    }

    pub(crate) fn remove_course(&mut self, course: &str) -> bool {
        self.courses.remove(course)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership_sets_deduplicate() {
        let mut dept = Department::new("CS".to_string(), "Computer Science".to_string());
        assert!(dept.add_faculty("u2".to_string()));
        assert!(!dept.add_faculty("u2".to_string()));
        assert!(dept.add_course("CS2510".to_string()));
        assert_eq!(dept.faculty(), vec!["u2".to_string()]);
        assert_eq!(dept.courses(), vec!["CS2510".to_string()]);
        assert!(dept.remove_course("CS2510"));
        assert!(!dept.remove_faculty("u9"));
    }
}
