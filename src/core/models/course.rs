//! Course model

use super::{CourseId, DepartmentId};
use crate::core::errors::CatalogError;
use serde::{Deserialize, Serialize};

/// Represents a course in the catalog
///
/// Prerequisites are not stored here; they live in the catalog's
/// [`PrerequisiteGraph`](super::PrerequisiteGraph) so every edge goes through
/// the cycle check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    /// Unique course key (e.g., "CS2510")
    course_id: CourseId,

    /// Course title (e.g., "Fundamentals of Computer Science II")
    pub title: String,

    /// Free-form description
    #[serde(default)]
    pub description: String,

    /// Credit hours (positive)
    credit_hours: u32,

    /// Seat limit applied to every offering of the course (positive)
    max_capacity: u32,

    /// Owning department, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    department: Option<DepartmentId>,
}

impl Course {
    /// Create a new course
    ///
    /// # Arguments
    /// * `course_id` - Unique course key
    /// * `title` - Course title
    /// * `credit_hours` - Credit hours, must be positive
    /// * `max_capacity` - Seats per offering, must be positive
    ///
    /// # Errors
    /// Returns [`CatalogError::InvalidCourse`] for an empty id or a zero credit/capacity value
    pub fn new(
        course_id: impl Into<CourseId>,
        title: impl Into<String>,
        credit_hours: u32,
        max_capacity: u32,
    ) -> Result<Self, CatalogError> {
        let course = Self {
            course_id: course_id.into(),
            title: title.into(),
            description: String::new(),
            credit_hours,
            max_capacity,
            department: None,
        };
        course.validate()?;
        Ok(course)
    }

    /// Check the id, credit and capacity invariants
    ///
    /// # Errors
    /// Returns [`CatalogError::InvalidCourse`] naming the violated rule
    pub fn validate(&self) -> Result<(), CatalogError> {
        let reason = if self.course_id.trim().is_empty() {
            "course id must not be empty"
        } else if self.credit_hours == 0 {
            "credit hours must be positive"
        } else if self.max_capacity == 0 {
            "max capacity must be positive"
        } else {
            return Ok(());
        };
        Err(CatalogError::InvalidCourse {
            course: self.course_id.clone(),
            reason,
        })
    }

    /// Builder-style description setter
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Course key
    #[must_use]
    pub fn id(&self) -> &str {
        &self.course_id
    }

    /// Credit hours
    #[must_use]
    pub const fn credit_hours(&self) -> u32 {
        self.credit_hours
    }

    /// Seat limit per offering
    #[must_use]
    pub const fn max_capacity(&self) -> u32 {
        self.max_capacity
    }

    /// Owning department
    #[must_use]
    pub fn department(&self) -> Option<&str> {
        self.department.as_deref()
    }

    /// Change credit hours
    ///
    /// # Errors
    /// Returns [`CatalogError::InvalidCourse`] when `credit_hours` is zero
    pub fn set_credit_hours(&mut self, credit_hours: u32) -> Result<(), CatalogError> {
        if credit_hours == 0 {
            return Err(CatalogError::InvalidCourse {
                course: self.course_id.clone(),
                reason: "credit hours must be positive",
            });
        }
        self.credit_hours = credit_hours;
        Ok(())
    }

    /// Change the seat limit
    ///
    /// # Errors
    /// Returns [`CatalogError::InvalidCourse`] when `max_capacity` is zero
    pub fn set_max_capacity(&mut self, max_capacity: u32) -> Result<(), CatalogError> {
        if max_capacity == 0 {
            return Err(CatalogError::InvalidCourse {
                course: self.course_id.clone(),
                reason: "max capacity must be positive",
            });
        }
        self.max_capacity = max_capacity;
        Ok(())
    }

    pub(crate) fn set_department(&mut self, department: Option<DepartmentId>) {
        self.department = department;
    }
}
