//! Data models for academic records
//!
//! Entities refer to each other by identifier; the [`Catalog`](crate::core::catalog::Catalog)
//! arena owns them.

pub mod course;
pub mod dag;
pub mod department;
pub mod enrollment;
pub mod offering;
pub mod schedule;
pub mod user;

pub use course::Course;
pub use dag::PrerequisiteGraph;
pub use department::Department;
pub use enrollment::{Enrollment, EnrollmentStatus, Grade};
pub use offering::CourseOffering;
pub use schedule::{conflicts, Day, Schedule};
pub use user::{AcademicStatus, Faculty, Role, Student, User};

/// Course key (e.g. "CS2510")
pub type CourseId = String;

/// User key; students and faculty are looked up by their user id
pub type UserId = String;

/// Department key
pub type DepartmentId = String;

/// Offering key, assigned by the catalog
pub type OfferingId = u32;

/// Enrollment key, assigned by the catalog
pub type EnrollmentId = u32;
