//! Users and their roles

use super::{DepartmentId, EnrollmentId, OfferingId, UserId};
use crate::core::errors::CatalogError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Standing of a student
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AcademicStatus {
    /// In good standing
    #[default]
    Active,
    /// On academic probation
    OnProbation,
    /// Degree conferred
    Graduated,
}

/// Student-specific data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Institutional student number
    pub student_id: String,
    /// Date of admission
    pub admission_date: NaiveDate,
    /// Current standing
    #[serde(default)]
    pub academic_status: AcademicStatus,
    /// Every enrollment ever made, withdrawn ones included; rebuilt on load
    #[serde(skip)]
    enrollments: Vec<EnrollmentId>,
}

impl Student {
    /// Create a student with no enrollments
    #[must_use]
    pub const fn new(student_id: String, admission_date: NaiveDate) -> Self {
        Self {
            student_id,
            admission_date,
            academic_status: AcademicStatus::Active,
            enrollments: Vec::new(),
        }
    }

    /// Enrollment ids in registration order
    #[must_use]
    pub fn enrollments(&self) -> &[EnrollmentId] {
        &self.enrollments
    }

    pub(crate) fn push_enrollment(&mut self, enrollment: EnrollmentId) {
        self.enrollments.push(enrollment);
    }
}

/// Faculty-specific data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faculty {
    /// Institutional faculty number
    pub faculty_id: String,
    /// Areas of expertise, free text
    #[serde(default)]
    pub expertise: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    department: Option<DepartmentId>,
    /// Offerings taught; rebuilt from offering assignments on load
    #[serde(skip)]
    teaching: BTreeSet<OfferingId>,
}

impl Faculty {
    /// Create a faculty member with no department or teaching load
    #[must_use]
    pub fn new(faculty_id: String, expertise: String) -> Self {
        Self {
            faculty_id,
            expertise,
            department: None,
            teaching: BTreeSet::new(),
        }
    }

    /// Department membership
    #[must_use]
    pub fn department(&self) -> Option<&str> {
        self.department.as_deref()
    }

    /// Whether this faculty member teaches the offering
    #[must_use]
    pub fn teaches(&self, offering: OfferingId) -> bool {
        self.teaching.contains(&offering)
    }

    /// Offerings taught (a copy)
    #[must_use]
    pub fn teaching(&self) -> Vec<OfferingId> {
        self.teaching.iter().copied().collect()
    }

    pub(crate) fn set_department(&mut self, department: Option<DepartmentId>) {
        self.department = department;
    }

    pub(crate) fn add_teaching(&mut self, offering: OfferingId) -> bool {
        self.teaching.insert(offering)
    }

    pub(crate) fn remove_teaching(&mut self, offering: OfferingId) -> bool {
        self.teaching.remove(&offering)
    }
}

/// Role-specific data; one variant per kind of user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Role {
    /// Enrolls in offerings
    Student(Student),
    /// Teaches offerings and assigns grades
    Faculty(Faculty),
    /// System administrator
    SystemAdmin {
        /// Administrator number
        admin_id: String,
        /// Clearance level in 1..=5
        security_level: u8,
    },
    /// Registrar / administrative staff
    AdminStaff {
        /// Staff number
        staff_id: String,
    },
}

/// A person known to the system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    user_id: UserId,
    /// Full name
    pub name: String,
    /// Email address
    #[serde(default)]
    pub email: String,
    /// Phone or other contact details
    #[serde(default)]
    pub contact_info: String,
    role: Role,
}

impl User {
    /// Create a user with the given role
    ///
    /// # Errors
    /// Returns [`CatalogError::InvalidSecurityLevel`] for a system administrator
    /// whose security level is outside 1..=5
    pub fn new(
        user_id: impl Into<UserId>,
        name: impl Into<String>,
        role: Role,
    ) -> Result<Self, CatalogError> {
        let user = Self {
            user_id: user_id.into(),
            name: name.into(),
            email: String::new(),
            contact_info: String::new(),
            role,
        };
        user.validate()?;
        Ok(user)
    }

    /// Check role invariants
    ///
    /// # Errors
    /// Returns [`CatalogError::InvalidSecurityLevel`] for an out-of-range admin level
    pub fn validate(&self) -> Result<(), CatalogError> {
        match self.role {
            Role::SystemAdmin { security_level, .. } if !(1..=5).contains(&security_level) => {
                Err(CatalogError::InvalidSecurityLevel(security_level))
            }
            _ => Ok(()),
        }
    }

    /// Builder-style email setter
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    /// User key
    #[must_use]
    pub fn id(&self) -> &str {
        &self.user_id
    }

    /// Role data
    #[must_use]
    pub const fn role(&self) -> &Role {
        &self.role
    }

    /// Role name for display
    #[must_use]
    pub const fn role_name(&self) -> &'static str {
        match self.role {
            Role::Student(_) => "Student",
            Role::Faculty(_) => "Faculty",
            Role::SystemAdmin { .. } => "SystemAdmin",
            Role::AdminStaff { .. } => "AdminStaff",
        }
    }

    /// Student data, if this user is a student
    #[must_use]
    pub const fn as_student(&self) -> Option<&Student> {
        match &self.role {
            Role::Student(student) => Some(student),
            _ => None,
        }
    }

    /// Faculty data, if this user is a faculty member
    #[must_use]
    pub const fn as_faculty(&self) -> Option<&Faculty> {
        match &self.role {
            Role::Faculty(faculty) => Some(faculty),
            _ => None,
        }
    }

    pub(crate) fn as_student_mut(&mut self) -> Option<&mut Student> {
        match &mut self.role {
            Role::Student(student) => Some(student),
            _ => None,
        }
    }

    pub(crate) fn as_faculty_mut(&mut self) -> Option<&mut Faculty> {
        match &mut self.role {
            Role::Faculty(faculty) => Some(faculty),
            _ => None,
        }
    }
}
