//! Enrollment model and its lifecycle state machine

use super::{EnrollmentId, OfferingId, UserId};
use crate::core::errors::{GradeError, LifecycleError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Status of an enrollment
///
/// `Enrolled` is the only non-terminal state. `Completed` may still be re-graded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnrollmentStatus {
    /// Active; counts against offering capacity
    Enrolled,
    /// Dropped by the student
    Withdrawn,
    /// Finished with a recorded grade
    Completed,
}

impl EnrollmentStatus {
    /// Canonical name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Enrolled => "Enrolled",
            Self::Withdrawn => "Withdrawn",
            Self::Completed => "Completed",
        }
    }
}

impl fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnrollmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Enrolled" => Ok(Self::Enrolled),
            "Withdrawn" => Ok(Self::Withdrawn),
            "Completed" => Ok(Self::Completed),
            _ => Err(format!(
                "Status must be 'Enrolled', 'Withdrawn', or 'Completed', got '{s}'"
            )),
        }
    }
}

/// Letter grade from the closed grading vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Grade {
    /// A (4.0)
    A,
    /// A- (3.7)
    AMinus,
    /// B+ (3.3)
    BPlus,
    /// B (3.0)
    B,
    /// B- (2.7)
    BMinus,
    /// C+ (2.3)
    CPlus,
    /// C (2.0)
    C,
    /// C- (1.7)
    CMinus,
    /// D+ (1.3)
    DPlus,
    /// D (1.0)
    D,
    /// F (0.0), the failing grade
    F,
}

impl Grade {
    /// Every grade, best first
    pub const ALL: [Self; 11] = [
        Self::A,
        Self::AMinus,
        Self::BPlus,
        Self::B,
        Self::BMinus,
        Self::CPlus,
        Self::C,
        Self::CMinus,
        Self::DPlus,
        Self::D,
        Self::F,
    ];

    /// Letter as written on a transcript
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::AMinus => "A-",
            Self::BPlus => "B+",
            Self::B => "B",
            Self::BMinus => "B-",
            Self::CPlus => "C+",
            Self::C => "C",
            Self::CMinus => "C-",
            Self::DPlus => "D+",
            Self::D => "D",
            Self::F => "F",
        }
    }

    /// Grade points on the 4.0 scale
    #[must_use]
    pub const fn points(self) -> f64 {
        match self {
            Self::A => 4.0,
            Self::AMinus => 3.7,
            Self::BPlus => 3.3,
            Self::B => 3.0,
            Self::BMinus => 2.7,
            Self::CPlus => 2.3,
            Self::C => 2.0,
            Self::CMinus => 1.7,
            Self::DPlus => 1.3,
            Self::D => 1.0,
            Self::F => 0.0,
        }
    }

    /// Whether the grade is strictly better than failing
    #[must_use]
    pub const fn is_passing(self) -> bool {
        !matches!(self, Self::F)
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Grade {
    type Err = GradeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|g| g.as_str() == trimmed)
            .ok_or_else(|| GradeError(s.to_string()))
    }
}

/// Links one student to one course offering
///
/// The grade is kept as stored text: snapshots may carry grades recorded
/// before vocabulary validation existed. New grades only enter through
/// [`Enrollment::record_grade`], which takes a validated [`Grade`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
    enrollment_id: EnrollmentId,
    student: UserId,
    offering: OfferingId,
    enrollment_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    grade: Option<String>,
    status: EnrollmentStatus,
}

impl Enrollment {
    /// Create a fresh `Enrolled` record with no grade
    #[must_use]
    pub const fn new(
        enrollment_id: EnrollmentId,
        student: UserId,
        offering: OfferingId,
        enrollment_date: NaiveDate,
    ) -> Self {
        Self {
            enrollment_id,
            student,
            offering,
            enrollment_date,
            grade: None,
            status: EnrollmentStatus::Enrolled,
        }
    }

    /// Enrollment key
    #[must_use]
    pub const fn id(&self) -> EnrollmentId {
        self.enrollment_id
    }

    /// Owning student
    #[must_use]
    pub fn student(&self) -> &str {
        &self.student
    }

    /// Offering enrolled in
    #[must_use]
    pub const fn offering(&self) -> OfferingId {
        self.offering
    }

    /// Date the registration was made
    #[must_use]
    pub const fn enrollment_date(&self) -> NaiveDate {
        self.enrollment_date
    }

    /// Stored grade text, if any
    #[must_use]
    pub fn grade(&self) -> Option<&str> {
        self.grade.as_deref()
    }

    /// Stored grade parsed against the vocabulary
    #[must_use]
    pub fn parsed_grade(&self) -> Option<Result<Grade, GradeError>> {
        self.grade.as_deref().map(str::parse)
    }

    /// Current status
    #[must_use]
    pub const fn status(&self) -> EnrollmentStatus {
        self.status
    }

    /// Whether the enrollment counts against capacity
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == EnrollmentStatus::Enrolled
    }

    /// `Enrolled -> Withdrawn`
    ///
    /// # Errors
    /// Returns [`LifecycleError`] from `Withdrawn` or `Completed`
    pub fn withdraw(&mut self) -> Result<(), LifecycleError> {
        match self.status {
            EnrollmentStatus::Enrolled => {
                self.status = EnrollmentStatus::Withdrawn;
                Ok(())
            }
            from => Err(self.refuse(from, "withdraw")),
        }
    }

    /// `Enrolled -> Completed`, or re-grade while `Completed`
    ///
    /// # Errors
    /// Returns [`LifecycleError`] from `Withdrawn`
    pub fn record_grade(&mut self, grade: Grade) -> Result<(), LifecycleError> {
        match self.status {
            EnrollmentStatus::Enrolled | EnrollmentStatus::Completed => {
                self.grade = Some(grade.as_str().to_string());
                self.status = EnrollmentStatus::Completed;
                Ok(())
            }
            from @ EnrollmentStatus::Withdrawn => Err(self.refuse(from, "grade")),
        }
    }

    /// Whether this record satisfies a prerequisite: completed with a passing grade
    #[must_use]
    pub fn satisfies_prerequisite(&self) -> bool {
        self.status == EnrollmentStatus::Completed
            && matches!(self.parsed_grade(), Some(Ok(grade)) if grade.is_passing())
    }

    const fn refuse(&self, from: EnrollmentStatus, action: &'static str) -> LifecycleError {
        LifecycleError {
            enrollment: self.enrollment_id,
            from,
            action,
        }
    }
}
