//! Course offering model

use super::{CourseId, EnrollmentId, OfferingId, Schedule, UserId};
use serde::{Deserialize, Serialize};

/// A scheduled instance of a course in a given term
///
/// Meetings and enrollment ids are exposed as read-only slices; only the
/// registration engine appends to them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseOffering {
    offering_id: OfferingId,
    course: CourseId,
    /// Term name (e.g., "Fall", "Spring", "Summer")
    pub semester: String,
    /// Academic year
    pub year: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    faculty: Option<UserId>,
    #[serde(default)]
    schedules: Vec<Schedule>,
    /// Rebuilt from the enrollment records when a catalog is loaded
    #[serde(skip)]
    enrollments: Vec<EnrollmentId>,
}

impl CourseOffering {
    /// Create an offering with no meetings, faculty or enrollments
    #[must_use]
    pub fn new(offering_id: OfferingId, course: CourseId, semester: String, year: i32) -> Self {
        Self {
            offering_id,
            course,
            semester,
            year,
            faculty: None,
            schedules: Vec::new(),
            enrollments: Vec::new(),
        }
    }

    /// Offering key
    #[must_use]
    pub const fn id(&self) -> OfferingId {
        self.offering_id
    }

    /// Course this offering instantiates
    #[must_use]
    pub fn course(&self) -> &str {
        &self.course
    }

    /// Assigned faculty member, if any
    #[must_use]
    pub fn faculty(&self) -> Option<&str> {
        self.faculty.as_deref()
    }

    /// Weekly meetings in insertion order
    #[must_use]
    pub fn schedules(&self) -> &[Schedule] {
        &self.schedules
    }

    /// Every enrollment ever made on this offering, withdrawn ones included
    #[must_use]
    pub fn enrollments(&self) -> &[EnrollmentId] {
        &self.enrollments
    }

    /// Whether `schedule` overlaps any existing meeting
    #[must_use]
    pub fn conflicts_with(&self, schedule: &Schedule) -> bool {
        self.schedules.iter().any(|s| s.conflicts_with(schedule))
    }

    pub(crate) fn push_schedule(&mut self, schedule: Schedule) {
        self.schedules.push(schedule);
    }

    pub(crate) fn remove_schedule(&mut self, index: usize) -> Option<Schedule> {
        (index < self.schedules.len()).then(|| self.schedules.remove(index))
    }

    pub(crate) fn take_schedules(&mut self) -> Vec<Schedule> {
        std::mem::take(&mut self.schedules)
    }

    pub(crate) fn push_enrollment(&mut self, enrollment: EnrollmentId) {
        self.enrollments.push(enrollment);
    }

    pub(crate) fn set_faculty(&mut self, faculty: Option<UserId>) {
        self.faculty = faculty;
    }
}

impl std::fmt::Display for CourseOffering {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "#{} {} ({} {}), faculty: {}, meetings: {}",
            self.offering_id,
            self.course,
            self.semester,
            self.year,
            self.faculty.as_deref().unwrap_or("unassigned"),
            self.schedules.len()
        )
    }
}
