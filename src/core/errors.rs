//! Error taxonomy for the record consistency engine
//!
//! Every refusal is a recoverable value. Each operation family has its own
//! enum so callers can match exhaustively on what that operation can report;
//! [`RecordError`] unifies them for front-ends that only need a message.

use chrono::NaiveTime;
use thiserror::Error;

use super::models::{CourseId, Day, EnrollmentId, EnrollmentStatus, OfferingId, UserId};

/// Refusals from the prerequisite graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrerequisiteError {
    /// A course was named as its own prerequisite.
    #[error("course '{0}' cannot be its own prerequisite")]
    SelfDependency(CourseId),

    /// The edge would close a circular dependency.
    #[error("adding '{prerequisite}' as a prerequisite of '{course}' would create a cycle")]
    CycleDetected {
        /// Course that would gain the prerequisite
        course: CourseId,
        /// Prerequisite that already depends on `course`
        prerequisite: CourseId,
    },

    /// One of the endpoints is not in the catalog.
    #[error("unknown course '{0}'")]
    UnknownCourse(CourseId),
}

/// Refusals when building or attaching meeting times.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    /// End time is not strictly after start time.
    #[error("meeting must end after it starts ({start} - {end})")]
    InvalidInterval {
        /// Requested start
        start: NaiveTime,
        /// Requested end
        end: NaiveTime,
    },

    /// The new meeting overlaps an existing meeting of the same offering.
    #[error("meeting on {day} {start}-{end} overlaps an existing meeting")]
    ScheduleConflict {
        /// Day of the rejected meeting
        day: Day,
        /// Start of the rejected meeting
        start: NaiveTime,
        /// End of the rejected meeting
        end: NaiveTime,
    },

    /// Offering id does not resolve.
    #[error("unknown offering {0}")]
    UnknownOffering(OfferingId),

    /// No meeting at the given position.
    #[error("offering {offering} has no meeting at position {index}")]
    UnknownMeeting {
        /// Offering searched
        offering: OfferingId,
        /// Requested position
        index: usize,
    },
}

/// An enrollment state-machine transition was attempted from an incompatible state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot {action} enrollment {enrollment} while it is {from}")]
pub struct LifecycleError {
    /// Enrollment the transition was attempted on
    pub enrollment: EnrollmentId,
    /// Status at the time of the attempt
    pub from: EnrollmentStatus,
    /// Attempted action (`withdraw` or `grade`)
    pub action: &'static str,
}

/// A grade string outside the closed vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid grade '{0}' (expected one of A, A-, B+, B, B-, C+, C, C-, D+, D, F)")]
pub struct GradeError(pub String);

/// Refusals from `register`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// Student id does not resolve to a student.
    #[error("unknown student '{0}'")]
    UnknownStudent(UserId),

    /// Offering id does not resolve.
    #[error("unknown offering {0}")]
    UnknownOffering(OfferingId),

    /// The student already holds a non-withdrawn enrollment for the offering.
    #[error("student '{student}' is already enrolled in offering {offering}")]
    AlreadyEnrolled {
        /// Student attempting to register
        student: UserId,
        /// Offering already held
        offering: OfferingId,
    },

    /// No seat left.
    #[error("offering {0} is full")]
    CourseFull(OfferingId),

    /// No enrollment ids left to allocate.
    #[error("no enrollment ids left to allocate")]
    IdSpaceExhausted,

    /// A prerequisite course has not been completed with a passing grade.
    #[error("prerequisite '{course}' not met")]
    PrerequisiteNotMet {
        /// First unmet prerequisite
        course: CourseId,
    },
}

/// Refusals from `drop`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DropError {
    /// Student id does not resolve to a student.
    #[error("unknown student '{0}'")]
    UnknownStudent(UserId),

    /// The enrollment does not belong to the student.
    #[error("student '{student}' holds no enrollment {enrollment}")]
    NotEnrolled {
        /// Student requesting the drop
        student: UserId,
        /// Enrollment named in the request
        enrollment: EnrollmentId,
    },

    /// Completed courses cannot be dropped.
    #[error("enrollment {0} is already completed")]
    AlreadyCompleted(EnrollmentId),

    /// Withdraw transition refused (e.g. already withdrawn).
    #[error(transparent)]
    InvalidTransition(#[from] LifecycleError),
}

/// Refusals from grade assignment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GradingError {
    /// Faculty id does not resolve to a faculty member.
    #[error("unknown faculty member '{0}'")]
    UnknownFaculty(UserId),

    /// Enrollment id does not resolve.
    #[error("unknown enrollment {0}")]
    UnknownEnrollment(EnrollmentId),

    /// The faculty member does not teach the enrollment's offering.
    #[error("faculty member '{faculty}' does not teach offering {offering}")]
    NotTeaching {
        /// Faculty attempting to grade
        faculty: UserId,
        /// Offering of the enrollment
        offering: OfferingId,
    },

    /// Grade outside the vocabulary.
    #[error(transparent)]
    InvalidGrade(#[from] GradeError),

    /// Grading refused by the lifecycle (e.g. withdrawn enrollment).
    #[error(transparent)]
    InvalidTransition(#[from] LifecycleError),
}

/// Refusals from administrative catalog edits and snapshot loading.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// A course with this id already exists.
    #[error("course '{0}' already exists")]
    DuplicateCourse(CourseId),

    /// Course attributes violate their invariants.
    #[error("course '{course}' is invalid: {reason}")]
    InvalidCourse {
        /// Offending course
        course: CourseId,
        /// Violated rule
        reason: &'static str,
    },

    /// Course id does not resolve.
    #[error("unknown course '{0}'")]
    UnknownCourse(CourseId),

    /// A department with this id already exists.
    #[error("department '{0}' already exists")]
    DuplicateDepartment(String),

    /// Department id does not resolve.
    #[error("unknown department '{0}'")]
    UnknownDepartment(String),

    /// A user with this id already exists.
    #[error("user '{0}' already exists")]
    DuplicateUser(UserId),

    /// User id does not resolve.
    #[error("unknown user '{0}'")]
    UnknownUser(UserId),

    /// The user exists but is not a faculty member.
    #[error("user '{0}' is not a faculty member")]
    NotFaculty(UserId),

    /// The user exists but is not a student.
    #[error("user '{0}' is not a student")]
    NotStudent(UserId),

    /// System administrator security level outside 1..=5.
    #[error("security level {0} is outside 1..=5")]
    InvalidSecurityLevel(u8),

    /// Offering id does not resolve.
    #[error("unknown offering {0}")]
    UnknownOffering(OfferingId),

    /// Offering id appears twice in a snapshot.
    #[error("offering {0} already exists")]
    DuplicateOffering(OfferingId),

    /// Enrollment id appears twice in a snapshot.
    #[error("enrollment {0} already exists")]
    DuplicateEnrollment(EnrollmentId),

    /// A snapshot links a second non-withdrawn enrollment for the same student and offering.
    #[error("student '{student}' holds more than one active enrollment in offering {offering}")]
    DuplicateActiveEnrollment {
        /// Student holding both records
        student: UserId,
        /// Offering named by both records
        offering: OfferingId,
    },

    /// A snapshot enrollment carries a grade without being completed.
    #[error("enrollment {enrollment} is {status} but carries a grade")]
    UnexpectedGrade {
        /// Offending enrollment
        enrollment: EnrollmentId,
        /// Its stored status
        status: EnrollmentStatus,
    },

    /// Identifier space exhausted.
    #[error("no {0} ids left to allocate")]
    IdSpaceExhausted(&'static str),

    /// The course still has offerings.
    #[error("course '{0}' still has offerings")]
    CourseInUse(CourseId),

    /// A snapshot holds more active enrollments than seats.
    #[error("offering {offering} holds {active} active enrollments but only {capacity} seats")]
    CapacityExceeded {
        /// Overfilled offering
        offering: OfferingId,
        /// Active enrollments found
        active: usize,
        /// Seat limit of the course
        capacity: u32,
    },
}

/// Any engine refusal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// Prerequisite graph refusal
    #[error(transparent)]
    Prerequisite(#[from] PrerequisiteError),
    /// Schedule refusal
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
    /// Registration refusal
    #[error(transparent)]
    Registration(#[from] RegistrationError),
    /// Drop refusal
    #[error(transparent)]
    Drop(#[from] DropError),
    /// Grading refusal
    #[error(transparent)]
    Grading(#[from] GradingError),
    /// Grade vocabulary refusal
    #[error(transparent)]
    Grade(#[from] GradeError),
    /// Catalog edit refusal
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
