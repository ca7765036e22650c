//! Registration engine: the mutation entry point for enrollments and meetings
//!
//! Each operation checks all of its preconditions before touching state, so
//! a refused operation leaves the catalog exactly as it was.

use chrono::{Local, NaiveDate};

use crate::core::capacity::OfferingCapacity;
use crate::core::catalog::Catalog;
use crate::core::errors::{CatalogError, DropError, GradingError, RegistrationError, ScheduleError};
use crate::core::models::{
    Enrollment, EnrollmentId, EnrollmentStatus, Grade, OfferingId, Schedule, User, UserId,
};
use crate::{debug, info};

/// Registration operations bound to one catalog
pub struct RegistrationEngine<'a> {
    catalog: &'a mut Catalog,
    today: NaiveDate,
}

impl<'a> RegistrationEngine<'a> {
    /// Bind to a catalog, dating new enrollments with the local date
    pub fn new(catalog: &'a mut Catalog) -> Self {
        Self {
            catalog,
            today: Local::now().date_naive(),
        }
    }

    /// Date new enrollments with `date` instead of today
    #[must_use]
    pub fn on(mut self, date: NaiveDate) -> Self {
        self.today = date;
        self
    }

    /// Register a student for an offering
    ///
    /// Checks, in order: duplicate active registration, seat availability,
    /// then every prerequisite of the offering's course. On success a new
    /// `Enrolled` record is linked to the student and offering and a copy is
    /// returned.
    ///
    /// # Errors
    /// - [`RegistrationError::UnknownStudent`] / [`RegistrationError::UnknownOffering`]
    /// - [`RegistrationError::AlreadyEnrolled`] if a non-withdrawn enrollment exists
    /// - [`RegistrationError::CourseFull`] if no seat is left
    /// - [`RegistrationError::PrerequisiteNotMet`] naming the first unmet prerequisite
    /// - [`RegistrationError::IdSpaceExhausted`] if no enrollment id is left
    pub fn register(
        &mut self,
        student: &str,
        offering: OfferingId,
    ) -> Result<Enrollment, RegistrationError> {
        let result = self.check_registration(student, offering);
        if let Err(err) = &result {
            debug!("Registration of {student} in offering {offering} refused: {err}");
        }
        result?;

        let id = self
            .catalog
            .allocate_enrollment_id()
            .ok_or(RegistrationError::IdSpaceExhausted)?;
        let enrollment = Enrollment::new(id, student.to_string(), offering, self.today);
        self.catalog.insert_enrollment(enrollment.clone());
        info!("Student {student} enrolled in offering {offering} (enrollment {id})");
        Ok(enrollment)
    }

    fn check_registration(&self, student: &str, offering: OfferingId) -> Result<(), RegistrationError> {
        let history = self
            .catalog
            .user_ref(student)
            .and_then(User::as_student)
            .ok_or_else(|| RegistrationError::UnknownStudent(student.to_string()))?
            .enrollments();
        let target = self
            .catalog
            .offering_ref(offering)
            .ok_or(RegistrationError::UnknownOffering(offering))?;

        let already = self
            .catalog
            .enrollment_refs(history)
            .any(|e| e.offering() == offering && e.status() != EnrollmentStatus::Withdrawn);
        if already {
            return Err(RegistrationError::AlreadyEnrolled {
                student: student.to_string(),
                offering,
            });
        }

        let seats = OfferingCapacity::for_offering(self.catalog, offering)
            .ok_or(RegistrationError::UnknownOffering(offering))?;
        if !seats.has_available_seat() {
            return Err(RegistrationError::CourseFull(offering));
        }

        for prerequisite in self.catalog.prerequisites(target.course()) {
            let satisfied = self.catalog.enrollment_refs(history).any(|e| {
                e.satisfies_prerequisite()
                    && self
                        .catalog
                        .offering_ref(e.offering())
                        .is_some_and(|o| o.course() == prerequisite)
            });
            if !satisfied {
                return Err(RegistrationError::PrerequisiteNotMet {
                    course: prerequisite,
                });
            }
        }
        Ok(())
    }

    /// Drop (withdraw) one of the student's enrollments
    ///
    /// # Errors
    /// - [`DropError::UnknownStudent`] if the id is not a student
    /// - [`DropError::NotEnrolled`] if the enrollment is not the student's
    /// - [`DropError::AlreadyCompleted`] for a completed enrollment
    /// - [`DropError::InvalidTransition`] if the enrollment is already withdrawn
    pub fn drop(&mut self, student: &str, enrollment: EnrollmentId) -> Result<(), DropError> {
        let owns = self
            .catalog
            .user_ref(student)
            .and_then(User::as_student)
            .ok_or_else(|| DropError::UnknownStudent(student.to_string()))?
            .enrollments()
            .contains(&enrollment);
        let record = self
            .catalog
            .enrollment_mut(enrollment)
            .filter(|_| owns)
            .ok_or_else(|| DropError::NotEnrolled {
                student: student.to_string(),
                enrollment,
            })?;

        if record.status() == EnrollmentStatus::Completed {
            debug!("Drop of completed enrollment {enrollment} refused");
            return Err(DropError::AlreadyCompleted(enrollment));
        }
        record.withdraw()?;
        info!("Student {student} withdrew from enrollment {enrollment}");
        Ok(())
    }

    /// Attach a weekly meeting to an offering
    ///
    /// # Errors
    /// - [`ScheduleError::UnknownOffering`] if the offering does not exist
    /// - [`ScheduleError::InvalidInterval`] if the meeting does not end after it starts
    /// - [`ScheduleError::ScheduleConflict`] if it overlaps an existing meeting
    pub fn add_schedule(
        &mut self,
        offering: OfferingId,
        schedule: Schedule,
    ) -> Result<(), ScheduleError> {
        schedule.validate()?;
        let target = self
            .catalog
            .offering_mut(offering)
            .ok_or(ScheduleError::UnknownOffering(offering))?;
        if target.conflicts_with(&schedule) {
            debug!("Meeting {schedule} refused for offering {offering}: overlap");
            return Err(ScheduleError::ScheduleConflict {
                day: schedule.day(),
                start: schedule.start(),
                end: schedule.end(),
            });
        }
        info!("Meeting {schedule} added to offering {offering}");
        target.push_schedule(schedule);
        Ok(())
    }

    /// Remove the meeting at `index` from an offering, returning it
    ///
    /// # Errors
    /// [`ScheduleError::UnknownOffering`] or [`ScheduleError::UnknownMeeting`]
    pub fn remove_schedule(
        &mut self,
        offering: OfferingId,
        index: usize,
    ) -> Result<Schedule, ScheduleError> {
        self.catalog
            .offering_mut(offering)
            .ok_or(ScheduleError::UnknownOffering(offering))?
            .remove_schedule(index)
            .ok_or(ScheduleError::UnknownMeeting { offering, index })
    }

    /// Make a faculty member the instructor of an offering
    ///
    /// A previous instructor loses the offering.
    ///
    /// # Returns
    /// `Ok(false)` if the faculty member already teaches it
    ///
    /// # Errors
    /// [`CatalogError::UnknownUser`], [`CatalogError::NotFaculty`] or [`CatalogError::UnknownOffering`]
    pub fn assign_faculty(
        &mut self,
        faculty: &str,
        offering: OfferingId,
    ) -> Result<bool, CatalogError> {
        let previous = self
            .catalog
            .offering_ref(offering)
            .ok_or(CatalogError::UnknownOffering(offering))?
            .faculty()
            .map(str::to_string);
        let added = self
            .catalog
            .user_mut(faculty)
            .ok_or_else(|| CatalogError::UnknownUser(faculty.to_string()))?
            .as_faculty_mut()
            .ok_or_else(|| CatalogError::NotFaculty(faculty.to_string()))?
            .add_teaching(offering);
        if !added {
            return Ok(false);
        }

        if let Some(prev) = previous.filter(|p| p != faculty) {
            if let Some(prev_faculty) = self.catalog.user_mut(&prev).and_then(User::as_faculty_mut) {
                prev_faculty.remove_teaching(offering);
            }
        }
        if let Some(target) = self.catalog.offering_mut(offering) {
            target.set_faculty(Some(faculty.to_string()));
        }
        info!("Faculty {faculty} assigned to offering {offering}");
        Ok(true)
    }

    /// Remove a faculty member from an offering; `true` if they taught it
    pub fn unassign_faculty(&mut self, faculty: &str, offering: OfferingId) -> bool {
        let removed = self
            .catalog
            .user_mut(faculty)
            .and_then(User::as_faculty_mut)
            .is_some_and(|f| f.remove_teaching(offering));
        if removed {
            if let Some(target) = self.catalog.offering_mut(offering) {
                target.set_faculty(None);
            }
        }
        removed
    }

    /// Record a grade on behalf of the offering's instructor
    ///
    /// Grading an `Enrolled` record completes it; a `Completed` record is re-graded.
    ///
    /// # Errors
    /// - [`GradingError::UnknownFaculty`] / [`GradingError::UnknownEnrollment`]
    /// - [`GradingError::NotTeaching`] if the faculty member does not teach the offering
    /// - [`GradingError::InvalidGrade`] for a grade outside the vocabulary
    /// - [`GradingError::InvalidTransition`] for a withdrawn enrollment
    pub fn assign_grade(
        &mut self,
        faculty: &str,
        enrollment: EnrollmentId,
        grade: &str,
    ) -> Result<(), GradingError> {
        let instructor = self
            .catalog
            .user_ref(faculty)
            .and_then(User::as_faculty)
            .ok_or_else(|| GradingError::UnknownFaculty(faculty.to_string()))?;
        let offering = self
            .catalog
            .enrollment_ref(enrollment)
            .ok_or(GradingError::UnknownEnrollment(enrollment))?
            .offering();
        if !instructor.teaches(offering) {
            return Err(GradingError::NotTeaching {
                faculty: faculty.to_string(),
                offering,
            });
        }
        let grade: Grade = grade.parse()?;

        self.catalog
            .enrollment_mut(enrollment)
            .ok_or(GradingError::UnknownEnrollment(enrollment))?
            .record_grade(grade)?;
        info!("Enrollment {enrollment} graded {grade} by {faculty}");
        Ok(())
    }

    /// Students holding an active enrollment in the offering
    #[must_use]
    pub fn roster(&self, offering: OfferingId) -> Vec<UserId> {
        self.catalog
            .offering_ref(offering)
            .map(|o| {
                self.catalog
                    .enrollment_refs(o.enrollments())
                    .filter(|e| e.is_active())
                    .map(|e| e.student().to_string())
                    .collect()
            })
            .unwrap_or_default()
    }
}
