//! Arena owning every academic record entity
//!
//! Entities are keyed by stable identifiers and refer to one another by id.
//! Public accessors hand out copies so callers cannot bypass the invariants
//! enforced by the catalog's own operations.

use std::collections::BTreeMap;

use crate::core::capacity::OfferingCapacity;
use crate::core::errors::{CatalogError, PrerequisiteError};
use crate::core::gpa::GpaCalculator;
use crate::core::models::{
    Course, CourseId, CourseOffering, Department, Enrollment, EnrollmentId, EnrollmentStatus,
    OfferingId, PrerequisiteGraph, User,
};
use crate::core::registration::RegistrationEngine;
use crate::{debug, info};

/// In-memory store of courses, offerings, enrollments, users and departments
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    /// Institution name
    pub name: String,
    departments: BTreeMap<String, Department>,
    courses: BTreeMap<CourseId, Course>,
    graph: PrerequisiteGraph,
    offerings: BTreeMap<OfferingId, CourseOffering>,
    enrollments: BTreeMap<EnrollmentId, Enrollment>,
    users: BTreeMap<String, User>,
    next_offering: OfferingId,
    next_enrollment: EnrollmentId,
}

impl Catalog {
    /// Create an empty catalog
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            next_offering: 1,
            next_enrollment: 1,
            ..Self::default()
        }
    }

    // --- Administrative edits ---

    /// Add a department
    ///
    /// # Errors
    /// Returns [`CatalogError::DuplicateDepartment`] if the id is taken
    pub fn add_department(&mut self, department: Department) -> Result<(), CatalogError> {
        if self.departments.contains_key(department.id()) {
            return Err(CatalogError::DuplicateDepartment(department.id().to_string()));
        }
        self.departments
            .insert(department.id().to_string(), department);
        Ok(())
    }

    /// Add a course, optionally attached to a department
    ///
    /// # Errors
    /// - [`CatalogError::InvalidCourse`] if the course violates its invariants
    /// - [`CatalogError::DuplicateCourse`] if the id is taken
    /// - [`CatalogError::UnknownDepartment`] if the department does not exist
    pub fn add_course(
        &mut self,
        mut course: Course,
        department: Option<&str>,
    ) -> Result<(), CatalogError> {
        course.validate()?;
        if self.courses.contains_key(course.id()) {
            return Err(CatalogError::DuplicateCourse(course.id().to_string()));
        }
        let department = department.or(course.department()).map(str::to_string);
        if let Some(dept_id) = &department {
            let dept = self
                .departments
                .get_mut(dept_id)
                .ok_or_else(|| CatalogError::UnknownDepartment(dept_id.clone()))?;
            dept.add_course(course.id().to_string());
        }
        course.set_department(department);

        self.graph.add_course(course.id());
        info!("Course {} added", course.id());
        self.courses.insert(course.id().to_string(), course);
        Ok(())
    }

    /// Remove a course with no offerings, along with its prerequisite edges
    /// and department membership
    ///
    /// # Errors
    /// - [`CatalogError::UnknownCourse`] if the course does not exist
    /// - [`CatalogError::CourseInUse`] if any offering still refers to it
    pub fn remove_course(&mut self, course_id: &str) -> Result<Course, CatalogError> {
        if !self.courses.contains_key(course_id) {
            return Err(CatalogError::UnknownCourse(course_id.to_string()));
        }
        if self.offerings.values().any(|o| o.course() == course_id) {
            return Err(CatalogError::CourseInUse(course_id.to_string()));
        }
        let course = self
            .courses
            .remove(course_id)
            .ok_or_else(|| CatalogError::UnknownCourse(course_id.to_string()))?;
        if let Some(dept) = course.department().and_then(|d| self.departments.get_mut(d)) {
            dept.remove_course(course_id);
        }
        self.graph.remove_course(course_id);
        info!("Course {course_id} removed");
        Ok(course)
    }

    /// Add a user
    ///
    /// A faculty member that names a department joins it.
    ///
    /// # Errors
    /// - [`CatalogError::InvalidSecurityLevel`] for an out-of-range administrator
    /// - [`CatalogError::DuplicateUser`] if the id is taken
    /// - [`CatalogError::UnknownDepartment`] if a faculty department does not exist
    pub fn add_user(&mut self, user: User) -> Result<(), CatalogError> {
        user.validate()?;
        if self.users.contains_key(user.id()) {
            return Err(CatalogError::DuplicateUser(user.id().to_string()));
        }
        if let Some(dept_id) = user.as_faculty().and_then(|f| f.department()) {
            let dept = self
                .departments
                .get_mut(dept_id)
                .ok_or_else(|| CatalogError::UnknownDepartment(dept_id.to_string()))?;
            dept.add_faculty(user.id().to_string());
        }
        info!("{} {} added", user.role_name(), user.id());
        self.users.insert(user.id().to_string(), user);
        Ok(())
    }

    /// Move a faculty member into a department, leaving any previous one
    ///
    /// # Errors
    /// - [`CatalogError::UnknownUser`] / [`CatalogError::NotFaculty`] for a bad user id
    /// - [`CatalogError::UnknownDepartment`] if the department does not exist
    pub fn assign_department(&mut self, user_id: &str, department: &str) -> Result<(), CatalogError> {
        if !self.departments.contains_key(department) {
            return Err(CatalogError::UnknownDepartment(department.to_string()));
        }
        let faculty = self
            .users
            .get_mut(user_id)
            .ok_or_else(|| CatalogError::UnknownUser(user_id.to_string()))?
            .as_faculty_mut()
            .ok_or_else(|| CatalogError::NotFaculty(user_id.to_string()))?;

        let previous = faculty.department().map(str::to_string);
        faculty.set_department(Some(department.to_string()));

        if let Some(prev) = previous.and_then(|p| self.departments.get_mut(&p)) {
            prev.remove_faculty(user_id);
        }
        if let Some(dept) = self.departments.get_mut(department) {
            dept.add_faculty(user_id.to_string());
        }
        Ok(())
    }

    /// Create an offering of a course for a term
    ///
    /// # Errors
    /// - [`CatalogError::UnknownCourse`] if the course does not exist
    /// - [`CatalogError::IdSpaceExhausted`] if no offering id is left
    pub fn add_offering(
        &mut self,
        course: &str,
        semester: impl Into<String>,
        year: i32,
    ) -> Result<OfferingId, CatalogError> {
        if !self.courses.contains_key(course) {
            return Err(CatalogError::UnknownCourse(course.to_string()));
        }
        let id = self.next_offering;
        self.next_offering = id
            .checked_add(1)
            .ok_or(CatalogError::IdSpaceExhausted("offering"))?;
        let offering = CourseOffering::new(id, course.to_string(), semester.into(), year);
        info!("Offering {offering} created");
        self.offerings.insert(id, offering);
        Ok(id)
    }

    // --- Prerequisite graph ---

    /// Add a prerequisite edge between two catalog courses
    ///
    /// # Returns
    /// `Ok(true)` if inserted, `Ok(false)` if the edge already existed
    ///
    /// # Errors
    /// [`PrerequisiteError::UnknownCourse`], [`PrerequisiteError::SelfDependency`] or
    /// [`PrerequisiteError::CycleDetected`]; the graph is unchanged on error
    pub fn add_prerequisite(
        &mut self,
        course: &str,
        prerequisite: &str,
    ) -> Result<bool, PrerequisiteError> {
        for key in [course, prerequisite] {
            if !self.courses.contains_key(key) {
                return Err(PrerequisiteError::UnknownCourse(key.to_string()));
            }
        }
        match self.graph.add_edge(course, prerequisite) {
            Ok(added) => {
                if added {
                    info!("Prerequisite {prerequisite} added to {course}");
                }
                Ok(added)
            }
            Err(err) => {
                debug!("Prerequisite edge refused: {err}");
                Err(err)
            }
        }
    }

    /// Remove a direct prerequisite edge; `true` if it existed
    pub fn remove_prerequisite(&mut self, course: &str, prerequisite: &str) -> bool {
        let removed = self.graph.remove_edge(course, prerequisite);
        if removed {
            info!("Prerequisite {prerequisite} removed from {course}");
        }
        removed
    }

    /// Whether `candidate` is a direct or transitive prerequisite of `course`
    #[must_use]
    pub fn is_prerequisite_of(&self, candidate: &str, course: &str) -> bool {
        self.graph.is_prerequisite_of(candidate, course)
    }

    /// Direct prerequisites of a course (a copy)
    #[must_use]
    pub fn prerequisites(&self, course: &str) -> Vec<CourseId> {
        self.graph.prerequisites(course)
    }

    /// Read-only view of the prerequisite graph
    #[must_use]
    pub const fn graph(&self) -> &PrerequisiteGraph {
        &self.graph
    }

    // --- Read accessors (copies) ---

    /// Course by id
    #[must_use]
    pub fn course(&self, id: &str) -> Option<Course> {
        self.courses.get(id).cloned()
    }

    /// All courses, ordered by id
    #[must_use]
    pub fn courses(&self) -> Vec<Course> {
        self.courses.values().cloned().collect()
    }

    /// Department by id
    #[must_use]
    pub fn department(&self, id: &str) -> Option<Department> {
        self.departments.get(id).cloned()
    }

    /// All departments, ordered by id
    #[must_use]
    pub fn departments(&self) -> Vec<Department> {
        self.departments.values().cloned().collect()
    }

    /// Offering by id
    #[must_use]
    pub fn offering(&self, id: OfferingId) -> Option<CourseOffering> {
        self.offerings.get(&id).cloned()
    }

    /// All offerings, ordered by id
    #[must_use]
    pub fn offerings(&self) -> Vec<CourseOffering> {
        self.offerings.values().cloned().collect()
    }

    /// Offerings of a given course
    #[must_use]
    pub fn offerings_of(&self, course: &str) -> Vec<CourseOffering> {
        self.offerings
            .values()
            .filter(|o| o.course() == course)
            .cloned()
            .collect()
    }

    /// Enrollment by id
    #[must_use]
    pub fn enrollment(&self, id: EnrollmentId) -> Option<Enrollment> {
        self.enrollments.get(&id).cloned()
    }

    /// All enrollments, ordered by id
    #[must_use]
    pub fn enrollments(&self) -> Vec<Enrollment> {
        self.enrollments.values().cloned().collect()
    }

    /// User by id
    #[must_use]
    pub fn user(&self, id: &str) -> Option<User> {
        self.users.get(id).cloned()
    }

    /// All users, ordered by id
    #[must_use]
    pub fn users(&self) -> Vec<User> {
        self.users.values().cloned().collect()
    }

    /// A student's enrollments in registration order; empty for unknown ids
    #[must_use]
    pub fn student_enrollments(&self, student: &str) -> Vec<Enrollment> {
        self.users
            .get(student)
            .and_then(User::as_student)
            .map(|s| {
                s.enrollments()
                    .iter()
                    .filter_map(|id| self.enrollments.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// An offering's enrollments in registration order; empty for unknown ids
    #[must_use]
    pub fn offering_enrollments(&self, offering: OfferingId) -> Vec<Enrollment> {
        self.offerings
            .get(&offering)
            .map(|o| {
                o.enrollments()
                    .iter()
                    .filter_map(|id| self.enrollments.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Faculty of a department whose expertise mentions `expertise`
    #[must_use]
    pub fn faculty_by_expertise(&self, department: &str, expertise: &str) -> Vec<User> {
        self.users
            .values()
            .filter(|u| {
                u.as_faculty().is_some_and(|f| {
                    f.department() == Some(department) && f.expertise.contains(expertise)
                })
            })
            .cloned()
            .collect()
    }

    /// Seat usage of an offering
    #[must_use]
    pub fn capacity(&self, offering: OfferingId) -> Option<OfferingCapacity> {
        OfferingCapacity::for_offering(self, offering)
    }

    /// Registration operations bound to this catalog
    pub fn registration(&mut self) -> RegistrationEngine<'_> {
        RegistrationEngine::new(self)
    }

    /// GPA queries over this catalog
    #[must_use]
    pub const fn gpa(&self) -> GpaCalculator<'_> {
        GpaCalculator::new(self)
    }

    // --- Crate-internal access for the engine and loader ---

    pub(crate) fn course_ref(&self, id: &str) -> Option<&Course> {
        self.courses.get(id)
    }

    pub(crate) fn offering_ref(&self, id: OfferingId) -> Option<&CourseOffering> {
        self.offerings.get(&id)
    }

    pub(crate) fn offering_mut(&mut self, id: OfferingId) -> Option<&mut CourseOffering> {
        self.offerings.get_mut(&id)
    }

    pub(crate) fn enrollment_ref(&self, id: EnrollmentId) -> Option<&Enrollment> {
        self.enrollments.get(&id)
    }

    pub(crate) fn enrollment_mut(&mut self, id: EnrollmentId) -> Option<&mut Enrollment> {
        self.enrollments.get_mut(&id)
    }

    pub(crate) fn user_ref(&self, id: &str) -> Option<&User> {
        self.users.get(id)
    }

    pub(crate) fn user_mut(&mut self, id: &str) -> Option<&mut User> {
        self.users.get_mut(id)
    }

    pub(crate) fn enrollment_refs<'a>(
        &'a self,
        ids: &'a [EnrollmentId],
    ) -> impl Iterator<Item = &'a Enrollment> + 'a {
        ids.iter().filter_map(|id| self.enrollments.get(id))
    }

    /// Next enrollment id, or `None` once the id space is used up
    pub(crate) fn allocate_enrollment_id(&mut self) -> Option<EnrollmentId> {
        let id = self.next_enrollment;
        self.next_enrollment = id.checked_add(1)?;
        Some(id)
    }

    /// Insert an offering decoded from a snapshot, keeping its id
    pub(crate) fn restore_offering(&mut self, offering: CourseOffering) -> Result<(), CatalogError> {
        if self.offerings.contains_key(&offering.id()) {
            return Err(CatalogError::DuplicateOffering(offering.id()));
        }
        if !self.courses.contains_key(offering.course()) {
            return Err(CatalogError::UnknownCourse(offering.course().to_string()));
        }
        let next = offering
            .id()
            .checked_add(1)
            .ok_or(CatalogError::IdSpaceExhausted("offering"))?;
        self.next_offering = self.next_offering.max(next);
        self.offerings.insert(offering.id(), offering);
        Ok(())
    }

    /// Insert a restored enrollment after checking its references and the
    /// rules `register` and the lifecycle would have enforced
    pub(crate) fn link_enrollment(&mut self, enrollment: Enrollment) -> Result<(), CatalogError> {
        let id = enrollment.id();
        if self.enrollments.contains_key(&id) {
            return Err(CatalogError::DuplicateEnrollment(id));
        }
        let next = id
            .checked_add(1)
            .ok_or(CatalogError::IdSpaceExhausted("enrollment"))?;
        if !self.offerings.contains_key(&enrollment.offering()) {
            return Err(CatalogError::UnknownOffering(enrollment.offering()));
        }
        if enrollment.status() != EnrollmentStatus::Completed && enrollment.grade().is_some() {
            return Err(CatalogError::UnexpectedGrade {
                enrollment: id,
                status: enrollment.status(),
            });
        }

        let student = enrollment.student();
        let history = self
            .users
            .get(student)
            .ok_or_else(|| CatalogError::UnknownUser(student.to_string()))?
            .as_student()
            .ok_or_else(|| CatalogError::NotStudent(student.to_string()))?
            .enrollments();
        let duplicate = enrollment.status() != EnrollmentStatus::Withdrawn
            && self
                .enrollment_refs(history)
                .any(|e| e.offering() == enrollment.offering() && e.status() != EnrollmentStatus::Withdrawn);
        if duplicate {
            return Err(CatalogError::DuplicateActiveEnrollment {
                student: student.to_string(),
                offering: enrollment.offering(),
            });
        }

        self.next_enrollment = self.next_enrollment.max(next);
        self.insert_enrollment(enrollment);
        Ok(())
    }

    /// Store an enrollment and append its id to the student and offering lists
    pub(crate) fn insert_enrollment(&mut self, enrollment: Enrollment) {
        let id = enrollment.id();
        if let Some(student) = self
            .users
            .get_mut(enrollment.student())
            .and_then(User::as_student_mut)
        {
            student.push_enrollment(id);
        }
        if let Some(offering) = self.offerings.get_mut(&enrollment.offering()) {
            offering.push_enrollment(id);
        }
        self.enrollments.insert(id, enrollment);
    }
}
