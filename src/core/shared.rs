//! Thread-safe handle to a catalog
//!
//! Every mutation runs its checks and its commit under one write lock, so
//! two threads racing for the last seat cannot both win and two edges that
//! together would form a cycle cannot both be inserted.

use std::sync::Arc;

use chrono::NaiveDate;
use parking_lot::RwLock;

use crate::core::capacity::OfferingCapacity;
use crate::core::catalog::Catalog;
use crate::core::errors::{DropError, GradingError, PrerequisiteError, RegistrationError, ScheduleError};
use crate::core::models::{Enrollment, EnrollmentId, OfferingId, Schedule};

/// Cloneable, lock-protected catalog shared between threads
#[derive(Debug, Clone, Default)]
pub struct SharedRegistry {
    inner: Arc<RwLock<Catalog>>,
}

impl SharedRegistry {
    /// Take ownership of a catalog
    #[must_use]
    pub fn new(catalog: Catalog) -> Self {
        Self {
            inner: Arc::new(RwLock::new(catalog)),
        }
    }

    /// Register a student; see [`RegistrationEngine::register`](crate::core::registration::RegistrationEngine::register)
    ///
    /// # Errors
    /// Any [`RegistrationError`]
    pub fn register(
        &self,
        student: &str,
        offering: OfferingId,
    ) -> Result<Enrollment, RegistrationError> {
        self.inner.write().registration().register(student, offering)
    }

    /// Register with an explicit enrollment date
    ///
    /// # Errors
    /// Any [`RegistrationError`]
    pub fn register_on(
        &self,
        student: &str,
        offering: OfferingId,
        date: NaiveDate,
    ) -> Result<Enrollment, RegistrationError> {
        self.inner
            .write()
            .registration()
            .on(date)
            .register(student, offering)
    }

    /// Drop an enrollment
    ///
    /// # Errors
    /// Any [`DropError`]
    pub fn drop(&self, student: &str, enrollment: EnrollmentId) -> Result<(), DropError> {
        self.inner.write().registration().drop(student, enrollment)
    }

    /// Grade an enrollment
    ///
    /// # Errors
    /// Any [`GradingError`]
    pub fn assign_grade(
        &self,
        faculty: &str,
        enrollment: EnrollmentId,
        grade: &str,
    ) -> Result<(), GradingError> {
        self.inner
            .write()
            .registration()
            .assign_grade(faculty, enrollment, grade)
    }

    /// Add a meeting to an offering
    ///
    /// # Errors
    /// Any [`ScheduleError`]
    pub fn add_schedule(&self, offering: OfferingId, schedule: Schedule) -> Result<(), ScheduleError> {
        self.inner.write().registration().add_schedule(offering, schedule)
    }

    /// Add a prerequisite edge
    ///
    /// # Errors
    /// Any [`PrerequisiteError`]
    pub fn add_prerequisite(&self, course: &str, prerequisite: &str) -> Result<bool, PrerequisiteError> {
        self.inner.write().add_prerequisite(course, prerequisite)
    }

    /// Remove a prerequisite edge
    pub fn remove_prerequisite(&self, course: &str, prerequisite: &str) -> bool {
        self.inner.write().remove_prerequisite(course, prerequisite)
    }

    /// Seat usage of an offering
    #[must_use]
    pub fn capacity(&self, offering: OfferingId) -> Option<OfferingCapacity> {
        self.inner.read().capacity(offering)
    }

    /// Run a read-only query under the read lock
    pub fn read<R>(&self, query: impl FnOnce(&Catalog) -> R) -> R {
        query(&self.inner.read())
    }

    /// Copy of the current catalog
    #[must_use]
    pub fn snapshot(&self) -> Catalog {
        self.inner.read().clone()
    }
}

impl From<Catalog> for SharedRegistry {
    fn from(catalog: Catalog) -> Self {
        Self::new(catalog)
    }
}
