//! Seat accounting for course offerings

use crate::core::catalog::Catalog;
use crate::core::models::OfferingId;

/// Seat usage of one offering at the moment it was taken
///
/// Only `Enrolled` records occupy a seat; withdrawn and completed ones do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OfferingCapacity {
    /// Offering measured
    pub offering: OfferingId,
    /// Seat limit of the offering's course
    pub max_capacity: u32,
    active: usize,
}

impl OfferingCapacity {
    /// Measure an offering; `None` if the offering or its course is unknown
    #[must_use]
    pub fn for_offering(catalog: &Catalog, offering: OfferingId) -> Option<Self> {
        let record = catalog.offering_ref(offering)?;
        let course = catalog.course_ref(record.course())?;
        let active = catalog
            .enrollment_refs(record.enrollments())
            .filter(|e| e.is_active())
            .count();
        Some(Self {
            offering,
            max_capacity: course.max_capacity(),
            active,
        })
    }

    /// Enrollments currently holding a seat
    #[must_use]
    pub const fn active_count(&self) -> usize {
        self.active
    }

    /// Whether another registration fits
    #[must_use]
    pub fn has_available_seat(&self) -> bool {
        self.active < self.limit()
    }

    /// Seats left, never negative
    #[must_use]
    pub fn available_seats(&self) -> usize {
        self.limit().saturating_sub(self.active)
    }

    /// Whether more seats are taken than exist (only possible in a corrupt snapshot)
    #[must_use]
    pub fn is_overfilled(&self) -> bool {
        self.active > self.limit()
    }

    /// Percentage of seats taken
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn fill_rate(&self) -> f64 {
        self.active as f64 / f64::from(self.max_capacity) * 100.0
    }

    fn limit(&self) -> usize {
        usize::try_from(self.max_capacity).unwrap_or(usize::MAX)
    }
}

impl std::fmt::Display for OfferingCapacity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{} seats taken ({:.1}%)",
            self.active,
            self.max_capacity,
            self.fill_rate()
        )
    }
}
