//! Credit-weighted grade point average
//!
//! Only `Completed` enrollments that carry a grade contribute. Each
//! contributes `points * credit_hours`; the sum is divided by total credits.

use crate::core::catalog::Catalog;
use crate::core::errors::GradeError;
use crate::core::models::{Enrollment, EnrollmentStatus, Grade, User};

/// GPA queries over a catalog
pub struct GpaCalculator<'a> {
    catalog: &'a Catalog,
}

impl<'a> GpaCalculator<'a> {
    /// Bind to a catalog
    #[must_use]
    pub const fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Grade points for a stored grade; anything outside the vocabulary is 0.0
    #[must_use]
    pub fn grade_points(grade: &str) -> f64 {
        grade.parse::<Grade>().map_or(0.0, Grade::points)
    }

    /// Lenient GPA: unrecognized grades count as 0.0 points
    ///
    /// Unknown students and students without graded credits get 0.0.
    #[must_use]
    pub fn gpa(&self, student: &str) -> f64 {
        let graded = self.graded(student).map(|(grade, credits)| {
            (Self::grade_points(grade), credits)
        });
        weighted_average(graded)
    }

    /// Strict GPA: any unrecognized stored grade is an error
    ///
    /// # Errors
    /// Returns [`GradeError`] naming the first grade outside the vocabulary
    pub fn strict_gpa(&self, student: &str) -> Result<f64, GradeError> {
        let graded = self
            .graded(student)
            .map(|(grade, credits)| grade.parse::<Grade>().map(|g| (g.points(), credits)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(weighted_average(graded))
    }

    /// `(stored grade, credit hours)` for each completed, graded enrollment
    fn graded(&self, student: &str) -> impl Iterator<Item = (&'a str, u32)> + 'a {
        let catalog = self.catalog;
        let history = catalog
            .user_ref(student)
            .and_then(User::as_student)
            .map(|s| s.enrollments())
            .unwrap_or_default();
        catalog
            .enrollment_refs(history)
            .filter(|e| e.status() == EnrollmentStatus::Completed)
            .filter_map(move |e: &'a Enrollment| {
                let grade = e.grade()?;
                let credits = catalog
                    .offering_ref(e.offering())
                    .and_then(|o| catalog.course_ref(o.course()))?
                    .credit_hours();
                Some((grade, credits))
            })
    }
}

fn weighted_average(graded: impl IntoIterator<Item = (f64, u32)>) -> f64 {
    let (points, credits) = graded
        .into_iter()
        .fold((0.0, 0.0), |(points, credits), (grade, hours)| {
            let hours = f64::from(hours);
            (points + grade * hours, credits + hours)
        });
    if credits > 0.0 {
        points / credits
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{Course, Faculty, OfferingId, Role, Student};
    use chrono::NaiveDate;

    fn setup() -> (Catalog, OfferingId, OfferingId) {
        let mut catalog = Catalog::new("Test");
        catalog
            .add_course(Course::new("MATH1341", "Calculus 1", 3, 30).unwrap(), None)
            .unwrap();
        catalog
            .add_course(Course::new("PHYS1151", "Physics 1", 4, 30).unwrap(), None)
            .unwrap();
        let calc = catalog.add_offering("MATH1341", "Fall", 2026).unwrap();
        let phys = catalog.add_offering("PHYS1151", "Fall", 2026).unwrap();
        let admitted = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();
        catalog
            .add_user(User::new("s1", "Sam", Role::Student(Student::new("S-1".into(), admitted))).unwrap())
            .unwrap();
        catalog
            .add_user(User::new("f1", "Fay", Role::Faculty(Faculty::new("F-1".into(), String::new()))).unwrap())
            .unwrap();
        catalog.registration().assign_faculty("f1", calc).unwrap();
        catalog.registration().assign_faculty("f1", phys).unwrap();
        (catalog, calc, phys)
    }

    #[test]
    fn test_grade_points_table() {
        assert!((GpaCalculator::grade_points("B+") - 3.3).abs() < f64::EPSILON);
        assert!((GpaCalculator::grade_points("F")).abs() < f64::EPSILON);
        assert!((GpaCalculator::grade_points("Z")).abs() < f64::EPSILON);
    }

    #[test]
    fn test_no_completed_courses() {
        let (mut catalog, calc, _) = setup();
        assert!(catalog.gpa().gpa("s1").abs() < f64::EPSILON);
        catalog.registration().register("s1", calc).unwrap();
        assert!(catalog.gpa().gpa("s1").abs() < f64::EPSILON);
        assert!(catalog.gpa().gpa("nobody").abs() < f64::EPSILON);
    }

    #[test]
    fn test_single_b() {
        let (mut catalog, calc, _) = setup();
        let e = catalog.registration().register("s1", calc).unwrap();
        catalog.registration().assign_grade("f1", e.id(), "B").unwrap();
        assert!((catalog.gpa().gpa("s1") - 3.0).abs() < 1e-9);
        assert_eq!(catalog.gpa().strict_gpa("s1"), Ok(3.0));
    }

    #[test]
    fn test_credit_weighting() {
        let (mut catalog, calc, phys) = setup();
        let a = catalog.registration().register("s1", calc).unwrap();
        let b = catalog.registration().register("s1", phys).unwrap();
        catalog.registration().assign_grade("f1", a.id(), "A").unwrap();
        catalog.registration().assign_grade("f1", b.id(), "C").unwrap();
        // (4.0 * 3 + 2.0 * 4) / 7
        let expected = 20.0 / 7.0;
        assert!((catalog.gpa().gpa("s1") - expected).abs() < 1e-9);
    }

    #[test]
    fn test_withdrawn_excluded() {
        let (mut catalog, calc, phys) = setup();
        let a = catalog.registration().register("s1", calc).unwrap();
        let b = catalog.registration().register("s1", phys).unwrap();
        catalog.registration().assign_grade("f1", a.id(), "A-").unwrap();
        catalog.registration().drop("s1", b.id()).unwrap();
        assert!((catalog.gpa().gpa("s1") - 3.7).abs() < 1e-9);
    }

    #[test]
    fn test_weighted_average_empty() {
        assert!(weighted_average(Vec::new()).abs() < f64::EPSILON);
    }

    #[test]
    fn test_credit_total_beyond_u32() {
        assert!((weighted_average(vec![(4.0, u32::MAX), (4.0, 2)]) - 4.0).abs() < 1e-9);

        let (mut catalog, calc, _) = setup();
        catalog
            .add_course(Course::new("THESIS", "Thesis", u32::MAX, 30).unwrap(), None)
            .unwrap();
        let thesis = catalog.add_offering("THESIS", "Fall", 2026).unwrap();
        catalog.registration().assign_faculty("f1", thesis).unwrap();
        for offering in [calc, thesis] {
            let e = catalog.registration().register("s1", offering).unwrap();
            catalog.registration().assign_grade("f1", e.id(), "A").unwrap();
        }
        assert!((catalog.gpa().gpa("s1") - 4.0).abs() < 1e-9);
    }
}
