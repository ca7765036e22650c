//! End-to-end registration scenarios through the public API

use chrono::{NaiveDate, NaiveTime};
use uni_records::core::catalog::Catalog;
use uni_records::core::errors::{DropError, PrerequisiteError, RegistrationError, ScheduleError};
use uni_records::core::models::{
    conflicts, Course, Day, EnrollmentStatus, Faculty, OfferingId, Role, Schedule, Student, User,
};

fn admitted() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 9, 1).unwrap()
}

fn student(id: &str) -> User {
    User::new(id, format!("Student {id}"), Role::Student(Student::new(id.to_uppercase(), admitted())))
        .unwrap()
}

fn at(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

/// A <- B <- C chain of 3-credit courses with one offering each, seat limit 2
fn chain() -> (Catalog, [OfferingId; 3]) {
    let mut catalog = Catalog::new("Integration U");
    for id in ["A", "B", "C"] {
        catalog
            .add_course(Course::new(id, format!("Course {id}"), 3, 2).unwrap(), None)
            .unwrap();
    }
    catalog.add_prerequisite("B", "A").unwrap();
    catalog.add_prerequisite("C", "B").unwrap();
    let offerings = ["A", "B", "C"].map(|c| catalog.add_offering(c, "Fall", 2026).unwrap());

    for id in ["s1", "s2", "s3"] {
        catalog.add_user(student(id)).unwrap();
    }
    catalog
        .add_user(
            User::new(
                "prof",
                "Professor",
                Role::Faculty(Faculty::new("F-1".to_string(), "Theory".to_string())),
            )
            .unwrap(),
        )
        .unwrap();
    for offering in offerings {
        catalog.registration().assign_faculty("prof", offering).unwrap();
    }
    (catalog, offerings)
}

#[test]
fn transitive_prerequisites_and_cycle_rejection() {
    let (mut catalog, _) = chain();
    assert!(catalog.is_prerequisite_of("A", "C"));
    assert!(!catalog.is_prerequisite_of("C", "A"));

    assert_eq!(
        catalog.add_prerequisite("A", "C"),
        Err(PrerequisiteError::CycleDetected {
            course: "A".to_string(),
            prerequisite: "C".to_string()
        })
    );
    assert_eq!(
        catalog.add_prerequisite("B", "B"),
        Err(PrerequisiteError::SelfDependency("B".to_string()))
    );
    assert!(catalog.prerequisites("A").is_empty());
}

#[test]
fn boundary_touching_meetings_do_not_conflict() {
    let nine = Schedule::new(Day::Monday, at(9, 0), at(10, 0), "R1").unwrap();
    let ten = Schedule::new(Day::Monday, at(10, 0), at(11, 0), "R1").unwrap();
    let late = Schedule::new(Day::Monday, at(9, 0), at(10, 1), "R1").unwrap();
    let tuesday = Schedule::new(Day::Tuesday, at(9, 0), at(10, 1), "R1").unwrap();

    assert!(!conflicts(&nine, &ten));
    assert!(conflicts(&late, &ten));
    assert!(!conflicts(&tuesday, &ten));
    assert_eq!(
        Schedule::new(Day::Monday, at(10, 0), at(10, 0), "R1"),
        Err(ScheduleError::InvalidInterval {
            start: at(10, 0),
            end: at(10, 0)
        })
    );
}

#[test]
fn walk_the_chain() {
    let (mut catalog, [a, b, c]) = chain();

    assert!(matches!(
        catalog.registration().register("s1", c),
        Err(RegistrationError::PrerequisiteNotMet { course }) if course == "B"
    ));

    let ea = catalog.registration().register("s1", a).unwrap();
    catalog.registration().assign_grade("prof", ea.id(), "B").unwrap();
    let eb = catalog.registration().register("s1", b).unwrap();
    catalog.registration().assign_grade("prof", eb.id(), "A").unwrap();
    let ec = catalog.registration().register("s1", c).unwrap();
    assert_eq!(ec.status(), EnrollmentStatus::Enrolled);

    // (3.0 * 3 + 4.0 * 3) / 6
    assert!((catalog.gpa().gpa("s1") - 3.5).abs() < 1e-9);
    assert_eq!(catalog.student_enrollments("s1").len(), 3);
}

#[test]
fn capacity_is_enforced_and_freed_by_withdrawal() {
    let (mut catalog, [a, _, _]) = chain();
    let first = catalog.registration().register("s1", a).unwrap();
    let before = catalog.capacity(a).unwrap().active_count();
    catalog.registration().register("s2", a).unwrap();
    assert_eq!(catalog.capacity(a).unwrap().active_count(), before + 1);

    assert_eq!(
        catalog.registration().register("s3", a),
        Err(RegistrationError::CourseFull(a))
    );

    catalog.registration().drop("s1", first.id()).unwrap();
    assert!(catalog.registration().register("s3", a).is_ok());
    assert_eq!(catalog.registration().roster(a), vec!["s2".to_string(), "s3".to_string()]);
}

#[test]
fn completed_enrollments_cannot_be_dropped() {
    let (mut catalog, [a, _, _]) = chain();
    let e = catalog.registration().register("s1", a).unwrap();
    catalog.registration().assign_grade("prof", e.id(), "C").unwrap();

    assert_eq!(
        catalog.registration().drop("s1", e.id()),
        Err(DropError::AlreadyCompleted(e.id()))
    );
    assert_eq!(
        catalog.enrollment(e.id()).unwrap().status(),
        EnrollmentStatus::Completed
    );
}

#[test]
fn reregistration_after_withdrawal_creates_new_enrollment() {
    let (mut catalog, [a, _, _]) = chain();
    let first = catalog.registration().register("s1", a).unwrap();
    catalog.registration().drop("s1", first.id()).unwrap();
    let second = catalog.registration().register("s1", a).unwrap();

    assert_ne!(first.id(), second.id());
    assert_eq!(
        catalog.enrollment(first.id()).unwrap().status(),
        EnrollmentStatus::Withdrawn
    );
    assert_eq!(catalog.capacity(a).unwrap().active_count(), 1);
}

#[test]
fn accessor_copies_do_not_alias_the_catalog() {
    let (mut catalog, [a, _, _]) = chain();
    let mut copy = catalog.course("A").unwrap();
    copy.title = "Renamed".to_string();
    assert_eq!(catalog.course("A").unwrap().title, "Course A");

    catalog.registration().register("s1", a).unwrap();
    let mut listed = catalog.offering_enrollments(a);
    listed.clear();
    assert_eq!(catalog.offering_enrollments(a).len(), 1);
}
