//! Concurrent access through `SharedRegistry`

use chrono::NaiveDate;
use std::thread;
use uni_records::core::catalog::Catalog;
use uni_records::core::errors::{PrerequisiteError, RegistrationError};
use uni_records::core::models::{Course, Role, Student, User};
use uni_records::core::shared::SharedRegistry;

const SEATS: u32 = 5;
const STUDENTS: usize = 40;

fn registry() -> (SharedRegistry, u32) {
    let mut catalog = Catalog::new("Concurrent U");
    catalog
        .add_course(Course::new("POPULAR", "Popular Course", 4, SEATS).unwrap(), None)
        .unwrap();
    catalog
        .add_course(Course::new("OTHER", "Other Course", 4, SEATS).unwrap(), None)
        .unwrap();
    let offering = catalog.add_offering("POPULAR", "Fall", 2026).unwrap();
    let admitted = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
    for i in 0..STUDENTS {
        catalog
            .add_user(
                User::new(
                    format!("s{i}"),
                    format!("Student {i}"),
                    Role::Student(Student::new(format!("S-{i}"), admitted)),
                )
                .unwrap(),
            )
            .unwrap();
    }
    (SharedRegistry::new(catalog), offering)
}

#[test]
fn concurrent_registrations_never_exceed_capacity() {
    let (registry, offering) = registry();

    let handles: Vec<_> = (0..STUDENTS)
        .map(|i| {
            let registry = registry.clone();
            thread::spawn(move || registry.register(&format!("s{i}"), offering))
        })
        .collect();
    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let admitted = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(admitted, SEATS as usize);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| *e == RegistrationError::CourseFull(offering)));

    let seats = registry.capacity(offering).unwrap();
    assert_eq!(seats.active_count(), SEATS as usize);
    assert!(!seats.has_available_seat());
}

#[test]
fn racing_edges_cannot_form_a_cycle() {
    let (registry, _) = registry();

    let forward = registry.clone();
    let backward = registry.clone();
    let a = thread::spawn(move || forward.add_prerequisite("POPULAR", "OTHER"));
    let b = thread::spawn(move || backward.add_prerequisite("OTHER", "POPULAR"));
    let results = [a.join().unwrap(), b.join().unwrap()];

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results
        .iter()
        .any(|r| matches!(r, Err(PrerequisiteError::CycleDetected { .. }))));
    registry.read(|catalog| {
        assert!(
            !(catalog.is_prerequisite_of("POPULAR", "OTHER")
                && catalog.is_prerequisite_of("OTHER", "POPULAR"))
        );
    });
}
