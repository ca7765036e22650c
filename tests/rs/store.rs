//! Snapshot persistence tests

use std::fs;
use tempfile::TempDir;
use uni_records::core::errors::{
    CatalogError, PrerequisiteError, RecordError, RegistrationError, ScheduleError,
};
use uni_records::core::models::EnrollmentStatus;
use uni_records::core::store::{RecordStore, StoreError, TomlRecordStore};

const SAMPLE: &str = "samples/records/university.toml";

const HEADER: &str = r#"
name = "Broken U"

[[courses]]
course_id = "A"
title = "Course A"
credit_hours = 3
max_capacity = 1

[[courses]]
course_id = "B"
title = "Course B"
credit_hours = 3
max_capacity = 1

[[users]]
user_id = "s1"
name = "One"

[users.role]
kind = "Student"
student_id = "S-1"
admission_date = "2025-09-01"

[[users]]
user_id = "s2"
name = "Two"

[users.role]
kind = "Student"
student_id = "S-2"
admission_date = "2025-09-01"
"#;

fn invalid(extra: &str) -> RecordError {
    match TomlRecordStore::parse(&format!("{HEADER}{extra}")) {
        Err(StoreError::Invalid(err)) => err,
        other => panic!("expected an invalid snapshot, got {other:?}"),
    }
}

#[test]
fn round_trip_preserves_records() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let original = TomlRecordStore::new(SAMPLE).load().unwrap();

    let store = TomlRecordStore::new(dir.path().join("nested").join("records.toml"));
    store.save(&original).unwrap();
    let reloaded = store.load().unwrap();

    assert_eq!(reloaded.name, original.name);
    assert_eq!(reloaded.courses(), original.courses());
    assert_eq!(reloaded.users(), original.users());
    assert_eq!(reloaded.offerings(), original.offerings());
    assert_eq!(reloaded.enrollments(), original.enrollments());
    assert_eq!(reloaded.prerequisites("CS2510"), original.prerequisites("CS2510"));
}

#[test]
fn mutations_survive_save_and_load() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("records.toml");
    fs::copy(SAMPLE, &path).unwrap();
    let store = TomlRecordStore::new(&path);

    let mut catalog = store.load().unwrap();
    let enrollment = catalog.registration().register("s1", 3).unwrap();
    store.save(&catalog).unwrap();

    let mut reloaded = store.load().unwrap();
    assert_eq!(
        reloaded.enrollment(enrollment.id()).unwrap().status(),
        EnrollmentStatus::Enrolled
    );
    // Id allocation continues after the restored records
    let next = reloaded.registration().register("s2", 2).unwrap();
    assert!(next.id() > enrollment.id());
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = TomlRecordStore::new(dir.path().join("absent.toml"));
    assert!(matches!(store.load(), Err(StoreError::Io { .. })));
}

#[test]
fn malformed_toml_is_a_decode_error() {
    assert!(matches!(
        TomlRecordStore::parse("name = [unterminated"),
        Err(StoreError::Decode(_))
    ));
}

#[test]
fn cyclic_prerequisites_are_rejected() {
    let err = invalid(
        r#"
[[prerequisites]]
course = "A"
prerequisite = "B"

[[prerequisites]]
course = "B"
prerequisite = "A"
"#,
    );
    assert!(matches!(
        err,
        RecordError::Prerequisite(PrerequisiteError::CycleDetected { .. })
    ));
}

#[test]
fn overlapping_meetings_are_rejected() {
    let err = invalid(
        r#"
[[offerings]]
offering_id = 1
course = "A"
semester = "Fall"
year = 2026

[[offerings.schedules]]
day = "Monday"
start = "09:00:00"
end = "10:00:00"
location = "R1"

[[offerings.schedules]]
day = "Monday"
start = "09:30:00"
end = "10:30:00"
location = "R2"
"#,
    );
    assert!(matches!(
        err,
        RecordError::Schedule(ScheduleError::ScheduleConflict { .. })
    ));
}

#[test]
fn overfilled_offering_is_rejected() {
    let err = invalid(
        r#"
[[offerings]]
offering_id = 1
course = "A"
semester = "Fall"
year = 2026

[[enrollments]]
enrollment_id = 1
student = "s1"
offering = 1
enrollment_date = "2026-08-01"
status = "Enrolled"

[[enrollments]]
enrollment_id = 2
student = "s2"
offering = 1
enrollment_date = "2026-08-01"
status = "Enrolled"
"#,
    );
    assert_eq!(
        err,
        RecordError::Catalog(CatalogError::CapacityExceeded {
            offering: 1,
            active: 2,
            capacity: 1
        })
    );
}

const OFFERING_A: &str = r#"
[[offerings]]
offering_id = 1
course = "A"
semester = "Fall"
year = 2026
"#;

#[test]
fn grade_on_unfinished_enrollment_is_rejected() {
    let err = invalid(&format!(
        "{OFFERING_A}{}",
        r#"
[[enrollments]]
enrollment_id = 1
student = "s1"
offering = 1
enrollment_date = "2026-08-01"
grade = "A"
status = "Enrolled"
"#
    ));
    assert_eq!(
        err,
        RecordError::Catalog(CatalogError::UnexpectedGrade {
            enrollment: 1,
            status: EnrollmentStatus::Enrolled
        })
    );
}

#[test]
fn second_active_enrollment_in_same_offering_is_rejected() {
    let err = invalid(&format!(
        "{OFFERING_A}{}",
        r#"
[[enrollments]]
enrollment_id = 1
student = "s1"
offering = 1
enrollment_date = "2026-08-01"
grade = "B"
status = "Completed"

[[enrollments]]
enrollment_id = 2
student = "s1"
offering = 1
enrollment_date = "2026-08-02"
status = "Enrolled"
"#
    ));
    assert_eq!(
        err,
        RecordError::Catalog(CatalogError::DuplicateActiveEnrollment {
            student: "s1".to_string(),
            offering: 1
        })
    );
}

#[test]
fn withdrawn_history_does_not_block_a_later_enrollment() {
    let catalog = TomlRecordStore::parse(&format!(
        "{HEADER}{OFFERING_A}{}",
        r#"
[[enrollments]]
enrollment_id = 1
student = "s1"
offering = 1
enrollment_date = "2026-08-01"
status = "Withdrawn"

[[enrollments]]
enrollment_id = 2
student = "s1"
offering = 1
enrollment_date = "2026-08-02"
status = "Enrolled"
"#
    ))
    .unwrap();
    assert_eq!(catalog.student_enrollments("s1").len(), 2);
}

#[test]
fn largest_enrollment_id_is_rejected() {
    let err = invalid(&format!(
        "{OFFERING_A}{}",
        r#"
[[enrollments]]
enrollment_id = 4294967295
student = "s1"
offering = 1
enrollment_date = "2026-08-01"
status = "Withdrawn"
"#
    ));
    assert_eq!(
        err,
        RecordError::Catalog(CatalogError::IdSpaceExhausted("enrollment"))
    );
}

#[test]
fn largest_offering_id_is_rejected() {
    let err = invalid(
        r#"
[[offerings]]
offering_id = 4294967295
course = "A"
semester = "Fall"
year = 2026
"#,
    );
    assert_eq!(
        err,
        RecordError::Catalog(CatalogError::IdSpaceExhausted("offering"))
    );
}

#[test]
fn registration_reports_exhausted_enrollment_ids() {
    let mut catalog = TomlRecordStore::parse(&format!(
        "{HEADER}{OFFERING_A}{}",
        r#"
[[enrollments]]
enrollment_id = 4294967294
student = "s2"
offering = 1
enrollment_date = "2026-08-01"
status = "Withdrawn"
"#
    ))
    .unwrap();
    assert_eq!(
        catalog.registration().register("s1", 1),
        Err(RegistrationError::IdSpaceExhausted)
    );
    assert_eq!(catalog.capacity(1).unwrap().active_count(), 0);
}

#[test]
fn dangling_references_are_rejected() {
    let err = invalid(
        r#"
[[offerings]]
offering_id = 1
course = "NOPE"
semester = "Fall"
year = 2026
"#,
    );
    assert_eq!(
        err,
        RecordError::Catalog(CatalogError::UnknownCourse("NOPE".to_string()))
    );
}

#[test]
fn unknown_stored_grade_only_fails_strict_gpa() {
    let catalog = TomlRecordStore::parse(&format!(
        "{HEADER}{}",
        r#"
[[offerings]]
offering_id = 1
course = "A"
semester = "Fall"
year = 2025

[[enrollments]]
enrollment_id = 1
student = "s1"
offering = 1
enrollment_date = "2025-08-01"
grade = "P"
status = "Completed"
"#
    ))
    .unwrap();

    assert!(catalog.gpa().gpa("s1").abs() < f64::EPSILON);
    assert!(catalog.gpa().strict_gpa("s1").is_err());
}
