//! Integration smoke tests for `uni_records`

use uni_records::core::store::{RecordStore, TomlRecordStore};
use uni_records::get_version;

const SAMPLE: &str = "samples/records/university.toml";

#[test]
fn version_is_not_empty() {
    let v = get_version();
    assert!(!v.trim().is_empty());
}

#[test]
fn sample_snapshot_loads() {
    let catalog = TomlRecordStore::new(SAMPLE)
        .load()
        .expect("sample snapshot should be consistent");

    assert_eq!(catalog.name, "Northeastern Example University");
    assert_eq!(catalog.courses().len(), 4);
    assert_eq!(catalog.users().len(), 4);
    assert_eq!(catalog.offerings().len(), 3);
    assert_eq!(catalog.enrollments().len(), 3);

    // Derived relations are rebuilt on load
    assert_eq!(catalog.student_enrollments("s1").len(), 2);
    assert_eq!(catalog.offering_enrollments(1).len(), 2);
    let hopper = catalog.user("f1").unwrap();
    assert_eq!(hopper.as_faculty().unwrap().teaching(), vec![1, 2, 3]);
    assert_eq!(
        catalog.department("CS").unwrap().faculty(),
        vec!["f1".to_string()]
    );
    assert_eq!(catalog.department("MATH").unwrap().courses(), vec!["MATH1341".to_string()]);
    assert_eq!(catalog.offering(1).unwrap().schedules().len(), 2);
    assert!(catalog.is_prerequisite_of("CS1800", "CS2510"));
}
