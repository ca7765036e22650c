//! Property tests for meeting-time overlap

use chrono::NaiveTime;
use proptest::prelude::*;
use uni_records::core::models::{conflicts, Day, Schedule};

/// A valid meeting on one of the first three weekdays, minute resolution
fn meeting() -> impl Strategy<Value = Schedule> {
    (0usize..3, 0u32..1439, 1u32..240).prop_map(|(day, start, len)| {
        let end = (start + len).min(1439).max(start + 1);
        let time = |m: u32| NaiveTime::from_hms_opt(m / 60, m % 60, 0).unwrap();
        Schedule::new(Day::ALL[day], time(start), time(end), "Room").unwrap()
    })
}

proptest! {
    #[test]
    fn conflict_is_symmetric(a in meeting(), b in meeting()) {
        prop_assert_eq!(conflicts(&a, &b), conflicts(&b, &a));
    }

    #[test]
    fn meeting_conflicts_with_itself(a in meeting()) {
        prop_assert!(conflicts(&a, &a));
    }

    #[test]
    fn back_to_back_meetings_never_conflict(a in meeting(), len in 1u32..120) {
        let start = a.end();
        let end = start + chrono::Duration::minutes(i64::from(len));
        // Skip intervals that would wrap past midnight
        prop_assume!(end > start);
        let next = Schedule::new(a.day(), start, end, "Room").unwrap();
        prop_assert!(!conflicts(&a, &next));
        prop_assert!(!conflicts(&next, &a));
    }

    #[test]
    fn different_days_never_conflict(a in meeting(), b in meeting()) {
        prop_assume!(a.day() != b.day());
        prop_assert!(!conflicts(&a, &b));
    }
}
