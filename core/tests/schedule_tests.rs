// tests/schedule_tests.rs
use chrono::{DateTime, Duration, TimeZone, Utc};
use darkroom::schedule::{calculate_eta, BusinessCalendar, ServiceTier};
use proptest::prelude::*;

fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
  Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

// 2024-01-01 is a Monday.

#[test]
fn test_monday_before_opening_standard_is_wednesday_opening() {
  assert_eq!(calculate_eta(utc(2024, 1, 1, 9, 0), false), utc(2024, 1, 3, 10, 0));
}

#[test]
fn test_friday_evening_express_is_tuesday_opening() {
  assert_eq!(calculate_eta(utc(2024, 1, 5, 19, 0), true), utc(2024, 1, 9, 10, 0));
}

#[test]
fn test_weekend_creation_starts_monday() {
  let calendar = BusinessCalendar::default();
  assert_eq!(calendar.processing_start(utc(2024, 1, 6, 12, 0)), utc(2024, 1, 8, 10, 0));
  assert_eq!(calendar.calculate_eta(utc(2024, 1, 7, 23, 59), false), utc(2024, 1, 10, 10, 0));
}

#[test]
fn test_due_time_on_weekend_moves_to_monday() {
  // Thursday 17:30 + 48h lands on Saturday.
  assert_eq!(calculate_eta(utc(2024, 1, 4, 17, 30), false), utc(2024, 1, 8, 10, 0));
}

#[test]
fn test_open_hours_are_kept() {
  let calendar = BusinessCalendar::default();
  let inside = utc(2024, 1, 3, 17, 59);
  assert_eq!(calendar.processing_start(inside), inside);
  assert_eq!(calendar.calculate_eta(inside, true), utc(2024, 1, 4, 17, 59));
}

#[test]
fn test_closing_time_counts_as_closed() {
  let calendar = BusinessCalendar::default();
  assert!(!calendar.is_open(utc(2024, 1, 3, 18, 0)));
  assert_eq!(calendar.processing_start(utc(2024, 1, 3, 18, 0)), utc(2024, 1, 4, 10, 0));
  assert_eq!(calendar.calculate_eta(utc(2024, 1, 3, 18, 0), true), utc(2024, 1, 5, 10, 0));
}

#[test]
fn test_calendar_with_utc_offset() {
  let calendar = BusinessCalendar::from_offset_minutes(120).unwrap();
  // 07:00 UTC is 09:00 local, before opening.
  let start = calendar.processing_start(utc(2024, 1, 1, 7, 0));
  assert_eq!(start, utc(2024, 1, 1, 8, 0));
  assert_eq!(calendar.calculate_eta(utc(2024, 1, 1, 7, 0), false), utc(2024, 1, 3, 8, 0));
  // 16:30 UTC is 18:30 local on a Friday.
  assert_eq!(calendar.calculate_eta(utc(2024, 1, 5, 16, 30), true), utc(2024, 1, 9, 8, 0));
}

#[test]
fn test_invalid_offset_is_rejected() {
  assert!(BusinessCalendar::from_offset_minutes(24 * 60).is_none());
  assert!(BusinessCalendar::from_offset_minutes(-330).is_some());
}

#[test]
fn test_service_tier_turnaround() {
  assert_eq!(ServiceTier::from_express(true).turnaround(), Duration::hours(24));
  assert_eq!(ServiceTier::from_express(false).turnaround(), Duration::hours(48));
}

proptest! {
  #[test]
  fn prop_eta_is_inside_business_hours(
    secs in 1_600_000_000i64..1_900_000_000,
    express in any::<bool>(),
    offset_hours in -11i32..=12,
  ) {
    let calendar = BusinessCalendar::from_offset_minutes(offset_hours * 60).unwrap();
    let created = Utc.timestamp_opt(secs, 0).unwrap();
    let eta = calendar.calculate_eta(created, express);

    prop_assert!(calendar.is_open(eta));
    prop_assert!(eta >= created + ServiceTier::from_express(express).turnaround());
    prop_assert_eq!(calendar.into_delivery_window(eta), eta);
    // Pure: the same inputs always give the same promise.
    prop_assert_eq!(calendar.calculate_eta(created, express), eta);
  }
}
