// darkroom/src/schedule.rs

//! Delivery estimates over the business calendar.
//!
//! An estimate is computed in three moves: snap the creation time into
//! business hours, add the service tier's turnaround, then snap the result
//! into business hours again. Customers have been quoted promises computed this
//! way, so the shape must not change.

use chrono::{
  DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveTime, Offset, TimeZone, Timelike, Utc, Weekday,
};
use serde::{Deserialize, Serialize};

const OPENING_HOUR: u32 = 10;
const CLOSING_HOUR: u32 = 18;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceTier {
  Standard,
  Express,
}

impl ServiceTier {
  pub fn from_express(express: bool) -> Self {
    if express {
      ServiceTier::Express
    } else {
      ServiceTier::Standard
    }
  }

  pub fn turnaround(self) -> Duration {
    match self {
      ServiceTier::Standard => Duration::hours(48),
      ServiceTier::Express => Duration::hours(24),
    }
  }
}

/// Monday to Friday, 10:00 to 18:00, in one fixed UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusinessCalendar {
  utc_offset: FixedOffset,
}

impl BusinessCalendar {
  pub fn new(utc_offset: FixedOffset) -> Self {
    Self { utc_offset }
  }

  /// Builds a calendar from an offset in minutes east of UTC.
  pub fn from_offset_minutes(minutes: i32) -> Option<Self> {
    minutes
      .checked_mul(60)
      .and_then(FixedOffset::east_opt)
      .map(Self::new)
  }

  pub fn utc_offset(&self) -> FixedOffset {
    self.utc_offset
  }

  pub fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
  }

  /// Whether `instant` falls inside opening hours on a business day.
  pub fn is_open(&self, instant: DateTime<Utc>) -> bool {
    let local = instant.with_timezone(&self.utc_offset);
    Self::is_business_day(local.date_naive()) && (OPENING_HOUR..CLOSING_HOUR).contains(&local.hour())
  }

  /// When work on an order created at `instant` can begin.
  pub fn processing_start(&self, instant: DateTime<Utc>) -> DateTime<Utc> {
    self.snap(instant)
  }

  /// Moves a computed delivery time into business hours.
  pub fn into_delivery_window(&self, instant: DateTime<Utc>) -> DateTime<Utc> {
    self.snap(instant)
  }

  pub fn calculate_eta(&self, created_at: DateTime<Utc>, express: bool) -> DateTime<Utc> {
    let start = self.processing_start(created_at);
    let due = start + ServiceTier::from_express(express).turnaround();
    self.into_delivery_window(due)
  }

  fn snap(&self, instant: DateTime<Utc>) -> DateTime<Utc> {
    let local = instant.with_timezone(&self.utc_offset);
    let date = local.date_naive();
    let hour = local.hour();

    let opening_day = if !Self::is_business_day(date) || hour >= CLOSING_HOUR {
      next_business_day(date)
    } else if hour < OPENING_HOUR {
      date
    } else {
      return instant;
    };
    self.opening_on(opening_day)
  }

  fn opening_on(&self, date: NaiveDate) -> DateTime<Utc> {
    let opening = NaiveTime::from_hms_opt(OPENING_HOUR, 0, 0).unwrap_or(NaiveTime::MIN);
    let local = date.and_time(opening);
    // A fixed offset has exactly one mapping for every local time.
    let utc_naive = local - Duration::seconds(i64::from(self.utc_offset.local_minus_utc()));
    Utc.from_utc_datetime(&utc_naive)
  }
}

impl Default for BusinessCalendar {
  fn default() -> Self {
    Self::new(FixedOffset::east_opt(0).unwrap_or_else(|| Utc.fix()))
  }
}

fn next_business_day(date: NaiveDate) -> NaiveDate {
  let mut next = date;
  loop {
    next = match next.succ_opt() {
      Some(day) => day,
      None => return next,
    };
    if BusinessCalendar::is_business_day(next) {
      return next;
    }
  }
}

/// [`BusinessCalendar::calculate_eta`] on the default calendar.
pub fn calculate_eta(created_at: DateTime<Utc>, express: bool) -> DateTime<Utc> {
  BusinessCalendar::default().calculate_eta(created_at, express)
}
