use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::models::Booking;
use crate::services::validation::ValidationError;

pub const DEFAULT_BOOKING_WINDOW_DAYS: i64 = 30;

/// Start of the given calendar day.
pub fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Check a proposed rental range against today and ordering rules.
///
/// `today` is compared by calendar day only, so a start earlier today is still
/// accepted. Existing bookings are not consulted; see [`is_date_available`].
pub fn validate_range(
    start: NaiveDateTime,
    end: NaiveDateTime,
    today: NaiveDateTime,
) -> Result<(), ValidationError> {
    if start < midnight(today.date()) {
        return Err(ValidationError::StartInPast);
    }
    if end <= start {
        return Err(ValidationError::EndNotAfterStart);
    }
    Ok(())
}

/// Anything occupying a span of calendar days.
pub trait Reserved {
    fn span(&self) -> (NaiveDate, NaiveDate);
}

impl Reserved for Booking {
    fn span(&self) -> (NaiveDate, NaiveDate) {
        (self.start_date, self.end_date)
    }
}

impl Reserved for (NaiveDate, NaiveDate) {
    fn span(&self) -> (NaiveDate, NaiveDate) {
        *self
    }
}

/// A date is available unless it falls strictly inside an existing booking.
/// Start and end days themselves count as available.
pub fn is_date_available<R: Reserved>(candidate: NaiveDate, bookings: &[R]) -> bool {
    !bookings.iter().any(|b| {
        let (start, end) = b.span();
        candidate > start && candidate < end
    })
}

/// Earliest date a booking form accepts.
pub fn min_booking_date(today: NaiveDate) -> NaiveDate {
    today
}

/// Latest date a booking form accepts, `days` ahead of today.
pub fn max_booking_date(today: NaiveDate, days: i64) -> NaiveDate {
    today + Duration::days(days)
}

/// Whole calendar days from `start` to `end`; negative when inverted.
pub fn days_between(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days()
}

/// Display form used in booking lists, e.g. `Nov 01, 2026`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %d, %Y").to_string()
}
