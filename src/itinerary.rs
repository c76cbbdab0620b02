//! Temporal access gate for trip itinerary and medical detail
//!
//! Itineraries are submitted shortly before a trip and their sensitive
//! fields (routes, medical info, emergency contacts) are suppressed once
//! the trip is safely over. The state is recomputed from the clock on
//! every read; nothing is stored.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// Visibility of a trip's itinerary detail at a given date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItineraryAccess {
    /// Before the unlock date: the itinerary cannot be submitted or viewed
    Locked,
    /// From the unlock date through the grace period after the trip
    Open,
    /// After the grace period: sensitive fields are suppressed from
    /// output, though the record itself is retained
    Expired,
}

impl ItineraryAccess {
    pub fn sensitive_visible(&self) -> bool {
        matches!(self, ItineraryAccess::Open)
    }
}

/// The Friday on or before the trip date. Itineraries unlock the Friday
/// preceding the weekend a trip runs on; a Friday trip unlocks that day.
pub fn friday_before(trip_date: NaiveDate) -> NaiveDate {
    let days_past_friday =
        (trip_date.weekday().num_days_from_monday() + 7 - Weekday::Fri.num_days_from_monday()) % 7;
    trip_date - Duration::days(days_past_friday as i64)
}

/// Compute itinerary visibility for `today`.
///
/// Trips can span a weekend while only the start date is recorded, so the
/// grace period keeps detail available a few days past `trip_date`.
pub fn itinerary_access(trip_date: NaiveDate, today: NaiveDate, grace_days: i64) -> ItineraryAccess {
    if today < friday_before(trip_date) {
        ItineraryAccess::Locked
    } else if today <= trip_date + Duration::days(grace_days) {
        ItineraryAccess::Open
    } else {
        ItineraryAccess::Expired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn friday_before_a_saturday_trip_is_the_day_before() {
        // 2024-06-15 is a Saturday
        assert_eq!(friday_before(date(2024, 6, 15)), date(2024, 6, 14));
    }

    #[test]
    fn a_friday_trip_unlocks_that_same_friday() {
        // 2024-06-14 is a Friday
        assert_eq!(friday_before(date(2024, 6, 14)), date(2024, 6, 14));
    }

    #[test]
    fn friday_before_a_thursday_trip_is_the_prior_week() {
        // 2024-06-13 is a Thursday
        assert_eq!(friday_before(date(2024, 6, 13)), date(2024, 6, 7));
    }

    #[test]
    fn locked_until_the_friday_boundary() {
        let trip_date = date(2024, 6, 15);
        assert_eq!(
            itinerary_access(trip_date, date(2024, 6, 13), 5),
            ItineraryAccess::Locked
        );
        assert_eq!(
            itinerary_access(trip_date, date(2024, 6, 14), 5),
            ItineraryAccess::Open
        );
    }

    #[test]
    fn open_through_the_grace_period_then_expired() {
        let trip_date = date(2024, 6, 15);
        assert_eq!(
            itinerary_access(trip_date, date(2024, 6, 20), 5),
            ItineraryAccess::Open
        );
        let expired = itinerary_access(trip_date, date(2024, 6, 21), 5);
        assert_eq!(expired, ItineraryAccess::Expired);
        assert!(!expired.sensitive_visible());
    }
}
