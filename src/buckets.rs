//! Day-offset and expiry bucket calculation.
//!
//! Everything here is a pure function of "today" and a product's expiry
//! date. Offsets use whole-calendar-day arithmetic: 0 = expires today,
//! negative = already expired.

use chrono::NaiveDate;

/// Canonical date form stored by the inventory (zero-padded, fixed-width).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Mutually exclusive expiry buckets covering day-offsets up to 7.
///
/// Offsets above 7 are outside the alerting horizon and belong to no bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    /// Expires today or tomorrow, or has already expired
    WithinOneDay,
    /// Expires in 2 to 3 days
    TwoToThreeDays,
    /// Expires in 4 to 7 days
    FourToSevenDays,
}

impl Bucket {
    /// Classify a day-offset into a bucket.
    ///
    /// Returns `None` for offsets beyond 7 days.
    pub fn classify(day_offset: i64) -> Option<Bucket> {
        match day_offset {
            d if d <= 1 => Some(Bucket::WithinOneDay),
            2..=3 => Some(Bucket::TwoToThreeDays),
            4..=7 => Some(Bucket::FourToSevenDays),
            _ => None,
        }
    }
}

/// Whole-day offset between `today` and an expiry date in `YYYY-MM-DD` form.
///
/// Returns `None` when the date is unparseable, which the callers treat as
/// "infinitely far": such records never reach a bucket.
pub fn day_offset(today: NaiveDate, expiry_date: &str) -> Option<i64> {
    let expiry = NaiveDate::parse_from_str(expiry_date.trim(), DATE_FORMAT).ok()?;
    Some((expiry - today).num_days())
}

/// Bucket for a product's (optional) expiry date, or `None` when the record
/// is missing a date, carries an unparseable one, or falls outside the
/// 7-day horizon.
pub fn bucket_for(today: NaiveDate, expiry_date: Option<&str>) -> Option<Bucket> {
    let offset = day_offset(today, expiry_date?)?;
    Bucket::classify(offset)
}

/// Per-bucket tallies for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BucketCounts {
    /// Products expiring within one day (including already expired)
    pub due_1d: u32,
    /// Products expiring in 2-3 days
    pub due_3d: u32,
    /// Products expiring in 4-7 days
    pub due_7d: u32,
}

impl BucketCounts {
    /// Record one classified product.
    pub fn record(&mut self, bucket: Bucket) {
        match bucket {
            Bucket::WithinOneDay => self.due_1d += 1,
            Bucket::TwoToThreeDays => self.due_3d += 1,
            Bucket::FourToSevenDays => self.due_7d += 1,
        }
    }

    /// Total number of classified products.
    pub fn total(&self) -> u32 {
        self.due_1d + self.due_3d + self.due_7d
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    #[test]
    fn classify_boundaries() {
        assert_eq!(Bucket::classify(-5), Some(Bucket::WithinOneDay));
        assert_eq!(Bucket::classify(0), Some(Bucket::WithinOneDay));
        assert_eq!(Bucket::classify(1), Some(Bucket::WithinOneDay));
        assert_eq!(Bucket::classify(2), Some(Bucket::TwoToThreeDays));
        assert_eq!(Bucket::classify(3), Some(Bucket::TwoToThreeDays));
        assert_eq!(Bucket::classify(4), Some(Bucket::FourToSevenDays));
        assert_eq!(Bucket::classify(7), Some(Bucket::FourToSevenDays));
        assert_eq!(Bucket::classify(8), None);
        assert_eq!(Bucket::classify(30), None);
    }

    #[test]
    fn day_offset_counts_calendar_days() {
        let today = date("2025-03-10");
        assert_eq!(day_offset(today, "2025-03-10"), Some(0));
        assert_eq!(day_offset(today, "2025-03-11"), Some(1));
        assert_eq!(day_offset(today, "2025-03-17"), Some(7));
        assert_eq!(day_offset(today, "2025-03-09"), Some(-1));
        // Across a month boundary
        assert_eq!(day_offset(today, "2025-04-01"), Some(22));
    }

    #[test]
    fn day_offset_rejects_malformed_dates() {
        let today = date("2025-03-10");
        assert_eq!(day_offset(today, ""), None);
        assert_eq!(day_offset(today, "soon"), None);
        assert_eq!(day_offset(today, "2025/03/12"), None);
    }

    #[test]
    fn bucket_for_excludes_missing_and_far_dates() {
        let today = date("2025-03-10");
        assert_eq!(bucket_for(today, None), None);
        assert_eq!(bucket_for(today, Some("not-a-date")), None);
        assert_eq!(bucket_for(today, Some("2025-03-19")), None); // offset 9
        assert_eq!(
            bucket_for(today, Some("2025-03-12")),
            Some(Bucket::TwoToThreeDays)
        );
    }

    #[test]
    fn counts_total_matches_recorded_items() {
        let mut counts = BucketCounts::default();
        counts.record(Bucket::WithinOneDay);
        counts.record(Bucket::WithinOneDay);
        counts.record(Bucket::TwoToThreeDays);
        counts.record(Bucket::FourToSevenDays);
        assert_eq!(counts.due_1d, 2);
        assert_eq!(counts.due_3d, 1);
        assert_eq!(counts.due_7d, 1);
        assert_eq!(counts.total(), 4);
    }
}
