use bigdecimal::BigDecimal;
use chrono::{DateTime, FixedOffset, NaiveTime, TimeDelta, TimeZone, Utc};

#[derive(Debug, Clone)]
pub struct OrderStats {
    pub total_orders: i64,
    pub total_amount: BigDecimal,
    pub today_orders: i64,
    pub today_amount: BigDecimal,
}

/// Half-open UTC interval `[start, end)` covering one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DayWindow {
    /// The calendar day containing `now`, as seen from `offset`.
    pub fn containing(now: DateTime<Utc>, offset: FixedOffset) -> Self {
        let local_midnight = now
            .with_timezone(&offset)
            .date_naive()
            .and_time(NaiveTime::MIN);
        let utc_midnight =
            local_midnight - TimeDelta::seconds(i64::from(offset.local_minus_utc()));
        let start = Utc.from_utc_datetime(&utc_midnight);
        Self {
            start,
            end: start + TimeDelta::days(1),
        }
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn utc_window_spans_midnight_to_midnight() {
        let offset = FixedOffset::east_opt(0).unwrap();
        let window = DayWindow::containing(utc("2024-05-10T15:30:00Z"), offset);
        assert_eq!(window.start, utc("2024-05-10T00:00:00Z"));
        assert_eq!(window.end, utc("2024-05-11T00:00:00Z"));
    }

    #[test]
    fn positive_offset_shifts_the_day() {
        // 20:00 UTC is already the next day at UTC+8.
        let offset = FixedOffset::east_opt(8 * 3600).unwrap();
        let window = DayWindow::containing(utc("2024-05-10T20:00:00Z"), offset);
        assert_eq!(window.start, utc("2024-05-10T16:00:00Z"));
        assert_eq!(window.end, utc("2024-05-11T16:00:00Z"));
    }

    #[test]
    fn negative_offset_shifts_the_day() {
        let offset = FixedOffset::west_opt(5 * 3600).unwrap();
        let window = DayWindow::containing(utc("2024-05-10T03:00:00Z"), offset);
        assert_eq!(window.start, utc("2024-05-09T05:00:00Z"));
        assert_eq!(window.end, utc("2024-05-10T05:00:00Z"));
    }

    #[test]
    fn boundary_instant_belongs_to_exactly_one_day() {
        let offset = FixedOffset::east_opt(0).unwrap();
        let midnight = utc("2024-05-11T00:00:00Z");
        let yesterday = DayWindow::containing(utc("2024-05-10T12:00:00Z"), offset);
        let today = DayWindow::containing(midnight, offset);
        assert!(!yesterday.contains(midnight));
        assert!(today.contains(midnight));
        assert_eq!(yesterday.end, today.start);
    }
}
