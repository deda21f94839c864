use crate::constants::SNAPSHOT_REFRESH_HOUR;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};
use chrono_tz::Tz;

/// Once-a-day snapshot schedule for the US market
#[derive(Debug, Clone)]
pub struct SnapshotSchedule {
    pub timezone: Tz,
    /// Local time of day after which today's snapshot may be taken
    pub refresh_time: NaiveTime,
}

impl Default for SnapshotSchedule {
    fn default() -> Self {
        Self {
            timezone: chrono_tz::America::New_York,
            refresh_time: NaiveTime::from_hms_opt(SNAPSHOT_REFRESH_HOUR, 0, 0)
                .unwrap_or(NaiveTime::MIN),
        }
    }
}

impl SnapshotSchedule {
    /// Wall-clock time in the schedule's timezone, truncated to whole seconds
    pub fn local_now(&self, now_utc: DateTime<Utc>) -> NaiveDateTime {
        let local = now_utc.with_timezone(&self.timezone).naive_local();
        local.with_nanosecond(0).unwrap_or(local)
    }

    /// Calendar date in the schedule's timezone
    pub fn local_date(&self, now_utc: DateTime<Utc>) -> NaiveDate {
        now_utc.with_timezone(&self.timezone).date_naive()
    }

    /// Whether a new snapshot has to be fetched now
    ///
    /// `latest_snapshot` is the date of the most recent stored snapshot, as
    /// read from the store. Returns true only when nothing is stored for
    /// today and the local time has reached `refresh_time`.
    pub fn should_fetch(&self, now_utc: DateTime<Utc>, latest_snapshot: Option<NaiveDate>) -> bool {
        let local = now_utc.with_timezone(&self.timezone);
        let today = local.date_naive();

        let have_today = latest_snapshot.is_some_and(|date| date >= today);
        if have_today {
            return false;
        }

        local.time() >= self.refresh_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    /// UTC instant for a given US Eastern wall-clock time
    fn eastern(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        chrono_tz::America::New_York
            .with_ymd_and_hms(y, mo, d, h, mi, s)
            .single()
            .unwrap()
            .with_timezone(&Utc)
    }

    fn date(y: i32, mo: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, mo, d).unwrap()
    }

    #[test]
    fn test_schedule_defaults() {
        let schedule = SnapshotSchedule::default();
        assert_eq!(schedule.timezone, chrono_tz::America::New_York);
        assert_eq!(schedule.refresh_time, NaiveTime::from_hms_opt(15, 0, 0).unwrap());
    }

    #[test]
    fn test_not_due_before_threshold() {
        let schedule = SnapshotSchedule::default();
        assert!(!schedule.should_fetch(eastern(2024, 3, 14, 14, 59, 0), None));
        assert!(!schedule.should_fetch(eastern(2024, 3, 14, 14, 59, 59), Some(date(2024, 3, 13))));
        assert!(!schedule.should_fetch(eastern(2024, 3, 14, 0, 0, 0), None));
    }

    #[test]
    fn test_due_at_threshold() {
        let schedule = SnapshotSchedule::default();
        assert!(schedule.should_fetch(eastern(2024, 3, 14, 15, 0, 0), None));
        assert!(schedule.should_fetch(eastern(2024, 3, 14, 15, 0, 0), Some(date(2024, 3, 13))));
        assert!(schedule.should_fetch(eastern(2024, 3, 14, 23, 59, 59), Some(date(2024, 1, 2))));
    }

    #[test]
    fn test_not_due_when_today_already_stored() {
        let schedule = SnapshotSchedule::default();
        let today = Some(date(2024, 3, 14));
        assert!(!schedule.should_fetch(eastern(2024, 3, 14, 15, 0, 0), today));
        assert!(!schedule.should_fetch(eastern(2024, 3, 14, 18, 30, 0), today));
        assert!(!schedule.should_fetch(eastern(2024, 3, 14, 23, 59, 59), today));
    }

    #[test]
    fn test_uses_eastern_date_not_utc_date() {
        let schedule = SnapshotSchedule::default();
        // 01:30 UTC on the 15th is still the evening of the 14th in New York
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 1, 30, 0).unwrap();
        assert_eq!(schedule.local_date(now), date(2024, 3, 14));
        assert!(!schedule.should_fetch(now, Some(date(2024, 3, 14))));
        assert!(schedule.should_fetch(now, Some(date(2024, 3, 13))));
    }

    #[test]
    fn test_threshold_follows_daylight_saving() {
        let schedule = SnapshotSchedule::default();
        // EST (UTC-5) in January, EDT (UTC-4) in July
        assert!(schedule.should_fetch(Utc.with_ymd_and_hms(2024, 1, 10, 20, 0, 0).unwrap(), None));
        assert!(!schedule.should_fetch(Utc.with_ymd_and_hms(2024, 1, 10, 19, 59, 0).unwrap(), None));
        assert!(schedule.should_fetch(Utc.with_ymd_and_hms(2024, 7, 10, 19, 0, 0).unwrap(), None));
        assert!(!schedule.should_fetch(Utc.with_ymd_and_hms(2024, 7, 10, 18, 59, 0).unwrap(), None));
    }

    #[test]
    fn test_local_now_truncates_subseconds() {
        let schedule = SnapshotSchedule::default();
        let now = eastern(2024, 3, 14, 15, 0, 1) + chrono::Duration::milliseconds(750);
        let local = schedule.local_now(now);
        assert_eq!(local, date(2024, 3, 14).and_hms_opt(15, 0, 1).unwrap());
    }
}
