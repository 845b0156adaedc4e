//! Time utilities: working-hours windows and timezone-aware timestamp parsing.
//!
//! All instants are `DateTime<Utc>`. The daily clock window of
//! [`WorkingHours`] is read in its own timezone (UTC unless configured), so
//! "09:00" means nine o'clock on the wall clock of that zone every day.

use std::fmt;

use chrono::{
    DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc,
};
use chrono_tz::Tz;

use crate::error::{Result, SchedulerError};

/// Daily clock window during which task execution may be placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkingHours {
    start: NaiveTime,
    end: NaiveTime,
    timezone: Tz,
}

fn clock(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default()
}

impl Default for WorkingHours {
    fn default() -> Self {
        Self {
            start: clock(9, 0),
            end: clock(17, 0),
            timezone: Tz::UTC,
        }
    }
}

impl WorkingHours {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self> {
        if start >= end {
            return Err(SchedulerError::InvalidWorkingHours(format!(
                "start {} must be before end {}",
                start.format("%H:%M"),
                end.format("%H:%M")
            )));
        }
        Ok(Self {
            start,
            end,
            timezone: Tz::UTC,
        })
    }

    /// Parse `"HH:MM"` clock strings, e.g. `WorkingHours::parse("09:00", "17:00")`.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Self::new(parse_clock(start)?, parse_clock(end)?)
    }

    pub fn in_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Calendar date of `instant` on this window's wall clock.
    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.timezone).date_naive()
    }

    /// Wall-clock time of `instant` in this window's timezone.
    pub fn local_time(&self, instant: DateTime<Utc>) -> NaiveTime {
        instant.with_timezone(&self.timezone).time()
    }

    pub fn opens_on(&self, date: NaiveDate) -> DateTime<Utc> {
        self.resolve(date.and_time(self.start))
    }

    pub fn closes_on(&self, date: NaiveDate) -> DateTime<Utc> {
        self.resolve(date.and_time(self.end))
    }

    fn resolve(&self, naive: NaiveDateTime) -> DateTime<Utc> {
        match self.timezone.from_local_datetime(&naive) {
            LocalResult::Single(dt) => dt.with_timezone(&Utc),
            LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
            // DST gap: read the wall clock with the offset in force before the jump.
            LocalResult::None => {
                let before = self
                    .timezone
                    .offset_from_utc_datetime(&(naive - Duration::days(1)))
                    .fix();
                let utc = naive - Duration::seconds(i64::from(before.local_minus_utc()));
                Utc.from_utc_datetime(&utc)
            }
        }
    }
}

impl fmt::Display for WorkingHours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{} {}",
            self.start.format("%H:%M"),
            self.end.format("%H:%M"),
            self.timezone
        )
    }
}

fn parse_clock(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M")
        .map_err(|e| SchedulerError::InvalidWorkingHours(format!("'{s}' is not HH:MM: {e}")))
}

fn next_day(date: NaiveDate) -> NaiveDate {
    date.succ_opt().unwrap_or(NaiveDate::MAX)
}

/// Earliest instant at or after `instant` that lies inside working hours.
///
/// Before the window opens snaps to that day's start; at or after the close
/// rolls to the next day's start; inside the window is returned unchanged.
pub fn next_working_instant(instant: DateTime<Utc>, hours: &WorkingHours) -> DateTime<Utc> {
    let date = hours.local_date(instant);
    let clock = hours.local_time(instant);

    if clock < hours.start {
        hours.opens_on(date)
    } else if clock >= hours.end {
        hours.opens_on(next_day(date))
    } else {
        instant
    }
}

/// Place `minutes` of work starting no earlier than `candidate`.
///
/// Work that would run past the close of day resumes at the next day's
/// start; this repeats until the remainder fits, so durations longer than
/// one working day spill across as many days as needed. Returns the snapped
/// start and the final end instant.
pub fn place_duration(
    candidate: DateTime<Utc>,
    minutes: i32,
    hours: &WorkingHours,
) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = next_working_instant(candidate, hours);
    let mut cursor = start;
    let mut remaining = Duration::minutes(i64::from(minutes.max(0)));

    loop {
        let date = hours.local_date(cursor);
        let available = (hours.closes_on(date) - cursor).max(Duration::zero());
        if remaining <= available {
            return (start, cursor + remaining);
        }
        remaining = remaining - available;
        cursor = hours.opens_on(next_day(date));
    }
}

/// Parse an instant given either as RFC 3339 or as a local `"YYYY-MM-DD HH:MM"`
/// in an IANA timezone like `"America/Chicago"`, returning UTC.
pub fn parse_local_datetime(input: &str, tz: Tz) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input.trim()) {
        return Ok(dt.with_timezone(&Utc));
    }

    let ndt = NaiveDateTime::parse_from_str(input.trim(), "%Y-%m-%d %H:%M")
        .map_err(|e| SchedulerError::InvalidTimestamp(format!("'{input}': {e}")))?;

    tz.from_local_datetime(&ndt)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| {
            SchedulerError::InvalidTimestamp(format!(
                "ambiguous or invalid local time (DST?): {input} {tz}"
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(d: u32, h: u32, m: u32) -> DateTime<Utc> {
        // March 2026: the 2nd is a Monday.
        Utc.with_ymd_and_hms(2026, 3, d, h, m, 0).unwrap()
    }

    #[test]
    fn before_start_snaps_to_same_day_start() {
        let hours = WorkingHours::default();
        assert_eq!(next_working_instant(at(2, 8, 0), &hours), at(2, 9, 0));
    }

    #[test]
    fn inside_window_is_unchanged() {
        let hours = WorkingHours::default();
        assert_eq!(next_working_instant(at(2, 9, 0), &hours), at(2, 9, 0));
        assert_eq!(next_working_instant(at(2, 16, 59), &hours), at(2, 16, 59));
    }

    #[test]
    fn exactly_at_end_rolls_to_next_day() {
        let hours = WorkingHours::default();
        assert_eq!(next_working_instant(at(2, 17, 0), &hours), at(3, 9, 0));
        assert_eq!(next_working_instant(at(2, 22, 30), &hours), at(3, 9, 0));
    }

    #[test]
    fn place_fits_within_day() {
        let hours = WorkingHours::default();
        assert_eq!(place_duration(at(2, 8, 0), 30, &hours), (at(2, 9, 0), at(2, 9, 30)));
    }

    #[test]
    fn place_ending_exactly_at_close_does_not_split() {
        let hours = WorkingHours::default();
        assert_eq!(place_duration(at(2, 16, 0), 60, &hours), (at(2, 16, 0), at(2, 17, 0)));
    }

    #[test]
    fn place_splits_overflow_into_next_day() {
        let hours = WorkingHours::default();
        // 60 minutes today, 60 minutes resume at 09:00 tomorrow.
        assert_eq!(place_duration(at(2, 16, 0), 120, &hours), (at(2, 16, 0), at(3, 10, 0)));
    }

    #[test]
    fn place_loops_across_several_days() {
        let hours = WorkingHours::default();
        // 60 today, 480 on the 3rd, 460 on the 4th.
        assert_eq!(place_duration(at(2, 16, 0), 1000, &hours), (at(2, 16, 0), at(4, 16, 40)));
    }

    #[test]
    fn place_from_after_hours_starts_next_morning() {
        let hours = WorkingHours::default();
        assert_eq!(place_duration(at(2, 18, 0), 45, &hours), (at(3, 9, 0), at(3, 9, 45)));
    }

    #[test]
    fn parse_rejects_inverted_or_malformed_hours() {
        assert!(matches!(
            WorkingHours::parse("17:00", "09:00"),
            Err(SchedulerError::InvalidWorkingHours(_))
        ));
        assert!(WorkingHours::parse("9am", "17:00").is_err());
        let hours = WorkingHours::parse("08:30", "16:30").unwrap();
        assert_eq!(hours.to_string(), "08:30-16:30 UTC");
    }

    #[test]
    fn window_is_read_on_the_configured_wall_clock() {
        // March 2nd is CST (UTC-6): 09:00 local is 15:00 UTC.
        let hours = WorkingHours::default().in_timezone(chrono_tz::America::Chicago);
        assert_eq!(next_working_instant(at(2, 14, 0), &hours), at(2, 15, 0));
        // 23:30 UTC is 17:30 local, past close.
        assert_eq!(next_working_instant(at(2, 23, 30), &hours), at(3, 15, 0));
    }

    #[test]
    fn spring_forward_gap_uses_offset_before_the_jump() {
        // 2026-03-08: New York skips 02:00-03:00 local.
        let hours = WorkingHours::parse("01:00", "02:30")
            .unwrap()
            .in_timezone(chrono_tz::America::New_York);
        let day = NaiveDate::from_ymd_opt(2026, 3, 8).unwrap();

        // 01:00 EST.
        assert_eq!(hours.opens_on(day), at(8, 6, 0));
        // 02:30 does not exist; read as EST it is 07:30 UTC, i.e. 03:30 EDT.
        let close = hours.closes_on(day);
        assert_eq!(close, at(8, 7, 30));
        assert_eq!(hours.local_time(close), clock(3, 30));

        // 90 minutes fit on the 8th, the other 30 run from 01:00 EDT on the 9th.
        assert_eq!(place_duration(at(8, 6, 0), 120, &hours), (at(8, 6, 0), at(9, 5, 30)));
    }

    #[test]
    fn fall_back_overlap_takes_the_earlier_instant() {
        // 2026-11-01: New York repeats 01:00-02:00 local.
        let hours = WorkingHours::parse("01:30", "03:00")
            .unwrap()
            .in_timezone(chrono_tz::America::New_York);
        let day = NaiveDate::from_ymd_opt(2026, 11, 1).unwrap();
        let utc = |h, m| Utc.with_ymd_and_hms(2026, 11, 1, h, m, 0).unwrap();

        // First 01:30 is EDT (UTC-4); 03:00 is EST (UTC-5).
        assert_eq!(hours.opens_on(day), utc(5, 30));
        assert_eq!(hours.closes_on(day), utc(8, 0));

        // The repeated hour widens the window to 150 real minutes.
        assert_eq!(next_working_instant(utc(5, 0), &hours), utc(5, 30));
        assert_eq!(place_duration(utc(5, 0), 150, &hours), (utc(5, 30), utc(8, 0)));
    }

    #[test]
    fn test_parse_chicago_local_and_rfc3339() {
        let utc = parse_local_datetime("2026-02-20 23:59", chrono_tz::America::Chicago).unwrap();
        assert_eq!(utc.to_rfc3339(), "2026-02-21T05:59:00+00:00");

        let utc = parse_local_datetime("2026-03-02T08:00:00Z", Tz::UTC).unwrap();
        assert_eq!(utc, at(2, 8, 0));

        assert!(matches!(
            parse_local_datetime("next tuesday", Tz::UTC),
            Err(SchedulerError::InvalidTimestamp(_))
        ));
    }
}
