//! crates/khatmah_core/src/domain.rs
//!
//! Defines the pure, core data structures for the scheduler.
//! These structs are independent of any database or serialization format.

use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// A sub-page reading unit: which slice of a page one rak'ah covers.
///
/// Percentages are rounded to one decimal for display; the engine keeps
/// its own unrounded cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct PagePartition {
    pub page: u16,
    /// 1-based index of this slice within the page.
    pub part: u32,
    /// How many equal divisions the pacing density implies for a page.
    pub total_parts: u32,
    pub percentage_start: f64,
    pub percentage_end: f64,
}

/// One discrete reading assignment within a night.
///
/// Named for the prayer cycle it is recited in; the ayah bounds are an
/// estimate, not a verse-accurate boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct RakatBreakdown {
    /// 1-based sequence number within its night.
    pub rakat_number: u32,
    pub partition: PagePartition,
    pub start_ayah: u32,
    pub end_ayah: u32,
    pub ayah_count: u32,
    pub surah_name: String,
    pub surah_arabic_name: String,
}

/// The reading assignments for a single night of the plan.
#[derive(Debug, Clone, PartialEq)]
pub struct NightSchedule {
    /// 1-based sequential day within the plan.
    pub night_number: u32,
    pub date: NaiveDate,
    pub rakats: Vec<RakatBreakdown>,
    /// Approximate pages covered this night, rounded to one decimal.
    pub total_pages: f64,
    pub rakats_count: u32,
}

/// A stretch of nights prayed with the same rak'at count, letting a plan
/// front-load reading (e.g. days 1-20 at 20 rak'ats, days 21-30 at 8).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RakatPhase {
    pub start_day: u32,
    pub end_day: u32,
    pub rakats_per_night: u32,
}

impl RakatPhase {
    pub fn covers(&self, day: u32) -> bool {
        day >= self.start_day && day <= self.end_day
    }

    pub fn overlaps(&self, other: &RakatPhase) -> bool {
        self.start_day <= other.end_day && other.start_day <= self.end_day
    }
}

/// A persisted reading plan, as stored by the schedule store.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadingPlan {
    pub id: Uuid,
    pub owner_id: Uuid,
    /// Opaque token for the public, read-only schedule view.
    pub share_token: String,
    pub start_page: u16,
    pub pages_per_night: u32,
    pub rakats_per_night: u32,
    pub start_date: NaiveDate,
    pub total_days: u32,
}

/// The fields needed to create a [`ReadingPlan`]; the store assigns the
/// identity and share token.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReadingPlan {
    pub start_page: u16,
    pub pages_per_night: u32,
    pub rakats_per_night: u32,
    pub start_date: NaiveDate,
    pub total_days: u32,
}

/// Completion state of one day, assigned from wall-clock date comparison
/// by the caller. The engine never sets this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayStatus {
    Upcoming,
    Today,
    Completed,
    Absent,
}

impl DayStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DayStatus::Upcoming => "upcoming",
            DayStatus::Today => "today",
            DayStatus::Completed => "completed",
            DayStatus::Absent => "absent",
        }
    }
}

impl fmt::Display for DayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DayStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upcoming" => Ok(DayStatus::Upcoming),
            "today" => Ok(DayStatus::Today),
            "completed" => Ok(DayStatus::Completed),
            "absent" => Ok(DayStatus::Absent),
            other => Err(format!("unknown day status '{}'", other)),
        }
    }
}

/// One persistable per-day record of the plan: the page range read that
/// night plus its completion status.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleDay {
    /// 1-based, monotonically increasing.
    pub day_number: u32,
    pub date: NaiveDate,
    pub start_page: u16,
    pub end_page: u16,
    pub status: DayStatus,
}

/// Attribution overlay mapping a rak'at range to a reciter. Display
/// only; never alters the partitioning math.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImamAssignment {
    pub imam_name: String,
    pub start_rakat: u32,
    pub end_rakat: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_status_round_trips_through_strings() {
        for status in [
            DayStatus::Upcoming,
            DayStatus::Today,
            DayStatus::Completed,
            DayStatus::Absent,
        ] {
            assert_eq!(status.as_str().parse::<DayStatus>().unwrap(), status);
        }
        assert!("someday".parse::<DayStatus>().is_err());
    }

    #[test]
    fn phase_overlap_detection() {
        let a = RakatPhase { start_day: 1, end_day: 20, rakats_per_night: 20 };
        let b = RakatPhase { start_day: 21, end_day: 30, rakats_per_night: 8 };
        let c = RakatPhase { start_day: 15, end_day: 25, rakats_per_night: 10 };
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&b));
        assert!(a.covers(1) && a.covers(20) && !a.covers(21));
    }
}
