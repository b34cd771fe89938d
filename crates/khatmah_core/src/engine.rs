//! crates/khatmah_core/src/engine.rs
//!
//! The partitioning engine: turns a pacing density and per-night rak'at
//! counts into a gapless, non-overlapping walk across the mushaf, with
//! sub-page precision carried forward across page and day boundaries.
//!
//! HOW IT WORKS:
//! - The plan sets "how many rak'ats finish one page" (e.g. 3 rak'ats =
//!   1 page), so each rak'ah consumes a fixed percentage of a page.
//! - A cursor (page + units read on it) walks forward, never restarting
//!   mid-page: night N+1 picks up exactly where night N stopped.
//! - A rak'ah never spans past the page it starts on; the slice is
//!   clipped at 100% and the next rak'ah starts fresh on the next page.
//!
//! EXAMPLE, 3 rak'ats per page starting at page 2:
//! - Rak'ah 1: page 2, part 1/3 (0-33.3%)
//! - Rak'ah 2: page 2, part 2/3 (33.3-66.7%)
//! - Rak'ah 3: page 2, part 3/3 (66.7-100%)
//! - Rak'ah 4: page 3, part 1/3 (0-33.3%)

use chrono::{Duration, NaiveDate};

use crate::domain::{NightSchedule, PagePartition, RakatBreakdown, RakatPhase};
use crate::error::PlanError;
use crate::quran;
use crate::quran::{QURAN_END_PAGE, QURAN_START_PAGE};

/// Fallback rak'at count for a day no phase covers. A robustness default,
/// not a domain rule; planner-built phase lists always cover every day.
const DEFAULT_RAKATS_PER_NIGHT: u32 = 8;

/// Surah labels emitted if a page somehow falls outside the reference
/// table. One bad lookup must not abort the whole plan.
const UNKNOWN_SURAH: &str = "Unknown";
const UNKNOWN_SURAH_ARABIC: &str = "غير معروف";

/// What to do when the cursor advances past the last mushaf page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnExhausted {
    /// End the plan early; remaining days get no schedule.
    #[default]
    Stop,
    /// Continuous khatmah cycle: wrap back to [`QURAN_START_PAGE`].
    WrapAround,
}

/// The engine's running position, owned by a single generation call and
/// threaded through the fold over nights. Never shared or static.
///
/// The position within a page is the integral count of pacing units
/// already read, not an accumulated percentage: summing `100/n` n times
/// in floating point can land just under 100 (n = 12, 23, ...) and leave
/// the cursor stuck on a finished page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlobalCursor {
    pub page: u16,
    /// Pacing units already read on this page, starting at 0.
    pub units_done: u32,
}

impl GlobalCursor {
    pub fn at_page(page: u16) -> Self {
        Self { page, units_done: 0 }
    }
}

/// Tolerance when deciding a unit's end reaches the page end. A single
/// multiplication `units * (100/n)` is within one ulp of 100, well
/// inside this bound.
const PAGE_END_TOLERANCE: f64 = 1e-9;

/// Generates the full night-by-night schedule.
///
/// `rakats_per_page` is the pacing density (rak'ats needed to finish one
/// page); `phases` must not overlap. Returns at most `total_days` nights,
/// fewer if the cursor passes the last page under [`OnExhausted::Stop`].
pub fn generate_schedule(
    rakats_per_page: f64,
    phases: &[RakatPhase],
    total_days: u32,
    start_page: u16,
    start_date: NaiveDate,
    on_exhausted: OnExhausted,
) -> Result<Vec<NightSchedule>, PlanError> {
    if !rakats_per_page.is_finite() || rakats_per_page <= 0.0 {
        return Err(PlanError::InvalidPacing(rakats_per_page));
    }
    if total_days == 0 {
        return Err(PlanError::InvalidDuration);
    }
    if !(QURAN_START_PAGE..=QURAN_END_PAGE).contains(&start_page) {
        return Err(PlanError::StartPageOutOfRange(start_page));
    }
    validate_phases(phases)?;

    let mut cursor = GlobalCursor::at_page(start_page);
    let mut schedule = Vec::with_capacity(total_days as usize);

    for day in 1..=total_days {
        let rakats_for_night = phases
            .iter()
            .find(|p| p.covers(day))
            .map(|p| p.rakats_per_night)
            .unwrap_or(DEFAULT_RAKATS_PER_NIGHT);

        let (rakats, exhausted) =
            partition_night(rakats_per_page, rakats_for_night, &mut cursor, on_exhausted);

        if rakats.is_empty() {
            break;
        }

        let rakats_count = rakats.len() as u32;
        let total_pages = round_up_tenth(f64::from(rakats_count) / rakats_per_page);

        schedule.push(NightSchedule {
            night_number: day,
            date: start_date + Duration::days(i64::from(day) - 1),
            rakats,
            total_pages,
            rakats_count,
        });

        if exhausted {
            break;
        }
    }

    Ok(schedule)
}

fn validate_phases(phases: &[RakatPhase]) -> Result<(), PlanError> {
    for phase in phases {
        if phase.start_day == 0 || phase.start_day > phase.end_day {
            return Err(PlanError::InvalidPhase {
                start_day: phase.start_day,
                end_day: phase.end_day,
            });
        }
        if phase.rakats_per_night == 0 {
            return Err(PlanError::InvalidRakatCount);
        }
    }
    for (i, a) in phases.iter().enumerate() {
        for b in &phases[i + 1..] {
            if a.overlaps(b) {
                return Err(PlanError::OverlappingPhases(
                    a.start_day, a.end_day, b.start_day, b.end_day,
                ));
            }
        }
    }
    Ok(())
}

/// Partitions one night's rak'ats, advancing the cursor in place.
///
/// Returns the emitted rak'ats and whether the mushaf was exhausted
/// mid-night (only under [`OnExhausted::Stop`]).
fn partition_night(
    rakats_per_page: f64,
    rakats_for_night: u32,
    cursor: &mut GlobalCursor,
    on_exhausted: OnExhausted,
) -> (Vec<RakatBreakdown>, bool) {
    let percentage_per_rakat = 100.0 / rakats_per_page;
    let total_parts = (rakats_per_page.ceil() as u32).max(1);
    let mut rakats = Vec::with_capacity(rakats_for_night as usize);

    for i in 0..rakats_for_night {
        let part = cursor.units_done + 1;
        let start_pct = f64::from(cursor.units_done) * percentage_per_rakat;
        let end_raw = f64::from(cursor.units_done + 1) * percentage_per_rakat;
        let page_done = end_raw >= 100.0 - PAGE_END_TOLERANCE;
        // Clip at the page end; the next rak'ah starts fresh at 0% of the
        // next page and carries no debt from the clipped remainder.
        let end_pct = if page_done { 100.0 } else { end_raw };

        let (surah_name, surah_arabic_name) = match quran::surah_by_page(cursor.page) {
            Some(s) => (s.name.to_string(), s.arabic_name.to_string()),
            None => (UNKNOWN_SURAH.to_string(), UNKNOWN_SURAH_ARABIC.to_string()),
        };
        let (start_ayah, end_ayah) = quran::estimate_ayah_range(start_pct, end_pct);

        rakats.push(RakatBreakdown {
            rakat_number: i + 1,
            partition: PagePartition {
                page: cursor.page,
                part,
                total_parts,
                percentage_start: round_tenth(start_pct),
                percentage_end: round_tenth(end_pct),
            },
            start_ayah,
            end_ayah,
            ayah_count: end_ayah - start_ayah + 1,
            surah_name,
            surah_arabic_name,
        });

        cursor.units_done += 1;
        if page_done {
            cursor.page += 1;
            cursor.units_done = 0;
            if cursor.page > QURAN_END_PAGE {
                match on_exhausted {
                    OnExhausted::WrapAround => cursor.page = QURAN_START_PAGE,
                    OnExhausted::Stop => return (rakats, true),
                }
            }
        }
    }

    (rakats, false)
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn round_up_tenth(value: f64) -> f64 {
    (value * 10.0).ceil() / 10.0
}
