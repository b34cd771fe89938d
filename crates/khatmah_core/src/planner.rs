//! crates/khatmah_core/src/planner.rs
//!
//! Orchestration over the partitioning engine: duration helpers, start
//! point resolution, the persistable per-day walk, status refresh, and
//! the imam attribution overlay. Purely functional; persistence belongs
//! to the [`crate::ports::ScheduleStore`] collaborator.

use chrono::{Duration, NaiveDate};

use crate::domain::{
    DayStatus, ImamAssignment, NightSchedule, RakatBreakdown, RakatPhase, ScheduleDay,
};
use crate::engine::{self, OnExhausted};
use crate::error::PlanError;
use crate::quran;
use crate::quran::{QURAN_END_PAGE, QURAN_START_PAGE, TOTAL_QURAN_PAGES};

/// Where the khatmah begins, as the user selects it. Resolution to a
/// page happens here so the engine only ever sees a validated page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartPoint {
    Juz(u8),
    Surah(u8),
    SurahAyah { surah: u8, ayah: u32 },
    Page(u16),
}

/// Pages needed per night to finish `start_page..=end_page` in
/// `total_days` nights (ceiling division).
pub fn pages_per_night_for_duration(
    total_days: u32,
    start_page: u16,
    end_page: u16,
) -> Result<u32, PlanError> {
    if total_days == 0 {
        return Err(PlanError::InvalidDuration);
    }
    let total_pages = page_span(start_page, end_page)?;
    Ok(total_pages.div_ceil(total_days))
}

/// Nights needed to finish `start_page..=end_page` at `pages_per_night`
/// pages a night (ceiling division, the inverse of
/// [`pages_per_night_for_duration`] for the common case).
pub fn duration_for_pages_per_night(
    pages_per_night: u32,
    start_page: u16,
    end_page: u16,
) -> Result<u32, PlanError> {
    if pages_per_night == 0 {
        return Err(PlanError::InvalidPagesPerNight);
    }
    let total_pages = page_span(start_page, end_page)?;
    Ok(total_pages.div_ceil(pages_per_night))
}

fn page_span(start_page: u16, end_page: u16) -> Result<u32, PlanError> {
    if !(QURAN_START_PAGE..=QURAN_END_PAGE).contains(&start_page) {
        return Err(PlanError::StartPageOutOfRange(start_page));
    }
    if end_page < start_page || end_page > QURAN_END_PAGE {
        return Err(PlanError::InvalidPageRange { start: start_page, end: end_page });
    }
    Ok(u32::from(end_page) - u32::from(start_page) + 1)
}

/// Simple mode: a uniform rak'at count every night. Derives the pacing
/// density (`rakats_per_night / pages_per_night`) and delegates to the
/// engine with a single phase spanning the whole plan.
pub fn generate_simple_schedule(
    start_page: u16,
    pages_per_night: u32,
    total_days: u32,
    rakats_per_night: u32,
    start_date: NaiveDate,
    on_exhausted: OnExhausted,
) -> Result<Vec<NightSchedule>, PlanError> {
    if pages_per_night == 0 {
        return Err(PlanError::InvalidPagesPerNight);
    }
    if rakats_per_night == 0 {
        return Err(PlanError::InvalidRakatCount);
    }
    if total_days == 0 {
        return Err(PlanError::InvalidDuration);
    }

    let rakats_per_page = f64::from(rakats_per_night) / f64::from(pages_per_night);
    let phases = [RakatPhase { start_day: 1, end_day: total_days, rakats_per_night }];
    engine::generate_schedule(
        rakats_per_page,
        &phases,
        total_days,
        start_page,
        start_date,
        on_exhausted,
    )
}

/// Phase-based mode: pacing changes over the plan (e.g. twenty rak'ats
/// for the first twenty nights, eight for the last ten).
pub fn generate_phased_schedule(
    rakats_per_page: f64,
    phases: &[RakatPhase],
    total_days: u32,
    start_page: u16,
    start_date: NaiveDate,
    on_exhausted: OnExhausted,
) -> Result<Vec<NightSchedule>, PlanError> {
    engine::generate_schedule(
        rakats_per_page,
        phases,
        total_days,
        start_page,
        start_date,
        on_exhausted,
    )
}

/// Resolves a user start selection to a concrete page.
///
/// No silent clamping: a selection that lands outside
/// `QURAN_START_PAGE..=604` (notably Al-Fatihah itself) is rejected.
pub fn resolve_start_point(start: StartPoint) -> Result<u16, PlanError> {
    let page = match start {
        StartPoint::Juz(juz) => quran::juz_start_page(juz).ok_or(PlanError::UnknownJuz(juz))?,
        StartPoint::Surah(number) => {
            quran::surah_by_number(number)
                .ok_or(PlanError::UnknownSurah(number))?
                .start_page
        }
        StartPoint::SurahAyah { surah, ayah } => {
            let s = quran::surah_by_number(surah).ok_or(PlanError::UnknownSurah(surah))?;
            if ayah == 0 || ayah > s.ayah_count {
                return Err(PlanError::AyahOutOfRange { surah, ayah });
            }
            // Approximate: interpolate the ayah's position across the
            // surah's page span.
            let ratio = f64::from(ayah) / f64::from(s.ayah_count);
            let span = f64::from(s.end_page - s.start_page + 1);
            let page = (f64::from(s.start_page) + ratio * span).floor() as u16;
            page.min(s.end_page)
        }
        StartPoint::Page(page) => page,
    };

    if !(QURAN_START_PAGE..=TOTAL_QURAN_PAGES).contains(&page) {
        return Err(PlanError::StartPageOutOfRange(page));
    }
    Ok(page)
}

/// Builds the persistable per-day page ranges for a plan.
///
/// Each day covers `pages_per_night` whole pages, capped at the last
/// mushaf page; under [`OnExhausted::Stop`] the walk ends when the
/// mushaf does. Statuses are assigned relative to `today`.
pub fn schedule_days(
    start_page: u16,
    pages_per_night: u32,
    total_days: u32,
    start_date: NaiveDate,
    today: NaiveDate,
    on_exhausted: OnExhausted,
) -> Result<Vec<ScheduleDay>, PlanError> {
    if pages_per_night == 0 {
        return Err(PlanError::InvalidPagesPerNight);
    }
    if total_days == 0 {
        return Err(PlanError::InvalidDuration);
    }
    if !(QURAN_START_PAGE..=QURAN_END_PAGE).contains(&start_page) {
        return Err(PlanError::StartPageOutOfRange(start_page));
    }

    let mut days = Vec::with_capacity(total_days as usize);
    let mut current_page = u32::from(start_page);

    for day in 1..=total_days {
        let end_page = (current_page + pages_per_night - 1).min(u32::from(QURAN_END_PAGE));
        let date = start_date + Duration::days(i64::from(day) - 1);
        days.push(ScheduleDay {
            day_number: day,
            date,
            start_page: current_page as u16,
            end_page: end_page as u16,
            status: day_status(date, today),
        });

        current_page = end_page + 1;
        if current_page > u32::from(QURAN_END_PAGE) {
            match on_exhausted {
                OnExhausted::WrapAround => current_page = u32::from(QURAN_START_PAGE),
                OnExhausted::Stop => break,
            }
        }
    }

    Ok(days)
}

/// Status of a day by date comparison alone.
pub fn day_status(date: NaiveDate, today: NaiveDate) -> DayStatus {
    if date < today {
        DayStatus::Completed
    } else if date == today {
        DayStatus::Today
    } else {
        DayStatus::Upcoming
    }
}

/// Re-derives statuses against the wall clock: past days auto-complete
/// unless explicitly marked absent, the current day becomes Today and
/// future days Upcoming.
pub fn refresh_statuses(days: &mut [ScheduleDay], today: NaiveDate) {
    for day in days {
        if day.date < today {
            if day.status != DayStatus::Completed && day.status != DayStatus::Absent {
                day.status = DayStatus::Completed;
            }
        } else {
            day.status = day_status(day.date, today);
        }
    }
}

/// Pages read across all completed days.
pub fn completed_pages(days: &[ScheduleDay]) -> u32 {
    days.iter()
        .filter(|d| d.status == DayStatus::Completed)
        .map(|d| u32::from(d.end_page) - u32::from(d.start_page) + 1)
        .sum()
}

/// Whole-percent progress through the 604-page mushaf.
pub fn progress_percent(completed_pages: u32) -> u32 {
    let ratio = f64::from(completed_pages) / f64::from(TOTAL_QURAN_PAGES);
    (ratio * 100.0).round() as u32
}

/// Splits a night's rak'ats into contiguous blocks, one per imam, using
/// `ceil(rakats / imams)`-sized blocks. Imams left without rak'ats (more
/// imams than rak'ats) get no assignment.
pub fn split_rakats_among_imams(
    rakats_per_night: u32,
    imam_names: &[String],
) -> Vec<ImamAssignment> {
    if imam_names.is_empty() || rakats_per_night == 0 {
        return Vec::new();
    }
    let per_imam = rakats_per_night.div_ceil(imam_names.len() as u32);
    imam_names
        .iter()
        .enumerate()
        .filter_map(|(i, name)| {
            let start_rakat = i as u32 * per_imam + 1;
            let end_rakat = ((i as u32 + 1) * per_imam).min(rakats_per_night);
            if start_rakat > end_rakat {
                return None;
            }
            Some(ImamAssignment {
                imam_name: name.clone(),
                start_rakat,
                end_rakat,
            })
        })
        .collect()
}

/// The rak'ats of one night that fall to an imam's range.
pub fn rakats_for_imam<'a>(
    night: &'a NightSchedule,
    assignment: &ImamAssignment,
) -> Vec<&'a RakatBreakdown> {
    night
        .rakats
        .iter()
        .filter(|r| r.rakat_number >= assignment.start_rakat && r.rakat_number <= assignment.end_rakat)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 18).unwrap()
    }

    #[test]
    fn full_khatmah_in_thirty_nights_needs_21_pages() {
        assert_eq!(
            pages_per_night_for_duration(30, QURAN_START_PAGE, QURAN_END_PAGE),
            Ok(21)
        );
    }

    #[test]
    fn duration_round_trip_never_grows() {
        for total_days in [1u32, 7, 15, 29, 30, 60, 120] {
            let ppn =
                pages_per_night_for_duration(total_days, QURAN_START_PAGE, QURAN_END_PAGE)
                    .unwrap();
            let back =
                duration_for_pages_per_night(ppn, QURAN_START_PAGE, QURAN_END_PAGE).unwrap();
            assert!(back <= total_days, "{} nights grew to {}", total_days, back);
        }
    }

    #[test]
    fn duration_helpers_reject_zero_inputs() {
        assert_eq!(
            pages_per_night_for_duration(0, 2, 604),
            Err(PlanError::InvalidDuration)
        );
        assert_eq!(
            duration_for_pages_per_night(0, 2, 604),
            Err(PlanError::InvalidPagesPerNight)
        );
        assert_eq!(
            pages_per_night_for_duration(30, 2, 1),
            Err(PlanError::InvalidPageRange { start: 2, end: 1 })
        );
    }

    #[test]
    fn simple_mode_equals_a_single_phase() {
        let simple =
            generate_simple_schedule(2, 2, 5, 8, date(), OnExhausted::Stop).unwrap();
        let phases = [RakatPhase { start_day: 1, end_day: 5, rakats_per_night: 8 }];
        let phased =
            generate_phased_schedule(4.0, &phases, 5, 2, date(), OnExhausted::Stop).unwrap();
        assert_eq!(simple, phased);
    }

    #[test]
    fn one_page_a_night_finishes_the_page_every_night() {
        // Twelve rak'ats over one page leaves no fractional remainder to
        // drag into the next night.
        let schedule =
            generate_simple_schedule(2, 1, 2, 12, date(), OnExhausted::Stop).unwrap();
        let night1 = &schedule[0];
        assert_eq!(night1.rakats.last().map(|r| r.partition.percentage_end), Some(100.0));
        let night2 = &schedule[1];
        assert_eq!(night2.rakats[0].partition.page, 3);
        assert_eq!(night2.rakats[0].partition.part, 1);
        assert_eq!(night2.rakats[0].partition.percentage_start, 0.0);
    }

    #[test]
    fn simple_mode_rejects_zero_parameters() {
        assert_eq!(
            generate_simple_schedule(2, 0, 30, 8, date(), OnExhausted::Stop),
            Err(PlanError::InvalidPagesPerNight)
        );
        assert_eq!(
            generate_simple_schedule(2, 2, 30, 0, date(), OnExhausted::Stop),
            Err(PlanError::InvalidRakatCount)
        );
        assert_eq!(
            generate_simple_schedule(2, 2, 0, 8, date(), OnExhausted::Stop),
            Err(PlanError::InvalidDuration)
        );
    }

    #[test]
    fn start_point_resolution() {
        assert_eq!(resolve_start_point(StartPoint::Juz(1)), Ok(QURAN_START_PAGE));
        assert_eq!(resolve_start_point(StartPoint::Juz(2)), Ok(21));
        assert_eq!(resolve_start_point(StartPoint::Surah(18)), Ok(293));
        assert_eq!(resolve_start_point(StartPoint::Page(450)), Ok(450));
        assert_eq!(
            resolve_start_point(StartPoint::Juz(31)),
            Err(PlanError::UnknownJuz(31))
        );
        assert_eq!(
            resolve_start_point(StartPoint::Surah(115)),
            Err(PlanError::UnknownSurah(115))
        );
    }

    #[test]
    fn fatihah_start_points_are_rejected_not_clamped() {
        assert_eq!(
            resolve_start_point(StartPoint::Page(1)),
            Err(PlanError::StartPageOutOfRange(1))
        );
        assert_eq!(
            resolve_start_point(StartPoint::Surah(1)),
            Err(PlanError::StartPageOutOfRange(1))
        );
        assert_eq!(
            resolve_start_point(StartPoint::Page(605)),
            Err(PlanError::StartPageOutOfRange(605))
        );
    }

    #[test]
    fn ayah_selection_interpolates_within_the_surah() {
        // Al-Baqarah spans pages 2..=49; its first ayah resolves near the
        // start and its last stays within the surah.
        let first = resolve_start_point(StartPoint::SurahAyah { surah: 2, ayah: 1 }).unwrap();
        assert_eq!(first, 2);
        let last = resolve_start_point(StartPoint::SurahAyah { surah: 2, ayah: 286 }).unwrap();
        assert_eq!(last, 49);
        let mid = resolve_start_point(StartPoint::SurahAyah { surah: 2, ayah: 143 }).unwrap();
        assert!((2..=49).contains(&mid));
        assert_eq!(
            resolve_start_point(StartPoint::SurahAyah { surah: 2, ayah: 287 }),
            Err(PlanError::AyahOutOfRange { surah: 2, ayah: 287 })
        );
    }

    #[test]
    fn day_records_walk_whole_pages() {
        let days =
            schedule_days(2, 21, 30, date(), date(), OnExhausted::Stop).unwrap();
        assert_eq!(days.len(), 29);
        assert_eq!((days[0].start_page, days[0].end_page), (2, 22));
        assert_eq!(days[0].status, DayStatus::Today);
        assert_eq!(days[1].status, DayStatus::Upcoming);
        for pair in days.windows(2) {
            assert_eq!(u32::from(pair[1].start_page), u32::from(pair[0].end_page) + 1);
            assert_eq!(pair[1].day_number, pair[0].day_number + 1);
        }
        let last = days.last().unwrap();
        assert_eq!(last.end_page, QURAN_END_PAGE);
    }

    #[test]
    fn day_records_wrap_when_configured() {
        let days =
            schedule_days(600, 3, 4, date(), date(), OnExhausted::WrapAround).unwrap();
        assert_eq!(days.len(), 4);
        assert_eq!((days[1].start_page, days[1].end_page), (603, 604));
        assert_eq!(days[2].start_page, QURAN_START_PAGE);
    }

    #[test]
    fn status_refresh_completes_past_days_but_keeps_absences() {
        let mut days =
            schedule_days(2, 21, 5, date(), date(), OnExhausted::Stop).unwrap();
        days[1].status = DayStatus::Absent;
        let later = date() + Duration::days(3);
        refresh_statuses(&mut days, later);
        assert_eq!(days[0].status, DayStatus::Completed);
        assert_eq!(days[1].status, DayStatus::Absent);
        assert_eq!(days[2].status, DayStatus::Completed);
        assert_eq!(days[3].status, DayStatus::Today);
        assert_eq!(days[4].status, DayStatus::Upcoming);
    }

    #[test]
    fn progress_counts_only_completed_days() {
        let mut days =
            schedule_days(2, 21, 5, date(), date(), OnExhausted::Stop).unwrap();
        refresh_statuses(&mut days, date() + Duration::days(2));
        let pages = completed_pages(&days);
        assert_eq!(pages, 42);
        assert_eq!(progress_percent(pages), 7);
        assert_eq!(progress_percent(0), 0);
        assert_eq!(progress_percent(604), 100);
    }

    #[test]
    fn imams_split_rakats_into_contiguous_blocks() {
        let names: Vec<String> = ["Ahmad", "Bilal", "Kareem"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let split = split_rakats_among_imams(8, &names);
        assert_eq!(split.len(), 3);
        assert_eq!((split[0].start_rakat, split[0].end_rakat), (1, 3));
        assert_eq!((split[1].start_rakat, split[1].end_rakat), (4, 6));
        assert_eq!((split[2].start_rakat, split[2].end_rakat), (7, 8));
    }

    #[test]
    fn surplus_imams_get_no_rakats() {
        let names: Vec<String> = (0..5).map(|i| format!("Imam {}", i + 1)).collect();
        let split = split_rakats_among_imams(8, &names);
        assert_eq!(split.len(), 4);
        assert!(split.iter().all(|a| a.start_rakat <= a.end_rakat));
        assert!(split_rakats_among_imams(8, &[]).is_empty());
    }

    #[test]
    fn imam_overlay_filters_without_altering_the_walk() {
        let schedule =
            generate_simple_schedule(2, 2, 1, 8, date(), OnExhausted::Stop).unwrap();
        let night = &schedule[0];
        let assignment = ImamAssignment {
            imam_name: "Ahmad".to_string(),
            start_rakat: 3,
            end_rakat: 5,
        };
        let mine = rakats_for_imam(night, &assignment);
        assert_eq!(mine.len(), 3);
        assert_eq!(mine[0].rakat_number, 3);
        assert_eq!(mine[2].rakat_number, 5);
    }
}
