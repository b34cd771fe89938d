//! crates/khatmah_core/src/error.rs
//!
//! Validation errors for plan parameters. These are caller logic errors,
//! surfaced immediately; the engine never substitutes defaults for them.

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlanError {
    /// Pacing density must be a positive, finite number of rak'ats per page.
    #[error("rak'ats per page must be positive and finite, got {0}")]
    InvalidPacing(f64),

    #[error("total days must be at least 1")]
    InvalidDuration,

    #[error("pages per night must be at least 1")]
    InvalidPagesPerNight,

    #[error("rak'ats per night must be at least 1")]
    InvalidRakatCount,

    /// The No-Fatihah rule: plans start at page 2 or later.
    #[error("start page {0} is outside the readable range 2..=604")]
    StartPageOutOfRange(u16),

    #[error("page range {start}..={end} is invalid")]
    InvalidPageRange { start: u16, end: u16 },

    #[error("rak'at phase {start_day}..={end_day} is malformed")]
    InvalidPhase { start_day: u32, end_day: u32 },

    /// Overlapping phases are rejected outright rather than resolved by
    /// first match, so a misconfigured plan fails loudly.
    #[error("rak'at phases {0}..={1} and {2}..={3} overlap")]
    OverlappingPhases(u32, u32, u32, u32),

    #[error("unknown juz number {0}")]
    UnknownJuz(u8),

    #[error("unknown surah number {0}")]
    UnknownSurah(u8),

    #[error("ayah {ayah} is out of range for surah {surah}")]
    AyahOutOfRange { surah: u8, ayah: u32 },
}
