//! crates/khatmah_core/src/quran.rs
//!
//! Static reference data for the 604-page Madani mushaf: all 114 surahs
//! with their ayah counts and page ranges, plus the lookups the
//! partitioning engine needs. Loaded once, never mutated.

/// One of the 114 chapters of the Qur'an.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surah {
    pub number: u8,
    pub name: &'static str,
    pub arabic_name: &'static str,
    pub ayah_count: u32,
    pub start_page: u16,
    pub end_page: u16,
}

/// Total pages in the reference edition.
pub const TOTAL_QURAN_PAGES: u16 = 604;

/// THE "NO-FATIHAH" RULE: page 1 (Surat Al-Fatihah) is excluded from all
/// plan calculations. Every khatmah starts at page 2 (Surat Al-Baqarah).
/// This is a hard domain invariant, not a default.
pub const QURAN_START_PAGE: u16 = 2;

/// Readable pages once Al-Fatihah is excluded.
pub const EFFECTIVE_QURAN_PAGES: u16 = QURAN_END_PAGE - QURAN_START_PAGE + 1;

/// Last readable page, identical to [`TOTAL_QURAN_PAGES`].
pub const QURAN_END_PAGE: u16 = TOTAL_QURAN_PAGES;

pub const TOTAL_SURAHS: usize = 114;

pub const TOTAL_JUZ: u8 = 30;

/// The uniform verse density assumed when estimating ayah ranges.
///
/// This is a deliberate approximation (the product gives pacing guidance,
/// not verse-accurate boundaries) and must not be replaced with real
/// per-page verse counts without revisiting the product requirement.
pub(crate) const ESTIMATED_AYAHS_PER_PAGE: u32 = 15;

macro_rules! surah {
    ($num:expr, $name:expr, $arabic:expr, $ayahs:expr, $start:expr, $end:expr) => {
        Surah {
            number: $num,
            name: $name,
            arabic_name: $arabic,
            ayah_count: $ayahs,
            start_page: $start,
            end_page: $end,
        }
    };
}

/// All 114 surahs in declaration order. Consecutive surahs may share a
/// boundary page (a surah can begin mid-page where the previous ends).
pub static ALL_SURAHS: [Surah; TOTAL_SURAHS] = [
    surah!(1, "Al-Fatihah", "الفاتحة", 7, 1, 1),
    surah!(2, "Al-Baqarah", "البقرة", 286, 2, 49),
    surah!(3, "Ali Imran", "آل عمران", 200, 50, 76),
    surah!(4, "An-Nisa", "النساء", 176, 77, 106),
    surah!(5, "Al-Ma'idah", "المائدة", 120, 106, 127),
    surah!(6, "Al-An'am", "الأنعام", 165, 128, 150),
    surah!(7, "Al-A'raf", "الأعراف", 206, 151, 176),
    surah!(8, "Al-Anfal", "الأنفال", 75, 177, 186),
    surah!(9, "At-Tawbah", "التوبة", 129, 187, 207),
    surah!(10, "Yunus", "يونس", 109, 208, 221),
    surah!(11, "Hud", "هود", 123, 221, 235),
    surah!(12, "Yusuf", "يوسف", 111, 235, 248),
    surah!(13, "Ar-Ra'd", "الرعد", 43, 249, 255),
    surah!(14, "Ibrahim", "إبراهيم", 52, 255, 261),
    surah!(15, "Al-Hijr", "الحجر", 99, 262, 267),
    surah!(16, "An-Nahl", "النحل", 128, 267, 281),
    surah!(17, "Al-Isra", "الإسراء", 111, 282, 293),
    surah!(18, "Al-Kahf", "الكهف", 110, 293, 304),
    surah!(19, "Maryam", "مريم", 98, 305, 312),
    surah!(20, "Ta-Ha", "طه", 135, 312, 321),
    surah!(21, "Al-Anbiya", "الأنبياء", 112, 322, 331),
    surah!(22, "Al-Hajj", "الحج", 78, 332, 341),
    surah!(23, "Al-Mu'minun", "المؤمنون", 118, 342, 349),
    surah!(24, "An-Nur", "النور", 64, 350, 359),
    surah!(25, "Al-Furqan", "الفرقان", 77, 359, 366),
    surah!(26, "Ash-Shu'ara", "الشعراء", 227, 367, 377),
    surah!(27, "An-Naml", "النمل", 93, 377, 385),
    surah!(28, "Al-Qasas", "القصص", 88, 385, 396),
    surah!(29, "Al-Ankabut", "العنكبوت", 69, 396, 404),
    surah!(30, "Ar-Rum", "الروم", 60, 404, 410),
    surah!(31, "Luqman", "لقمان", 34, 411, 414),
    surah!(32, "As-Sajdah", "السجدة", 30, 415, 417),
    surah!(33, "Al-Ahzab", "الأحزاب", 73, 418, 427),
    surah!(34, "Saba", "سبأ", 54, 428, 434),
    surah!(35, "Fatir", "فاطر", 45, 434, 440),
    surah!(36, "Ya-Sin", "يس", 83, 440, 445),
    surah!(37, "As-Saffat", "الصافات", 182, 446, 452),
    surah!(38, "Sad", "ص", 88, 453, 458),
    surah!(39, "Az-Zumar", "الزمر", 75, 458, 467),
    surah!(40, "Ghafir", "غافر", 85, 467, 476),
    surah!(41, "Fussilat", "فصلت", 54, 477, 482),
    surah!(42, "Ash-Shuraa", "الشورى", 53, 483, 489),
    surah!(43, "Az-Zukhruf", "الزخرف", 89, 489, 495),
    surah!(44, "Ad-Dukhan", "الدخان", 59, 496, 498),
    surah!(45, "Al-Jathiyah", "الجاثية", 37, 499, 502),
    surah!(46, "Al-Ahqaf", "الأحقاف", 35, 502, 506),
    surah!(47, "Muhammad", "محمد", 38, 507, 510),
    surah!(48, "Al-Fath", "الفتح", 29, 511, 515),
    surah!(49, "Al-Hujurat", "الحجرات", 18, 515, 517),
    surah!(50, "Qaf", "ق", 45, 518, 520),
    surah!(51, "Adh-Dhariyat", "الذاريات", 60, 520, 523),
    surah!(52, "At-Tur", "الطور", 49, 523, 525),
    surah!(53, "An-Najm", "النجم", 62, 526, 528),
    surah!(54, "Al-Qamar", "القمر", 55, 528, 531),
    surah!(55, "Ar-Rahman", "الرحمن", 78, 531, 534),
    surah!(56, "Al-Waqi'ah", "الواقعة", 96, 534, 537),
    surah!(57, "Al-Hadid", "الحديد", 29, 537, 541),
    surah!(58, "Al-Mujadila", "المجادلة", 22, 542, 545),
    surah!(59, "Al-Hashr", "الحشر", 24, 545, 548),
    surah!(60, "Al-Mumtahanah", "الممتحنة", 13, 549, 550),
    surah!(61, "As-Saf", "الصف", 14, 551, 552),
    surah!(62, "Al-Jumu'ah", "الجمعة", 11, 553, 554),
    surah!(63, "Al-Munafiqun", "المنافقون", 11, 554, 555),
    surah!(64, "At-Taghabun", "التغابن", 18, 556, 557),
    surah!(65, "At-Talaq", "الطلاق", 12, 558, 559),
    surah!(66, "At-Tahrim", "التحريم", 12, 560, 561),
    surah!(67, "Al-Mulk", "الملك", 30, 562, 564),
    surah!(68, "Al-Qalam", "القلم", 52, 564, 566),
    surah!(69, "Al-Haqqah", "الحاقة", 52, 566, 568),
    surah!(70, "Al-Ma'arij", "المعارج", 44, 568, 570),
    surah!(71, "Nuh", "نوح", 28, 570, 571),
    surah!(72, "Al-Jinn", "الجن", 28, 572, 573),
    surah!(73, "Al-Muzzammil", "المزمل", 20, 574, 575),
    surah!(74, "Al-Muddaththir", "المدثر", 56, 575, 577),
    surah!(75, "Al-Qiyamah", "القيامة", 40, 577, 578),
    surah!(76, "Al-Insan", "الإنسان", 31, 578, 580),
    surah!(77, "Al-Mursalat", "المرسلات", 50, 580, 582),
    surah!(78, "An-Naba", "النبأ", 40, 582, 583),
    surah!(79, "An-Nazi'at", "النازعات", 46, 583, 585),
    surah!(80, "Abasa", "عبس", 42, 585, 586),
    surah!(81, "At-Takwir", "التكوير", 29, 586, 587),
    surah!(82, "Al-Infitar", "الانفطار", 19, 587, 587),
    surah!(83, "Al-Mutaffifin", "المطففين", 36, 587, 589),
    surah!(84, "Al-Inshiqaq", "الانشقاق", 25, 589, 590),
    surah!(85, "Al-Buruj", "البروج", 22, 590, 591),
    surah!(86, "At-Tariq", "الطارق", 17, 591, 591),
    surah!(87, "Al-A'la", "الأعلى", 19, 591, 592),
    surah!(88, "Al-Ghashiyah", "الغاشية", 26, 592, 592),
    surah!(89, "Al-Fajr", "الفجر", 30, 593, 594),
    surah!(90, "Al-Balad", "البلد", 20, 594, 595),
    surah!(91, "Ash-Shams", "الشمس", 15, 595, 595),
    surah!(92, "Al-Layl", "الليل", 21, 595, 596),
    surah!(93, "Ad-Duhaa", "الضحى", 11, 596, 596),
    surah!(94, "Ash-Sharh", "الشرح", 8, 596, 596),
    surah!(95, "At-Tin", "التين", 8, 597, 597),
    surah!(96, "Al-Alaq", "العلق", 19, 597, 597),
    surah!(97, "Al-Qadr", "القدر", 5, 598, 598),
    surah!(98, "Al-Bayyinah", "البينة", 8, 598, 599),
    surah!(99, "Az-Zalzalah", "الزلزلة", 8, 599, 599),
    surah!(100, "Al-Adiyat", "العاديات", 11, 599, 600),
    surah!(101, "Al-Qari'ah", "القارعة", 11, 600, 600),
    surah!(102, "At-Takathur", "التكاثر", 8, 600, 600),
    surah!(103, "Al-Asr", "العصر", 3, 601, 601),
    surah!(104, "Al-Humazah", "الهمزة", 9, 601, 601),
    surah!(105, "Al-Fil", "الفيل", 5, 601, 601),
    surah!(106, "Quraysh", "قريش", 4, 602, 602),
    surah!(107, "Al-Ma'un", "الماعون", 7, 602, 602),
    surah!(108, "Al-Kawthar", "الكوثر", 3, 602, 602),
    surah!(109, "Al-Kafirun", "الكافرون", 6, 603, 603),
    surah!(110, "An-Nasr", "النصر", 3, 603, 603),
    surah!(111, "Al-Masad", "المسد", 5, 603, 603),
    surah!(112, "Al-Ikhlas", "الإخلاص", 4, 604, 604),
    surah!(113, "Al-Falaq", "الفلق", 5, 604, 604),
    surah!(114, "An-Nas", "الناس", 6, 604, 604),
];

/// Looks up a surah by its 1-based number.
pub fn surah_by_number(number: u8) -> Option<&'static Surah> {
    ALL_SURAHS.iter().find(|s| s.number == number)
}

/// Looks up the surah occupying a page.
///
/// Boundary pages belong to two surahs; the earlier one in declaration
/// order wins, which keeps the result deterministic.
pub fn surah_by_page(page: u16) -> Option<&'static Surah> {
    ALL_SURAHS
        .iter()
        .find(|s| page >= s.start_page && page <= s.end_page)
}

/// First page of a juz, following the mushaf's 20-pages-per-juz layout.
///
/// Juz 1 maps to [`QURAN_START_PAGE`] so that the No-Fatihah rule holds.
pub fn juz_start_page(juz: u8) -> Option<u16> {
    match juz {
        1 => Some(QURAN_START_PAGE),
        2..=TOTAL_JUZ => Some((u16::from(juz) - 1) * 20 + 1),
        _ => None,
    }
}

/// Estimates the ayah range a percentage slice of a page covers, assuming
/// a uniform ~15 verses per page and clipping to `[1, 15]`.
pub(crate) fn estimate_ayah_range(start_pct: f64, end_pct: f64) -> (u32, u32) {
    let per_page = f64::from(ESTIMATED_AYAHS_PER_PAGE);
    let start = ((start_pct / 100.0) * per_page).floor() as u32 + 1;
    let end = ((end_pct / 100.0) * per_page).ceil() as u32;
    let start = start.max(1).min(ESTIMATED_AYAHS_PER_PAGE);
    let end = end.max(start).min(ESTIMATED_AYAHS_PER_PAGE);
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_has_all_114_surahs_in_order() {
        assert_eq!(ALL_SURAHS.len(), TOTAL_SURAHS);
        for (i, s) in ALL_SURAHS.iter().enumerate() {
            assert_eq!(s.number as usize, i + 1);
            assert!(s.start_page <= s.end_page, "surah {} page range", s.number);
            assert!(s.ayah_count > 0);
        }
    }

    #[test]
    fn page_ranges_cover_the_whole_mushaf() {
        for page in 1..=TOTAL_QURAN_PAGES {
            assert!(
                surah_by_page(page).is_some(),
                "page {} has no surah",
                page
            );
        }
        assert!(surah_by_page(0).is_none());
        assert!(surah_by_page(TOTAL_QURAN_PAGES + 1).is_none());
    }

    #[test]
    fn boundary_page_resolves_to_the_earlier_surah() {
        // Page 106 ends An-Nisa and begins Al-Ma'idah.
        let s = surah_by_page(106).unwrap();
        assert_eq!(s.number, 4);
    }

    #[test]
    fn surah_lookup_by_number() {
        assert_eq!(surah_by_number(2).unwrap().name, "Al-Baqarah");
        assert_eq!(surah_by_number(114).unwrap().start_page, 604);
        assert!(surah_by_number(0).is_none());
        assert!(surah_by_number(115).is_none());
    }

    #[test]
    fn juz_pages_respect_the_no_fatihah_rule() {
        assert_eq!(juz_start_page(1), Some(QURAN_START_PAGE));
        assert_eq!(juz_start_page(2), Some(21));
        assert_eq!(juz_start_page(30), Some(581));
        assert!(juz_start_page(0).is_none());
        assert!(juz_start_page(31).is_none());
    }

    #[test]
    fn ayah_estimate_maps_full_page_to_full_range() {
        assert_eq!(estimate_ayah_range(0.0, 100.0), (1, 15));
    }

    #[test]
    fn ayah_estimate_for_the_lower_half() {
        // 50..100% of 15 verses is verses 8 through 15.
        assert_eq!(estimate_ayah_range(50.0, 100.0), (8, 15));
    }

    #[test]
    fn ayah_estimate_never_inverts() {
        let (start, end) = estimate_ayah_range(99.0, 100.0);
        assert!(start <= end);
        assert!(end <= ESTIMATED_AYAHS_PER_PAGE);
    }
}
